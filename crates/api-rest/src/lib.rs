//! # API REST
//!
//! REST API implementation for QualiBev.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON bodies, status codes, CORS)
//!
//! All business rules live in `qb-core`; handlers only translate between JSON and core calls.

#![warn(rust_2018_idioms)]

pub mod dto;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use qb_core::constants::MAX_GENERATE_BATCH;
use qb_core::{
    CoreConfig, CoreError, RegistrationService, ReportService, ScanMethod, ScanService,
    StatsService, Stores, VerificationId, VerificationIdError, VerificationIdService,
};
use rand::rngs::OsRng;
use rand::RngCore;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use dto::{
    GenerateIdsQuery, GenerateIdsRes, HealthRes, ListProductsRes, ListReportsRes, ListScansRes,
    ProductRes, RegisterProductReq, ReportRes, ScanHistoryQuery, ScanRecordRes, ScanReq, ScanRes,
    StatsRes, SubmitReportReq, ValidityRes,
};

type ApiError = (StatusCode, String);

/// Entropy source behind the server's identifier generation.
pub type IdRng = Box<dyn RngCore + Send>;

/// Application state shared across REST API handlers
#[derive(Clone)]
pub struct AppState {
    registration: Arc<RegistrationService<IdRng>>,
    scans: ScanService,
    reports: ReportService,
    stats: StatsService,
}

impl AppState {
    /// State backed by the operating system generator.
    pub fn new(cfg: Arc<CoreConfig>, stores: Stores) -> Self {
        let ids = VerificationIdService::with_rng(Box::new(OsRng) as IdRng);
        let registration = RegistrationService::with_id_service(cfg, stores.catalog.clone(), ids);
        Self::with_registration(registration, stores)
    }

    /// State around an already built registration service, e.g. one with a seeded generator.
    ///
    /// `registration` should share `stores.catalog`.
    pub fn with_registration(registration: RegistrationService<IdRng>, stores: Stores) -> Self {
        Self {
            registration: Arc::new(registration),
            scans: ScanService::new(stores.catalog, stores.scans.clone()),
            reports: ReportService::new(stores.reports.clone()),
            stats: StatsService::new(stores.scans, stores.reports),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        generate_ids,
        check_validity,
        register_product,
        list_products,
        deactivate_product,
        reactivate_product,
        verify_scan,
        list_scans,
        activity_stats,
        submit_report,
        list_reports,
    ),
    components(schemas(
        HealthRes,
        GenerateIdsRes,
        ValidityRes,
        RegisterProductReq,
        ProductRes,
        ListProductsRes,
        ScanReq,
        ScanRecordRes,
        ScanRes,
        ListScansRes,
        StatsRes,
        SubmitReportReq,
        ReportRes,
        ListReportsRes,
    ))
)]
pub struct ApiDoc;

/// Build the REST router over `state`, including Swagger UI at `/swagger-ui`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/verification-ids", post(generate_ids))
        .route("/verification-ids/:candidate/validity", get(check_validity))
        .route("/products", get(list_products).post(register_product))
        .route("/products/:id/deactivate", post(deactivate_product))
        .route("/products/:id/reactivate", post(reactivate_product))
        .route("/scans", get(list_scans).post(verify_scan))
        .route("/stats", get(activity_stats))
        .route("/reports", get(list_reports).post(submit_report))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Map a core error onto a status code and client-facing message.
///
/// Storage failures are logged and reported generically.
fn api_error(e: CoreError) -> ApiError {
    match &e {
        CoreError::InvalidInput(_)
        | CoreError::Text(_)
        | CoreError::VerificationId(VerificationIdError::InvalidVerificationId(_)) => {
            (StatusCode::BAD_REQUEST, e.to_string())
        }
        CoreError::ProductNotFound(_) => (StatusCode::NOT_FOUND, e.to_string()),
        CoreError::DuplicateVerificationId(_) => (StatusCode::CONFLICT, e.to_string()),
        CoreError::VerificationId(_) | CoreError::RegistrationExhausted { .. } => {
            if e.is_randomness_unavailable() {
                tracing::error!("entropy source unavailable: {}", e);
            } else {
                tracing::error!("identifier allocation failed: {}", e);
            }
            (StatusCode::SERVICE_UNAVAILABLE, e.to_string())
        }
        CoreError::StorageDirCreation(_)
        | CoreError::FileWrite(_)
        | CoreError::FileRead(_)
        | CoreError::Serialization(_)
        | CoreError::Deserialization(_) => {
            tracing::error!("storage error: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".into())
        }
    }
}

fn parse_id(raw: &str) -> Result<VerificationId, ApiError> {
    VerificationId::parse(raw).map_err(|e| api_error(e.into()))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for monitoring and load balancers.
#[axum::debug_handler]
async fn health() -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "QualiBev REST API is alive".into(),
    })
}

#[utoipa::path(
    post,
    path = "/verification-ids",
    params(GenerateIdsQuery),
    responses(
        (status = 200, description = "Freshly minted identifiers", body = GenerateIdsRes),
        (status = 400, description = "Count out of range"),
        (status = 503, description = "Entropy source unavailable")
    )
)]
/// Mint verification identifiers without registering products.
///
/// The identifiers are not reserved; registration allocates its own.
#[axum::debug_handler]
async fn generate_ids(
    State(state): State<AppState>,
    Query(query): Query<GenerateIdsQuery>,
) -> Result<Json<GenerateIdsRes>, ApiError> {
    let count = query.count.unwrap_or(1);
    if count == 0 || count > MAX_GENERATE_BATCH {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("count must be between 1 and {MAX_GENERATE_BATCH}"),
        ));
    }

    let verification_ids = (0..count)
        .map(|_| state.registration.preview_id().map(|id| id.to_string()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(api_error)?;

    Ok(Json(GenerateIdsRes { verification_ids }))
}

#[utoipa::path(
    get,
    path = "/verification-ids/{candidate}/validity",
    params(("candidate" = String, Path, description = "Identifier to check")),
    responses(
        (status = 200, description = "Syntactic validity of the candidate", body = ValidityRes)
    )
)]
/// Check whether a candidate is a well-formed identifier. Does not consult the catalog.
#[axum::debug_handler]
async fn check_validity(Path(candidate): Path<String>) -> Json<ValidityRes> {
    let valid = VerificationId::is_valid(&candidate);
    Json(ValidityRes { candidate, valid })
}

#[utoipa::path(
    post,
    path = "/products",
    request_body = RegisterProductReq,
    responses(
        (status = 201, description = "Product registered", body = ProductRes),
        (status = 400, description = "Bad request"),
        (status = 503, description = "Could not allocate an identifier"),
        (status = 500, description = "Internal server error")
    )
)]
/// Register a product under a newly allocated verification identifier.
#[axum::debug_handler]
async fn register_product(
    State(state): State<AppState>,
    Json(req): Json<RegisterProductReq>,
) -> Result<(StatusCode, Json<ProductRes>), ApiError> {
    let product = state
        .registration
        .register(req.into())
        .map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(product.into())))
}

#[utoipa::path(
    get,
    path = "/products",
    responses(
        (status = 200, description = "All registered products", body = ListProductsRes),
        (status = 500, description = "Internal server error")
    )
)]
#[axum::debug_handler]
async fn list_products(State(state): State<AppState>) -> Result<Json<ListProductsRes>, ApiError> {
    let products = state.registration.list().map_err(api_error)?;
    Ok(Json(ListProductsRes {
        products: products.into_iter().map(ProductRes::from).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/products/{id}/deactivate",
    params(("id" = String, Path, description = "Verification identifier")),
    responses(
        (status = 200, description = "Product deactivated", body = ProductRes),
        (status = 400, description = "Malformed identifier"),
        (status = 404, description = "Product not found")
    )
)]
#[axum::debug_handler]
async fn deactivate_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductRes>, ApiError> {
    let id = parse_id(&id)?;
    let product = state.registration.deactivate(&id).map_err(api_error)?;
    Ok(Json(product.into()))
}

#[utoipa::path(
    post,
    path = "/products/{id}/reactivate",
    params(("id" = String, Path, description = "Verification identifier")),
    responses(
        (status = 200, description = "Product reactivated", body = ProductRes),
        (status = 400, description = "Malformed identifier"),
        (status = 404, description = "Product not found")
    )
)]
#[axum::debug_handler]
async fn reactivate_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductRes>, ApiError> {
    let id = parse_id(&id)?;
    let product = state.registration.reactivate(&id).map_err(api_error)?;
    Ok(Json(product.into()))
}

#[utoipa::path(
    post,
    path = "/scans",
    request_body = ScanReq,
    responses(
        (status = 200, description = "Verification outcome", body = ScanRes),
        (status = 400, description = "Unknown scan method"),
        (status = 500, description = "Internal server error")
    )
)]
/// Verify a scanned payload.
///
/// A payload that is not a verification identifier is a normal `malformed` outcome, not an
/// error.
#[axum::debug_handler]
async fn verify_scan(
    State(state): State<AppState>,
    Json(req): Json<ScanReq>,
) -> Result<Json<ScanRes>, ApiError> {
    let method = match req.method.as_deref() {
        Some(m) => m.parse::<ScanMethod>().map_err(api_error)?,
        None => ScanMethod::Qr,
    };
    let outcome = state
        .scans
        .verify(&req.payload, method)
        .map_err(api_error)?;
    Ok(Json(outcome.into()))
}

#[utoipa::path(
    get,
    path = "/scans",
    params(ScanHistoryQuery),
    responses(
        (status = 200, description = "Scan history, newest first", body = ListScansRes),
        (status = 500, description = "Internal server error")
    )
)]
/// Scan history, newest first. `limit=1` returns the latest scan.
#[axum::debug_handler]
async fn list_scans(
    State(state): State<AppState>,
    Query(query): Query<ScanHistoryQuery>,
) -> Result<Json<ListScansRes>, ApiError> {
    let history = state.scans.history().map_err(api_error)?;
    let limit = query.limit.unwrap_or(usize::MAX);
    Ok(Json(ListScansRes {
        scans: history.iter().take(limit).map(ScanRecordRes::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/stats",
    responses(
        (status = 200, description = "Scan and report totals", body = StatsRes),
        (status = 500, description = "Internal server error")
    )
)]
#[axum::debug_handler]
async fn activity_stats(State(state): State<AppState>) -> Result<Json<StatsRes>, ApiError> {
    let stats = state.stats.summary().map_err(api_error)?;
    Ok(Json(stats.into()))
}

#[utoipa::path(
    post,
    path = "/reports",
    request_body = SubmitReportReq,
    responses(
        (status = 201, description = "Report stored", body = ReportRes),
        (status = 400, description = "Bad request"),
        (status = 500, description = "Internal server error")
    )
)]
#[axum::debug_handler]
async fn submit_report(
    State(state): State<AppState>,
    Json(req): Json<SubmitReportReq>,
) -> Result<(StatusCode, Json<ReportRes>), ApiError> {
    let report = state.reports.submit(req.into()).map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(report.into())))
}

#[utoipa::path(
    get,
    path = "/reports",
    responses(
        (status = 200, description = "Reports, newest first", body = ListReportsRes),
        (status = 500, description = "Internal server error")
    )
)]
#[axum::debug_handler]
async fn list_reports(State(state): State<AppState>) -> Result<Json<ListReportsRes>, ApiError> {
    let reports = state.reports.list().map_err(api_error)?;
    Ok(Json(ListReportsRes {
        reports: reports.into_iter().map(ReportRes::from).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use http_body_util::BodyExt;
    use qb_core::{NewProduct, StorageBackend};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_app() -> Router {
        let cfg = Arc::new(
            CoreConfig::new("unused".into(), StorageBackend::Memory, 5, 2)
                .expect("CoreConfig::new should succeed"),
        );
        let stores = Stores::open(&cfg).expect("memory stores should open");
        router(AppState::new(cfg, stores))
    }

    fn memory_setup(max_attempts: u32) -> (Arc<CoreConfig>, Stores) {
        let cfg = Arc::new(
            CoreConfig::new("unused".into(), StorageBackend::Memory, max_attempts, 15)
                .expect("CoreConfig::new should succeed"),
        );
        let stores = Stores::open(&cfg).expect("memory stores should open");
        (cfg, stores)
    }

    fn app_with_rng(cfg: Arc<CoreConfig>, stores: Stores, rng: IdRng) -> Router {
        let registration = RegistrationService::with_id_service(
            cfg,
            stores.catalog.clone(),
            VerificationIdService::with_rng(rng),
        );
        router(AppState::with_registration(registration, stores))
    }

    struct FailingRng;

    impl RngCore for FailingRng {
        fn next_u32(&mut self) -> u32 {
            panic!("FailingRng has no entropy")
        }

        fn next_u64(&mut self) -> u64 {
            panic!("FailingRng has no entropy")
        }

        fn fill_bytes(&mut self, _dest: &mut [u8]) {
            panic!("FailingRng has no entropy")
        }

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
            Err(rand::Error::new("entropy source offline"))
        }
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn product_body() -> Value {
        json!({
            "product_name": "Hennessy VS",
            "brand_name": "Hennessy",
            "batch_number": "BN1001",
            "alcohol_type": "Cognac",
            "origin_country": "FR"
        })
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let app = test_app();
        let (status, body) = send(&app, "GET", "/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn generate_returns_valid_ids() {
        let app = test_app();
        let (status, body) = send(&app, "POST", "/verification-ids?count=3", None).await;

        assert_eq!(status, StatusCode::OK);
        let ids = body["verification_ids"].as_array().unwrap();
        assert_eq!(ids.len(), 3);
        for id in ids {
            assert!(VerificationId::is_valid(id.as_str().unwrap()));
        }
    }

    #[tokio::test]
    async fn generate_rejects_out_of_range_count() {
        let app = test_app();
        let (status, _) = send(&app, "POST", "/verification-ids?count=0", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, "POST", "/verification-ids?count=101", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn validity_endpoint_is_syntactic() {
        let app = test_app();

        let (_, body) = send(&app, "GET", "/verification-ids/VRF-A1B2-C3D4-E5F6/validity", None).await;
        assert_eq!(body["valid"], true);

        let (status, body) =
            send(&app, "GET", "/verification-ids/vrf-ab12-cd34-ef56/validity", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], false);
        assert_eq!(body["candidate"], "vrf-ab12-cd34-ef56");
    }

    #[tokio::test]
    async fn register_then_scan_until_limit() {
        let app = test_app();
        let (status, product) = send(&app, "POST", "/products", Some(product_body())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(product["status"], "active");
        assert_eq!(product["max_scans_allowed"], 2);
        let id = product["verification_id"].as_str().unwrap().to_string();

        let scan = json!({ "payload": id, "method": "nfc" });
        let (_, first) = send(&app, "POST", "/scans", Some(scan.clone())).await;
        assert_eq!(first["outcome"], "authentic");
        assert_eq!(first["record"]["method"], "nfc");
        assert_eq!(first["product"]["scan_count"], 1);

        send(&app, "POST", "/scans", Some(scan.clone())).await;
        let (_, third) = send(&app, "POST", "/scans", Some(scan)).await;
        assert_eq!(third["outcome"], "scan_limit_exceeded");
        assert_eq!(third["authentic"], false);

        let (_, listed) = send(&app, "GET", "/products", None).await;
        assert_eq!(listed["products"][0]["scan_count"], 3);
    }

    #[tokio::test]
    async fn register_rejects_missing_fields() {
        let app = test_app();
        let mut body = product_body();
        body["brand_name"] = json!("  ");

        let (status, _) = send(&app, "POST", "/products", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn scan_of_garbage_is_malformed_not_error() {
        let app = test_app();
        let (status, body) = send(
            &app,
            "POST",
            "/scans",
            Some(json!({ "payload": "WIFI:S:cafe;T:WPA;P:secret;;" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], "malformed");
        assert_eq!(body["record"]["method"], "qr");
        assert!(body["product"].is_null());
    }

    #[tokio::test]
    async fn scan_with_unknown_method_is_bad_request() {
        let app = test_app();
        let (status, _) = send(
            &app,
            "POST",
            "/scans",
            Some(json!({ "payload": "VRF-A1B2-C3D4-E5F6", "method": "camera" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn deactivate_maps_errors_and_flags_scans() {
        let app = test_app();

        let (status, _) = send(&app, "POST", "/products/not-an-id/deactivate", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, "POST", "/products/VRF-0000-0000-0000/deactivate", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, product) = send(&app, "POST", "/products", Some(product_body())).await;
        let id = product["verification_id"].as_str().unwrap().to_string();

        let (status, body) =
            send(&app, "POST", &format!("/products/{id}/deactivate"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "inactive");

        let (_, scan) = send(&app, "POST", "/scans", Some(json!({ "payload": id }))).await;
        assert_eq!(scan["outcome"], "deactivated");
    }

    #[tokio::test]
    async fn reports_round_trip() {
        let app = test_app();
        let (status, report) = send(
            &app,
            "POST",
            "/reports",
            Some(json!({
                "product_name": "Grey Goose Vodka",
                "description": "Label colour is off",
                "location": "Durban"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(report["location"], "Durban");

        let (status, listed) = send(&app, "GET", "/reports", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed["reports"].as_array().unwrap().len(), 1);
        assert_eq!(listed["reports"][0]["id"], report["id"]);
    }

    #[tokio::test]
    async fn file_backend_persists_across_routers() {
        let dir = tempfile::tempdir().unwrap();
        let build = || {
            let cfg = Arc::new(
                CoreConfig::new(dir.path().to_path_buf(), StorageBackend::File, 5, 15)
                    .expect("CoreConfig::new should succeed"),
            );
            let stores = Stores::open(&cfg).expect("file stores should open");
            router(AppState::new(cfg, stores))
        };

        let (status, product) = send(&build(), "POST", "/products", Some(product_body())).await;
        assert_eq!(status, StatusCode::CREATED);

        let (_, listed) = send(&build(), "GET", "/products", None).await;
        assert_eq!(
            listed["products"][0]["verification_id"],
            product["verification_id"]
        );
    }

    #[tokio::test]
    async fn entropy_failure_is_service_unavailable() {
        let (cfg, stores) = memory_setup(5);
        let app = app_with_rng(cfg, stores, Box::new(FailingRng));

        let (status, _) = send(&app, "POST", "/products", Some(product_body())).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let (status, _) = send(&app, "POST", "/verification-ids?count=2", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let (_, listed) = send(&app, "GET", "/products", None).await;
        assert!(listed["products"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn exhausted_registration_is_service_unavailable() {
        const SEED: u64 = 99;
        let (cfg, stores) = memory_setup(2);

        // Take the first two identifiers the seeded generator will produce.
        let squatter = RegistrationService::with_id_service(
            cfg.clone(),
            stores.catalog.clone(),
            VerificationIdService::with_rng(StdRng::seed_from_u64(SEED)),
        );
        for batch in ["BN1", "BN2"] {
            squatter
                .register(NewProduct {
                    product_name: "Grey Goose Vodka".into(),
                    brand_name: "Grey Goose".into(),
                    batch_number: batch.into(),
                    alcohol_type: "Vodka".into(),
                    ..Default::default()
                })
                .unwrap();
        }

        let app = app_with_rng(cfg, stores, Box::new(StdRng::seed_from_u64(SEED)));
        let (status, _) = send(&app, "POST", "/products", Some(product_body())).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        let (_, listed) = send(&app, "GET", "/products", None).await;
        assert_eq!(listed["products"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn scan_history_and_stats_follow_activity() {
        let app = test_app();
        let (_, product) = send(&app, "POST", "/products", Some(product_body())).await;
        let id = product["verification_id"].as_str().unwrap().to_string();

        send(&app, "POST", "/scans", Some(json!({ "payload": "menu.example" }))).await;
        send(&app, "POST", "/scans", Some(json!({ "payload": id, "method": "nfc" }))).await;
        send(
            &app,
            "POST",
            "/reports",
            Some(json!({ "product_name": "Hennessy VS", "description": "Cap loose" })),
        )
        .await;

        let (status, history) = send(&app, "GET", "/scans", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(history["scans"].as_array().unwrap().len(), 2);

        let (_, latest) = send(&app, "GET", "/scans?limit=1", None).await;
        let latest = latest["scans"].as_array().unwrap();
        assert_eq!(latest.len(), 1);

        let (status, stats) = send(&app, "GET", "/stats", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats, json!({ "scans": 2, "verified": 1, "reports": 1 }));
    }

    #[test]
    fn openapi_document_lists_routes() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        assert!(paths.iter().any(|p| p.as_str() == "/scans"));
        assert!(paths
            .iter()
            .any(|p| p.as_str() == "/verification-ids/{candidate}/validity"));
    }
}
