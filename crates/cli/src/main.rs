use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use qb_core::{
    constants::MAX_GENERATE_BATCH, CoreConfig, NewProduct, NewReport, Product, RegistrationService,
    ReportService, ScanMethod, ScanOutcome, ScanService, StatsService, Stores, VerificationId,
    VerificationIdService,
};
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "qb")]
#[command(about = "QualiBev product verification CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate verification IDs without registering anything
    Generate {
        /// How many IDs to generate
        #[arg(long, default_value_t = 1)]
        count: usize,
    },
    /// Check whether a code is a well-formed verification ID
    Validate {
        /// Code to check
        candidate: String,
    },
    /// Register a product and print its verification ID
    Register {
        /// Product name
        product_name: String,
        /// Brand name
        brand_name: String,
        /// Batch number
        batch_number: String,
        /// Alcohol type (e.g. Whisky, Vodka)
        alcohol_type: String,
        /// Two-letter origin country code
        #[arg(long)]
        origin: Option<String>,
        /// Manufacture date (YYYY-MM-DD)
        #[arg(long)]
        manufactured: Option<NaiveDate>,
        /// Scans allowed before the label is treated as cloned
        #[arg(long)]
        max_scans: Option<u32>,
        /// Who is registering the product
        #[arg(long)]
        created_by: Option<String>,
    },
    /// Verify a scanned payload
    Verify {
        /// Decoded QR text, NFC record or typed code
        payload: String,
        /// qr, nfc or manual
        #[arg(long, default_value = "qr")]
        method: String,
    },
    /// Deactivate a product
    Deactivate {
        /// Verification ID
        id: String,
    },
    /// Reactivate a product
    Reactivate {
        /// Verification ID
        id: String,
    },
    /// List registered products
    List,
    /// Report a suspected counterfeit
    Report {
        /// Product name as it appears on the label
        product_name: String,
        /// What looked wrong
        description: String,
        /// Where the product was found
        #[arg(long)]
        location: Option<String>,
        /// Verification ID printed on the label, if any
        #[arg(long)]
        verification_id: Option<String>,
        /// Reporter name or contact
        #[arg(long)]
        reported_by: Option<String>,
    },
    /// List counterfeit reports, newest first
    Reports,
    /// Show scan history, newest first
    Scans {
        /// Show at most this many scans
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show scan, verified and report totals
    Stats,
}

fn print_product(product: &Product) {
    println!(
        "ID: {}, Product: {} ({}), Batch: {}, Origin: {}, Scans: {}/{}, Status: {}",
        product.verification_id,
        product.product_name,
        product.brand_name,
        product.batch_number,
        product.origin_country,
        product.scan_count,
        product.max_scans_allowed,
        product.status.as_str()
    );
}

/// Resolve configuration from the environment and open the configured stores.
fn open_stores() -> anyhow::Result<(Arc<CoreConfig>, Stores)> {
    let cfg = Arc::new(CoreConfig::from_lookup(|key| std::env::var(key).ok())?);
    let stores = Stores::open(&cfg)?;
    Ok((cfg, stores))
}

fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("Use 'qb --help' for commands");
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Validate { candidate } => {
            // Syntactic only; the catalog is not opened.
            if VerificationId::is_valid(&candidate) {
                println!("valid");
            } else {
                println!("invalid");
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Generate { count } => {
            if count == 0 || count > MAX_GENERATE_BATCH {
                anyhow::bail!("--count must be between 1 and {MAX_GENERATE_BATCH}");
            }
            let ids = VerificationIdService::new();
            for _ in 0..count {
                println!("{}", ids.generate()?);
            }
        }
        Commands::Register {
            product_name,
            brand_name,
            batch_number,
            alcohol_type,
            origin,
            manufactured,
            max_scans,
            created_by,
        } => {
            let (cfg, stores) = open_stores()?;
            let registration = RegistrationService::new(cfg, stores.catalog);
            let product = registration.register(NewProduct {
                product_name,
                brand_name,
                batch_number,
                alcohol_type,
                origin_country: origin,
                manufacture_date: manufactured,
                max_scans_allowed: max_scans,
                created_by,
            })?;
            println!("Registered product with verification ID: {}", product.verification_id);
        }
        Commands::Verify { payload, method } => {
            let method: ScanMethod = method.parse()?;
            let (_, stores) = open_stores()?;
            let outcome = ScanService::new(stores.catalog, stores.scans).verify(&payload, method)?;
            match &outcome {
                ScanOutcome::Malformed { .. } => {
                    println!("Not a QualiBev verification code: treat as suspect")
                }
                ScanOutcome::Unknown { .. } => {
                    println!("Code not registered: suspected counterfeit")
                }
                ScanOutcome::Deactivated { product, .. } => println!(
                    "{} has been deactivated: suspected counterfeit",
                    product.verification_id
                ),
                ScanOutcome::ScanLimitExceeded { product, .. } => println!(
                    "{} scanned {} times (limit {}): label may be cloned",
                    product.verification_id, product.scan_count, product.max_scans_allowed
                ),
                ScanOutcome::Authentic { product, .. } => {
                    println!("Authentic");
                    print_product(product);
                }
            }
            if !outcome.is_authentic() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Deactivate { id } => {
            let id = VerificationId::parse(&id)?;
            let (cfg, stores) = open_stores()?;
            let product = RegistrationService::new(cfg, stores.catalog).deactivate(&id)?;
            println!("Deactivated {}", product.verification_id);
        }
        Commands::Reactivate { id } => {
            let id = VerificationId::parse(&id)?;
            let (cfg, stores) = open_stores()?;
            let product = RegistrationService::new(cfg, stores.catalog).reactivate(&id)?;
            println!("Reactivated {}", product.verification_id);
        }
        Commands::List => {
            let (cfg, stores) = open_stores()?;
            let products = RegistrationService::new(cfg, stores.catalog).list()?;
            if products.is_empty() {
                println!("No products found.");
            } else {
                for product in &products {
                    print_product(product);
                }
            }
        }
        Commands::Report {
            product_name,
            description,
            location,
            verification_id,
            reported_by,
        } => {
            let (_, stores) = open_stores()?;
            let report = ReportService::new(stores.reports).submit(NewReport {
                product_name,
                description,
                location,
                verification_id,
                reported_by,
            })?;
            println!("Submitted report {}", report.id);
        }
        Commands::Reports => {
            let (_, stores) = open_stores()?;
            let reports = ReportService::new(stores.reports).list()?;
            if reports.is_empty() {
                println!("No reports found.");
            } else {
                for report in reports {
                    println!(
                        "ID: {}, Product: {}, Reported: {}, Code: {}, Details: {}",
                        report.id,
                        report.product_name,
                        report.reported_at,
                        report
                            .verification_id
                            .as_ref()
                            .map_or("-", VerificationId::as_str),
                        report.description
                    );
                }
            }
        }
        Commands::Scans { limit } => {
            let (_, stores) = open_stores()?;
            let scans = ScanService::new(stores.catalog, stores.scans).history()?;
            if scans.is_empty() {
                println!("No scans found.");
            }
            for scan in scans.iter().take(limit.unwrap_or(usize::MAX)) {
                println!(
                    "Scanned: {}, Code: {}, Method: {}, Authentic: {}",
                    scan.scanned_at,
                    scan
                        .verification_id
                        .as_ref()
                        .map_or("-", VerificationId::as_str),
                    scan.method,
                    scan.authentic
                );
            }
        }
        Commands::Stats => {
            let (_, stores) = open_stores()?;
            let stats = StatsService::new(stores.scans, stores.reports).summary()?;
            println!(
                "Scans: {}, Verified: {}, Reports: {}",
                stats.scans, stats.verified, stats.reports
            );
        }
    }

    Ok(ExitCode::SUCCESS)
}
