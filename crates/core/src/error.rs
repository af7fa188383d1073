use qb_verification_id::{VerificationId, VerificationIdError};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid text: {0}")]
    Text(#[from] qb_types::TextError),
    #[error(transparent)]
    VerificationId(#[from] VerificationIdError),
    #[error("verification id already registered: {0}")]
    DuplicateVerificationId(VerificationId),
    #[error("product not found: {0}")]
    ProductNotFound(VerificationId),
    #[error("could not allocate a unique verification id after {attempts} attempts")]
    RegistrationExhausted { attempts: u32 },
    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to write record: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to read record: {0}")]
    FileRead(std::io::Error),
    #[error("failed to serialize record: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize record: {0}")]
    Deserialization(serde_json::Error),
}

impl CoreError {
    /// True when the entropy source behind identifier generation failed.
    ///
    /// Callers surface this as a retryable condition rather than a bad request.
    pub fn is_randomness_unavailable(&self) -> bool {
        matches!(
            self,
            CoreError::VerificationId(VerificationIdError::RandomnessUnavailable(_))
        )
    }
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
