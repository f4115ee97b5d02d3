use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeqError {
    #[error("Type mismatch in {stage}: expected {expected}, got {found}")]
    TypeMismatch {
        stage: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Callback(#[from] anyhow::Error),
}

impl SeqError {
    pub fn type_mismatch(stage: &'static str, expected: &'static str, found: &'static str) -> Self {
        Self::TypeMismatch { stage, expected, found }
    }
}

pub type Result<T> = std::result::Result<T, SeqError>;
