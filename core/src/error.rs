use thiserror::Error;

#[derive(Error, Debug)]
pub enum SynthError {
    #[error("Invalid configuration: {reason}")]
    FatalConfig { reason: String },

    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SynthResult<T> = Result<T, SynthError>;
