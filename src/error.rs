use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UsageError {
    // Normalization errors
    #[error("Unrecognized usage payload: matches no supported provider shape")]
    UnsupportedInput,

    // Pricing lookup errors
    #[error("No pricing entry found for model: {model}")]
    ModelNotFound { model: String },

    #[error("No model name given and no default model configured")]
    DefaultModelMissing,

    // Snapshot errors
    #[error("Failed to read snapshot file: {path}")]
    SnapshotRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write snapshot file: {path}")]
    SnapshotWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse model list: {context}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    // Registry fetch errors; a single attempt, no retry
    #[error("Registry request failed")]
    RegistryFetch(#[from] reqwest::Error),

    #[error("Registry returned HTTP {status}")]
    RegistryStatus { status: reqwest::StatusCode },
}

pub type Result<T> = std::result::Result<T, UsageError>;
