use thiserror::Error;

/// User-facing errors.
///
/// Segmentation itself is total and never produces one of these; they come
/// from reading inputs, loading configuration and rendering output.
#[derive(Error, Debug)]
pub enum SqlsegError {
    #[error("sqlseg config error: {0}")]
    Config(String),

    #[error("sqlseg cursor error: {0}")]
    Cursor(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SqlsegError>;
