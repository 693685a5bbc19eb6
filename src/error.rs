use thiserror::Error;

#[derive(Debug, Error)]
pub enum CostError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Index {index} out of range (table has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("No conversion registered between '{from}' and '{to}'")]
    UnresolvedConversion { from: String, to: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{name} is used in {count} menu item(s); remove it from those recipes first")]
    InUse { name: String, count: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, CostError>;
