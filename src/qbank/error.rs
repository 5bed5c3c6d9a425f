use thiserror::Error;

#[derive(Error, Debug)]
pub enum QbankError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV headers mismatch. Expected: {expected:?}. Found: {found:?}")]
    SchemaMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("No question selected")]
    NoSelection,

    #[error("Index {index} out of range ({len} visible)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, QbankError>;
