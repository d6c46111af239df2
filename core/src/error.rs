use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenError {
    #[error("Invalid row count for '{table}': {count} (must be >= 0)")]
    InvalidRowCount { table: String, count: i64 },

    #[error("Invalid fraction '{name}': {value} (must be within 0.0..=1.0)")]
    InvalidFraction { name: String, value: f64 },

    #[error("Invalid probability for rule '{rule}': {value} (must be within 0.0..=1.0)")]
    InvalidProbability { rule: String, value: f64 },

    #[error("Unknown corruption rule '{label}' for table '{table}'")]
    UnknownRule { table: String, label: String },

    #[error("Cannot generate '{table}' rows: parent table '{parent}' is empty")]
    EmptyParent { table: String, parent: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type GenResult<T> = Result<T, GenError>;
