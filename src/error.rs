//! Error type shared by the storage layer and the reading engine

/// Errors surfaced by the shelfquest core
#[derive(Debug, thiserror::Error)]
pub enum ShelfError {
    #[error("{kind} not found: {key}")]
    NotFound { kind: &'static str, key: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Stored value is corrupt: {0}")]
    Corrupt(String),
}

impl ShelfError {
    pub fn not_found(kind: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            kind,
            key: key.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ShelfError>;
