use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    /// A form value was not a number, or was out of range.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An import document failed structural validation.
    #[error("Error importing data: {0}")]
    InvalidImportDocument(String),

    /// The stored dataset blob could not be read back.
    #[error("Stored usage data is corrupt: {0}")]
    MalformedPersistedState(String),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl TrackerError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        TrackerError::InvalidInput(msg.into())
    }

    pub fn invalid_import(msg: impl Into<String>) -> Self {
        TrackerError::InvalidImportDocument(msg.into())
    }

    /// True for errors caused by the user's input rather than the environment.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            TrackerError::InvalidInput(_) | TrackerError::InvalidImportDocument(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
