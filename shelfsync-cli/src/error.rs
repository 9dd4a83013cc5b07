use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Database could not be opened or queried
    #[error("Database error: {0}")]
    Database(String),

    /// Settings file or value problem
    #[error("Config error: {0}")]
    Config(String),

    /// A batch was rejected; earlier batches stay committed
    #[error("Batch failed: {0}")]
    Batch(String),
}

impl CliError {
    pub(crate) fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn batch(msg: impl Into<String>) -> Self {
        Self::Batch(msg.into())
    }
}
