use tabula_types::{ProviderError, ReduceError};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("no tokio runtime available")]
    NoRuntime,
    #[error(transparent)]
    Reduce(#[from] ReduceError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    /// The request was superseded, or undone, before it completed.
    #[error("request cancelled")]
    Cancelled,
}
