use crate::artifacts::Diagnostic;

/// Generic error type for crucible compiler operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Generic error
    #[error("Error: {0}")]
    Generic(String),
    /// The compiler reported diagnostics. Compilation aborts with the full
    /// list before any artifact is returned.
    #[error("compilation failed with {} diagnostic(s)", .0.len())]
    Compilation(Vec<Diagnostic>),
    /// A compiler binary could not be fetched
    #[error("Fetch error: {0}")]
    FetchError(String),
    /// The solc executable was missing or misbehaved
    #[error("Solc error: {0}")]
    SolcError(String),
    /// An IO error occurred
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),
    /// A JSON (de)serialization error occurred
    #[error("Serde error: {0}")]
    SerdeError(#[from] serde_json::Error),
    /// The artifact cache failed
    #[error("Cache error: {0}")]
    CacheError(#[from] crucible_cache::error::Error),
    /// Internal error
    #[error("Internal error: {0}")]
    Eyre(#[from] eyre::Report),
}
