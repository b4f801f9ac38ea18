/// Generic error type for crucible-common operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Generic error
    #[error("Error: {0}")]
    Generic(String),
    /// A network fetch failed
    #[error("Fetch error: {0}")]
    FetchError(String),
    /// An RPC call failed
    #[error("RPC error: {0}")]
    RpcError(String),
    /// A value could not be parsed
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Internal error
    #[error("Internal error: {0}")]
    Eyre(#[from] eyre::Report),
}
