use thiserror::Error;

/// The standard result type used throughout the application.
pub type StdResult<T> = Result<T, anyhow::Error>;

/// Errors raised while fetching a page of a collection.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FetchError {
    /// The credential is missing or was rejected by the server.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The request could not be carried to the server.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered with an error for this query.
    #[error("Remote error: {0}")]
    Remote(String),

    /// The server answer cannot be used to continue.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}
