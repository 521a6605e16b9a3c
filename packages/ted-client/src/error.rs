use thiserror::Error;

pub type Result<T> = std::result::Result<T, TedError>;

#[derive(Debug, Error)]
pub enum TedError {
    /// Transport-level failure (timeout, connection error, bad TLS, ...).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API rejected the request with 429 Too Many Requests.
    #[error("rate limited by the TED API")]
    RateLimited,

    /// Any other non-success status from the API.
    #[error("TED API error {status}: {message}")]
    Api { status: u16, message: String },
}
