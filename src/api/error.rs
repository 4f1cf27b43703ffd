use std::fmt;

/// Maximum number of characters of a failed response body kept in `ApiError::Request`.
pub const ERROR_BODY_LIMIT: usize = 500;

/// Errors raised by the backend API client.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The request never completed: DNS, refused connection, timeout, TLS.
    Transport {
        url: String,
        base_url: String,
        message: String,
    },
    /// The server answered with a non-success status.
    Request { status: u16, body: String },
    /// A successful response whose body does not have the expected shape.
    Decode(String),
}

impl ApiError {
    pub fn request(status: u16, body: &str) -> Self {
        let body: String = body.chars().take(ERROR_BODY_LIMIT).collect();
        ApiError::Request { status, body }
    }

    /// HTTP status for `Request` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport {
                url,
                base_url,
                message,
            } => write!(
                f,
                "{message} - Network error while calling {url}. Resolved base URL '{base_url}'. \
                 Make sure the backend is reachable and QANDA_API_URL points at its address ending with /api/."
            ),
            ApiError::Request { status, body } => write!(f, "API {status}: {body}"),
            ApiError::Decode(msg) => write!(f, "unexpected response: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}
