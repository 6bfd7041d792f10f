/// Maximum length of a response body quoted in an error message.
pub const MAX_ERROR_BODY: usize = 200;

/// Error type for backend operations
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("not connected")]
    NotConnected,
}

impl ClientError {
    /// Build an API error from a non-success response, shortening the body.
    pub fn api(status: u16, body: &str) -> Self {
        ClientError::Api {
            status,
            body: truncate_error(body, MAX_ERROR_BODY),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }
}

/// Collapse whitespace runs (including newlines) to single spaces, then cut to
/// `max` characters followed by `...`.
pub fn truncate_error(s: &str, max: usize) -> String {
    let collapsed = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max {
        return collapsed;
    }
    let mut out: String = collapsed.chars().take(max).collect();
    out.push_str("...");
    out
}
