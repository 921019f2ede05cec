//! Error taxonomy shared by the fetcher, the aggregator and the CLI.

/// Result type for niche analysis operations
pub type Result<T> = std::result::Result<T, NicheError>;

/// Error types for niche analysis operations
#[derive(thiserror::Error, Debug)]
pub enum NicheError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("API quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid API credential: {0}")]
    InvalidCredential(String),

    /// Error payload returned by the API that is neither quota nor credential related.
    #[error("API error {status} ({reason}): {message}")]
    Api {
        status: u16,
        reason: String,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl NicheError {
    /// Whether re-running the same invocation later may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, NicheError::Transport(_) | NicheError::QuotaExceeded(_))
    }

    /// Short, user-facing advice for this error
    pub fn user_hint(&self) -> &'static str {
        match self {
            NicheError::InvalidInput(_) => {
                "Check the channel URL, channel id or search phrase and try again."
            }
            NicheError::NotFound(_) => "Nothing to show: no matching channel was found.",
            NicheError::Transport(_) => {
                "Could not reach the video platform. Check your connection and retry."
            }
            NicheError::QuotaExceeded(_) => {
                "The API quota for this key is exhausted. Wait for it to reset before retrying."
            }
            NicheError::InsufficientData(_) => "No data: the channel or topic has no analyzable videos.",
            NicheError::InvalidCredential(_) => "The API key was rejected. Check the key and its API access.",
            NicheError::Api { .. } => "The video platform rejected the request.",
            NicheError::Config(_) => "Fix the configuration file or environment overrides.",
            NicheError::Serialization(_) => "Try a different output format.",
        }
    }
}

impl From<reqwest::Error> for NicheError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            NicheError::Transport(format!("request timed out: {}", err))
        } else if err.is_connect() {
            NicheError::Transport(format!("connection failed: {}", err))
        } else if err.is_decode() {
            NicheError::Transport(format!("undecodable response body: {}", err))
        } else {
            NicheError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for NicheError {
    fn from(err: serde_json::Error) -> Self {
        NicheError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for NicheError {
    fn from(err: toml::de::Error) -> Self {
        NicheError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(NicheError::Transport("timeout".into()).is_retryable());
        assert!(NicheError::QuotaExceeded("daily".into()).is_retryable());
        assert!(!NicheError::InvalidInput("bad".into()).is_retryable());
        assert!(!NicheError::InsufficientData("empty".into()).is_retryable());
    }

    #[test]
    fn test_quota_hint_differs_from_input_hint() {
        let quota = NicheError::QuotaExceeded("x".into()).user_hint();
        let input = NicheError::InvalidInput("x".into()).user_hint();
        assert_ne!(quota, input);
        assert!(quota.contains("Wait"));
    }
}
