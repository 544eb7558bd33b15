use thiserror::Error;

pub use anyhow::Context;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    /// Network failure or non-success status. `url` never carries the API key.
    #[error("{}", describe_transport(.status, .status_text, .url, .message))]
    Transport {
        status: Option<u16>,
        status_text: Option<String>,
        url: String,
        message: String,
    },
    #[error("request canceled")]
    Canceled,
    #[error("{0}")]
    Parse(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn message<T: Into<String>>(msg: T) -> Self {
        AppError::Message(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn parse<T: Into<String>>(msg: T) -> Self {
        AppError::Parse(msg.into())
    }

    pub fn is_canceled(&self) -> bool {
        matches!(self, AppError::Canceled)
    }
}

fn describe_transport(
    status: &Option<u16>,
    status_text: &Option<String>,
    url: &str,
    message: &str,
) -> String {
    match (status, status_text) {
        (Some(code), Some(text)) => format!("Request to {url} failed with status {code} {text}"),
        (Some(code), None) => format!("Request to {url} failed with status {code}"),
        _ => format!("Request to {url} failed: {message}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_message_prefers_status() {
        let err = AppError::Transport {
            status: Some(503),
            status_text: Some("Service Unavailable".to_string()),
            url: "https://example.test/query?apikey=REDACTED".to_string(),
            message: String::new(),
        };
        assert_eq!(
            err.to_string(),
            "Request to https://example.test/query?apikey=REDACTED failed with status 503 Service Unavailable"
        );
    }

    #[test]
    fn parse_errors_display_verbatim() {
        assert_eq!(AppError::parse("rate limited").to_string(), "rate limited");
        assert!(AppError::Canceled.is_canceled());
        assert!(!AppError::parse("x").is_canceled());
    }
}
