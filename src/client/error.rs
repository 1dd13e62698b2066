// src/client/error.rs
use reqwest::StatusCode;

/// Failure of a single directory API call.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport failure: DNS, connection refused, timeout, broken body.
    #[error("{0}")]
    Network(#[source] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("HTTP error! status: {}", .status.as_u16())]
    Http { status: StatusCode },

    /// The body was not the JSON we expected.
    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ClientError {
    /// Label used for the `outcome` metric.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::Network(_) => "network_error",
            ClientError::Http { .. } => "http_error",
            ClientError::Decode(_) => "decode_error",
            ClientError::Url(_) => "url_error",
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}
