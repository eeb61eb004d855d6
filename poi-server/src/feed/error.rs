//! Feed retrieval error types.

/// Errors that can occur when retrieving or decoding a data feed.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// Transport-level failure (connect, timeout, body read)
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status
    #[error("{url} failed: {status}\n{body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    /// Response body was not the JSON we expected
    #[error("JSON parse error from {url}: {message}")]
    Json { url: String, message: String },
}

impl FeedError {
    /// The URL (or feed path) that failed.
    pub fn url(&self) -> &str {
        match self {
            FeedError::Http { url, .. } | FeedError::Status { url, .. } | FeedError::Json { url, .. } => {
                url
            }
        }
    }

    /// HTTP status, when the server responded at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            FeedError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FeedError::Status {
            url: "http://localhost/restaurants".into(),
            status: 500,
            body: "boom".into(),
        };
        assert_eq!(err.to_string(), "http://localhost/restaurants failed: 500\nboom");
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.url(), "http://localhost/restaurants");

        let err = FeedError::Json {
            url: "/stations".into(),
            message: "expected value".into(),
        };
        assert!(err.to_string().contains("JSON parse error"));
        assert!(err.to_string().contains("expected value"));
        assert_eq!(err.status(), None);
    }
}
