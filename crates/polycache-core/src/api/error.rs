use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Too many symbols: {count} (at most {max} per request)")]
    TooManySymbols { count: usize, max: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Failed to decode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    pub fn from_status(status: u16, body: &str) -> Self {
        ApiError::Status {
            status,
            body: Self::truncate_body(body),
        }
    }

    /// HTTP status code, for errors that carry one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_keeps_code() {
        let err = ApiError::from_status(403, "forbidden");
        assert_eq!(err.status(), Some(403));
        assert_eq!(err.to_string(), "HTTP 403: forbidden");
    }

    #[test]
    fn test_long_body_is_truncated() {
        let body = "x".repeat(2000);
        let err = ApiError::from_status(500, &body);
        match err {
            ApiError::Status { body, .. } => {
                assert!(body.starts_with(&"x".repeat(500)));
                assert!(body.ends_with("(truncated, 2000 total bytes)"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let body = "é".repeat(400);
        let err = ApiError::from_status(502, &body);
        assert!(err.to_string().contains("truncated, 800 total bytes"));
    }

    #[test]
    fn test_not_found() {
        assert!(ApiError::from_status(404, "").is_not_found());
        assert!(!ApiError::InvalidResponse("x".into()).is_not_found());
    }
}
