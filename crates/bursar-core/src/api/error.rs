use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Unauthorized - access token rejected")]
    Unauthorized,

    #[error("Session expired - please log in again")]
    SessionExpired,

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Message shown when a login rejection carries no usable server message
const LOGIN_FALLBACK_MESSAGE: &str = "Login failed - check your credentials";

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            // The cut may land inside a multi-byte character; back up to
            // a boundary before slicing.
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)",
                    &body[..end],
                    body.len())
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(truncated),
            404 => ApiError::NotFound(truncated),
            500..=599 => ApiError::ServerError(truncated),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }

    /// Build the error for a rejected login, preferring the message the
    /// backend put in the payload (`error` or `detail`) over the fallback.
    pub fn login_rejection(body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                value
                    .get("error")
                    .or_else(|| value.get("detail"))
                    .and_then(|field| field.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| LOGIN_FALLBACK_MESSAGE.to_string());
        ApiError::InvalidCredentials(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_mapping() {
        let unauthorized = ApiError::from_status(reqwest::StatusCode::UNAUTHORIZED, "nope");
        assert!(matches!(unauthorized, ApiError::Unauthorized));

        let denied = ApiError::from_status(reqwest::StatusCode::FORBIDDEN, "staff only");
        assert!(matches!(denied, ApiError::AccessDenied(msg) if msg == "staff only"));

        let missing = ApiError::from_status(reqwest::StatusCode::NOT_FOUND, "no such due");
        assert!(matches!(missing, ApiError::NotFound(_)));

        let server = ApiError::from_status(reqwest::StatusCode::BAD_GATEWAY, "upstream down");
        assert!(matches!(server, ApiError::ServerError(_)));

        let other = ApiError::from_status(reqwest::StatusCode::IM_A_TEAPOT, "{}");
        assert!(matches!(other, ApiError::InvalidResponse(msg) if msg.contains("418")));
    }

    #[test]
    fn test_truncate_body_limits_length() {
        let long_body = "x".repeat(2000);
        let error = ApiError::from_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR, &long_body);
        let ApiError::ServerError(message) = error else {
            panic!("expected ServerError");
        };
        assert!(message.len() < 600);
        assert!(message.contains("truncated"));
        assert!(message.contains("2000 total bytes"));
    }

    #[test]
    fn test_truncate_body_respects_char_boundaries() {
        // A three-byte character straddles the truncation point.
        let mut body = "x".repeat(499);
        body.push('ह');
        body.push_str(&"y".repeat(98));
        assert_eq!(body.len(), 600);

        let error = ApiError::from_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR, &body);
        let ApiError::ServerError(message) = error else {
            panic!("expected ServerError");
        };
        assert!(message.starts_with(&"x".repeat(499)));
        assert!(!message.contains('ह'));
        assert!(message.contains("600 total bytes"));
    }

    #[test]
    fn test_login_rejection_prefers_server_message() {
        let error = ApiError::login_rejection(r#"{"error": "Invalid credentials"}"#);
        assert!(matches!(error, ApiError::InvalidCredentials(msg) if msg == "Invalid credentials"));

        let detail = ApiError::login_rejection(r#"{"detail": "This account is not a staff account"}"#);
        assert!(
            matches!(detail, ApiError::InvalidCredentials(msg) if msg.contains("not a staff account"))
        );
    }

    #[test]
    fn test_login_rejection_falls_back_on_junk() {
        let error = ApiError::login_rejection("<html>gateway timeout</html>");
        assert!(matches!(error, ApiError::InvalidCredentials(msg) if msg == LOGIN_FALLBACK_MESSAGE));

        let empty = ApiError::login_rejection(r#"{"roll_number": ["This field is required."]}"#);
        assert!(matches!(empty, ApiError::InvalidCredentials(msg) if msg == LOGIN_FALLBACK_MESSAGE));
    }
}
