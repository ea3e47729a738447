//! Error types for the law lookup library.
//!
//! Components return `LawError` through the `Result` alias. Only the service
//! layer turns these into human-readable `Error: ...` strings.

use thiserror::Error;

/// Main error type for the library.
#[derive(Debug, Error)]
pub enum LawError {
    /// Typed identifier without a `type:id` delimiter.
    #[error("Invalid ID format. Expected 'type:id' (e.g. statute:12345), got '{0}'")]
    InvalidIdFormat(String),

    /// Typed identifier with a type prefix that is not recognized.
    #[error("Unknown resource type '{0}'")]
    UnknownResourceType(String),

    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-success status.
    #[error("Law API returned status {status} for {target}")]
    HttpStatus { status: u16, target: String },

    /// All retry attempts failed.
    #[error("Request failed after {attempts} attempts: {message}")]
    RetriesExhausted { attempts: u32, message: String },

    /// Building the request URL failed.
    #[error("Invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// Response did not contain the expected element.
    #[error("Missing required element: {element} in {context}")]
    MissingElement { element: String, context: String },

    /// No document matched the request.
    #[error("{0} not found")]
    NotFound(String),

    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl LawError {
    /// Shorthand for a missing element in a response.
    pub fn missing(element: impl Into<String>, context: impl Into<String>) -> Self {
        Self::MissingElement {
            element: element.into(),
            context: context.into(),
        }
    }

    /// Whether the error came from the caller's input rather than from upstream.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidIdFormat(_) | Self::UnknownResourceType(_))
    }
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, LawError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LawError::InvalidIdFormat("12345".to_string());
        assert!(err.to_string().starts_with("Invalid ID format"));
        assert!(err.to_string().contains("12345"));
    }

    #[test]
    fn test_unknown_resource_type_display() {
        let err = LawError::UnknownResourceType("alien".to_string());
        assert_eq!(err.to_string(), "Unknown resource type 'alien'");
    }

    #[test]
    fn test_missing_element_display() {
        let err = LawError::missing("PrecService", "prec:123");
        assert_eq!(
            err.to_string(),
            "Missing required element: PrecService in prec:123"
        );
    }

    #[test]
    fn test_is_client_error() {
        assert!(LawError::InvalidIdFormat(String::new()).is_client_error());
        assert!(LawError::UnknownResourceType("x".into()).is_client_error());
        assert!(!LawError::NotFound("law".into()).is_client_error());
    }
}
