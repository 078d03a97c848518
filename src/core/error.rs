//! Typed error handling for the admin client
//!
//! Every remote call and every client-side check reports through
//! [`AdminError`], so callers can match on the failure category instead of
//! inspecting strings.
//!
//! # Error Categories
//!
//! - [`NetworkError`]: the request could not complete
//! - [`HttpError`]: the backend answered with a non-2xx status
//! - [`ValidationError`]: a form failed client-side checks
//! - [`TransitionError`]: an order status change the transition table forbids
//! - [`DecodeError`]: a 2xx body did not match the expected shape
//! - [`ConfigError`]: configuration could not be loaded
//!
//! # Example
//!
//! ```rust,ignore
//! match controller.advance(&session, "ord_1").await {
//!     Ok(outcome) => println!("email sent: {}", outcome.email_sent),
//!     Err(AdminError::Http(e)) if e.status == 401 => println!("session expired"),
//!     Err(e) => eprintln!("operation failed: {}", e),
//! }
//! ```

use crate::core::status::OrderStatus;
use std::collections::BTreeMap;
use std::fmt;

/// The main error type for the admin client
#[derive(Debug)]
pub enum AdminError {
    /// Request could not complete (connect, timeout, body read)
    Network(NetworkError),

    /// Non-2xx response from the backend
    Http(HttpError),

    /// Client-side form validation failure
    Validation(ValidationError),

    /// Status change rejected by the transition table before sending
    Transition(TransitionError),

    /// Successful response with an unexpected body
    Decode(DecodeError),

    /// Configuration errors
    Config(ConfigError),

    /// Local lookup failed (record is not in the displayed set)
    NotFound { resource: String, id: String },
}

impl fmt::Display for AdminError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdminError::Network(e) => write!(f, "{}", e),
            AdminError::Http(e) => write!(f, "{}", e),
            AdminError::Validation(e) => write!(f, "{}", e),
            AdminError::Transition(e) => write!(f, "{}", e),
            AdminError::Decode(e) => write!(f, "{}", e),
            AdminError::Config(e) => write!(f, "{}", e),
            AdminError::NotFound { resource, id } => {
                write!(f, "{} with id '{}' not found", resource, id)
            }
        }
    }
}

impl std::error::Error for AdminError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AdminError::Network(e) => Some(e),
            AdminError::Http(e) => Some(e),
            AdminError::Validation(e) => Some(e),
            AdminError::Transition(e) => Some(e),
            AdminError::Decode(e) => Some(e),
            AdminError::Config(e) => Some(e),
            AdminError::NotFound { .. } => None,
        }
    }
}

impl AdminError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AdminError::Network(_) => "NETWORK_FAILURE",
            AdminError::Http(e) => e.error_code(),
            AdminError::Validation(_) => "VALIDATION_FAILURE",
            AdminError::Transition(_) => "INVALID_TRANSITION",
            AdminError::Decode(_) => "DECODE_ERROR",
            AdminError::Config(_) => "CONFIG_ERROR",
            AdminError::NotFound { .. } => "NOT_FOUND",
        }
    }

    /// Whether re-triggering the same action might succeed
    ///
    /// Nothing is retried automatically; this only informs the caller.
    pub fn is_retryable(&self) -> bool {
        match self {
            AdminError::Network(_) => true,
            AdminError::Http(e) => e.status >= 500 || e.status == 429,
            _ => false,
        }
    }

    /// Shorthand for a local lookup failure
    pub fn not_found(resource: &str, id: &str) -> Self {
        AdminError::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }
}

// =============================================================================
// Network Errors
// =============================================================================

/// The request never produced a response
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("could not connect to backend: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Transport(String),
}

impl From<NetworkError> for AdminError {
    fn from(err: NetworkError) -> Self {
        AdminError::Network(err)
    }
}

// =============================================================================
// HTTP Errors
// =============================================================================

/// Non-2xx response from the backend
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("backend returned {status}: {message}")]
pub struct HttpError {
    /// HTTP status code
    pub status: u16,
    /// Message from the response body, or the canonical reason phrase
    pub message: String,
}

impl HttpError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self.status {
            400 => "BAD_REQUEST",
            401 => "UNAUTHORIZED",
            403 => "FORBIDDEN",
            404 => "NOT_FOUND",
            409 => "CONFLICT",
            422 => "UNPROCESSABLE_ENTITY",
            429 => "RATE_LIMITED",
            500..=599 => "SERVER_ERROR",
            _ => "HTTP_ERROR",
        }
    }
}

impl From<HttpError> for AdminError {
    fn from(err: HttpError) -> Self {
        AdminError::Http(err)
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Client-side validation failures
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Single field error
    #[error("validation error on '{field}': {message}")]
    FieldError { field: String, message: String },

    /// Multiple field errors, keyed by field name
    #[error("validation failed: {}", format_field_errors(.0))]
    FieldErrors(BTreeMap<String, Vec<String>>),

    /// An edit was submitted without a record identity
    #[error("missing identity for {0}")]
    MissingIdentity(String),
}

fn format_field_errors(errors: &BTreeMap<String, Vec<String>>) -> String {
    errors
        .iter()
        .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<ValidationError> for AdminError {
    fn from(err: ValidationError) -> Self {
        AdminError::Validation(err)
    }
}

impl From<validator::ValidationErrors> for AdminError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let messages = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();
        AdminError::Validation(ValidationError::FieldErrors(fields))
    }
}

// =============================================================================
// Transition Errors
// =============================================================================

/// A status change the transition table does not allow
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("order status {0} is terminal")]
    Terminal(OrderStatus),

    #[error("cannot move order from {from} to {to}; next allowed status is {allowed}")]
    NotAllowed {
        from: OrderStatus,
        to: OrderStatus,
        allowed: OrderStatus,
    },
}

impl From<TransitionError> for AdminError {
    fn from(err: TransitionError) -> Self {
        AdminError::Transition(err)
    }
}

// =============================================================================
// Decode Errors
// =============================================================================

/// A 2xx response whose body did not match the expected shape
#[derive(Debug, thiserror::Error)]
#[error("failed to decode {context}: {message}")]
pub struct DecodeError {
    pub context: String,
    pub message: String,
}

impl From<DecodeError> for AdminError {
    fn from(err: DecodeError) -> Self {
        AdminError::Decode(err)
    }
}

impl From<serde_json::Error> for AdminError {
    fn from(err: serde_json::Error) -> Self {
        AdminError::Decode(DecodeError {
            context: "json".to_string(),
            message: err.to_string(),
        })
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {message}")]
    Read { path: String, message: String },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid config value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<ConfigError> for AdminError {
    fn from(err: ConfigError) -> Self {
        AdminError::Config(err)
    }
}

impl From<serde_yaml::Error> for AdminError {
    fn from(err: serde_yaml::Error) -> Self {
        AdminError::Config(ConfigError::Parse(err.to_string()))
    }
}

// =============================================================================
// reqwest conversion
// =============================================================================

impl From<reqwest::Error> for AdminError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return AdminError::Http(HttpError::new(status.as_u16(), err.to_string()));
        }
        if err.is_decode() {
            return AdminError::Decode(DecodeError {
                context: "response body".to_string(),
                message: err.to_string(),
            });
        }
        if err.is_timeout() {
            return AdminError::Network(NetworkError::Timeout(err.to_string()));
        }
        if err.is_connect() {
            return AdminError::Network(NetworkError::Connect(err.to_string()));
        }
        AdminError::Network(NetworkError::Transport(err.to_string()))
    }
}

/// Result alias used across the crate
pub type AdminResult<T> = std::result::Result<T, AdminError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_display() {
        let err = AdminError::Http(HttpError::new(400, "Invalid status transition"));
        assert_eq!(
            err.to_string(),
            "backend returned 400: Invalid status transition"
        );
        assert_eq!(err.error_code(), "BAD_REQUEST");
    }

    #[test]
    fn test_retryable_classification() {
        assert!(AdminError::Network(NetworkError::Timeout("30s".into())).is_retryable());
        assert!(AdminError::Http(HttpError::new(503, "unavailable")).is_retryable());
        assert!(!AdminError::Http(HttpError::new(400, "bad")).is_retryable());
        assert!(!AdminError::not_found("zone", "z1").is_retryable());
    }

    #[test]
    fn test_field_errors_display() {
        let mut fields = BTreeMap::new();
        fields.insert("name".to_string(), vec!["Zone name is required".to_string()]);
        let err = AdminError::Validation(ValidationError::FieldErrors(fields));
        assert_eq!(
            err.to_string(),
            "validation failed: name: Zone name is required"
        );
        assert_eq!(err.error_code(), "VALIDATION_FAILURE");
    }

    #[test]
    fn test_transition_error_display() {
        let err: AdminError = TransitionError::Terminal(OrderStatus::Delivered).into();
        assert_eq!(err.to_string(), "order status DELIVERED is terminal");
    }

    #[test]
    fn test_not_found_has_no_source() {
        use std::error::Error;
        let err = AdminError::not_found("order", "abc");
        assert!(err.source().is_none());
        assert_eq!(err.to_string(), "order with id 'abc' not found");
    }
}
