//! # API Error Type
//!
//! Unified error type for terminal commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Bistro POS                             │
//! │                                                                         │
//! │  Operator                    Rust Backend                               │
//! │  ────────                    ────────────                               │
//! │                                                                         │
//! │  > merge 3                                                              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌───────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                 │  │
//! │  │  Result<T, ApiError>                                              │  │
//! │  │         │                                                         │  │
//! │  │         ▼                                                         │  │
//! │  │  Gateway Error? ── GatewayError::Unreachable(..) ──┐              │  │
//! │  │         │                                          │              │  │
//! │  │         ▼                                          ▼              │  │
//! │  │  Table Error? ──── CoreError::InvalidTransition ── ApiError ───►│    │
//! │  │         │                                                         │  │
//! │  │         ▼                                                         │  │
//! │  │  Success ──────────────────────────────────────────────────────►│    │
//! │  └───────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ◄────────────────────────────────────────────────────────────────────  │
//! │                                                                         │
//! │  { "error": { "code": "INVALID_TRANSITION",                             │
//! │               "message": "Table 3: must be occupied to merge" } }       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use bistro_core::CoreError;
use bistro_gateway::GatewayError;
use serde::Serialize;

/// API error returned from terminal commands.
///
/// ## Serialization
/// This is what the operator sees when a command fails:
/// ```json
/// {
///   "code": "CHECKOUT_BLOCKED",
///   "message": "A customer must be selected before payment"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Table, product or record not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Table is not in the state the operation needs
    InvalidTransition,

    /// Order cannot be paid yet (empty, or no customer)
    CheckoutBlocked,

    /// Backend call failed
    GatewayError,

    /// Not logged in, wrong password or session in use
    AuthError,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// No table has been picked for ordering.
    pub fn no_active_table() -> Self {
        ApiError::validation("No table selected; use `use <table>` first")
    }

    /// No POS session has been opened.
    pub fn no_pos_session() -> Self {
        ApiError::new(ErrorCode::AuthError, "No POS session open; use `pos <config>` first")
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::TableNotFound(id) => ApiError::not_found("Table", id),
            CoreError::LineNotFound(id) => ApiError::not_found("Order line for product", id),
            CoreError::InvalidTransition { .. } => {
                ApiError::new(ErrorCode::InvalidTransition, err.to_string())
            }
            CoreError::CustomerRequired | CoreError::EmptyOrder => {
                ApiError::new(ErrorCode::CheckoutBlocked, err.to_string())
            }
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

/// Converts gateway errors to API errors.
impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::NotAuthenticated | GatewayError::AuthRejected => {
                ApiError::new(ErrorCode::AuthError, err.to_string())
            }
            GatewayError::SessionLocked { .. } => {
                ApiError::new(ErrorCode::AuthError, err.to_string())
            }
            GatewayError::NotFound { model, id } => ApiError::not_found(&model, id),
            GatewayError::Unreachable(e) => {
                tracing::warn!("Backend unreachable: {}", e);
                ApiError::new(ErrorCode::GatewayError, "Cannot reach the backend, try again")
            }
            GatewayError::RemoteCall {
                model,
                method,
                message,
            } => {
                // Log the actual error but return a generic message
                tracing::error!(%model, %method, "Backend call failed: {}", message);
                ApiError::new(ErrorCode::GatewayError, "Backend operation failed")
            }
            GatewayError::InvalidRecord { model, reason } => {
                tracing::error!(%model, "Invalid backend record: {}", reason);
                ApiError::new(ErrorCode::GatewayError, "Backend returned invalid data")
            }
            GatewayError::InvalidConfig(_)
            | GatewayError::ConfigLoadFailed(_)
            | GatewayError::ConfigSaveFailed(_) => ApiError::validation(err.to_string()),
            GatewayError::Internal(e) => {
                tracing::error!("Internal gateway error: {}", e);
                ApiError::internal("Gateway operation failed")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
