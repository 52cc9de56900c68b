//! # Gateway Error Types
//!
//! Error types for everything that crosses the ERP boundary.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Gateway Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐  │
//! │  │  Configuration  │  │ Authentication  │  │     Backend             │  │
//! │  │                 │  │                 │  │                         │  │
//! │  │  InvalidConfig  │  │  NotAuthentic.  │  │  Unreachable            │  │
//! │  │  ConfigLoad...  │  │  AuthRejected   │  │  RemoteCall             │  │
//! │  │  ConfigSave...  │  │  SessionLocked  │  │  InvalidRecord          │  │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘  │
//! │                                                                         │
//! │  None of these ever reach into table or order state: a failed call     │
//! │  leaves whatever was loaded before untouched.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Gateway error type covering all backend failures.
///
/// ## Design Principles
/// - Each variant includes enough context for debugging
/// - Errors are categorized for different handling strategies
/// - All errors are `Send + Sync` for async compatibility
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid gateway configuration.
    #[error("Invalid gateway configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Authentication Errors
    // =========================================================================
    /// A call that needs a logged-in user was made before `authenticate`.
    #[error("Not logged in")]
    NotAuthenticated,

    /// The backend rejected the credentials.
    #[error("Wrong username or password")]
    AuthRejected,

    /// Another user holds the open session of this POS config.
    ///
    /// ## When This Occurs
    /// ```text
    /// Operator A opens "POS Bar"  ──► session owned by A
    ///                                      │
    /// Operator B opens "POS Bar"  ─────────┘
    ///      │
    ///      ▼
    /// SessionLocked { config_id, owner: "A" }
    /// ```
    #[error("POS config {config_id} is in use by {owner}")]
    SessionLocked { config_id: i64, owner: String },

    // =========================================================================
    // Backend Errors
    // =========================================================================
    /// The backend could not be reached at all.
    #[error("Backend unreachable: {0}")]
    Unreachable(String),

    /// A remote call failed on the backend side.
    #[error("Backend error ({model}.{method}): {message}")]
    RemoteCall {
        model: String,
        method: String,
        message: String,
    },

    /// A backend record could not be normalized.
    #[error("Invalid {model} record: {reason}")]
    InvalidRecord { model: String, reason: String },

    /// Requested record does not exist on the backend.
    #[error("{model} {id} not found")]
    NotFound { model: String, id: i64 },

    // =========================================================================
    // Internal Errors
    // =========================================================================
    /// Internal gateway error.
    #[error("Internal error: {0}")]
    Internal(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<std::io::Error> for GatewayError {
    fn from(err: std::io::Error) -> Self {
        GatewayError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for GatewayError {
    fn from(err: toml::de::Error) -> Self {
        GatewayError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for GatewayError {
    fn from(err: toml::ser::Error) -> Self {
        GatewayError::ConfigSaveFailed(err.to_string())
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::InvalidRecord {
            model: "json".to_string(),
            reason: err.to_string(),
        }
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl GatewayError {
    /// Shorthand for an `InvalidRecord` error.
    pub fn invalid(model: &str, reason: impl Into<String>) -> Self {
        GatewayError::InvalidRecord {
            model: model.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns true if retrying the same action may succeed.
    ///
    /// ## Retryable Errors
    /// - Network failures
    /// - Remote call errors (backend hiccups)
    ///
    /// ## Non-Retryable Errors
    /// - Configuration errors
    /// - Rejected credentials, locked sessions
    /// - Malformed records
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GatewayError::Unreachable(_) | GatewayError::RemoteCall { .. }
        )
    }
}
