//! # Gateway Trait
//!
//! The seam between the POS and its ERP backend.
//!
//! ## Call Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  authenticate(credentials) ──► UserInfo                                 │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  pos_configs() ──► [PosConfig] ──► ownership(uid)                       │
//! │        │                             Available / Mine / Locked          │
//! │        ▼                                                                │
//! │  open_session(config_id) ──► PosSession    (Locked → SessionLocked)     │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  products / categories / customers / price_lists / promotions           │
//! │        │             (loaded together by Catalog::load)                 │
//! │        ▼                                                                │
//! │  ... operator works on tables (no gateway calls) ...                    │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  submit_order(CompletedOrder)          order_history / order_lines      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Implementations return typed, normalized records; loosely-typed backend
//! payloads never leave the implementation (see [`crate::normalize`]).

use async_trait::async_trait;
use bistro_core::{CompletedOrder, Ref};
use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogProduct, Category, Customer, PriceList, Promotion};
use crate::error::{GatewayError, GatewayResult};
use crate::history::{HistoryLine, HistoryOrder};

// =============================================================================
// Identity
// =============================================================================

/// Login credentials.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub database: String,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// The logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub uid: i64,
    pub name: String,
    pub login: String,
    pub email: Option<String>,
}

// =============================================================================
// POS Configs and Sessions
// =============================================================================

/// An open (or opening) POS session on the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosSession {
    pub id: i64,
    pub name: String,
    /// Backend state, e.g. `opened`, `closing_control`, `closed`.
    pub state: String,
    pub config_id: i64,
    pub user: Option<Ref>,
}

impl PosSession {
    pub fn is_closed(&self) -> bool {
        self.state == "closed"
    }
}

/// Who may use a POS config right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOwnership {
    /// No open session; opening creates one.
    Available,
    /// The current user already has the open session.
    Mine,
    /// Someone else has the open session.
    Locked,
}

/// A point-of-sale configuration (one per counter/floor).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosConfig {
    pub id: i64,
    pub name: String,
    pub stock_location: Option<Ref>,
    /// Current non-closed session, if any.
    pub session: Option<PosSession>,
}

impl PosConfig {
    /// Ownership of this config from the point of view of `uid`.
    pub fn ownership(&self, uid: i64) -> SessionOwnership {
        match &self.session {
            Some(session) if !session.is_closed() => match &session.user {
                Some(user) if user.id == uid => SessionOwnership::Mine,
                _ => SessionOwnership::Locked,
            },
            _ => SessionOwnership::Available,
        }
    }

    /// Fails with `SessionLocked` if another user holds the session.
    pub fn ensure_openable(&self, uid: i64) -> GatewayResult<()> {
        if self.ownership(uid) == SessionOwnership::Locked {
            let owner = self
                .session
                .as_ref()
                .and_then(|s| s.user.as_ref())
                .map(|u| u.name.clone())
                .unwrap_or_else(|| "another user".to_string());
            return Err(GatewayError::SessionLocked {
                config_id: self.id,
                owner,
            });
        }
        Ok(())
    }
}

// =============================================================================
// Gateway Trait
// =============================================================================

/// Everything the POS needs from the ERP backend.
///
/// All methods except `authenticate` fail with `NotAuthenticated` until a
/// login has succeeded.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> GatewayResult<UserInfo>;

    /// Forgets the logged-in user.
    async fn logout(&self) -> GatewayResult<()>;

    async fn pos_configs(&self) -> GatewayResult<Vec<PosConfig>>;

    /// Returns the open session of a config, creating one if needed.
    async fn open_session(&self, config_id: i64) -> GatewayResult<PosSession>;

    async fn products(&self) -> GatewayResult<Vec<CatalogProduct>>;

    async fn categories(&self) -> GatewayResult<Vec<Category>>;

    async fn customers(&self) -> GatewayResult<Vec<Customer>>;

    async fn price_lists(&self) -> GatewayResult<Vec<PriceList>>;

    async fn promotions(&self) -> GatewayResult<Vec<Promotion>>;

    /// Orders of a config from midnight `days` ago, newest first.
    async fn order_history(&self, config_id: i64, days: u32) -> GatewayResult<Vec<HistoryOrder>>;

    async fn order_lines(&self, line_ids: &[i64]) -> GatewayResult<Vec<HistoryLine>>;

    /// Persists a paid order; returns the backend order id.
    async fn submit_order(&self, order: &CompletedOrder) -> GatewayResult<i64>;
}
