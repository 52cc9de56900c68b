//! # Session State
//!
//! Everything the operator works on between login and logout: the floor,
//! the loaded catalog, the picked table and any merge/split selection.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  login ──► user set                                                     │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  pos <config> ──► pos_session + catalog set (only if both succeed)      │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  open / use / add / merge / pay ...  (registry + active_table)          │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  logout ──► Session::new(table_count)  (every table available again)    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Thread Safety
//! The session is wrapped in `Arc<Mutex<Session>>`. The lock is never held
//! across a gateway call: commands await the backend first, then lock and
//! apply the result.

use std::sync::{Arc, Mutex};

use bistro_core::{CoreResult, Order, TableId, TableRegistry, TableSelection};
use bistro_gateway::{Catalog, PosConfig, PosSession, UserInfo};

use crate::error::ApiError;

/// One operator's working state.
#[derive(Debug, Clone)]
pub struct Session {
    /// The floor
    pub registry: TableRegistry,

    /// Catalog snapshot of the open POS session
    pub catalog: Catalog,

    /// Logged-in user
    pub user: Option<UserInfo>,

    /// POS config the session belongs to
    pub pos_config: Option<PosConfig>,

    /// Open backend POS session
    pub pos_session: Option<PosSession>,

    /// Table whose order is being edited
    pub active_table: Option<TableId>,

    /// Merge/split selection in progress
    pub selection: Option<TableSelection>,
}

impl Session {
    /// Creates a session with every table available.
    pub fn new(table_count: u32) -> CoreResult<Self> {
        Ok(Session {
            registry: TableRegistry::new(table_count)?,
            catalog: Catalog::default(),
            user: None,
            pos_config: None,
            pos_session: None,
            active_table: None,
            selection: None,
        })
    }

    /// The logged-in user's id.
    pub fn uid(&self) -> Result<i64, ApiError> {
        self.user
            .as_ref()
            .map(|u| u.uid)
            .ok_or_else(|| ApiError::from(bistro_gateway::GatewayError::NotAuthenticated))
    }

    /// Config id of the open POS session.
    pub fn config_id(&self) -> Result<i64, ApiError> {
        self.pos_session
            .as_ref()
            .map(|s| s.config_id)
            .ok_or_else(ApiError::no_pos_session)
    }

    /// The active table id.
    pub fn active(&self) -> Result<TableId, ApiError> {
        self.active_table.ok_or_else(ApiError::no_active_table)
    }

    /// Order of the active table (a merge secondary resolves to its primary).
    pub fn active_order(&self) -> Result<&Order, ApiError> {
        let id = self.active()?;
        Ok(self.registry.order(id)?)
    }

    /// Mutable order of the active table.
    pub fn active_order_mut(&mut self) -> Result<&mut Order, ApiError> {
        let id = self.active()?;
        Ok(self.registry.order_mut(id)?)
    }

    /// Forgets the active table if it is one of `freed`.
    pub fn forget_active_if(&mut self, freed: &[TableId]) {
        if self.active_table.map_or(false, |id| freed.contains(&id)) {
            self.active_table = None;
        }
    }
}

/// Thread-safe session state.
///
/// ## Why Arc<Mutex<T>>?
/// - `Arc`: shared between the console loop and any spawned task
/// - `Mutex`: exclusive access for mutations
#[derive(Debug, Clone)]
pub struct SessionState {
    session: Arc<Mutex<Session>>,
    table_count: u32,
}

impl SessionState {
    /// Creates a new session state with `table_count` tables.
    pub fn new(table_count: u32) -> CoreResult<Self> {
        Ok(SessionState {
            session: Arc::new(Mutex::new(Session::new(table_count)?)),
            table_count,
        })
    }

    pub fn table_count(&self) -> u32 {
        self.table_count
    }

    /// Executes a function with read access to the session.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let floor = session_state.with_session(|s| s.registry.views());
    /// ```
    pub fn with_session<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Session) -> R,
    {
        let session = self.session.lock().expect("Session mutex poisoned");
        f(&session)
    }

    /// Executes a function with write access to the session.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// session_state.with_session_mut(|s| s.registry.open(3))?;
    /// ```
    pub fn with_session_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Session) -> R,
    {
        let mut session = self.session.lock().expect("Session mutex poisoned");
        f(&mut session)
    }
}
