//! # bistro-gateway: ERP Boundary for Bistro POS
//!
//! Everything the POS needs from its ERP backend, expressed as typed
//! records. Table and order state never depends on anything in here: a
//! gateway failure surfaces as an error and leaves local state untouched.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ERP backend ──► raw records (serde_json::Value)                       │
//! │                          │                                              │
//! │                          ▼                                              │
//! │                    normalize::*      many2one → Ref, false → None,      │
//! │                          │           floats → exact Decimal             │
//! │                          ▼                                              │
//! │                 typed records ──► Catalog / PosConfig / HistoryOrder    │
//! │                                                                         │
//! │   CompletedOrder (bistro-core) ──► Gateway::submit_order                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`gateway`] - The `Gateway` trait and identity/session records
//! - [`normalize`] - Raw backend record conversion
//! - [`catalog`] - Catalog snapshot and product search
//! - [`history`] - Read-only order history
//! - [`config`] - Gateway configuration (TOML + env)
//! - [`mock`] - In-memory backend
//! - [`error`] - Gateway error types
//!
//! ## Example
//! ```no_run
//! use bistro_gateway::{Catalog, Credentials, Gateway, MockGateway};
//!
//! # async fn run() -> bistro_gateway::GatewayResult<()> {
//! let gateway = MockGateway::new();
//! let user = gateway
//!     .authenticate(&Credentials {
//!         database: "bistro".into(),
//!         username: "admin".into(),
//!         password: "admin".into(),
//!     })
//!     .await?;
//! gateway.open_session(1).await?;
//! let catalog = Catalog::load(&gateway).await?;
//! println!("{} sees {} products", user.name, catalog.products.len());
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod gateway;
pub mod history;
pub mod mock;
pub mod normalize;

pub use catalog::{Catalog, CatalogProduct, Category, Customer, PriceList, Promotion};
pub use config::{BackendSettings, GatewayConfig, SessionSettings};
pub use error::{GatewayError, GatewayResult};
pub use gateway::{Credentials, Gateway, PosConfig, PosSession, SessionOwnership, UserInfo};
pub use history::{history_since, HistoryLine, HistoryOrder, HistoryState};
pub use mock::{MockGateway, MockOperation};
