//! # State Module
//!
//! Manages application state for the operator terminal.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │          ┌──────────────────┬──────────────────┐                        │
//! │          ▼                  ▼                  ▼                        │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐               │
//! │  │ GatewayState │  │ SessionState │  │  TerminalConfig  │               │
//! │  │              │  │              │  │                  │               │
//! │  │ Arc<dyn      │  │  Arc<Mutex<  │  │  table_count     │               │
//! │  │   Gateway>   │  │    Session   │  │  currency        │               │
//! │  │ GatewayConfig│  │  >>          │  │                  │               │
//! │  └──────────────┘  └──────────────┘  └──────────────────┘               │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • GatewayState: implementations are Send + Sync                       │
//! │  • SessionState: Protected by Arc<Mutex<T>> for exclusive access       │
//! │  • TerminalConfig: Read-only after initialization                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod gateway;
mod session;

pub use config::TerminalConfig;
pub use gateway::GatewayState;
pub use session::{Session, SessionState};
