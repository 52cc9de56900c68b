//! # Commands Module
//!
//! All operations the console exposes to the operator.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── session.rs  ◄─── Login, POS selection, catalog reload, logout
//! ├── tables.rs   ◄─── Floor view, open/close, guests, merge/split selection
//! ├── order.rs    ◄─── Product search, lines, discounts, customer/price list
//! ├── payment.rs  ◄─── Quote and pay
//! └── history.rs  ◄─── Past orders of the open POS
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  > add 7                                                                │
//! │         │                                                               │
//! │         │ (console::Command::from_str)                                  │
//! │         ▼                                                               │
//! │  commands::order::add_product(                                          │
//! │      &SessionState,      ◄── only the state it needs                    │
//! │      product_id: 7,                                                     │
//! │  ) -> Result<OrderResponse, ApiError>                                   │
//! │         │                                                               │
//! │         │ (JSON serialization)                                          │
//! │         ▼                                                               │
//! │  stdout: { "tableId": 3, "order": {...}, "totals": {...} }              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands that talk to the backend are `async` and never hold the
//! session lock across an `.await`: they call the gateway first and apply
//! the result only when it succeeded.

pub mod history;
pub mod order;
pub mod payment;
pub mod session;
pub mod tables;

#[cfg(test)]
pub(crate) mod test_support {
    use bistro_gateway::Credentials;

    use crate::state::{GatewayState, SessionState};

    pub fn admin() -> Credentials {
        Credentials {
            database: "bistro".to_string(),
            username: "admin".to_string(),
            password: "admin".to_string(),
        }
    }

    /// Admin logged in with POS 1 open and the catalog loaded.
    pub async fn ready() -> (SessionState, GatewayState) {
        let session = SessionState::new(16).unwrap();
        let gateway = GatewayState::mock();
        super::session::login(&session, &gateway, admin()).await.unwrap();
        super::session::open_pos(&session, &gateway, 1).await.unwrap();
        (session, gateway)
    }

    /// Like `ready`, with `table` opened and active.
    pub async fn at_table(table: u32) -> (SessionState, GatewayState) {
        let (session, gateway) = ready().await;
        super::tables::open_table(&session, table).unwrap();
        super::tables::use_table(&session, table).unwrap();
        (session, gateway)
    }
}
