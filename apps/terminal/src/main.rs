//! # Bistro Terminal Entry Point
//!
//! ## Application Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bistro Terminal                                  │
//! │                                                                         │
//! │  stdin ──► console (lib.rs) ──► commands/ ──► bistro-core (floor,       │
//! │                                     │          orders, pricing)         │
//! │                                     ▼                                   │
//! │                              bistro-gateway ──► backend (mock)          │
//! │                                                                         │
//! │  stdout ◄── JSON responses          stderr ◄── tracing logs             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // The actual setup is in lib.rs for better testability
    bistro_terminal_lib::run().await
}
