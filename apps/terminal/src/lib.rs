//! # Bistro Terminal Library
//!
//! The operator terminal: session controller, command handlers and the
//! console driver that feeds them.
//!
//! ## Module Organization
//! ```text
//! bistro_terminal_lib/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── console.rs      ◄─── Line parser and JSON console loop
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── session.rs  ◄─── Floor, catalog, user, active table
//! │   ├── gateway.rs  ◄─── Backend gateway wrapper
//! │   └── config.rs   ◄─── Terminal display settings
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── session.rs  ◄─── Login / POS / logout
//! │   ├── tables.rs   ◄─── Floor, merge and split
//! │   ├── order.rs    ◄─── Order edits
//! │   ├── payment.rs  ◄─── Quote and pay
//! │   └── history.rs  ◄─── Past orders
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## State Management
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ┌──────────────────┐ ┌──────────────────┐ ┌──────────────────────┐     │
//! │  │  SessionState    │ │  GatewayState    │ │  TerminalConfig      │     │
//! │  │                  │ │                  │ │                      │     │
//! │  │  • Table floor   │ │  • dyn Gateway   │ │  • Table count       │     │
//! │  │  • Catalog       │ │  • GatewayConfig │ │  • Currency display  │     │
//! │  │  • Active table  │ │                  │ │                      │     │
//! │  └──────────────────┘ └──────────────────┘ └──────────────────────┘     │
//! │                                                                         │
//! │  Each command takes only the state it needs.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod console;
pub mod error;
pub mod state;

use std::sync::Arc;

use bistro_gateway::{GatewayConfig, MockGateway};
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use console::Console;
use state::{GatewayState, SessionState, TerminalConfig};

/// Runs the terminal on stdin/stdout.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Terminal Startup                                  │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, written to stderr             │
/// │     • Default: info,bistro=debug, override with RUST_LOG                │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • TerminalConfig from BISTRO_* env                                  │
/// │     • GatewayConfig from gateway.toml + env                             │
/// │                                                                         │
/// │  3. Initialize State Objects ─────────────────────────────────────────► │
/// │     • SessionState: every table available                               │
/// │     • GatewayState: backend gateway                                     │
/// │                                                                         │
/// │  4. Auto Login (if BISTRO_USERNAME / BISTRO_PASSWORD are set) ────────► │
/// │                                                                         │
/// │  5. Console Loop until `quit` or end of input ────────────────────────► │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = TerminalConfig::from_env();
    let gateway_config = GatewayConfig::load_or_default(None);

    if !config.use_mock_gateway {
        return Err(format!(
            "No remote transport for {}; set BISTRO_MOCK_GATEWAY=1",
            gateway_config.backend.url
        )
        .into());
    }

    info!(
        tables = config.table_count,
        backend = "mock",
        history_days = gateway_config.session.history_days,
        "Starting Bistro terminal"
    );

    let session = SessionState::new(config.table_count)?;
    let gateway = GatewayState::new(Arc::new(MockGateway::new()), gateway_config);
    let console = Console::new(session, gateway, config);

    match console.auto_login().await {
        Ok(Some(user)) => info!(uid = user.uid, "Auto login succeeded"),
        Ok(None) => {}
        Err(e) => warn!(error = %e, "Auto login failed"),
    }

    console
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await?;
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=bistro_gateway=trace` - Trace the gateway only
/// - Default: `info,bistro=debug`
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,bistro=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
