use std::sync::Arc;

use bistro_gateway::{Gateway, GatewayConfig, MockGateway};

/// Wrapper around the backend gateway and its settings.
///
/// ## Why a Wrapper?
/// Commands only see `&dyn Gateway`, so the mock and any remote
/// implementation are interchangeable.
#[derive(Clone)]
pub struct GatewayState {
    gateway: Arc<dyn Gateway>,
    config: GatewayConfig,
}

impl GatewayState {
    /// Creates a GatewayState wrapping `gateway`.
    pub fn new(gateway: Arc<dyn Gateway>, config: GatewayConfig) -> Self {
        GatewayState { gateway, config }
    }

    /// In-memory backend with default settings.
    pub fn mock() -> Self {
        GatewayState::new(Arc::new(MockGateway::new()), GatewayConfig::default())
    }

    /// Returns a reference to the inner gateway.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let configs = gateway_state.inner().pos_configs().await?;
    /// ```
    pub fn inner(&self) -> &dyn Gateway {
        self.gateway.as_ref()
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("backend", &self.config.backend.url)
            .finish()
    }
}
