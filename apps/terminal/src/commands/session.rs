//! # Session Commands
//!
//! Login, POS selection and logout.
//!
//! ## User Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  > login admin admin                                                    │
//! │  > configs                                                              │
//! │      1  POS Tầng 1     available                                        │
//! │      2  POS Tầng 2     mine          (resume)                           │
//! │      3  POS Bar        locked        Nguyễn Văn A                       │
//! │  > pos 2                                                                │
//! │      open_session ──► Catalog::load ──► session ready                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use bistro_gateway::{Catalog, Credentials, PosConfig, PosSession, SessionOwnership, UserInfo};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{GatewayState, Session, SessionState};

/// A POS config as shown in the config list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PosConfigView {
    pub id: i64,
    pub name: String,
    pub ownership: SessionOwnership,
    /// Who holds the open session, if anyone
    pub session_owner: Option<String>,
    pub stock_location: Option<String>,
}

impl PosConfigView {
    fn new(config: &PosConfig, uid: i64) -> Self {
        PosConfigView {
            id: config.id,
            name: config.name.clone(),
            ownership: config.ownership(uid),
            session_owner: config
                .session
                .as_ref()
                .filter(|s| !s.is_closed())
                .and_then(|s| s.user.as_ref())
                .map(|u| u.name.clone()),
            stock_location: config.stock_location.as_ref().map(|l| l.name.clone()),
        }
    }
}

/// Sizes of the loaded catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogCounts {
    pub products: usize,
    pub categories: usize,
    pub customers: usize,
    pub price_lists: usize,
    pub promotions: usize,
}

impl From<&Catalog> for CatalogCounts {
    fn from(catalog: &Catalog) -> Self {
        CatalogCounts {
            products: catalog.products.len(),
            categories: catalog.categories.len(),
            customers: catalog.customers.len(),
            price_lists: catalog.price_lists.len(),
            promotions: catalog.promotions.len(),
        }
    }
}

/// Response of `open_pos`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PosOpened {
    pub config: PosConfigView,
    pub session: PosSession,
    pub catalog: CatalogCounts,
}

/// Logs in against the backend.
pub async fn login(
    session: &SessionState,
    gateway: &GatewayState,
    credentials: Credentials,
) -> Result<UserInfo, ApiError> {
    debug!(username = %credentials.username, "login command");

    let user = gateway.inner().authenticate(&credentials).await?;
    session.with_session_mut(|s| s.user = Some(user.clone()));

    info!(uid = user.uid, name = %user.name, "Logged in");
    Ok(user)
}

/// Lists POS configs with their ownership for the current user.
pub async fn list_pos_configs(
    session: &SessionState,
    gateway: &GatewayState,
) -> Result<Vec<PosConfigView>, ApiError> {
    debug!("list_pos_configs command");

    let uid = session.with_session(Session::uid)?;
    let configs = gateway.inner().pos_configs().await?;
    Ok(configs.iter().map(|c| PosConfigView::new(c, uid)).collect())
}

/// Opens (or resumes) a POS session and loads its catalog.
///
/// ## Behavior
/// - Locked configs fail with `AUTH_ERROR` before any backend call
/// - Nothing is stored unless both the session and the catalog load succeed
/// - Switching to another config is refused while tables are occupied
pub async fn open_pos(
    session: &SessionState,
    gateway: &GatewayState,
    config_id: i64,
) -> Result<PosOpened, ApiError> {
    debug!(config_id, "open_pos command");

    let uid = session.with_session(|s| -> Result<i64, ApiError> {
        let uid = s.uid()?;
        let switching = s.pos_session.as_ref().map_or(false, |p| p.config_id != config_id);
        if switching && s.registry.summary().occupied > 0 {
            return Err(ApiError::validation(
                "Close all tables before switching to another POS",
            ));
        }
        Ok(uid)
    })?;

    let config = gateway
        .inner()
        .pos_configs()
        .await?
        .into_iter()
        .find(|c| c.id == config_id)
        .ok_or_else(|| ApiError::not_found("POS config", config_id))?;
    config.ensure_openable(uid)?;

    let pos_session = gateway.inner().open_session(config_id).await?;
    let catalog = Catalog::load(gateway.inner()).await?;

    let opened = PosOpened {
        config: PosConfigView::new(&config, uid),
        session: pos_session.clone(),
        catalog: CatalogCounts::from(&catalog),
    };

    session.with_session_mut(|s| {
        s.pos_config = Some(config);
        s.pos_session = Some(pos_session);
        s.catalog = catalog;
    });

    info!(
        config_id,
        session_id = opened.session.id,
        products = opened.catalog.products,
        "POS session opened"
    );
    Ok(opened)
}

/// Reloads the catalog; the previous one stays if any fetch fails.
pub async fn reload_catalog(
    session: &SessionState,
    gateway: &GatewayState,
) -> Result<CatalogCounts, ApiError> {
    debug!("reload_catalog command");

    session.with_session(Session::config_id)?;
    let catalog = Catalog::load(gateway.inner()).await?;
    let counts = CatalogCounts::from(&catalog);

    session.with_session_mut(|s| s.catalog = catalog);
    info!(products = counts.products, "Catalog reloaded");
    Ok(counts)
}

/// Logs out and resets every table.
pub async fn logout(session: &SessionState, gateway: &GatewayState) -> Result<(), ApiError> {
    debug!("logout command");

    gateway.inner().logout().await?;
    let fresh = Session::new(session.table_count())?;
    session.with_session_mut(|s| *s = fresh);

    info!("Logged out, floor reset");
    Ok(())
}
