//! # Mock Gateway
//!
//! In-memory backend seeded with a small restaurant: four POS configs,
//! twelve products and a few days of order history.
//!
//! Seed records are kept in the backend's raw shape and go through
//! [`crate::normalize`] on every read, so the mock exercises the same
//! conversion path as a real transport.
//!
//! ## Seeded POS Configs
//! ```text
//! ┌────┬──────────────┬──────────────────────────────┐
//! │ id │ name         │ session                      │
//! ├────┼──────────────┼──────────────────────────────┤
//! │ 1  │ POS Tầng 1   │ none                         │
//! │ 2  │ POS Tầng 2   │ POS/0020, Admin (uid 2)      │
//! │ 3  │ POS Bar      │ POS/0030, Nguyễn Văn A (6)   │
//! │ 4  │ POS Sân vườn │ none                         │
//! └────┴──────────────┴──────────────────────────────┘
//! ```
//!
//! Logins: `admin` / `admin` (uid 2) and `nva` / `nva` (uid 6).

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use bistro_core::{CompletedOrder, DiscountKind, Money};
use chrono::{Duration, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::catalog::{CatalogProduct, Category, Customer, PriceList, Promotion};
use crate::error::{GatewayError, GatewayResult};
use crate::gateway::{Credentials, Gateway, PosConfig, PosSession, UserInfo};
use crate::history::{history_since, HistoryLine, HistoryOrder};
use crate::normalize::{self, DATETIME_FORMAT};

/// Gateway calls that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOperation {
    Authenticate,
    PosConfigs,
    OpenSession,
    Products,
    Categories,
    Customers,
    PriceLists,
    Promotions,
    OrderHistory,
    OrderLines,
    SubmitOrder,
}

struct MockUser {
    uid: i64,
    login: &'static str,
    password: &'static str,
    record: Value,
}

struct MockState {
    uid: Option<i64>,
    failures: HashSet<MockOperation>,
    configs: Vec<Value>,
    sessions: Vec<Value>,
    orders: Vec<Value>,
    lines: Vec<Value>,
    submitted: Vec<CompletedOrder>,
    open_config: Option<i64>,
    next_session_id: i64,
    next_order_id: i64,
}

/// In-memory [`Gateway`] implementation.
pub struct MockGateway {
    users: Vec<MockUser>,
    products: Vec<Value>,
    categories: Vec<Value>,
    customers: Vec<Value>,
    price_lists: Vec<Value>,
    promotions: Vec<Value>,
    state: Mutex<MockState>,
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGateway {
    /// A fresh backend with nobody logged in.
    pub fn new() -> Self {
        MockGateway {
            users: seed_users(),
            products: seed_products(),
            categories: seed_categories(),
            customers: seed_customers(),
            price_lists: seed_price_lists(),
            promotions: seed_promotions(),
            state: Mutex::new(MockState {
                uid: None,
                failures: HashSet::new(),
                configs: seed_configs(),
                sessions: seed_sessions(),
                orders: seed_orders(),
                lines: seed_lines(),
                submitted: Vec::new(),
                open_config: None,
                next_session_id: 100,
                next_order_id: 1000,
            }),
        }
    }

    /// A backend with `admin` (uid 2) already logged in.
    pub fn logged_in() -> Self {
        let gateway = Self::new();
        gateway.lock().uid = Some(2);
        gateway
    }

    /// Makes every later call of `operation` fail with `Unreachable`.
    pub fn fail_on(&self, operation: MockOperation) {
        self.lock().failures.insert(operation);
    }

    pub fn clear_failures(&self) {
        self.lock().failures.clear();
    }

    /// Orders received through `submit_order`, oldest first.
    pub fn submitted(&self) -> Vec<CompletedOrder> {
        self.lock().submitted.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Locks state for a call: injected failure first, then the login check.
    fn begin(&self, operation: MockOperation) -> GatewayResult<MutexGuard<'_, MockState>> {
        let state = self
            .state
            .lock()
            .map_err(|e| GatewayError::Internal(e.to_string()))?;

        if state.failures.contains(&operation) {
            debug!(?operation, "Injected failure");
            return Err(GatewayError::Unreachable(format!(
                "injected failure on {:?}",
                operation
            )));
        }

        if operation != MockOperation::Authenticate && state.uid.is_none() {
            return Err(GatewayError::NotAuthenticated);
        }

        Ok(state)
    }

    fn user(&self, uid: i64) -> GatewayResult<&MockUser> {
        self.users
            .iter()
            .find(|u| u.uid == uid)
            .ok_or_else(|| GatewayError::Internal(format!("unknown uid {}", uid)))
    }
}

/// Backend numbers are JSON floats.
fn number(value: Decimal) -> Value {
    value.to_f64().map_or(json!(0), |n| json!(n))
}

fn session_of<'a>(state: &'a MockState, config: &Value) -> Option<&'a Value> {
    let session_id = normalize::many2one(config.get("current_session_id")?)?.id;
    state
        .sessions
        .iter()
        .find(|s| s.get("id").and_then(Value::as_i64) == Some(session_id))
}

#[async_trait]
impl Gateway for MockGateway {
    async fn authenticate(&self, credentials: &Credentials) -> GatewayResult<UserInfo> {
        let mut state = self.begin(MockOperation::Authenticate)?;
        debug!(username = %credentials.username, "Mock authenticate");

        let user = self
            .users
            .iter()
            .find(|u| u.login == credentials.username && u.password == credentials.password)
            .ok_or(GatewayError::AuthRejected)?;

        state.uid = Some(user.uid);
        normalize::user_info(&user.record, user.uid)
    }

    async fn logout(&self) -> GatewayResult<()> {
        let mut state = self.lock();
        state.uid = None;
        state.open_config = None;
        Ok(())
    }

    async fn pos_configs(&self) -> GatewayResult<Vec<PosConfig>> {
        let state = self.begin(MockOperation::PosConfigs)?;
        state
            .configs
            .iter()
            .map(|config| normalize::pos_config(config, session_of(&state, config)))
            .collect()
    }

    async fn open_session(&self, config_id: i64) -> GatewayResult<PosSession> {
        let mut state = self.begin(MockOperation::OpenSession)?;
        let uid = state.uid.ok_or(GatewayError::NotAuthenticated)?;

        let index = state
            .configs
            .iter()
            .position(|c| c.get("id").and_then(Value::as_i64) == Some(config_id))
            .ok_or_else(|| GatewayError::NotFound {
                model: "pos.config".to_string(),
                id: config_id,
            })?;

        let raw_config = &state.configs[index];
        let config = normalize::pos_config(raw_config, session_of(&state, raw_config))?;
        config.ensure_openable(uid)?;

        if let Some(session) = config.session.filter(|s| !s.is_closed()) {
            debug!(config_id, session_id = session.id, "Resuming own session");
            state.open_config = Some(config_id);
            return Ok(session);
        }

        let user = self.user(uid)?;
        let user_name = normalize::text(&user.record, "name").unwrap_or_default();
        let session_id = state.next_session_id;
        state.next_session_id += 1;
        let name = format!("POS/{:04}", session_id);

        let session = json!({
            "id": session_id,
            "name": name,
            "state": "opened",
            "user_id": [uid, user_name],
            "config_id": [config_id, config.name],
        });
        state.configs[index]["current_session_id"] = json!([session_id, name]);
        state.sessions.push(session.clone());
        state.open_config = Some(config_id);

        info!(config_id, session_id, "Mock session opened");
        normalize::pos_session(&session)
    }

    async fn products(&self) -> GatewayResult<Vec<CatalogProduct>> {
        let _state = self.begin(MockOperation::Products)?;
        normalize::all(&self.products, normalize::product)
    }

    async fn categories(&self) -> GatewayResult<Vec<Category>> {
        let _state = self.begin(MockOperation::Categories)?;
        normalize::all(&self.categories, normalize::category)
    }

    async fn customers(&self) -> GatewayResult<Vec<Customer>> {
        let _state = self.begin(MockOperation::Customers)?;
        normalize::all(&self.customers, normalize::customer)
    }

    async fn price_lists(&self) -> GatewayResult<Vec<PriceList>> {
        let _state = self.begin(MockOperation::PriceLists)?;
        normalize::all(&self.price_lists, normalize::price_list)
    }

    async fn promotions(&self) -> GatewayResult<Vec<Promotion>> {
        let _state = self.begin(MockOperation::Promotions)?;
        normalize::all(&self.promotions, normalize::promotion)
    }

    async fn order_history(&self, config_id: i64, days: u32) -> GatewayResult<Vec<HistoryOrder>> {
        let state = self.begin(MockOperation::OrderHistory)?;
        let since = history_since(Utc::now(), days);

        let mut orders = Vec::new();
        for raw in &state.orders {
            let owner = raw.get("config_id").and_then(normalize::many2one);
            if owner.map(|c| c.id) != Some(config_id) {
                continue;
            }
            let order = normalize::history_order(raw)?;
            if order.date_order >= since {
                orders.push(order);
            }
        }
        orders.sort_by(|a, b| b.date_order.cmp(&a.date_order));

        debug!(config_id, days, count = orders.len(), "Mock order history");
        Ok(orders)
    }

    async fn order_lines(&self, line_ids: &[i64]) -> GatewayResult<Vec<HistoryLine>> {
        let state = self.begin(MockOperation::OrderLines)?;
        state
            .lines
            .iter()
            .filter(|l| {
                l.get("id")
                    .and_then(Value::as_i64)
                    .map_or(false, |id| line_ids.contains(&id))
            })
            .map(normalize::history_line)
            .collect()
    }

    async fn submit_order(&self, order: &CompletedOrder) -> GatewayResult<i64> {
        let mut state = self.begin(MockOperation::SubmitOrder)?;

        let order_id = state.next_order_id;
        state.next_order_id += 1;

        if let Some(config_id) = state.open_config {
            let mut line_ids = Vec::with_capacity(order.lines.len());
            for line in &order.lines {
                let line_id = order_id * 100 + line_ids.len() as i64;
                let product = self
                    .products
                    .iter()
                    .find(|p| p.get("id").and_then(Value::as_i64) == Some(line.product_id))
                    .map(normalize::product)
                    .transpose()?;
                let (name, price) = product.map_or((String::new(), Money::zero()), |p| (p.name, p.price));
                let base = price.multiply_quantity(line.quantity);
                let discount_percent = match line.line_discount.kind {
                    DiscountKind::Percent => line.line_discount.value(),
                    DiscountKind::Amount => Decimal::ZERO,
                };

                state.lines.push(json!({
                    "id": line_id,
                    "product_id": [line.product_id, name],
                    "qty": line.quantity,
                    "price_unit": number(price.amount()),
                    "discount": number(discount_percent),
                    "price_subtotal_incl": number((base - line.line_discount.amount_off(base)).amount()),
                }));
                line_ids.push(line_id);
            }

            state.orders.push(json!({
                "id": order_id,
                "name": format!("POS/{:04}", order_id),
                "pos_reference": order.reference,
                "date_order": order.completed_at.format(DATETIME_FORMAT).to_string(),
                "partner_id": order.customer_id.map_or(json!(false), |id| json!(id)),
                "amount_total": number(order.grand_total.amount()),
                "state": "paid",
                "config_id": [config_id, ""],
                "lines": line_ids,
            }));
        }

        info!(
            order_id,
            table_id = order.table_id,
            reference = %order.reference,
            "Mock order submitted"
        );
        state.submitted.push(order.clone());
        Ok(order_id)
    }
}

// =============================================================================
// Seed Data
// =============================================================================

fn seed_users() -> Vec<MockUser> {
    vec![
        MockUser {
            uid: 2,
            login: "admin",
            password: "admin",
            record: json!({ "name": "Admin", "login": "admin", "email": "admin@bistro.local" }),
        },
        MockUser {
            uid: 6,
            login: "nva",
            password: "nva",
            record: json!({ "name": "Nguyễn Văn A", "login": "nva", "email": false }),
        },
    ]
}

fn seed_configs() -> Vec<Value> {
    vec![
        json!({ "id": 1, "name": "POS Tầng 1", "stock_location_id": [1, "Kho chính"], "current_session_id": false }),
        json!({ "id": 2, "name": "POS Tầng 2", "stock_location_id": [2, "Kho phụ"], "current_session_id": [20, "POS/0020"] }),
        json!({ "id": 3, "name": "POS Bar", "stock_location_id": [1, "Kho chính"], "current_session_id": [30, "POS/0030"] }),
        json!({ "id": 4, "name": "POS Sân vườn", "stock_location_id": [3, "Kho sân vườn"], "current_session_id": false }),
    ]
}

fn seed_sessions() -> Vec<Value> {
    vec![
        json!({ "id": 20, "name": "POS/0020", "state": "opened", "user_id": [2, "Admin"], "config_id": [2, "POS Tầng 2"] }),
        json!({ "id": 30, "name": "POS/0030", "state": "opened", "user_id": [6, "Nguyễn Văn A"], "config_id": [3, "POS Bar"] }),
    ]
}

fn seed_products() -> Vec<Value> {
    let rows: [(i64, &str, f64, i64, &str, &str, Option<&str>); 12] = [
        (1, "Phở bò", 45000.0, 1, "Món chính", "MC-01", None),
        (2, "Bún chả", 40000.0, 1, "Món chính", "MC-02", None),
        (3, "Cơm rang", 35000.0, 1, "Món chính", "MC-03", None),
        (4, "Gỏi cuốn", 30000.0, 2, "Khai vị", "KV-01", None),
        (5, "Chả giò", 25000.0, 2, "Khai vị", "KV-02", None),
        (6, "Nộm bò", 35000.0, 2, "Khai vị", "KV-03", None),
        (7, "Trà đá", 5000.0, 3, "Đồ uống", "DR-01", None),
        (8, "Cà phê sữa", 20000.0, 3, "Đồ uống", "DR-02", Some("8934563138165")),
        (9, "Sinh tố bơ", 30000.0, 3, "Đồ uống", "DR-03", None),
        (10, "Bia Hà Nội", 15000.0, 3, "Đồ uống", "DR-04", Some("8934822101113")),
        (11, "Bánh flan", 15000.0, 4, "Tráng miệng", "TM-01", None),
        (12, "Chè đậu đỏ", 12000.0, 4, "Tráng miệng", "TM-02", None),
    ];

    rows.iter()
        .map(|(id, name, price, categ_id, categ, code, barcode)| {
            json!({
                "id": id,
                "name": name,
                "list_price": price,
                "pos_categ_id": [categ_id, categ],
                "default_code": code,
                "barcode": barcode.map_or(json!(false), |b| json!(b)),
            })
        })
        .collect()
}

fn seed_categories() -> Vec<Value> {
    vec![
        json!({ "id": 1, "name": "Món chính", "parent_id": false, "sequence": 1 }),
        json!({ "id": 2, "name": "Khai vị", "parent_id": false, "sequence": 2 }),
        json!({ "id": 3, "name": "Đồ uống", "parent_id": false, "sequence": 3 }),
        json!({ "id": 4, "name": "Tráng miệng", "parent_id": false, "sequence": 4 }),
    ]
}

fn seed_customers() -> Vec<Value> {
    vec![
        json!({ "id": 1, "name": "Khách lẻ", "phone": "", "mobile": false, "email": "" }),
        json!({ "id": 2, "name": "Nguyễn Văn A", "phone": "0901234567", "mobile": false, "email": "a@mail.com" }),
        json!({ "id": 3, "name": "Trần Thị B", "phone": false, "mobile": "0912345678", "email": "b@mail.com" }),
    ]
}

fn seed_price_lists() -> Vec<Value> {
    vec![
        json!({ "id": 1, "name": "Bảng giá chung", "active": true }),
        json!({ "id": 2, "name": "Bảng giá VIP", "active": true }),
        json!({ "id": 3, "name": "Bảng giá nhân viên", "active": true }),
    ]
}

fn seed_promotions() -> Vec<Value> {
    vec![
        json!({ "id": 1, "name": "Giảm 10% Happy Hour", "discount_type": "percentage", "discount_percentage": 10 }),
        json!({ "id": 2, "name": "Giảm 50k cho bill trên 500k", "discount_type": "fixed_amount", "discount_fixed_amount": 50000 }),
        json!({ "id": 3, "name": "Mua 2 tặng 1 đồ uống", "discount_type": "percentage", "discount_percentage": 100 }),
    ]
}

/// Orders on config 2, dated relative to now so the default
/// seven-day window always sees the first two.
fn seed_orders() -> Vec<Value> {
    let now = Utc::now().naive_utc();
    let at = |age: Duration| (now - age).format(DATETIME_FORMAT).to_string();

    vec![
        json!({
            "id": 1, "name": "POS/001", "pos_reference": "Order 00001-001-0001",
            "date_order": at(Duration::hours(2)), "partner_id": [2, "Nguyễn Văn A"],
            "amount_total": 159000.0, "state": "paid", "config_id": [2, "POS Tầng 2"], "lines": [1, 2, 3]
        }),
        json!({
            "id": 2, "name": "POS/002", "pos_reference": "Order 00001-001-0002",
            "date_order": at(Duration::days(1)), "partner_id": false,
            "amount_total": 90000.0, "state": "paid", "config_id": [2, "POS Tầng 2"], "lines": [4, 5]
        }),
        json!({
            "id": 3, "name": "POS/003", "pos_reference": "Order 00001-001-0003",
            "date_order": at(Duration::days(10)), "partner_id": [3, "Trần Thị B"],
            "amount_total": 149000.0, "state": "done", "config_id": [2, "POS Tầng 2"], "lines": [6, 7, 8]
        }),
    ]
}

fn seed_lines() -> Vec<Value> {
    vec![
        json!({ "id": 1, "product_id": [1, "Phở bò"], "qty": 2, "price_unit": 45000, "discount": 0, "price_subtotal_incl": 90000 }),
        json!({ "id": 2, "product_id": [8, "Cà phê sữa"], "qty": 3, "price_unit": 20000, "discount": 10, "price_subtotal_incl": 54000 }),
        json!({ "id": 3, "product_id": [11, "Bánh flan"], "qty": 1, "price_unit": 15000, "discount": 0, "price_subtotal_incl": 15000 }),
        json!({ "id": 4, "product_id": [2, "Bún chả"], "qty": 2, "price_unit": 40000, "discount": 0, "price_subtotal_incl": 80000 }),
        json!({ "id": 5, "product_id": [7, "Trà đá"], "qty": 2, "price_unit": 5000, "discount": 0, "price_subtotal_incl": 10000 }),
        json!({ "id": 6, "product_id": [6, "Nộm bò"], "qty": 1, "price_unit": 35000, "discount": 0, "price_subtotal_incl": 35000 }),
        json!({ "id": 7, "product_id": [10, "Bia Hà Nội"], "qty": 6, "price_unit": 15000, "discount": 0, "price_subtotal_incl": 90000 }),
        json!({ "id": 8, "product_id": [12, "Chè đậu đỏ"], "qty": 2, "price_unit": 12000, "discount": 0, "price_subtotal_incl": 24000 }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::SessionOwnership;
    use bistro_core::{Order, Ref};

    fn creds(username: &str, password: &str) -> Credentials {
        Credentials {
            database: "bistro".to_string(),
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_authenticate() {
        let gateway = MockGateway::new();
        assert_eq!(
            gateway.pos_configs().await.unwrap_err(),
            GatewayError::NotAuthenticated
        );

        let err = gateway.authenticate(&creds("admin", "wrong")).await.unwrap_err();
        assert_eq!(err, GatewayError::AuthRejected);

        let user = gateway.authenticate(&creds("admin", "admin")).await.unwrap();
        assert_eq!(user.uid, 2);
        assert_eq!(user.name, "Admin");
        assert_eq!(gateway.pos_configs().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_logout_requires_login_again() {
        let gateway = MockGateway::logged_in();
        gateway.logout().await.unwrap();
        assert_eq!(
            gateway.products().await.unwrap_err(),
            GatewayError::NotAuthenticated
        );
    }

    #[tokio::test]
    async fn test_config_ownership_for_admin() {
        let gateway = MockGateway::logged_in();
        let configs = gateway.pos_configs().await.unwrap();
        let ownership: Vec<_> = configs.iter().map(|c| c.ownership(2)).collect();
        assert_eq!(
            ownership,
            vec![
                SessionOwnership::Available,
                SessionOwnership::Mine,
                SessionOwnership::Locked,
                SessionOwnership::Available,
            ]
        );
    }

    #[tokio::test]
    async fn test_open_session() {
        let gateway = MockGateway::logged_in();

        let resumed = gateway.open_session(2).await.unwrap();
        assert_eq!(resumed.id, 20);

        let fresh = gateway.open_session(1).await.unwrap();
        assert_eq!(fresh.config_id, 1);
        assert_eq!(fresh.user, Some(Ref::new(2, "Admin")));

        let configs = gateway.pos_configs().await.unwrap();
        assert_eq!(configs[0].ownership(2), SessionOwnership::Mine);
        assert_eq!(configs[0].ownership(6), SessionOwnership::Locked);
    }

    #[tokio::test]
    async fn test_open_locked_session_fails() {
        let gateway = MockGateway::logged_in();
        let err = gateway.open_session(3).await.unwrap_err();
        assert_eq!(
            err,
            GatewayError::SessionLocked {
                config_id: 3,
                owner: "Nguyễn Văn A".to_string()
            }
        );

        assert!(matches!(
            gateway.open_session(42).await,
            Err(GatewayError::NotFound { id: 42, .. })
        ));
    }

    #[tokio::test]
    async fn test_catalog_records_are_normalized() {
        let gateway = MockGateway::logged_in();

        let products = gateway.products().await.unwrap();
        assert_eq!(products.len(), 12);
        assert_eq!(products[9].barcode.as_deref(), Some("8934822101113"));
        assert_eq!(products[0].barcode, None);

        let customers = gateway.customers().await.unwrap();
        assert_eq!(customers[0].phone, None);
        assert_eq!(customers[2].phone.as_deref(), Some("0912345678"));

        let promotions = gateway.promotions().await.unwrap();
        assert_eq!(promotions[1].discount.kind, DiscountKind::Amount);
    }

    #[tokio::test]
    async fn test_order_history_window() {
        let gateway = MockGateway::logged_in();

        let week = gateway.order_history(2, 7).await.unwrap();
        assert_eq!(week.iter().map(|o| o.id).collect::<Vec<_>>(), vec![1, 2]);

        let month = gateway.order_history(2, 30).await.unwrap();
        assert_eq!(month.len(), 3);

        assert!(gateway.order_history(1, 30).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_order_lines() {
        let gateway = MockGateway::logged_in();
        let lines = gateway.order_lines(&[1, 2, 3]).await.unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].subtotal_incl, Money::from_units(90_000));
        assert!(gateway.order_lines(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let gateway = MockGateway::logged_in();
        gateway.fail_on(MockOperation::Products);
        assert!(gateway.products().await.unwrap_err().is_retryable());

        gateway.clear_failures();
        assert!(gateway.products().await.is_ok());
    }

    #[tokio::test]
    async fn test_submit_order_appears_in_history() {
        let gateway = MockGateway::logged_in();
        gateway.open_session(1).await.unwrap();

        let products = gateway.products().await.unwrap();
        let mut order = Order::default();
        order.add_product(&products[0].to_ref());
        order.set_customer(Some(Ref::new(2, "Nguyễn Văn A")));
        let completed = bistro_core::checkout::complete(5, &order, Utc::now()).unwrap();

        let id = gateway.submit_order(&completed).await.unwrap();
        assert_eq!(gateway.submitted(), vec![completed]);

        let history = gateway.order_history(1, 1).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, id);
        assert_eq!(history[0].amount_total, Money::from_units(45_000));
        assert_eq!(gateway.order_lines(&history[0].line_ids).await.unwrap().len(), 1);
    }
}
