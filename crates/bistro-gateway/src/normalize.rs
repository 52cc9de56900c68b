//! # Record Normalization
//!
//! Converts raw backend records (`serde_json::Value`) into typed rows.
//!
//! ## Backend Field Conventions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Raw value                       Normalized                             │
//! │  ─────────                       ──────────                             │
//! │  [3, "Đồ uống"]   (many2one)  →  Some(Ref { id: 3, name: "Đồ uống" })   │
//! │  3                (bare id)   →  Some(Ref { id: 3, name: "" })          │
//! │  false / null                 →  None                                   │
//! │  "" / false       (char)      →  None                                   │
//! │  45000.0          (float)     →  Decimal 45000 (parsed from text)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Numbers are converted through their decimal text so that a price such
//! as `0.1` does not pick up binary floating point noise.

use std::str::FromStr;

use bistro_core::validation::validate_price;
use bistro_core::{Discount, Money, Ref};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::catalog::{CatalogProduct, Category, Customer, PriceList, Promotion};
use crate::error::{GatewayError, GatewayResult};
use crate::gateway::{PosConfig, PosSession, UserInfo};
use crate::history::{HistoryLine, HistoryOrder};

/// Backend datetime format.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// =============================================================================
// Field Helpers
// =============================================================================

/// A many2one field as an optional reference.
pub fn many2one(value: &Value) -> Option<Ref> {
    match value {
        Value::Array(pair) => {
            let id = pair.first()?.as_i64()?;
            let name = pair.get(1).and_then(Value::as_str).unwrap_or_default();
            Some(Ref::new(id, name))
        }
        Value::Number(n) => n.as_i64().map(|id| Ref::new(id, "")),
        _ => None,
    }
}

/// Optional text field; `false`, null and blank strings are `None`.
pub fn text(record: &Value, field: &str) -> Option<String> {
    record
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Required text field.
pub fn required_text(record: &Value, model: &str, field: &str) -> GatewayResult<String> {
    text(record, field).ok_or_else(|| GatewayError::invalid(model, format!("missing {}", field)))
}

/// Required integer id field.
pub fn id(record: &Value, model: &str) -> GatewayResult<i64> {
    record
        .get("id")
        .and_then(Value::as_i64)
        .ok_or_else(|| GatewayError::invalid(model, "missing id"))
}

/// Numeric field as an exact decimal; missing or `false` is zero.
pub fn decimal(record: &Value, model: &str, field: &str) -> GatewayResult<Decimal> {
    match record.get(field) {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(Decimal::ZERO),
        Some(Value::Number(n)) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .map_err(|e| GatewayError::invalid(model, format!("{}: {}", field, e))),
        Some(other) => Err(GatewayError::invalid(
            model,
            format!("{} is not a number: {}", field, other),
        )),
    }
}

fn money(record: &Value, model: &str, field: &str) -> GatewayResult<Money> {
    decimal(record, model, field).map(Money::from_decimal)
}

fn id_list(record: &Value, field: &str) -> Vec<i64> {
    record
        .get(field)
        .and_then(Value::as_array)
        .map(|ids| ids.iter().filter_map(Value::as_i64).collect())
        .unwrap_or_default()
}

/// Normalizes every record, failing on the first bad one.
pub fn all<T>(
    records: &[Value],
    f: impl Fn(&Value) -> GatewayResult<T>,
) -> GatewayResult<Vec<T>> {
    records.iter().map(f).collect()
}

// =============================================================================
// Records
// =============================================================================

pub fn user_info(record: &Value, uid: i64) -> GatewayResult<UserInfo> {
    const MODEL: &str = "res.users";
    Ok(UserInfo {
        uid,
        name: required_text(record, MODEL, "name")?,
        login: text(record, "login").unwrap_or_default(),
        email: text(record, "email"),
    })
}

pub fn pos_session(record: &Value) -> GatewayResult<PosSession> {
    const MODEL: &str = "pos.session";
    let config = many2one(record.get("config_id").unwrap_or(&Value::Null))
        .ok_or_else(|| GatewayError::invalid(MODEL, "missing config_id"))?;

    Ok(PosSession {
        id: id(record, MODEL)?,
        name: text(record, "name").unwrap_or_default(),
        state: required_text(record, MODEL, "state")?,
        config_id: config.id,
        user: many2one(record.get("user_id").unwrap_or(&Value::Null)),
    })
}

/// A POS config plus the session record its `current_session_id` points at.
pub fn pos_config(record: &Value, session: Option<&Value>) -> GatewayResult<PosConfig> {
    const MODEL: &str = "pos.config";
    Ok(PosConfig {
        id: id(record, MODEL)?,
        name: required_text(record, MODEL, "name")?,
        stock_location: many2one(record.get("stock_location_id").unwrap_or(&Value::Null)),
        session: session.map(pos_session).transpose()?,
    })
}

pub fn product(record: &Value) -> GatewayResult<CatalogProduct> {
    const MODEL: &str = "product.product";
    let price = money(record, MODEL, "list_price")?;
    validate_price(price).map_err(|e| GatewayError::invalid(MODEL, e.to_string()))?;

    Ok(CatalogProduct {
        id: id(record, MODEL)?,
        name: required_text(record, MODEL, "name")?,
        price,
        category: many2one(record.get("pos_categ_id").unwrap_or(&Value::Null)),
        barcode: text(record, "barcode"),
        internal_code: text(record, "default_code"),
    })
}

pub fn category(record: &Value) -> GatewayResult<Category> {
    const MODEL: &str = "pos.category";
    Ok(Category {
        id: id(record, MODEL)?,
        name: required_text(record, MODEL, "name")?,
        parent: many2one(record.get("parent_id").unwrap_or(&Value::Null)),
        sequence: record.get("sequence").and_then(Value::as_i64).unwrap_or(0),
    })
}

/// Phone falls back to mobile.
pub fn customer(record: &Value) -> GatewayResult<Customer> {
    const MODEL: &str = "res.partner";
    Ok(Customer {
        id: id(record, MODEL)?,
        name: required_text(record, MODEL, "name")?,
        phone: text(record, "phone").or_else(|| text(record, "mobile")),
        email: text(record, "email"),
    })
}

pub fn price_list(record: &Value) -> GatewayResult<PriceList> {
    const MODEL: &str = "product.pricelist";
    Ok(PriceList {
        id: id(record, MODEL)?,
        name: required_text(record, MODEL, "name")?,
    })
}

/// `discount_type` selects which amount field applies.
pub fn promotion(record: &Value) -> GatewayResult<Promotion> {
    const MODEL: &str = "sale.coupon.program";
    let discount = match text(record, "discount_type").as_deref() {
        Some("percentage") => Discount::percent(decimal(record, MODEL, "discount_percentage")?),
        Some("fixed_amount") => Discount::amount(decimal(record, MODEL, "discount_fixed_amount")?),
        other => {
            return Err(GatewayError::invalid(
                MODEL,
                format!("unsupported discount_type {:?}", other),
            ))
        }
    };

    Ok(Promotion {
        id: id(record, MODEL)?,
        name: required_text(record, MODEL, "name")?,
        discount,
    })
}

pub fn history_order(record: &Value) -> GatewayResult<HistoryOrder> {
    const MODEL: &str = "pos.order";
    let date = required_text(record, MODEL, "date_order")?;
    let date_order = NaiveDateTime::parse_from_str(&date, DATETIME_FORMAT)
        .map_err(|e| GatewayError::invalid(MODEL, format!("date_order {}: {}", date, e)))?;
    let state = required_text(record, MODEL, "state")?
        .parse()
        .map_err(|e: String| GatewayError::invalid(MODEL, e))?;

    Ok(HistoryOrder {
        id: id(record, MODEL)?,
        name: required_text(record, MODEL, "name")?,
        reference: text(record, "pos_reference"),
        date_order,
        customer: many2one(record.get("partner_id").unwrap_or(&Value::Null)),
        amount_total: money(record, MODEL, "amount_total")?,
        state,
        line_ids: id_list(record, "lines"),
    })
}

pub fn history_line(record: &Value) -> GatewayResult<HistoryLine> {
    const MODEL: &str = "pos.order.line";
    Ok(HistoryLine {
        id: id(record, MODEL)?,
        product: many2one(record.get("product_id").unwrap_or(&Value::Null)),
        qty: decimal(record, MODEL, "qty")?,
        price_unit: money(record, MODEL, "price_unit")?,
        discount_percent: decimal(record, MODEL, "discount")?,
        subtotal_incl: money(record, MODEL, "price_subtotal_incl")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bistro_core::DiscountKind;
    use serde_json::json;

    #[test]
    fn test_many2one_shapes() {
        assert_eq!(many2one(&json!([3, "Đồ uống"])), Some(Ref::new(3, "Đồ uống")));
        assert_eq!(many2one(&json!(3)), Some(Ref::new(3, "")));
        assert_eq!(many2one(&json!(false)), None);
        assert_eq!(many2one(&Value::Null), None);
        assert_eq!(many2one(&json!([])), None);
    }

    #[test]
    fn test_text_treats_false_as_missing() {
        let record = json!({ "barcode": false, "name": "  Phở bò ", "email": "" });
        assert_eq!(text(&record, "barcode"), None);
        assert_eq!(text(&record, "email"), None);
        assert_eq!(text(&record, "name").as_deref(), Some("Phở bò"));
    }

    #[test]
    fn test_decimal_from_float_text() {
        let record = json!({ "a": 45000.0, "b": 0.1, "c": false });
        assert_eq!(decimal(&record, "m", "a").unwrap(), Decimal::from(45_000));
        assert_eq!(decimal(&record, "m", "b").unwrap(), Decimal::new(1, 1));
        assert_eq!(decimal(&record, "m", "c").unwrap(), Decimal::ZERO);
        assert!(decimal(&json!({ "a": "x" }), "m", "a").is_err());
    }

    #[test]
    fn test_product() {
        let raw = json!({
            "id": 1, "name": "Phở bò", "list_price": 45000.0,
            "pos_categ_id": [1, "Món chính"], "barcode": false, "default_code": "MC-01"
        });
        let p = product(&raw).unwrap();
        assert_eq!(p.price, Money::from_units(45_000));
        assert_eq!(p.category, Some(Ref::new(1, "Món chính")));
        assert_eq!(p.barcode, None);
        assert_eq!(p.internal_code.as_deref(), Some("MC-01"));
    }

    #[test]
    fn test_product_rejects_negative_price() {
        let raw = json!({ "id": 1, "name": "Refund", "list_price": -5.0 });
        assert!(matches!(product(&raw), Err(GatewayError::InvalidRecord { .. })));
    }

    #[test]
    fn test_customer_phone_falls_back_to_mobile() {
        let raw = json!({ "id": 4, "name": "Lê C", "phone": false, "mobile": "0987654321" });
        assert_eq!(customer(&raw).unwrap().phone.as_deref(), Some("0987654321"));

        let raw = json!({ "id": 4, "name": "Lê C", "phone": "024111", "mobile": "0987654321" });
        assert_eq!(customer(&raw).unwrap().phone.as_deref(), Some("024111"));
    }

    #[test]
    fn test_promotion_kinds() {
        let pct = promotion(&json!({
            "id": 1, "name": "Happy Hour", "discount_type": "percentage", "discount_percentage": 10.0
        }))
        .unwrap();
        assert_eq!(pct.discount.kind, DiscountKind::Percent);
        assert_eq!(pct.discount.value(), Decimal::from(10));

        let fixed = promotion(&json!({
            "id": 2, "name": "50k", "discount_type": "fixed_amount", "discount_fixed_amount": 50000
        }))
        .unwrap();
        assert_eq!(fixed.discount.kind, DiscountKind::Amount);

        assert!(promotion(&json!({ "id": 3, "name": "?", "discount_type": "free_shipping" })).is_err());
    }

    #[test]
    fn test_pos_config_with_session() {
        let config = json!({
            "id": 3, "name": "POS Bar", "stock_location_id": [1, "Kho chính"],
            "current_session_id": [30, "POS/0030"]
        });
        let session = json!({
            "id": 30, "name": "POS/0030", "state": "opened",
            "user_id": [6, "Nguyễn Văn A"], "config_id": [3, "POS Bar"]
        });

        let parsed = pos_config(&config, Some(&session)).unwrap();
        let s = parsed.session.unwrap();
        assert_eq!(s.config_id, 3);
        assert_eq!(s.user, Some(Ref::new(6, "Nguyễn Văn A")));
    }

    #[test]
    fn test_history_order() {
        let raw = json!({
            "id": 2, "name": "POS/002", "pos_reference": "Order 00001-001-0002",
            "date_order": "2024-05-01 12:00:00", "partner_id": false,
            "amount_total": 120000.0, "state": "paid", "lines": [4, 5]
        });
        let order = history_order(&raw).unwrap();
        assert_eq!(order.customer, None);
        assert_eq!(order.line_ids, vec![4, 5]);
        assert_eq!(order.amount_total, Money::from_units(120_000));

        let bad = json!({ "id": 2, "name": "POS/002", "date_order": "yesterday", "state": "paid" });
        assert!(history_order(&bad).is_err());
    }

    #[test]
    fn test_all_fails_on_first_bad_record() {
        let records = vec![
            json!({ "id": 1, "name": "Bảng giá chung" }),
            json!({ "id": 2 }),
        ];
        assert!(all(&records, price_list).is_err());
        assert_eq!(all(&records[..1], price_list).unwrap().len(), 1);
    }
}
