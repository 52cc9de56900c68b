//! # Catalog
//!
//! Read-only reference data for one POS session: products, categories,
//! customers, price lists and promotions.
//!
//! ## Loading
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Catalog::load(gateway)                                                │
//! │        │                                                                │
//! │        ├──► products()     ┐                                            │
//! │        ├──► categories()   │                                            │
//! │        ├──► customers()    ├── tokio::try_join! (concurrent)            │
//! │        ├──► price_lists()  │                                            │
//! │        └──► promotions()   ┘                                            │
//! │                 │                                                       │
//! │         all Ok? ├── yes ──► Catalog snapshot                            │
//! │                 └── no  ──► Err (caller keeps its previous catalog)     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use bistro_core::{Discount, Money, ProductId, ProductRef, Ref};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::GatewayResult;
use crate::gateway::Gateway;

// =============================================================================
// Records
// =============================================================================

/// A sellable product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub id: ProductId,
    pub name: String,
    pub price: Money,
    /// POS category.
    pub category: Option<Ref>,
    pub barcode: Option<String>,
    /// Internal reference code.
    pub internal_code: Option<String>,
}

impl CatalogProduct {
    /// The snapshot an order line keeps.
    pub fn to_ref(&self) -> ProductRef {
        ProductRef {
            id: self.id,
            name: self.name.clone(),
            price: self.price,
            category: self.category.clone(),
        }
    }

    /// Case-insensitive match on name, internal code or barcode.
    ///
    /// `needle` must already be lowercase.
    fn matches(&self, needle: &str) -> bool {
        let hit = |field: &str| field.to_lowercase().contains(needle);
        hit(&self.name)
            || self.internal_code.as_deref().map_or(false, hit)
            || self.barcode.as_deref().map_or(false, hit)
    }
}

/// A POS product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub parent: Option<Ref>,
    pub sequence: i64,
}

/// A customer (partner) that can be attached to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl Customer {
    pub fn to_ref(&self) -> Ref {
        Ref::new(self.id, self.name.clone())
    }
}

/// A price list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceList {
    pub id: i64,
    pub name: String,
}

impl PriceList {
    pub fn to_ref(&self) -> Ref {
        Ref::new(self.id, self.name.clone())
    }
}

/// A promotion program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Promotion {
    pub id: i64,
    pub name: String,
    pub discount: Discount,
}

impl Promotion {
    pub fn to_ref(&self) -> Ref {
        Ref::new(self.id, self.name.clone())
    }
}

// =============================================================================
// Catalog Snapshot
// =============================================================================

/// Everything fetched when a POS session opens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub products: Vec<CatalogProduct>,
    pub categories: Vec<Category>,
    pub customers: Vec<Customer>,
    pub price_lists: Vec<PriceList>,
    pub promotions: Vec<Promotion>,
}

impl Catalog {
    /// Fetches all five collections concurrently.
    ///
    /// Returns a snapshot only if every fetch succeeds.
    pub async fn load<G: Gateway + ?Sized>(gateway: &G) -> GatewayResult<Self> {
        let (products, categories, customers, price_lists, promotions) = tokio::try_join!(
            gateway.products(),
            gateway.categories(),
            gateway.customers(),
            gateway.price_lists(),
            gateway.promotions(),
        )?;

        info!(
            products = products.len(),
            categories = categories.len(),
            customers = customers.len(),
            price_lists = price_lists.len(),
            promotions = promotions.len(),
            "Catalog loaded"
        );

        Ok(Catalog {
            products,
            categories,
            customers,
            price_lists,
            promotions,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn product(&self, id: ProductId) -> Option<&CatalogProduct> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn category(&self, id: i64) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn customer(&self, id: i64) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    pub fn price_list(&self, id: i64) -> Option<&PriceList> {
        self.price_lists.iter().find(|p| p.id == id)
    }

    pub fn promotion(&self, id: i64) -> Option<&Promotion> {
        self.promotions.iter().find(|p| p.id == id)
    }

    /// Products in `category` (all when `None`) matching `query`.
    ///
    /// An empty query matches everything.
    pub fn filter_products(&self, category: Option<i64>, query: &str) -> Vec<&CatalogProduct> {
        let needle = query.trim().to_lowercase();
        self.products
            .iter()
            .filter(|p| match category {
                Some(id) => p.category.as_ref().map(|c| c.id) == Some(id),
                None => true,
            })
            .filter(|p| needle.is_empty() || p.matches(&needle))
            .collect()
    }
}
