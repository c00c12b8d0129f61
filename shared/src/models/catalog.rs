//! Catalog entry models
//!
//! A catalog entry is a business's product record and the source of truth
//! for name, price and stock. Entries are created and updated by the CRUD
//! layer; the analytics engine only reads them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A product record owned by a business.
///
/// Two identifiers can appear in order line items to reference an entry:
/// the merchant-assigned `sku` (may be empty on legacy rows) and the
/// internal `id` rendered as a string. Invariants: `unit_price >= 0`,
/// `stock_quantity >= 0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: Uuid,
    pub business_id: Uuid,
    /// Merchant-assigned SKU; empty string on rows imported before SKUs
    /// were required
    pub sku: String,
    pub name: String,
    pub unit_price: Decimal,
    pub stock_quantity: i64,
    /// Lifetime units sold, maintained by the order-management collaborator
    pub lifetime_sold_count: i64,
    pub category: Option<String>,
    pub image_ref: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CatalogEntry {
    /// The merchant-assigned key, if usable
    pub fn primary_key(&self) -> Option<&str> {
        let sku = self.sku.trim();
        if sku.is_empty() {
            None
        } else {
            Some(sku)
        }
    }

    /// The internal object id rendered the way line items reference it
    pub fn secondary_key(&self) -> String {
        self.id.to_string()
    }
}

/// Input for creating a catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCatalogEntryInput {
    pub sku: String,
    pub name: String,
    pub unit_price: Decimal,
    pub stock_quantity: i64,
    pub category: Option<String>,
    pub image_ref: Option<String>,
}

/// Input for updating a catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCatalogEntryInput {
    pub name: Option<String>,
    pub unit_price: Option<Decimal>,
    pub stock_quantity: Option<i64>,
    pub category: Option<String>,
    pub image_ref: Option<String>,
}
