//! Identity resolution between order line items and catalog entries
//!
//! Order line items reference products through several historical
//! identifier conventions (free-text SKUs, internal object ids). The
//! identity index registers every usable identifier of every catalog entry
//! so that a line item resolves to the same entry no matter which
//! convention the importing system used.

use std::collections::HashMap;

use crate::models::{CatalogEntry, LineItem};

/// Key set and lookup table over a business's catalog.
///
/// Every key in the set resolves; empty identifiers are never registered.
#[derive(Debug)]
pub struct IdentityIndex<'a> {
    lookup: HashMap<String, &'a CatalogEntry>,
}

impl<'a> IdentityIndex<'a> {
    /// Register both identifiers of each entry. Entries without a usable
    /// SKU are registered under their internal id only; partial identity
    /// data never fails the build.
    pub fn build(entries: &'a [CatalogEntry]) -> Self {
        let mut lookup = HashMap::with_capacity(entries.len() * 2);
        for entry in entries {
            if let Some(sku) = entry.primary_key() {
                lookup.insert(sku.to_string(), entry);
            }
            lookup.insert(entry.secondary_key(), entry);
        }
        Self { lookup }
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lookup.contains_key(key.trim())
    }

    pub fn resolve(&self, key: &str) -> Option<&'a CatalogEntry> {
        self.lookup.get(key.trim()).copied()
    }

    /// Resolve a line item through the productRef precedence chain.
    /// Returns None when no identifier matches; resolution failure is
    /// expected data drift, never an error.
    pub fn resolve_item(&self, item: &LineItem) -> Option<&'a CatalogEntry> {
        item.product_ref().and_then(|key| self.resolve(key))
    }

    /// True when any of the order line's identifiers points into this
    /// catalog, regardless of refund state.
    pub fn matches_item(&self, item: &LineItem) -> bool {
        self.resolve_item(item).is_some()
    }
}

/// The canonical identifier used to key per-product aggregates: the SKU
/// when the entry has one, the internal id otherwise. Using one canonical
/// key per entry keeps lines that reference the same product through
/// different conventions from splitting its totals.
pub fn canonical_key(entry: &CatalogEntry) -> String {
    entry
        .primary_key()
        .map(str::to_string)
        .unwrap_or_else(|| entry.secondary_key())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn entry(sku: &str) -> CatalogEntry {
        CatalogEntry {
            id: Uuid::new_v4(),
            business_id: Uuid::new_v4(),
            sku: sku.to_string(),
            name: "Widget".to_string(),
            unit_price: Decimal::from(10),
            stock_quantity: 1,
            lifetime_sold_count: 0,
            category: None,
            image_ref: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn registers_both_identifiers() {
        let entries = vec![entry("SKU-1")];
        let index = IdentityIndex::build(&entries);
        assert_eq!(index.len(), 2);
        assert!(index.contains("SKU-1"));
        assert!(index.contains(&entries[0].id.to_string()));
        assert!(!index.contains(""));
    }

    #[test]
    fn blank_sku_registers_internal_id_only() {
        let entries = vec![entry("   ")];
        let index = IdentityIndex::build(&entries);
        assert_eq!(index.len(), 1);
        assert!(index.resolve(&entries[0].id.to_string()).is_some());
    }

    #[test]
    fn both_keys_resolve_to_the_same_entry() {
        let entries = vec![entry("SKU-9")];
        let index = IdentityIndex::build(&entries);
        let by_sku = index.resolve("SKU-9").unwrap();
        let by_id = index.resolve(&entries[0].id.to_string()).unwrap();
        assert_eq!(by_sku.id, by_id.id);
    }

    #[test]
    fn canonical_key_prefers_sku() {
        let with_sku = entry("SKU-2");
        assert_eq!(canonical_key(&with_sku), "SKU-2");
        let without = entry("");
        assert_eq!(canonical_key(&without), without.id.to_string());
    }
}
