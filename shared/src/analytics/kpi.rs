//! KPI composition and the catalog fallback estimate

use rust_decimal::Decimal;
use serde::Serialize;

use super::fulfillment::FulfillmentBreakdown;
use super::identity::canonical_key;
use super::revenue::{ProductSales, RevenueAggregate};
use crate::models::CatalogEntry;

/// The composed, point-in-time analytics result handed to the
/// presentation layer. Recomputed per request, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct KpiSnapshot {
    pub product_count: i64,
    /// Total units on hand across the catalog
    pub stock_count: i64,
    pub in_stock: i64,
    pub low_stock: i64,
    pub out_of_stock: i64,
    pub inventory_value: Decimal,
    /// Units sold in the trailing 30-day window (or lifetime, see below)
    pub sold_quantity: i64,
    pub revenue: Decimal,
    /// Sorted descending by quantity sold
    pub top_products: Vec<ProductSales>,
    pub fulfillment: FulfillmentBreakdown,
    /// True when no qualifying order history existed and the figures are
    /// the coarse lifetime estimate from catalog counters, not last-30-days
    /// actuals
    pub lifetime_estimate: bool,
}

/// Merge stock metrics, revenue aggregates and the fulfillment breakdown
/// into a snapshot.
///
/// `low_stock_threshold` is caller-configured per business role; the
/// boundary is inclusive, so stock equal to the threshold counts as low.
/// Callers porting thresholds from a system with an exclusive boundary
/// must pass `threshold - 1` to keep their cutoff.
/// Monetary values are rounded to 2 places here, at the output boundary.
///
/// When the revenue aggregate is entirely zero the catalog fallback
/// estimate is substituted wholesale — the two sources are never combined,
/// which would double count.
pub fn compose(
    entries: &[CatalogEntry],
    revenue: &RevenueAggregate,
    fulfillment: FulfillmentBreakdown,
    low_stock_threshold: i64,
) -> KpiSnapshot {
    let mut stock_count = 0i64;
    let mut in_stock = 0i64;
    let mut low_stock = 0i64;
    let mut out_of_stock = 0i64;
    let mut inventory_value = Decimal::ZERO;

    for entry in entries {
        stock_count += entry.stock_quantity.max(0);
        if entry.stock_quantity > 0 {
            in_stock += 1;
            if entry.stock_quantity <= low_stock_threshold {
                low_stock += 1;
            }
            inventory_value += entry.unit_price * Decimal::from(entry.stock_quantity);
        } else {
            out_of_stock += 1;
        }
    }

    let estimate;
    let (source, lifetime_estimate) = if revenue.is_zero() {
        estimate = estimate_from_catalog(entries);
        (&estimate, true)
    } else {
        (revenue, false)
    };

    KpiSnapshot {
        product_count: entries.len() as i64,
        stock_count,
        in_stock,
        low_stock,
        out_of_stock,
        inventory_value: inventory_value.round_dp(2),
        sold_quantity: source.total_quantity,
        revenue: source.total_revenue.round_dp(2),
        top_products: source
            .per_product
            .iter()
            .map(|p| ProductSales {
                revenue: p.revenue.round_dp(2),
                ..p.clone()
            })
            .collect(),
        fulfillment,
        lifetime_estimate,
    }
}

/// Approximate lifetime sales from catalog-level counters.
///
/// Used only when no qualifying order history exists. Deliberately coarse:
/// lifetime counters cannot exclude historical refunds, so callers must
/// present the output as a lifetime estimate, never as windowed actuals.
pub fn estimate_from_catalog(entries: &[CatalogEntry]) -> RevenueAggregate {
    let mut agg = RevenueAggregate::default();
    for entry in entries {
        if entry.lifetime_sold_count <= 0 {
            continue;
        }
        let quantity = entry.lifetime_sold_count;
        let revenue = entry.unit_price * Decimal::from(quantity);
        agg.total_quantity += quantity;
        agg.total_revenue += revenue;
        agg.per_product.push(ProductSales {
            key: canonical_key(entry),
            name: entry.name.clone(),
            category: entry.category.clone(),
            image_ref: entry.image_ref.clone(),
            quantity,
            revenue,
        });
    }
    agg.per_product.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    agg
}
