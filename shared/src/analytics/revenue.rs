//! Revenue aggregation
//!
//! Walks a business's orders, attributes per-line revenue and quantity to
//! catalog entries, and accumulates totals, a per-product breakdown and
//! day/month trend buckets. All monetary accumulation stays unrounded
//! `Decimal`; rounding to 2 places happens only at output boundaries
//! (KPI composition, series rendering).

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, Months, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::classifier;
use super::identity::{canonical_key, IdentityIndex};
use crate::models::{CatalogEntry, LineItem, OrderRecord};

/// Trailing aggregation windows anchored at a single `now`.
///
/// Totals, the per-product breakdown and the day buckets cover the 30-day
/// window; the month buckets cover the 12-month window.
#[derive(Debug, Clone, Copy)]
pub struct AnalyticsWindow {
    pub now: DateTime<Utc>,
    /// Start of the 30-day KPI window
    pub since: DateTime<Utc>,
    /// Start of the 12-month trend window
    pub month_since: DateTime<Utc>,
}

impl AnalyticsWindow {
    pub fn trailing(now: DateTime<Utc>) -> Self {
        let month_since = now
            .checked_sub_months(Months::new(12))
            .unwrap_or(now - Duration::days(365));
        Self {
            now,
            since: now - Duration::days(30),
            month_since,
        }
    }
}

/// Accumulated sales for one catalog entry. Name, category and image are
/// first-seen; quantity and revenue accumulate.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProductSales {
    pub key: String,
    pub name: String,
    pub category: Option<String>,
    pub image_ref: Option<String>,
    pub quantity: i64,
    pub revenue: Decimal,
}

/// One day or month trend bucket: attributed sales and order count
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct TrendBucket {
    pub sales: Decimal,
    pub orders: i64,
}

/// Output of a revenue aggregation run.
///
/// Bucket maps are `BTreeMap` keyed by date labels so iteration order, and
/// therefore serialized output, is deterministic: two runs over the same
/// snapshot produce identical results.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RevenueAggregate {
    pub total_quantity: i64,
    pub total_revenue: Decimal,
    pub per_product: Vec<ProductSales>,
    /// Keyed "YYYY-MM-DD", 30-day window
    pub by_day: BTreeMap<String, TrendBucket>,
    /// Keyed "YYYY-MM", 12-month window
    pub by_month: BTreeMap<String, TrendBucket>,
}

impl RevenueAggregate {
    pub fn is_zero(&self) -> bool {
        self.total_quantity == 0 && self.total_revenue.is_zero()
    }
}

/// Aggregate countable orders against a catalog identity index.
///
/// Orders without a `created_at` are excluded from totals and buckets
/// alike. Line items that fail identity resolution are skipped silently;
/// data drift between catalog and order history is expected.
pub fn aggregate(
    orders: &[OrderRecord],
    index: &IdentityIndex<'_>,
    window: &AnalyticsWindow,
) -> RevenueAggregate {
    let mut agg = RevenueAggregate::default();
    // canonical key -> position in agg.per_product, preserving first-seen
    // order so the final stable sort breaks ties by insertion
    let mut slots: HashMap<String, usize> = HashMap::new();

    for order in orders {
        if !classifier::is_countable(order) {
            continue;
        }
        let Some(created_at) = order.created_at else {
            continue;
        };
        if created_at < window.month_since || created_at > window.now {
            continue;
        }
        // Orders whose lines never reference this catalog belong to some
        // other business; they contribute nothing, not even order counts.
        if !order.line_items.iter().any(|item| index.matches_item(item)) {
            continue;
        }

        let attributed = attribute_order(order, index);
        let in_kpi_window = created_at >= window.since;

        if in_kpi_window {
            for line in &attributed.lines {
                agg.total_quantity += line.quantity;
                agg.total_revenue += line.revenue;
                merge_product(&mut agg.per_product, &mut slots, line);
            }
            let day = agg
                .by_day
                .entry(created_at.format("%Y-%m-%d").to_string())
                .or_default();
            day.sales += attributed.order_revenue;
            day.orders += 1;
        }

        let month = agg
            .by_month
            .entry(created_at.format("%Y-%m").to_string())
            .or_default();
        month.sales += attributed.order_revenue;
        month.orders += 1;
    }

    // Descending by quantity; sort_by is stable, so equal quantities keep
    // their first-seen order
    agg.per_product.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    agg
}

/// Revenue attributed to one resolved line
struct AttributedLine<'a> {
    entry: &'a CatalogEntry,
    quantity: i64,
    revenue: Decimal,
}

/// All attributed lines of one order plus their sum
struct AttributedOrder<'a> {
    lines: Vec<AttributedLine<'a>>,
    order_revenue: Decimal,
}

/// Resolve and price the countable lines of one order.
///
/// Unit price precedence: catalog price when positive, the line's captured
/// price otherwise. When no line of the order carries any price source at
/// all, the order total is apportioned across its matched lines by
/// quantity share — order-level fallback only, so a lone unpriced line
/// next to priced ones never skews attribution.
fn attribute_order<'a>(order: &OrderRecord, index: &IdentityIndex<'a>) -> AttributedOrder<'a> {
    let mut lines: Vec<AttributedLine<'a>> = Vec::new();
    let mut any_priced = false;

    for item in &order.line_items {
        if !classifier::is_countable_item(item) {
            continue;
        }
        if item.quantity <= 0 {
            continue;
        }
        let Some(entry) = index.resolve_item(item) else {
            continue;
        };
        let price = unit_price(entry, item);
        if price > Decimal::ZERO {
            any_priced = true;
        }
        lines.push(AttributedLine {
            entry,
            quantity: item.quantity,
            revenue: price * Decimal::from(item.quantity),
        });
    }

    if !any_priced && !lines.is_empty() && order.total_amount > Decimal::ZERO {
        apportion_order_total(&mut lines, order.total_amount);
    }

    let order_revenue = lines.iter().map(|l| l.revenue).sum();
    AttributedOrder {
        lines,
        order_revenue,
    }
}

fn unit_price(entry: &CatalogEntry, item: &LineItem) -> Decimal {
    if entry.unit_price > Decimal::ZERO {
        entry.unit_price
    } else {
        // Malformed or missing monetary data defaults to zero; a
        // best-effort snapshot beats failing the request
        item.unit_price
            .filter(|p| *p > Decimal::ZERO)
            .unwrap_or(Decimal::ZERO)
    }
}

/// Split an order total across lines proportionally by quantity. The last
/// line takes the remainder so the shares sum to the order total exactly.
fn apportion_order_total(lines: &mut [AttributedLine<'_>], total: Decimal) {
    let total_quantity: i64 = lines.iter().map(|l| l.quantity).sum();
    if total_quantity <= 0 {
        return;
    }
    let mut allocated = Decimal::ZERO;
    let last = lines.len() - 1;
    for (i, line) in lines.iter_mut().enumerate() {
        let share = if i == last {
            total - allocated
        } else {
            total * Decimal::from(line.quantity) / Decimal::from(total_quantity)
        };
        line.revenue = share;
        allocated += share;
    }
}

fn merge_product(
    per_product: &mut Vec<ProductSales>,
    slots: &mut HashMap<String, usize>,
    line: &AttributedLine<'_>,
) {
    let key = canonical_key(line.entry);
    match slots.get(&key) {
        Some(&slot) => {
            let product = &mut per_product[slot];
            product.quantity += line.quantity;
            product.revenue += line.revenue;
        }
        None => {
            slots.insert(key.clone(), per_product.len());
            per_product.push(ProductSales {
                key,
                name: line.entry.name.clone(),
                category: line.entry.category.clone(),
                image_ref: line.entry.image_ref.clone(),
                quantity: line.quantity,
                revenue: line.revenue,
            });
        }
    }
}
