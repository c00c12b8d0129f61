//! Revenue analytics engine tests
//!
//! Covers the aggregation pipeline end to end:
//! - Windowed revenue attribution and identity resolution
//! - Refund-aware exclusion at order and line granularity
//! - The order-total apportionment fallback
//! - KPI composition and the catalog fallback estimate

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use shared::analytics::{self, AnalyticsWindow, IdentityIndex};
use shared::models::{
    CatalogEntry, LineItem, OrderRecord, OrderStatus, PaymentStatus, RefundStatus, ShipmentStatus,
};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

fn window() -> AnalyticsWindow {
    AnalyticsWindow::trailing(now())
}

fn entry(sku: &str, price: &str, stock: i64) -> CatalogEntry {
    CatalogEntry {
        id: Uuid::new_v4(),
        business_id: Uuid::new_v4(),
        sku: sku.to_string(),
        name: format!("Product {}", sku),
        unit_price: dec(price),
        stock_quantity: stock,
        lifetime_sold_count: 0,
        category: None,
        image_ref: None,
        created_at: now(),
        updated_at: now(),
    }
}

fn line(reference: &str, quantity: i64) -> LineItem {
    LineItem {
        sku: Some(reference.to_string()),
        quantity,
        ..Default::default()
    }
}

fn order(created_at: Option<DateTime<Utc>>, status: OrderStatus, lines: Vec<LineItem>) -> OrderRecord {
    OrderRecord {
        id: Uuid::new_v4(),
        buyer_business_id: None,
        created_at,
        status,
        payment_status: PaymentStatus::Paid,
        refund_flag: false,
        refund_status: RefundStatus::None,
        refunded_at: None,
        line_items: lines,
        shipment_status: ShipmentStatus::Pending,
        total_amount: Decimal::ZERO,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Scenario A: one completed order, quantity 2 at catalog price 100
    #[test]
    fn completed_order_attributes_catalog_price() {
        let entries = vec![entry("SKU-1", "100", 5)];
        let index = IdentityIndex::build(&entries);
        let orders = vec![order(
            Some(now() - Duration::days(1)),
            OrderStatus::Completed,
            vec![line("SKU-1", 2)],
        )];

        let agg = analytics::revenue::aggregate(&orders, &index, &window());
        assert_eq!(agg.total_quantity, 2);
        assert_eq!(agg.total_revenue, dec("200"));
        assert_eq!(agg.per_product.len(), 1);
        assert_eq!(agg.per_product[0].key, "SKU-1");
        assert_eq!(agg.by_day.len(), 1);
        assert_eq!(agg.by_month.len(), 1);
    }

    /// Scenario B: a refunded order contributes exactly nothing
    #[test]
    fn refunded_order_contributes_nothing() {
        let entries = vec![entry("SKU-1", "100", 5)];
        let index = IdentityIndex::build(&entries);
        let orders = vec![order(
            Some(now() - Duration::days(1)),
            OrderStatus::Refunded,
            vec![line("SKU-1", 2)],
        )];

        let agg = analytics::revenue::aggregate(&orders, &index, &window());
        assert_eq!(agg.total_quantity, 0);
        assert_eq!(agg.total_revenue, Decimal::ZERO);
        assert!(agg.by_day.is_empty());
        assert!(agg.by_month.is_empty());

        // With lifetime_sold_count = 0 the fallback estimate is also zero
        let fulfillment = analytics::fulfillment::aggregate(&orders, &index);
        let kpi = analytics::kpi::compose(&entries, &agg, fulfillment, 10);
        assert_eq!(kpi.sold_quantity, 0);
        assert_eq!(kpi.revenue, Decimal::ZERO);
        assert!(kpi.lifetime_estimate);
    }

    /// Scenario C: only the non-refunded line of a partially refunded order
    /// counts
    #[test]
    fn partial_refund_counts_only_clean_lines() {
        let entries = vec![entry("SKU-A", "50", 5), entry("SKU-B", "20", 5)];
        let index = IdentityIndex::build(&entries);

        let refunded_line = LineItem {
            sku: Some("SKU-A".to_string()),
            quantity: 1,
            refund_flag: true,
            ..Default::default()
        };
        let orders = vec![order(
            Some(now() - Duration::days(2)),
            OrderStatus::Completed,
            vec![refunded_line, line("SKU-B", 3)],
        )];

        let agg = analytics::revenue::aggregate(&orders, &index, &window());
        assert_eq!(agg.total_quantity, 3);
        assert_eq!(agg.total_revenue, dec("60"));
        assert_eq!(agg.per_product.len(), 1);
        assert_eq!(agg.per_product[0].key, "SKU-B");
    }

    /// Scenario D: no order history falls back to lifetime catalog counters
    #[test]
    fn fallback_estimate_uses_lifetime_counters() {
        let mut product = entry("SKU-1", "10", 5);
        product.lifetime_sold_count = 7;
        let entries = vec![product];

        let agg = analytics::revenue::aggregate(&[], &IdentityIndex::build(&entries), &window());
        assert!(agg.is_zero());

        let kpi = analytics::kpi::compose(&entries, &agg, Default::default(), 10);
        assert!(kpi.lifetime_estimate);
        assert_eq!(kpi.sold_quantity, 7);
        assert_eq!(kpi.revenue, dec("70.00"));
        assert_eq!(kpi.top_products.len(), 1);
    }

    /// Scenario E: the low-stock boundary is inclusive, stock above it is not
    /// low
    #[test]
    fn low_stock_boundary_is_inclusive() {
        let entries = vec![
            entry("AT", "10", 10),    // exactly at the threshold
            entry("ABOVE", "10", 11), // just above
            entry("OUT", "10", 0),    // out of stock entirely
        ];
        let agg = analytics::revenue::aggregate(&[], &IdentityIndex::build(&entries), &window());
        let kpi = analytics::kpi::compose(&entries, &agg, Default::default(), 10);

        assert_eq!(kpi.low_stock, 1);
        assert_eq!(kpi.in_stock, 2);
        assert_eq!(kpi.out_of_stock, 1);
        assert_eq!(kpi.product_count, 3);
        assert_eq!(kpi.stock_count, 21);
        assert_eq!(kpi.inventory_value, dec("210.00"));
    }

    /// Orders without a creation timestamp are excluded from totals and
    /// buckets alike
    #[test]
    fn missing_created_at_excludes_order_entirely() {
        let entries = vec![entry("SKU-1", "100", 5)];
        let index = IdentityIndex::build(&entries);
        let orders = vec![order(None, OrderStatus::Completed, vec![line("SKU-1", 2)])];

        let agg = analytics::revenue::aggregate(&orders, &index, &window());
        assert_eq!(agg.total_quantity, 0);
        assert!(agg.by_day.is_empty());
        assert!(agg.by_month.is_empty());
    }

    /// Orders older than the 30-day window still land in month buckets
    #[test]
    fn old_orders_feed_month_buckets_only() {
        let entries = vec![entry("SKU-1", "100", 5)];
        let index = IdentityIndex::build(&entries);
        let orders = vec![order(
            Some(now() - Duration::days(90)),
            OrderStatus::Completed,
            vec![line("SKU-1", 2)],
        )];

        let agg = analytics::revenue::aggregate(&orders, &index, &window());
        assert_eq!(agg.total_quantity, 0);
        assert_eq!(agg.total_revenue, Decimal::ZERO);
        assert!(agg.by_day.is_empty());
        assert_eq!(agg.by_month.len(), 1);
        let bucket = agg.by_month.get("2024-03").unwrap();
        assert_eq!(bucket.orders, 1);
        assert_eq!(bucket.sales, dec("200"));
    }

    /// When no line carries a price, the order total is split by quantity
    /// share and the last line absorbs the rounding remainder
    #[test]
    fn order_total_apportioned_by_quantity_share() {
        let entries = vec![entry("SKU-A", "0", 5), entry("SKU-B", "0", 5)];
        let index = IdentityIndex::build(&entries);

        let mut o = order(
            Some(now() - Duration::days(1)),
            OrderStatus::Completed,
            vec![line("SKU-A", 1), line("SKU-B", 3)],
        );
        o.total_amount = dec("100");

        let agg = analytics::revenue::aggregate(&[o], &index, &window());
        assert_eq!(agg.total_revenue, dec("100"));

        let a = agg.per_product.iter().find(|p| p.key == "SKU-A").unwrap();
        let b = agg.per_product.iter().find(|p| p.key == "SKU-B").unwrap();
        assert_eq!(a.revenue, dec("25"));
        assert_eq!(b.revenue, dec("75"));
    }

    /// The apportionment fallback is order-level: one priced line disables it
    #[test]
    fn apportionment_skipped_when_any_line_is_priced() {
        let entries = vec![entry("SKU-A", "10", 5), entry("SKU-B", "0", 5)];
        let index = IdentityIndex::build(&entries);

        let mut o = order(
            Some(now() - Duration::days(1)),
            OrderStatus::Completed,
            vec![line("SKU-A", 1), line("SKU-B", 3)],
        );
        o.total_amount = dec("500");

        let agg = analytics::revenue::aggregate(&[o], &index, &window());
        // SKU-A priced from catalog, SKU-B stays zero; the order total is
        // never consulted
        assert_eq!(agg.total_revenue, dec("10"));
    }

    /// Lines referencing the same product through different identifier
    /// conventions merge into one per-product row
    #[test]
    fn mixed_identifier_conventions_do_not_split_attribution() {
        let entries = vec![entry("SKU-1", "10", 5)];
        let index = IdentityIndex::build(&entries);
        let id_reference = entries[0].id.to_string();

        let by_id = LineItem {
            product_id: Some(id_reference),
            quantity: 2,
            ..Default::default()
        };
        let orders = vec![order(
            Some(now() - Duration::days(1)),
            OrderStatus::Completed,
            vec![line("SKU-1", 3), by_id],
        )];

        let agg = analytics::revenue::aggregate(&orders, &index, &window());
        assert_eq!(agg.per_product.len(), 1);
        assert_eq!(agg.per_product[0].key, "SKU-1");
        assert_eq!(agg.per_product[0].quantity, 5);
        assert_eq!(agg.total_revenue, dec("50"));
    }

    /// Unmatched lines are skipped silently; an order with no matching lines
    /// is skipped entirely, order count included
    #[test]
    fn foreign_orders_are_invisible() {
        let entries = vec![entry("SKU-1", "10", 5)];
        let index = IdentityIndex::build(&entries);
        let orders = vec![
            order(
                Some(now() - Duration::days(1)),
                OrderStatus::Completed,
                vec![line("OTHER-SHOP-SKU", 4)],
            ),
            order(
                Some(now() - Duration::days(1)),
                OrderStatus::Completed,
                vec![line("SKU-1", 1), line("OTHER-SHOP-SKU", 9)],
            ),
        ];

        let agg = analytics::revenue::aggregate(&orders, &index, &window());
        assert_eq!(agg.total_quantity, 1);
        assert_eq!(agg.by_day.values().map(|b| b.orders).sum::<i64>(), 1);
    }

    /// Per-product rows are sorted descending by quantity; ties keep their
    /// first-seen order
    #[test]
    fn per_product_sorted_descending_by_quantity() {
        let entries = vec![
            entry("LOW", "10", 5),
            entry("HIGH", "10", 5),
            entry("MID", "10", 5),
        ];
        let index = IdentityIndex::build(&entries);
        let orders = vec![order(
            Some(now() - Duration::days(1)),
            OrderStatus::Completed,
            vec![line("LOW", 1), line("HIGH", 9), line("MID", 4)],
        )];

        let agg = analytics::revenue::aggregate(&orders, &index, &window());
        let keys: Vec<&str> = agg.per_product.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["HIGH", "MID", "LOW"]);
    }

    /// Two runs over the same snapshot produce identical serialized output
    #[test]
    fn aggregation_is_idempotent() {
        let entries = vec![entry("SKU-1", "19.90", 5), entry("SKU-2", "5", 3)];
        let index = IdentityIndex::build(&entries);
        let orders = vec![
            order(
                Some(now() - Duration::days(3)),
                OrderStatus::Completed,
                vec![line("SKU-1", 2), line("SKU-2", 1)],
            ),
            order(
                Some(now() - Duration::days(40)),
                OrderStatus::Shipped,
                vec![line("SKU-2", 7)],
            ),
        ];

        let first = analytics::revenue::aggregate(&orders, &index, &window());
        let second = analytics::revenue::aggregate(&orders, &index, &window());
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    /// KPI revenue is rounded to 2 places at the composition boundary
    #[test]
    fn kpi_rounds_at_output_boundary() {
        let entries = vec![entry("SKU-1", "3.333", 5)];
        let index = IdentityIndex::build(&entries);
        let orders = vec![order(
            Some(now() - Duration::days(1)),
            OrderStatus::Completed,
            vec![line("SKU-1", 3)],
        )];

        let agg = analytics::revenue::aggregate(&orders, &index, &window());
        // Accumulation stays unrounded
        assert_eq!(agg.total_revenue, dec("9.999"));

        let kpi = analytics::kpi::compose(&entries, &agg, Default::default(), 10);
        assert_eq!(kpi.revenue, dec("10.00"));
        assert_eq!(kpi.top_products[0].revenue, dec("10.00"));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn quantity_strategy() -> impl Strategy<Value = i64> {
        1..50i64
    }

    /// Prices as cents so generated decimals stay well-formed
    fn price_strategy() -> impl Strategy<Value = Decimal> {
        (1..100_000i64).prop_map(|cents| Decimal::new(cents, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Per-product revenue always sums to total revenue
        #[test]
        fn prop_per_product_revenue_sums_to_total(
            lines in prop::collection::vec((quantity_strategy(), price_strategy()), 1..8)
        ) {
            let entries: Vec<CatalogEntry> = lines
                .iter()
                .enumerate()
                .map(|(i, (_, price))| {
                    let mut e = entry(&format!("SKU-{}", i), "0", 5);
                    e.unit_price = *price;
                    e
                })
                .collect();
            let index = IdentityIndex::build(&entries);

            let order_lines = lines
                .iter()
                .enumerate()
                .map(|(i, (quantity, _))| line(&format!("SKU-{}", i), *quantity))
                .collect();
            let orders = vec![order(
                Some(now() - Duration::days(1)),
                OrderStatus::Completed,
                order_lines,
            )];

            let agg = analytics::revenue::aggregate(&orders, &index, &window());
            let per_product_sum: Decimal = agg.per_product.iter().map(|p| p.revenue).sum();
            prop_assert!((per_product_sum - agg.total_revenue).abs() < dec("0.01"));
        }

        /// The apportionment fallback preserves the order total exactly
        #[test]
        fn prop_apportionment_preserves_order_total(
            quantities in prop::collection::vec(quantity_strategy(), 1..8),
            total in price_strategy()
        ) {
            let entries: Vec<CatalogEntry> = quantities
                .iter()
                .enumerate()
                .map(|(i, _)| entry(&format!("SKU-{}", i), "0", 5))
                .collect();
            let index = IdentityIndex::build(&entries);

            let order_lines = quantities
                .iter()
                .enumerate()
                .map(|(i, quantity)| line(&format!("SKU-{}", i), *quantity))
                .collect();
            let mut o = order(
                Some(now() - Duration::days(1)),
                OrderStatus::Completed,
                order_lines,
            );
            o.total_amount = total;

            let agg = analytics::revenue::aggregate(&[o], &index, &window());
            prop_assert_eq!(agg.total_revenue, total);
            let per_product_sum: Decimal = agg.per_product.iter().map(|p| p.revenue).sum();
            prop_assert_eq!(per_product_sum, total);
        }

        /// Orders carrying any refund marker contribute exactly zero
        #[test]
        fn prop_refund_markers_exclude_order(
            quantity in quantity_strategy(),
            marker in 0..4usize
        ) {
            let entries = vec![entry("SKU-1", "10", 5)];
            let index = IdentityIndex::build(&entries);

            let mut o = order(
                Some(now() - Duration::days(1)),
                OrderStatus::Completed,
                vec![line("SKU-1", quantity)],
            );
            match marker {
                0 => o.refund_flag = true,
                1 => o.refund_status = RefundStatus::Partial,
                2 => o.payment_status = PaymentStatus::RefundPending,
                _ => o.refunded_at = Some(now()),
            }

            let agg = analytics::revenue::aggregate(&[o], &index, &window());
            prop_assert_eq!(agg.total_quantity, 0);
            prop_assert_eq!(agg.total_revenue, Decimal::ZERO);
            prop_assert!(agg.by_day.is_empty());
            prop_assert!(agg.by_month.is_empty());
        }

        /// Sold quantity equals the sum of countable matched line quantities
        #[test]
        fn prop_quantities_accumulate_exactly(
            quantities in prop::collection::vec(quantity_strategy(), 1..10)
        ) {
            let entries = vec![entry("SKU-1", "10", 5)];
            let index = IdentityIndex::build(&entries);

            let orders: Vec<OrderRecord> = quantities
                .iter()
                .map(|q| {
                    order(
                        Some(now() - Duration::days(1)),
                        OrderStatus::Completed,
                        vec![line("SKU-1", *q)],
                    )
                })
                .collect();

            let agg = analytics::revenue::aggregate(&orders, &index, &window());
            let expected: i64 = quantities.iter().sum();
            prop_assert_eq!(agg.total_quantity, expected);
            prop_assert_eq!(agg.per_product[0].quantity, expected);
        }
    }
}
