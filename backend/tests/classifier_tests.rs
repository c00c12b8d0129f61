//! Transaction classifier tests
//!
//! Countability of orders and line items, plus the case-normalizing status
//! parsers the ingestion boundary relies on.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use shared::analytics::classifier::{is_countable, is_countable_item};
use shared::models::{
    LineItem, OrderRecord, OrderStatus, PaymentStatus, RefundStatus, ShipmentStatus,
};

fn base_order(status: OrderStatus) -> OrderRecord {
    OrderRecord {
        id: Uuid::new_v4(),
        buyer_business_id: None,
        created_at: Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()),
        status,
        payment_status: PaymentStatus::Paid,
        refund_flag: false,
        refund_status: RefundStatus::None,
        refunded_at: None,
        line_items: vec![],
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

    #[test]
    fn paid_states_are_countable() {
        for status in [
            OrderStatus::Completed,
            OrderStatus::Paid,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
        ] {
            assert!(is_countable(&base_order(status)), "{:?}", status);
        }
    }

    #[test]
    fn pending_and_unknown_are_not_countable() {
        assert!(!is_countable(&base_order(OrderStatus::Pending)));
        assert!(!is_countable(&base_order(OrderStatus::Unknown)));
    }

    #[test]
    fn cancelled_and_refund_statuses_exclude() {
        for status in [
            OrderStatus::Cancelled,
            OrderStatus::Refunded,
            OrderStatus::PartiallyRefunded,
            OrderStatus::RefundSubmitted,
        ] {
            assert!(!is_countable(&base_order(status)), "{:?}", status);
        }
    }

    #[test]
    fn refund_adjacent_payment_excludes() {
        for payment in [
            PaymentStatus::Refunded,
            PaymentStatus::PartiallyRefunded,
            PaymentStatus::RefundSubmitted,
            PaymentStatus::RefundPending,
        ] {
            let mut order = base_order(OrderStatus::Completed);
            order.payment_status = payment;
            assert!(!is_countable(&order), "{:?}", payment);
        }
    }

    #[test]
    fn refund_flag_and_timestamp_exclude() {
        let mut order = base_order(OrderStatus::Completed);
        order.refund_flag = true;
        assert!(!is_countable(&order));

        let mut order = base_order(OrderStatus::Completed);
        order.refunded_at = Some(Utc.with_ymd_and_hms(2024, 6, 2, 0, 0, 0).unwrap());
        assert!(!is_countable(&order));
    }

    #[test]
    fn refund_status_markers_exclude() {
        for refund in [
            RefundStatus::Refunded,
            RefundStatus::Partial,
            RefundStatus::Submitted,
        ] {
            let mut order = base_order(OrderStatus::Completed);
            order.refund_status = refund;
            assert!(!is_countable(&order), "{:?}", refund);
        }
    }

    #[test]
    fn clean_line_is_countable() {
        assert!(is_countable_item(&LineItem::default()));
    }

    #[test]
    fn full_refund_markers_exclude_line() {
        let item = LineItem {
            refund_flag: true,
            ..Default::default()
        };
        assert!(!is_countable_item(&item));

        let item = LineItem {
            refund_status: RefundStatus::Refunded,
            ..Default::default()
        };
        assert!(!is_countable_item(&item));

        let item = LineItem {
            refunded_at: Some(Utc.with_ymd_and_hms(2024, 6, 2, 0, 0, 0).unwrap()),
            ..Default::default()
        };
        assert!(!is_countable_item(&item));
    }

    /// A partial refund marker on a line does not exclude it; only full
    /// refunds do
    #[test]
    fn partial_refund_marker_keeps_line() {
        let item = LineItem {
            refund_status: RefundStatus::Partial,
            ..Default::default()
        };
        assert!(is_countable_item(&item));
    }

    #[test]
    fn cancelled_spelling_variants_all_parse() {
        for raw in ["CANCELLED", "canceled", "Voided"] {
            assert_eq!(OrderStatus::parse(raw), OrderStatus::Cancelled);
        }
    }

    #[test]
    fn full_refund_spelling_variants_all_parse() {
        for raw in ["REFUNDED", "full", "FULLY_REFUNDED"] {
            assert_eq!(OrderStatus::parse(raw), OrderStatus::Refunded);
            assert_eq!(RefundStatus::parse(raw), RefundStatus::Refunded);
        }
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn status_string() -> impl Strategy<Value = String> {
        prop::sample::select(vec![
            "pending",
            "completed",
            "paid",
            "shipped",
            "delivered",
            "cancelled",
            "canceled",
            "voided",
            "refunded",
            "partially_refunded",
            "refund_submitted",
            "something_else",
        ])
        .prop_map(str::to_string)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Status parsing ignores casing and surrounding whitespace
        #[test]
        fn prop_status_parse_is_case_and_space_insensitive(
            raw in status_string(),
            upper in any::<bool>(),
            pad in 0..4usize
        ) {
            let mut variant = if upper {
                raw.to_ascii_uppercase()
            } else {
                raw.clone()
            };
            variant = format!("{}{}{}", " ".repeat(pad), variant, " ".repeat(pad));
            prop_assert_eq!(OrderStatus::parse(&variant), OrderStatus::parse(&raw));
        }

        /// A set refund flag excludes an order no matter its status
        #[test]
        fn prop_refund_flag_always_excludes(raw in status_string()) {
            let mut order = base_order(OrderStatus::parse(&raw));
            order.refund_flag = true;
            prop_assert!(!is_countable(&order));
        }

        /// Countable implies a paid status; the reverse direction is what
        /// refund markers break
        #[test]
        fn prop_countable_implies_paid_status(raw in status_string()) {
            let order = base_order(OrderStatus::parse(&raw));
            if is_countable(&order) {
                prop_assert!(order.status.is_paid());
            }
        }
    }
}
