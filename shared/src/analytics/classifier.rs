//! Transaction classification
//!
//! Pure predicates deciding whether an order, or a single line within it,
//! may count toward revenue. Refunds and cancellations must never inflate
//! seller or supplier KPIs, so exclusion applies at both granularities: a
//! refunded order contributes nothing, and a refunded line inside an
//! otherwise valid order is dropped while its sibling lines still count.

use crate::models::{LineItem, OrderRecord};

/// Whether an order's revenue may be attributed to a business.
///
/// Exclusions are checked first: cancellation, any refund marker on the
/// status, refund status or payment status, the refund flag, or a recorded
/// refund timestamp. An order that survives them is countable only when
/// its status is a paid state (completed, paid, shipped, delivered).
pub fn is_countable(order: &OrderRecord) -> bool {
    if order.status.is_cancelled() || order.status.is_refund() {
        return false;
    }
    if order.refund_status.is_refund() {
        return false;
    }
    if order.payment_status.is_refund_adjacent() {
        return false;
    }
    if order.refund_flag || order.refunded_at.is_some() {
        return false;
    }
    order.status.is_paid()
}

/// Whether a line item may contribute revenue, independent of order-level
/// inclusion. Only full-refund markers exclude a line; partial-refund
/// orders still contribute revenue from their non-refunded lines.
pub fn is_countable_item(item: &LineItem) -> bool {
    !(item.refund_flag || item.refund_status.is_full_refund() || item.refunded_at.is_some())
}
