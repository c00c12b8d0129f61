//! Fulfillment aggregation
//!
//! Buckets countable orders by shipment-tracking status. Shipment status
//! reflects logistics, not revenue, so item-level refunds do not exclude
//! an order here — only order-level countability and catalog membership do.

use serde::Serialize;

use super::classifier;
use super::identity::IdentityIndex;
use crate::models::{OrderRecord, ShipmentStatus};

/// Order counts per shipment status
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct FulfillmentBreakdown {
    pub pending: i64,
    pub processing: i64,
    pub shipped: i64,
    pub in_transit: i64,
    pub delivered: i64,
}

impl FulfillmentBreakdown {
    pub fn total(&self) -> i64 {
        self.pending + self.processing + self.shipped + self.in_transit + self.delivered
    }
}

/// Count countable orders whose line items intersect the catalog key set.
/// Unrecognized or missing shipment statuses were normalized to Pending at
/// the ingestion boundary. Counts are order counts, not line counts.
pub fn aggregate(orders: &[OrderRecord], index: &IdentityIndex<'_>) -> FulfillmentBreakdown {
    let mut breakdown = FulfillmentBreakdown::default();
    for order in orders {
        if !classifier::is_countable(order) {
            continue;
        }
        if !order.line_items.iter().any(|item| index.matches_item(item)) {
            continue;
        }
        match order.shipment_status {
            ShipmentStatus::Pending => breakdown.pending += 1,
            ShipmentStatus::Processing => breakdown.processing += 1,
            ShipmentStatus::Shipped => breakdown.shipped += 1,
            ShipmentStatus::InTransit => breakdown.in_transit += 1,
            ShipmentStatus::Delivered => breakdown.delivered += 1,
        }
    }
    breakdown
}
