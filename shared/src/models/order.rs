//! Order and line item models
//!
//! Orders arrive from the order-management collaborator with status fields
//! stored as free-text strings in whatever casing the importing system
//! used. All of them are parsed into tagged enums exactly once, at the
//! ingestion boundary; the analytics engine never re-normalizes case.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Order lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Completed,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
    PartiallyRefunded,
    RefundSubmitted,
    Unknown,
}

impl OrderStatus {
    /// Parse a raw status string, accepting the casing and spelling
    /// variants found in historical data
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PENDING" => OrderStatus::Pending,
            "COMPLETED" => OrderStatus::Completed,
            "PAID" => OrderStatus::Paid,
            "SHIPPED" => OrderStatus::Shipped,
            "DELIVERED" => OrderStatus::Delivered,
            "CANCELLED" | "CANCELED" | "VOIDED" => OrderStatus::Cancelled,
            "REFUNDED" | "FULL" | "FULLY_REFUNDED" => OrderStatus::Refunded,
            "PARTIALLY_REFUNDED" => OrderStatus::PartiallyRefunded,
            "REFUND_SUBMITTED" => OrderStatus::RefundSubmitted,
            _ => OrderStatus::Unknown,
        }
    }

    /// Paid states: the only statuses that may count toward revenue
    pub fn is_paid(&self) -> bool {
        matches!(
            self,
            OrderStatus::Completed
                | OrderStatus::Paid
                | OrderStatus::Shipped
                | OrderStatus::Delivered
        )
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, OrderStatus::Cancelled)
    }

    pub fn is_refund(&self) -> bool {
        matches!(
            self,
            OrderStatus::Refunded | OrderStatus::PartiallyRefunded | OrderStatus::RefundSubmitted
        )
    }
}

/// Payment status as reported by the payment collaborator
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
    PartiallyRefunded,
    RefundSubmitted,
    RefundPending,
    Unknown,
}

impl PaymentStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => PaymentStatus::Pending,
            "paid" => PaymentStatus::Paid,
            "refunded" => PaymentStatus::Refunded,
            "partially_refunded" => PaymentStatus::PartiallyRefunded,
            "refund_submitted" => PaymentStatus::RefundSubmitted,
            "refund_pending" => PaymentStatus::RefundPending,
            _ => PaymentStatus::Unknown,
        }
    }

    /// Refund-adjacent payment states exclude an order from revenue
    pub fn is_refund_adjacent(&self) -> bool {
        matches!(
            self,
            PaymentStatus::Refunded
                | PaymentStatus::PartiallyRefunded
                | PaymentStatus::RefundSubmitted
                | PaymentStatus::RefundPending
        )
    }
}

/// Refund marker attached to orders and line items
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RefundStatus {
    #[default]
    None,
    /// Full refund; accepts REFUNDED, FULL and FULLY_REFUNDED spellings
    Refunded,
    Partial,
    Submitted,
    Unknown,
}

impl RefundStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "" | "NONE" => RefundStatus::None,
            "REFUNDED" | "FULL" | "FULLY_REFUNDED" => RefundStatus::Refunded,
            "PARTIALLY_REFUNDED" | "PARTIAL" => RefundStatus::Partial,
            "REFUND_SUBMITTED" => RefundStatus::Submitted,
            _ => RefundStatus::Unknown,
        }
    }

    /// Any recorded refund activity, full or partial
    pub fn is_refund(&self) -> bool {
        matches!(
            self,
            RefundStatus::Refunded | RefundStatus::Partial | RefundStatus::Submitted
        )
    }

    /// Full refund of the order or line
    pub fn is_full_refund(&self) -> bool {
        matches!(self, RefundStatus::Refunded)
    }
}

/// Shipment tracking status; missing or unrecognized values fall back to
/// Pending
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    InTransit,
    Delivered,
}

impl ShipmentStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PROCESSING" => ShipmentStatus::Processing,
            "SHIPPED" => ShipmentStatus::Shipped,
            "IN_TRANSIT" => ShipmentStatus::InTransit,
            "DELIVERED" => ShipmentStatus::Delivered,
            _ => ShipmentStatus::Pending,
        }
    }
}

/// One product-quantity-price entry within an order.
///
/// Line items are stored as a JSON array on the order row. Several
/// historical schema conventions exist for the product reference, so all
/// identifier fields are optional and tried in a fixed precedence order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineItem {
    /// Structured product reference (newest convention)
    #[serde(default, alias = "productId")]
    pub product_id: Option<String>,
    /// Merchant custom id (mid-era convention)
    #[serde(default, alias = "customId")]
    pub custom_id: Option<String>,
    /// Abbreviated product id (legacy convention)
    #[serde(default)]
    pub pid: Option<String>,
    /// Free-text SKU (oldest convention)
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub quantity: i64,
    /// Price captured at order time; absent on legacy rows
    #[serde(default, alias = "unitPrice")]
    pub unit_price: Option<Decimal>,
    #[serde(default, alias = "itemRefundFlag")]
    pub refund_flag: bool,
    #[serde(default, alias = "itemRefundStatus")]
    pub refund_status: RefundStatus,
    #[serde(default, alias = "itemRefundedAt")]
    pub refunded_at: Option<DateTime<Utc>>,
}

impl LineItem {
    /// Resolve the product reference by trying, in order, product_id,
    /// custom_id, pid, sku. The first trimmed, non-empty value wins. The
    /// precedence is a contract; callers must not reorder it.
    pub fn product_ref(&self) -> Option<&str> {
        [&self.product_id, &self.custom_id, &self.pid, &self.sku]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .map(str::trim)
            .find(|s| !s.is_empty())
    }
}

/// An order as read from the persistence collaborator.
///
/// Immutable once settled except for status/refund transitions appended by
/// the external payment/fulfillment collaborator. The analytics engine
/// never mutates orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: Uuid,
    /// Set when a registered buyer placed the order; used for buyer-side
    /// purchase analytics
    pub buyer_business_id: Option<Uuid>,
    /// Missing on a small number of historical imports
    pub created_at: Option<DateTime<Utc>>,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub refund_flag: bool,
    pub refund_status: RefundStatus,
    pub refunded_at: Option<DateTime<Utc>>,
    pub line_items: Vec<LineItem>,
    pub shipment_status: ShipmentStatus,
    pub total_amount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_status_parse_is_case_insensitive() {
        assert_eq!(OrderStatus::parse("completed"), OrderStatus::Completed);
        assert_eq!(OrderStatus::parse("Completed"), OrderStatus::Completed);
        assert_eq!(OrderStatus::parse(" SHIPPED "), OrderStatus::Shipped);
        assert_eq!(OrderStatus::parse("canceled"), OrderStatus::Cancelled);
        assert_eq!(OrderStatus::parse("VOIDED"), OrderStatus::Cancelled);
        assert_eq!(OrderStatus::parse("garbage"), OrderStatus::Unknown);
    }

    #[test]
    fn refund_status_accepts_all_full_refund_spellings() {
        for raw in ["REFUNDED", "full", "Fully_Refunded"] {
            assert_eq!(RefundStatus::parse(raw), RefundStatus::Refunded);
        }
        assert_eq!(RefundStatus::parse(""), RefundStatus::None);
        assert_eq!(RefundStatus::parse("refund_submitted"), RefundStatus::Submitted);
    }

    #[test]
    fn shipment_status_defaults_to_pending() {
        assert_eq!(ShipmentStatus::parse("lost_in_warehouse"), ShipmentStatus::Pending);
        assert_eq!(ShipmentStatus::parse(""), ShipmentStatus::Pending);
        assert_eq!(ShipmentStatus::parse("in_transit"), ShipmentStatus::InTransit);
    }

    #[test]
    fn product_ref_precedence_is_fixed() {
        let item = LineItem {
            product_id: Some("P-1".into()),
            custom_id: Some("C-1".into()),
            pid: Some("1".into()),
            sku: Some("SKU-1".into()),
            ..Default::default()
        };
        assert_eq!(item.product_ref(), Some("P-1"));

        let item = LineItem {
            product_id: Some("   ".into()),
            custom_id: None,
            pid: Some("1".into()),
            sku: Some("SKU-1".into()),
            ..Default::default()
        };
        assert_eq!(item.product_ref(), Some("1"));

        let item = LineItem::default();
        assert_eq!(item.product_ref(), None);
    }

    #[test]
    fn line_items_deserialize_from_legacy_field_names() {
        let raw = r#"{
            "productId": "a5e2",
            "quantity": 3,
            "unitPrice": "19.90",
            "itemRefundFlag": false
        }"#;
        let item: LineItem = serde_json::from_str(raw).unwrap();
        assert_eq!(item.product_ref(), Some("a5e2"));
        assert_eq!(item.quantity, 3);
        assert!(item.unit_price.is_some());
    }
}
