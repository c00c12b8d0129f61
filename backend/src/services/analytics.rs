//! Analytics service: the data-fetch collaborator and engine driver
//!
//! Fetches a request-scoped snapshot of a business's catalog and orders,
//! parses raw status strings into the status vocabularies exactly once,
//! then hands both collections to the pure engine in `shared::analytics`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::CatalogService;
use shared::analytics::{self, AnalyticsWindow, IdentityIndex, KpiSnapshot, SeriesPoint};
use shared::models::{
    BusinessRole, CatalogEntry, LineItem, OrderRecord, OrderStatus, PaymentStatus, RefundStatus,
    ShipmentStatus,
};

/// Analytics service
#[derive(Clone)]
pub struct AnalyticsService {
    db: PgPool,
}

/// The dashboard payload: KPI snapshot plus chart-ready trend series
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub kpi: KpiSnapshot,
    pub trends: TrendSeries,
}

#[derive(Debug, Serialize)]
pub struct TrendSeries {
    pub daily: Vec<SeriesPoint>,
    pub monthly: Vec<SeriesPoint>,
    pub yearly: Vec<SeriesPoint>,
}

/// An order row as stored: status fields are free-text strings and the
/// line items a JSONB array. Parsing happens in `into_record`, once.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    buyer_business_id: Option<Uuid>,
    created_at: Option<DateTime<Utc>>,
    status: Option<String>,
    payment_status: Option<String>,
    refund_flag: Option<bool>,
    refund_status: Option<String>,
    refunded_at: Option<DateTime<Utc>>,
    line_items: serde_json::Value,
    shipment_status: Option<String>,
    total_amount: Option<Decimal>,
}

impl AnalyticsService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Compute the dashboard for one business: catalog KPIs, trailing
    /// 30-day sales, 12-month trends and the fulfillment breakdown.
    pub async fn dashboard(
        &self,
        business_id: Uuid,
        role: BusinessRole,
        low_stock_threshold: i64,
    ) -> AppResult<DashboardResponse> {
        let window = AnalyticsWindow::trailing(Utc::now());
        let (entries, orders) = self.fetch_snapshot(business_id, role, &window).await?;

        let index = IdentityIndex::build(&entries);
        let revenue = analytics::revenue::aggregate(&orders, &index, &window);
        let fulfillment = analytics::fulfillment::aggregate(&orders, &index);

        let trends = TrendSeries {
            daily: analytics::series::daily_series(&revenue, &window),
            monthly: analytics::series::monthly_series(&revenue, &window),
            yearly: analytics::series::yearly_series(&revenue),
        };

        let kpi = analytics::kpi::compose(&entries, &revenue, fulfillment, low_stock_threshold);

        Ok(DashboardResponse { kpi, trends })
    }

    /// Export the per-product breakdown of the current dashboard as CSV
    pub async fn export_products_csv(
        &self,
        business_id: Uuid,
        role: BusinessRole,
        low_stock_threshold: i64,
    ) -> AppResult<String> {
        let dashboard = self.dashboard(business_id, role, low_stock_threshold).await?;

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(["key", "name", "category", "quantity", "revenue"])
            .map_err(|e| AppError::Internal(format!("CSV encoding failed: {}", e)))?;

        for product in &dashboard.kpi.top_products {
            writer
                .write_record([
                    product.key.as_str(),
                    product.name.as_str(),
                    product.category.as_deref().unwrap_or(""),
                    &product.quantity.to_string(),
                    &product.revenue.to_string(),
                ])
                .map_err(|e| AppError::Internal(format!("CSV encoding failed: {}", e)))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| AppError::Internal(format!("CSV encoding failed: {}", e)))?;
        String::from_utf8(bytes).map_err(|e| AppError::Internal(format!("CSV encoding failed: {}", e)))
    }

    /// Fetch the catalog and order snapshots the engine runs over.
    ///
    /// Orders are scoped to the business by role (sellers and suppliers see
    /// orders routed to them, buyers see their own purchases) and cut at
    /// the 12-month window start. The finer line-item identity match is
    /// applied in-process by the engine.
    ///
    /// Sellers and suppliers run the engine over their own catalog. Buyers
    /// hold no catalog, so their purchase analytics run over the
    /// counterparty entries their order lines reference.
    async fn fetch_snapshot(
        &self,
        business_id: Uuid,
        role: BusinessRole,
        window: &AnalyticsWindow,
    ) -> AppResult<(Vec<CatalogEntry>, Vec<OrderRecord>)> {
        let scope_column = match role {
            BusinessRole::Seller | BusinessRole::Supplier => "seller_business_id",
            BusinessRole::Buyer => "buyer_business_id",
        };

        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            r#"
            SELECT id, buyer_business_id, created_at, status, payment_status,
                   refund_flag, refund_status, refunded_at, line_items,
                   shipment_status, total_amount
            FROM orders
            WHERE {} = $1
              AND (created_at IS NULL OR created_at >= $2)
            "#,
            scope_column
        ))
        .bind(business_id)
        .bind(window.month_since)
        .fetch_all(&self.db)
        .await?;

        let orders: Vec<OrderRecord> = rows.into_iter().map(OrderRow::into_record).collect();

        let entries = match role {
            BusinessRole::Seller | BusinessRole::Supplier => {
                CatalogService::new(self.db.clone())
                    .list_entries(business_id)
                    .await?
            }
            BusinessRole::Buyer => self.fetch_referenced_entries(&orders).await?,
        };

        Ok((entries, orders))
    }

    /// Fetch the catalog entries referenced by a set of orders, matching
    /// either identifier convention (SKU or internal id).
    async fn fetch_referenced_entries(
        &self,
        orders: &[OrderRecord],
    ) -> AppResult<Vec<CatalogEntry>> {
        let refs: Vec<String> = orders
            .iter()
            .flat_map(|order| order.line_items.iter())
            .filter_map(|item| item.product_ref())
            .map(str::to_string)
            .collect();

        if refs.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, CatalogRefRow>(
            r#"
            SELECT id, business_id, sku, name, unit_price, stock_quantity,
                   lifetime_sold_count, category, image_ref, created_at, updated_at
            FROM catalog_entries
            WHERE sku = ANY($1) OR id::text = ANY($1)
            "#,
        )
        .bind(&refs)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(CatalogRefRow::into_entry).collect())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CatalogRefRow {
    id: Uuid,
    business_id: Uuid,
    sku: String,
    name: String,
    unit_price: Decimal,
    stock_quantity: i64,
    lifetime_sold_count: i64,
    category: Option<String>,
    image_ref: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CatalogRefRow {
    fn into_entry(self) -> CatalogEntry {
        CatalogEntry {
            id: self.id,
            business_id: self.business_id,
            sku: self.sku,
            name: self.name,
            unit_price: self.unit_price,
            stock_quantity: self.stock_quantity,
            lifetime_sold_count: self.lifetime_sold_count,
            category: self.category,
            image_ref: self.image_ref,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl OrderRow {
    /// Parse raw status strings into the status vocabularies. This is the
    /// ingestion boundary; nothing downstream re-normalizes case.
    fn into_record(self) -> OrderRecord {
        let line_items: Vec<LineItem> =
            serde_json::from_value(self.line_items).unwrap_or_else(|e| {
                tracing::warn!("Order {} has malformed line items: {}", self.id, e);
                Vec::new()
            });

        OrderRecord {
            id: self.id,
            buyer_business_id: self.buyer_business_id,
            created_at: self.created_at,
            status: self
                .status
                .as_deref()
                .map(OrderStatus::parse)
                .unwrap_or(OrderStatus::Unknown),
            payment_status: self
                .payment_status
                .as_deref()
                .map(PaymentStatus::parse)
                .unwrap_or(PaymentStatus::Unknown),
            refund_flag: self.refund_flag.unwrap_or(false),
            refund_status: self
                .refund_status
                .as_deref()
                .map(RefundStatus::parse)
                .unwrap_or_default(),
            refunded_at: self.refunded_at,
            line_items,
            shipment_status: self
                .shipment_status
                .as_deref()
                .map(ShipmentStatus::parse)
                .unwrap_or_default(),
            total_amount: self.total_amount.unwrap_or(Decimal::ZERO),
        }
    }
}
