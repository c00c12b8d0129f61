//! Catalog service: a business's product records

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{
    BusinessRole, CatalogEntry, CreateCatalogEntryInput, UpdateCatalogEntryInput,
};
use shared::types::{PaginatedResponse, Pagination, PaginationMeta};
use shared::validation;

/// Catalog service
#[derive(Clone)]
pub struct CatalogService {
    db: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct CatalogRow {
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

const CATALOG_COLUMNS: &str = "id, business_id, sku, name, unit_price, stock_quantity, \
                               lifetime_sold_count, category, image_ref, created_at, updated_at";

impl CatalogService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List one page of a business's catalog entries, newest first
    pub async fn list_entries_paged(
        &self,
        business_id: Uuid,
        pagination: &Pagination,
    ) -> AppResult<PaginatedResponse<CatalogEntry>> {
        let total_items = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM catalog_entries WHERE business_id = $1",
        )
        .bind(business_id)
        .fetch_one(&self.db)
        .await?;

        let rows = sqlx::query_as::<_, CatalogRow>(&format!(
            "SELECT {} FROM catalog_entries WHERE business_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
            CATALOG_COLUMNS
        ))
        .bind(business_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        Ok(PaginatedResponse {
            data: rows.into_iter().map(CatalogRow::into_entry).collect(),
            pagination: PaginationMeta::new(pagination, total_items.max(0) as u64),
        })
    }

    /// List all catalog entries for a business, newest first. The analytics
    /// snapshot needs the whole catalog, not a page of it.
    pub async fn list_entries(&self, business_id: Uuid) -> AppResult<Vec<CatalogEntry>> {
        let rows = sqlx::query_as::<_, CatalogRow>(&format!(
            "SELECT {} FROM catalog_entries WHERE business_id = $1 ORDER BY created_at DESC",
            CATALOG_COLUMNS
        ))
        .bind(business_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(CatalogRow::into_entry).collect())
    }

    /// Fetch a single entry, scoped to the owning business
    pub async fn get_entry(&self, business_id: Uuid, entry_id: Uuid) -> AppResult<CatalogEntry> {
        let row = sqlx::query_as::<_, CatalogRow>(&format!(
            "SELECT {} FROM catalog_entries WHERE id = $1 AND business_id = $2",
            CATALOG_COLUMNS
        ))
        .bind(entry_id)
        .bind(business_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Catalog entry".to_string()))?;

        Ok(row.into_entry())
    }

    /// Create a catalog entry. Buyers hold no catalog of their own.
    pub async fn create_entry(
        &self,
        business_id: Uuid,
        role: BusinessRole,
        input: CreateCatalogEntryInput,
    ) -> AppResult<CatalogEntry> {
        Self::require_catalog_role(role)?;
        validation::validate_catalog_entry(&input)
            .map_err(|msg| AppError::validation("catalog_entry", msg))?;

        let sku = input.sku.trim();

        // Non-empty SKUs must be unique within the business
        if !sku.is_empty() {
            let existing = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM catalog_entries WHERE business_id = $1 AND sku = $2",
            )
            .bind(business_id)
            .bind(sku)
            .fetch_one(&self.db)
            .await?;

            if existing > 0 {
                return Err(AppError::DuplicateEntry("sku".to_string()));
            }
        }

        let row = sqlx::query_as::<_, CatalogRow>(&format!(
            r#"
            INSERT INTO catalog_entries
                (business_id, sku, name, unit_price, stock_quantity, category, image_ref)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            CATALOG_COLUMNS
        ))
        .bind(business_id)
        .bind(sku)
        .bind(input.name.trim())
        .bind(input.unit_price)
        .bind(input.stock_quantity)
        .bind(&input.category)
        .bind(&input.image_ref)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into_entry())
    }

    /// Update the fields of an entry that were provided
    pub async fn update_entry(
        &self,
        business_id: Uuid,
        role: BusinessRole,
        entry_id: Uuid,
        input: UpdateCatalogEntryInput,
    ) -> AppResult<CatalogEntry> {
        Self::require_catalog_role(role)?;

        if let Some(name) = &input.name {
            if name.trim().is_empty() {
                return Err(AppError::validation("name", "Product name is required"));
            }
        }
        if let Some(price) = input.unit_price {
            if price < Decimal::ZERO {
                return Err(AppError::validation("unit_price", "Unit price cannot be negative"));
            }
        }
        if let Some(stock) = input.stock_quantity {
            if stock < 0 {
                return Err(AppError::validation(
                    "stock_quantity",
                    "Stock quantity cannot be negative",
                ));
            }
        }

        let row = sqlx::query_as::<_, CatalogRow>(&format!(
            r#"
            UPDATE catalog_entries
            SET name = COALESCE($3, name),
                unit_price = COALESCE($4, unit_price),
                stock_quantity = COALESCE($5, stock_quantity),
                category = COALESCE($6, category),
                image_ref = COALESCE($7, image_ref),
                updated_at = NOW()
            WHERE id = $1 AND business_id = $2
            RETURNING {}
            "#,
            CATALOG_COLUMNS
        ))
        .bind(entry_id)
        .bind(business_id)
        .bind(input.name.as_deref().map(str::trim))
        .bind(input.unit_price)
        .bind(input.stock_quantity)
        .bind(&input.category)
        .bind(&input.image_ref)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Catalog entry".to_string()))?;

        Ok(row.into_entry())
    }

    fn require_catalog_role(role: BusinessRole) -> AppResult<()> {
        match role {
            BusinessRole::Seller | BusinessRole::Supplier => Ok(()),
            BusinessRole::Buyer => Err(AppError::Unauthorized(
                "Buyer accounts cannot manage a catalog".to_string(),
            )),
        }
    }
}

impl CatalogRow {
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
