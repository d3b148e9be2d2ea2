//! Product catalog service
//!
//! Owns the product reference data that the valuation and turnover engines
//! consume: name, SKU, category, and the cost/sell price pair.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{PaginatedResponse, Pagination, PaginationMeta, Product};

/// Catalog service for managing products
#[derive(Clone)]
pub struct CatalogService {
    db: PgPool,
}

/// Row for product queries
#[derive(Debug, FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    sku: String,
    category: String,
    cost_price: Option<Decimal>,
    sell_price: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            sku: row.sku,
            category: row.category,
            cost_price: row.cost_price,
            sell_price: row.sell_price,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Input for creating a product
#[derive(Debug, Deserialize)]
pub struct CreateProductInput {
    pub name: String,
    pub sku: String,
    pub category: String,
    pub cost_price: Option<Decimal>,
    pub sell_price: Decimal,
}

/// Input for updating a product
#[derive(Debug, Deserialize)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub category: Option<String>,
    pub cost_price: Option<Decimal>,
    pub sell_price: Option<Decimal>,
}

impl CatalogService {
    /// Create a new CatalogService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a product
    pub async fn create_product(&self, input: CreateProductInput) -> AppResult<Product> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Name cannot be empty".to_string(),
            });
        }
        shared::validate_sku(&input.sku).map_err(|msg| AppError::Validation {
            field: "sku".to_string(),
            message: msg.to_string(),
        })?;
        if let Some(cost) = input.cost_price {
            shared::validate_price(cost).map_err(|msg| AppError::Validation {
                field: "cost_price".to_string(),
                message: msg.to_string(),
            })?;
        }
        shared::validate_price(input.sell_price).map_err(|msg| AppError::Validation {
            field: "sell_price".to_string(),
            message: msg.to_string(),
        })?;

        let sku_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE sku = $1)",
        )
        .bind(&input.sku)
        .fetch_one(&self.db)
        .await?;

        if sku_exists {
            return Err(AppError::DuplicateEntry("sku".to_string()));
        }

        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            INSERT INTO products (name, sku, category, cost_price, sell_price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, sku, category, cost_price, sell_price, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.sku)
        .bind(&input.category)
        .bind(input.cost_price)
        .bind(input.sell_price)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Get a product by id
    pub async fn get_product(&self, product_id: Uuid) -> AppResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, sku, category, cost_price, sell_price, created_at, updated_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(row.into())
    }

    /// List products, optionally filtered by category
    pub async fn list_products(
        &self,
        category: Option<&str>,
        pagination: &Pagination,
    ) -> AppResult<PaginatedResponse<Product>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM products WHERE ($1::text IS NULL OR category = $1)",
        )
        .bind(category)
        .fetch_one(&self.db)
        .await?;

        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, sku, category, cost_price, sell_price, created_at, updated_at
            FROM products
            WHERE ($1::text IS NULL OR category = $1)
            ORDER BY name ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(category)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        Ok(PaginatedResponse {
            data: rows.into_iter().map(Product::from).collect(),
            pagination: PaginationMeta::new(pagination, total as u64),
        })
    }

    /// Update a product
    pub async fn update_product(
        &self,
        product_id: Uuid,
        input: UpdateProductInput,
    ) -> AppResult<Product> {
        let existing = self.get_product(product_id).await?;

        let name = input.name.unwrap_or(existing.name);
        let category = input.category.unwrap_or(existing.category);
        let cost_price = input.cost_price.or(existing.cost_price);
        let sell_price = input.sell_price.unwrap_or(existing.sell_price);

        if name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Name cannot be empty".to_string(),
            });
        }
        if let Some(cost) = cost_price {
            shared::validate_price(cost).map_err(|msg| AppError::Validation {
                field: "cost_price".to_string(),
                message: msg.to_string(),
            })?;
        }
        shared::validate_price(sell_price).map_err(|msg| AppError::Validation {
            field: "sell_price".to_string(),
            message: msg.to_string(),
        })?;

        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            UPDATE products
            SET name = $1, category = $2, cost_price = $3, sell_price = $4, updated_at = NOW()
            WHERE id = $5
            RETURNING id, name, sku, category, cost_price, sell_price, created_at, updated_at
            "#,
        )
        .bind(&name)
        .bind(&category)
        .bind(cost_price)
        .bind(sell_price)
        .bind(product_id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// List distinct product categories
    pub async fn list_categories(&self) -> AppResult<Vec<String>> {
        let categories = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT category FROM products ORDER BY category ASC",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(categories)
    }
}
