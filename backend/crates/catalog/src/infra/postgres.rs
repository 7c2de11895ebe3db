//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::id::ProductId;
use sqlx::PgPool;

use crate::domain::entities::{NewProduct, Product};
use crate::domain::repository::ProductRepository;
use crate::domain::value_objects::ProductQuery;
use crate::error::{CatalogError, CatalogResult};

const PRODUCT_COLUMNS: &str = r#"
    id,
    product_name,
    description,
    price,
    quantity,
    category,
    created_at,
    updated_at
"#;

const SEARCH_FILTER: &str = r#"($1::TEXT IS NULL OR product_name ILIKE $1 ESCAPE '\')"#;

/// PostgreSQL-backed product repository
#[derive(Clone)]
pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ProductRepository for PgCatalogRepository {
    async fn list(&self, query: &ProductQuery) -> CatalogResult<(Vec<Product>, u64)> {
        let pattern = query.search_pattern();

        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM products WHERE {SEARCH_FILTER}"))
                .bind(pattern.as_deref())
                .fetch_one(&self.pool)
                .await?;

        // Column and direction come from closed enums, never from input.
        let column = query.sort_by.column();
        let direction = query.sort_order.as_sql();
        let limit = i64::from(query.limit);
        let offset = i64::try_from(query.offset())
            .map_err(|_| CatalogError::InvalidQuery("page is too large".to_string()))?;

        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE {SEARCH_FILTER}
            ORDER BY {column} {direction}, id {direction}
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(pattern.as_deref())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let products = rows.into_iter().map(ProductRow::into_product).collect();

        Ok((products, u64::try_from(total).unwrap_or_default()))
    }

    async fn find_by_id(&self, id: ProductId) -> CatalogResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ProductRow::into_product))
    }

    async fn create(&self, product: &NewProduct) -> CatalogResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            INSERT INTO products (
                product_name,
                description,
                price,
                quantity,
                category,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(&product.product_name)
        .bind(&product.description)
        .bind(&product.price)
        .bind(&product.quantity)
        .bind(&product.category)
        .bind(product.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_product())
    }

    async fn update(&self, product: &Product) -> CatalogResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE products SET
                product_name = $2,
                description = $3,
                price = $4,
                quantity = $5,
                category = $6,
                updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(product.id.value())
        .bind(&product.product_name)
        .bind(&product.description)
        .bind(&product.price)
        .bind(&product.quantity)
        .bind(&product.category)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::ProductNotFound);
        }

        Ok(())
    }

    async fn delete(&self, id: ProductId) -> CatalogResult<bool> {
        let deleted = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    product_name: String,
    description: String,
    price: String,
    quantity: String,
    category: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProductRow {
    fn into_product(self) -> Product {
        Product {
            id: ProductId::new(self.id),
            product_name: self.product_name,
            description: self.description,
            price: self.price,
            quantity: self.quantity,
            category: self.category,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
