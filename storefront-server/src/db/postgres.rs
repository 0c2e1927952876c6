//! PostgreSQL catalog store
//!
//! Tables: `categories`, `products`, `product_categories` (see `migrations/`).
//! Category rows map straight onto [`Category`]; product rows are read with
//! their assignments aggregated into `category_ids`.

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::catalog::Resource;
use shared::models::{Category, Product, ProductStatus};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::{CatalogStore, StoreError, StoreResult};

const PRODUCT_SELECT: &str = r#"
    SELECT p.id, p.name, p.slug, p.description, p.price, p.compare_at_price,
           p.images, p.tags, p.inventory, p.seo_title, p.seo_description,
           p.status, p.is_featured, p.created_at, p.updated_at,
           COALESCE(
               array_agg(pc.category_id ORDER BY pc.category_id)
                   FILTER (WHERE pc.category_id IS NOT NULL),
               '{}'
           ) AS category_ids
    FROM products p
    LEFT JOIN product_categories pc ON pc.product_id = p.id
"#;

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    slug: String,
    description: String,
    price: Decimal,
    compare_at_price: Option<Decimal>,
    images: Vec<String>,
    tags: Vec<String>,
    inventory: i32,
    seo_title: String,
    seo_description: String,
    status: String,
    is_featured: bool,
    created_at: i64,
    updated_at: i64,
    category_ids: Vec<i64>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            slug: row.slug,
            description: row.description,
            price: row.price,
            compare_at_price: row.compare_at_price,
            images: row.images,
            category_ids: row.category_ids,
            tags: row.tags,
            inventory: row.inventory,
            seo_title: row.seo_title,
            seo_description: row.seo_description,
            status: ProductStatus::parse_lossy(&row.status),
            is_featured: row.is_featured,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const PRODUCT_FK: &str = "product_categories_product_fk";
const CATEGORY_FK: &str = "product_categories_category_fk";

/// Name the side of an assignment whose row is gone
fn assignment_fk_error(constraint: Option<&str>, product_id: i64, category_id: i64) -> StoreError {
    match constraint {
        Some(PRODUCT_FK) => StoreError::product_not_found(product_id),
        Some(CATEGORY_FK) => StoreError::category_not_found(category_id),
        other => StoreError::Database(format!(
            "assignment {product_id}/{category_id} violates foreign key {}",
            other.unwrap_or("(unnamed)")
        )),
    }
}

/// Map a unique-constraint violation to `Duplicate`, anything else to `Database`
fn write_error(err: sqlx::Error, resource: Resource, key: &str) -> StoreError {
    let unique = err
        .as_database_error()
        .is_some_and(|e| e.is_unique_violation());
    if unique {
        StoreError::Duplicate {
            resource,
            key: key.to_string(),
        }
    } else {
        err.into()
    }
}

/// Catalog store backed by PostgreSQL
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and run the embedded migrations
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(std::time::Duration::from_secs(5))
            .idle_timeout(std::time::Duration::from_secs(600))
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn replace_assignments(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        product: &Product,
    ) -> StoreResult<()> {
        sqlx::query("DELETE FROM product_categories WHERE product_id = $1")
            .bind(product.id)
            .execute(&mut **tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO product_categories (product_id, category_id)
            SELECT $1, UNNEST($2::BIGINT[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(product.id)
        .bind(&product.category_ids)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, Category>(
            "SELECT id, name, slug, parent_id, image, description, created_at, updated_at \
             FROM categories ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_category(&self, id: i64) -> StoreResult<Option<Category>> {
        let row = sqlx::query_as::<_, Category>(
            "SELECT id, name, slug, parent_id, image, description, created_at, updated_at \
             FROM categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_category_by_slug(&self, slug: &str) -> StoreResult<Option<Category>> {
        let row = sqlx::query_as::<_, Category>(
            "SELECT id, name, slug, parent_id, image, description, created_at, updated_at \
             FROM categories WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert_category(&self, category: &Category) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO categories (id, name, slug, parent_id, image, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(&category.slug)
        .bind(category.parent_id)
        .bind(&category.image)
        .bind(&category.description)
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, Resource::Category, &category.slug))?;
        Ok(())
    }

    async fn update_category(&self, category: &Category) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE categories
            SET name = $2, slug = $3, parent_id = $4, image = $5, description = $6, updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(&category.slug)
        .bind(category.parent_id)
        .bind(&category.image)
        .bind(&category.description)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, Resource::Category, &category.slug))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::category_not_found(category.id));
        }
        Ok(())
    }

    async fn delete_category(&self, id: i64) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE categories SET parent_id = NULL WHERE parent_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        // product_categories rows go with the category (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "{PRODUCT_SELECT} GROUP BY p.id ORDER BY p.id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn find_product(&self, id: i64) -> StoreResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "{PRODUCT_SELECT} WHERE p.id = $1 GROUP BY p.id"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Product::from))
    }

    async fn find_product_by_slug(&self, slug: &str) -> StoreResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "{PRODUCT_SELECT} WHERE p.slug = $1 GROUP BY p.id"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Product::from))
    }

    async fn insert_product(&self, product: &Product) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, slug, description, price, compare_at_price, images, tags,
                inventory, seo_title, seo_description, status, is_featured,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.slug)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.compare_at_price)
        .bind(&product.images)
        .bind(&product.tags)
        .bind(product.inventory)
        .bind(&product.seo_title)
        .bind(&product.seo_description)
        .bind(product.status.as_str())
        .bind(product.is_featured)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| write_error(e, Resource::Product, &product.slug))?;

        Self::replace_assignments(&mut tx, product).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn update_product(&self, product: &Product) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = $2, slug = $3, description = $4, price = $5, compare_at_price = $6,
                images = $7, tags = $8, inventory = $9, seo_title = $10,
                seo_description = $11, status = $12, is_featured = $13, updated_at = $14
            WHERE id = $1
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.slug)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.compare_at_price)
        .bind(&product.images)
        .bind(&product.tags)
        .bind(product.inventory)
        .bind(&product.seo_title)
        .bind(&product.seo_description)
        .bind(product.status.as_str())
        .bind(product.is_featured)
        .bind(product.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| write_error(e, Resource::Product, &product.slug))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::product_not_found(product.id));
        }

        Self::replace_assignments(&mut tx, product).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn delete_product(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn add_product_category(&self, product_id: i64, category_id: i64) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO product_categories (product_id, category_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(product_id)
        .bind(category_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let missing = e
                .as_database_error()
                .filter(|d| d.is_foreign_key_violation())
                .map(|d| assignment_fk_error(d.constraint(), product_id, category_id));
            missing.unwrap_or_else(|| e.into())
        })?;
        Ok(result.rows_affected() > 0)
    }

    async fn remove_product_category(
        &self,
        product_id: i64,
        category_id: i64,
    ) -> StoreResult<bool> {
        let result = sqlx::query(
            "DELETE FROM product_categories WHERE product_id = $1 AND category_id = $2",
        )
        .bind(product_id)
        .bind(category_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn category_product_counts(&self) -> StoreResult<HashMap<i64, u64>> {
        let rows: Vec<(i64, i64)> = sqlx::query_as(
            "SELECT category_id, COUNT(*) FROM product_categories GROUP BY category_id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(category_id, count)| (category_id, count.max(0) as u64))
            .collect())
    }
}
