use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{not_found, ProductStore};
use crate::error::AppResult;
use crate::models::{NewProduct, Product, UpdateProduct};

/// Row shape of the `products` table.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    price: f64,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            price: row.price,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn list(&self) -> AppResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, price, description, created_at FROM products",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn get(&self, id: Uuid) -> AppResult<Product> {
        sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, price, description, created_at FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(Product::from)
        .ok_or_else(|| not_found(id))
    }

    async fn insert(&self, product: NewProduct) -> AppResult<Product> {
        let product = product.with_id(Uuid::new_v4());
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            INSERT INTO products (id, name, price, description, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, price, description, created_at
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(product.price)
        .bind(&product.description)
        .bind(product.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update(&self, id: Uuid, changes: UpdateProduct) -> AppResult<Product> {
        // Merged in one statement: fields absent from the patch keep the
        // stored value, even under concurrent updates.
        let (set_description, description) = changes.description_patch();

        sqlx::query_as::<_, ProductRow>(
            r#"
            UPDATE products
            SET name        = COALESCE($1, name),
                price       = COALESCE($2, price),
                description = CASE WHEN $3 THEN $4 ELSE description END
            WHERE id = $5
            RETURNING id, name, price, description, created_at
            "#,
        )
        .bind(changes.name.as_deref())
        .bind(changes.price)
        .bind(set_description)
        .bind(description)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(Product::from)
        .ok_or_else(|| not_found(id))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_maps_field_for_field() {
        let id = Uuid::new_v4();
        let created_at = Utc::now();
        let product = Product::from(ProductRow {
            id,
            name: "Pen".to_string(),
            price: 1.5,
            description: None,
            created_at,
        });
        assert_eq!(product.id, id);
        assert_eq!(product.name, "Pen");
        assert_eq!(product.price, 1.5);
        assert_eq!(product.description, None);
        assert_eq!(product.created_at, created_at);
    }
}
