use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{NewProduct, Product, UpdateProduct};

#[cfg(test)]
pub mod memory;
pub mod postgres;

#[cfg(test)]
pub use memory::MemoryProductStore;
pub use postgres::PgProductStore;

/// Storage client shared by every request handler.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All products, unfiltered, in whatever order the backend returns them.
    async fn list(&self) -> AppResult<Vec<Product>>;

    async fn get(&self, id: Uuid) -> AppResult<Product>;

    /// Persists `product` under a freshly assigned id.
    async fn insert(&self, product: NewProduct) -> AppResult<Product>;

    async fn update(&self, id: Uuid, changes: UpdateProduct) -> AppResult<Product>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub(crate) fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Product {} not found", id))
}
