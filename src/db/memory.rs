use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{not_found, ProductStore};
use crate::error::AppResult;
use crate::models::{NewProduct, Product, UpdateProduct};

/// Insertion-ordered store used by the router tests.
#[derive(Debug, Default)]
pub struct MemoryProductStore {
    products: RwLock<IndexMap<Uuid, Product>>,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn list(&self) -> AppResult<Vec<Product>> {
        Ok(self.products.read().await.values().cloned().collect())
    }

    async fn get(&self, id: Uuid) -> AppResult<Product> {
        self.products
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    async fn insert(&self, product: NewProduct) -> AppResult<Product> {
        let product = product.with_id(Uuid::new_v4());
        self.products.write().await.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update(&self, id: Uuid, changes: UpdateProduct) -> AppResult<Product> {
        let mut products = self.products.write().await;
        let product = products.get_mut(&id).ok_or_else(|| not_found(id))?;
        changes.apply_to(product);
        Ok(product.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        // shift_remove keeps the remaining entries in insertion order
        self.products
            .write()
            .await
            .shift_remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use chrono::Utc;

    fn new_product(name: &str) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            price: 1.0,
            description: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn list_preserves_insertion_order_after_delete() {
        let store = MemoryProductStore::new();
        let a = store.insert(new_product("A")).await.unwrap();
        let b = store.insert(new_product("B")).await.unwrap();
        let c = store.insert(new_product("C")).await.unwrap();
        store.delete(b.id).await.unwrap();

        let ids: Vec<Uuid> = store.list().await.unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![a.id, c.id]);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found_everywhere() {
        let store = MemoryProductStore::new();
        let id = Uuid::new_v4();
        assert!(matches!(store.get(id).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            store.update(id, UpdateProduct::default()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(store.delete(id).await, Err(AppError::NotFound(_))));
    }
}
