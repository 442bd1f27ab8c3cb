use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Core product entity as exposed over HTTP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A validated product that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NewProduct {
    pub fn with_id(self, id: Uuid) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
            description: self.description,
            created_at: self.created_at,
        }
    }
}

fn check_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("name must not be empty".to_string()));
    }
    Ok(())
}

fn check_price(price: f64) -> AppResult<()> {
    if !price.is_finite() {
        return Err(AppError::Validation("price must be a finite number".to_string()));
    }
    Ok(())
}

// ── Request payloads ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
    /// Optional override for the creation timestamp (defaults to now)
    pub created_at: Option<DateTime<Utc>>,
}

impl CreateProduct {
    pub fn validate(&self) -> AppResult<()> {
        check_name(&self.name)?;
        check_price(self.price)
    }

    pub fn into_new_product(self, now: DateTime<Utc>) -> AppResult<NewProduct> {
        self.validate()?;
        let created_at = match self.created_at {
            Some(created_at) if created_at > now => {
                return Err(AppError::Validation(
                    "createdAt must not be in the future".to_string(),
                ))
            }
            Some(created_at) => created_at,
            None => now,
        };
        Ok(NewProduct {
            name: self.name,
            price: self.price,
            description: self.description,
            created_at,
        })
    }
}

/// Partial update. `id` and `createdAt` are not part of the payload and are
/// silently dropped if a client sends them.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub price: Option<f64>,
    /// `None`: leave as is. `Some(None)`: clear. `Some(Some(_))`: replace.
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl UpdateProduct {
    pub fn validate(&self) -> AppResult<()> {
        if let Some(name) = &self.name {
            check_name(name)?;
        }
        if let Some(price) = self.price {
            check_price(price)?;
        }
        Ok(())
    }

    /// Whether the description is being set, and the value to set it to.
    pub fn description_patch(&self) -> (bool, Option<&str>) {
        match &self.description {
            Some(description) => (true, description.as_deref()),
            None => (false, None),
        }
    }

    #[cfg(test)]
    pub fn apply_to(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
    }
}
