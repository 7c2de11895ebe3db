//! Domain Entities

use chrono::{DateTime, Utc};
use kernel::id::ProductId;

use crate::error::{CatalogError, CatalogResult};

/// Persisted product. Price and quantity are free-form text as entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub product_name: String,
    pub description: String,
    pub price: String,
    pub quantity: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Product not yet persisted (no id)
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub product_name: String,
    pub description: String,
    pub price: String,
    pub quantity: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

impl NewProduct {
    /// Every field is required and must not be blank.
    pub fn new(
        product_name: String,
        description: String,
        price: String,
        quantity: String,
        category: String,
    ) -> CatalogResult<Self> {
        Ok(Self {
            product_name: required("product_name", product_name)?,
            description: required("description", description)?,
            price: required("price", price)?,
            quantity: required("quantity", quantity)?,
            category: required("category", category)?,
            created_at: Utc::now(),
        })
    }

    /// Attach the id assigned by storage.
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            product_name: self.product_name,
            description: self.description,
            price: self.price,
            quantity: self.quantity,
            category: self.category,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

/// Partial update. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub product_name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub quantity: Option<String>,
    pub category: Option<String>,
}

impl Product {
    /// Apply changes. Provided values obey the same rules as on create.
    pub fn apply(&mut self, changes: ProductChanges) -> CatalogResult<()> {
        let ProductChanges {
            product_name,
            description,
            price,
            quantity,
            category,
        } = changes;

        let product_name = product_name.map(|v| required("product_name", v)).transpose()?;
        let description = description.map(|v| required("description", v)).transpose()?;
        let price = price.map(|v| required("price", v)).transpose()?;
        let quantity = quantity.map(|v| required("quantity", v)).transpose()?;
        let category = category.map(|v| required("category", v)).transpose()?;

        if let Some(v) = product_name {
            self.product_name = v;
        }
        if let Some(v) = description {
            self.description = v;
        }
        if let Some(v) = price {
            self.price = v;
        }
        if let Some(v) = quantity {
            self.quantity = v;
        }
        if let Some(v) = category {
            self.category = v;
        }
        self.updated_at = Utc::now();

        Ok(())
    }
}

fn required(field: &str, value: String) -> CatalogResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::Validation(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}
