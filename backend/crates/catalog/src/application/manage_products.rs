//! Manage Products Use Case
//!
//! Listing with search, sorting and pagination, plus create, update and
//! delete.

use std::sync::Arc;

use kernel::id::ProductId;
use kernel::page::Page;

use crate::domain::entities::{NewProduct, Product, ProductChanges};
use crate::domain::repository::ProductRepository;
use crate::domain::value_objects::ProductQuery;
use crate::error::{CatalogError, CatalogResult};

/// Create product input
pub struct CreateProductInput {
    pub product_name: String,
    pub description: String,
    pub price: String,
    pub quantity: String,
    pub category: String,
}

pub struct ManageProductsUseCase<R>
where
    R: ProductRepository,
{
    repo: Arc<R>,
}

impl<R> ManageProductsUseCase<R>
where
    R: ProductRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, query: &ProductQuery) -> CatalogResult<Page<Product>> {
        let (products, total) = self.repo.list(query).await?;
        Ok(Page::new(products, total, query.page, query.limit))
    }

    pub async fn create(&self, input: CreateProductInput) -> CatalogResult<Product> {
        let product = NewProduct::new(
            input.product_name,
            input.description,
            input.price,
            input.quantity,
            input.category,
        )?;

        let created = self.repo.create(&product).await?;

        tracing::info!(product_id = %created.id, "Product created");

        Ok(created)
    }

    pub async fn update(&self, id: ProductId, changes: ProductChanges) -> CatalogResult<Product> {
        let mut product = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::ProductNotFound)?;

        product.apply(changes)?;
        self.repo.update(&product).await?;

        tracing::info!(product_id = %id, "Product updated");

        Ok(product)
    }

    pub async fn delete(&self, id: ProductId) -> CatalogResult<()> {
        if !self.repo.delete(id).await? {
            return Err(CatalogError::ProductNotFound);
        }

        tracing::info!(product_id = %id, "Product deleted");

        Ok(())
    }
}
