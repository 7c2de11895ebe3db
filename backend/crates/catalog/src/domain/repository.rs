//! Repository Traits

use kernel::id::ProductId;

use crate::domain::entities::{NewProduct, Product};
use crate::domain::value_objects::ProductQuery;
use crate::error::CatalogResult;

/// Product repository trait
#[trait_variant::make(ProductRepository: Send)]
pub trait LocalProductRepository {
    /// One page of matching products plus the total match count.
    async fn list(&self, query: &ProductQuery) -> CatalogResult<(Vec<Product>, u64)>;

    async fn find_by_id(&self, id: ProductId) -> CatalogResult<Option<Product>>;

    /// Insert a product; storage assigns the id.
    async fn create(&self, product: &NewProduct) -> CatalogResult<Product>;

    async fn update(&self, product: &Product) -> CatalogResult<()>;

    /// Returns false when nothing was deleted.
    async fn delete(&self, id: ProductId) -> CatalogResult<bool>;
}
