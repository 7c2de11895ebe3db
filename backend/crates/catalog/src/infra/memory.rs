//! In-Memory Repository
//!
//! Process-local storage with the same filter, ordering and paging rules
//! as the SQL implementation.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use kernel::id::ProductId;
use tokio::sync::RwLock;

use crate::domain::entities::{NewProduct, Product};
use crate::domain::repository::ProductRepository;
use crate::domain::value_objects::{ProductQuery, SortField, SortOrder};
use crate::error::{CatalogError, CatalogResult};

#[derive(Default)]
struct State {
    next_id: i64,
    products: BTreeMap<ProductId, Product>,
}

#[derive(Default)]
pub struct InMemoryCatalogRepository {
    state: RwLock<State>,
}

impl InMemoryCatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn compare(a: &Product, b: &Product, field: SortField) -> Ordering {
    match field {
        SortField::ProductName => a.product_name.cmp(&b.product_name),
        SortField::Category => a.category.cmp(&b.category),
        SortField::Price => a.price.cmp(&b.price),
        SortField::Quantity => a.quantity.cmp(&b.quantity),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
    .then(a.id.cmp(&b.id))
}

impl ProductRepository for InMemoryCatalogRepository {
    async fn list(&self, query: &ProductQuery) -> CatalogResult<(Vec<Product>, u64)> {
        let state = self.state.read().await;

        let mut matching: Vec<&Product> = state
            .products
            .values()
            .filter(|p| query.matches_name(&p.product_name))
            .collect();

        matching.sort_by(|a, b| {
            let ordering = compare(a, b, query.sort_by);
            match query.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let total = matching.len() as u64;
        let offset = usize::try_from(query.offset()).unwrap_or(usize::MAX);
        let page = matching
            .into_iter()
            .skip(offset)
            .take(query.limit as usize)
            .cloned()
            .collect();

        Ok((page, total))
    }

    async fn find_by_id(&self, id: ProductId) -> CatalogResult<Option<Product>> {
        Ok(self.state.read().await.products.get(&id).cloned())
    }

    async fn create(&self, product: &NewProduct) -> CatalogResult<Product> {
        let mut state = self.state.write().await;
        state.next_id += 1;
        let created = product.clone().into_product(ProductId::new(state.next_id));
        state.products.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, product: &Product) -> CatalogResult<()> {
        let mut state = self.state.write().await;
        match state.products.get_mut(&product.id) {
            Some(stored) => {
                *stored = product.clone();
                Ok(())
            }
            None => Err(CatalogError::ProductNotFound),
        }
    }

    async fn delete(&self, id: ProductId) -> CatalogResult<bool> {
        Ok(self.state.write().await.products.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seed(repo: &InMemoryCatalogRepository, name: &str, price: &str) -> Product {
        let product = NewProduct::new(
            name.to_string(),
            "desc".to_string(),
            price.to_string(),
            "1".to_string(),
            "General".to_string(),
        )
        .unwrap();
        repo.create(&product).await.unwrap()
    }

    fn query(search: Option<&str>, sort_by: &str, order: &str, page: i64, limit: i64) -> ProductQuery {
        ProductQuery::new(
            search.map(str::to_string),
            Some(sort_by),
            Some(order),
            Some(page),
            Some(limit),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_filter_sort_and_page() {
        let repo = InMemoryCatalogRepository::new();
        seed(&repo, "Phone Case", "3").await;
        seed(&repo, "Laptop", "9").await;
        seed(&repo, "Smartphone", "7").await;
        seed(&repo, "Headphones", "5").await;

        let (page, total) = repo
            .list(&query(Some("phone"), "price", "ASC", 1, 2))
            .await
            .unwrap();
        assert_eq!(total, 3);
        let names: Vec<_> = page.iter().map(|p| p.product_name.as_str()).collect();
        assert_eq!(names, vec!["Phone Case", "Headphones"]);

        let (page, _) = repo
            .list(&query(Some("phone"), "price", "ASC", 2, 2))
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].product_name, "Smartphone");
    }

    #[tokio::test]
    async fn test_default_order_is_newest_first() {
        let repo = InMemoryCatalogRepository::new();
        let first = seed(&repo, "A", "1").await;
        let second = seed(&repo, "B", "1").await;

        let (page, _) = repo.list(&ProductQuery::default()).await.unwrap();
        let ids: Vec<_> = page.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_page_past_the_end_is_empty() {
        let repo = InMemoryCatalogRepository::new();
        seed(&repo, "A", "1").await;

        let (page, total) = repo.list(&query(None, "createdAt", "DESC", 5, 10)).await.unwrap();
        assert!(page.is_empty());
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn test_update_missing_product() {
        let repo = InMemoryCatalogRepository::new();
        let mut product = seed(&repo, "A", "1").await;
        repo.delete(product.id).await.unwrap();

        product.price = "2".to_string();
        assert!(matches!(
            repo.update(&product).await,
            Err(CatalogError::ProductNotFound)
        ));
    }
}
