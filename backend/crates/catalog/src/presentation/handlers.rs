//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use kernel::id::ProductId;
use kernel::page::Page;
use std::sync::Arc;

use crate::application::{CreateProductInput, ManageProductsUseCase};
use crate::domain::repository::ProductRepository;
use crate::domain::value_objects::ProductQuery;
use crate::error::CatalogResult;
use crate::presentation::dto::{
    CreateProductRequest, MessageResponse, ProductListQuery, ProductResponse,
    UpdateProductRequest,
};

/// Shared state for catalog handlers
pub struct CatalogAppState<R>
where
    R: ProductRepository + Send + Sync + 'static,
{
    pub repo: Arc<R>,
}

impl<R> CatalogAppState<R>
where
    R: ProductRepository + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    fn use_case(&self) -> ManageProductsUseCase<R> {
        ManageProductsUseCase::new(self.repo.clone())
    }
}

impl<R> Clone for CatalogAppState<R>
where
    R: ProductRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
        }
    }
}

/// GET /product
pub async fn list_products<R>(
    State(state): State<CatalogAppState<R>>,
    Query(params): Query<ProductListQuery>,
) -> CatalogResult<Json<Page<ProductResponse>>>
where
    R: ProductRepository + Send + Sync + 'static,
{
    let query = ProductQuery::new(
        params.search,
        params.sort_by.as_deref(),
        params.sort_order.as_deref(),
        params.page,
        params.limit,
    )?;

    let page = state.use_case().list(&query).await?;

    Ok(Json(page.map(ProductResponse::from)))
}

/// POST /product
pub async fn create_product<R>(
    State(state): State<CatalogAppState<R>>,
    Json(req): Json<CreateProductRequest>,
) -> CatalogResult<Json<ProductResponse>>
where
    R: ProductRepository + Send + Sync + 'static,
{
    let product = state
        .use_case()
        .create(CreateProductInput {
            product_name: req.product_name,
            description: req.description,
            price: req.price,
            quantity: req.quantity,
            category: req.category,
        })
        .await?;

    Ok(Json(product.into()))
}

/// PUT /product/{id}
pub async fn update_product<R>(
    State(state): State<CatalogAppState<R>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateProductRequest>,
) -> CatalogResult<Json<MessageResponse>>
where
    R: ProductRepository + Send + Sync + 'static,
{
    state.use_case().update(ProductId::new(id), req.into()).await?;

    Ok(Json(MessageResponse {
        message: "Product updated successfully",
    }))
}

/// DELETE /product/{id}
pub async fn delete_product<R>(
    State(state): State<CatalogAppState<R>>,
    Path(id): Path<i64>,
) -> CatalogResult<Json<MessageResponse>>
where
    R: ProductRepository + Send + Sync + 'static,
{
    state.use_case().delete(ProductId::new(id)).await?;

    Ok(Json(MessageResponse {
        message: "Product deleted successfully",
    }))
}
