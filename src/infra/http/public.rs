//! Read-only public surface: catalog listings, detail pages, stats, blog.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::Response,
    routing::get,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::application::error::AppError;
use crate::domain::entities::{
    BlogPostRecord, CatalogStats, CategoryInfo, CategoryRecord, ProductRecord,
};

use super::{AppState, db_health_response};

pub fn build_public_router() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/{id}", get(product_detail))
        .route("/categories", get(list_categories))
        .route("/categories/{slug}", get(category_detail))
        .route("/stats", get(catalog_stats))
        .route("/blog", get(list_posts))
        .route("/blog/{id}", get(post_detail))
        .route("/_health/db", get(db_health))
}

#[derive(Debug, Deserialize)]
struct ProductsQuery {
    category: Option<String>,
}

async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> Result<Json<Vec<ProductRecord>>, AppError> {
    let products = state.catalog.products(query.category.as_deref()).await?;
    Ok(Json(products))
}

async fn product_detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductRecord>, AppError> {
    let product = state.catalog.product_info(id).await?;
    product.map(Json).ok_or(AppError::NotFound)
}

async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryRecord>>, AppError> {
    let categories = state.catalog.categories().await?;
    Ok(Json(categories))
}

async fn category_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<CategoryInfo>, AppError> {
    let info = state.catalog.category_info(&slug).await?;
    info.map(Json).ok_or(AppError::NotFound)
}

async fn catalog_stats(State(state): State<AppState>) -> Result<Json<CatalogStats>, AppError> {
    let stats = state.catalog.stats().await?;
    Ok(Json(stats))
}

async fn list_posts(
    State(state): State<AppState>,
) -> Result<Json<Vec<BlogPostRecord>>, AppError> {
    let posts = state.blog.published_posts().await?;
    Ok(Json(posts))
}

async fn post_detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BlogPostRecord>, AppError> {
    let post = state.blog.read_post(id).await?;
    post.map(Json).ok_or(AppError::NotFound)
}

async fn db_health(State(state): State<AppState>) -> Response {
    db_health_response(state.db.health_check().await)
}
