//! Admin surface: catalog and blog mutations, account registration,
//! cache maintenance.
//!
//! Authentication sits in front of this router at the deployment layer.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::application::accounts::{ProfileEdit, Registration};
use crate::application::blog::BlogPostInput;
use crate::application::catalog::{CategoryInput, NewProduct, ProductEdit};
use crate::application::error::AppError;
use crate::domain::entities::{BlogPostRecord, CategoryRecord, ProductRecord, UserRecord};

use super::AppState;

pub fn build_admin_router() -> Router<AppState> {
    Router::new()
        .route("/products", post(create_product))
        .route("/products/{id}", put(update_product).delete(delete_product))
        .route("/products/{id}/publish", post(set_product_published))
        .route("/categories", post(create_category))
        .route(
            "/categories/{id}",
            put(update_category).delete(delete_category),
        )
        .route("/categories/generate-slugs", post(generate_slugs))
        .route("/blog", post(create_post))
        .route("/blog/{id}", put(update_post).delete(delete_post))
        .route("/users", post(register_user))
        .route("/users/{id}", get(user_profile).put(update_user_profile))
        .route("/cache", delete(clear_cache))
}

#[derive(Debug, Deserialize)]
struct ProductBody {
    name: String,
    description: Option<String>,
    price_cents: i64,
    category_id: Uuid,
    owner_id: Option<Uuid>,
    #[serde(default)]
    is_published: bool,
}

#[derive(Debug, Deserialize)]
struct PublishBody {
    is_published: bool,
}

#[derive(Debug, Deserialize)]
struct CategoryBody {
    name: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BlogPostBody {
    title: String,
    body: String,
    #[serde(default)]
    is_published: bool,
}

#[derive(Debug, Deserialize)]
struct RegistrationBody {
    email: String,
    password: String,
    first_name: String,
    last_name: String,
    phone: Option<String>,
    country: Option<String>,
}

async fn create_product(
    State(state): State<AppState>,
    Json(body): Json<ProductBody>,
) -> Result<(StatusCode, Json<ProductRecord>), AppError> {
    let product = state
        .catalog
        .create_product(NewProduct {
            name: body.name,
            description: body.description,
            price_cents: body.price_cents,
            category_id: body.category_id,
            owner_id: body.owner_id,
            is_published: body.is_published,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ProductBody>,
) -> Result<Json<ProductRecord>, AppError> {
    let product = state
        .catalog
        .update_product(
            id,
            ProductEdit {
                name: body.name,
                description: body.description,
                price_cents: body.price_cents,
                category_id: body.category_id,
            },
        )
        .await?;
    Ok(Json(product))
}

async fn set_product_published(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<PublishBody>,
) -> Result<Json<ProductRecord>, AppError> {
    let product = state
        .catalog
        .set_product_published(id, body.is_published)
        .await?;
    Ok(Json(product))
}

async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.catalog.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_category(
    State(state): State<AppState>,
    Json(body): Json<CategoryBody>,
) -> Result<(StatusCode, Json<CategoryRecord>), AppError> {
    let category = state
        .catalog
        .create_category(CategoryInput {
            name: body.name,
            description: body.description,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(category)))
}

async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<CategoryBody>,
) -> Result<Json<CategoryRecord>, AppError> {
    let category = state
        .catalog
        .update_category(
            id,
            CategoryInput {
                name: body.name,
                description: body.description,
            },
        )
        .await?;
    Ok(Json(category))
}

async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.catalog.delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn generate_slugs(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let updated = state.catalog.generate_missing_slugs().await?;
    Ok(Json(serde_json::json!({ "updated": updated })))
}

async fn create_post(
    State(state): State<AppState>,
    Json(body): Json<BlogPostBody>,
) -> Result<(StatusCode, Json<BlogPostRecord>), AppError> {
    let post = state
        .blog
        .create_post(BlogPostInput {
            title: body.title,
            body: body.body,
            is_published: body.is_published,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(post)))
}

async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<BlogPostBody>,
) -> Result<Json<BlogPostRecord>, AppError> {
    let post = state
        .blog
        .update_post(
            id,
            BlogPostInput {
                title: body.title,
                body: body.body,
                is_published: body.is_published,
            },
        )
        .await?;
    Ok(Json(post))
}

async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.blog.delete_post(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn register_user(
    State(state): State<AppState>,
    Json(body): Json<RegistrationBody>,
) -> Result<(StatusCode, Json<UserRecord>), AppError> {
    let user = state
        .accounts
        .register(Registration {
            email: body.email,
            password: body.password,
            first_name: body.first_name,
            last_name: body.last_name,
            phone: body.phone,
            country: body.country,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[derive(Debug, Deserialize)]
struct ProfileBody {
    first_name: String,
    last_name: String,
    phone: Option<String>,
    country: Option<String>,
}

async fn user_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserRecord>, AppError> {
    let user = state.accounts.profile(id).await?;
    user.map(Json).ok_or(AppError::NotFound)
}

async fn update_user_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ProfileBody>,
) -> Result<Json<UserRecord>, AppError> {
    let user = state
        .accounts
        .update_profile(
            id,
            ProfileEdit {
                first_name: body.first_name,
                last_name: body.last_name,
                phone: body.phone,
                country: body.country,
            },
        )
        .await?;
    Ok(Json(user))
}

async fn clear_cache(State(state): State<AppState>) -> StatusCode {
    state.catalog.clear_cache().await;
    StatusCode::NO_CONTENT
}
