//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::{
    BlogPostRecord, CategoryRecord, CategoryWithCount, OverallStats, PriceStats, ProductRecord,
    UserRecord,
};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

#[async_trait]
pub trait ProductsRepo: Send + Sync {
    /// Published products, optionally narrowed to one category slug, with
    /// category and owner data eagerly joined.
    async fn list_published(
        &self,
        category_slug: Option<&str>,
    ) -> Result<Vec<ProductRecord>, RepoError>;

    /// Fetch products by id set; missing ids are simply absent from the result.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<ProductRecord>, RepoError>;

    async fn find_published(&self, id: Uuid) -> Result<Option<ProductRecord>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ProductRecord>, RepoError>;

    /// Count/avg/min/max over the published products of one category.
    async fn category_price_stats(&self, category_id: Uuid) -> Result<PriceStats, RepoError>;

    /// Most recently created published products of one category.
    async fn recent_published(
        &self,
        category_id: Uuid,
        limit: u32,
    ) -> Result<Vec<ProductRecord>, RepoError>;

    async fn overall_stats(&self) -> Result<OverallStats, RepoError>;
}

#[derive(Debug, Clone)]
pub struct CreateProductParams {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub category_id: Uuid,
    pub owner_id: Option<Uuid>,
    pub is_published: bool,
}

#[derive(Debug, Clone)]
pub struct UpdateProductParams {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub category_id: Uuid,
}

#[async_trait]
pub trait ProductsWriteRepo: Send + Sync {
    async fn create_product(&self, params: CreateProductParams) -> Result<ProductRecord, RepoError>;

    async fn update_product(&self, params: UpdateProductParams) -> Result<ProductRecord, RepoError>;

    async fn set_published(&self, id: Uuid, is_published: bool)
    -> Result<ProductRecord, RepoError>;

    async fn delete_product(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait CategoriesRepo: Send + Sync {
    /// All categories ordered by name.
    async fn list_ordered(&self) -> Result<Vec<CategoryRecord>, RepoError>;

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<CategoryRecord>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<CategoryRecord>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CategoryRecord>, RepoError>;

    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError>;

    /// Categories ranked by published-product count, descending.
    async fn top_by_published(&self, limit: u32) -> Result<Vec<CategoryWithCount>, RepoError>;

    /// Categories whose slug has not been generated yet.
    async fn list_missing_slugs(&self) -> Result<Vec<CategoryRecord>, RepoError>;
}

#[derive(Debug, Clone)]
pub struct CreateCategoryParams {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdateCategoryParams {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}

#[async_trait]
pub trait CategoriesWriteRepo: Send + Sync {
    async fn create_category(
        &self,
        params: CreateCategoryParams,
    ) -> Result<CategoryRecord, RepoError>;

    async fn update_category(
        &self,
        params: UpdateCategoryParams,
    ) -> Result<CategoryRecord, RepoError>;

    async fn set_slug(&self, id: Uuid, slug: &str) -> Result<CategoryRecord, RepoError>;

    async fn delete_category(&self, id: Uuid) -> Result<(), RepoError>;
}

#[derive(Debug, Clone)]
pub struct CreateBlogPostParams {
    pub title: String,
    pub body: String,
    pub is_published: bool,
}

#[derive(Debug, Clone)]
pub struct UpdateBlogPostParams {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub is_published: bool,
}

#[async_trait]
pub trait BlogRepo: Send + Sync {
    async fn list_published(&self) -> Result<Vec<BlogPostRecord>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BlogPostRecord>, RepoError>;

    /// Bump the view counter; unknown ids are a no-op.
    async fn increment_views(&self, id: Uuid) -> Result<(), RepoError>;

    async fn create_post(&self, params: CreateBlogPostParams) -> Result<BlogPostRecord, RepoError>;

    async fn update_post(&self, params: UpdateBlogPostParams) -> Result<BlogPostRecord, RepoError>;

    async fn delete_post(&self, id: Uuid) -> Result<(), RepoError>;
}

#[derive(Debug, Clone)]
pub struct CreateUserParams {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdateProfileParams {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub country: Option<String>,
}

#[async_trait]
pub trait UsersRepo: Send + Sync {
    async fn create_user(&self, params: CreateUserParams) -> Result<UserRecord, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, RepoError>;

    async fn update_profile(&self, params: UpdateProfileParams) -> Result<UserRecord, RepoError>;
}
