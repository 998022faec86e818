//! Catalog service: validated writes with cache invalidation, cached reads.
//!
//! Every mutation ends with the matching `invalidate_*` call on the cache
//! manager. That pairing is the whole consistency story; the cache cannot
//! enforce it on its own.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::application::error::AppError;
use crate::application::repos::{
    CategoriesRepo, CategoriesWriteRepo, CreateCategoryParams, CreateProductParams, ProductsRepo,
    ProductsWriteRepo, UpdateCategoryParams, UpdateProductParams,
};
use crate::cache::CatalogCache;
use crate::domain::entities::{
    CatalogStats, CategoryInfo, CategoryRecord, ProductRecord,
};
use crate::domain::slug::{SlugAsyncError, generate_unique_slug_async};
use crate::domain::validation::{
    validate_price_cents, validate_product_description, validate_product_name,
};

/// Fields accepted when creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub category_id: Uuid,
    pub owner_id: Option<Uuid>,
    pub is_published: bool,
}

/// Fields accepted when editing a product.
#[derive(Debug, Clone)]
pub struct ProductEdit {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub category_id: Uuid,
}

/// Fields accepted when creating or editing a category.
#[derive(Debug, Clone)]
pub struct CategoryInput {
    pub name: String,
    pub description: Option<String>,
}

pub struct CatalogService {
    cache: Arc<CatalogCache>,
    products: Arc<dyn ProductsRepo>,
    products_write: Arc<dyn ProductsWriteRepo>,
    categories: Arc<dyn CategoriesRepo>,
    categories_write: Arc<dyn CategoriesWriteRepo>,
}

impl CatalogService {
    pub fn new(
        cache: Arc<CatalogCache>,
        products: Arc<dyn ProductsRepo>,
        products_write: Arc<dyn ProductsWriteRepo>,
        categories: Arc<dyn CategoriesRepo>,
        categories_write: Arc<dyn CategoriesWriteRepo>,
    ) -> Self {
        Self {
            cache,
            products,
            products_write,
            categories,
            categories_write,
        }
    }

    // ------------------------------------------------------------------
    // Cached reads
    // ------------------------------------------------------------------

    pub async fn products(
        &self,
        category_slug: Option<&str>,
    ) -> Result<Vec<ProductRecord>, AppError> {
        Ok(self.cache.get_products(category_slug).await?)
    }

    pub async fn categories(&self) -> Result<Vec<CategoryRecord>, AppError> {
        Ok(self.cache.get_categories().await?)
    }

    pub async fn category_info(&self, slug: &str) -> Result<Option<CategoryInfo>, AppError> {
        Ok(self.cache.get_category_info(slug).await?)
    }

    pub async fn product_info(&self, id: Uuid) -> Result<Option<ProductRecord>, AppError> {
        Ok(self.cache.get_product_info(id).await?)
    }

    pub async fn stats(&self) -> Result<CatalogStats, AppError> {
        Ok(self.cache.get_stats().await?)
    }

    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }

    // ------------------------------------------------------------------
    // Product writes
    // ------------------------------------------------------------------

    pub async fn create_product(&self, input: NewProduct) -> Result<ProductRecord, AppError> {
        validate_product(&input.name, input.description.as_deref(), input.price_cents)?;

        if self.categories.find_by_id(input.category_id).await?.is_none() {
            return Err(AppError::validation("unknown category"));
        }

        let product = self
            .products_write
            .create_product(CreateProductParams {
                name: input.name,
                description: input.description,
                price_cents: input.price_cents,
                category_id: input.category_id,
                owner_id: input.owner_id,
                is_published: input.is_published,
            })
            .await?;

        info!(target: "vetrina::catalog", product = %product.id, "product created");
        self.cache.invalidate_product(Some(product.id)).await;
        Ok(product)
    }

    pub async fn update_product(
        &self,
        id: Uuid,
        edit: ProductEdit,
    ) -> Result<ProductRecord, AppError> {
        validate_product(&edit.name, edit.description.as_deref(), edit.price_cents)?;

        let product = self
            .products_write
            .update_product(UpdateProductParams {
                id,
                name: edit.name,
                description: edit.description,
                price_cents: edit.price_cents,
                category_id: edit.category_id,
            })
            .await?;

        self.cache.invalidate_product(Some(id)).await;
        Ok(product)
    }

    pub async fn set_product_published(
        &self,
        id: Uuid,
        is_published: bool,
    ) -> Result<ProductRecord, AppError> {
        let product = self.products_write.set_published(id, is_published).await?;
        self.cache.invalidate_product(Some(id)).await;
        Ok(product)
    }

    pub async fn delete_product(&self, id: Uuid) -> Result<(), AppError> {
        self.products_write.delete_product(id).await?;
        self.cache.invalidate_product(Some(id)).await;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Category writes
    // ------------------------------------------------------------------

    pub async fn create_category(&self, input: CategoryInput) -> Result<CategoryRecord, AppError> {
        let slug = self.unique_slug(&input.name, None).await?;

        let category = self
            .categories_write
            .create_category(CreateCategoryParams {
                name: input.name,
                slug,
                description: input.description,
            })
            .await?;

        info!(target: "vetrina::catalog", category = %category.slug, "category created");
        self.cache.invalidate_category(None).await;
        Ok(category)
    }

    /// Update a category; a name change regenerates the slug.
    pub async fn update_category(
        &self,
        id: Uuid,
        input: CategoryInput,
    ) -> Result<CategoryRecord, AppError> {
        let Some(existing) = self.categories.find_by_id(id).await? else {
            return Err(AppError::NotFound);
        };

        let slug = if existing.name == input.name {
            existing.slug.clone()
        } else {
            self.unique_slug(&input.name, Some(&existing.slug)).await?
        };

        let category = self
            .categories_write
            .update_category(UpdateCategoryParams {
                id,
                name: input.name,
                slug,
                description: input.description,
            })
            .await?;

        self.cache.invalidate_category(Some(&existing.slug)).await;
        if category.slug != existing.slug {
            self.cache.invalidate_category(Some(&category.slug)).await;
        }
        self.cache.invalidate_category(None).await;
        Ok(category)
    }

    pub async fn delete_category(&self, id: Uuid) -> Result<(), AppError> {
        let Some(existing) = self.categories.find_by_id(id).await? else {
            return Err(AppError::NotFound);
        };

        self.categories_write.delete_category(id).await?;
        self.cache.invalidate_category(Some(&existing.slug)).await;
        self.cache.invalidate_category(None).await;
        Ok(())
    }

    /// Backfill slugs for categories created before slugs existed.
    ///
    /// Returns the number of categories updated.
    pub async fn generate_missing_slugs(&self) -> Result<usize, AppError> {
        let pending = self.categories.list_missing_slugs().await?;
        let mut updated = 0;

        for category in pending {
            let slug = self.unique_slug(&category.name, None).await?;
            self.categories_write.set_slug(category.id, &slug).await?;
            info!(
                target: "vetrina::catalog",
                category = %category.name,
                slug = %slug,
                "generated category slug"
            );
            updated += 1;
        }

        if updated > 0 {
            self.cache.invalidate_category(None).await;
        }
        Ok(updated)
    }

    /// Generate a slug for `name` that is unique among categories.
    /// `own_slug` marks the caller's current slug as acceptable.
    async fn unique_slug(&self, name: &str, own_slug: Option<&str>) -> Result<String, AppError> {
        let categories = self.categories.clone();
        generate_unique_slug_async(name, |candidate| {
            let categories = categories.clone();
            let candidate = candidate.to_string();
            let own = own_slug.map(str::to_string);
            async move {
                if own.as_deref() == Some(candidate.as_str()) {
                    return Ok(true);
                }
                categories.slug_exists(&candidate).await.map(|exists| !exists)
            }
        })
        .await
        .map_err(|err| match err {
            SlugAsyncError::Predicate(repo) => AppError::from(repo),
            SlugAsyncError::Slug(slug) => AppError::validation(slug.to_string()),
        })
    }
}

fn validate_product(
    name: &str,
    description: Option<&str>,
    price_cents: i64,
) -> Result<(), AppError> {
    validate_product_name(name)?;
    if let Some(description) = description {
        validate_product_description(description)?;
    }
    validate_price_cents(price_cents)?;
    Ok(())
}
