//! Catalog cache manager.
//!
//! Caches catalog read queries under the keys defined in
//! [`super::keys`]. List queries store only the ordered id list; detail
//! and stat queries store the full serialized payload. Invalidation is
//! explicit: write paths must call the matching `invalidate_*` after every
//! mutation, which this component cannot enforce.

use std::collections::HashMap;
use std::sync::Arc;

use metrics::counter;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::application::repos::{CategoriesRepo, ProductsRepo, RepoError};
use crate::domain::entities::{
    CatalogStats, CategoryInfo, CategoryRecord, ProductRecord,
};

use super::keys::CatalogKey;
use super::store::CacheStore;

const RECENT_PRODUCTS_LIMIT: u32 = 5;
const TOP_CATEGORIES_LIMIT: u32 = 5;

const METRIC_HIT: &str = "vetrina_cache_hit_total";
const METRIC_MISS: &str = "vetrina_cache_miss_total";
const METRIC_INVALIDATE: &str = "vetrina_cache_invalidate_total";

/// Envelope stored for list queries: the ordered id list, not the rows.
#[derive(Debug, Serialize, Deserialize)]
struct IdEnvelope {
    ids: Vec<Uuid>,
}

/// Explicit cache component over the catalog read paths.
///
/// Constructed with an injected store and repositories; shared by reference
/// between callers.
pub struct CatalogCache {
    store: Arc<dyn CacheStore>,
    products: Arc<dyn ProductsRepo>,
    categories: Arc<dyn CategoriesRepo>,
}

impl CatalogCache {
    pub fn new(
        store: Arc<dyn CacheStore>,
        products: Arc<dyn ProductsRepo>,
        categories: Arc<dyn CategoriesRepo>,
    ) -> Self {
        Self {
            store,
            products,
            categories,
        }
    }

    /// Published products, optionally narrowed to one category.
    pub async fn get_products(
        &self,
        category_slug: Option<&str>,
    ) -> Result<Vec<ProductRecord>, RepoError> {
        let key = match category_slug {
            Some(slug) => CatalogKey::ProductsByCategory {
                slug: slug.to_string(),
            },
            None => CatalogKey::ProductsAll,
        };

        if let Some(ids) = self.cached_ids(&key).await {
            let rows = self.products.find_by_ids(&ids).await?;
            return Ok(reorder_by_ids(rows, &ids, |p| p.id));
        }

        let rows = self.products.list_published(category_slug).await?;
        self.store_ids(&key, rows.iter().map(|p| p.id)).await;
        Ok(rows)
    }

    /// All categories ordered by name.
    pub async fn get_categories(&self) -> Result<Vec<CategoryRecord>, RepoError> {
        let key = CatalogKey::CategoriesAll;

        if let Some(ids) = self.cached_ids(&key).await {
            let rows = self.categories.find_by_ids(&ids).await?;
            return Ok(reorder_by_ids(rows, &ids, |c| c.id));
        }

        let rows = self.categories.list_ordered().await?;
        self.store_ids(&key, rows.iter().map(|c| c.id)).await;
        Ok(rows)
    }

    /// Category record plus price aggregates and recent products, or `None`
    /// for an unknown slug.
    pub async fn get_category_info(&self, slug: &str) -> Result<Option<CategoryInfo>, RepoError> {
        let key = CatalogKey::CategoryDetail {
            slug: slug.to_string(),
        };

        if let Some(info) = self.cached_payload::<CategoryInfo>(&key).await {
            return Ok(Some(info));
        }

        let Some(category) = self.categories.find_by_slug(slug).await? else {
            return Ok(None);
        };

        let stats = self.products.category_price_stats(category.id).await?;
        let recent = self
            .products
            .recent_published(category.id, RECENT_PRODUCTS_LIMIT)
            .await?;

        let info = CategoryInfo {
            category,
            stats,
            recent,
        };
        self.store_payload(&key, &info).await;
        Ok(Some(info))
    }

    /// A single published product (full record cached), or `None` for an
    /// unknown or unpublished id.
    pub async fn get_product_info(&self, id: Uuid) -> Result<Option<ProductRecord>, RepoError> {
        let key = CatalogKey::ProductDetail { id };

        if let Some(product) = self.cached_payload::<ProductRecord>(&key).await {
            return Ok(Some(product));
        }

        let Some(product) = self.products.find_published(id).await? else {
            return Ok(None);
        };

        self.store_payload(&key, &product).await;
        Ok(Some(product))
    }

    /// Overall aggregates plus the top categories by published-product count.
    pub async fn get_stats(&self) -> Result<CatalogStats, RepoError> {
        let key = CatalogKey::ProductStats;

        if let Some(stats) = self.cached_payload::<CatalogStats>(&key).await {
            return Ok(stats);
        }

        let overall = self.products.overall_stats().await?;
        let top_categories = self.categories.top_by_published(TOP_CATEGORIES_LIMIT).await?;

        let stats = CatalogStats {
            overall,
            top_categories,
        };
        self.store_payload(&key, &stats).await;
        Ok(stats)
    }

    /// Drop the detail entry for `id` (when given) plus the all-products
    /// listing and the stats entry.
    ///
    /// Per-category listings are left in place and age out via their TTL;
    /// callers tolerating no staleness must clear the affected category
    /// explicitly.
    pub async fn invalidate_product(&self, id: Option<Uuid>) {
        if let Some(id) = id {
            self.delete(&CatalogKey::ProductDetail { id }).await;
        }
        self.delete(&CatalogKey::ProductsAll).await;
        self.delete(&CatalogKey::ProductStats).await;
    }

    /// Drop one category's detail and product-listing entries, or (without a
    /// slug) only the all-categories listing.
    ///
    /// The stats entry is left in place and ages out via its TTL.
    pub async fn invalidate_category(&self, slug: Option<&str>) {
        match slug {
            Some(slug) => {
                self.delete(&CatalogKey::CategoryDetail {
                    slug: slug.to_string(),
                })
                .await;
                self.delete(&CatalogKey::ProductsByCategory {
                    slug: slug.to_string(),
                })
                .await;
            }
            None => self.delete(&CatalogKey::CategoriesAll).await,
        }
    }

    /// Flush the entire cache store. Blunt fallback, not resource-scoped.
    pub async fn clear(&self) {
        counter!(METRIC_INVALIDATE).increment(1);
        debug!(target: "vetrina::cache", "clearing cache store");
        self.store.clear().await;
    }

    async fn cached_ids(&self, key: &CatalogKey) -> Option<Vec<Uuid>> {
        let envelope: IdEnvelope = self.cached_value(key).await?;
        Some(envelope.ids)
    }

    async fn store_ids(&self, key: &CatalogKey, ids: impl Iterator<Item = Uuid>) {
        let envelope = IdEnvelope { ids: ids.collect() };
        self.store_payload(key, &envelope).await;
    }

    async fn cached_payload<T: for<'de> Deserialize<'de>>(&self, key: &CatalogKey) -> Option<T> {
        self.cached_value(key).await
    }

    async fn cached_value<T: for<'de> Deserialize<'de>>(&self, key: &CatalogKey) -> Option<T> {
        let raw = self.store.get(&key.key()).await;
        // An unreadable entry counts as a miss, same as an absent one.
        let decoded = raw.and_then(|value| serde_json::from_value(value).ok());
        match decoded {
            Some(value) => {
                counter!(METRIC_HIT).increment(1);
                Some(value)
            }
            None => {
                counter!(METRIC_MISS).increment(1);
                None
            }
        }
    }

    async fn store_payload<T: Serialize>(&self, key: &CatalogKey, payload: &T) {
        match serde_json::to_value(payload) {
            Ok(value) => self.set_raw(key, value).await,
            Err(error) => {
                // Skipping the write only costs a future miss.
                debug!(target: "vetrina::cache", key = %key.key(), %error, "failed to serialize cache payload");
            }
        }
    }

    async fn set_raw(&self, key: &CatalogKey, value: Value) {
        self.store.set(&key.key(), value, key.ttl()).await;
    }

    async fn delete(&self, key: &CatalogKey) {
        counter!(METRIC_INVALIDATE).increment(1);
        debug!(target: "vetrina::cache", key = %key.key(), "invalidating cache entry");
        self.store.delete(&key.key()).await;
    }
}

/// Arrange `rows` in the order given by `ids`, silently dropping ids with no
/// matching row.
fn reorder_by_ids<T>(rows: Vec<T>, ids: &[Uuid], id_of: impl Fn(&T) -> Uuid) -> Vec<T> {
    let mut by_id: HashMap<Uuid, T> = rows.into_iter().map(|row| (id_of(&row), row)).collect();
    ids.iter().filter_map(|id| by_id.remove(id)).collect()
}
