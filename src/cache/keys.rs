//! Cache key definitions.
//!
//! Each cached resource is a variant of [`CatalogKey`] carrying its typed
//! parameters; the variant maps to a deterministic key string and TTL.
//! Ad-hoc resources without a registered variant go through
//! [`fallback_key`] with [`DEFAULT_TTL`].

use std::time::Duration;

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// TTL applied to unregistered resource names.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

const TTL_PRODUCTS: Duration = Duration::from_secs(300);
const TTL_CATEGORIES: Duration = Duration::from_secs(3600);
const TTL_STATS: Duration = Duration::from_secs(1800);
const TTL_PRODUCT_DETAIL: Duration = Duration::from_secs(600);

/// Identifies a cached catalog resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CatalogKey {
    /// All published products.
    ProductsAll,
    /// Published products of one category.
    ProductsByCategory { slug: String },
    /// All categories ordered by name.
    CategoriesAll,
    /// Category record plus aggregates and recent products.
    CategoryDetail { slug: String },
    /// Overall catalog aggregates and top categories.
    ProductStats,
    /// A single published product.
    ProductDetail { id: Uuid },
}

impl CatalogKey {
    /// The key string under which this resource is stored.
    pub fn key(&self) -> String {
        match self {
            CatalogKey::ProductsAll => "products:all".to_string(),
            CatalogKey::ProductsByCategory { slug } => format!("products:category:{slug}"),
            CatalogKey::CategoriesAll => "categories:all".to_string(),
            CatalogKey::CategoryDetail { slug } => format!("category:detail:{slug}"),
            CatalogKey::ProductStats => "products:stats".to_string(),
            CatalogKey::ProductDetail { id } => format!("product:detail:{id}"),
        }
    }

    /// Time-to-live for this resource.
    pub fn ttl(&self) -> Duration {
        match self {
            CatalogKey::ProductsAll | CatalogKey::ProductsByCategory { .. } => TTL_PRODUCTS,
            CatalogKey::CategoriesAll | CatalogKey::CategoryDetail { .. } => TTL_CATEGORIES,
            CatalogKey::ProductStats => TTL_STATS,
            CatalogKey::ProductDetail { .. } => TTL_PRODUCT_DETAIL,
        }
    }
}

/// Key for a resource name without a registered [`CatalogKey`] variant.
///
/// Deterministic: identical `(name, params)` always produce the identical
/// key. Callers pairing this with a TTL should use [`DEFAULT_TTL`].
pub fn fallback_key(name: &str, params: &[(&str, &str)]) -> String {
    let mut hasher = Sha256::new();
    for (key, value) in params {
        hasher.update(key.as_bytes());
        hasher.update(b"=");
        hasher.update(value.as_bytes());
        hasher.update(b";");
    }
    let digest = hex::encode(hasher.finalize());
    format!("{name}:{}", &digest[..8])
}
