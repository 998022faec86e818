//! Catalog cache behavior against in-memory fakes: list envelope ordering,
//! invalidation scope, and flush semantics.

mod support;

use std::sync::Arc;

use uuid::Uuid;

use support::FakeRepos;
use vetrina::cache::{CacheStore, CatalogCache, MemoryStore};

struct Harness {
    repos: Arc<FakeRepos>,
    store: Arc<MemoryStore>,
    cache: CatalogCache,
}

fn harness() -> Harness {
    let repos = FakeRepos::new();
    let store = Arc::new(MemoryStore::new());
    let cache = CatalogCache::new(
        store.clone() as Arc<dyn CacheStore>,
        repos.clone(),
        repos.clone(),
    );
    Harness {
        repos,
        store,
        cache,
    }
}

#[tokio::test]
async fn product_listing_round_trips_through_id_envelope() {
    let h = harness();
    let books = h.repos.insert_category("Books", "books");
    let alpha = h.repos.insert_product("Alpha", 1000, &books);
    let beta = h.repos.insert_product("Beta", 2000, &books);
    let gamma = h.repos.insert_product("Gamma", 3000, &books);

    let first = h.cache.get_products(None).await.unwrap();
    let first_ids: Vec<Uuid> = first.iter().map(|p| p.id).collect();
    assert_eq!(first_ids, vec![alpha.id, beta.id, gamma.id]);
    assert!(h.store.get("products:all").await.is_some());

    // Rename so a direct listing would now sort differently. The cached
    // envelope keeps serving the original order.
    {
        let mut products = h.repos.products.lock().unwrap();
        products
            .iter_mut()
            .find(|p| p.id == alpha.id)
            .unwrap()
            .name = "Zulu".to_string();
    }

    let second = h.cache.get_products(None).await.unwrap();
    let second_ids: Vec<Uuid> = second.iter().map(|p| p.id).collect();
    assert_eq!(second_ids, first_ids);
}

#[tokio::test]
async fn missing_rows_are_dropped_from_cached_listings() {
    let h = harness();
    let books = h.repos.insert_category("Books", "books");
    let alpha = h.repos.insert_product("Alpha", 1000, &books);
    let beta = h.repos.insert_product("Beta", 2000, &books);

    h.cache.get_products(None).await.unwrap();
    h.repos.remove_product(alpha.id);

    let rows = h.cache.get_products(None).await.unwrap();
    let ids: Vec<Uuid> = rows.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![beta.id]);
}

#[tokio::test]
async fn product_detail_served_from_cache_until_invalidated() {
    let h = harness();
    let books = h.repos.insert_category("Books", "books");
    let product = h.repos.insert_product("Alpha", 1000, &books);

    let cached = h.cache.get_product_info(product.id).await.unwrap().unwrap();
    assert_eq!(cached.id, product.id);

    // The row is gone, but the detail entry still answers.
    h.repos.remove_product(product.id);
    let stale = h.cache.get_product_info(product.id).await.unwrap();
    assert!(stale.is_some());

    h.cache.invalidate_product(Some(product.id)).await;
    let fresh = h.cache.get_product_info(product.id).await.unwrap();
    assert!(fresh.is_none());
}

#[tokio::test]
async fn invalidate_product_spares_category_listings() {
    let h = harness();
    let books = h.repos.insert_category("Books", "books");
    let product = h.repos.insert_product("Alpha", 1000, &books);

    h.cache.get_products(None).await.unwrap();
    h.cache.get_products(Some("books")).await.unwrap();
    h.cache.get_stats().await.unwrap();
    h.cache.get_product_info(product.id).await.unwrap();

    h.cache.invalidate_product(Some(product.id)).await;

    assert!(h.store.get("products:all").await.is_none());
    assert!(h.store.get("products:stats").await.is_none());
    assert!(
        h.store
            .get(&format!("product:detail:{}", product.id))
            .await
            .is_none()
    );
    assert!(h.store.get("products:category:books").await.is_some());
}

#[tokio::test]
async fn invalidate_product_is_idempotent() {
    let h = harness();
    let books = h.repos.insert_category("Books", "books");
    let product = h.repos.insert_product("Alpha", 1000, &books);

    h.cache.get_products(None).await.unwrap();
    h.cache.invalidate_product(Some(product.id)).await;
    // Repeating against already-absent keys must stay a no-op.
    h.cache.invalidate_product(Some(product.id)).await;
    h.cache.invalidate_product(None).await;

    assert!(h.store.get("products:all").await.is_none());
}

#[tokio::test]
async fn invalidate_category_scopes_to_one_slug() {
    let h = harness();
    let books = h.repos.insert_category("Books", "books");
    let games = h.repos.insert_category("Games", "games");
    h.repos.insert_product("Alpha", 1000, &books);
    h.repos.insert_product("Chess", 2500, &games);

    h.cache.get_categories().await.unwrap();
    h.cache.get_category_info("books").await.unwrap();
    h.cache.get_products(Some("books")).await.unwrap();
    h.cache.get_products(Some("games")).await.unwrap();

    h.cache.invalidate_category(Some("books")).await;

    assert!(h.store.get("category:detail:books").await.is_none());
    assert!(h.store.get("products:category:books").await.is_none());
    assert!(h.store.get("categories:all").await.is_some());
    assert!(h.store.get("products:category:games").await.is_some());
}

#[tokio::test]
async fn invalidate_category_without_slug_drops_only_the_listing() {
    let h = harness();
    h.repos.insert_category("Books", "books");

    h.cache.get_categories().await.unwrap();
    h.cache.get_category_info("books").await.unwrap();

    h.cache.invalidate_category(None).await;

    assert!(h.store.get("categories:all").await.is_none());
    assert!(h.store.get("category:detail:books").await.is_some());
}

#[tokio::test]
async fn category_info_aggregates_prices() {
    let h = harness();
    let books = h.repos.insert_category("Books", "books");
    h.repos.insert_product_at("Old", 1000, &books, 300);
    h.repos.insert_product_at("Middle", 2000, &books, 200);
    h.repos.insert_product_at("New", 3000, &books, 100);

    let info = h
        .cache
        .get_category_info("books")
        .await
        .unwrap()
        .expect("known slug");

    assert_eq!(info.stats.count, 3);
    assert_eq!(info.stats.avg_price, Some(2000.0));
    assert_eq!(info.stats.min_price, Some(1000));
    assert_eq!(info.stats.max_price, Some(3000));
    assert_eq!(info.recent[0].name, "New");
}

#[tokio::test]
async fn unknown_category_slug_is_not_cached() {
    let h = harness();

    let info = h.cache.get_category_info("missing").await.unwrap();
    assert!(info.is_none());
    assert!(h.store.is_empty());
}

#[tokio::test]
async fn clear_flushes_every_entry() {
    let h = harness();
    let books = h.repos.insert_category("Books", "books");
    h.repos.insert_product("Alpha", 1000, &books);

    h.cache.get_products(None).await.unwrap();
    h.cache.get_categories().await.unwrap();
    h.cache.get_stats().await.unwrap();
    assert!(!h.store.is_empty());

    h.cache.clear().await;
    assert!(h.store.is_empty());
    assert!(h.store.get("products:all").await.is_none());
}

#[tokio::test]
async fn stats_combine_overall_and_top_categories() {
    let h = harness();
    let books = h.repos.insert_category("Books", "books");
    let games = h.repos.insert_category("Games", "games");
    h.repos.insert_product("Alpha", 1000, &books);
    h.repos.insert_product("Beta", 3000, &books);
    h.repos.insert_product("Chess", 2000, &games);

    let stats = h.cache.get_stats().await.unwrap();
    assert_eq!(stats.overall.total, 3);
    assert_eq!(stats.overall.avg_price, Some(2000.0));
    assert_eq!(stats.overall.categories, 2);
    assert_eq!(stats.top_categories[0].slug, "books");
    assert_eq!(stats.top_categories[0].published_count, 2);
}
