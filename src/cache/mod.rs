//! Vetrina catalog cache.
//!
//! A thin key/TTL layer over the catalog read paths:
//!
//! - **Keys**: a closed enumeration of cached resources, each with a
//!   deterministic key string and TTL (`keys.rs`)
//! - **Store**: the external key-value collaborator plus an in-process
//!   implementation (`store.rs`)
//! - **Manager**: cache-or-fetch reads and explicit invalidation hooks
//!   (`manager.rs`)
//!
//! The manager does not enforce consistency on its own: write paths must
//! call the matching `invalidate_*` operation after every mutation. A store
//! outage is indistinguishable from a miss; every read degrades to a direct
//! query.

mod keys;
mod manager;
mod store;

pub use keys::{CatalogKey, DEFAULT_TTL, fallback_key};
pub use manager::CatalogCache;
pub use store::{CacheStore, MemoryStore, NullStore};
