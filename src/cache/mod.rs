//! Cache module for storing API responses between runs
//!
//! Two tiers: a durable, quota-bounded store (files under the user's cache
//! directory, or memory) wrapped by an [`ExpiringCache`] that drops records
//! older than 24 hours on read, and an optional in-process [`SessionCache`]
//! map in front of it.

mod expiring;
mod store;

pub use expiring::{
    Clock, ExpiringCache, ManualClock, SessionCache, SystemClock, CACHE_DURATION_MS,
};
pub use store::{DurableStore, FileStore, MemoryStore, StoreError, DEFAULT_MAX_BYTES};
