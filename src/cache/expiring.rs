//! Expiring cache over a durable store, with an optional session tier
//!
//! Records are stored as `{"timestamp": <ms since epoch>, "data": <payload>}`.
//! Expiry is checked lazily on read: a record older than [`CACHE_DURATION_MS`]
//! is purged and reported as absent. Writes are best-effort; a failing store
//! is logged and otherwise ignored so that caching never blocks the data path.

use chrono::Utc;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use super::store::DurableStore;

/// How long a record stays fresh: 24 hours in milliseconds
pub const CACHE_DURATION_MS: i64 = 24 * 60 * 60 * 1000;

/// Source of the current time in milliseconds since the Unix epoch
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// A clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(now_ms: i64) -> Self {
        Self {
            now: AtomicI64::new(now_ms),
        }
    }

    pub fn set(&self, now_ms: i64) {
        self.now.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance(&self, ms: i64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now_ms(&self) -> i64 {
        (**self).now_ms()
    }
}

/// Envelope written for each key
#[derive(Debug, Serialize)]
struct CacheRecord<'a, T> {
    timestamp: i64,
    data: &'a T,
}

/// Envelope as read back; both fields are optional so a malformed record can be detected
#[derive(Debug, Deserialize)]
struct StoredRecord {
    timestamp: Option<i64>,
    #[serde(default)]
    data: Value,
}

/// Durable cache tier with timestamp-based expiry
pub struct ExpiringCache {
    store: Box<dyn DurableStore>,
    clock: Box<dyn Clock>,
}

impl std::fmt::Debug for ExpiringCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpiringCache").finish_non_exhaustive()
    }
}

impl ExpiringCache {
    /// Creates a cache over `store` using the wall clock
    pub fn new(store: impl DurableStore + 'static) -> Self {
        Self::with_clock(store, SystemClock)
    }

    /// Creates a cache over `store` with a custom clock
    pub fn with_clock(store: impl DurableStore + 'static, clock: impl Clock + 'static) -> Self {
        Self {
            store: Box::new(store),
            clock: Box::new(clock),
        }
    }

    /// Reads a fresh payload for `key`
    ///
    /// Returns `None` if the key is missing. Unparsable records, records
    /// without a usable timestamp, expired records, and payloads that do not
    /// decode into `T` are deleted before returning `None`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.store.get_item(key)?;

        let record: StoredRecord = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(key, error = %e, "purging unparsable cache record");
                self.store.remove_item(key);
                return None;
            }
        };

        let Some(timestamp) = record.timestamp else {
            tracing::warn!(key, "purging cache record without timestamp");
            self.store.remove_item(key);
            return None;
        };

        let Some(age) = self.clock.now_ms().checked_sub(timestamp) else {
            tracing::warn!(key, timestamp, "purging cache record with out-of-range timestamp");
            self.store.remove_item(key);
            return None;
        };
        if age > CACHE_DURATION_MS {
            tracing::debug!(key, age_ms = age, "cache record expired");
            self.store.remove_item(key);
            return None;
        }

        match serde_json::from_value(record.data) {
            Ok(data) => {
                tracing::debug!(key, "durable cache hit");
                Some(data)
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "purging cache record with malformed payload");
                self.store.remove_item(key);
                None
            }
        }
    }

    /// Stores `data` under `key`, stamped with the current time
    ///
    /// Failures are logged and swallowed.
    pub fn set<T: Serialize>(&self, key: &str, data: &T) {
        let record = CacheRecord {
            timestamp: self.clock.now_ms(),
            data,
        };

        let json = match serde_json::to_string(&record) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(key, error = %e, "cache save failed: payload not serializable");
                return;
            }
        };

        if let Err(e) = self.store.set_item(key, &json) {
            tracing::warn!(key, error = %e, "cache save failed");
        }
    }

    /// Deletes `key` from the durable store
    pub fn remove(&self, key: &str) {
        self.store.remove_item(key);
    }
}

/// Session tier in front of an [`ExpiringCache`]
///
/// The in-process map is never expiry-checked and lives until the cache is
/// dropped. A miss falls through to the durable tier; a durable hit is
/// remembered for the rest of the session.
#[derive(Debug)]
pub struct SessionCache {
    durable: ExpiringCache,
    session: HashMap<String, Value>,
}

impl SessionCache {
    pub fn new(durable: ExpiringCache) -> Self {
        Self {
            durable,
            session: HashMap::new(),
        }
    }

    /// The durable tier, for entries that should skip the session map
    pub fn durable(&self) -> &ExpiringCache {
        &self.durable
    }

    /// Looks in the session map first, then the durable tier
    pub fn get<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        if let Some(value) = self.session.get(key) {
            match serde_json::from_value(value.clone()) {
                Ok(data) => {
                    tracing::debug!(key, "session cache hit");
                    return Some(data);
                }
                Err(_) => {
                    self.session.remove(key);
                }
            }
        }

        let value: Value = self.durable.get(key)?;
        match serde_json::from_value(value.clone()) {
            Ok(data) => {
                self.session.insert(key.to_string(), value);
                Some(data)
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "purging cache record with malformed payload");
                self.durable.remove(key);
                None
            }
        }
    }

    /// Writes through to both tiers
    pub fn set<T: Serialize>(&mut self, key: &str, data: &T) {
        match serde_json::to_value(data) {
            Ok(value) => {
                self.session.insert(key.to_string(), value);
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "session cache save failed");
            }
        }
        self.durable.set(key, data);
    }

    /// Whether `key` is held in the session map
    pub fn in_session(&self, key: &str) -> bool {
        self.session.contains_key(key)
    }
}
