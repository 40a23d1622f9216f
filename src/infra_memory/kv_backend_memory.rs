use crate::domain_port::*;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

struct MemoryEntry {
    value: String,
    expires_at: Instant,
}

impl MemoryEntry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// In-process key-value backend with per-key TTL.
///
/// Cloning yields another handle to the same map, the way cloning a
/// `ConnectionManager` yields another handle to the same Redis. Expired
/// entries are dropped lazily when they are next touched.
#[derive(Clone, Default)]
pub struct MemoryKvBackend {
    entries: Arc<DashMap<String, MemoryEntry>>,
}

impl MemoryKvBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remaining lifetime of a live key.
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        self.entries
            .get(key)
            .filter(|e| e.is_live(now))
            .map(|e| e.expires_at - now)
    }

    fn deadline(now: Instant, ttl_secs: u64, command: &str) -> Result<Instant, KvError> {
        if ttl_secs == 0 {
            return Err(invalid_expire(command));
        }
        now.checked_add(Duration::from_secs(ttl_secs))
            .ok_or_else(|| invalid_expire(command))
    }
}

fn invalid_expire(command: &str) -> KvError {
    KvError::Store(format!("invalid expire time in '{}' command", command))
}

#[async_trait::async_trait]
impl KvBackend for MemoryKvBackend {
    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), KvError> {
        let expires_at = Self::deadline(Instant::now(), ttl_secs, "set")?;
        self.entries.insert(
            key.to_string(),
            MemoryEntry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(key) {
            if entry.is_live(now) {
                return Ok(Some(entry.value.clone()));
            }
        }
        self.entries.remove_if(key, |_, e| !e.is_live(now));
        Ok(None)
    }

    async fn expire(&self, key: &str, ttl_secs: u64) -> Result<bool, KvError> {
        let now = Instant::now();
        // EXPIRE with a non-positive timeout deletes the key
        if ttl_secs == 0 {
            return Ok(self
                .entries
                .remove(key)
                .is_some_and(|(_, e)| e.is_live(now)));
        }
        let expires_at = Self::deadline(now, ttl_secs, "expire")?;
        match self.entries.get_mut(key) {
            Some(mut entry) if entry.is_live(now) => {
                entry.expires_at = expires_at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn del(&self, key: &str) -> Result<bool, KvError> {
        let now = Instant::now();
        Ok(self
            .entries
            .remove(key)
            .is_some_and(|(_, e)| e.is_live(now)))
    }

    async fn expire_if_eq(
        &self,
        key: &str,
        expected: &str,
        ttl_secs: u64,
    ) -> Result<bool, KvError> {
        let now = Instant::now();
        if ttl_secs == 0 {
            return Ok(self
                .entries
                .remove_if(key, |_, e| e.is_live(now) && e.value == expected)
                .is_some());
        }
        let expires_at = Self::deadline(now, ttl_secs, "expire")?;
        match self.entries.get_mut(key) {
            Some(mut entry) if entry.is_live(now) && entry.value == expected => {
                entry.expires_at = expires_at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
