use crate::domain_model::*;
use crate::domain_port::*;
use std::sync::Arc;

/// Token store that namespaces session identifiers and drives any [`KvBackend`].
///
/// The store keeps nothing between calls except its configuration and the
/// backend handle. In [`RefreshMode::ReadThenExpire`] the value read and the
/// TTL reset are separate commands: a concurrent save or delete in between is
/// not detected, so a refresh may land on a newer token or on nothing at all.
pub struct KvTokenStore {
    backend: Arc<dyn KvBackend>,
    config: TokenStoreConfig,
}

impl KvTokenStore {
    pub fn new(backend: Arc<dyn KvBackend>, config: TokenStoreConfig) -> Self {
        KvTokenStore { backend, config }
    }

    pub fn with_prefix(backend: Arc<dyn KvBackend>, prefix: impl Into<KeyPrefix>) -> Self {
        Self::new(backend, TokenStoreConfig::new(prefix))
    }

    fn key(&self, id: &str) -> String {
        self.config.prefix.key(id)
    }

    async fn read_then_expire(
        &self,
        key: &str,
        token: &str,
        expires_secs: u64,
    ) -> Result<bool, TokenStoreError> {
        let saved = match self.backend.get(key).await? {
            Some(saved) => saved,
            None => {
                tracing::debug!(key, "no token stored");
                return Ok(false);
            }
        };
        if saved != token {
            tracing::debug!(key, "token mismatch");
            return Ok(false);
        }

        match self.backend.expire(key, expires_secs).await {
            Ok(existed) => {
                if !existed {
                    tracing::debug!(key, "key vanished before refresh");
                }
                Ok(true)
            }
            Err(e) => match self.config.on_refresh_failure {
                RefreshFailurePolicy::Swallow => {
                    tracing::warn!(key, error = %e, "token refresh failed, reporting invalid");
                    Ok(false)
                }
                RefreshFailurePolicy::Propagate => Err(TokenStoreError::RefreshFailed(e)),
            },
        }
    }
}

#[async_trait::async_trait]
impl TokenStore for KvTokenStore {
    async fn save_token(
        &self,
        id: &str,
        token: &str,
        expires_secs: u64,
    ) -> Result<(), TokenStoreError> {
        let key = self.key(id);
        self.backend.set_ex(&key, token, expires_secs).await?;
        Ok(())
    }

    async fn check_and_refresh_token(
        &self,
        id: &str,
        token: &str,
        expires_secs: u64,
    ) -> Result<bool, TokenStoreError> {
        let key = self.key(id);
        match self.config.refresh_mode {
            RefreshMode::ReadThenExpire => self.read_then_expire(&key, token, expires_secs).await,
            RefreshMode::Atomic => {
                let refreshed = self
                    .backend
                    .expire_if_eq(&key, token, expires_secs)
                    .await?;
                Ok(refreshed)
            }
        }
    }

    async fn del_token(&self, id: &str) -> Result<(), TokenStoreError> {
        let key = self.key(id);
        self.backend.del(&key).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra_memory::MemoryKvBackend;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    /// Memory backend whose commands can be made to fail one at a time.
    #[derive(Default)]
    struct FlakyBackend {
        inner: MemoryKvBackend,
        fail_get: AtomicBool,
        fail_expire: AtomicBool,
    }

    fn down() -> KvError {
        KvError::Store("connection refused".to_string())
    }

    #[async_trait::async_trait]
    impl KvBackend for FlakyBackend {
        async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), KvError> {
            self.inner.set_ex(key, value, ttl_secs).await
        }

        async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
            if self.fail_get.load(Ordering::SeqCst) {
                return Err(down());
            }
            self.inner.get(key).await
        }

        async fn expire(&self, key: &str, ttl_secs: u64) -> Result<bool, KvError> {
            if self.fail_expire.load(Ordering::SeqCst) {
                return Err(down());
            }
            self.inner.expire(key, ttl_secs).await
        }

        async fn del(&self, key: &str) -> Result<bool, KvError> {
            self.inner.del(key).await
        }
    }

    fn flaky_store(config: TokenStoreConfig) -> (Arc<FlakyBackend>, KvTokenStore) {
        let backend = Arc::new(FlakyBackend::default());
        let store = KvTokenStore::new(backend.clone(), config);
        (backend, store)
    }

    #[tokio::test]
    async fn keys_are_namespaced() {
        let kv = MemoryKvBackend::new();
        let store = KvTokenStore::with_prefix(Arc::new(kv.clone()), "sess:");
        store.save_token("user42", "tok-abc", 60).await.unwrap();

        assert_eq!(kv.get("sess:user42").await.unwrap().as_deref(), Some("tok-abc"));
        assert_eq!(kv.get("user42").await.unwrap(), None);
    }

    #[tokio::test]
    async fn save_surfaces_backend_rejection() {
        let store = KvTokenStore::with_prefix(Arc::new(MemoryKvBackend::new()), "sess:");
        let err = store.save_token("user42", "tok-abc", 0).await.unwrap_err();
        assert!(matches!(err, TokenStoreError::Store(KvError::Store(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_slides_expiry() {
        let kv = MemoryKvBackend::new();
        let store = KvTokenStore::with_prefix(Arc::new(kv.clone()), "sess:");
        store.save_token("user42", "tok-abc", 10).await.unwrap();

        tokio::time::advance(Duration::from_secs(8)).await;
        assert!(store.check_and_refresh_token("user42", "tok-abc", 10).await.unwrap());

        tokio::time::advance(Duration::from_secs(8)).await;
        assert!(store.check_and_refresh_token("user42", "tok-abc", 10).await.unwrap());

        tokio::time::advance(Duration::from_secs(11)).await;
        assert!(!store.check_and_refresh_token("user42", "tok-abc", 10).await.unwrap());
    }

    #[tokio::test]
    async fn mismatch_leaves_ttl_alone() {
        let kv = MemoryKvBackend::new();
        let store = KvTokenStore::with_prefix(Arc::new(kv.clone()), "sess:");
        store.save_token("user42", "tok-abc", 10).await.unwrap();

        assert!(!store.check_and_refresh_token("user42", "wrong", 3600).await.unwrap());
        assert!(kv.ttl("sess:user42").unwrap() <= Duration::from_secs(10));
    }

    #[tokio::test]
    async fn refresh_failure_is_swallowed_by_default() {
        let (backend, store) = flaky_store(TokenStoreConfig::new("sess:"));
        store.save_token("user42", "tok-abc", 60).await.unwrap();
        backend.fail_expire.store(true, Ordering::SeqCst);

        assert!(!store.check_and_refresh_token("user42", "tok-abc", 60).await.unwrap());
    }

    #[tokio::test]
    async fn refresh_failure_can_be_propagated() {
        let (backend, store) = flaky_store(
            TokenStoreConfig::new("sess:").on_refresh_failure(RefreshFailurePolicy::Propagate),
        );
        store.save_token("user42", "tok-abc", 60).await.unwrap();
        backend.fail_expire.store(true, Ordering::SeqCst);

        let err = store
            .check_and_refresh_token("user42", "tok-abc", 60)
            .await
            .unwrap_err();
        assert!(matches!(err, TokenStoreError::RefreshFailed(KvError::Store(_))));
    }

    #[tokio::test]
    async fn read_failure_is_always_an_error() {
        for policy in [RefreshFailurePolicy::Swallow, RefreshFailurePolicy::Propagate] {
            let (backend, store) =
                flaky_store(TokenStoreConfig::new("sess:").on_refresh_failure(policy));
            store.save_token("user42", "tok-abc", 60).await.unwrap();
            backend.fail_get.store(true, Ordering::SeqCst);

            let err = store
                .check_and_refresh_token("user42", "tok-abc", 60)
                .await
                .unwrap_err();
            assert!(matches!(err, TokenStoreError::Store(KvError::Store(_))));
        }
    }

    #[tokio::test]
    async fn atomic_mode_requires_backend_support() {
        let (_backend, store) =
            flaky_store(TokenStoreConfig::new("sess:").refresh_mode(RefreshMode::Atomic));
        store.save_token("user42", "tok-abc", 60).await.unwrap();

        let err = store
            .check_and_refresh_token("user42", "tok-abc", 60)
            .await
            .unwrap_err();
        assert!(matches!(err, TokenStoreError::Store(KvError::Unsupported(_))));
    }

    #[tokio::test]
    async fn atomic_mode_on_memory_backend() {
        let kv = MemoryKvBackend::new();
        let store = KvTokenStore::new(
            Arc::new(kv.clone()),
            TokenStoreConfig::new("sess:").refresh_mode(RefreshMode::Atomic),
        );
        store.save_token("user42", "tok-abc", 10).await.unwrap();

        assert!(!store.check_and_refresh_token("user42", "wrong", 600).await.unwrap());
        assert!(kv.ttl("sess:user42").unwrap() <= Duration::from_secs(10));

        assert!(store.check_and_refresh_token("user42", "tok-abc", 600).await.unwrap());
        assert!(kv.ttl("sess:user42").unwrap() > Duration::from_secs(10));

        store.del_token("user42").await.unwrap();
        assert!(!store.check_and_refresh_token("user42", "tok-abc", 600).await.unwrap());
    }
}
