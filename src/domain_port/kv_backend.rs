/// The four key-value commands the token store needs, plus one optional
/// atomic primitive.
#[async_trait::async_trait]
pub trait KvBackend: Send + Sync {
    /// `SET key value EX ttl_secs`. Overwrites value and expiry.
    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), KvError>;

    /// `GET key`. A missing or expired key is `Ok(None)`.
    async fn get(&self, key: &str) -> Result<Option<String>, KvError>;

    /// `EXPIRE key ttl_secs`. Returns whether the key existed.
    async fn expire(&self, key: &str, ttl_secs: u64) -> Result<bool, KvError>;

    /// `DEL key`. Returns whether a key was removed.
    async fn del(&self, key: &str) -> Result<bool, KvError>;

    /// Reset the TTL only if the stored value equals `expected`, in one step.
    /// Returns whether the TTL was reset.
    async fn expire_if_eq(
        &self,
        _key: &str,
        _expected: &str,
        _ttl_secs: u64,
    ) -> Result<bool, KvError> {
        Err(KvError::Unsupported("expire_if_eq"))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum KvError {
    #[error("infra error: {0}")]
    Store(String),
    #[error("operation not supported by backend: {0}")]
    Unsupported(&'static str),
}
