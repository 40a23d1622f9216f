use super::KvError;

#[async_trait::async_trait]
pub trait TokenStore: Send + Sync {
    /// Store `token` for `id` with a TTL, replacing any previous token and expiry.
    async fn save_token(&self, id: &str, token: &str, expires_secs: u64)
    -> Result<(), TokenStoreError>;

    /// Compare `token` with the stored one. On a match the TTL is reset to
    /// `expires_secs`; the stored value never changes.
    ///
    /// A missing key or a different token is `Ok(false)`, not an error.
    async fn check_and_refresh_token(
        &self,
        id: &str,
        token: &str,
        expires_secs: u64,
    ) -> Result<bool, TokenStoreError>;

    /// Remove the token for `id`. Removing a missing token succeeds.
    async fn del_token(&self, id: &str) -> Result<(), TokenStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TokenStoreError {
    #[error("store error: {0}")]
    Store(#[from] KvError),
    #[error("token matched but refresh failed: {0}")]
    RefreshFailed(#[source] KvError),
}
