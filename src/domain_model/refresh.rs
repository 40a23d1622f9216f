use super::KeyPrefix;
use serde::Deserialize;

/// What `check_and_refresh_token` reports when the token matched but the TTL
/// reset failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshFailurePolicy {
    /// Report `Ok(false)`, indistinguishable from a wrong token.
    #[default]
    Swallow,
    /// Report `Err(TokenStoreError::RefreshFailed)`.
    Propagate,
}

/// How the compare and the TTL reset are issued to the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshMode {
    /// `GET` then `EXPIRE`. Another writer can slip in between the two.
    #[default]
    ReadThenExpire,
    /// Single compare-and-expire step, if the backend supports it.
    Atomic,
}

#[derive(Debug, Clone, Default)]
pub struct TokenStoreConfig {
    pub prefix: KeyPrefix,
    pub on_refresh_failure: RefreshFailurePolicy,
    pub refresh_mode: RefreshMode,
}

impl TokenStoreConfig {
    pub fn new(prefix: impl Into<KeyPrefix>) -> Self {
        TokenStoreConfig {
            prefix: prefix.into(),
            ..Default::default()
        }
    }

    pub fn on_refresh_failure(mut self, policy: RefreshFailurePolicy) -> Self {
        self.on_refresh_failure = policy;
        self
    }

    pub fn refresh_mode(mut self, mode: RefreshMode) -> Self {
        self.refresh_mode = mode;
        self
    }
}
