use crate::application_impl::*;
use crate::domain_port::*;
use crate::infra_memory::*;
use crate::infra_redis::*;
use crate::logger::*;
use crate::settings::Settings;
use std::sync::Arc;

/// Build the backend named in `settings.store.backend` and wrap it in a
/// [`KvTokenStore`].
pub async fn build_token_store(settings: &Settings) -> anyhow::Result<Arc<dyn TokenStore>> {
    let backend = build_backend(settings).await?;
    let config = settings.store.token_store_config();
    info!(
        backend = %settings.store.backend,
        prefix = %config.prefix,
        refresh_mode = ?config.refresh_mode,
        on_refresh_failure = ?config.on_refresh_failure,
        "token store ready"
    );
    Ok(Arc::new(KvTokenStore::new(backend, config)))
}

pub async fn build_backend(settings: &Settings) -> anyhow::Result<Arc<dyn KvBackend>> {
    let backend: Arc<dyn KvBackend> = match settings.store.backend.as_str() {
        "memory" => Arc::new(MemoryKvBackend::new()),
        "redis" => {
            let redis = RedisKvBackend::connect(&settings.redis.dsn).await?;
            let pong = redis.ping().await?;
            debug!("PING -> {}", pong);
            Arc::new(redis)
        }
        other => return Err(anyhow::anyhow!("Unknown store backend: {}", other)),
    };
    Ok(backend)
}
