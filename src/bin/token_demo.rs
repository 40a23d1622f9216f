//! Walks through the session token lifecycle against the configured backend.
//!
//! With `store.backend = "redis"` a Redis server must be reachable at
//! `redis.dsn`. Keys are written under a per-run prefix so repeated runs on a
//! shared server do not collide.
//!
//! $ cargo run --bin token_demo -- --settings=settings/release.toml
use futures_util::future::join_all;
use nanoid::nanoid;
use std::sync::Arc;
use tokenstore::application_impl::KvTokenStore;
use tokenstore::bootstrap::build_backend;
use tokenstore::domain_port::TokenStore;
use tokenstore::logger::*;
use tokenstore::settings::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let logger = Logger::new_bootstrap();

    let cli = Cli::parse();
    let project_settings = parse_settings(cli.settings.as_deref())?;
    logger.reload_from_config(&LogConfig::from(&project_settings.log))?;

    let alphabet: [char; 16] = [
        '1', '2', '3', '4', '5', '6', '7', '8', '9', '0', 'a', 'b', 'c', 'd', 'e', 'f',
    ];
    let run_id = nanoid!(10, &alphabet);

    let backend = build_backend(&project_settings).await?;
    let mut config = project_settings.store.token_store_config();
    config.prefix = format!("{}{}:", config.prefix, run_id).into();
    let store: Arc<dyn TokenStore> = Arc::new(KvTokenStore::new(backend, config));

    // single session

    store.save_token("user42", "tok-abc", 60).await?;
    let ok = store.check_and_refresh_token("user42", "tok-abc", 60).await?;
    info!("check with issued token -> {}", ok);
    let ok = store.check_and_refresh_token("user42", "wrong-tok", 60).await?;
    info!("check with wrong token -> {}", ok);
    store.del_token("user42").await?;
    let ok = store.check_and_refresh_token("user42", "tok-abc", 60).await?;
    info!("check after delete -> {}", ok);

    // many sessions at once

    let ids: Vec<String> = (0..8).map(|i| format!("user{}", i)).collect();
    join_all(ids.iter().map(|id| {
        let store = store.clone();
        async move { store.save_token(id, &format!("tok-{}", id), 30).await }
    }))
    .await
    .into_iter()
    .collect::<Result<Vec<_>, _>>()?;

    let checks = join_all(ids.iter().map(|id| {
        let store = store.clone();
        async move {
            store
                .check_and_refresh_token(id, &format!("tok-{}", id), 30)
                .await
        }
    }))
    .await;
    for (id, check) in ids.iter().zip(checks) {
        debug!("{} -> {:?}", id, check);
    }

    for id in &ids {
        store.del_token(id).await?;
    }
    info!("demo run {} finished", run_id);

    Ok(())
}
