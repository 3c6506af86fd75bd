mod api;
mod middleware;

use std::sync::Arc;

use goodslink_core::{load_goods_config_or_default, Environment};
use goodslink_db::{PgAuthorizer, PgGoodsStore};
use goodslink_resolver::{AssetUrls, ContentFetcher, FetchConfig, GoodsResolver};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, default_rate_limit_state, AppState},
    middleware::AuthState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(goodslink_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = goodslink_db::PoolConfig::from_app_config(&config);
    let pool = goodslink_db::connect_pool(&config.database_url, pool_config).await?;
    let applied = goodslink_db::run_migrations(&pool).await?;
    tracing::info!(applied, "migrations up to date");

    let goods_config = load_goods_config_or_default(&config.goods_config_path)?;
    let fetcher = ContentFetcher::new(FetchConfig::from_app_config(&config))?;
    let resolver = GoodsResolver::new(
        PgGoodsStore::new(pool.clone()),
        PgAuthorizer::new(pool.clone()),
        fetcher,
        AssetUrls::new(config.asset_base_url.clone()),
        goods_config,
    )
    .with_max_input_chars(config.max_input_chars);

    let auth = AuthState::from_env(matches!(config.env, Environment::Development))?;
    let state = AppState {
        pool,
        resolver: Arc::new(resolver),
    };
    let app = build_app(state, auth, default_rate_limit_state());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "goodslink-server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
