use std::sync::Arc;
use std::net::SocketAddr;
use anyhow::Context;
use ordo_api::{app, AppState};
use ordo_catalog::HttpProductClient;
use ordo_order::OrderWorkflow;
use ordo_store::{app_config::Config, DbClient, KafkaEventPublisher, PgOrderStore, RedisOrderCache};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ordo_api=debug,ordo_order=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting order service on port {}", config.server.port);

    // Postgres
    let db = DbClient::new(&config.database.url, config.database.max_connections)
        .await
        .context("Failed to connect to database")?;
    db.migrate().await.context("Failed to run migrations")?;
    let store = Arc::new(PgOrderStore::new(db.pool.clone()));

    // Redis
    let cache = RedisOrderCache::new(&config.redis.url)
        .context("Failed to create Redis client")?;
    cache.ping().await.context("Failed to connect to Redis")?;

    // Kafka
    let publisher = KafkaEventPublisher::new(&config.kafka.brokers, &config.kafka.topic)
        .context("Failed to create Kafka producer")?;

    let catalog = HttpProductClient::new(&config.catalog.base_url, config.catalog.timeout())
        .context("Failed to build product catalog client")?;

    let workflow = OrderWorkflow::new(
        Arc::new(catalog),
        store,
        Arc::new(cache),
        Arc::new(publisher),
    )
    .with_cache_ttl(config.cache.order_ttl());

    let app = app(AppState::new(workflow));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
