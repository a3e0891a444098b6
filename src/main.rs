//! Coop Voting server.
//!
//! Serves the REST API and runs the expiration sweeper until Ctrl-C.

use std::sync::Arc;

use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use coop_voting::adapters::http::{api_router, with_middleware, AgendaHandlers, VotingHandlers};
use coop_voting::adapters::{
    PostgresAgendaItemRepository, PostgresVoteRepository, PostgresVotingSessionRepository,
    RedisCacheStore, RedisDistributedLock, RedisFastCounter, RedisStreamEventPublisher,
};
use coop_voting::application::handlers::{
    AgendaItemCache, CastVoteHandler, CreateAgendaItemHandler, GetAgendaItemHandler,
    GetResultHandler, GetSessionHandler, ListAgendaItemsHandler, OpenSessionHandler,
};
use coop_voting::application::services::{
    ExpirationSweeper, ExpirationSweeperConfig, ResultAggregator, ResultPublisher, SessionCloser,
};
use coop_voting::config::AppConfig;
use coop_voting::ports::{
    AgendaItemRepository, CacheStore, DistributedLock, EventPublisher, FastCounter,
    VoteRepository, VotingSessionRepository,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);

    tracing::info!(
        environment = ?config.server.environment,
        "Starting coop-voting"
    );

    // Durable store
    let pool = config.database.pool_options().connect(&config.database.url).await?;
    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    // Counters, lock, cache and result stream share one multiplexed connection
    let client = redis::Client::open(config.redis.url.as_str())?;
    let conn =
        tokio::time::timeout(config.redis.timeout(), client.get_multiplexed_tokio_connection())
            .await??;

    let agenda_items: Arc<dyn AgendaItemRepository> =
        Arc::new(PostgresAgendaItemRepository::new(pool.clone()));
    let sessions: Arc<dyn VotingSessionRepository> =
        Arc::new(PostgresVotingSessionRepository::new(pool.clone()));
    let votes: Arc<dyn VoteRepository> = Arc::new(PostgresVoteRepository::new(pool.clone()));
    let counter: Arc<dyn FastCounter> = Arc::new(RedisFastCounter::new(conn.clone()));
    let lock: Arc<dyn DistributedLock> = Arc::new(RedisDistributedLock::new(conn.clone()));
    let cache: Arc<dyn CacheStore> = Arc::new(RedisCacheStore::new(conn.clone()));
    let publisher: Arc<dyn EventPublisher> = Arc::new(RedisStreamEventPublisher::new(
        conn,
        config.events.result_stream.clone(),
        config.events.partitions,
    ));

    // Expiration sweeper
    let closer = Arc::new(SessionCloser::new(
        sessions.clone(),
        counter.clone(),
        ResultAggregator::new(counter.clone(), votes.clone()),
        ResultPublisher::new(publisher).with_timeout(config.voting.publish_timeout()),
    ));
    let sweeper_config = ExpirationSweeperConfig::default()
        .with_interval(config.voting.sweep_interval())
        .with_lock_name(config.voting.sweep_lock_name.clone())
        .with_lock_hold(config.voting.lock_min_hold(), config.voting.lock_max_hold());
    let sweeper = ExpirationSweeper::with_config(sessions.clone(), lock, closer, sweeper_config);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper_task = tokio::spawn(async move { sweeper.run(shutdown_rx).await });

    // HTTP
    let agenda_cache = AgendaItemCache::new(cache).with_ttl(config.cache.agenda_item_ttl());
    let agenda = AgendaHandlers::new(
        Arc::new(CreateAgendaItemHandler::new(agenda_items.clone())),
        Arc::new(GetAgendaItemHandler::with_cache(
            agenda_items.clone(),
            agenda_cache.clone(),
        )),
        Arc::new(ListAgendaItemsHandler::new(agenda_items.clone())),
    );
    let voting = VotingHandlers::new(
        Arc::new(
            OpenSessionHandler::new(agenda_items.clone(), sessions.clone())
                .with_default_duration(config.voting.default_session_duration_secs)
                .with_agenda_cache(agenda_cache.clone()),
        ),
        Arc::new(
            CastVoteHandler::new(agenda_items, sessions.clone(), votes, counter)
                .with_counter_ttl(config.voting.counter_ttl_secs)
                .with_agenda_cache(agenda_cache),
        ),
        Arc::new(GetSessionHandler::new(sessions.clone())),
        Arc::new(GetResultHandler::new(sessions)),
    );
    let app = with_middleware(
        api_router(agenda, voting),
        config.server.request_timeout(),
        &config.server.cors_origins_list(),
    );

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP server stopped, waiting for sweeper");
    // The receiver may already be gone if the sweeper task ended early
    let _ = shutdown_tx.send(true);
    if let Err(e) = sweeper_task.await {
        tracing::error!(error = %e, "Expiration sweeper task failed");
    }

    pool.close().await;
    tracing::info!("Shutdown complete");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
    }
    tracing::info!("Shutdown signal received");
}
