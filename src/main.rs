//! TaskFlow API server entry point.
//!
//! Loads configuration, connects PostgreSQL and Redis, assembles the router
//! with per-route rate limits, and runs the HTTP server and the task status
//! worker until Ctrl-C or SIGTERM.

use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use taskflow::adapters::auth::{Argon2PasswordHasher, JwtTokenIssuer};
use taskflow::adapters::cache::RedisKeyValueStore;
use taskflow::adapters::clock::SystemClock;
use taskflow::adapters::http::{app_router, AppState, RouteRateLimits, RouterSettings};
use taskflow::adapters::jobs::{
    RedisJobConsumer, RedisJobQueue, TaskStatusWorker, TaskStatusWorkerConfig,
};
use taskflow::adapters::postgres::{run_migrations, PostgresTaskRepository, PostgresUserRepository};
use taskflow::adapters::rate_limiter::{
    FixedWindowRateLimiter, RateLimitStrategy, RedisRateLimiter,
};
use taskflow::config::{AppConfig, LogFormat, ServerConfig};
use taskflow::ports::{Clock, RateLimiter};

type BoxError = Box<dyn Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = ?config.server.environment,
        "Starting TaskFlow"
    );

    // PostgreSQL
    let pool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await?;
    tracing::info!(url = %config.database.redacted_url(), "Connected to database");

    if config.database.run_migrations {
        run_migrations(&pool).await?;
        tracing::info!("Migrations completed");
    }

    // Redis
    let redis_client = redis::Client::open(config.redis.url.as_str())?;
    let redis_conn = tokio::time::timeout(
        config.redis.timeout(),
        redis_client.get_multiplexed_tokio_connection(),
    )
    .await??;
    tracing::info!("Connected to Redis");

    // Rate limiting
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let limits = &config.rate_limit;
    let limiter: Arc<dyn RateLimiter> = match limits.strategy {
        RateLimitStrategy::Record => {
            let store = RedisKeyValueStore::new(redis_conn.clone())
                .with_key_prefix(config.redis.key_prefix.clone());
            Arc::new(
                FixedWindowRateLimiter::new(Arc::new(store), clock.clone())
                    .with_failure_policy(limits.failure_policy)
                    .with_store_timeout(limits.store_timeout()),
            )
        }
        RateLimitStrategy::AtomicCounter => Arc::new(
            RedisRateLimiter::new(redis_conn.clone(), clock.clone())
                .with_key_prefix(config.redis.key_prefix.clone())
                .with_failure_policy(limits.failure_policy)
                .with_store_timeout(limits.store_timeout()),
        ),
    };
    let policies = limits.policy_table();
    tracing::info!(
        strategy = %limits.strategy,
        failure_policy = ?limits.failure_policy,
        protected_operations = policies.len(),
        "Rate limiter initialized"
    );

    // Application state
    let state = AppState {
        users: Arc::new(PostgresUserRepository::new(pool.clone())),
        tasks: Arc::new(PostgresTaskRepository::new(pool.clone())),
        hasher: Arc::new(Argon2PasswordHasher::new()),
        tokens: Arc::new(JwtTokenIssuer::new(config.auth.jwt_settings())),
        queue: Arc::new(
            RedisJobQueue::new(redis_conn.clone()).with_key_prefix(config.redis.key_prefix.clone()),
        ),
    };

    let settings = RouterSettings {
        request_timeout: config.server.request_timeout(),
        cors_origins: config.server.cors_origins_list(),
    };
    let app = app_router(state, RouteRateLimits::new(limiter, policies), &settings);

    // Background worker
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker = if config.jobs.worker_enabled {
        let consumer = RedisJobConsumer::connect(&redis_client)
            .await?
            .with_key_prefix(config.redis.key_prefix.clone());
        let worker = TaskStatusWorker::with_config(
            Arc::new(consumer),
            TaskStatusWorkerConfig::default().with_poll_timeout(config.jobs.poll_timeout()),
        );
        Some(tokio::spawn(async move { worker.run(shutdown_rx).await }))
    } else {
        tracing::info!("Task status worker disabled");
        None
    };

    // HTTP server
    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    })
    .await?;

    if let Some(handle) = worker {
        if let Err(e) = handle.await {
            tracing::error!(error = %e, "Task status worker panicked");
        }
    }

    pool.close().await;
    tracing::info!("TaskFlow stopped");
    Ok(())
}

/// Installs the global subscriber from `server.log_level` and `server.log_format`.
fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(server.log_level.as_str()));

    let registry = tracing_subscriber::registry().with(filter);
    match server.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Wait for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
