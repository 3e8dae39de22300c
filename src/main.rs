//! Entry point: wires configuration, the gateway, the cache, the dispatch
//! and scheduler services, and the callback HTTP endpoint.

use dispatch_engine::api::{build_router, AppState};
use dispatch_engine::cache::StaticDataCache;
use dispatch_engine::config::EngineConfig;
use dispatch_engine::dispatch::DispatchService;
use dispatch_engine::gateway::client::GatewayTimeouts;
use dispatch_engine::gateway::{BackendGateway, ReqwestBackendGateway, TokenProvider};
use dispatch_engine::scheduler::Scheduler;
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    let config = EngineConfig::from_env().map_err(|e| anyhow::anyhow!("configuration error: {e}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(
            |_| tracing_subscriber::EnvFilter::new("info"),
        ))
        .init();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.callback_worker_threads)
        .enable_all()
        .build()?;

    runtime.block_on(run(config))
}

async fn run(config: EngineConfig) -> anyhow::Result<()> {
    tracing::info!("starting dispatch engine");

    let http_client = reqwest::Client::builder()
        .connect_timeout(config.gateway_connect_timeout)
        .build()?;
    let tokens = Arc::new(TokenProvider::new(config.oidc.clone(), http_client));

    let gateway: Arc<dyn BackendGateway> = Arc::new(ReqwestBackendGateway::new(
        config.backend_base_url.clone(),
        tokens,
        GatewayTimeouts {
            connect: config.gateway_connect_timeout,
            read: config.gateway_read_timeout,
            write: config.gateway_write_timeout,
        },
    ));

    let cache = Arc::new(StaticDataCache::new());
    cache.refresh(gateway.as_ref()).await;

    let dispatch = Arc::new(DispatchService::new(cache.clone(), gateway.clone()));

    let scheduler = Arc::new(Scheduler::new(dispatch.clone(), config.dispatch_interval));
    if config.scheduler_enabled {
        scheduler.start();
    }

    let state = Arc::new(AppState { cache, gateway, dispatch });
    let router = build_router(state, config.callback_worker_threads);

    let addr = format!("0.0.0.0:{}", config.callback_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "callback endpoint listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.stop().await;
    tracing::info!("dispatch engine shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("shutdown signal received");
}
