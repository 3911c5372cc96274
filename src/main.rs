use std::sync::Arc;

use dotenvy::dotenv;
use snafu::ResultExt;
use tokio::net::TcpListener;
use tokio::signal;

use viewrank::api::{self, App};
use viewrank::clock::SystemClock;
use viewrank::config;
use viewrank::error::{
    ApplicationError, BindAddressSnafu, ConnectStoreSnafu, WebServerSnafu,
};
use viewrank::logger;
use viewrank::repository::RankingRepository;
use viewrank::service::{LoggingService, Ranking};
use viewrank::store;

#[tokio::main]
async fn main() -> Result<(), ApplicationError> {
    dotenv().ok();

    let config = config::load()?;

    let _guard = logger::init(&config)?;

    if config.store_defaulted {
        tracing::warn!(
            redis_url = %config.redis_url,
            redis_key = %config.redis_key,
            "store settings were blank, using the defaults"
        );
    }

    let store = store::connect(&config.store_target())
        .await
        .context(ConnectStoreSnafu)?;

    let repository = RankingRepository::new(store, Arc::new(SystemClock), config.redis_key.clone());
    let service = LoggingService::new(Ranking::new(repository));
    let router = api::http::router(App::new(Arc::new(service)), config.request_timeout());

    let listener = TcpListener::bind(config.host)
        .await
        .context(BindAddressSnafu {
            address: config.host,
        })?;
    tracing::info!("server started on {}", config.host);

    let (stopping, stopped) = tokio::sync::oneshot::channel();
    let server = async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                shutdown_signal().await;
                let _ = stopping.send(());
            })
            .await
            .context(WebServerSnafu)
    };

    let grace = config.shutdown_grace();
    let deadline = async move {
        // the sender is dropped without sending only when the server has already stopped
        if stopped.await.is_ok() {
            tokio::time::sleep(grace).await;
        } else {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        result = server => {
            tracing::info!("server shut down gracefully");
            result
        }
        _ = deadline => {
            tracing::warn!("in-flight requests did not finish within {:?}, exiting", grace);
            Ok(())
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!(%error, "failed to listen for ctrl+c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(error) => {
                tracing::error!(%error, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received, draining requests");
}
