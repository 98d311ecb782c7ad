use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use cambio_api::{routes, AppState, Config, Storage};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e).context("no se pudo leer .env");
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    info!("Inicializando la base de datos");
    let storage = Storage::new(&config.database).await;
    let state = AppState::new(Arc::new(storage.clone()), config.admin_token.as_str());
    let app = routes::init(state, config.request_timeout);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("no se pudo escuchar en {addr}"))?;
    info!("Servidor corriendo en http://{addr}");
    info!("Base de datos: MySQL (tipos_cambio)");
    info!("  GET  /api/rates         - tasa actual");
    info!("  POST /api/rates         - guardar nueva tasa");
    info!("  GET  /api/rates/history - historial");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    storage.close().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("No se pudo instalar el manejador de Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };
    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("No se pudo instalar el manejador de SIGTERM: {e}");
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
    info!("Apagando el servidor");
}
