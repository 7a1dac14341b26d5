use std::process::ExitCode;

use cogplay_backend::config::{Config, LogConfig};
use cogplay_backend::logging;
use cogplay_backend::state::AppState;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let log = LogConfig::from_env();
    let _log_guards = logging::init_tracing(&log);
    let config = Config::with_log(log);
    let adaptive = &config.adaptive;

    let adaptation = match AppState::create_adaptation_service(adaptive.clone()) {
        Ok(service) => service,
        Err(e) => {
            tracing::error!(error = %e, "invalid adaptive engine configuration");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(
        strategy = ?adaptive.strategy,
        history_window = adaptive.history_window,
        tolerance = adaptive.tolerance,
        escalate_above = adaptive.escalate_above,
        deescalate_below = adaptive.deescalate_below,
        decision_log = config.log.decision_log,
        "adaptive engine ready"
    );

    let app = cogplay_backend::app_with_state(AppState::new(adaptation));

    let addr = config.bind_addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "failed to bind listener");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(%addr, "cogplay-backend listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server error");
        return ExitCode::FAILURE;
    }

    tracing::info!("graceful shutdown complete");
    ExitCode::SUCCESS
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
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
}
