// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::time::Duration;

use planwright_config::PlanwrightConfig;
use planwright_core::PlanError;
use planwright_gateway::{AppState, HistoryLimits};
use tracing::{info, warn};

use crate::app::App;

/// Runs the `planwright serve` command until Ctrl+C or SIGTERM.
pub async fn run_serve(config: PlanwrightConfig) -> Result<(), PlanError> {
    crate::init_tracing(&config.server.log_level);
    info!("starting planwright serve");

    let app = App::open(&config).await?;
    let state = AppState {
        generator: app.generator.clone(),
        templates: app.templates.clone(),
        tickets: app.storage.clone(),
        history: app.storage.clone(),
        credentials: app.credentials.clone(),
        limits: HistoryLimits {
            default: config.generation.history_list_default,
            max: config.generation.history_list_max,
        },
        sync_timeout: Duration::from_secs(config.server.sync_timeout_secs),
    };

    let served = planwright_gateway::serve(
        &config.server.host,
        config.server.port,
        state,
        shutdown_signal(),
    )
    .await;

    if let Err(e) = app.db.close().await {
        warn!(error = %e, "database close failed");
    }
    info!("planwright serve shutdown complete");
    served
}

/// Resolves on SIGINT (Ctrl+C) or, on unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("received SIGINT (Ctrl+C), initiating shutdown"),
                    _ = sigterm.recv() => info!("received SIGTERM, initiating shutdown"),
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                ctrl_c.await;
                info!("received SIGINT (Ctrl+C), initiating shutdown");
            }
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await;
        info!("received Ctrl+C, initiating shutdown");
    }
}
