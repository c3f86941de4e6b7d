use anyhow::Result;
use fleetpulse::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize};
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;

    let prefs_path = app_config.preferences.path.clone();
    let first_run = !std::path::Path::new(&prefs_path).exists();
    let preferences = prefs::Preferences::load(&prefs_path)?;
    if first_run {
        preferences.save(&prefs_path)?;
        tracing::info!(path = %prefs_path, "wrote default preferences");
    }

    let (tx, _) =
        broadcast::channel::<models::NodeReport>(app_config.polling.broadcast_capacity);

    let store = Arc::new(
        store::SnapshotStore::connect(
            &app_config.database.path,
            app_config.database.retention_days,
        )
        .await?,
    );
    store.init().await?;

    let slots = Arc::new(poller::FleetSlots::new());
    let ws_fleet_connections = Arc::new(AtomicUsize::new(0));
    let reports_published_total = Arc::new(AtomicU64::new(0));
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let poller_handle = poller::spawn(
        poller::PollerDeps {
            store: store.clone(),
            slots: slots.clone(),
            tx: tx.clone(),
            watchlist: preferences.watchlist.clone(),
            ws_fleet_connections: ws_fleet_connections.clone(),
            reports_published_total: reports_published_total.clone(),
            shutdown_rx,
        },
        poller::PollerConfig {
            poll_interval_secs: app_config.polling.poll_interval_secs,
            stats_log_interval_secs: app_config.polling.stats_log_interval_secs,
        },
    );

    let _maintenance_handle = maintenance::spawn(
        store.clone(),
        maintenance::MaintenanceConfig {
            prune_interval_secs: app_config.maintenance.prune_interval_secs,
            vacuum_schedule: app_config.maintenance.vacuum_schedule.clone(),
            vacuum_interval_secs: app_config.maintenance.vacuum_interval_secs,
        },
    );

    let app = routes::app(tx, store, slots, ws_fleet_connections);
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    let in_container = std::path::Path::new("/.dockerenv").exists()
        || std::env::var("CONTAINER").as_deref() == Ok("1");

    if in_container {
        // In Docker: run server until error or SIGTERM (no signal handler; avoids immediate exit)
        axum::serve(listener, app).await?;
    } else {
        tokio::select! {
            result = axum::serve(listener, app) => {
                result?;
            }
            _ = async {
                #[cfg(unix)]
                {
                    let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                        Ok(s) => s,
                        Err(_) => {
                            let _ = tokio::signal::ctrl_c().await;
                            return;
                        }
                    };
                    tokio::select! {
                        _ = tokio::signal::ctrl_c() => {}
                        _ = sigterm.recv() => {}
                    }
                }
                #[cfg(not(unix))]
                {
                    tokio::signal::ctrl_c().await
                }
            } => {
                tracing::info!("Received shutdown signal");
                let _ = shutdown_tx.send(());
                let _ = poller_handle.await;
                preferences.save(&prefs_path)?;
            }
        }
    }

    Ok(())
}
