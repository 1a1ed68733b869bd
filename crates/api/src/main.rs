use frostpage_api::{audit, build_app, config::AppConfig, state::AppState};
use frostpage_core::auth::hash_password;
use frostpage_core::events::EventBus;
use frostpage_core::site_config::SiteConfigHandle;
use frostpage_core::Site;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // `frostpage-api hash-password` turns a password on stdin into a PHC
    // string for `admin.password` in the site config.
    if std::env::args().nth(1).as_deref() == Some("hash-password") {
        return print_password_hash();
    }

    // Load .env file if present (dev convenience)
    let _ = dotenvy::dotenv();

    let config = AppConfig::from_env()
        .map_err(|e| anyhow::anyhow!("Failed to load config: {e}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    tracing::info!("Starting FrostPage API server");

    let events = EventBus::new(config.event_bus_capacity);
    let _audit = audit::spawn_audit_log(&events);

    let site = Site::open(&config.data_dir, config.storage_recovery, events)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to prepare data directory: {e}"))?;
    tracing::info!(data_dir = %config.data_dir.display(), "Data directory ready");

    // Repair any draft/published disagreement left by an interrupted write.
    site.content.reconcile_all().await?;

    let site_config = SiteConfigHandle::load(site.layout.site_config_path())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load site config: {e}"))?;

    let state = AppState::new(config.clone(), site, site_config);
    let app = build_app(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

fn print_password_hash() -> anyhow::Result<()> {
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        anyhow::bail!("expected a password on stdin");
    }
    println!("{}", hash_password(password)?);
    Ok(())
}

/// Wait for SIGINT (Ctrl+C) or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
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
        _ = ctrl_c => { tracing::info!("Received Ctrl+C, shutting down..."); }
        _ = terminate => { tracing::info!("Received SIGTERM, shutting down..."); }
    }
}
