use anyhow::Result;
use clap::Parser;
use tracing::info;

use gist_drop::config::{Args, Config};
use gist_drop::server::{router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment before clap reads it.
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = Config::from_args(args);
    init_tracing(config.verbose);

    info!(
        remote = %config.publish.remote.url(),
        gist_id = %config.publish.remote.id(),
        owner = %config.publish.owner,
        listen = %config.listen,
        static_dir = %config.static_dir.display(),
        "starting gist-drop"
    );

    let listener = tokio::net::TcpListener::bind(config.listen).await?;
    let app = router(AppState::new(config));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
