use std::process::ExitCode;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::timeout::TimeoutLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use syncthing_dashboard::collector::Collector;
use syncthing_dashboard::config::Config;
use syncthing_dashboard::demo::DemoCollector;
use syncthing_dashboard::service::{self, SnapshotService};
use syncthing_dashboard::syncthing_client::SyncthingClient;
use syncthing_dashboard::types::DashboardError;
use syncthing_dashboard::web::{self, PageSettings};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "Dashboard exited with an error");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), DashboardError> {
    let config = Config::load().await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        wait_for_signal().await;
        let _ = shutdown_tx.send(true);
    });

    match &config.syncthing {
        Some(upstream) => {
            let client = SyncthingClient::new(upstream)?;
            let collector = Collector::new(Arc::new(client), config.poll_interval);
            serve_with(Arc::new(collector), &config, shutdown_rx).await
        }
        None => {
            info!("SYNCTHING_BASE_URL not set, serving synthetic demo data");
            let demo = DemoCollector::new(config.poll_interval);
            serve_with(Arc::new(demo), &config, shutdown_rx).await
        }
    }
}

async fn serve_with<S: SnapshotService>(
    source: Arc<S>,
    config: &Config,
    shutdown: watch::Receiver<bool>,
) -> Result<(), DashboardError> {
    let addr = config.bind_address()?;
    let listener = TcpListener::bind(addr).await?;

    let poller = service::start(Arc::clone(&source), shutdown.clone()).await;

    let page = PageSettings {
        title: config.page_title.clone(),
        subtitle: config.page_subtitle.clone(),
        poll_interval: config.poll_interval,
    };
    let app = web::router(source, page, &config.web_dir)
        .layer(TimeoutLayer::new(config.request_timeout()));

    info!(%addr, demo = config.demo_mode(), "Dashboard listening");
    web::serve(listener, app, shutdown).await?;

    if let Err(err) = poller.await {
        warn!(error = %err, "Poll loop ended abnormally");
    }
    info!("Dashboard stopped");
    Ok(())
}

async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "Failed to listen for SIGTERM");
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
    info!("Shutdown signal received");
}
