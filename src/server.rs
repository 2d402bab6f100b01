//! Reusable parking service runtime.
//!
//! [`ServerHandle`] owns the whole lifecycle: metrics recorder, lot
//! construction from config, receipt sink, event bus, REST API and graceful
//! shutdown. The `parking-service` binary and the `parking-cli` launcher both
//! start the service through it.

use std::sync::{Arc, OnceLock};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::{error, info};

use crate::application::{create_event_bus, ParkingLot, ParkingService, ReceiptSink};
use crate::config::{AppConfig, ReceiptSinkKind};
use crate::infrastructure::{
    FileReceiptSink, InMemoryReceiptSink, ShutdownCoordinator, ShutdownSignal, SystemClock,
};
use crate::interfaces::http::{create_api_router, RouterDeps};

// ── Metrics recorder ───────────────────────────────────────────────

// The global recorder can only be installed once per process; a restart
// within the same process reuses it.
static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn prometheus_handle() -> Result<PrometheusHandle, Box<dyn std::error::Error>> {
    if let Some(handle) = PROM_HANDLE.get() {
        return Ok(handle.clone());
    }
    let handle = PrometheusBuilder::new().install_recorder()?;
    info!("Prometheus metrics recorder installed");
    Ok(PROM_HANDLE.get_or_init(|| handle).clone())
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running parking service.
///
/// # Examples
///
/// ```rust,no_run
/// use smart_parking::config::AppConfig;
/// use smart_parking::server::ServerHandle;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(AppConfig::default()).await?;
///     // ... wait for shutdown signal ...
///     handle.shutdown().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    /// Parking operations, shared with the HTTP layer
    pub service: Arc<ParkingService>,
    /// The configuration the server was started with
    pub config: AppConfig,
    /// Port the API is actually bound to (differs from config when it was 0)
    pub port: u16,

    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Build the lot from `config`, bind the API and start serving.
    pub async fn start(config: AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        info!("Starting smart parking service...");

        let prometheus = prometheus_handle()?;

        // ── Parking lot ────────────────────────────────────────
        let lot = ParkingLot::new(config.to_layout()?)?;
        for area in lot.table().areas() {
            info!(area = %area.code(), capacity = area.capacity(), "Area configured");
        }

        let receipts: Arc<dyn ReceiptSink> = match config.receipts.sink {
            ReceiptSinkKind::File => {
                info!(
                    directory = %config.receipts.directory.display(),
                    "Receipts written to files"
                );
                Arc::new(
                    FileReceiptSink::new(&config.receipts.directory)
                        .with_title(config.receipts.title.clone()),
                )
            }
            ReceiptSinkKind::Memory => {
                info!("Receipts kept in memory");
                Arc::new(InMemoryReceiptSink::new())
            }
        };

        let event_bus = create_event_bus();
        let service = Arc::new(ParkingService::new(
            lot,
            Arc::new(SystemClock),
            receipts,
            event_bus,
        ));

        // ── Shutdown coordinator ───────────────────────────────
        let shutdown = ShutdownCoordinator::new(config.server.shutdown_timeout);

        // ── REST API server ────────────────────────────────────
        let router = create_api_router(RouterDeps {
            service: service.clone(),
            prometheus,
        });

        let listener = tokio::net::TcpListener::bind(config.server.address()).await?;
        let local = listener.local_addr()?;
        info!("REST API listening on http://{}", local);
        info!("Swagger UI available at http://{}/docs/", local);

        let api_shutdown = shutdown.signal();
        let api_server = axum::serve(listener, router).with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("REST API server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!(error = %e, "REST API server error");
            }
        });

        Ok(Self {
            service,
            config,
            port: local.port(),
            shutdown,
            api_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    /// Send the shutdown signal without waiting.
    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for the API to drain after shutdown has been triggered, bounded
    /// by `server.shutdown_timeout`.
    pub async fn wait(self) {
        let Self {
            shutdown, api_task, ..
        } = self;

        let completed = shutdown
            .shutdown_with_cleanup(|| async move {
                match api_task.await {
                    Ok(()) => info!("REST API server stopped"),
                    Err(e) => error!(error = %e, "REST API server task panicked"),
                }
            })
            .await;

        if completed {
            info!("Smart parking shutdown complete");
        } else {
            error!("Shutdown timed out, in-flight requests were dropped");
        }
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("Shutting down smart parking service...");
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

/// Initialize tracing from the logging config. `RUST_LOG` wins over the
/// configured level.
///
/// Call this once at process startup, before [`ServerHandle::start`].
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match config.logging.format.to_lowercase().as_str() {
        "json" => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        _ => registry.with(tracing_subscriber::fmt::layer()).try_init(),
    };

    if let Err(e) = result {
        eprintln!("tracing already initialized: {}", e);
    }
}

// ── Tests ──────────────────────────────────────────────────────────
