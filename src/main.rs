// src/main.rs
use anyhow::Result;
use hyper::{Body, Request, Response, Server, StatusCode};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

use service_health::{
    health::{Describe, Evaluator, StatusCache},
    metrics::MetricsRegistry,
    refresh::StatusPoller,
    server::{RequestHandler, ServerBuilder},
    source::FileSource,
    load_config,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("service_health=debug".parse()?)
                .add_directive("hyper=info".parse()?),
        )
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.yaml".to_string());

    info!("Loading configuration from: {}", config_path);
    let config = load_config(&config_path).await?;

    // Initialize metrics
    let metrics_registry = MetricsRegistry::new()?;
    let metrics = metrics_registry.collector();

    // Evaluation engine and its cache
    let describer: Arc<dyn Describe> = Arc::new(config.catalog());
    let cache = Arc::new(StatusCache::new(describer.clone()));
    let evaluator = Arc::new(Evaluator::new(describer, cache.clone()));

    // Periodic refresh from the snapshot file
    let source = Arc::new(FileSource::new(&config.source.path));
    let poller = Arc::new(StatusPoller::new(
        config.refresh.clone(),
        source,
        evaluator,
        Some(metrics),
    ));
    let poller_task = tokio::spawn(poller.clone().start());

    // Start metrics server if enabled
    if config.metrics.enabled {
        let metrics_addr: SocketAddr = ([0, 0, 0, 0], config.metrics.port).into();
        start_metrics_server(metrics_addr, metrics_registry, config.metrics.path.clone()).await?;
    }

    // Start status API
    let addr: SocketAddr = config.server.bind.parse()?;
    ServerBuilder::new(addr)
        .with_handler(RequestHandler::new(cache))
        .bind()
        .await?
        .serve_until(shutdown_signal())
        .await?;

    poller.shutdown();
    if let Err(e) = poller_task.await {
        error!("Status poller task failed: {}", e);
    }

    Ok(())
}

async fn start_metrics_server(
    addr: SocketAddr,
    registry: MetricsRegistry,
    path: String,
) -> Result<()> {
    let registry = Arc::new(registry);
    let metrics_path = Arc::new(path);
    let service_path = metrics_path.clone();

    let make_service = hyper::service::make_service_fn(move |_| {
        let registry = registry.clone();
        let path = service_path.clone();

        async move {
            Ok::<_, Infallible>(hyper::service::service_fn(move |req: Request<Body>| {
                let registry = registry.clone();
                let path = path.clone();

                async move {
                    let mut response = if req.uri().path() != path.as_str() {
                        let mut response = Response::new(Body::from("Not Found"));
                        *response.status_mut() = StatusCode::NOT_FOUND;
                        response
                    } else {
                        match registry.gather() {
                            Ok(metrics) => Response::new(Body::from(metrics)),
                            Err(e) => {
                                error!("Failed to encode metrics: {}", e);
                                let mut response = Response::new(Body::empty());
                                *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
                                response
                            }
                        }
                    };
                    if response.status() == StatusCode::OK {
                        response.headers_mut().insert(
                            hyper::header::CONTENT_TYPE,
                            hyper::header::HeaderValue::from_static("text/plain; version=0.0.4"),
                        );
                    }
                    Ok::<_, Infallible>(response)
                }
            }))
        }
    });

    let server = Server::try_bind(&addr)?.serve(make_service);

    info!(
        "Metrics server listening on http://{}{}",
        addr,
        metrics_path.as_str()
    );

    tokio::spawn(async move {
        if let Err(e) = server.await {
            error!("Metrics server error: {}", e);
        }
    });

    Ok(())
}

// Graceful shutdown handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
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
