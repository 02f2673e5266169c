// src/refresh/poller.rs
use crate::config::RefreshConfig;
use crate::health::{Evaluation, Evaluator, HealthState};
use crate::metrics::{MetricsCollector, Timer};
use crate::source::{ServiceSource, SourceError};
use std::sync::Arc;
use tokio::time::interval;
use tracing::{error, info, warn};

/// Periodically pulls the service list and re-evaluates it.
pub struct StatusPoller {
    config: RefreshConfig,
    source: Arc<dyn ServiceSource>,
    evaluator: Arc<Evaluator>,
    metrics: Option<Arc<MetricsCollector>>,
    shutdown_tx: tokio::sync::watch::Sender<bool>,
    shutdown_rx: tokio::sync::watch::Receiver<bool>,
}

impl StatusPoller {
    pub fn new(
        config: RefreshConfig,
        source: Arc<dyn ServiceSource>,
        evaluator: Arc<Evaluator>,
        metrics: Option<Arc<MetricsCollector>>,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

        Self {
            config,
            source,
            evaluator,
            metrics,
            shutdown_tx,
            shutdown_rx,
        }
    }

    pub async fn start(self: Arc<Self>) {
        let mut interval = interval(self.config.interval());
        let mut shutdown_rx = self.shutdown_rx.clone();

        info!(
            "Starting status refresh from {} source with interval: {:?}",
            self.source.name(),
            self.config.interval()
        );

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = self.refresh_once().await {
                        error!("Status refresh failed, keeping previous snapshot: {}", e);
                    }
                }
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        info!("Status poller shutting down");
                        break;
                    }
                }
            }
        }
    }

    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Fetch, evaluate and publish one pass. On a source error the cache is
    /// left untouched.
    pub async fn refresh_once(&self) -> Result<Arc<Evaluation>, SourceError> {
        let timer = Timer::new();

        let services = match self.source.fetch().await {
            Ok(services) => services,
            Err(e) => {
                if let Some(metrics) = &self.metrics {
                    metrics.record_source_error();
                }
                return Err(e);
            }
        };

        let evaluation = self.evaluator.update(&services);

        if let Some(metrics) = &self.metrics {
            metrics.record_evaluation(&evaluation, timer.elapsed());
        }

        let tally = evaluation.tally();
        let count = |state: HealthState| tally.get(&state).copied().unwrap_or(0);
        let unhealthy = count(HealthState::Failed) + count(HealthState::EmergencyShutdown);

        if unhealthy > 0 {
            warn!(
                "Status refresh complete: {} passed, {} failed, {} not running, {} unknown, {} emergency shutdown",
                count(HealthState::Passed),
                count(HealthState::Failed),
                count(HealthState::NotRunning),
                count(HealthState::Unknown),
                count(HealthState::EmergencyShutdown)
            );
        } else {
            info!(
                "Status refresh complete: {} passed, {} not running, {} unknown",
                count(HealthState::Passed),
                count(HealthState::NotRunning),
                count(HealthState::Unknown)
            );
        }

        Ok(evaluation)
    }
}
