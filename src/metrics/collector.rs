// src/metrics/collector.rs
use crate::health::{Evaluation, HealthState, StatusKind};
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntGauge, IntGaugeVec, Opts, Registry,
    TextEncoder,
};
use std::sync::Arc;
use std::time::Instant;
use anyhow::Result;

pub struct MetricsRegistry {
    registry: Registry,
    collector: Arc<MetricsCollector>,
}

impl MetricsRegistry {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let collector = Arc::new(MetricsCollector::new(&registry)?);

        Ok(Self {
            registry,
            collector,
        })
    }

    pub fn collector(&self) -> Arc<MetricsCollector> {
        self.collector.clone()
    }

    pub fn gather(&self) -> Result<Vec<u8>> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(buffer)
    }
}

pub struct MetricsCollector {
    // Evaluation metrics
    pub evaluations_total: IntCounter,
    pub evaluation_duration_seconds: Histogram,
    pub last_generation: IntGauge,

    // Status metrics
    pub statuses: IntGaugeVec,
    pub service_status: IntGaugeVec,

    // Source metrics
    pub source_errors_total: IntCounter,
}

impl MetricsCollector {
    pub fn new(registry: &Registry) -> Result<Self> {
        let evaluations_total = IntCounter::new(
            "health_evaluations_total",
            "Total number of full evaluation passes",
        )?;
        registry.register(Box::new(evaluations_total.clone()))?;

        let evaluation_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "health_evaluation_duration_seconds",
            "Time spent fetching and evaluating one pass",
        ))?;
        registry.register(Box::new(evaluation_duration_seconds.clone()))?;

        let last_generation = IntGauge::new(
            "health_last_generation",
            "Generation of the most recently published evaluation",
        )?;
        registry.register(Box::new(last_generation.clone()))?;

        let statuses = IntGaugeVec::new(
            Opts::new(
                "health_statuses",
                "Number of evaluated entities by kind and final state",
            ),
            &["kind", "state"],
        )?;
        registry.register(Box::new(statuses.clone()))?;

        let service_status = IntGaugeVec::new(
            Opts::new(
                "health_service_status",
                "Current state of each service (1 for the active state)",
            ),
            &["service", "state"],
        )?;
        registry.register(Box::new(service_status.clone()))?;

        let source_errors_total = IntCounter::new(
            "health_source_errors_total",
            "Total failed fetches from the service source",
        )?;
        registry.register(Box::new(source_errors_total.clone()))?;

        Ok(Self {
            evaluations_total,
            evaluation_duration_seconds,
            last_generation,
            statuses,
            service_status,
            source_errors_total,
        })
    }

    pub fn record_evaluation(&self, evaluation: &Evaluation, duration: std::time::Duration) {
        self.evaluations_total.inc();
        self.evaluation_duration_seconds
            .observe(duration.as_secs_f64());
        self.last_generation.set(evaluation.generation() as i64);

        // Label sets from services that disappeared must not linger.
        self.statuses.reset();
        self.service_status.reset();

        for kind in ["service", "instance"] {
            for state in HealthState::ALL {
                self.statuses
                    .with_label_values(&[kind, state.as_str()])
                    .set(0);
            }
        }

        for (_, status) in evaluation.iter() {
            let kind = match status.kind {
                StatusKind::Service { .. } => "service",
                StatusKind::Instance { .. } => "instance",
                StatusKind::Placeholder => continue,
            };
            self.statuses
                .with_label_values(&[kind, status.status.as_str()])
                .inc();
        }

        for service in evaluation.services() {
            self.service_status
                .with_label_values(&[service.id.as_str(), service.status.as_str()])
                .set(1);
        }
    }

    pub fn record_source_error(&self) {
        self.source_errors_total.inc();
    }
}

// Helper for timing operations
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }
}
