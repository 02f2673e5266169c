// src/health/evaluator.rs
use super::cache::StatusCache;
use super::describe::Describe;
use super::descriptor::{instance_key, InstanceDescriptor, ServiceDescriptor};
use super::state::HealthState;
use super::status::{Status, Subject};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Output of one full `update` pass.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    generation: u64,
    evaluated_at: DateTime<Utc>,
    #[serde(skip)]
    statuses: IndexMap<String, Arc<Status>>,
    services: Vec<Arc<Status>>,
}

impl Evaluation {
    pub fn empty() -> Self {
        Self {
            generation: 0,
            evaluated_at: Utc::now(),
            statuses: IndexMap::new(),
            services: Vec::new(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn evaluated_at(&self) -> DateTime<Utc> {
        self.evaluated_at
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Status>> {
        self.statuses.get(id)
    }

    pub fn instance_status(&self, service_id: &str, instance_id: &str) -> Option<&Arc<Status>> {
        self.statuses.get(&instance_key(service_id, instance_id))
    }

    /// Service statuses in input order, each carrying its instances.
    pub fn services(&self) -> &[Arc<Status>] {
        &self.services
    }

    /// Every service and instance status keyed by id.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Arc<Status>)> {
        self.statuses.iter()
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    /// How many entries ended up in each final state.
    pub fn tally(&self) -> HashMap<HealthState, usize> {
        let mut tally = HashMap::new();
        for status in self.statuses.values() {
            *tally.entry(status.status).or_insert(0) += 1;
        }
        tally
    }
}

impl Default for Evaluation {
    fn default() -> Self {
        Self::empty()
    }
}

/// Builds status trees from service descriptors.
pub struct Evaluator {
    describer: Arc<dyn Describe>,
    cache: Arc<StatusCache>,
}

impl Evaluator {
    pub fn new(describer: Arc<dyn Describe>, cache: Arc<StatusCache>) -> Self {
        Self { describer, cache }
    }

    pub fn cache(&self) -> &Arc<StatusCache> {
        &self.cache
    }

    /// Evaluate every service and publish the result, replacing whatever the
    /// cache held before. If a concurrent pass with a later generation has
    /// already been published, this one is returned but not published.
    pub fn update(&self, services: &[ServiceDescriptor]) -> Arc<Evaluation> {
        let generation = self.cache.next_generation();
        let mut statuses = IndexMap::new();
        let mut roots = Vec::with_capacity(services.len());

        for service in services {
            let service_status = self.build_service(service, &service.instances);

            for instance in service_status.instances() {
                insert_unique(&mut statuses, instance.clone());
            }
            insert_unique(&mut statuses, service_status.clone());
            roots.push(service_status);
        }

        let evaluation = Arc::new(Evaluation {
            generation,
            evaluated_at: Utc::now(),
            statuses,
            services: roots,
        });

        if !self.cache.publish(evaluation.clone()) {
            debug!("Generation {} superseded before publish", generation);
        }

        info!(
            "Evaluated {} services ({} statuses), generation {}",
            evaluation.services.len(),
            evaluation.len(),
            generation
        );

        evaluation
    }

    /// Evaluate a single service against `instances` without touching the
    /// cache. `service.instances` is not consulted.
    pub fn evaluate(&self, service: &ServiceDescriptor, instances: &[InstanceDescriptor]) -> Status {
        let status = self.build_service(service, instances);
        Arc::try_unwrap(status).unwrap_or_else(|shared| (*shared).clone())
    }

    fn build_service(
        &self,
        service: &ServiceDescriptor,
        instances: &[InstanceDescriptor],
    ) -> Arc<Status> {
        let describer = self.describer.as_ref();

        let children: Vec<Arc<Status>> = instances
            .iter()
            .map(|instance| {
                let subject = Subject {
                    id: instance_key(&service.id, &instance.instance_id),
                    name: format!("{} {}", service.name, instance.instance_id),
                    desired_state: service.desired_state,
                    emergency_shutdown: service.emergency_shutdown,
                };
                let status = Status::from_health_checks(subject, &instance.health_checks, describer);
                debug!(id = %status.id, status = %status.status, "instance evaluated");
                Arc::new(status)
            })
            .collect();

        let subject = Subject {
            id: service.id.clone(),
            name: service.name.clone(),
            desired_state: service.desired_state,
            emergency_shutdown: service.emergency_shutdown,
        };
        let status = Status::from_children(subject, children, describer);
        debug!(id = %status.id, status = %status.status, "service evaluated");

        Arc::new(status)
    }
}

fn insert_unique(statuses: &mut IndexMap<String, Arc<Status>>, status: Arc<Status>) {
    if let Some(previous) = statuses.insert(status.id.clone(), status) {
        warn!("Duplicate status id {}, keeping the later entry", previous.id);
    }
}
