// tests/health_rollup_tests.rs
use service_health::health::{DescriptionKey, Subject};
use service_health::{
    Catalog, Describe, Evaluator, HealthState, InstanceDescriptor, ServiceDescriptor,
    ServiceSource, StaticSource, Status, StatusCache, StatusPoller, StatusRollup,
};
use std::sync::Arc;

fn engine_with(catalog: Catalog) -> (Arc<StatusCache>, Evaluator) {
    let describer: Arc<dyn Describe> = Arc::new(catalog);
    let cache = Arc::new(StatusCache::new(describer.clone()));
    (cache.clone(), Evaluator::new(describer, cache))
}

fn engine() -> (Arc<StatusCache>, Evaluator) {
    engine_with(Catalog::new())
}

fn fleet() -> Vec<ServiceDescriptor> {
    vec![
        ServiceDescriptor::new("web", "frontend")
            .with_desired_state(1)
            .with_instance(
                InstanceDescriptor::new("0")
                    .with_check("ready", "passed")
                    .with_check("alive", "passed"),
            )
            .with_instance(
                InstanceDescriptor::new("1")
                    .with_check("ready", "passed")
                    .with_check("alive", "failed"),
            ),
        ServiceDescriptor::new("db", "postgres")
            .with_desired_state(1)
            .with_instance(InstanceDescriptor::new("0").with_check("ready", "not_running")),
        ServiceDescriptor::new("queue", "rabbit")
            .with_emergency_shutdown(true)
            .with_instance(InstanceDescriptor::new("0").with_check("ready", "passed")),
    ]
}

#[test]
fn test_rollup_total_is_sum_of_counters() {
    let inputs = [
        "passed", "failed", "timeout", "garbage", "not_running", "unknown",
        "emergency_shutdown", "passed", "",
    ];
    let mut rollup = StatusRollup::new();
    for raw in inputs {
        rollup.increment_raw(raw);
        let sum: u32 = HealthState::ROLLUP.iter().map(|s| rollup.count(*s)).sum();
        assert_eq!(rollup.total(), sum);
    }
    assert_eq!(rollup.total(), 5);
}

#[test]
fn test_empty_rollup_asymmetry() {
    let rollup = StatusRollup::new();
    assert!(!rollup.all_ok());
    assert!(!rollup.all_failed());
    assert!(!rollup.all_unknown());
    assert!(rollup.all_not_running());
}

#[test]
fn test_emergency_shutdown_wins_over_all_passed() {
    let subject = Subject {
        id: "queue".to_string(),
        name: "rabbit".to_string(),
        desired_state: 1,
        emergency_shutdown: true,
    };
    let checks = [("ready".to_string(), "passed".to_string())].into_iter().collect();
    let status = Status::from_health_checks(subject, &checks, &Catalog::new());

    assert!(status.rollup.all_ok());
    assert_eq!(status.status, HealthState::EmergencyShutdown);
}

#[test]
fn test_update_rolls_up_fleet() {
    let (_, evaluator) = engine();
    let evaluation = evaluator.update(&fleet());

    let state = |id: &str| evaluation.get(id).unwrap().status;
    assert_eq!(state("web.0"), HealthState::Passed);
    assert_eq!(state("web.1"), HealthState::Unknown);
    assert_eq!(state("web"), HealthState::Unknown);
    assert_eq!(state("db.0"), HealthState::NotRunning);
    assert_eq!(state("db"), HealthState::NotRunning);
    assert_eq!(state("queue.0"), HealthState::EmergencyShutdown);
    assert_eq!(state("queue"), HealthState::EmergencyShutdown);
    assert_eq!(evaluation.len(), 7);

    for (id, status) in evaluation.iter() {
        assert_eq!(id, &status.id);
        assert!(!status.description.is_empty());
    }
}

#[test]
fn test_service_with_one_passed_and_one_failed_instance_is_unknown() {
    let (_, evaluator) = engine();
    let service = ServiceDescriptor::new("api", "api");
    let status = evaluator.evaluate(
        &service,
        &[
            InstanceDescriptor::new("0").with_check("ready", "passed"),
            InstanceDescriptor::new("1").with_check("ready", "failed"),
        ],
    );
    assert_eq!(status.status, HealthState::Unknown);
    assert_eq!(status.rollup.count(HealthState::Passed), 1);
    assert_eq!(status.rollup.count(HealthState::Failed), 1);
}

// An empty service resolves through the vacuous all_not_running branch.
#[test]
fn test_service_without_instances_is_not_running() {
    let (_, evaluator) = engine();
    let status = evaluator.evaluate(&ServiceDescriptor::new("idle", "idle"), &[]);

    assert_eq!(status.rollup.total(), 0);
    assert_eq!(status.status, HealthState::NotRunning);
    assert_eq!(status.description, "container down");
}

#[test]
fn test_instance_statuses_match_map_after_update() {
    let (_, evaluator) = engine();
    let services = fleet();
    let evaluation = evaluator.update(&services);

    for service in &services {
        let service_status = evaluation.get(&service.id).unwrap();
        assert_eq!(service_status.instances().len(), service.instances.len());

        for (instance, child) in service.instances.iter().zip(service_status.instances()) {
            let by_id = evaluation
                .instance_status(&service.id, &instance.instance_id)
                .unwrap();
            assert!(Arc::ptr_eq(by_id, child));
            assert_eq!(by_id.name, format!("{} {}", service.name, instance.instance_id));
        }
    }
}

#[test]
fn test_get_unknown_id_is_not_cached() {
    let (cache, evaluator) = engine();
    evaluator.update(&fleet());

    let first = cache.get("never.seen");
    let second = cache.get("never.seen");

    assert_eq!(first.status, HealthState::Unknown);
    assert!(!Arc::ptr_eq(&first, &second));
    assert!(!cache.contains("never.seen"));
}

#[test]
fn test_second_update_drops_stale_ids() {
    let (cache, evaluator) = engine();
    evaluator.update(&fleet());
    assert!(cache.contains("queue.0"));

    let remaining: Vec<_> = fleet().into_iter().take(1).collect();
    evaluator.update(&remaining);

    assert!(cache.contains("web.1"));
    assert!(!cache.contains("queue"));
    assert!(!cache.contains("queue.0"));
    assert_eq!(cache.snapshot().len(), 3);
}

#[test]
fn test_descriptions_use_catalog() {
    let mut catalog = Catalog::new();
    catalog.set(DescriptionKey::EmergencyShutdown, "arrêt d'urgence");
    let (cache, evaluator) = engine_with(catalog);
    evaluator.update(&fleet());

    assert_eq!(cache.get("queue").description, "arrêt d'urgence");
    assert_eq!(cache.get("web.0").description, "passing health checks");
}

#[tokio::test]
async fn test_poller_feeds_cache() {
    let (cache, evaluator) = engine();
    let source = Arc::new(StaticSource::new(fleet()));
    assert_eq!(source.fetch().await.unwrap().len(), 3);

    let poller = StatusPoller::new(Default::default(), source, Arc::new(evaluator), None);
    poller.refresh_once().await.unwrap();

    assert_eq!(cache.get("db").status, HealthState::NotRunning);
    assert_eq!(cache.generation(), 1);
}

#[tokio::test]
async fn test_demo_snapshot_evaluates() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/services.yaml");
    let services = service_health::FileSource::new(path).fetch().await.unwrap();

    let (cache, evaluator) = engine();
    evaluator.update(&services);

    assert_eq!(cache.get("web").status, HealthState::Unknown);
    assert_eq!(cache.get("db").status, HealthState::NotRunning);
    assert_eq!(cache.get("queue").status, HealthState::EmergencyShutdown);
}
