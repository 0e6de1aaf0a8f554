use sbp_config::Settings;
use sbp_reconcile::ReconciliationTask;
use sbp_testkit::{desired_broker_with_services, AccessTarget, FakeBrokerSource, FakePlatform};

const BASE: &str = "https://proxy.example.com/v1/osb";

#[tokio::test]
async fn scenario_missing_desired_broker_is_created_with_derived_name_and_url() {
    let source = FakeBrokerSource::new();
    source.set_brokers(vec![desired_broker_with_services("b1", &["svc-a"])]);
    let platform = FakePlatform::new();
    let task = ReconciliationTask::new(&Settings::new(BASE), source, platform.clone());

    let summary = task.run_pass().await.unwrap();

    assert_eq!(summary.created, 1);
    assert_eq!(summary.deleted, 0);
    let created = platform.created();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].name, "sm-proxy-b1");
    assert_eq!(created[0].broker_url, format!("{BASE}/b1"));
}

#[tokio::test]
async fn scenario_created_broker_with_catalog_gets_global_access_reconciliation() {
    let source = FakeBrokerSource::new();
    source.set_brokers(vec![desired_broker_with_services("b1", &["svc-a", "svc-b"])]);
    let platform = FakePlatform::new();
    let task = ReconciliationTask::new(&Settings::new(BASE), source, platform.clone());

    task.run_pass().await.unwrap();

    let calls = platform.access_calls();
    assert_eq!(calls.len(), 2);
    for (call, service) in calls.iter().zip(["svc-a", "svc-b"]) {
        assert_eq!(call.target, AccessTarget::Service(service.to_string()));
        assert!(call.enabled);
        assert_eq!(call.scope_payload, b"{}");
    }
}

#[tokio::test]
async fn scenario_created_broker_without_catalog_skips_access_reconciliation() {
    let source = FakeBrokerSource::new();
    source.set_brokers(vec![sbp_testkit::desired_broker("b1")]);
    let platform = FakePlatform::new();
    let task = ReconciliationTask::new(&Settings::new(BASE), source, platform.clone());

    let summary = task.run_pass().await.unwrap();

    // Missing catalog is logged and skipped, not fatal and not a mutation.
    assert_eq!(summary.created, 1);
    assert!(platform.access_calls().is_empty());
}
