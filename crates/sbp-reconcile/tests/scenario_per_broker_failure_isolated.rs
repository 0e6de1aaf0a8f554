use sbp_config::Settings;
use sbp_reconcile::ReconciliationTask;
use sbp_testkit::{desired_broker_with_services, AccessTarget, FakeBrokerSource, FakePlatform};

const BASE: &str = "https://proxy.example.com/v1/osb";

#[tokio::test]
async fn scenario_create_failure_does_not_stop_later_brokers_or_orphan_deletion() {
    let source = FakeBrokerSource::new();
    source.set_brokers(vec![
        desired_broker_with_services("b1", &["s1"]),
        desired_broker_with_services("b2", &["s2"]),
    ]);
    let platform = FakePlatform::new();
    platform.fail_create_for("sm-proxy-b1");
    platform.add_registered("sm-proxy-old", &format!("{BASE}/old"));
    let task = ReconciliationTask::new(&Settings::new(BASE), source, platform.clone());

    let summary = task.run_pass().await.unwrap();

    // b1 failed, b2 succeeded, the orphan still went away.
    assert_eq!(summary.created, 1);
    assert_eq!(summary.deleted, 1);
    assert_eq!(summary.failures, 1);
    assert_eq!(platform.created().len(), 2);

    let names: Vec<String> = platform.registered().iter().map(|b| b.name.clone()).collect();
    assert_eq!(names, vec!["sm-proxy-b2"]);

    // Access reconciliation only runs for the broker whose create succeeded.
    let calls = platform.access_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].target, AccessTarget::Service("s2".to_string()));
}
