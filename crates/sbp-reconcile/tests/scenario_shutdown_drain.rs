use std::time::Duration;

use sbp_config::Settings;
use sbp_reconcile::ReconciliationTask;
use sbp_testkit::{desired_broker_with_services, FakeBrokerSource, FakePlatform};

const BASE: &str = "https://proxy.example.com/v1/osb";

#[tokio::test]
async fn scenario_tracker_drains_once_the_pass_completes() {
    let source = FakeBrokerSource::new();
    source.set_brokers(vec![desired_broker_with_services("b1", &["svc-a"])]);
    let platform = FakePlatform::new();
    let task = ReconciliationTask::new(&Settings::new(BASE), source, platform);

    let tracker = task.tracker();
    task.run().await;

    assert_eq!(tracker.active(), 0);
    assert!(tracker.wait_idle(Duration::from_millis(10)).await);
}
