use sbp_config::Settings;
use sbp_reconcile::{PassError, ReconciliationTask};
use sbp_testkit::{desired_broker, FakeBrokerSource, FakePlatform};

const BASE: &str = "https://proxy.example.com/v1/osb";

#[tokio::test]
async fn scenario_platform_listing_failure_aborts_before_source_fetch() {
    let source = FakeBrokerSource::new();
    source.set_brokers(vec![desired_broker("b1")]);
    let platform = FakePlatform::new();
    platform.set_fail_get(true);
    let task = ReconciliationTask::new(&Settings::new(BASE), source.clone(), platform.clone());

    let err = task.run_pass().await.unwrap_err();

    assert!(matches!(err, PassError::PlatformFetch(_)));
    assert_eq!(source.calls(), 0);
    assert!(platform.created().is_empty());
    assert!(platform.deleted().is_empty());
}

#[tokio::test]
async fn scenario_source_listing_failure_aborts_with_no_mutations() {
    let source = FakeBrokerSource::new();
    source.set_failing(true);
    let platform = FakePlatform::new();
    platform.add_registered("sm-proxy-old", &format!("{BASE}/old"));
    let task = ReconciliationTask::new(&Settings::new(BASE), source, platform.clone());

    let err = task.run_pass().await.unwrap_err();

    // The platform listing already happened but had no side effects, so the
    // abort leaves the platform untouched, including the would-be orphan.
    assert!(matches!(err, PassError::SourceFetch(_)));
    assert!(platform.created().is_empty());
    assert!(platform.deleted().is_empty());
    assert_eq!(platform.registered().len(), 1);
}

#[tokio::test]
async fn scenario_run_swallows_pass_failure() {
    let source = FakeBrokerSource::new();
    let platform = FakePlatform::new();
    platform.set_fail_get(true);
    let task = ReconciliationTask::new(&Settings::new(BASE), source, platform);

    // The scheduler entry point logs and returns; it never propagates.
    task.run().await;
}
