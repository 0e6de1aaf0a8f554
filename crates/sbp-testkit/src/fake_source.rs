//! Recording fake for the registry-side broker source.

use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use async_trait::async_trait;

use sbp_platform::BrokerSource;
use sbp_schemas::DesiredBroker;

#[derive(Default)]
struct Inner {
    brokers: Vec<DesiredBroker>,
    fail: bool,
    calls: usize,
}

/// In-memory broker source. Clones share state, so a test keeps one handle
/// for assertions and hands another to the task.
#[derive(Clone, Default)]
pub struct FakeBrokerSource {
    inner: Arc<Mutex<Inner>>,
}

impl FakeBrokerSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_brokers(&self, brokers: Vec<DesiredBroker>) {
        self.inner.lock().unwrap().brokers = brokers;
    }

    /// Make every subsequent `get_brokers` call fail.
    pub fn set_failing(&self, fail: bool) {
        self.inner.lock().unwrap().fail = fail;
    }

    /// Number of `get_brokers` calls observed.
    pub fn calls(&self) -> usize {
        self.inner.lock().unwrap().calls
    }
}

#[async_trait]
impl BrokerSource for FakeBrokerSource {
    async fn get_brokers(&self) -> Result<Vec<DesiredBroker>> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls += 1;
        if inner.fail {
            bail!("broker source unavailable");
        }
        Ok(inner.brokers.clone())
    }
}
