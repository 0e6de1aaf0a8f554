//! sbp-config
//!
//! Settings for the reconciliation core. Loaded from a YAML file by the host
//! process and handed to the task at construction; the core never reads the
//! environment itself.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Fixed name prefix for proxy registrations created on the platform.
pub const DEFAULT_BROKER_PREFIX: &str = "sm-proxy-";

/// Reconciliation settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Prefix for platform registration names: `<prefix><desired id>`.
    #[serde(default = "default_broker_prefix")]
    pub broker_prefix: String,

    /// Base URL under which proxy registrations are addressed. Registrations
    /// whose URL starts with this path are considered managed. Must not end
    /// with a slash; the desired id is appended as the final path segment.
    pub proxy_base_path: String,

    /// Scheduler period between reconciliation passes, seconds. The core
    /// does not schedule itself; the host passes this to its cron layer.
    #[serde(default = "default_resync_period_secs")]
    pub resync_period_secs: u64,

    /// How long shutdown waits for an in-flight pass to drain, seconds.
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
}

fn default_broker_prefix() -> String {
    DEFAULT_BROKER_PREFIX.to_string()
}

fn default_resync_period_secs() -> u64 {
    60
}

fn default_shutdown_timeout_secs() -> u64 {
    5
}

impl Settings {
    pub fn new(proxy_base_path: impl Into<String>) -> Self {
        Self {
            broker_prefix: default_broker_prefix(),
            proxy_base_path: proxy_base_path.into(),
            resync_period_secs: default_resync_period_secs(),
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
        }
    }

    /// Load and validate settings from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading settings file {}", path.display()))?;
        let settings: Settings = serde_yaml::from_str(&raw)
            .with_context(|| format!("parsing settings file {}", path.display()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings that would silently break correlation or naming.
    pub fn validate(&self) -> Result<()> {
        if self.broker_prefix.is_empty() {
            bail!("broker_prefix must not be empty");
        }
        if !self.proxy_base_path.starts_with("http://")
            && !self.proxy_base_path.starts_with("https://")
        {
            bail!(
                "proxy_base_path must be an absolute http(s) URL, got '{}'",
                self.proxy_base_path
            );
        }
        if self.proxy_base_path.ends_with('/') {
            bail!("proxy_base_path must not end with '/'");
        }
        if self.resync_period_secs == 0 {
            bail!("resync_period_secs must be nonzero");
        }
        Ok(())
    }

    pub fn resync_period(&self) -> Duration {
        Duration::from_secs(self.resync_period_secs)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn minimal_yaml_applies_defaults() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "proxy_base_path: https://proxy.example.com/v1/osb").unwrap();
        let s = Settings::from_yaml_file(f.path()).unwrap();
        assert_eq!(s.broker_prefix, DEFAULT_BROKER_PREFIX);
        assert_eq!(s.resync_period_secs, 60);
        assert_eq!(s.shutdown_timeout_secs, 5);
    }

    #[test]
    fn trailing_slash_is_rejected() {
        let s = Settings::new("https://proxy.example.com/v1/osb/");
        assert!(s.validate().is_err());
    }

    #[test]
    fn relative_base_path_is_rejected() {
        let s = Settings::new("/v1/osb");
        assert!(s.validate().is_err());
    }

    #[test]
    fn empty_prefix_is_rejected() {
        let mut s = Settings::new("https://proxy.example.com/v1/osb");
        s.broker_prefix.clear();
        assert!(s.validate().is_err());
    }

    #[test]
    fn valid_settings_pass() {
        let s = Settings::new("https://proxy.example.com/v1/osb");
        assert!(s.validate().is_ok());
        assert_eq!(s.resync_period(), Duration::from_secs(60));
        assert_eq!(s.shutdown_timeout(), Duration::from_secs(5));
    }
}
