//! URL-based correlation between desired and registered brokers.
//!
//! A platform registration is "managed" by this system iff its URL is
//! prefixed by the configured proxy base path; its desired-broker id is the
//! final path segment. This is the sole join key between the two collections
//! (no persisted mapping exists), kept for compatibility with the existing
//! deployment. Any external system writing a similarly-prefixed URL would be
//! misidentified as managed.

/// Recover the desired-broker correlation id from a registered broker's URL.
///
/// Returns `None` for unmanaged registrations (URL does not start with
/// `proxy_base_path`) or when no final path segment exists. Unmanaged
/// registrations must never be touched by reconciliation.
pub fn managed_broker_id<'a>(broker_url: &'a str, proxy_base_path: &str) -> Option<&'a str> {
    if !broker_url.starts_with(proxy_base_path) {
        return None;
    }
    match broker_url.rsplit('/').next() {
        Some(id) if !id.is_empty() => Some(id),
        _ => None,
    }
}

/// Platform registration name for a proxied broker: `<prefix><desired id>`.
pub fn proxy_broker_name(broker_prefix: &str, desired_id: &str) -> String {
    format!("{broker_prefix}{desired_id}")
}

/// Platform registration URL for a proxied broker: `<base>/<desired id>`.
pub fn proxy_broker_url(proxy_base_path: &str, desired_id: &str) -> String {
    format!("{proxy_base_path}/{desired_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://proxy.example.com/v1/osb";

    #[test]
    fn managed_url_yields_final_segment() {
        let url = proxy_broker_url(BASE, "broker-1");
        assert_eq!(managed_broker_id(&url, BASE), Some("broker-1"));
    }

    #[test]
    fn foreign_url_is_unmanaged() {
        assert_eq!(
            managed_broker_id("https://other.example.com/x", BASE),
            None
        );
    }

    #[test]
    fn prefix_match_is_exact_not_host_only() {
        // Same host, different path: not ours.
        assert_eq!(
            managed_broker_id("https://proxy.example.com/v2/osb/broker-1", BASE),
            None
        );
    }

    #[test]
    fn trailing_slash_yields_no_id() {
        let url = format!("{BASE}/broker-1/");
        assert_eq!(managed_broker_id(&url, BASE), None);
    }

    #[test]
    fn name_and_url_round_trip() {
        assert_eq!(proxy_broker_name("sm-proxy-", "b1"), "sm-proxy-b1");
        assert_eq!(
            proxy_broker_url(BASE, "b1"),
            "https://proxy.example.com/v1/osb/b1"
        );
    }
}
