//! Access-scope payload parsing.
//!
//! The scope travels as an opaque JSON blob. The only recognized field is
//! `org_guid`; everything else is ignored. `{}` (or an empty payload) means
//! "apply the policy globally, across all organizations".

use serde::Deserialize;

/// Parsed scope of an access decision.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccessScope {
    /// Apply uniformly, not limited to one organization.
    Global,
    /// Apply only to the named organization.
    Organization(String),
}

#[derive(Deserialize)]
struct RawScope {
    #[serde(default)]
    org_guid: Option<String>,
}

impl AccessScope {
    /// Parse a scope payload. Malformed JSON is an error and the caller must
    /// not attempt any mutation.
    pub fn parse(payload: &[u8]) -> Result<Self, serde_json::Error> {
        if payload.is_empty() {
            return Ok(Self::Global);
        }
        let raw: RawScope = serde_json::from_slice(payload)?;
        Ok(match raw.org_guid {
            Some(org) if !org.is_empty() => Self::Organization(org),
            _ => Self::Global,
        })
    }

    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_global() {
        assert_eq!(AccessScope::parse(b"{}").unwrap(), AccessScope::Global);
    }

    #[test]
    fn empty_payload_is_global() {
        assert!(AccessScope::parse(b"").unwrap().is_global());
    }

    #[test]
    fn org_guid_field_scopes_to_org() {
        let scope = AccessScope::parse(br#"{"org_guid":"org-1"}"#).unwrap();
        assert_eq!(scope, AccessScope::Organization("org-1".to_string()));
    }

    #[test]
    fn empty_org_guid_is_global() {
        assert_eq!(
            AccessScope::parse(br#"{"org_guid":""}"#).unwrap(),
            AccessScope::Global
        );
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let scope = AccessScope::parse(br#"{"other":"x","org_guid":"o"}"#).unwrap();
        assert_eq!(scope, AccessScope::Organization("o".to_string()));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(AccessScope::parse(b"{not json").is_err());
    }
}
