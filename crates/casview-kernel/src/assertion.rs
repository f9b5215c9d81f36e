//! The resolved outcome of a successful ticket validation.
//!
//! Assertions are produced by the authentication pipeline and are read-only
//! here. Attribute values arrive as raw JSON because upstream sources do not
//! agree on shape: some release scalars, some release lists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A password-equivalent credential retained by upstream policy.
///
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Authentication result for one validation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assertion {
    #[serde(default)]
    pub principal_id: String,

    #[serde(default)]
    pub attributes: BTreeMap<String, Value>,

    pub authentication_date: DateTime<Utc>,

    /// Authentication happened during this request rather than being reused
    /// from an existing single sign-on session.
    #[serde(default)]
    pub is_new_login: bool,

    /// A long-lived ("remember me") credential was used.
    #[serde(default)]
    pub is_remember_me: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<Credential>,

    /// Proxying services, outermost-first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub proxy_chain: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_granting_ticket_iou: Option<String>,
}

impl Assertion {
    /// A bare assertion for `principal_id` authenticated at `authentication_date`.
    pub fn new(principal_id: impl Into<String>, authentication_date: DateTime<Utc>) -> Self {
        Self {
            principal_id: principal_id.into(),
            attributes: BTreeMap::new(),
            authentication_date,
            is_new_login: false,
            is_remember_me: false,
            credential: None,
            proxy_chain: Vec::new(),
            proxy_granting_ticket_iou: None,
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    pub fn with_new_login(mut self, is_new_login: bool) -> Self {
        self.is_new_login = is_new_login;
        self
    }

    pub fn with_remember_me(mut self, is_remember_me: bool) -> Self {
        self.is_remember_me = is_remember_me;
        self
    }

    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(Credential::new(credential));
        self
    }

    pub fn with_proxy(mut self, service: impl Into<String>) -> Self {
        self.proxy_chain.push(service.into());
        self
    }

    pub fn with_proxy_granting_ticket_iou(mut self, iou: impl Into<String>) -> Self {
        self.proxy_granting_ticket_iou = Some(iou.into());
        self
    }

    /// The retained credential, if present and not blank.
    pub fn non_blank_credential(&self) -> Option<&Credential> {
        self.credential.as_ref().filter(|c| !c.is_blank())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn deserializes_with_defaults() {
        let assertion: Assertion = serde_json::from_value(json!({
            "principalId": "alice",
            "authenticationDate": "2026-10-19T08:30:00Z"
        }))
        .unwrap();

        assert_eq!(assertion.principal_id, "alice");
        assert!(assertion.attributes.is_empty());
        assert!(!assertion.is_new_login);
        assert!(!assertion.is_remember_me);
        assert!(assertion.credential.is_none());
        assert!(assertion.proxy_chain.is_empty());
        assert_eq!(
            assertion.authentication_date,
            Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap()
        );
    }

    #[test]
    fn missing_principal_deserializes_blank() {
        let assertion: Assertion = serde_json::from_value(json!({
            "authenticationDate": "2026-10-19T08:30:00Z"
        }))
        .unwrap();
        assert!(assertion.principal_id.is_empty());
    }

    #[test]
    fn credential_debug_is_redacted() {
        let assertion = Assertion::new("alice", Utc::now()).with_credential("s3cr3t");
        let rendered = format!("{assertion:?}");
        assert!(!rendered.contains("s3cr3t"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn blank_credential_is_not_released() {
        let assertion = Assertion::new("alice", Utc::now()).with_credential("   ");
        assert!(assertion.non_blank_credential().is_none());

        let assertion = assertion.with_credential("pw");
        assert_eq!(assertion.non_blank_credential().unwrap().expose(), "pw");
    }
}
