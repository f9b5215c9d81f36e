//! Entry point used by validation endpoints.

use crate::assertion::Assertion;
use crate::error::AssemblyError;
use crate::model::ResponseModel;
use crate::policy::ValidationPolicy;
use crate::stage;
use crate::version::ProtocolVersion;
use tracing::debug;

/// Assemble the response model for `version` from a resolved assertion.
///
/// Runs the terminal stage for `version` and all of its ancestors. Either the
/// complete model is returned or nothing is: a failed assembly never leaks a
/// partially-built success model. Callers turn an error into the protocol's
/// failure response.
pub fn assemble_response_model(
    assertion: &Assertion,
    version: ProtocolVersion,
    policy: &ValidationPolicy,
) -> Result<ResponseModel, AssemblyError> {
    match stage::build(assertion, version, policy) {
        Ok(model) => {
            debug!(
                protocol = %version,
                fields = model.len(),
                digest = %model.digest(),
                "assembled response model"
            );
            Ok(model)
        }
        Err(err) => {
            debug!(
                protocol = %version,
                code = err.code(),
                error = %err,
                "response model assembly failed"
            );
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn alice() -> Assertion {
        Assertion::new(
            "alice",
            Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap(),
        )
        .with_attribute("email", json!(["alice@example.com"]))
        .with_new_login(true)
    }

    #[test]
    fn v3_model_snapshot() {
        let model =
            assemble_response_model(&alice(), ProtocolVersion::V3, &ValidationPolicy::default())
                .unwrap();
        insta::assert_json_snapshot!(model, @r#"
        {
          "attributes": {
            "email": [
              "alice@example.com"
            ]
          },
          "authenticationDate": [
            "2026-10-19T08:30:00Z"
          ],
          "isFromNewLogin": [
            true
          ],
          "longTermAuthenticationRequestTokenUsed": [
            false
          ],
          "principal": "alice",
          "principalAttributes": {
            "email": [
              "alice@example.com"
            ]
          }
        }
        "#);
    }

    #[test]
    fn credential_adds_exactly_one_field() {
        let policy = ValidationPolicy::default().releasing_credential(true);
        let plain = assemble_response_model(&alice(), ProtocolVersion::V3, &policy).unwrap();
        let with_cred = assemble_response_model(
            &alice().with_credential("s3cr3t"),
            ProtocolVersion::V3,
            &policy,
        )
        .unwrap();

        assert_eq!(with_cred.len(), plain.len() + 1);
        for (name, value) in plain.iter() {
            assert_eq!(with_cred.get(name), Some(value), "field {name} changed");
        }
        assert_eq!(
            serde_json::to_value(with_cred.get(field::CREDENTIAL)).unwrap(),
            json!(["s3cr3t"])
        );
    }

    #[test]
    fn terminal_stage_selects_field_set() {
        let policy = ValidationPolicy::default();
        let v1 = assemble_response_model(&alice(), ProtocolVersion::V1, &policy).unwrap();
        let v2 = assemble_response_model(&alice(), ProtocolVersion::V2, &policy).unwrap();
        let v3 = assemble_response_model(&alice(), ProtocolVersion::V3, &policy).unwrap();
        assert_eq!(v1.len(), 1);
        assert_eq!(v2.len(), 2);
        assert_eq!(v3.len(), 6);
    }
}
