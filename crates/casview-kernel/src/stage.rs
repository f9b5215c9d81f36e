//! The versioned builder chain.
//!
//! Each protocol generation is one stage. A stage first runs the stage it
//! extends, then writes only the fields it owns:
//!
//! ```text
//! build_v1   principal
//!    │
//! build_v2   + principalAttributes, proxies, proxyGrantingTicketIou
//!    │
//! build_v3   + attributes, authenticationDate, isFromNewLogin,
//!              longTermAuthenticationRequestTokenUsed, credential
//! ```
//!
//! Because higher stages always call their ancestors, a field visible to a
//! version-2 consumer is visible, unchanged, to a version-3 consumer.

use crate::assertion::Assertion;
use crate::error::AssemblyError;
use crate::field;
use crate::model::{FieldValue, ResponseModel, Scalar, ValueSet};
use crate::normalize::{normalize_attributes, resolve_reserved_names};
use crate::policy::ValidationPolicy;
use crate::version::ProtocolVersion;
use tracing::debug;

/// Build the model for `version`, running every ancestor stage first.
pub fn build(
    assertion: &Assertion,
    version: ProtocolVersion,
    policy: &ValidationPolicy,
) -> Result<ResponseModel, AssemblyError> {
    match version {
        ProtocolVersion::V1 => build_v1(assertion),
        ProtocolVersion::V2 => build_v2(assertion),
        ProtocolVersion::V3 => build_v3(assertion, policy),
    }
}

/// Version-1 stage: the principal only.
pub fn build_v1(assertion: &Assertion) -> Result<ResponseModel, AssemblyError> {
    let principal = assertion.principal_id.trim();
    if principal.is_empty() {
        return Err(AssemblyError::MissingPrincipal);
    }

    let mut model = ResponseModel::new();
    model.put(
        ProtocolVersion::V1,
        field::PRINCIPAL,
        FieldValue::Scalar(Scalar::from(principal)),
    )?;
    Ok(model)
}

/// Version-2 stage: raw principal attributes and proxy metadata.
///
/// Reads nothing introduced at version 3.
pub fn build_v2(assertion: &Assertion) -> Result<ResponseModel, AssemblyError> {
    let model = build_v1(assertion).map_err(|e| e.wrap_stage(ProtocolVersion::V1))?;
    extend_v2(assertion, model)
}

/// Version-3 stage: normalized attributes and authentication trust metadata.
pub fn build_v3(
    assertion: &Assertion,
    policy: &ValidationPolicy,
) -> Result<ResponseModel, AssemblyError> {
    let model = build_v2(assertion).map_err(|e| e.wrap_stage(ProtocolVersion::V2))?;
    extend_v3(assertion, policy, model)
}

fn extend_v2(
    assertion: &Assertion,
    mut model: ResponseModel,
) -> Result<ResponseModel, AssemblyError> {
    const STAGE: ProtocolVersion = ProtocolVersion::V2;

    model.put(
        STAGE,
        field::PRINCIPAL_ATTRIBUTES,
        FieldValue::Raw(assertion.attributes.clone()),
    )?;

    if !assertion.proxy_chain.is_empty() {
        let proxies = assertion
            .proxy_chain
            .iter()
            .map(|service| Scalar::from(service.as_str()))
            .collect();
        model.put(STAGE, field::PROXIES, FieldValue::List(proxies))?;
    }

    if let Some(iou) = assertion
        .proxy_granting_ticket_iou
        .as_deref()
        .filter(|iou| !iou.trim().is_empty())
    {
        model.put(
            STAGE,
            field::PROXY_GRANTING_TICKET_IOU,
            FieldValue::Scalar(Scalar::from(iou)),
        )?;
    }

    Ok(model)
}

fn extend_v3(
    assertion: &Assertion,
    policy: &ValidationPolicy,
    mut model: ResponseModel,
) -> Result<ResponseModel, AssemblyError> {
    const STAGE: ProtocolVersion = ProtocolVersion::V3;

    let attributes = resolve_reserved_names(
        normalize_attributes(&assertion.attributes)?,
        policy.reserved_attribute_names,
    )?;
    model.put(STAGE, field::ATTRIBUTES, FieldValue::Attributes(attributes))?;

    model.put(
        STAGE,
        field::AUTHENTICATION_DATE,
        FieldValue::Set(ValueSet::singleton(assertion.authentication_date)),
    )?;
    model.put(
        STAGE,
        field::IS_FROM_NEW_LOGIN,
        FieldValue::Set(ValueSet::singleton(assertion.is_new_login)),
    )?;
    model.put(
        STAGE,
        field::REMEMBER_ME,
        FieldValue::Set(ValueSet::singleton(assertion.is_remember_me)),
    )?;

    match assertion.non_blank_credential() {
        Some(credential) if policy.release_credential => {
            debug!(
                field = field::CREDENTIAL,
                "releasing retained credential into the response model"
            );
            model.put(
                STAGE,
                field::CREDENTIAL,
                FieldValue::Set(ValueSet::singleton(credential.expose())),
            )?;
        }
        Some(_) => debug!("retained credential withheld by policy"),
        None => {}
    }

    Ok(model)
}
