//! Response model field names and their owning stages.
//!
//! Field names are part of the wire contract shared with renderers and
//! templates, so they are reproduced exactly.

use crate::version::ProtocolVersion;

/// The authenticated principal identifier.
pub const PRINCIPAL: &str = "principal";

/// Principal attributes as released upstream, not normalized.
pub const PRINCIPAL_ATTRIBUTES: &str = "principalAttributes";
/// Proxy chain, outermost-first.
pub const PROXIES: &str = "proxies";
/// Proxy-granting-ticket IOU issued for this validation.
pub const PROXY_GRANTING_TICKET_IOU: &str = "proxyGrantingTicketIou";

/// Normalized multi-valued principal attributes.
pub const ATTRIBUTES: &str = "attributes";
pub const AUTHENTICATION_DATE: &str = "authenticationDate";
pub const IS_FROM_NEW_LOGIN: &str = "isFromNewLogin";
/// Protocol standard name of the remember-me flag.
pub const REMEMBER_ME: &str = "longTermAuthenticationRequestTokenUsed";
pub const CREDENTIAL: &str = "credential";

/// Prefix applied to principal attributes renamed away from reserved names.
pub const RESERVED_NAME_PREFIX: &str = "principal.";

const V1_FIELDS: &[&str] = &[PRINCIPAL];
const V2_FIELDS: &[&str] = &[PRINCIPAL_ATTRIBUTES, PROXIES, PROXY_GRANTING_TICKET_IOU];
const V3_FIELDS: &[&str] = &[
    ATTRIBUTES,
    AUTHENTICATION_DATE,
    IS_FROM_NEW_LOGIN,
    REMEMBER_ME,
    CREDENTIAL,
];

/// Field names written by the stage that introduces `version`.
///
/// The sets of distinct versions are disjoint.
pub fn owned_by(version: ProtocolVersion) -> &'static [&'static str] {
    match version {
        ProtocolVersion::V1 => V1_FIELDS,
        ProtocolVersion::V2 => V2_FIELDS,
        ProtocolVersion::V3 => V3_FIELDS,
    }
}

/// The stage that owns `name`, if any.
pub fn owner(name: &str) -> Option<ProtocolVersion> {
    ProtocolVersion::ALL
        .into_iter()
        .find(|version| owned_by(*version).contains(&name))
}

/// Whether a principal attribute named `name` would collide with a
/// version-3 field when rendered alongside the attribute bucket.
pub fn is_reserved_attribute_name(name: &str) -> bool {
    V3_FIELDS.contains(&name)
}
