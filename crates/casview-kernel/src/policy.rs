//! Read-only release policy shared by every assembly.

use serde::{Deserialize, Serialize};

/// What to do with a principal attribute whose name is also a version-3
/// response field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservedNameHandling {
    /// Fail the assembly.
    #[default]
    Reject,
    /// Rename the attribute to `principal.<name>`.
    Prefix,
}

impl std::fmt::Display for ReservedNameHandling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reject => write!(f, "reject"),
            Self::Prefix => write!(f, "prefix"),
        }
    }
}

/// Policy consulted while assembling a response model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationPolicy {
    /// Release a retained credential to version-3 consumers.
    pub release_credential: bool,

    pub reserved_attribute_names: ReservedNameHandling,
}

impl ValidationPolicy {
    pub fn releasing_credential(mut self, release: bool) -> Self {
        self.release_credential = release;
        self
    }

    pub fn with_reserved_attribute_names(mut self, handling: ReservedNameHandling) -> Self {
        self.reserved_attribute_names = handling;
        self
    }
}
