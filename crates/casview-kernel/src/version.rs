//! Protocol generations served by the validation endpoints.
//!
//! Each generation exposes a strict superset of the fields exposed by the
//! one before it:
//!
//! - **V1**: the authenticated principal only
//! - **V2**: + raw principal attributes and proxy metadata
//! - **V3**: + normalized attributes and authentication trust metadata

/// A negotiated protocol generation.
///
/// Ordering follows the generations, so `V1 < V2 < V3`.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum ProtocolVersion {
    V1,
    V2,
    #[default]
    V3,
}

impl ProtocolVersion {
    /// All generations in chain order.
    pub const ALL: [ProtocolVersion; 3] = [Self::V1, Self::V2, Self::V3];

    /// The protocol generation number.
    pub fn number(self) -> u8 {
        match self {
            Self::V1 => 1,
            Self::V2 => 2,
            Self::V3 => 3,
        }
    }

    /// The generation this one extends, if any.
    pub fn parent(self) -> Option<Self> {
        match self {
            Self::V1 => None,
            Self::V2 => Some(Self::V1),
            Self::V3 => Some(Self::V2),
        }
    }

    /// Returns true if a consumer of `self` sees every field of `other`.
    pub fn includes(self, other: Self) -> bool {
        self >= other
    }
}

impl std::fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.number())
    }
}

impl From<ProtocolVersion> for u8 {
    fn from(version: ProtocolVersion) -> Self {
        version.number()
    }
}

impl TryFrom<u8> for ProtocolVersion {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::V1),
            2 => Ok(Self::V2),
            3 => Ok(Self::V3),
            other => Err(format!("unsupported protocol version: {other}")),
        }
    }
}

impl std::str::FromStr for ProtocolVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "v1" | "cas1" => Ok(Self::V1),
            "2" | "v2" | "cas2" => Ok(Self::V2),
            "3" | "v3" | "cas3" => Ok(Self::V3),
            _ => Err(format!("unknown protocol version: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_ordering() {
        assert!(ProtocolVersion::V3.includes(ProtocolVersion::V2));
        assert!(ProtocolVersion::V2.includes(ProtocolVersion::V1));
        assert!(ProtocolVersion::V3.includes(ProtocolVersion::V3));
        assert!(!ProtocolVersion::V1.includes(ProtocolVersion::V2));
    }

    #[test]
    fn version_parse() {
        assert_eq!("3".parse::<ProtocolVersion>().unwrap(), ProtocolVersion::V3);
        assert_eq!("v2".parse::<ProtocolVersion>().unwrap(), ProtocolVersion::V2);
        assert_eq!(
            "CAS1".parse::<ProtocolVersion>().unwrap(),
            ProtocolVersion::V1
        );
        assert!("4".parse::<ProtocolVersion>().is_err());
    }

    #[test]
    fn default_version_is_newest() {
        assert_eq!(ProtocolVersion::default(), ProtocolVersion::V3);
        assert_eq!(
            ProtocolVersion::default(),
            *ProtocolVersion::ALL.last().unwrap()
        );
    }

    #[test]
    fn version_parents_form_a_chain() {
        assert_eq!(ProtocolVersion::V3.parent(), Some(ProtocolVersion::V2));
        assert_eq!(ProtocolVersion::V2.parent(), Some(ProtocolVersion::V1));
        assert_eq!(ProtocolVersion::V1.parent(), None);
    }

    #[test]
    fn version_serializes_as_number() {
        let json = serde_json::to_value(ProtocolVersion::V2).unwrap();
        assert_eq!(json, serde_json::json!(2));
        let parsed: ProtocolVersion = serde_json::from_value(serde_json::json!(3)).unwrap();
        assert_eq!(parsed, ProtocolVersion::V3);
        assert!(serde_json::from_value::<ProtocolVersion>(serde_json::json!(9)).is_err());
    }
}
