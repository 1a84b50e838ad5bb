use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordered set of channel names.
///
/// Ordered so that anything derived from it iterates deterministically.
pub type ChannelSet = BTreeSet<String>;

/// The value of an `olm.channel` property.
///
/// `replaces` names the bundle this one upgrades from within the channel. It
/// is omitted from serialized output when absent.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChannelEntry {
    /// Channel name.
    pub name: String,
    /// Predecessor bundle, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replaces: Option<String>,
}

impl ChannelEntry {
    /// An entry with no predecessor.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            replaces: None,
        }
    }

    /// An entry that replaces `predecessor`.
    pub fn replacing(name: impl Into<String>, predecessor: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            replaces: Some(predecessor.into()),
        }
    }

    /// Builds an entry from an optional predecessor.
    pub fn with_replaces(name: impl Into<String>, replaces: Option<String>) -> Self {
        Self {
            name: name.into(),
            replaces,
        }
    }
}

impl fmt::Display for ChannelEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.replaces {
            Some(prev) => write!(f, "{} (replaces {})", self.name, prev),
            None => write!(f, "{}", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialization_omits_missing_replaces() {
        let json = serde_json::to_string(&ChannelEntry::new("stable")).unwrap();
        assert_eq!(json, r#"{"name":"stable"}"#);
    }

    #[test]
    fn serialization_keeps_replaces() {
        let json = serde_json::to_string(&ChannelEntry::replacing("fast", "op.v1")).unwrap();
        assert_eq!(json, r#"{"name":"fast","replaces":"op.v1"}"#);
    }

    #[test]
    fn deserialization_defaults_replaces() {
        let entry: ChannelEntry = serde_json::from_str(r#"{"name":"alpha"}"#).unwrap();
        assert_eq!(entry, ChannelEntry::new("alpha"));
    }

    #[test]
    fn display_mentions_predecessor() {
        assert_eq!(ChannelEntry::new("a").to_string(), "a");
        assert_eq!(
            ChannelEntry::replacing("a", "op.v0").to_string(),
            "a (replaces op.v0)"
        );
    }
}
