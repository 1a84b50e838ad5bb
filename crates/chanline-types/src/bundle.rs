//! The typed view of a bundle record.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::channel::{ChannelEntry, ChannelSet};

/// A bundle: one versioned release artifact.
///
/// Only the fields the channel graph needs are kept here. The full record,
/// including any fields chanline does not interpret, lives in the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bundle {
    /// Unique bundle name.
    pub name: String,
    /// Package the bundle belongs to. Carried for diagnostics only.
    #[serde(default)]
    pub package: String,
    /// Declared channel memberships, in document order.
    #[serde(default)]
    pub channels: Vec<ChannelEntry>,
}

impl Bundle {
    /// Create a bundle with no channel memberships.
    pub fn new(name: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
            channels: Vec::new(),
        }
    }

    /// Builder-style helper that adds a channel entry.
    pub fn with_channel(mut self, entry: ChannelEntry) -> Self {
        self.channels.push(entry);
        self
    }

    /// Names of all channels this bundle declares, duplicates collapsed.
    pub fn channel_names(&self) -> ChannelSet {
        self.channels.iter().map(|c| c.name.clone()).collect()
    }

    /// The distinct `replaces` values across the channel entries.
    ///
    /// An entry without a predecessor contributes `None`, so a bundle that
    /// replaces `P` in one channel and nothing in another yields two values.
    /// A bundle with no channel entries yields an empty set.
    pub fn replaces_values(&self) -> BTreeSet<Option<String>> {
        self.channels.iter().map(|c| c.replaces.clone()).collect()
    }
}
