//! The upgrade graph and its traversal queries.
//!
//! [`UpgradeGraph`] maps every bundle name to its channel set and the single
//! bundle it replaces. A reverse index (`replaced_by`) is built alongside for
//! descendant queries. The graph is built once and never mutated afterwards.
//!
//! # Invariants
//!
//! - Every bundle names at most one predecessor.
//! - Bundle names are unique keys (a later duplicate overwrites an earlier one).
//! - A predecessor that is not itself a bundle in the graph is tolerated and
//!   simply contributes no edges to known bundles.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use chanline_types::{Bundle, ChannelSet};

use crate::error::{GraphError, GraphResult};

/// What the graph records about one bundle.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEntry {
    /// Package name, kept for diagnostics.
    pub package: String,
    /// Channels the bundle declares.
    pub channels: ChannelSet,
    /// The bundle this one replaces, if any.
    pub replaces: Option<String>,
}

/// Index from bundle name to its channels and predecessor.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UpgradeGraph {
    /// All bundles, keyed by name.
    entries: BTreeMap<String, GraphEntry>,
    /// Reverse-edge index: predecessor -> bundles that replace it.
    replaced_by: BTreeMap<String, Vec<String>>,
}

impl UpgradeGraph {
    /// Build the graph from a sequence of bundles.
    ///
    /// Fails with [`GraphError::TooManyReplaces`] as soon as a bundle declares
    /// more than one distinct predecessor across its channel entries.
    pub fn build<'a, I>(bundles: I) -> GraphResult<Self>
    where
        I: IntoIterator<Item = &'a Bundle>,
    {
        let mut entries: BTreeMap<String, GraphEntry> = BTreeMap::new();

        for bundle in bundles {
            let replaces = bundle.replaces_values();
            if replaces.len() > 1 {
                return Err(GraphError::TooManyReplaces {
                    package: bundle.package.clone(),
                    bundle: bundle.name.clone(),
                    count: replaces.len(),
                });
            }

            let entry = GraphEntry {
                package: bundle.package.clone(),
                channels: bundle.channel_names(),
                replaces: replaces.into_iter().next().flatten(),
            };

            debug!(
                bundle = %bundle.name,
                channels = entry.channels.len(),
                replaces = entry.replaces.as_deref().unwrap_or("-"),
                "indexed bundle"
            );

            if entries.insert(bundle.name.clone(), entry).is_some() {
                warn!(bundle = %bundle.name, "duplicate bundle name, keeping the later record");
            }
        }

        let mut replaced_by: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (name, entry) in &entries {
            if let Some(prev) = &entry.replaces {
                replaced_by
                    .entry(prev.clone())
                    .or_default()
                    .push(name.clone());
            }
        }

        Ok(Self {
            entries,
            replaced_by,
        })
    }

    /// Number of bundles in the graph.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the graph has no bundles.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a bundle by name.
    pub fn get(&self, name: &str) -> Option<&GraphEntry> {
        self.entries.get(name)
    }

    /// Returns `true` if `name` is a bundle in the graph.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// All bundles, ordered by name.
    pub fn bundles(&self) -> impl Iterator<Item = (&str, &GraphEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Bundles whose predecessor is absent or not part of the graph.
    pub fn roots(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, e)| match &e.replaces {
                Some(prev) => !self.entries.contains_key(prev),
                None => true,
            })
            .map(|(k, _)| k.as_str())
            .collect()
    }

    /// Bundles that directly replace `name`.
    pub fn direct_descendants(&self, name: &str) -> &[String] {
        self.replaced_by
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    // ---------------------------------------------------------------
    // Descendant queries
    // ---------------------------------------------------------------

    /// Every bundle that transitively replaces `name` (BFS over reverse edges).
    ///
    /// The bundle itself is **not** included. Returns an empty set when `name`
    /// is not in the graph. Each bundle has a single predecessor, so any loop
    /// reachable from `name` runs back through it; reaching an already-seen
    /// bundle fails with [`GraphError::CycleDetected`].
    pub fn descendants(&self, name: &str) -> GraphResult<BTreeSet<String>> {
        let mut result = BTreeSet::new();
        if !self.contains(name) {
            return Ok(result);
        }

        let mut queue: VecDeque<&str> = VecDeque::new();
        queue.push_back(name);

        while let Some(current) = queue.pop_front() {
            for child in self.direct_descendants(current) {
                if child == name || !result.insert(child.clone()) {
                    return Err(GraphError::CycleDetected {
                        bundle: name.to_string(),
                    });
                }
                queue.push_back(child.as_str());
            }
        }

        Ok(result)
    }

    /// Union of the channels of every descendant of `name`.
    pub fn descendant_channels(&self, name: &str) -> GraphResult<ChannelSet> {
        let mut channels = ChannelSet::new();
        for desc in self.descendants(name)? {
            if let Some(entry) = self.entries.get(&desc) {
                channels.extend(entry.channels.iter().cloned());
            }
        }
        Ok(channels)
    }

    /// Channels that descendants of `name` are in but `name` itself is not.
    pub fn missing_channels(&self, name: &str) -> GraphResult<ChannelSet> {
        let mut missing = self.descendant_channels(name)?;
        if let Some(entry) = self.entries.get(name) {
            missing.retain(|c| !entry.channels.contains(c));
        }
        Ok(missing)
    }
}
