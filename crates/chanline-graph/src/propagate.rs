//! Channel propagation over a frozen [`UpgradeGraph`].
//!
//! For each bundle, the channels of all its descendants are unioned and the
//! bundle's own channels subtracted. Every remaining channel becomes a new
//! channel entry on the bundle, carrying the bundle's own predecessor so the
//! chain stays connected when a consumer walks that channel.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use chanline_types::ChannelEntry;

use crate::error::GraphResult;
use crate::graph::UpgradeGraph;

/// Channel entries to add, keyed by bundle name.
///
/// Only bundles that gain at least one entry are present. Each list is sorted
/// by channel name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Additions(BTreeMap<String, Vec<ChannelEntry>>);

impl Additions {
    /// Entries to add to `bundle`, or an empty slice.
    pub fn for_bundle(&self, bundle: &str) -> &[ChannelEntry] {
        self.0.get(bundle).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of bundles that gain entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no bundle gains anything.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of synthesized entries across all bundles.
    pub fn total_entries(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Iterate bundles and their additions, ordered by bundle name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ChannelEntry])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

/// Compute the channel entries every bundle is missing.
///
/// Reads only the graph, so the result for one bundle never feeds into
/// another's. Fails if any descendant walk hits a replaces cycle.
pub fn propagate(graph: &UpgradeGraph) -> GraphResult<Additions> {
    let mut additions = BTreeMap::new();

    for (name, entry) in graph.bundles() {
        let missing = graph.missing_channels(name)?;
        if missing.is_empty() {
            continue;
        }

        debug!(bundle = %name, missing = missing.len(), "synthesizing channel entries");

        // An empty predecessor name means "no predecessor" on synthesized entries.
        let replaces = entry.replaces.clone().filter(|prev| !prev.is_empty());

        // ChannelSet iterates in name order, so the entries come out sorted.
        let entries: Vec<ChannelEntry> = missing
            .into_iter()
            .map(|channel| ChannelEntry::with_replaces(channel, replaces.clone()))
            .collect();
        additions.insert(name.to_string(), entries);
    }

    Ok(Additions(additions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphError;
    use chanline_types::Bundle;
    use proptest::prelude::*;

    fn bundle(name: &str, replaces: Option<&str>, channels: &[&str]) -> Bundle {
        channels.iter().fold(Bundle::new(name, "op"), |b, ch| {
            b.with_channel(ChannelEntry::with_replaces(*ch, replaces.map(String::from)))
        })
    }

    fn run(bundles: &[Bundle]) -> Additions {
        propagate(&UpgradeGraph::build(bundles).unwrap()).unwrap()
    }

    #[test]
    fn root_gains_channel_without_replaces() {
        let additions = run(&[
            bundle("a", None, &["stable"]),
            bundle("b", Some("a"), &["stable", "fast"]),
        ]);
        assert_eq!(additions.for_bundle("a"), &[ChannelEntry::new("fast")]);
        assert!(additions.for_bundle("b").is_empty());
        assert_eq!(additions.len(), 1);
    }

    #[test]
    fn chain_propagates_to_every_ancestor() {
        let additions = run(&[
            bundle("x", None, &["alpha"]),
            bundle("y", Some("x"), &["alpha"]),
            bundle("z", Some("y"), &["alpha", "beta"]),
        ]);
        assert_eq!(additions.for_bundle("x"), &[ChannelEntry::new("beta")]);
        assert_eq!(
            additions.for_bundle("y"),
            &[ChannelEntry::replacing("beta", "x")]
        );
        assert!(additions.for_bundle("z").is_empty());
        assert_eq!(additions.total_entries(), 2);
    }

    #[test]
    fn synthesized_entries_are_sorted() {
        let additions = run(&[
            bundle("a", Some("base"), &["stable"]),
            bundle("b", Some("a"), &["zeta", "stable"]),
            bundle("c", Some("b"), &["delta", "alpha"]),
        ]);
        let names: Vec<_> = additions
            .for_bundle("a")
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["alpha", "delta", "zeta"]);
        assert!(additions
            .for_bundle("a")
            .iter()
            .all(|e| e.replaces.as_deref() == Some("base")));
    }

    #[test]
    fn dangling_replaces_is_copied_verbatim() {
        let additions = run(&[
            bundle("a", Some("pruned"), &["stable"]),
            bundle("b", Some("a"), &["fast"]),
        ]);
        assert_eq!(
            additions.for_bundle("a"),
            &[ChannelEntry::replacing("fast", "pruned")]
        );
    }

    #[test]
    fn empty_replaces_is_dropped_from_synthesized_entries() {
        let additions = run(&[
            bundle("a", Some(""), &["stable"]),
            bundle("b", Some("a"), &["fast"]),
        ]);
        assert_eq!(additions.for_bundle("a"), &[ChannelEntry::new("fast")]);
    }

    #[test]
    fn nothing_to_add_when_channels_agree() {
        let additions = run(&[
            bundle("a", None, &["stable"]),
            bundle("b", Some("a"), &["stable"]),
        ]);
        assert!(additions.is_empty());
    }

    #[test]
    fn cycle_aborts_propagation() {
        let graph = UpgradeGraph::build(&[
            bundle("a", Some("b"), &["stable"]),
            bundle("b", Some("a"), &["fast"]),
        ])
        .unwrap();
        assert!(matches!(
            propagate(&graph),
            Err(GraphError::CycleDetected { .. })
        ));
    }

    #[test]
    fn second_pass_converges() {
        let mut bundles = vec![
            bundle("x", None, &["alpha"]),
            bundle("y", Some("x"), &["alpha"]),
            bundle("z", Some("y"), &["alpha", "beta"]),
        ];
        let first = run(&bundles);
        for b in &mut bundles {
            b.channels.extend(first.for_bundle(&b.name).iter().cloned());
        }
        assert!(run(&bundles).is_empty());
    }

    // ----------------------------------------------------------
    // Properties
    // ----------------------------------------------------------

    const CHANNELS: &[&str] = &["alpha", "beta", "candidate", "fast", "stable"];

    /// Random forests: bundle `i` replaces some earlier bundle or nothing, so
    /// the graph is always acyclic.
    fn arb_bundles() -> impl Strategy<Value = Vec<Bundle>> {
        proptest::collection::vec(
            (
                any::<prop::sample::Index>(),
                any::<bool>(),
                proptest::collection::vec(0..CHANNELS.len(), 1..4),
            ),
            1..12,
        )
        .prop_map(|specs| {
            specs
                .into_iter()
                .enumerate()
                .map(|(i, (parent, has_parent, channels))| {
                    let replaces = if i > 0 && has_parent {
                        Some(format!("b{}", parent.index(i)))
                    } else {
                        None
                    };
                    channels.into_iter().fold(
                        Bundle::new(format!("b{i}"), "op"),
                        |b, c| b.with_channel(ChannelEntry::with_replaces(CHANNELS[c], replaces.clone())),
                    )
                })
                .collect()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn every_descendant_channel_reaches_ancestors(bundles in arb_bundles()) {
            let graph = UpgradeGraph::build(&bundles).unwrap();
            let additions = propagate(&graph).unwrap();

            for b in &bundles {
                let mut after = b.channel_names();
                after.extend(additions.for_bundle(&b.name).iter().map(|e| e.name.clone()));
                for d in graph.descendants(&b.name).unwrap() {
                    for ch in &graph.get(&d).unwrap().channels {
                        prop_assert!(after.contains(ch), "{} missing {} from {}", b.name, ch, d);
                    }
                }
            }
        }

        #[test]
        fn additions_never_repeat_existing_channels(bundles in arb_bundles()) {
            let additions = propagate(&UpgradeGraph::build(&bundles).unwrap()).unwrap();
            for b in &bundles {
                let own = b.channel_names();
                for e in additions.for_bundle(&b.name) {
                    prop_assert!(!own.contains(&e.name));
                    prop_assert_eq!(&e.replaces, &b.channels[0].replaces);
                }
            }
        }

        #[test]
        fn additions_sorted_and_stable(bundles in arb_bundles()) {
            let graph = UpgradeGraph::build(&bundles).unwrap();
            let first = propagate(&graph).unwrap();
            let second = propagate(&graph).unwrap();
            prop_assert_eq!(&first, &second);

            let mut reversed = bundles.clone();
            reversed.reverse();
            for b in &mut reversed {
                b.channels.reverse();
            }
            let shuffled = propagate(&UpgradeGraph::build(&reversed).unwrap()).unwrap();
            prop_assert_eq!(&first, &shuffled);

            for (_, entries) in first.iter() {
                prop_assert!(entries.windows(2).all(|w| w[0].name < w[1].name));
            }
        }
    }
}
