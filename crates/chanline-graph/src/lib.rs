//! Upgrade graph and channel propagation for chanline.
//!
//! Bundles point at the bundle they replace, which makes the catalog a forest
//! of "replaces" edges running from newer to older releases. This crate
//! builds that graph once ([`UpgradeGraph::build`]) and then, for every
//! bundle, works out which channels its descendants are in that it is not
//! ([`propagate`]). The result is a set of channel entries to add so that
//! every channel presents a connected upgrade chain.

pub mod error;
pub mod graph;
pub mod propagate;

pub use error::{GraphError, GraphResult};
pub use graph::{GraphEntry, UpgradeGraph};
pub use propagate::{propagate, Additions};
