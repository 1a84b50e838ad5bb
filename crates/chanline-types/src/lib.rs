//! Foundation types for chanline.
//!
//! A catalog is a stream of records; the ones tagged with [`BUNDLE_SCHEMA`]
//! describe releasable bundles. Each bundle joins release channels through
//! `olm.channel` properties, and each of those properties may name the bundle
//! it replaces. Every other chanline crate depends on `chanline-types`.
//!
//! # Key Types
//!
//! - [`Bundle`]: Typed view of a bundle record's identity and channel entries
//! - [`ChannelEntry`]: Payload of a single channel-membership property
//! - [`ChannelSet`]: Ordered set of channel names

pub mod bundle;
pub mod channel;

pub use bundle::Bundle;
pub use channel::{ChannelEntry, ChannelSet};

/// Schema tag carried by bundle records.
pub const BUNDLE_SCHEMA: &str = "olm.bundle";

/// Property type tag for channel membership.
pub const CHANNEL_PROPERTY_TYPE: &str = "olm.channel";
