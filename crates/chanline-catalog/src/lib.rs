//! Catalog documents for chanline.
//!
//! A catalog is a YAML stream of records. Records tagged `olm.bundle` are
//! exposed as typed [`Bundle`](chanline_types::Bundle) views; everything else
//! is carried through untouched. After propagation, [`Catalog::apply`] merges
//! the synthesized channel entries back into the bundle records and
//! [`Catalog::save`] rewrites the document.

pub mod catalog;
pub mod error;
pub mod record;

pub use catalog::Catalog;
pub use error::{CatalogError, CatalogResult};
pub use record::Record;
