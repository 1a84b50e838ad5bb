//! Loading, merging, and rewriting whole catalog documents.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Deserialize;
use serde_yaml::Value;
use tracing::debug;

use chanline_graph::Additions;
use chanline_types::Bundle;

use crate::error::{CatalogError, CatalogResult};
use crate::record::Record;

/// Document start marker written before every record.
const DOCUMENT_START: &str = "---\n";

/// An in-memory catalog: every record of a YAML stream, in order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    records: Vec<Record>,
}

impl Catalog {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Parse a YAML stream. Each `---`-separated document becomes a record.
    ///
    /// A stream with nothing but blank lines and comments has no records.
    pub fn from_yaml_str(input: &str) -> CatalogResult<Self> {
        let mut records = Vec::new();
        if !has_content(input) {
            return Ok(Self { records });
        }
        for document in serde_yaml::Deserializer::from_str(input) {
            records.push(Record::new(Value::deserialize(document)?));
        }
        debug!(records = records.len(), "parsed catalog");
        Ok(Self { records })
    }

    /// Read and parse a catalog file.
    pub fn load(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let input = fs::read_to_string(path)?;
        debug!(path = %path.display(), bytes = input.len(), "read catalog");
        Self::from_yaml_str(&input)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Typed views of every bundle record, in document order.
    pub fn bundles(&self) -> CatalogResult<Vec<Bundle>> {
        let mut bundles = Vec::new();
        for record in &self.records {
            if let Some(bundle) = record.bundle()? {
                bundles.push(bundle);
            }
        }
        Ok(bundles)
    }

    /// Merge synthesized channel entries into their bundle records.
    ///
    /// Entries are appended after the existing properties in the order
    /// `additions` holds them (sorted by channel name). Returns the number of
    /// records changed; records without additions are left exactly as loaded.
    pub fn apply(&mut self, additions: &Additions) -> CatalogResult<usize> {
        let mut updated = 0;
        for record in &mut self.records {
            let entries = match record.bundle_name() {
                Some(name) => additions.for_bundle(name),
                None => continue,
            };
            if entries.is_empty() {
                continue;
            }
            record.append_channels(entries)?;
            updated += 1;
        }
        Ok(updated)
    }

    /// Serialize every record as its own explicitly started YAML document.
    pub fn to_yaml_string(&self) -> CatalogResult<String> {
        let mut out = String::new();
        for record in &self.records {
            out.push_str(DOCUMENT_START);
            out.push_str(&serde_yaml::to_string(record.value())?);
        }
        Ok(out)
    }

    /// Write the catalog to `path`, replacing any existing file atomically.
    ///
    /// The document is rendered in full and written to a temporary file in the
    /// target's directory before being renamed into place. A symlinked target
    /// is resolved first so the link survives, and an existing file's
    /// permissions carry over to the new one.
    pub fn save(&self, path: impl AsRef<Path>) -> CatalogResult<()> {
        let path = path.as_ref();
        let rendered = self.to_yaml_string()?;

        let is_symlink = fs::symlink_metadata(path)
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false);
        let target = if is_symlink {
            fs::canonicalize(path)?
        } else {
            path.to_path_buf()
        };

        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(rendered.as_bytes())?;
        if let Ok(existing) = fs::metadata(&target) {
            tmp.as_file().set_permissions(existing.permissions())?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&target)
            .map_err(|e| CatalogError::Persist(e.to_string()))?;

        debug!(path = %target.display(), bytes = rendered.len(), "wrote catalog");
        Ok(())
    }
}

/// Whether `input` holds anything besides blank lines and comments.
fn has_content(input: &str) -> bool {
    input
        .lines()
        .map(str::trim)
        .any(|line| !line.is_empty() && !line.starts_with('#'))
}
