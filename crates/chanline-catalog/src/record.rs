//! A single catalog record and the typed bundle view over it.

use serde_yaml::{Mapping, Value};

use chanline_types::{Bundle, ChannelEntry, BUNDLE_SCHEMA, CHANNEL_PROPERTY_TYPE};

use crate::error::{CatalogError, CatalogResult};

const SCHEMA_KEY: &str = "schema";
const NAME_KEY: &str = "name";
const PACKAGE_KEY: &str = "package";
const PROPERTIES_KEY: &str = "properties";
const TYPE_KEY: &str = "type";
const VALUE_KEY: &str = "value";

/// One document from a catalog stream.
///
/// The raw YAML value is kept as-is so that fields chanline does not know
/// about survive a rewrite.
#[derive(Clone, Debug, PartialEq)]
pub struct Record(Value);

impl Record {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    /// The record's `schema` tag, if it has one.
    pub fn schema(&self) -> Option<&str> {
        self.0.get(SCHEMA_KEY).and_then(Value::as_str)
    }

    pub fn is_bundle(&self) -> bool {
        self.schema() == Some(BUNDLE_SCHEMA)
    }

    /// The bundle name, for bundle records.
    pub fn bundle_name(&self) -> Option<&str> {
        if !self.is_bundle() {
            return None;
        }
        self.0.get(NAME_KEY).and_then(Value::as_str)
    }

    /// Typed view of a bundle record, or `None` for any other record.
    ///
    /// Only `olm.channel` properties are interpreted. Every other property is
    /// left to the raw value.
    pub fn bundle(&self) -> CatalogResult<Option<Bundle>> {
        if !self.is_bundle() {
            return Ok(None);
        }

        let name = self
            .0
            .get(NAME_KEY)
            .and_then(Value::as_str)
            .ok_or_else(|| CatalogError::MalformedBundle("missing string \"name\"".into()))?;
        let package = self
            .0
            .get(PACKAGE_KEY)
            .and_then(Value::as_str)
            .unwrap_or_default();

        let mut bundle = Bundle::new(name, package);

        let properties = match self.0.get(PROPERTIES_KEY) {
            None | Some(Value::Null) => return Ok(Some(bundle)),
            Some(Value::Sequence(seq)) => seq,
            Some(_) => {
                return Err(CatalogError::MalformedBundle(format!(
                    "bundle \"{name}\" has non-sequence \"properties\""
                )))
            }
        };

        for prop in properties {
            if prop.get(TYPE_KEY).and_then(Value::as_str) != Some(CHANNEL_PROPERTY_TYPE) {
                continue;
            }
            let value = prop.get(VALUE_KEY).cloned().unwrap_or(Value::Null);
            let entry: ChannelEntry =
                serde_yaml::from_value(value).map_err(|e| CatalogError::MalformedProperty {
                    bundle: name.to_string(),
                    reason: e.to_string(),
                })?;
            bundle.channels.push(entry);
        }

        Ok(Some(bundle))
    }

    /// Append channel entries to the record's `properties` list.
    ///
    /// Creates the list when the record has none. Existing properties are
    /// never touched.
    pub fn append_channels(&mut self, entries: &[ChannelEntry]) -> CatalogResult<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let Value::Mapping(map) = &mut self.0 else {
            return Err(CatalogError::MalformedBundle(
                "record is not a mapping".into(),
            ));
        };

        if matches!(map.get(PROPERTIES_KEY), None | Some(Value::Null)) {
            map.insert(Value::from(PROPERTIES_KEY), Value::Sequence(Vec::new()));
        }
        let Some(Value::Sequence(properties)) = map.get_mut(PROPERTIES_KEY) else {
            return Err(CatalogError::MalformedBundle(
                "\"properties\" is not a sequence".into(),
            ));
        };

        for entry in entries {
            let mut prop = Mapping::new();
            prop.insert(Value::from(TYPE_KEY), Value::from(CHANNEL_PROPERTY_TYPE));
            prop.insert(Value::from(VALUE_KEY), serde_yaml::to_value(entry)?);
            properties.push(Value::Mapping(prop));
        }

        Ok(())
    }
}
