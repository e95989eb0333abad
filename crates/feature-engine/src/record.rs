//! Per-Dataset Metafeature Record

use crate::extractor::Metafeatures;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Reserved key holding the dataset name
pub const NAME_KEY: &str = "name";

/// Metafeatures of one dataset, tagged with its logical name.
///
/// Serializes as a flat JSON object: metafeatures in name order, then `"name"`.
#[derive(Debug, Clone, PartialEq)]
pub struct MetafeatureRecord {
    pub name: String,
    pub metafeatures: Metafeatures,
}

impl MetafeatureRecord {
    pub fn new(name: impl Into<String>, metafeatures: Metafeatures) -> Self {
        Self {
            name: name.into(),
            metafeatures,
        }
    }
}

impl Serialize for MetafeatureRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let shadowed = self.metafeatures.contains_key(NAME_KEY);
        let len = self.metafeatures.len() + usize::from(!shadowed);
        let mut map = serializer.serialize_map(Some(len))?;
        for (key, value) in self.metafeatures.iter().filter(|(k, _)| k.as_str() != NAME_KEY) {
            map.serialize_entry(key, value)?;
        }
        map.serialize_entry(NAME_KEY, &self.name)?;
        map.end()
    }
}
