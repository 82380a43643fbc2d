//! Typed key/value payloads.
//!
//! A [`DataMap`] is the unit written to a channel path and delivered inside a
//! change event. Typed getters distinguish "field absent" (fine, callers
//! merge per field) from "field present with the wrong type" (malformed).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{AssetToken, SyncError};

/// A single typed payload value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    /// UTF-8 string.
    Str(String),
    /// 64-bit float.
    Double(f64),
    /// Reference to a binary asset.
    Asset(AssetToken),
}

/// An ordered mapping of field names to typed values.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataMap(BTreeMap<String, Value>);

impl DataMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a string field.
    pub fn put_str(&mut self, field: &str, value: impl Into<String>) -> &mut Self {
        self.0.insert(field.to_string(), Value::Str(value.into()));
        self
    }

    /// Insert a float field.
    pub fn put_f64(&mut self, field: &str, value: f64) -> &mut Self {
        self.0.insert(field.to_string(), Value::Double(value));
        self
    }

    /// Insert an asset reference field.
    pub fn put_asset(&mut self, field: &str, token: AssetToken) -> &mut Self {
        self.0.insert(field.to_string(), Value::Asset(token));
        self
    }

    /// Read a float field. `Ok(None)` when absent.
    pub fn get_f64(&self, field: &str) -> Result<Option<f64>, SyncError> {
        match self.0.get(field) {
            None => Ok(None),
            Some(Value::Double(v)) => Ok(Some(*v)),
            Some(_) => Err(SyncError::MalformedPayload {
                field: field.to_string(),
            }),
        }
    }

    /// Read a string field. `Ok(None)` when absent.
    pub fn get_str(&self, field: &str) -> Result<Option<&str>, SyncError> {
        match self.0.get(field) {
            None => Ok(None),
            Some(Value::Str(v)) => Ok(Some(v)),
            Some(_) => Err(SyncError::MalformedPayload {
                field: field.to_string(),
            }),
        }
    }

    /// Read an asset reference field. `Ok(None)` when absent.
    pub fn get_asset(&self, field: &str) -> Result<Option<AssetToken>, SyncError> {
        match self.0.get(field) {
            None => Ok(None),
            Some(Value::Asset(t)) => Ok(Some(*t)),
            Some(_) => Err(SyncError::MalformedPayload {
                field: field.to_string(),
            }),
        }
    }

    /// Whether the map has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Serialize to MessagePack bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SyncError> {
        rmp_serde::to_vec(self).map_err(SyncError::Serialization)
    }

    /// Deserialize from MessagePack bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SyncError> {
        rmp_serde::from_slice(bytes).map_err(SyncError::Deserialization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths;

    #[test]
    fn typed_getters_return_values() {
        let mut map = DataMap::new();
        map.put_f64(paths::FIELD_HIGH, 72.4)
            .put_str(paths::FIELD_NONCE, "abc");
        let token = AssetToken::new();
        map.put_asset(paths::FIELD_ICON, token);

        assert_eq!(map.get_f64(paths::FIELD_HIGH).unwrap(), Some(72.4));
        assert_eq!(map.get_str(paths::FIELD_NONCE).unwrap(), Some("abc"));
        assert_eq!(map.get_asset(paths::FIELD_ICON).unwrap(), Some(token));
    }

    #[test]
    fn absent_field_is_none_not_error() {
        let map = DataMap::new();
        assert_eq!(map.get_f64(paths::FIELD_HIGH).unwrap(), None);
        assert_eq!(map.get_str(paths::FIELD_NONCE).unwrap(), None);
        assert_eq!(map.get_asset(paths::FIELD_ICON).unwrap(), None);
    }

    #[test]
    fn wrong_type_is_malformed() {
        let mut map = DataMap::new();
        map.put_str(paths::FIELD_HIGH, "not a number");

        let err = map.get_f64(paths::FIELD_HIGH).unwrap_err();
        assert!(matches!(
            err,
            SyncError::MalformedPayload { field } if field == paths::FIELD_HIGH
        ));
    }

    #[test]
    fn wire_roundtrip() {
        let mut map = DataMap::new();
        map.put_f64(paths::FIELD_HIGH, 21.5)
            .put_f64(paths::FIELD_LOW, 9.0)
            .put_asset(paths::FIELD_ICON, AssetToken::new());

        let bytes = map.to_bytes().unwrap();
        let restored = DataMap::from_bytes(&bytes).unwrap();
        assert_eq!(map, restored);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(matches!(
            DataMap::from_bytes(&[0xFF, 0x00, 0x13]),
            Err(SyncError::Deserialization(_))
        ));
    }
}
