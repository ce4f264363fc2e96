//! Cell values and original-value snapshots.
//!
//! A cell value is any JSON-representable value. Snapshots are the compact
//! serialized form; object keys keep insertion order, so two objects with the
//! same entries in a different order compare as different.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CellError;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellValue(Value);

impl CellValue {
    pub const fn null() -> Self {
        CellValue(Value::Null)
    }

    pub fn text(s: impl Into<String>) -> Self {
        CellValue(Value::String(s.into()))
    }

    pub fn boolean(b: bool) -> Self {
        CellValue(Value::Bool(b))
    }

    /// Numbers must be finite; NaN and infinities have no JSON form.
    pub fn number(n: f64) -> Result<Self, CellError> {
        serde_json::Number::from_f64(n)
            .map(|n| CellValue(Value::Number(n)))
            .ok_or_else(|| CellError::UnsupportedValue(format!("non-finite number {n}")))
    }

    /// Convert any serializable host value.
    ///
    /// Note that serde maps a non-finite `f64` to null; use [`CellValue::number`]
    /// when the input may be NaN.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, CellError> {
        serde_json::to_value(value)
            .map(CellValue)
            .map_err(|e| CellError::UnsupportedValue(e.to_string()))
    }

    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }

    pub fn as_json(&self) -> &Value {
        &self.0
    }

    pub fn into_json(self) -> Value {
        self.0
    }

    pub fn as_str(&self) -> Option<&str> {
        self.0.as_str()
    }

    /// Plain text for display: strings unquoted, null empty, everything else JSON.
    pub fn to_display_string(&self) -> String {
        match &self.0 {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    fn serialized(&self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}

impl From<Value> for CellValue {
    fn from(value: Value) -> Self {
        CellValue(value)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::text(s)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::text(s)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::boolean(b)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue(Value::from(n))
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or_else(CellValue::null, Into::into)
    }
}

/// Serialized copy of a value taken when a cell enters View or Load.
///
/// Absent and null values share the canonical `null` form, so an untouched
/// empty cell never reads as dirty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot(String);

impl Snapshot {
    pub fn capture(value: &CellValue) -> Self {
        Snapshot(value.serialized())
    }

    /// True when `value` serializes identically to the snapshot.
    pub fn matches(&self, value: &CellValue) -> bool {
        self.0 == value.serialized()
    }

    pub fn restore(&self) -> Result<CellValue, CellError> {
        serde_json::from_str(&self.0)
            .map(CellValue)
            .map_err(|e| CellError::Snapshot(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[test]
    fn test_snapshot_deep_equality() {
        let a = CellValue::from(json!({"tags": ["x", "y"], "n": 1}));
        let b = CellValue::from(json!({"tags": ["x", "y"], "n": 1}));
        assert!(Snapshot::capture(&a).matches(&b));

        let c = CellValue::from(json!({"tags": ["y", "x"], "n": 1}));
        assert!(!Snapshot::capture(&a).matches(&c));
    }

    #[test]
    fn test_snapshot_is_order_preserving() {
        let a: CellValue = serde_json::from_str(r#"{"a":1,"b":2}"#).unwrap();
        let b: CellValue = serde_json::from_str(r#"{"b":2,"a":1}"#).unwrap();
        assert!(!Snapshot::capture(&a).matches(&b));
    }

    #[test]
    fn test_null_and_absent_share_canonical_form() {
        let absent: CellValue = Option::<String>::None.into();
        assert!(Snapshot::capture(&absent).matches(&CellValue::null()));
        assert_eq!(Snapshot::capture(&absent).as_str(), "null");
    }

    #[test]
    fn test_restore_round_trips() {
        let value = CellValue::from(json!([1, "two", {"three": 3.5}, null, true]));
        let restored = Snapshot::capture(&value).restore().unwrap();
        assert_eq!(restored, value);
    }

    #[test]
    fn test_restore_floats_bit_exact() {
        for n in [1.0715660391465826e-75, 0.1 + 0.2, 5e-324, f64::MAX, -2.2250738585072014e-308] {
            let value = CellValue::number(n).unwrap();
            let restored = Snapshot::capture(&value).restore().unwrap();
            assert_eq!(restored, value);
            assert_eq!(restored.as_json().as_f64().map(f64::to_bits), Some(n.to_bits()));
        }
    }

    #[test]
    fn test_non_finite_number_is_unsupported() {
        assert!(matches!(
            CellValue::number(f64::NAN),
            Err(CellError::UnsupportedValue(_))
        ));
        assert!(CellValue::number(f64::INFINITY).is_err());
        assert_eq!(CellValue::number(2.5).unwrap().as_json(), &json!(2.5));
    }

    #[test]
    fn test_non_string_map_keys_are_unsupported() {
        let mut map = BTreeMap::new();
        map.insert((1, 2), "pair");
        let err = CellValue::from_serialize(&map).unwrap_err();
        assert!(err.to_string().starts_with("unsupported value type"));
    }

    #[test]
    fn test_display_string() {
        assert_eq!(CellValue::null().to_display_string(), "");
        assert_eq!(CellValue::text("hi").to_display_string(), "hi");
        assert_eq!(CellValue::from(42).to_display_string(), "42");
        assert_eq!(CellValue::boolean(true).to_string(), "true");
    }
}
