// src/core/serde_helpers.rs
//! Serde adapters for loosely typed JSON written by the web editor.

use serde::de::{self, Deserializer, Visitor};
use std::fmt;

/// Deserialize a JSON string or number into a `String`.
///
/// Slot ids and levels show up as either `"3"` or `3` depending on who wrote
/// the document.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrNumber;

    impl Visitor<'_> for StringOrNumber {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a string or a number")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(StringOrNumber)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Slot {
        #[serde(deserialize_with = "string_or_number")]
        id: String,
    }

    #[test]
    fn accepts_both_shapes() {
        let a: Slot = serde_json::from_str(r#"{"id": "s1"}"#).unwrap();
        let b: Slot = serde_json::from_str(r#"{"id": 7}"#).unwrap();
        assert_eq!(a.id, "s1");
        assert_eq!(b.id, "7");
    }

    #[test]
    fn rejects_other_shapes() {
        assert!(serde_json::from_str::<Slot>(r#"{"id": [1]}"#).is_err());
    }
}
