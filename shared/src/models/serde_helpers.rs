//! Serde helpers for admin form payloads
//!
//! Admin forms send parent ids as numbers, numeric strings, `""` (no parent)
//! or `null`. The id helpers normalize all of them to `i64`; [`nullable`]
//! gives any other update field the same keep / clear / set semantics.

use serde::{Deserialize, Deserializer};

/// Internal helper: accepts `123`, `"123"`, `""` and `null`
#[derive(Debug, Clone, Copy)]
struct FlexibleId(Option<i64>);

impl<'de> Deserialize<'de> for FlexibleId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};
        use std::fmt;

        struct FlexibleVisitor;

        impl<'de> Visitor<'de> for FlexibleVisitor {
            type Value = FlexibleId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an integer id, a numeric string, \"\" or null")
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(FlexibleId(Some(value)))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                i64::try_from(value)
                    .map(|v| FlexibleId(Some(v)))
                    .map_err(|_| de::Error::custom(format!("id out of range: {}", value)))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Ok(FlexibleId(None));
                }
                trimmed
                    .parse::<i64>()
                    .map(|v| FlexibleId(Some(v)))
                    .map_err(|_| de::Error::custom(format!("invalid id: {}", value)))
            }

            fn visit_none<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(FlexibleId(None))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(FlexibleId(None))
            }
        }

        deserializer.deserialize_any(FlexibleVisitor)
    }
}

/// Deserialize an optional id (`""` and `null` both mean "none")
pub fn optional_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    FlexibleId::deserialize(deserializer).map(|id| id.0)
}

/// Deserialize a tri-state id for update payloads.
///
/// Use together with `#[serde(default)]`: a missing field stays `None`
/// (keep current value), `null`/`""` becomes `Some(None)` (clear), a value
/// becomes `Some(Some(id))`.
pub fn nullable_id<'de, D>(deserializer: D) -> Result<Option<Option<i64>>, D::Error>
where
    D: Deserializer<'de>,
{
    FlexibleId::deserialize(deserializer).map(|id| Some(id.0))
}

/// Deserialize a tri-state update field: with `#[serde(default)]` a missing
/// field stays `None`, `null` becomes `Some(None)`, a value `Some(Some(v))`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Create {
        #[serde(default, deserialize_with = "optional_id")]
        parent_id: Option<i64>,
    }

    #[derive(Debug, Deserialize)]
    struct Update {
        #[serde(default, deserialize_with = "nullable_id")]
        parent_id: Option<Option<i64>>,
    }

    #[test]
    fn test_optional_id_forms() {
        let c: Create = serde_json::from_str(r#"{"parent_id": 7}"#).unwrap();
        assert_eq!(c.parent_id, Some(7));
        let c: Create = serde_json::from_str(r#"{"parent_id": "7"}"#).unwrap();
        assert_eq!(c.parent_id, Some(7));
        let c: Create = serde_json::from_str(r#"{"parent_id": ""}"#).unwrap();
        assert_eq!(c.parent_id, None);
        let c: Create = serde_json::from_str(r#"{"parent_id": null}"#).unwrap();
        assert_eq!(c.parent_id, None);
        let c: Create = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(c.parent_id, None);
        assert!(serde_json::from_str::<Create>(r#"{"parent_id": "abc"}"#).is_err());
    }

    #[test]
    fn test_nullable_id_tri_state() {
        let u: Update = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(u.parent_id, None);
        let u: Update = serde_json::from_str(r#"{"parent_id": null}"#).unwrap();
        assert_eq!(u.parent_id, Some(None));
        let u: Update = serde_json::from_str(r#"{"parent_id": ""}"#).unwrap();
        assert_eq!(u.parent_id, Some(None));
        let u: Update = serde_json::from_str(r#"{"parent_id": 42}"#).unwrap();
        assert_eq!(u.parent_id, Some(Some(42)));
    }

    #[derive(Debug, Deserialize)]
    struct Price {
        #[serde(default, deserialize_with = "nullable")]
        compare_at: Option<Option<f64>>,
    }

    #[test]
    fn test_nullable_tri_state() {
        let p: Price = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(p.compare_at, None);
        let p: Price = serde_json::from_str(r#"{"compare_at": null}"#).unwrap();
        assert_eq!(p.compare_at, Some(None));
        let p: Price = serde_json::from_str(r#"{"compare_at": 59.9}"#).unwrap();
        assert_eq!(p.compare_at, Some(Some(59.9)));
    }
}
