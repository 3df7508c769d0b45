//! Serde adapter that writes a [`Decimal`] as a bare JSON number.
//!
//! Whole values are emitted as integers (`50000`), everything else as a
//! float (`1234.5`). Reading accepts any JSON integer or float that fits in
//! a `Decimal` (magnitude below about 7.9e28); larger values are reported as
//! out of range.
//!
//! ```
//! use rust_decimal::Decimal;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Body {
//!     #[serde(with = "tax_core::json_number")]
//!     income: Decimal,
//! }
//! ```

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};

pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.fract().is_zero() {
        if let Some(whole) = value.to_i64() {
            return serializer.serialize_i64(whole);
        }
    }

    match value.to_f64() {
        Some(float) => serializer.serialize_f64(float),
        None => Err(serde::ser::Error::custom(format!(
            "decimal {value} cannot be represented as a JSON number"
        ))),
    }
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(NumberVisitor)
}

struct NumberVisitor;

impl Visitor<'_> for NumberVisitor {
    type Value = Decimal;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON number")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Decimal, E> {
        Ok(Decimal::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Decimal, E> {
        Ok(Decimal::from(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Decimal, E> {
        Decimal::try_from(v)
            .map(|d| d.normalize())
            .map_err(|e| E::custom(format!("number {v} out of range: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Wrapper {
        #[serde(with = "crate::models::json_number")]
        value: Decimal,
    }

    fn to_json(value: Decimal) -> String {
        serde_json::to_string(&Wrapper { value }).expect("serialize")
    }

    fn from_json(json: &str) -> Result<Decimal, serde_json::Error> {
        serde_json::from_str::<Wrapper>(json).map(|w| w.value)
    }

    #[test]
    fn whole_values_serialize_as_integers() {
        assert_eq!(to_json(dec!(50000)), r#"{"value":50000}"#);
        assert_eq!(to_json(dec!(50000.00)), r#"{"value":50000}"#);
        assert_eq!(to_json(dec!(-12)), r#"{"value":-12}"#);
    }

    #[test]
    fn fractional_values_serialize_as_floats() {
        assert_eq!(to_json(dec!(1234.5)), r#"{"value":1234.5}"#);
    }

    #[test]
    fn integers_deserialize_exactly() {
        assert_eq!(from_json(r#"{"value":7500}"#).unwrap(), dec!(7500));
    }

    #[test]
    fn floats_deserialize_normalized() {
        let value = from_json(r#"{"value":7500.0}"#).unwrap();

        assert_eq!(value, dec!(7500));
        assert_eq!(value.to_string(), "7500");
    }

    #[test]
    fn fractional_floats_deserialize() {
        assert_eq!(from_json(r#"{"value":32500.25}"#).unwrap(), dec!(32500.25));
    }

    #[test]
    fn numbers_beyond_decimal_range_report_range() {
        let err = from_json(r#"{"value":1e30}"#).unwrap_err();

        assert!(err.to_string().contains("out of range"), "got: {err}");
    }

    #[test]
    fn strings_are_rejected() {
        assert!(from_json(r#"{"value":"7500"}"#).is_err());
    }

    #[test]
    fn null_is_rejected() {
        assert!(from_json(r#"{"value":null}"#).is_err());
    }
}
