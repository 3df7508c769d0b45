use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Body of a `POST /calculate-tax` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRequest {
    #[serde(with = "crate::models::json_number")]
    pub income: Decimal,
}

/// Successful `POST /calculate-tax` response.
///
/// Only `tax` is required. The service may echo the income back; an echo that
/// is not a number in `Decimal` range reads as `None` instead of failing the
/// whole response. Any other fields are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResponse {
    #[serde(with = "crate::models::json_number")]
    pub tax: Decimal,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "optional_number"
    )]
    pub income: Option<Decimal>,
}

impl TaxResponse {
    pub fn new(tax: Decimal) -> Self {
        Self { tax, income: None }
    }
}

mod optional_number {
    use std::fmt;

    use rust_decimal::Decimal;
    use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
    use serde::{Deserializer, Serializer};

    use crate::models::json_number;

    pub fn serialize<S>(value: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(v) => json_number::serialize(v, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(LenientNumber)
    }

    /// Reads a number when there is one and swallows anything else.
    struct LenientNumber;

    impl<'de> Visitor<'de> for LenientNumber {
        type Value = Option<Decimal>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("any JSON value")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(Decimal::from(v)))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(Decimal::from(v)))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(Decimal::try_from(v).ok().map(|d| d.normalize()))
        }

        fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_str<E: de::Error>(self, _: &str) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
            deserializer.deserialize_any(self)
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            while seq.next_element::<IgnoredAny>()?.is_some() {}
            Ok(None)
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn request_body_is_a_bare_number() {
        let body = serde_json::to_string(&TaxRequest {
            income: dec!(50000),
        })
        .unwrap();

        assert_eq!(body, r#"{"income":50000}"#);
    }

    #[test]
    fn response_ignores_unknown_fields() {
        let response: TaxResponse =
            serde_json::from_str(r#"{"tax":7500,"currency":"INR","note":"ok"}"#).unwrap();

        assert_eq!(response, TaxResponse::new(dec!(7500)));
    }

    #[test]
    fn response_reads_echoed_income() {
        let response: TaxResponse =
            serde_json::from_str(r#"{"income":600000.0,"tax":32500.0}"#).unwrap();

        assert_eq!(response.tax, dec!(32500));
        assert_eq!(response.income, Some(dec!(600000)));
    }

    #[test]
    fn non_numeric_income_echo_is_ignored() {
        for body in [
            r#"{"tax":7500,"income":"50000"}"#,
            r#"{"tax":7500,"income":null}"#,
            r#"{"tax":7500,"income":{"amount":50000}}"#,
            r#"{"tax":7500,"income":[50000]}"#,
            r#"{"tax":7500,"income":1e40}"#,
        ] {
            let response: TaxResponse = serde_json::from_str(body).unwrap();

            assert_eq!(response, TaxResponse::new(dec!(7500)), "body: {body}");
        }
    }

    #[test]
    fn response_without_tax_is_rejected() {
        let result = serde_json::from_str::<TaxResponse>(r#"{"income":50000}"#);

        assert!(result.is_err());
    }

    #[test]
    fn response_serializes_without_missing_income() {
        let json = serde_json::to_string(&TaxResponse::new(dec!(0))).unwrap();

        assert_eq!(json, r#"{"tax":0}"#);
    }
}
