//! Tolerant field decoding for untrusted survey payloads.
//!
//! Form clients send numbers as JSON numbers, as strings, or as whatever the
//! browser had in the input box. A bad value in one field must not reject the
//! whole payload: it decodes to `Lenient::Malformed` and the analysis skips the
//! finding that depends on it.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A field decoded from JSON that may be absent, valid, or unusable.
#[derive(Debug, Clone, PartialEq)]
pub enum Lenient<T> {
    Missing,
    Value(T),
    Malformed,
}

impl<T> Default for Lenient<T> {
    fn default() -> Self {
        Lenient::Missing
    }
}

impl<T> Lenient<T> {
    pub fn value(self) -> Option<T> {
        match self {
            Lenient::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_ref(&self) -> Option<&T> {
        match self {
            Lenient::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Lenient::Missing)
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Lenient::Malformed)
    }
}

impl<T: LenientParse + Clone> Lenient<T> {
    /// Value only when it is present and not the type's "empty" value.
    /// Form flows treat `0` and `""` the same as an unanswered question.
    pub fn filled(&self) -> Option<T> {
        self.as_ref().filter(|v| !v.is_blank()).cloned()
    }
}

impl<T> From<T> for Lenient<T> {
    fn from(value: T) -> Self {
        Lenient::Value(value)
    }
}

/// Conversion from an arbitrary JSON value into a typed field.
pub trait LenientParse: Sized {
    fn from_json(value: &Value) -> Option<Self>;

    fn is_blank(&self) -> bool;
}

impl LenientParse for i64 {
    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                    .map(|f| f.trunc() as i64)
            }),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn is_blank(&self) -> bool {
        *self == 0
    }
}

impl LenientParse for f64 {
    fn from_json(value: &Value) -> Option<Self> {
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        parsed.filter(|f: &f64| f.is_finite())
    }

    fn is_blank(&self) -> bool {
        *self == 0.0
    }
}

impl LenientParse for String {
    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s.clone()),
            _ => None,
        }
    }

    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl<'de, T: LenientParse> Deserialize<'de> for Lenient<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Null => Lenient::Missing,
            ref v => T::from_json(v).map(Lenient::Value).unwrap_or(Lenient::Malformed),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode<T: LenientParse>(v: Value) -> Lenient<T> {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn integers_accept_numbers_and_numeric_strings() {
        assert_eq!(decode::<i64>(json!(28)), Lenient::Value(28));
        assert_eq!(decode::<i64>(json!(" 31 ")), Lenient::Value(31));
        assert_eq!(decode::<i64>(json!(28.9)), Lenient::Value(28));
    }

    #[test]
    fn garbage_is_malformed_not_an_error() {
        assert_eq!(decode::<i64>(json!("twenty")), Lenient::Malformed);
        assert_eq!(decode::<i64>(json!([1, 2])), Lenient::Malformed);
        assert_eq!(decode::<f64>(json!({"h": 7})), Lenient::Malformed);
        assert_eq!(decode::<String>(json!(42)), Lenient::Malformed);
    }

    #[test]
    fn null_is_missing() {
        assert!(decode::<f64>(Value::Null).is_missing());
    }

    #[test]
    fn filled_treats_zero_and_empty_as_unanswered() {
        assert_eq!(Lenient::Value(0_i64).filled(), None);
        assert_eq!(Lenient::Value(String::from("  ")).filled(), None);
        assert_eq!(Lenient::Value(6.5_f64).filled(), Some(6.5));
        assert_eq!(Lenient::<f64>::Malformed.filled(), None);
    }

    #[test]
    fn missing_field_defaults_to_missing() {
        #[derive(Deserialize)]
        struct Probe {
            #[serde(default)]
            sleep: Lenient<f64>,
        }
        let probe: Probe = serde_json::from_value(json!({})).unwrap();
        assert!(probe.sleep.is_missing());
    }
}
