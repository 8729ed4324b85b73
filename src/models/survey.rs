//! Survey input types.
//!
//! `SurveyPayload` is what the form posts: every field optional and decoded
//! leniently. Step-mode analysis reads it directly. Full-mode analysis first
//! turns it into a `HealthRecord` through `validate`, which reports every
//! missing or out-of-range required field at once.

use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::enums::{ActivityLevel, PcosStatus, StressLevel};
use super::lenient::{Lenient, LenientParse};

pub const AGE_RANGE: RangeInclusive<i64> = 10..=80;
pub const CYCLE_LENGTH_RANGE: RangeInclusive<i64> = 15..=120;
pub const PERIOD_LENGTH_RANGE: RangeInclusive<i64> = 1..=30;

// ═══════════════════════════════════════════
// SymptomSet
// ═══════════════════════════════════════════

/// Unique symptom tags in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SymptomSet(Vec<String>);

impl SymptomSet {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Vec::new();
        for tag in tags {
            let tag = tag.as_ref().trim();
            if !tag.is_empty() && !set.iter().any(|t: &String| t == tag) {
                set.push(tag.to_string());
            }
        }
        Self(set)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    pub fn contains_any(&self, tags: &[&str]) -> bool {
        tags.iter().any(|t| self.contains(t))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl From<Vec<String>> for SymptomSet {
    fn from(tags: Vec<String>) -> Self {
        Self::new(tags)
    }
}

impl From<SymptomSet> for Vec<String> {
    fn from(set: SymptomSet) -> Self {
        set.0
    }
}

impl LenientParse for SymptomSet {
    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Array(items) => Some(Self::new(items.iter().filter_map(Value::as_str))),
            Value::String(s) => Some(Self::new(s.split(','))),
            _ => None,
        }
    }

    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

// ═══════════════════════════════════════════
// SurveyPayload: raw form data
// ═══════════════════════════════════════════

/// Raw survey fields as posted by the form. Shared by the per-step
/// endpoint (partial data) and the full assessment endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SurveyPayload {
    pub age: Lenient<i64>,
    /// Kilograms.
    pub weight: Lenient<f64>,
    /// Centimetres.
    pub height: Lenient<f64>,
    pub cycle_length: Lenient<i64>,
    pub period_length: Lenient<i64>,
    pub symptoms: Lenient<SymptomSet>,
    pub activity: Lenient<String>,
    /// Hours per night.
    pub sleep: Lenient<f64>,
    pub stress: Lenient<String>,
    pub city: Lenient<String>,
    #[serde(alias = "diagnosis_status")]
    pub pcos: Lenient<String>,
}

// ═══════════════════════════════════════════
// HealthRecord: validated full-mode input
// ═══════════════════════════════════════════

/// A validated assessment input. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRecord {
    pub age: u32,
    pub cycle_length: u32,
    pub period_length: u32,
    pub symptoms: SymptomSet,
    pub activity: Option<ActivityLevel>,
    pub sleep: Option<f64>,
    pub stress: Option<StressLevel>,
    pub city: Option<String>,
    pub pcos_status: Option<PcosStatus>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
}

impl HealthRecord {
    /// Record with only the required fields set.
    pub fn new(age: u32, cycle_length: u32, period_length: u32, symptoms: SymptomSet) -> Self {
        Self {
            age,
            cycle_length,
            period_length,
            symptoms,
            activity: None,
            sleep: None,
            stress: None,
            city: None,
            pcos_status: None,
            weight: None,
            height: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid assessment input ({} field(s))", .fields.len())]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

impl SurveyPayload {
    /// Validate the required fields and build a `HealthRecord`.
    ///
    /// Required: `age`, `cycle_length`, `period_length`, `symptoms` (may be an
    /// empty list). Optional fields that fail to decode are dropped.
    /// `sleep` keeps a present zero; weight and height treat zero as unknown.
    pub fn validate(&self) -> Result<HealthRecord, ValidationError> {
        let mut errors = Vec::new();

        let age = required_int("age", &self.age, AGE_RANGE, &mut errors);
        let cycle_length =
            required_int("cycle_length", &self.cycle_length, CYCLE_LENGTH_RANGE, &mut errors);
        let period_length =
            required_int("period_length", &self.period_length, PERIOD_LENGTH_RANGE, &mut errors);

        let symptoms = match &self.symptoms {
            Lenient::Value(set) => Some(set.clone()),
            Lenient::Missing => {
                errors.push(FieldError { field: "symptoms", message: "is required".into() });
                None
            }
            Lenient::Malformed => {
                errors.push(FieldError {
                    field: "symptoms",
                    message: "must be a list of symptom tags".into(),
                });
                None
            }
        };

        match (age, cycle_length, period_length, symptoms) {
            (Some(age), Some(cycle_length), Some(period_length), Some(symptoms))
                if errors.is_empty() =>
            {
                Ok(HealthRecord {
                    age,
                    cycle_length,
                    period_length,
                    symptoms,
                    activity: parse_choice(&self.activity),
                    // A reported 0 hours is an answer here, unlike step mode.
                    sleep: self.sleep.as_ref().copied(),
                    stress: parse_choice(&self.stress),
                    city: self.city.filled().map(|c| c.trim().to_string()),
                    pcos_status: parse_choice(&self.pcos),
                    weight: self.weight.filled(),
                    height: self.height.filled(),
                })
            }
            _ => Err(ValidationError { fields: errors }),
        }
    }
}

fn required_int(
    field: &'static str,
    value: &Lenient<i64>,
    range: RangeInclusive<i64>,
    errors: &mut Vec<FieldError>,
) -> Option<u32> {
    let message = match value {
        Lenient::Value(v) if range.contains(v) => return u32::try_from(*v).ok(),
        Lenient::Value(_) => format!("must be between {} and {}", range.start(), range.end()),
        Lenient::Missing => "is required".to_string(),
        Lenient::Malformed => "must be a whole number".to_string(),
    };
    errors.push(FieldError { field, message });
    None
}

fn parse_choice<T: FromStr>(value: &Lenient<String>) -> Option<T> {
    value.as_ref().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(v: Value) -> SurveyPayload {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn symptom_set_dedupes_and_trims() {
        let set = SymptomSet::new(["acne", " acne", "", "hirsutism", "acne"]);
        assert_eq!(set.len(), 2);
        assert!(set.contains("acne"));
        assert!(set.contains("hirsutism"));
    }

    #[test]
    fn symptoms_accept_comma_separated_string() {
        let p = payload(json!({"symptoms": "acne,weight_gain, acne"}));
        let set = p.symptoms.value().unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["acne", "weight_gain"]);
    }

    #[test]
    fn valid_payload_builds_record() {
        let p = payload(json!({
            "age": 24,
            "cycle_length": "38",
            "period_length": 6,
            "symptoms": ["acne"],
            "stress": "high",
            "activity": "light",
            "sleep": "5.5",
            "city": " Pune ",
            "pcos": "suspected"
        }));
        let record = p.validate().unwrap();
        assert_eq!(record.age, 24);
        assert_eq!(record.cycle_length, 38);
        assert_eq!(record.stress, Some(StressLevel::High));
        assert_eq!(record.activity, Some(ActivityLevel::Light));
        assert_eq!(record.sleep, Some(5.5));
        assert_eq!(record.city.as_deref(), Some("Pune"));
        assert_eq!(record.pcos_status, Some(PcosStatus::Suspected));
    }

    #[test]
    fn validation_lists_every_offending_field() {
        let p = payload(json!({"age": 5, "cycle_length": "abc"}));
        let err = p.validate().unwrap_err();
        let fields: Vec<_> = err.fields.iter().map(|f| f.field).collect();
        assert_eq!(fields, vec!["age", "cycle_length", "period_length", "symptoms"]);
        assert_eq!(err.fields[0].message, "must be between 10 and 80");
        assert_eq!(err.fields[1].message, "must be a whole number");
        assert_eq!(err.fields[2].message, "is required");
    }

    #[test]
    fn empty_symptom_list_is_valid() {
        let p = payload(json!({"age": 30, "cycle_length": 28, "period_length": 5, "symptoms": []}));
        assert!(p.validate().unwrap().symptoms.is_empty());
    }

    #[test]
    fn malformed_optional_fields_are_dropped() {
        let p = payload(json!({
            "age": 30, "cycle_length": 28, "period_length": 5, "symptoms": [],
            "sleep": "lots", "stress": "extreme", "weight": null
        }));
        let record = p.validate().unwrap();
        assert_eq!(record.sleep, None);
        assert_eq!(record.stress, None);
        assert_eq!(record.weight, None);
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let p = payload(json!({"age": 80, "cycle_length": 15, "period_length": 30, "symptoms": []}));
        assert!(p.validate().is_ok());
        let p = payload(json!({"age": 81, "cycle_length": 121, "period_length": 0, "symptoms": []}));
        assert_eq!(p.validate().unwrap_err().fields.len(), 3);
    }

    #[test]
    fn zero_sleep_is_kept_in_full_mode() {
        let p = payload(json!({
            "age": 40, "cycle_length": 28, "period_length": 5, "symptoms": [],
            "sleep": 0, "weight": 0
        }));
        let record = p.validate().unwrap();
        assert_eq!(record.sleep, Some(0.0));
        assert_eq!(record.weight, None);
    }
}
