//! Recommendation Filter.
//!
//! Maps (city, severity, symptoms) to a practitioner shortlist drawn from the
//! static directory, plus fixed guidance text for the response.

pub mod directory;

use serde::Serialize;

use crate::models::{RiskLevel, SymptomSet};

pub use directory::{CityListing, DirectoryError, Helplines, Practitioner, PractitionerDirectory};

/// Shortlist size after backfill.
pub const MAX_PRIMARY: usize = 3;

/// Below this many matches the shortlist is backfilled from nearby cities.
const MIN_LOCAL_MATCHES: usize = 2;

/// Nearby cities consulted during backfill.
const MAX_BACKFILL_CITIES: usize = 2;

const BOOKING_TIPS: [&str; 6] = [
    "Call during morning hours (9-11 AM) for better availability",
    "Mention 'PCOS consultation' when booking to get adequate time slot",
    "Prepare your symptom history and menstrual cycle data before visit",
    "Ask if they need any prior blood tests or ultrasound",
    "Check if the doctor accepts your health insurance",
    "Request for first available appointment for urgent cases",
];

const QUESTIONS_TO_ASK: [&str; 8] = [
    "Do I need hormone level tests (LH, FSH, testosterone)?",
    "Should I get an ultrasound to check for ovarian cysts?",
    "What lifestyle changes would you recommend?",
    "Are there medications that might help regulate my cycle?",
    "Should I see a nutritionist or endocrinologist?",
    "What are my options if I'm trying to conceive?",
    "How often should I come for follow-up appointments?",
    "Are there any warning signs I should watch for?",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationBundle {
    pub primary_doctors: Vec<Practitioner>,
    pub all_doctors_in_city: Vec<Practitioner>,
    pub nearby_cities: Vec<String>,
    pub helplines: Helplines,
    pub urgent_care_message: &'static str,
    pub booking_tips: Vec<&'static str>,
    pub questions_to_ask: Vec<&'static str>,
}

/// A name-search hit, tagged with the city it is listed under.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectoryMatch {
    #[serde(flatten)]
    pub practitioner: Practitioner,
    pub city: String,
}

impl PractitionerDirectory {
    /// Build the recommendation bundle for a city and severity.
    pub fn get_recommendations(
        &self,
        city: &str,
        severity: RiskLevel,
        symptoms: &SymptomSet,
    ) -> RecommendationBundle {
        let city = title_case(city.trim());
        let local = self.practitioners_in(&city);
        let nearby = self.nearby_cities(&city);
        let needs_specialist = severity == RiskLevel::High || symptoms.contains("infertility");

        let mut primary = filter_by_severity(local, needs_specialist);
        if primary.len() < MIN_LOCAL_MATCHES {
            for near in nearby.iter().take(MAX_BACKFILL_CITIES) {
                let candidates = filter_by_severity(self.practitioners_in(near), needs_specialist);
                primary.extend(candidates.into_iter().next());
            }
        }
        primary.truncate(MAX_PRIMARY);

        tracing::debug!(
            city = %city,
            severity = %severity,
            local = local.len(),
            primary = primary.len(),
            "Practitioner shortlist built"
        );

        RecommendationBundle {
            primary_doctors: primary,
            all_doctors_in_city: local.to_vec(),
            nearby_cities: nearby,
            helplines: self.helplines.clone(),
            urgent_care_message: urgency_message(severity),
            booking_tips: BOOKING_TIPS.to_vec(),
            questions_to_ask: QUESTIONS_TO_ASK.to_vec(),
        }
    }

    /// Proximity-mapped cities for an already-normalized city name.
    pub fn nearby_cities(&self, city: &str) -> Vec<String> {
        match self.nearby.get(city) {
            Some(near) => near.clone(),
            None => directory::DEFAULT_NEARBY.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn all_cities(&self) -> Vec<String> {
        self.cities.iter().map(|listing| listing.city.clone()).collect()
    }

    /// Case-insensitive substring search over practitioner names.
    pub fn search_by_name(&self, name: &str) -> Vec<DirectoryMatch> {
        let needle = name.to_lowercase();
        self.cities
            .iter()
            .flat_map(|listing| {
                listing
                    .practitioners
                    .iter()
                    .filter(|p| p.name.to_lowercase().contains(&needle))
                    .map(|p| DirectoryMatch { practitioner: p.clone(), city: listing.city.clone() })
            })
            .collect()
    }
}

pub fn urgency_message(severity: RiskLevel) -> &'static str {
    match severity {
        RiskLevel::High => {
            "⚠️ IMPORTANT: Based on your symptoms, please schedule an appointment within 1-2 weeks. \
             If experiencing severe pain or heavy bleeding, visit emergency care immediately."
        }
        RiskLevel::Moderate => {
            "📋 RECOMMENDED: Schedule a consultation within 4-6 weeks to discuss your symptoms \
             and get proper diagnosis."
        }
        RiskLevel::Low => {
            "✅ Your symptoms appear manageable. Schedule a routine checkup within 2-3 months \
             for monitoring."
        }
    }
}

/// Specialists only when `needs_specialist`, then rating descending.
/// The sort is stable, so equal ratings keep directory order.
fn filter_by_severity(practitioners: &[Practitioner], needs_specialist: bool) -> Vec<Practitioner> {
    let mut result: Vec<Practitioner> = practitioners
        .iter()
        .filter(|p| !needs_specialist || is_specialist(p))
        .cloned()
        .collect();
    result.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    result
}

fn is_specialist(p: &Practitioner) -> bool {
    p.specialty.contains("Specialist") || p.specialty.contains("Endocrinologist")
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}
