//! Practitioner directory data.
//!
//! The built-in tables cover seven cities. A JSON file with the same shape as
//! `PractitionerDirectory` can replace them at startup.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Failed to read directory file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid directory file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Directory has no cities")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Practitioner {
    pub name: String,
    pub specialty: String,
    pub hospital: String,
    pub phone: String,
    pub address: String,
    pub experience: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub expertise: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityListing {
    pub city: String,
    pub practitioners: Vec<Practitioner>,
}

/// City listings in display order, plus the proximity map and helplines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PractitionerDirectory {
    pub cities: Vec<CityListing>,
    #[serde(default)]
    pub nearby: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub helplines: Helplines,
}

/// Helpline name → number, in listing order. Serialised as a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Helplines(Vec<(String, String)>);

impl Helplines {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, number)| number.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }
}

impl<N: Into<String>, P: Into<String>> FromIterator<(N, P)> for Helplines {
    fn from_iter<I: IntoIterator<Item = (N, P)>>(iter: I) -> Self {
        let mut entries: Vec<(String, String)> = Vec::new();
        for (name, number) in iter {
            let name = name.into();
            let number = number.into();
            match entries.iter_mut().find(|(n, _)| *n == name) {
                Some(entry) => entry.1 = number,
                None => entries.push((name, number)),
            }
        }
        Self(entries)
    }
}

impl Serialize for Helplines {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(name, number)| (name, number)))
    }
}

impl<'de> Deserialize<'de> for Helplines {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct HelplinesVisitor;

        impl<'de> Visitor<'de> for HelplinesVisitor {
            type Value = Helplines;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of helpline names to numbers")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Helplines, A::Error> {
                let mut entries = Vec::new();
                while let Some((name, number)) = map.next_entry::<String, String>()? {
                    entries.push((name, number));
                }
                Ok(entries.into_iter().collect())
            }
        }

        deserializer.deserialize_map(HelplinesVisitor)
    }
}

impl PractitionerDirectory {
    pub fn builtin() -> Self {
        let cities = BUILTIN_CITIES
            .iter()
            .map(|(city, seeds)| CityListing {
                city: city.to_string(),
                practitioners: seeds.iter().map(Seed::to_practitioner).collect(),
            })
            .collect();

        let nearby = NEARBY
            .iter()
            .map(|(city, near)| (city.to_string(), near.iter().map(|c| c.to_string()).collect()))
            .collect();

        let helplines = HELPLINES.iter().copied().collect();

        Self { cities, nearby, helplines }
    }

    pub fn from_json_file(path: &Path) -> Result<Self, DirectoryError> {
        let bytes = std::fs::read(path)?;
        let directory: Self = serde_json::from_slice(&bytes)?;
        if directory.cities.is_empty() {
            return Err(DirectoryError::Empty);
        }
        tracing::info!(
            path = %path.display(),
            cities = directory.cities.len(),
            "Practitioner directory loaded"
        );
        Ok(directory)
    }

    /// Practitioners listed for `city` (exact match), in directory order.
    pub fn practitioners_in(&self, city: &str) -> &[Practitioner] {
        self.cities
            .iter()
            .find(|listing| listing.city == city)
            .map(|listing| listing.practitioners.as_slice())
            .unwrap_or(&[])
    }
}

// ═══════════════════════════════════════════
// Built-in tables
// ═══════════════════════════════════════════

struct Seed {
    name: &'static str,
    specialty: &'static str,
    hospital: &'static str,
    phone: &'static str,
    address: &'static str,
    experience: &'static str,
    rating: f64,
    expertise: &'static [&'static str],
}

impl Seed {
    fn to_practitioner(&self) -> Practitioner {
        Practitioner {
            name: self.name.into(),
            specialty: self.specialty.into(),
            hospital: self.hospital.into(),
            phone: self.phone.into(),
            address: self.address.into(),
            experience: self.experience.into(),
            rating: self.rating,
            expertise: self.expertise.iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// Fallback for cities missing from the proximity map.
pub const DEFAULT_NEARBY: [&str; 3] = ["Hyderabad", "Bangalore", "Chennai"];

const NEARBY: &[(&str, &[&str])] = &[
    ("Vijayawada", &["Hyderabad", "Chennai"]),
    ("Hyderabad", &["Bangalore", "Chennai"]),
    ("Bangalore", &["Chennai", "Hyderabad"]),
    ("Chennai", &["Bangalore", "Hyderabad"]),
    ("Pune", &["Mumbai", "Bangalore"]),
    ("Mumbai", &["Pune", "Bangalore"]),
    ("Delhi", &["Bangalore", "Chennai"]),
];

const HELPLINES: &[(&str, &str)] = &[
    ("National Health Helpline", "1800-180-1104"),
    ("Women's Helpline", "1091"),
    ("Apollo Hospitals Hotline", "1066"),
];

const BUILTIN_CITIES: &[(&str, &[Seed])] = &[
    (
        "Hyderabad",
        &[
            Seed {
                name: "Dr. Sunita Rao",
                specialty: "Gynecologist & PCOS Specialist",
                hospital: "Apollo Hospital",
                phone: "+91 40 3333 1234",
                address: "Jubilee Hills, Hyderabad",
                experience: "15+ years",
                rating: 4.8,
                expertise: &["PCOS", "Infertility", "Hormonal Disorders"],
            },
            Seed {
                name: "Dr. Rajeev Kumar",
                specialty: "Endocrinologist",
                hospital: "Care Hospitals",
                phone: "+91 40 6165 6789",
                address: "Banjara Hills, Hyderabad",
                experience: "12+ years",
                rating: 4.7,
                expertise: &["PCOS", "Diabetes", "Thyroid"],
            },
            Seed {
                name: "Dr. Priya Reddy",
                specialty: "Gynecologist",
                hospital: "Yashoda Hospitals",
                phone: "+91 40 4444 5678",
                address: "Secunderabad, Hyderabad",
                experience: "10+ years",
                rating: 4.6,
                expertise: &["PCOS", "Menstrual Disorders", "Women's Health"],
            },
        ],
    ),
    (
        "Vijayawada",
        &[
            Seed {
                name: "Dr. Lakshmi Devi",
                specialty: "Gynecologist & Fertility Specialist",
                hospital: "Manipal Hospital",
                phone: "+91 866 2429 999",
                address: "MG Road, Vijayawada",
                experience: "14+ years",
                rating: 4.7,
                expertise: &["PCOS", "IVF", "Infertility"],
            },
            Seed {
                name: "Dr. Srinivas Rao",
                specialty: "Endocrinologist",
                hospital: "Ramesh Hospitals",
                phone: "+91 866 6699 000",
                address: "Governorpet, Vijayawada",
                experience: "11+ years",
                rating: 4.5,
                expertise: &["PCOS", "Hormonal Imbalance", "Metabolic Disorders"],
            },
        ],
    ),
    (
        "Bangalore",
        &[
            Seed {
                name: "Dr. Meera Sharma",
                specialty: "Gynecologist & PCOS Specialist",
                hospital: "Fortis Hospital",
                phone: "+91 80 6621 4444",
                address: "Bannerghatta Road, Bangalore",
                experience: "18+ years",
                rating: 4.9,
                expertise: &["PCOS", "Endometriosis", "Reproductive Health"],
            },
            Seed {
                name: "Dr. Anand Krishnan",
                specialty: "Endocrinologist",
                hospital: "Columbia Asia Hospital",
                phone: "+91 80 6692 6565",
                address: "Whitefield, Bangalore",
                experience: "13+ years",
                rating: 4.7,
                expertise: &["PCOS", "Insulin Resistance", "Hormones"],
            },
        ],
    ),
    (
        "Chennai",
        &[
            Seed {
                name: "Dr. Kavitha Menon",
                specialty: "Gynecologist",
                hospital: "Apollo Hospital",
                phone: "+91 44 2829 3333",
                address: "Greams Road, Chennai",
                experience: "16+ years",
                rating: 4.8,
                expertise: &["PCOS", "Gynecological Surgery", "Fertility"],
            },
            Seed {
                name: "Dr. Ramesh Babu",
                specialty: "Endocrinologist",
                hospital: "MIOT Hospital",
                phone: "+91 44 4200 2288",
                address: "Manapakkam, Chennai",
                experience: "14+ years",
                rating: 4.6,
                expertise: &["PCOS", "Diabetes", "Thyroid Disorders"],
            },
        ],
    ),
    (
        "Delhi",
        &[
            Seed {
                name: "Dr. Anjali Kapoor",
                specialty: "Gynecologist & Fertility Expert",
                hospital: "Max Hospital",
                phone: "+91 11 2651 5050",
                address: "Saket, New Delhi",
                experience: "20+ years",
                rating: 4.9,
                expertise: &["PCOS", "IVF", "Laparoscopic Surgery"],
            },
            Seed {
                name: "Dr. Vikram Singh",
                specialty: "Endocrinologist",
                hospital: "Fortis Hospital",
                phone: "+91 11 4277 6222",
                address: "Vasant Kunj, New Delhi",
                experience: "15+ years",
                rating: 4.7,
                expertise: &["PCOS", "Hormonal Disorders", "Obesity"],
            },
        ],
    ),
    (
        "Mumbai",
        &[
            Seed {
                name: "Dr. Sneha Patil",
                specialty: "Gynecologist & PCOS Specialist",
                hospital: "Lilavati Hospital",
                phone: "+91 22 2640 0000",
                address: "Bandra West, Mumbai",
                experience: "17+ years",
                rating: 4.8,
                expertise: &["PCOS", "High-Risk Pregnancy", "Menopause"],
            },
            Seed {
                name: "Dr. Arun Deshmukh",
                specialty: "Endocrinologist",
                hospital: "Hinduja Hospital",
                phone: "+91 22 2445 1515",
                address: "Mahim, Mumbai",
                experience: "19+ years",
                rating: 4.9,
                expertise: &["PCOS", "Metabolism", "Endocrine Disorders"],
            },
        ],
    ),
    (
        "Pune",
        &[
            Seed {
                name: "Dr. Vaishali Joshi",
                specialty: "Gynecologist",
                hospital: "Ruby Hall Clinic",
                phone: "+91 20 6645 8888",
                address: "Pune Station, Pune",
                experience: "12+ years",
                rating: 4.6,
                expertise: &["PCOS", "Women's Health", "Reproductive Medicine"],
            },
            Seed {
                name: "Dr. Manish Kulkarni",
                specialty: "Endocrinologist",
                hospital: "Sahyadri Hospital",
                phone: "+91 20 6700 6000",
                address: "Deccan Gymkhana, Pune",
                experience: "11+ years",
                rating: 4.5,
                expertise: &["PCOS", "Thyroid", "Hormonal Health"],
            },
        ],
    ),
];
