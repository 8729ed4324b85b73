use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid value for {field}: {value}")]
pub struct InvalidEnum {
    pub field: String,
    pub value: String,
}

/// Macro to generate enum with as_str + label + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal, $label:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }

            /// Human-readable label shown in findings.
            pub fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidEnum;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(RiskLevel {
    Low => "low", "Low",
    Moderate => "moderate", "Moderate",
    High => "high", "High",
});

str_enum!(StressLevel {
    Low => "low", "Low",
    Moderate => "moderate", "Moderate",
    High => "high", "High",
});

str_enum!(ActivityLevel {
    Sedentary => "sedentary", "Sedentary",
    Light => "light", "Lightly active",
    Moderate => "moderate", "Moderately active",
    Active => "active", "Very active",
});

str_enum!(PcosStatus {
    Diagnosed => "diagnosed", "Already diagnosed with PCOS",
    Suspected => "suspected", "Suspected PCOS",
    FamilyHistory => "family_history", "Family history of PCOS",
    NotDiagnosed => "not_diagnosed", "Not diagnosed",
});
