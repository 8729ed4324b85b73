pub mod dataset;
pub mod enums;
pub mod lenient;
pub mod survey;

pub use dataset::DatasetRow;
pub use enums::{ActivityLevel, InvalidEnum, PcosStatus, RiskLevel, StressLevel};
pub use lenient::{Lenient, LenientParse};
pub use survey::{FieldError, HealthRecord, SurveyPayload, SymptomSet, ValidationError};
