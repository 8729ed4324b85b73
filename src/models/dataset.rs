use serde::{Deserialize, Serialize};

/// One row of the historical PCOS survey dataset.
///
/// Columns are kept as the raw text the dataset was published with
/// (`"Yes"`/`"No"` flags, digit strings for numbers).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetRow {
    pub age: Option<String>,
    pub cycle_length: Option<String>,
    pub period_length: Option<String>,
    pub pcos: Option<String>,
    pub irregular_missed_periods: Option<String>,
    pub hair_growth_chin: Option<String>,
    pub acne_or_skin_tags: Option<String>,
    pub weight_change: Option<String>,
    pub hair_thinning_or_hair_loss: Option<String>,
    pub always_tired: Option<String>,
}

impl DatasetRow {
    /// Symptom indicator columns, in dataset column order.
    pub fn symptom_indicators(&self) -> [(&'static str, Option<&str>); 6] {
        [
            ("irregular_missed_periods", self.irregular_missed_periods.as_deref()),
            ("hair_growth_chin", self.hair_growth_chin.as_deref()),
            ("acne_or_skin_tags", self.acne_or_skin_tags.as_deref()),
            ("weight_change", self.weight_change.as_deref()),
            ("hair_thinning_or_hair_loss", self.hair_thinning_or_hair_loss.as_deref()),
            ("always_tired", self.always_tired.as_deref()),
        ]
    }
}
