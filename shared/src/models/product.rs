//! Product catalog models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bottled product stocked by the bar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub category: String,
    pub sub_category: String,
    pub name: String,
    /// Fixed bottle size used to derive milliliter quantities
    pub ml_per_bottle: i32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// "Category / Sub-category / Name" label used in reports
    pub fn display_label(&self) -> String {
        format!("{} / {} / {}", self.category, self.sub_category, self.name)
    }
}
