//! Learning module records and the fixed category list.
//!
//! # Invariants
//! - `category_index` is a position in [`LearningCategory::fixed`]; an
//!   out-of-range index is kept as-is and resolves to no category.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningCategory {
    pub id: String,
    pub name: String,
    pub category_index: i32,
}

impl LearningCategory {
    fn new(id: &str, name: &str, category_index: i32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            category_index,
        }
    }

    /// The hardcoded category list modules index into.
    pub fn fixed() -> Vec<LearningCategory> {
        vec![
            Self::new("jobs", "Jobs & Career", 0),
            Self::new("life", "Life Skills", 1),
            Self::new("social", "Social Skills", 2),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningModule {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Free text such as `"15 min"`.
    pub duration: String,
    pub category_index: i32,
    /// Nominally `0.0..=1.0`.
    #[serde(default)]
    pub progress: f32,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub external_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub price: Option<i32>,
}

impl LearningModule {
    pub fn is_finished(&self) -> bool {
        self.progress >= 1.0
    }

    pub fn is_started(&self) -> bool {
        self.progress > 0.0
    }

    /// Whole percent shown on progress bars (`0.55` -> `55`).
    pub fn percent_complete(&self) -> i32 {
        (self.progress * 100.0) as i32
    }
}
