use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Body of a recommendation request.
///
/// Enum-like fields stay strings here; the server validates them so that an unknown value
/// produces a structured validation error instead of a generic JSON rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRequest {
    /// Age in years.
    pub age: u32,
    /// Body weight in kilograms.
    pub weight: f64,
    /// Height in meters.
    pub height: f64,
    /// "male" or "female".
    pub gender: String,
    /// "lose_weight", "maintain" or "muscle_gain".
    pub goal: String,
    /// "sedentary", "lightly_active", "moderately_active", "very_active" or "extremely_active".
    pub activity: String,
    /// Calories already eaten today.
    pub consumed_calorie: f64,
    /// "breakfast", "lunch" or "dinner".
    pub meal_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealRecommendation {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Recipe Instructions")]
    pub instructions: String,
    #[serde(rename = "Calories")]
    pub calories: f64,
}

/// Ranked recommendations keyed "Meal 1", "Meal 2", ...
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecommendationResponse(pub BTreeMap<String, MealRecommendation>);

impl RecommendationResponse {
    pub fn from_ranked(meals: Vec<MealRecommendation>) -> Self {
        Self(
            meals
                .into_iter()
                .enumerate()
                .map(|(i, meal)| (format!("Meal {}", i + 1), meal))
                .collect(),
        )
    }

    pub fn meal(&self, rank: usize) -> Option<&MealRecommendation> {
        self.0.get(&format!("Meal {rank}"))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable kind, e.g. "validation_error", "infeasible_budget".
    pub kind: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub recipes: usize,
    pub dataset_sha256: String,
    pub category_table_version: u32,
}
