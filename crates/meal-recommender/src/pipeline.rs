use std::sync::Arc;

use diet_common::api::MealRecommendation;
use diet_common::dataset::RecipeDataset;
use tracing::debug;

use crate::allocation::meal_budget;
use crate::category::CategoryTable;
use crate::error::AppError;
use crate::instructions;
use crate::metabolism;
use crate::model::UserProfile;
use crate::noise::{NoiseSource, RngNoise};
use crate::nutrients;
use crate::recommend;

/// The full request pipeline: estimate, allocate, synthesize, filter, rank.
///
/// Holds only shared read-only state, so one instance serves every request.
#[derive(Debug)]
pub struct Recommender {
    dataset: Arc<RecipeDataset>,
    categories: CategoryTable,
    tdee_jitter: f64,
    noise_seed: Option<u64>,
}

impl Recommender {
    pub fn new(
        dataset: Arc<RecipeDataset>,
        categories: CategoryTable,
        tdee_jitter: f64,
        noise_seed: Option<u64>,
    ) -> Self {
        Self {
            dataset,
            categories,
            tdee_jitter,
            noise_seed,
        }
    }

    pub fn dataset(&self) -> &RecipeDataset {
        &self.dataset
    }

    pub fn categories(&self) -> &CategoryTable {
        &self.categories
    }

    /// Recommend five meals with a fresh noise source (seeded when configured).
    pub fn recommend(&self, profile: &UserProfile) -> Result<Vec<MealRecommendation>, AppError> {
        let mut noise = match self.noise_seed {
            Some(seed) => RngNoise::seeded(seed),
            None => RngNoise::from_entropy(),
        };
        self.recommend_with(profile, &mut noise)
    }

    pub fn recommend_with(
        &self,
        profile: &UserProfile,
        noise: &mut dyn NoiseSource,
    ) -> Result<Vec<MealRecommendation>, AppError> {
        let estimate = metabolism::estimate(profile, self.tdee_jitter, noise);
        debug!(
            bmr = estimate.bmr,
            tdee = estimate.tdee,
            bmi = estimate.bmi,
            body_type = ?estimate.body_type,
            "metabolic estimate"
        );

        let budget = meal_budget(estimate.tdee, profile.consumed_calorie, profile.meal_type, noise)?;
        let targets = nutrients::synthesize(profile, estimate.body_type, budget, noise);
        debug!(meal = %profile.meal_type, ?targets, "nutrient targets");

        let candidates = self
            .categories
            .filter(self.dataset.recipes(), profile.goal, profile.meal_type);
        debug!(
            candidates = candidates.len(),
            table_version = self.categories.version,
            "category filter applied"
        );

        let ranked = recommend::rank(&candidates, &targets.to_vector())?;
        Ok(ranked
            .into_iter()
            .map(|recipe| MealRecommendation {
                name: recipe.name.clone(),
                category: recipe.category.clone(),
                instructions: instructions::normalize(&recipe.instructions),
                calories: recipe.calories(),
            })
            .collect())
    }
}
