/// Recipe category table: which dataset categories are eligible for a meal slot and goal.
///
/// The table is configuration, not code. The built-in version mirrors the categories of
/// the bundled dataset; a replacement can be loaded from JSON:
///
/// ```json
/// {
///   "version": 2,
///   "breakfast": ["breakfast", "beverages", "fruits", "dessert"],
///   "weight_loss": ["<meal>", "beverages", "chicken", "fruits", "special_dietary", "vegetables"],
///   "general": ["<meal>", "beverages", "chicken", "meat", "fish_and_seafood", "international", "others"]
/// }
/// ```
///
/// `<meal>` is replaced with "lunch" or "dinner" when the set is resolved.
use std::path::Path;

use diet_common::dataset::RecipeRecord;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::model::{Goal, MealType};

pub const MEAL_PLACEHOLDER: &str = "<meal>";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTable {
    pub version: u32,
    /// Categories for breakfast, regardless of goal.
    pub breakfast: Vec<String>,
    /// Lunch/dinner categories when the goal is weight loss.
    pub weight_loss: Vec<String>,
    /// Lunch/dinner categories for every other goal.
    pub general: Vec<String>,
}

impl Default for CategoryTable {
    fn default() -> Self {
        fn owned(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }

        Self {
            version: 1,
            breakfast: owned(&["breakfast", "beverages", "fruits", "dessert"]),
            weight_loss: owned(&[
                MEAL_PLACEHOLDER,
                "beverages",
                "chicken",
                "fruits",
                "special_dietary",
                "vegetables",
            ]),
            general: owned(&[
                MEAL_PLACEHOLDER,
                "beverages",
                "chicken",
                "meat",
                "fish_and_seafood",
                "international",
                "others",
            ]),
        }
    }
}

impl CategoryTable {
    /// Load a table from a JSON file and validate it.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("failed to read category table {}: {e}", path.display()))
        })?;
        let table: CategoryTable = serde_json::from_str(&content).map_err(|e| {
            AppError::Config(format!("invalid category table {}: {e}", path.display()))
        })?;
        table.validate()?;
        Ok(table)
    }

    /// Every slot must list at least one category.
    pub fn validate(&self) -> Result<(), AppError> {
        for (slot, categories) in [
            ("breakfast", &self.breakfast),
            ("weight_loss", &self.weight_loss),
            ("general", &self.general),
        ] {
            if categories.iter().all(|c| c.trim().is_empty()) {
                return Err(AppError::Config(format!(
                    "category table v{} has no categories for {slot}",
                    self.version
                )));
            }
        }
        Ok(())
    }

    /// Resolve the allowed categories for a meal slot and goal.
    pub fn categories_for(&self, goal: Goal, meal_type: MealType) -> Vec<String> {
        let template = match (meal_type, goal) {
            (MealType::Breakfast, _) => &self.breakfast,
            (_, Goal::LoseWeight) => &self.weight_loss,
            (_, Goal::Maintain | Goal::MuscleGain) => &self.general,
        };
        template
            .iter()
            .map(|c| {
                if c == MEAL_PLACEHOLDER {
                    meal_type.as_str().to_string()
                } else {
                    c.clone()
                }
            })
            .collect()
    }

    /// Rows of `recipes` whose category is allowed, in dataset order.
    pub fn filter<'a>(
        &self,
        recipes: &'a [RecipeRecord],
        goal: Goal,
        meal_type: MealType,
    ) -> Vec<&'a RecipeRecord> {
        let allowed = self.categories_for(goal, meal_type);
        recipes
            .iter()
            .filter(|r| allowed.iter().any(|c| *c == r.category))
            .collect()
    }
}
