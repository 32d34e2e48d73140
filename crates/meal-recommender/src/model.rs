use std::fmt;
use std::str::FromStr;

use diet_common::api::RecommendationRequest;
use diet_common::dataset::{FeatureVector, FEATURE_COUNT};

use crate::error::AppError;

/// Lowercase, trim, and fold spaces/hyphens to underscores so that "Lose Weight",
/// "lose-weight" and "lose_weight" all parse the same way.
fn canonical(value: &str) -> String {
    value
        .trim()
        .to_ascii_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

fn unknown(field: &str, value: &str, accepted: &[&str]) -> AppError {
    AppError::Validation(format!(
        "unknown {field}: '{value}'. Accepted values: {}",
        accepted.join(", ")
    ))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl FromStr for Gender {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match canonical(s).as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            _ => Err(unknown("gender", s, &["male", "female"])),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Goal {
    LoseWeight,
    Maintain,
    MuscleGain,
}

impl FromStr for Goal {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match canonical(s).as_str() {
            "lose_weight" => Ok(Goal::LoseWeight),
            "maintain" => Ok(Goal::Maintain),
            "muscle_gain" => Ok(Goal::MuscleGain),
            _ => Err(unknown("goal", s, &["lose_weight", "maintain", "muscle_gain"])),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityLevel {
    Sedentary,
    LightlyActive,
    ModeratelyActive,
    VeryActive,
    ExtremelyActive,
}

impl ActivityLevel {
    /// Multiplier applied to BMR to get daily expenditure.
    pub fn factor(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtremelyActive => 1.9,
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match canonical(s).as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "lightly_active" => Ok(ActivityLevel::LightlyActive),
            "moderately_active" => Ok(ActivityLevel::ModeratelyActive),
            "very_active" => Ok(ActivityLevel::VeryActive),
            "extremely_active" => Ok(ActivityLevel::ExtremelyActive),
            _ => Err(unknown(
                "activity",
                s,
                &[
                    "sedentary",
                    "lightly_active",
                    "moderately_active",
                    "very_active",
                    "extremely_active",
                ],
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealType {
    pub fn as_str(self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match canonical(s).as_str() {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            _ => Err(unknown("meal_type", s, &["breakfast", "lunch", "dinner"])),
        }
    }
}

/// BMI-based body classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    Thinness,
    Underweight,
    Normal,
    Overweight,
    Obesity,
}

/// A validated recommendation request.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub age: u32,
    /// Kilograms.
    pub weight: f64,
    /// Meters.
    pub height: f64,
    pub gender: Gender,
    pub goal: Goal,
    pub activity: ActivityLevel,
    pub consumed_calorie: f64,
    pub meal_type: MealType,
}

impl TryFrom<RecommendationRequest> for UserProfile {
    type Error = AppError;

    fn try_from(request: RecommendationRequest) -> Result<Self, Self::Error> {
        if !(request.weight.is_finite() && request.weight > 0.0) {
            return Err(AppError::Validation(format!(
                "weight must be a positive number of kilograms, got {}",
                request.weight
            )));
        }
        if !(request.height.is_finite() && request.height > 0.0) {
            return Err(AppError::Validation(format!(
                "height must be a positive number of meters, got {}",
                request.height
            )));
        }
        if !(request.consumed_calorie.is_finite() && request.consumed_calorie >= 0.0) {
            return Err(AppError::Validation(format!(
                "consumed_calorie must be zero or positive, got {}",
                request.consumed_calorie
            )));
        }

        Ok(Self {
            age: request.age,
            weight: request.weight,
            height: request.height,
            gender: request.gender.parse()?,
            goal: request.goal.parse()?,
            activity: request.activity.parse()?,
            consumed_calorie: request.consumed_calorie,
            meal_type: request.meal_type.parse()?,
        })
    }
}

/// Per-meal nutrient targets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NutrientTargets {
    pub calories: f64,
    pub fat: f64,
    pub saturated_fat: f64,
    pub cholesterol: f64,
    pub sodium: f64,
    pub carbohydrate: f64,
    pub fiber: f64,
    pub sugar: f64,
    pub protein: f64,
}

impl NutrientTargets {
    /// Structural time flags appended to every query vector.
    pub const TIME_MIDDLE: f64 = 0.0;
    pub const TIME_SHORT: f64 = 1.0;

    /// The query vector, in the dataset's feature column order.
    pub fn to_vector(&self) -> FeatureVector {
        let vector: [f64; FEATURE_COUNT] = [
            self.calories,
            self.fat,
            self.saturated_fat,
            self.cholesterol,
            self.sodium,
            self.carbohydrate,
            self.fiber,
            self.sugar,
            self.protein,
            Self::TIME_MIDDLE,
            Self::TIME_SHORT,
        ];
        vector
    }
}
