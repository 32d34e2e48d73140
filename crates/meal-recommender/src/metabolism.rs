/// Daily energy expenditure and body-type estimation.
///
/// BMR follows the Harris-Benedict equations, scaled by a fixed activity factor and
/// adjusted for the user's goal. The final figure carries a configurable multiplicative
/// jitter to model the error of such estimates.
use crate::model::{BodyType, Gender, Goal, UserProfile};
use crate::noise::NoiseSource;

/// Default relative jitter applied to the final daily expenditure (±5%).
pub const DEFAULT_TDEE_JITTER: f64 = 0.05;

const CALORIE_DEFICIT_FACTOR: f64 = 0.8;
const MUSCLE_GAIN_SURPLUS: f64 = 250.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetabolicEstimate {
    /// Basal metabolic rate, kcal/day.
    pub bmr: f64,
    /// Total daily energy expenditure after goal adjustment and jitter, kcal/day.
    pub tdee: f64,
    pub bmi: f64,
    pub body_type: BodyType,
}

/// Harris-Benedict basal metabolic rate. Height is in centimeters.
pub fn basal_metabolic_rate(gender: Gender, weight_kg: f64, height_cm: f64, age: u32) -> f64 {
    let age = f64::from(age);
    match gender {
        Gender::Female => 655.0 + 9.6 * weight_kg + 1.8 * height_cm - 4.7 * age,
        Gender::Male => 66.0 + 13.7 * weight_kg + 5.0 * height_cm - 6.8 * age,
    }
}

pub fn body_mass_index(weight_kg: f64, height_m: f64) -> f64 {
    weight_kg / (height_m * height_m)
}

/// Lower bounds are exclusive: a BMI of exactly 25.0 is still `Normal`.
pub fn classify_body_type(bmi: f64) -> BodyType {
    if bmi > 30.0 {
        BodyType::Obesity
    } else if bmi > 25.0 {
        BodyType::Overweight
    } else if bmi > 18.5 {
        BodyType::Normal
    } else if bmi > 17.0 {
        BodyType::Underweight
    } else {
        BodyType::Thinness
    }
}

/// Estimate daily expenditure and body type for a profile.
///
/// `tdee_jitter` is the relative half-width of the uniform noise applied to the result
/// (0.05 means a factor drawn from `[0.95, 1.05]`).
pub fn estimate(
    profile: &UserProfile,
    tdee_jitter: f64,
    noise: &mut dyn NoiseSource,
) -> MetabolicEstimate {
    let bmr = basal_metabolic_rate(
        profile.gender,
        profile.weight,
        profile.height * 100.0,
        profile.age,
    );

    let mut tdee = bmr * profile.activity.factor();
    match profile.goal {
        Goal::LoseWeight => tdee *= CALORIE_DEFICIT_FACTOR,
        Goal::MuscleGain => tdee += MUSCLE_GAIN_SURPLUS,
        Goal::Maintain => {}
    }

    let bmi = body_mass_index(profile.weight, profile.height);

    MetabolicEstimate {
        bmr,
        tdee: tdee * noise.uniform(1.0 - tdee_jitter, 1.0 + tdee_jitter),
        bmi,
        body_type: classify_body_type(bmi),
    }
}
