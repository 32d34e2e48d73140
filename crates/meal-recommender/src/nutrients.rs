/// Per-meal nutrient targets derived from the meal's calorie budget.
///
/// Each target blends a few rough sub-estimates (share of calories, body type, goal,
/// gender, activity) and every draw comes from the caller's `NoiseSource`, so a seeded
/// source replays the exact same targets.
use crate::model::{ActivityLevel, BodyType, Gender, Goal, MealType, NutrientTargets, UserProfile};
use crate::noise::NoiseSource;

const KCAL_PER_GRAM_FAT: f64 = 9.0;
const KCAL_PER_GRAM_CARB: f64 = 4.0;

/// Daily cholesterol and sodium reference amounts (mg).
const CHOLESTEROL_DAILY_MG: f64 = 200.0;
const SODIUM_DAILY_MG: f64 = 2300.0;

/// Per-meal fiber draws are expressed in 26ths of the daily total.
const FIBER_SHARE_DIVISOR: f64 = 26.0;

/// Synthesize all targets for one meal, drawing in a fixed order.
pub fn synthesize(
    profile: &UserProfile,
    body_type: BodyType,
    budget: f64,
    noise: &mut dyn NoiseSource,
) -> NutrientTargets {
    let (fat, saturated_fat) = fat(budget, noise);
    let carbohydrate = carbohydrate(budget, body_type, profile.goal, profile.weight, noise);
    let sugar = sugar(budget, profile.gender, noise);
    let protein = protein(budget, profile.gender, profile.weight, body_type, profile.activity, noise);
    let fiber = fiber(profile.meal_type, profile.gender, profile.age, noise);
    let cholesterol = cholesterol(profile.meal_type, noise);
    let sodium = sodium(profile.meal_type, noise);

    NutrientTargets {
        calories: budget,
        fat,
        saturated_fat,
        cholesterol,
        sodium,
        carbohydrate,
        fiber,
        sugar,
        protein,
    }
}

/// Total and saturated fat, in grams.
pub fn fat(budget: f64, noise: &mut dyn NoiseSource) -> (f64, f64) {
    let total = budget * noise.uniform(0.2, 0.35) / KCAL_PER_GRAM_FAT;
    let saturated = budget * noise.uniform(0.0, 0.1) / KCAL_PER_GRAM_FAT;
    (total, saturated)
}

/// Carbohydrate grams: mean of a calorie share, a body-type baseline and (unless
/// maintaining) a goal-specific amount.
pub fn carbohydrate(
    budget: f64,
    body_type: BodyType,
    goal: Goal,
    weight: f64,
    noise: &mut dyn NoiseSource,
) -> f64 {
    let from_calories = budget * noise.uniform(0.45, 0.65) / KCAL_PER_GRAM_CARB;

    let by_body_type = match body_type {
        BodyType::Obesity => 50.0,
        BodyType::Overweight => noise.randint(100, 150) as f64,
        BodyType::Normal => budget * noise.uniform(0.5, 0.6) / KCAL_PER_GRAM_CARB,
        BodyType::Underweight | BodyType::Thinness => {
            budget * noise.uniform(0.65, 0.8) / KCAL_PER_GRAM_CARB
        }
    };

    let by_goal = match goal {
        Goal::LoseWeight => noise.randint(70, 150) as f64,
        Goal::MuscleGain => weight * noise.randint(4, 7) as f64,
        Goal::Maintain => return (from_calories + by_body_type) / 2.0,
    };

    (from_calories + by_body_type + by_goal) / 3.0
}

pub fn sugar(budget: f64, gender: Gender, noise: &mut dyn NoiseSource) -> f64 {
    let from_calories = budget * noise.uniform(0.0, 0.1) / KCAL_PER_GRAM_CARB;
    let baseline = match gender {
        Gender::Female => 37.5,
        Gender::Male => 25.0,
    } * noise.uniform(0.95, 1.05);
    (from_calories + baseline) / 2.0
}

pub fn protein(
    budget: f64,
    gender: Gender,
    weight: f64,
    body_type: BodyType,
    activity: ActivityLevel,
    noise: &mut dyn NoiseSource,
) -> f64 {
    let from_calories = budget * noise.uniform(0.1, 0.35) / KCAL_PER_GRAM_CARB;

    let by_body_type = match body_type {
        BodyType::Obesity | BodyType::Overweight => 0.5 * weight,
        _ => 0.8 * weight,
    };

    let by_gender = match gender {
        Gender::Female => 46.0,
        Gender::Male => 56.0,
    };

    let by_activity = match activity {
        ActivityLevel::ModeratelyActive => weight,
        ActivityLevel::VeryActive | ActivityLevel::ExtremelyActive => {
            weight * noise.uniform(1.3, 1.6)
        }
        ActivityLevel::Sedentary | ActivityLevel::LightlyActive => 0.8 * weight,
    };

    (by_activity + by_body_type + by_gender + from_calories) / 4.0
}

/// Recommended daily fiber (grams) by age and gender.
pub fn daily_fiber(gender: Gender, age: u32, noise: &mut dyn NoiseSource) -> f64 {
    match (age, gender) {
        (a, Gender::Male) if a > 18 => 38.0,
        (a, Gender::Female) if a > 18 => 25.0,
        // Never reached: anyone over 51 is already matched by the arms above.
        (a, Gender::Male) if a > 51 => 30.0,
        (a, Gender::Female) if a > 51 => 21.0,
        _ => noise.randint(25, 30) as f64,
    }
}

pub fn fiber(meal_type: MealType, gender: Gender, age: u32, noise: &mut dyn NoiseSource) -> f64 {
    let total = daily_fiber(gender, age, noise);
    let share = match meal_type {
        MealType::Breakfast => noise.uniform(1.0, 4.0),
        MealType::Lunch => noise.uniform(1.5, 8.5),
        MealType::Dinner => noise.uniform(4.0, 13.5),
    };
    share * total / FIBER_SHARE_DIVISOR
}

/// Milligrams of cholesterol for the meal.
pub fn cholesterol(meal_type: MealType, noise: &mut dyn NoiseSource) -> f64 {
    capped_draw(CHOLESTEROL_DAILY_MG, meal_type, noise)
}

/// Milligrams of sodium for the meal.
pub fn sodium(meal_type: MealType, noise: &mut dyn NoiseSource) -> f64 {
    capped_draw(SODIUM_DAILY_MG, meal_type, noise)
}

/// A uniform draw between zero and a random whole-number cap. Lunch gets 20-30% of the
/// daily amount as its cap, other meals 10-20%.
fn capped_draw(daily: f64, meal_type: MealType, noise: &mut dyn NoiseSource) -> f64 {
    let fraction = match meal_type {
        MealType::Lunch => noise.uniform(0.2, 0.3),
        _ => noise.uniform(0.1, 0.2),
    };
    let cap = (fraction * daily).trunc();
    noise.uniform(0.0, cap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::{FixedNoise, RngNoise};

    const BODY_TYPES: [BodyType; 5] = [
        BodyType::Thinness,
        BodyType::Underweight,
        BodyType::Normal,
        BodyType::Overweight,
        BodyType::Obesity,
    ];

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_fat_bounds() {
        let (total, saturated) = fat(900.0, &mut FixedNoise(0.0));
        assert!(close(total, 20.0));
        assert!(close(saturated, 0.0));

        let (total, saturated) = fat(900.0, &mut FixedNoise(1.0));
        assert!(close(total, 35.0));
        assert!(close(saturated, 10.0));
    }

    #[test]
    fn test_carbohydrate_maintain_averages_two_terms() {
        // from_calories = 400 * 0.45 / 4 = 45, obesity baseline = 50
        let carbs = carbohydrate(400.0, BodyType::Obesity, Goal::Maintain, 90.0, &mut FixedNoise(0.0));
        assert!(close(carbs, 47.5));
    }

    #[test]
    fn test_carbohydrate_goal_terms() {
        // from_calories 45, overweight baseline 100, lose-weight term 70
        let carbs = carbohydrate(400.0, BodyType::Overweight, Goal::LoseWeight, 90.0, &mut FixedNoise(0.0));
        assert!(close(carbs, (45.0 + 100.0 + 70.0) / 3.0));

        // from_calories 65, normal baseline 60, muscle-gain term 90 * 7
        let carbs = carbohydrate(400.0, BodyType::Normal, Goal::MuscleGain, 90.0, &mut FixedNoise(1.0));
        assert!(close(carbs, (65.0 + 60.0 + 630.0) / 3.0));
    }

    #[test]
    fn test_sugar_gender_baseline() {
        let female = sugar(0.0, Gender::Female, &mut FixedNoise(0.5));
        let male = sugar(0.0, Gender::Male, &mut FixedNoise(0.5));
        assert!(close(female, 37.5 / 2.0));
        assert!(close(male, 12.5));
    }

    #[test]
    fn test_protein_terms() {
        // from_calories = 400 * 0.1 / 4 = 10; normal 0.8 * 70 = 56; male 56; moderate 70
        let grams = protein(
            400.0,
            Gender::Male,
            70.0,
            BodyType::Normal,
            ActivityLevel::ModeratelyActive,
            &mut FixedNoise(0.0),
        );
        assert!(close(grams, (10.0 + 56.0 + 56.0 + 70.0) / 4.0));

        // overweight 0.5 * 100 = 50; female 46; very active 100 * 1.6 = 160; 400 * 0.35 / 4 = 35
        let grams = protein(
            400.0,
            Gender::Female,
            100.0,
            BodyType::Overweight,
            ActivityLevel::VeryActive,
            &mut FixedNoise(1.0),
        );
        assert!(close(grams, (35.0 + 50.0 + 46.0 + 160.0) / 4.0));
    }

    #[test]
    fn test_daily_fiber_thresholds() {
        let mut noise = FixedNoise(1.0);
        assert_eq!(daily_fiber(Gender::Male, 30, &mut noise), 38.0);
        assert_eq!(daily_fiber(Gender::Female, 30, &mut noise), 25.0);
        // Adults over 51 keep the over-18 amounts.
        assert_eq!(daily_fiber(Gender::Male, 70, &mut noise), 38.0);
        assert_eq!(daily_fiber(Gender::Female, 70, &mut noise), 25.0);
        assert_eq!(daily_fiber(Gender::Male, 18, &mut noise), 30.0);
        assert_eq!(daily_fiber(Gender::Female, 12, &mut FixedNoise(0.0)), 25.0);
    }

    #[test]
    fn test_fiber_meal_share() {
        let breakfast = fiber(MealType::Breakfast, Gender::Male, 30, &mut FixedNoise(1.0));
        assert!(close(breakfast, 4.0 * 38.0 / 26.0));
        let dinner = fiber(MealType::Dinner, Gender::Female, 30, &mut FixedNoise(0.0));
        assert!(close(dinner, 4.0 * 25.0 / 26.0));
    }

    #[test]
    fn test_cholesterol_and_sodium_caps() {
        // Lunch cap is trunc(0.3 * 200) = 60; FixedNoise(1.0) lands on the cap.
        assert!(close(cholesterol(MealType::Lunch, &mut FixedNoise(1.0)), 60.0));
        assert!(close(cholesterol(MealType::Dinner, &mut FixedNoise(1.0)), 40.0));
        assert!(close(sodium(MealType::Breakfast, &mut FixedNoise(1.0)), 460.0));
        assert!(close(sodium(MealType::Lunch, &mut FixedNoise(0.0)), 0.0));
    }

    #[test]
    fn test_targets_non_negative_across_branches() {
        let mut noise = RngNoise::seeded(2024);
        for gender in [Gender::Male, Gender::Female] {
            for goal in [Goal::LoseWeight, Goal::Maintain, Goal::MuscleGain] {
                for activity in [
                    ActivityLevel::Sedentary,
                    ActivityLevel::LightlyActive,
                    ActivityLevel::ModeratelyActive,
                    ActivityLevel::VeryActive,
                    ActivityLevel::ExtremelyActive,
                ] {
                    for meal_type in [MealType::Breakfast, MealType::Lunch, MealType::Dinner] {
                        for body_type in BODY_TYPES {
                            for (age, budget) in [(10, 0.0), (30, 350.0), (60, 1200.0)] {
                                let profile = UserProfile {
                                    age,
                                    weight: 72.0,
                                    height: 1.7,
                                    gender,
                                    goal,
                                    activity,
                                    consumed_calorie: 0.0,
                                    meal_type,
                                };
                                let targets = synthesize(&profile, body_type, budget, &mut noise);
                                let vector = targets.to_vector();
                                assert!(
                                    vector.iter().all(|v| v.is_finite() && *v >= 0.0),
                                    "{profile:?} / {body_type:?} gave {targets:?}"
                                );
                                assert_eq!(targets.calories, budget);
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_seeded_synthesis_replays() {
        let profile = UserProfile {
            age: 45,
            weight: 95.0,
            height: 1.78,
            gender: Gender::Female,
            goal: Goal::LoseWeight,
            activity: ActivityLevel::ExtremelyActive,
            consumed_calorie: 300.0,
            meal_type: MealType::Lunch,
        };
        let a = synthesize(&profile, BodyType::Obesity, 640.0, &mut RngNoise::seeded(5));
        let b = synthesize(&profile, BodyType::Obesity, 640.0, &mut RngNoise::seeded(5));
        assert_eq!(a, b);
    }
}
