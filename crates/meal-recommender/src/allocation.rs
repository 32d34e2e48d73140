use crate::error::AppError;
use crate::model::MealType;
use crate::noise::NoiseSource;

const BREAKFAST_SHARE: f64 = 0.22;
const LUNCH_SHARE: f64 = 0.31;

/// Calorie budget for the requested meal.
///
/// Breakfast is a fixed share of the day's expenditure. Lunch and dinner are computed
/// from what is left after `consumed` calories; with nothing left the meal is
/// infeasible. A non-positive expenditure (possible for very small bodies or high ages)
/// is infeasible for every meal.
pub fn meal_budget(
    tdee: f64,
    consumed: f64,
    meal_type: MealType,
    noise: &mut dyn NoiseSource,
) -> Result<f64, AppError> {
    if tdee <= 0.0 {
        return Err(AppError::InfeasibleBudget { tdee, consumed });
    }

    if meal_type == MealType::Breakfast {
        return Ok(tdee * BREAKFAST_SHARE * noise.uniform(0.9, 1.0));
    }

    let remaining = tdee - consumed;
    if remaining <= 0.0 {
        return Err(AppError::InfeasibleBudget { tdee, consumed });
    }

    Ok(match meal_type {
        MealType::Lunch => remaining * LUNCH_SHARE * noise.uniform(1.0, 1.1),
        _ => remaining * noise.uniform(0.95, 1.05),
    })
}
