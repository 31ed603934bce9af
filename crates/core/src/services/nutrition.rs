//! Daily nutrition targets from body metrics.
//!
//! BMR uses the Mifflin–St Jeor equation, scaled by an activity multiplier and
//! shifted by a goal-specific calorie delta. Macros are per kilogram of body
//! weight.

use letcook_common::{AppError, AppResult};
use serde::{Deserialize, Serialize};

const SENIOR_AGE: f64 = 60.0;
const MIN_ADULT_AGE: f64 = 16.0;
const UNDERWEIGHT_BMI: f64 = 18.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivityLevel {
    Sedentary,
    LightlyActive,
    ModeratelyActive,
    VeryActive,
}

impl ActivityLevel {
    const fn multiplier(self) -> f64 {
        match self {
            Self::Sedentary => 1.2,
            Self::LightlyActive => 1.375,
            Self::ModeratelyActive => 1.55,
            Self::VeryActive => 1.725,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Goal {
    WeightLoss,
    Maintenance,
    MuscleGain,
}

impl Goal {
    const fn calorie_delta(self) -> f64 {
        match self {
            Self::WeightLoss => -500.0,
            Self::Maintenance => 0.0,
            Self::MuscleGain => 300.0,
        }
    }

    /// Grams per kilogram of body weight: protein, fat, carbs.
    const fn macro_multipliers(self) -> (f64, f64, f64) {
        match self {
            Self::WeightLoss => (2.0, 0.8, 2.0),
            Self::Maintenance => (1.6, 1.0, 3.0),
            Self::MuscleGain => (2.2, 1.2, 4.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    #[must_use]
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < UNDERWEIGHT_BMI {
            Self::Underweight
        } else if bmi < 24.9 {
            Self::Normal
        } else if bmi < 29.9 {
            Self::Overweight
        } else {
            Self::Obese
        }
    }
}

/// Body metrics. Weight in kilograms, height in centimetres, age in years.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetsInput {
    pub weight: f64,
    pub height: f64,
    pub age: f64,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionTargets {
    /// kcal per day.
    pub calories: f64,
    /// Grams per day.
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    pub bmi: f64,
    pub bmi_category: BmiCategory,
    pub warnings: Vec<String>,
}

#[must_use]
pub fn bmi(weight: f64, height_cm: f64) -> f64 {
    let meters = height_cm / 100.0;
    weight / (meters * meters)
}

/// Daily calorie and macro targets for the given metrics.
pub fn calculate_targets(input: &TargetsInput) -> AppResult<NutritionTargets> {
    for (name, value) in [
        ("weight", input.weight),
        ("height", input.height),
        ("age", input.age),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(AppError::BadRequest(format!("{name} must be positive")));
        }
    }

    let bmi = bmi(input.weight, input.height);
    let bmi_category = BmiCategory::from_bmi(bmi);
    let senior = input.age >= SENIOR_AGE;
    let outside_adult_range = input.age < MIN_ADULT_AGE || input.age > SENIOR_AGE;

    let mut warnings = Vec::new();
    if input.activity_level == ActivityLevel::VeryActive && outside_adult_range {
        warnings.push("Very high activity is only recommended between ages 16 and 60".to_string());
    }
    if input.goal == Goal::WeightLoss && bmi < UNDERWEIGHT_BMI {
        warnings.push("BMI is too low for a weight loss goal".to_string());
    }
    if input.goal == Goal::MuscleGain && outside_adult_range {
        warnings.push("Muscle gain is only recommended between ages 16 and 60".to_string());
    }

    let gender_offset = match input.gender {
        Gender::Male => 5.0,
        Gender::Female => -161.0,
    };
    let mut bmr = 10.0f64.mul_add(
        input.weight,
        6.25f64.mul_add(input.height, -5.0 * input.age),
    ) + gender_offset;
    if senior {
        bmr *= 0.9;
    }

    let calories = bmr * input.activity_level.multiplier() + input.goal.calorie_delta();

    let (protein_per_kg, fat_per_kg, carbs_per_kg) = input.goal.macro_multipliers();
    let mut protein = input.weight * protein_per_kg;
    let mut fat = input.weight * fat_per_kg;
    let mut carbs = input.weight * carbs_per_kg;
    if senior {
        protein *= 1.2;
        fat *= 0.9;
        carbs *= 0.9;
    }

    Ok(NutritionTargets {
        calories: calories.round(),
        protein: protein.round(),
        fat: fat.round(),
        carbs: carbs.round(),
        bmi: (bmi * 10.0).round() / 10.0,
        bmi_category,
        warnings,
    })
}
