//! Mifflin–St Jeor BMR and activity-scaled TDEE.

use crate::error::{Result, TrackerError};
use crate::models::{BmrInputs, EnergyEstimate, Sex};

/// Common activity multipliers, lowest to highest.
pub const ACTIVITY_LEVELS: &[(f64, &str)] = &[
    (1.2, "sedentary"),
    (1.375, "lightly active"),
    (1.55, "moderately active"),
    (1.725, "very active"),
    (1.9, "extra active"),
];

#[must_use]
pub fn compute_bmr(age: u32, sex: Sex, weight_kg: f64, height_cm: f64) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age);
    match sex {
        Sex::Male => base + 5.0,
        Sex::Female => base - 161.0,
    }
}

#[must_use]
pub fn compute_tdee(bmr: f64, activity: f64) -> f64 {
    bmr * activity
}

/// Check that every numeric input is finite and positive.
pub fn validate_bmr_inputs(inputs: &BmrInputs) -> Result<()> {
    if inputs.age == 0 {
        return Err(TrackerError::validation("Age must be greater than 0"));
    }
    let fields = [
        ("Weight", inputs.weight),
        ("Height", inputs.height),
        ("Activity multiplier", inputs.activity),
    ];
    for (what, value) in fields {
        if !value.is_finite() || value <= 0.0 {
            return Err(TrackerError::validation(format!(
                "{what} must be a number greater than 0"
            )));
        }
    }
    Ok(())
}

/// Validate `inputs` and compute both figures.
pub fn estimate(inputs: &BmrInputs) -> Result<EnergyEstimate> {
    validate_bmr_inputs(inputs)?;
    let bmr = compute_bmr(inputs.age, inputs.sex, inputs.weight, inputs.height);
    Ok(EnergyEstimate {
        bmr,
        tdee: compute_tdee(bmr, inputs.activity),
    })
}
