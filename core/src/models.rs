use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};

/// Goal used until the user sets one.
pub const DEFAULT_GOAL: i64 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Meal {
    #[serde(alias = "breakfast")]
    Breakfast,
    #[serde(alias = "lunch")]
    Lunch,
    #[serde(alias = "dinner")]
    Dinner,
    #[serde(alias = "snack")]
    Snack,
}

/// Display order for meal groups.
pub const MEALS: &[Meal] = &[Meal::Breakfast, Meal::Lunch, Meal::Dinner, Meal::Snack];

impl Meal {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Meal::Breakfast => "Breakfast",
            Meal::Lunch => "Lunch",
            Meal::Dinner => "Dinner",
            Meal::Snack => "Snack",
        }
    }
}

impl fmt::Display for Meal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Meal {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Ok(Meal::Breakfast),
            "lunch" => Ok(Meal::Lunch),
            "dinner" => Ok(Meal::Dinner),
            "snack" => Ok(Meal::Snack),
            _ => Err(TrackerError::validation(format!(
                "Invalid meal '{s}'. Must be one of: breakfast, lunch, dinner, snack"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => f.write_str("light"),
            Theme::Dark => f.write_str("dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(TrackerError::validation(format!(
                "Invalid theme '{s}'. Must be light or dark"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::Male => f.write_str("male"),
            Sex::Female => f.write_str("female"),
        }
    }
}

impl FromStr for Sex {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Sex::Male),
            "female" | "f" => Ok(Sex::Female),
            _ => Err(TrackerError::validation(format!(
                "Invalid sex '{s}'. Must be male or female"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: i64,
    pub name: String,
    pub calories: i64,
    pub meal: Meal,
    pub date: NaiveDate,
}

/// Biometric snapshot the last BMR/TDEE result was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BmrInputs {
    pub age: u32,
    pub sex: Sex,
    /// Kilograms
    pub weight: f64,
    /// Centimetres
    pub height: f64,
    pub activity: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal: Option<i64>,
    pub theme: Theme,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bmr: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tdee: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bmr_inputs: Option<BmrInputs>,
}

impl Settings {
    /// The goal in effect: the stored one if positive, otherwise [`DEFAULT_GOAL`].
    #[must_use]
    pub fn effective_goal(&self) -> i64 {
        self.goal.filter(|g| *g > 0).unwrap_or(DEFAULT_GOAL)
    }

    #[must_use]
    pub fn has_explicit_goal(&self) -> bool {
        self.goal.is_some_and(|g| g > 0)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MealGroup {
    pub meal: Meal,
    pub entries: Vec<Entry>,
    pub subtotal: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub total: i64,
    pub goal: i64,
    /// `goal - total`; negative once the goal is exceeded.
    pub deficit: i64,
    /// `deficit` clamped at zero.
    pub remaining: i64,
    pub percent_of_goal: i64,
    pub goal_reached: bool,
    pub meals: Vec<MealGroup>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayTotal {
    pub date: NaiveDate,
    pub total: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnergyEstimate {
    pub bmr: f64,
    pub tdee: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub rows_parsed: usize,
    pub entries_imported: usize,
    pub rows_skipped: usize,
}

/// Trim and reject empty entry names.
pub fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(TrackerError::validation("Food name must not be empty"));
    }
    Ok(trimmed.to_string())
}

/// Validate a user-supplied calorie figure and round it to whole kcal.
///
/// `what` names the field in the error message.
#[allow(clippy::cast_precision_loss)]
pub fn validate_calories(value: f64, what: &str) -> Result<i64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(TrackerError::validation(format!(
            "{what} must be a number greater than 0"
        )));
    }
    let rounded = value.round();
    if rounded < 1.0 {
        return Err(TrackerError::validation(format!(
            "{what} must be at least 1 after rounding"
        )));
    }
    if rounded > i64::MAX as f64 {
        return Err(TrackerError::validation(format!("{what} is too large")));
    }
    Ok(rounded as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meal_parse_case_insensitive() {
        assert_eq!("breakfast".parse::<Meal>().unwrap(), Meal::Breakfast);
        assert_eq!("LUNCH".parse::<Meal>().unwrap(), Meal::Lunch);
        assert_eq!(" Dinner ".parse::<Meal>().unwrap(), Meal::Dinner);
        assert_eq!("Snack".parse::<Meal>().unwrap(), Meal::Snack);
    }

    #[test]
    fn test_meal_parse_invalid() {
        assert!("brunch".parse::<Meal>().unwrap_err().is_validation());
        assert!("".parse::<Meal>().is_err());
    }

    #[test]
    fn test_meal_serializes_capitalized() {
        assert_eq!(serde_json::to_string(&Meal::Snack).unwrap(), "\"Snack\"");
        let meal: Meal = serde_json::from_str("\"lunch\"").unwrap();
        assert_eq!(meal, Meal::Lunch);
    }

    #[test]
    fn test_theme_toggle_and_parse() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!("Dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("blue".parse::<Theme>().is_err());
    }

    #[test]
    fn test_sex_parse() {
        assert_eq!("male".parse::<Sex>().unwrap(), Sex::Male);
        assert_eq!("F".parse::<Sex>().unwrap(), Sex::Female);
        assert!("other".parse::<Sex>().is_err());
    }

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.effective_goal(), DEFAULT_GOAL);
        assert_eq!(settings.theme, Theme::Light);
        assert!(!settings.has_explicit_goal());
    }

    #[test]
    fn test_settings_from_empty_object() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_settings_serialize_omits_absent_fields() {
        let json = serde_json::to_string(&Settings::default()).unwrap();
        assert_eq!(json, r#"{"theme":"light"}"#);
    }

    #[test]
    fn test_settings_reads_browser_layout() {
        let raw = r#"{"goal":1800,"theme":"dark","bmr":1673.75,"tdee":2008.5,
            "bmrInputs":{"age":25,"sex":"male","weight":70,"height":175,"activity":1.2}}"#;
        let settings: Settings = serde_json::from_str(raw).unwrap();
        assert_eq!(settings.goal, Some(1800));
        assert_eq!(settings.theme, Theme::Dark);
        let inputs = settings.bmr_inputs.unwrap();
        assert_eq!(inputs.age, 25);
        assert_eq!(inputs.sex, Sex::Male);
        assert!((inputs.activity - 1.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_non_positive_stored_goal_falls_back() {
        let settings = Settings {
            goal: Some(0),
            ..Settings::default()
        };
        assert_eq!(settings.effective_goal(), DEFAULT_GOAL);
        assert!(!settings.has_explicit_goal());
    }

    #[test]
    fn test_entry_date_must_be_well_formed() {
        let ok = r#"{"id":1,"name":"Toast","calories":150,"meal":"Breakfast","date":"2024-06-15"}"#;
        let entry: Entry = serde_json::from_str(ok).unwrap();
        assert_eq!(entry.date, NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());

        let bad = r#"{"id":1,"name":"Toast","calories":150,"meal":"Breakfast","date":"2024-13-45"}"#;
        assert!(serde_json::from_str::<Entry>(bad).is_err());
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("  Toast ").unwrap(), "Toast");
        assert!(validate_name("   ").unwrap_err().is_validation());
    }

    #[test]
    fn test_validate_calories_rounds() {
        assert_eq!(validate_calories(149.5, "Calories").unwrap(), 150);
        assert_eq!(validate_calories(150.4, "Calories").unwrap(), 150);
    }

    #[test]
    fn test_validate_calories_rejects_bad_input() {
        assert!(validate_calories(0.0, "Calories").is_err());
        assert!(validate_calories(-5.0, "Calories").is_err());
        assert!(validate_calories(f64::NAN, "Calories").is_err());
        assert!(validate_calories(f64::INFINITY, "Calories").is_err());
        assert!(validate_calories(0.3, "Calories").is_err());
    }
}
