use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use deficit_core::energy::ACTIVITY_LEVELS;
use deficit_core::models::Entry;

pub(crate) fn parse_date(date_str: Option<String>) -> Result<NaiveDate> {
    match date_str {
        None => Ok(Local::now().date_naive()),
        Some(s) => match s.as_str() {
            "today" => Ok(Local::now().date_naive()),
            "yesterday" => Ok(Local::now().date_naive() - chrono::Duration::days(1)),
            "tomorrow" => Ok(Local::now().date_naive() + chrono::Duration::days(1)),
            _ => NaiveDate::parse_from_str(&s, "%Y-%m-%d").with_context(|| {
                format!("Invalid date '{s}'. Use YYYY-MM-DD or today/yesterday/tomorrow")
            }),
        },
    }
}

/// Accept a multiplier ("1.55") or a preset name ("moderately active", "moderate").
pub(crate) fn parse_activity(s: &str) -> Result<f64> {
    let s = s.trim();
    if let Ok(value) = s.parse::<f64>() {
        return Ok(value);
    }
    let lower = s.to_lowercase();
    if lower.is_empty() {
        bail!("Activity must not be empty");
    }
    ACTIVITY_LEVELS
        .iter()
        .find(|(_, name)| name.starts_with(&lower))
        .map(|(value, _)| *value)
        .with_context(|| {
            let names: Vec<&str> = ACTIVITY_LEVELS.iter().map(|(_, n)| *n).collect();
            format!(
                "Invalid activity '{s}'. Use a multiplier or one of: {}",
                names.join(", ")
            )
        })
}

pub(crate) fn confirm_flag(yes: bool, what: &str) -> Result<()> {
    if !yes {
        bail!("Refusing to {what} without --yes");
    }
    Ok(())
}

pub(crate) fn print_entry_table(entries: &[&Entry]) {
    #[derive(Tabled)]
    struct EntryRow {
        #[tabled(rename = "ID")]
        id: i64,
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Meal")]
        meal: String,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "kcal")]
        calories: i64,
    }

    let rows: Vec<EntryRow> = entries
        .iter()
        .map(|e| EntryRow {
            id: e.id,
            date: e.date.format("%Y-%m-%d").to_string(),
            meal: e.meal.to_string(),
            name: truncate(&e.name, 40),
            calories: e.calories,
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(4..)).with(Alignment::right()))
        .to_string();
    println!("{table}");
}

/// Fixed-width bar of `value` relative to `max`.
#[allow(clippy::cast_precision_loss, clippy::cast_sign_loss)]
pub(crate) fn bar(value: i64, max: i64, width: usize) -> String {
    if max <= 0 || value <= 0 {
        return String::new();
    }
    let filled = ((value as f64 / max as f64) * width as f64).round() as usize;
    "█".repeat(filled.clamp(1, width))
}

pub(crate) fn json_error(message: &str) -> String {
    #[derive(Serialize)]
    struct CliError<'a> {
        error: &'a str,
    }
    serde_json::to_string(&CliError { error: message })
        .unwrap_or_else(|_| format!("{{\"error\":\"{message}\"}}"))
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let end = s
            .char_indices()
            .nth(max.saturating_sub(3))
            .map_or(s.len(), |(i, _)| i);
        format!("{}...", &s[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_none() {
        let today = Local::now().date_naive();
        assert_eq!(parse_date(None).unwrap(), today);
    }

    #[test]
    fn test_parse_date_keywords() {
        let today = Local::now().date_naive();
        assert_eq!(parse_date(Some("today".to_string())).unwrap(), today);
        assert_eq!(
            parse_date(Some("yesterday".to_string())).unwrap(),
            today - chrono::Duration::days(1)
        );
        assert_eq!(
            parse_date(Some("tomorrow".to_string())).unwrap(),
            today + chrono::Duration::days(1)
        );
    }

    #[test]
    fn test_parse_date_iso() {
        let date = parse_date(Some("2024-01-15".to_string())).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn test_parse_date_invalid() {
        assert!(parse_date(Some("nope".to_string())).is_err());
    }

    #[test]
    fn test_parse_activity() {
        assert!((parse_activity("1.55").unwrap() - 1.55).abs() < f64::EPSILON);
        assert!((parse_activity("sedentary").unwrap() - 1.2).abs() < f64::EPSILON);
        assert!((parse_activity("Moderately").unwrap() - 1.55).abs() < f64::EPSILON);
        assert!(parse_activity("couch").is_err());
        assert!(parse_activity("").is_err());
    }

    #[test]
    fn test_confirm_flag() {
        assert!(confirm_flag(true, "reset").is_ok());
        let err = confirm_flag(false, "reset all data").unwrap_err();
        assert!(err.to_string().contains("--yes"));
    }

    #[test]
    fn test_bar() {
        assert_eq!(bar(0, 100, 10), "");
        assert_eq!(bar(100, 100, 10).chars().count(), 10);
        assert_eq!(bar(50, 100, 10).chars().count(), 5);
        assert_eq!(bar(1, 1000, 10).chars().count(), 1);
        assert_eq!(bar(5, 0, 10), "");
    }

    #[test]
    fn test_json_error() {
        assert_eq!(json_error("nope"), r#"{"error":"nope"}"#);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world this is long", 10), "hello w...");
        assert_eq!(truncate("Crème fraîche", 10), "Crème f...");
        assert_eq!(truncate("hello", 2), "...");
        assert_eq!(truncate("", 0), "");
    }
}
