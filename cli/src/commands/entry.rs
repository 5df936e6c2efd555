use anyhow::Result;
use std::process;

use deficit_core::models::Meal;

use super::Tracker;
use super::helpers::{confirm_flag, json_error, parse_date};

pub(crate) fn cmd_add(
    tracker: &mut Tracker,
    name: &str,
    calories: f64,
    meal: &str,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let meal: Meal = meal.parse()?;
    let date = parse_date(date)?;
    let entry = tracker.add_entry_on(date, name, calories, meal)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
    } else {
        let total = tracker.total_for_date(date);
        println!(
            "Logged [{}] {} — {} kcal for {} on {}",
            entry.id, entry.name, entry.calories, entry.meal, entry.date
        );
        println!("  Day total: {total} kcal");
    }
    Ok(())
}

pub(crate) fn cmd_quick(
    tracker: &mut Tracker,
    amount: f64,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let date = parse_date(date)?;
    let entry = tracker.add_quick_entry_on(date, amount)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
    } else {
        let total = tracker.total_for_date(date);
        println!("Logged [{}] {} on {}", entry.id, entry.name, entry.date);
        println!("  Day total: {total} kcal");
    }
    Ok(())
}

pub(crate) fn cmd_delete(tracker: &mut Tracker, entry_id: i64, json: bool) -> Result<()> {
    if tracker.delete_entry(entry_id)? {
        if json {
            println!("{}", serde_json::json!({ "deleted": entry_id }));
        } else {
            println!("Deleted entry {entry_id}");
        }
        Ok(())
    } else {
        if json {
            println!("{}", json_error(&format!("Entry {entry_id} not found")));
        } else {
            eprintln!("Entry {entry_id} not found");
        }
        process::exit(2);
    }
}

pub(crate) fn cmd_clear_day(tracker: &mut Tracker, date: Option<String>, json: bool) -> Result<()> {
    let date = parse_date(date)?;
    let removed = tracker.clear_day(date)?;

    if json {
        println!(
            "{}",
            serde_json::json!({ "date": date, "removed": removed })
        );
    } else if removed == 0 {
        eprintln!("No entries for {date}");
    } else {
        println!("Removed {removed} entries from {date}");
    }
    Ok(())
}

pub(crate) fn cmd_reset(tracker: &mut Tracker, yes: bool, json: bool) -> Result<()> {
    confirm_flag(yes, "reset all entries and settings")?;
    tracker.clear_all()?;

    if json {
        println!("{}", serde_json::json!({ "reset": true }));
    } else {
        println!("All entries and settings removed");
    }
    Ok(())
}
