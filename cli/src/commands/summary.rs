use anyhow::Result;
use chrono::Local;
use std::process;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use deficit_core::models::{DailySummary, Entry};

use super::Tracker;
use super::helpers::{bar, parse_date, print_entry_table};

const PROGRESS_WIDTH: usize = 30;
const HISTORY_BAR_WIDTH: usize = 24;

fn print_totals(summary: &DailySummary) {
    let total = summary.total;
    let goal = summary.goal;
    let deficit = summary.deficit;
    let percent = summary.percent_of_goal;
    println!("  TOTAL:   {total} kcal");
    println!("  GOAL:    {goal} kcal");
    println!("  DEFICIT: {deficit} kcal");

    let filled = bar(percent, 100, PROGRESS_WIDTH);
    let empty = "░".repeat(PROGRESS_WIDTH - filled.chars().count());
    let label = if summary.goal_reached {
        "Goal reached!"
    } else {
        "of daily goal"
    };
    println!("  [{filled}{empty}] {percent}% {label}");
}

pub(crate) fn cmd_today(tracker: &Tracker, json: bool) -> Result<()> {
    let today = Local::now().date_naive();
    let entries: Vec<&Entry> = tracker.todays_entries().collect();
    let summary = tracker.summary(today);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "entries": entries,
                "summary": summary,
            }))?
        );
        return Ok(());
    }

    println!("=== {today} ===\n");
    if entries.is_empty() {
        println!("  No entries for today yet.\n");
    } else {
        print_entry_table(&entries);
        println!();
    }
    print_totals(&summary);
    Ok(())
}

pub(crate) fn cmd_summary(tracker: &Tracker, date: Option<String>, json: bool) -> Result<()> {
    let date = parse_date(date)?;
    let summary = tracker.summary(date);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    if summary.meals.is_empty() {
        eprintln!("No entries for {date}");
        process::exit(2);
    }

    println!("=== {date} ===\n");
    for group in &summary.meals {
        let label = group.meal.as_str().to_uppercase();
        let subtotal = group.subtotal;
        println!("  {label} ({subtotal} kcal)");
        for e in &group.entries {
            println!("    [{}] {} — {} kcal", e.id, e.name, e.calories);
        }
        println!();
    }
    print_totals(&summary);
    Ok(())
}

pub(crate) fn cmd_history(tracker: &Tracker, days: u32, json: bool) -> Result<()> {
    #[derive(Tabled)]
    struct HistoryRow {
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Calories")]
        calories: i64,
        #[tabled(rename = "Deficit")]
        deficit: i64,
        #[tabled(rename = "")]
        bar: String,
    }

    let totals = tracker.last_n_days_totals(days);

    if json {
        println!("{}", serde_json::to_string_pretty(&totals)?);
        return Ok(());
    }

    let goal = tracker.goal();
    let max = totals.iter().map(|d| d.total).max().unwrap_or(0).max(goal);
    let rows: Vec<HistoryRow> = totals
        .iter()
        .map(|d| HistoryRow {
            date: d.date.format("%a %Y-%m-%d").to_string(),
            calories: d.total,
            deficit: goal - d.total,
            bar: bar(d.total, max, HISTORY_BAR_WIDTH),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..3)).with(Alignment::right()))
        .to_string();
    println!("{table}");
    Ok(())
}

pub(crate) fn cmd_streak(tracker: &Tracker, days: u32, json: bool) -> Result<()> {
    let today = Local::now().date_naive();
    let streak = tracker.logging_streak(today);
    let average = tracker.average_daily_total(today, days);

    if json {
        println!(
            "{}",
            serde_json::json!({
                "streak": streak,
                "average_days": days,
                "average_calories": average,
            })
        );
    } else {
        let plural = if streak == 1 { "" } else { "s" };
        println!("Logging streak: {streak} day{plural}");
        println!("Average over the last {days} days: {average:.0} kcal/day");
    }
    Ok(())
}
