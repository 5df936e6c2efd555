mod commands;
mod config;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use crate::commands::{
    Tracker, cmd_add, cmd_bmr_calc, cmd_bmr_clear, cmd_bmr_show, cmd_clear_day, cmd_delete,
    cmd_export, cmd_goal_set, cmd_goal_show, cmd_history, cmd_import, cmd_quick, cmd_reset,
    cmd_streak, cmd_summary, cmd_theme_set, cmd_theme_show, cmd_theme_toggle, cmd_today,
};
use crate::config::Config;
use deficit_core::db::Database;
use deficit_core::store::MAX_HISTORY_DAYS;

#[derive(Parser)]
#[command(
    name = "deficit",
    version,
    about = "A local-first calorie and deficit tracker",
    long_about = "Log what you eat, set a daily goal (or derive one from your BMR/TDEE), \
                  and watch your intake over the last week. Everything stays on this machine."
)]
struct Cli {
    /// Database file (default: platform data directory)
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,
    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a food entry
    Add {
        /// Food name
        name: String,
        /// Calories (rounded to whole kcal)
        calories: f64,
        /// Meal: breakfast, lunch, dinner, snack
        #[arg(short, long, default_value = "snack")]
        meal: String,
        /// Date to log for (YYYY-MM-DD or today/yesterday/tomorrow, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Log a quick snack of N kcal
    Quick {
        /// Calories
        #[arg(default_value = "100")]
        amount: f64,
        /// Date to log for (YYYY-MM-DD or today/yesterday/tomorrow, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show today's entries and progress toward the goal
    Today {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a day's entries grouped by meal (defaults to today)
    Summary {
        /// Date to show (YYYY-MM-DD or today/yesterday/tomorrow, default: today)
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show daily totals for the last N days
    History {
        /// Number of days to show
        #[arg(short, long, default_value = "7", value_parser = days_parser())]
        days: u32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the logging streak and average daily intake
    Streak {
        /// Window for the average, in days
        #[arg(short, long, default_value = "7", value_parser = days_parser())]
        days: u32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete an entry by ID
    Delete {
        /// Entry ID to delete
        entry_id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove all entries of one day (default: today)
    ClearDay {
        /// Date to clear (YYYY-MM-DD or today/yesterday/tomorrow, default: today)
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove ALL entries and settings
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage the daily calorie goal
    Goal {
        #[command(subcommand)]
        command: GoalCommands,
    },
    /// Calculate BMR and TDEE (Mifflin-St Jeor)
    Bmr {
        #[command(subcommand)]
        command: BmrCommands,
    },
    /// Light or dark display preference
    Theme {
        #[command(subcommand)]
        command: ThemeCommands,
    },
    /// Export all entries as CSV
    Export {
        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Import entries from a CSV file (id,date,name,meal,calories)
    Import {
        /// Path to the CSV file
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum GoalCommands {
    /// Set the daily calorie goal
    Set {
        /// Calories per day
        calories: f64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the daily calorie goal
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum BmrCommands {
    /// Compute BMR/TDEE and store them; sets the goal to TDEE if none is set
    Calc {
        /// Age in years
        #[arg(long)]
        age: u32,
        /// male or female
        #[arg(long)]
        sex: String,
        /// Weight in kg
        #[arg(long)]
        weight: f64,
        /// Height in cm
        #[arg(long)]
        height: f64,
        /// Activity multiplier or level (sedentary, lightly, moderately, very, extra)
        #[arg(long, default_value = "1.2")]
        activity: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the stored BMR/TDEE
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Forget the stored BMR/TDEE and inputs
    Clear {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ThemeCommands {
    /// Show the current theme
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set the theme: light or dark
    Set {
        theme: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Switch between light and dark
    Toggle {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn days_parser() -> clap::builder::RangedI64ValueParser<u32> {
    clap::value_parser!(u32).range(1..=i64::from(MAX_HISTORY_DAYS))
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.db)?;
    let db = Database::open(&config.db_path)?;
    let mut tracker = Tracker::load(db)?;

    match cli.command {
        Commands::Add {
            name,
            calories,
            meal,
            date,
            json,
        } => cmd_add(&mut tracker, &name, calories, &meal, date, json),
        Commands::Quick { amount, date, json } => cmd_quick(&mut tracker, amount, date, json),
        Commands::Today { json } => cmd_today(&tracker, json),
        Commands::Summary { date, json } => cmd_summary(&tracker, date, json),
        Commands::History { days, json } => cmd_history(&tracker, days, json),
        Commands::Streak { days, json } => cmd_streak(&tracker, days, json),
        Commands::Delete { entry_id, json } => cmd_delete(&mut tracker, entry_id, json),
        Commands::ClearDay { date, json } => cmd_clear_day(&mut tracker, date, json),
        Commands::Reset { yes, json } => cmd_reset(&mut tracker, yes, json),
        Commands::Goal { command } => match command {
            GoalCommands::Set { calories, json } => cmd_goal_set(&mut tracker, calories, json),
            GoalCommands::Show { json } => cmd_goal_show(&tracker, json),
        },
        Commands::Bmr { command } => match command {
            BmrCommands::Calc {
                age,
                sex,
                weight,
                height,
                activity,
                json,
            } => cmd_bmr_calc(&mut tracker, age, &sex, weight, height, &activity, json),
            BmrCommands::Show { json } => cmd_bmr_show(&tracker, json),
            BmrCommands::Clear { json } => cmd_bmr_clear(&mut tracker, json),
        },
        Commands::Theme { command } => match command {
            ThemeCommands::Show { json } => cmd_theme_show(&tracker, json),
            ThemeCommands::Set { theme, json } => cmd_theme_set(&mut tracker, &theme, json),
            ThemeCommands::Toggle { json } => cmd_theme_toggle(&mut tracker, json),
        },
        Commands::Export { output } => cmd_export(&tracker, output.as_deref()),
        Commands::Import { file, json } => cmd_import(&mut tracker, &file, json),
    }
}
