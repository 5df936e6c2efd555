use std::collections::{HashMap, HashSet};

use chrono::{Days, Local, NaiveDate};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::csv_export;
use crate::energy;
use crate::error::{Result, TrackerError};
use crate::kv::KeyValueStore;
use crate::models::{
    BmrInputs, DailySummary, DayTotal, EnergyEstimate, Entry, ImportSummary, MEALS, Meal,
    MealGroup, Settings, Theme, validate_calories, validate_name,
};

/// Key holding the JSON array of entries.
pub const ENTRIES_KEY: &str = "cal_entries_v1";
/// Key holding the JSON settings object.
pub const SETTINGS_KEY: &str = "cal_settings_v1";
/// Longest window `last_n_days_totals` will produce.
pub const MAX_HISTORY_DAYS: u32 = 3650;

#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Owns the entry list and settings, and mirrors every change to `S`.
///
/// Mutations serialize the new state and write it before swapping it in, so a
/// failed write leaves both memory and storage on the previous state.
pub struct EntryStore<S> {
    store: S,
    entries: Vec<Entry>,
    settings: Settings,
    /// `None` once the id space is used up.
    next_id: Option<i64>,
}

impl<S: KeyValueStore> EntryStore<S> {
    /// Read both records from `store`. Unparseable records are logged and
    /// replaced by their defaults; only a failing store is an error.
    pub fn load(store: S) -> Result<Self> {
        let entries: Vec<Entry> = read_record(&store, ENTRIES_KEY)?.unwrap_or_default();
        let settings: Settings = read_record(&store, SETTINGS_KEY)?.unwrap_or_default();
        let next_id = entries
            .iter()
            .map(|e| e.id)
            .max()
            .map_or(Some(1), |max| max.checked_add(1));
        if next_id.is_none() {
            warn!("stored entry ids are exhausted; new entries will be rejected");
        }
        debug!(entries = entries.len(), ?next_id, "loaded tracker state");
        Ok(Self {
            store,
            entries,
            settings,
            next_id,
        })
    }

    // --- Accessors ---

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn goal(&self) -> i64 {
        self.settings.effective_goal()
    }

    pub fn backing_store(&self) -> &S {
        &self.store
    }

    // --- Entries ---

    pub fn add_entry(&mut self, name: &str, calories: f64, meal: Meal) -> Result<Entry> {
        self.add_entry_on(today(), name, calories, meal)
    }

    /// Log an entry attributed to `date` rather than today.
    pub fn add_entry_on(
        &mut self,
        date: NaiveDate,
        name: &str,
        calories: f64,
        meal: Meal,
    ) -> Result<Entry> {
        let name = validate_name(name)?;
        let calories = validate_calories(calories, "Calories")?;
        self.push_entry(date, name, calories, meal)
    }

    pub fn add_quick_entry(&mut self, amount: f64) -> Result<Entry> {
        self.add_quick_entry_on(today(), amount)
    }

    pub fn add_quick_entry_on(&mut self, date: NaiveDate, amount: f64) -> Result<Entry> {
        let calories = validate_calories(amount, "Amount")?;
        self.push_entry(date, format!("{calories} kcal quick"), calories, Meal::Snack)
    }

    fn push_entry(
        &mut self,
        date: NaiveDate,
        name: String,
        calories: i64,
        meal: Meal,
    ) -> Result<Entry> {
        let id = self.next_id.ok_or_else(ids_exhausted)?;
        let entry = Entry {
            id,
            name,
            calories,
            meal,
            date,
        };
        let mut entries = self.entries.clone();
        entries.push(entry.clone());
        self.commit_entries(entries)?;
        self.next_id = id.checked_add(1);
        debug!(id = entry.id, calories, %date, "added entry");
        Ok(entry)
    }

    /// Remove the entry with `id`. Returns `false` (and writes nothing) if no
    /// such entry exists.
    pub fn delete_entry(&mut self, id: i64) -> Result<bool> {
        if !self.entries.iter().any(|e| e.id == id) {
            return Ok(false);
        }
        let entries = self.entries.iter().filter(|e| e.id != id).cloned().collect();
        self.commit_entries(entries)?;
        debug!(id, "deleted entry");
        Ok(true)
    }

    /// Entries attributed to `date`, in insertion order.
    pub fn entries_for_date(&self, date: NaiveDate) -> impl Iterator<Item = &Entry> + '_ {
        self.entries.iter().filter(move |e| e.date == date)
    }

    pub fn todays_entries(&self) -> impl Iterator<Item = &Entry> + '_ {
        self.entries_for_date(today())
    }

    pub fn total_for_date(&self, date: NaiveDate) -> i64 {
        self.entries_for_date(date)
            .fold(0, |total, e| total.saturating_add(e.calories))
    }

    /// Remove every entry of `date`, returning how many were removed.
    pub fn clear_day(&mut self, date: NaiveDate) -> Result<usize> {
        let before = self.entries.len();
        let entries: Vec<Entry> = self
            .entries
            .iter()
            .filter(|e| e.date != date)
            .cloned()
            .collect();
        let removed = before - entries.len();
        if removed > 0 {
            self.commit_entries(entries)?;
            debug!(%date, removed, "cleared day");
        }
        Ok(removed)
    }

    /// Drop all entries and settings, including the persisted records.
    pub fn clear_all(&mut self) -> Result<()> {
        self.store.remove(ENTRIES_KEY)?;
        self.entries.clear();
        self.store.remove(SETTINGS_KEY)?;
        self.settings = Settings::default();
        debug!("reset all data");
        Ok(())
    }

    // --- Settings ---

    pub fn set_goal(&mut self, value: f64) -> Result<i64> {
        let goal = validate_calories(value, "Goal")?;
        let settings = Settings {
            goal: Some(goal),
            ..self.settings.clone()
        };
        self.commit_settings(settings)?;
        Ok(goal)
    }

    /// Store a BMR/TDEE result with its inputs. Adopts `round(tdee)` as the
    /// goal when none has been set.
    pub fn set_bmr_result(&mut self, bmr: f64, tdee: f64, inputs: BmrInputs) -> Result<()> {
        if !bmr.is_finite() || !tdee.is_finite() {
            return Err(TrackerError::validation("BMR and TDEE must be finite numbers"));
        }
        let mut settings = Settings {
            bmr: Some(bmr),
            tdee: Some(tdee),
            bmr_inputs: Some(inputs),
            ..self.settings.clone()
        };
        if !settings.has_explicit_goal() {
            if let Ok(goal) = validate_calories(tdee, "TDEE") {
                settings.goal = Some(goal);
                debug!(goal, "goal set from TDEE");
            }
        }
        self.commit_settings(settings)
    }

    /// Validate `inputs`, compute BMR/TDEE and store the result.
    pub fn calculate_energy(&mut self, inputs: BmrInputs) -> Result<EnergyEstimate> {
        let estimate = energy::estimate(&inputs)?;
        self.set_bmr_result(estimate.bmr, estimate.tdee, inputs)?;
        Ok(estimate)
    }

    pub fn clear_bmr_result(&mut self) -> Result<()> {
        let settings = Settings {
            bmr: None,
            tdee: None,
            bmr_inputs: None,
            ..self.settings.clone()
        };
        self.commit_settings(settings)
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        let settings = Settings {
            theme,
            ..self.settings.clone()
        };
        self.commit_settings(settings)
    }

    pub fn toggle_theme(&mut self) -> Result<Theme> {
        let theme = self.settings.theme.toggled();
        self.set_theme(theme)?;
        Ok(theme)
    }

    // --- Summaries ---

    #[allow(clippy::cast_precision_loss)]
    pub fn summary(&self, date: NaiveDate) -> DailySummary {
        let goal = self.goal();
        let mut meals = Vec::new();
        for meal in MEALS {
            let entries: Vec<Entry> = self
                .entries_for_date(date)
                .filter(|e| e.meal == *meal)
                .cloned()
                .collect();
            if entries.is_empty() {
                continue;
            }
            let subtotal = entries
                .iter()
                .fold(0_i64, |total, e| total.saturating_add(e.calories));
            meals.push(MealGroup {
                meal: *meal,
                entries,
                subtotal,
            });
        }

        let total = self.total_for_date(date);
        let deficit = goal.saturating_sub(total);
        let percent_of_goal = if goal > 0 {
            ((total as f64 / goal as f64) * 100.0).round().min(100.0) as i64
        } else {
            0
        };

        DailySummary {
            date,
            total,
            goal,
            deficit,
            remaining: deficit.max(0),
            percent_of_goal,
            goal_reached: percent_of_goal >= 100,
            meals,
        }
    }

    pub fn last_n_days_totals(&self, n: u32) -> Vec<DayTotal> {
        self.last_n_days_totals_from(today(), n)
    }

    /// Exactly `n` daily totals, oldest first, ending with `today`.
    ///
    /// `n` is capped at [`MAX_HISTORY_DAYS`], and the window stops early at
    /// the earliest representable date.
    pub fn last_n_days_totals_from(&self, today: NaiveDate, n: u32) -> Vec<DayTotal> {
        let mut by_date: HashMap<NaiveDate, i64> = HashMap::new();
        for e in &self.entries {
            let total = by_date.entry(e.date).or_default();
            *total = total.saturating_add(e.calories);
        }
        let mut totals: Vec<DayTotal> = (0..u64::from(n.min(MAX_HISTORY_DAYS)))
            .map_while(|back| today.checked_sub_days(Days::new(back)))
            .map(|date| DayTotal {
                date,
                total: by_date.get(&date).copied().unwrap_or(0),
            })
            .collect();
        totals.reverse();
        totals
    }

    /// Consecutive logged days ending today, or ending yesterday if nothing
    /// has been logged yet today.
    pub fn logging_streak(&self, today: NaiveDate) -> u32 {
        let logged: HashSet<NaiveDate> = self.entries.iter().map(|e| e.date).collect();
        let mut day = if logged.contains(&today) {
            Some(today)
        } else {
            today.pred_opt().filter(|d| logged.contains(d))
        };

        let mut streak = 0;
        while let Some(d) = day.filter(|d| logged.contains(d)) {
            streak += 1;
            day = d.pred_opt();
        }
        streak
    }

    /// Mean daily total over the `days`-day window ending `today`, counting
    /// only days that have entries.
    #[allow(clippy::cast_precision_loss)]
    pub fn average_daily_total(&self, today: NaiveDate, days: u32) -> f64 {
        let logged: Vec<f64> = self
            .last_n_days_totals_from(today, days)
            .into_iter()
            .filter(|d| self.entries_for_date(d.date).next().is_some())
            .map(|d| d.total as f64)
            .collect();
        if logged.is_empty() {
            return 0.0;
        }
        logged.iter().sum::<f64>() / logged.len() as f64
    }

    // --- CSV ---

    pub fn export_csv(&self) -> Result<String> {
        csv_export::export_csv(&self.entries)
    }

    /// Append the valid rows of an entries CSV. Invalid rows are skipped and
    /// logged; the import is written in a single store update.
    pub fn import_csv(&mut self, text: &str) -> Result<ImportSummary> {
        let rows = csv_export::parse_csv(text.as_bytes())?;
        let mut summary = ImportSummary {
            rows_parsed: rows.len(),
            ..ImportSummary::default()
        };

        let mut entries = self.entries.clone();
        let mut next_id = self.next_id;
        for row in &rows {
            let parsed = next_id
                .ok_or_else(ids_exhausted)
                .and_then(|id| entry_from_row(row, id));
            match parsed {
                Ok(entry) => {
                    next_id = entry.id.checked_add(1);
                    entries.push(entry);
                    summary.entries_imported += 1;
                }
                Err(err) => {
                    warn!(line = row.line, %err, "skipping CSV row");
                    summary.rows_skipped += 1;
                }
            }
        }

        if summary.entries_imported > 0 {
            self.commit_entries(entries)?;
            self.next_id = next_id;
        }
        debug!(
            imported = summary.entries_imported,
            skipped = summary.rows_skipped,
            "imported CSV"
        );
        Ok(summary)
    }

    // --- Persistence ---

    fn commit_entries(&mut self, entries: Vec<Entry>) -> Result<()> {
        let text = serde_json::to_string(&entries)?;
        self.store.set(ENTRIES_KEY, &text)?;
        self.entries = entries;
        Ok(())
    }

    fn commit_settings(&mut self, settings: Settings) -> Result<()> {
        let text = serde_json::to_string(&settings)?;
        self.store.set(SETTINGS_KEY, &text)?;
        self.settings = settings;
        Ok(())
    }
}

fn read_record<S: KeyValueStore, T: DeserializeOwned>(store: &S, key: &str) -> Result<Option<T>> {
    let Some(text) = store.get(key)? else {
        return Ok(None);
    };
    match decode(key, &text) {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            warn!(%err, "ignoring unreadable record, using defaults");
            Ok(None)
        }
    }
}

fn ids_exhausted() -> TrackerError {
    TrackerError::validation("No entry ids left; export and reset to keep logging")
}

fn decode<T: DeserializeOwned>(key: &str, text: &str) -> Result<T> {
    serde_json::from_str(text).map_err(|source| TrackerError::StorageRead {
        key: key.to_string(),
        source,
    })
}

fn entry_from_row(row: &csv_export::CsvRow, id: i64) -> Result<Entry> {
    let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d").map_err(|_| {
        TrackerError::validation(format!("Invalid date '{}'. Must be YYYY-MM-DD", row.date))
    })?;
    let name = validate_name(&row.name)?;
    let calories: f64 = row.calories.parse().map_err(|_| {
        TrackerError::validation(format!("Invalid calories '{}'", row.calories))
    })?;
    let calories = validate_calories(calories, "Calories")?;
    let meal: Meal = row.meal.parse()?;
    Ok(Entry {
        id,
        name,
        calories,
        meal,
        date,
    })
}
