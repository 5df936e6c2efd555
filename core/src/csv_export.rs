use std::io::Read;

use crate::error::{Result, TrackerError};
use crate::models::Entry;

pub const CSV_HEADER: [&str; 5] = ["id", "date", "name", "meal", "calories"];

/// A raw row from an entries CSV; validated when imported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    /// 1-based line in the source, header included
    pub line: usize,
    pub date: String,
    pub name: String,
    pub meal: String,
    pub calories: String,
}

/// Render entries as `id,date,name,meal,calories`, one line per entry.
///
/// The name column is always quoted with inner quotes doubled; the other
/// columns never contain delimiters.
pub fn export_csv(entries: &[Entry]) -> Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(Vec::new());

    wtr.write_record(CSV_HEADER)?;
    for e in entries {
        let name = format!("\"{}\"", e.name.replace('"', "\"\""));
        wtr.write_record([
            e.id.to_string(),
            e.date.format("%Y-%m-%d").to_string(),
            name,
            e.meal.to_string(),
            e.calories.to_string(),
        ])?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Parse an entries CSV from any reader.
///
/// Required columns (any order, case-insensitive): `date`, `name`, `meal`,
/// `calories`. An `id` column is accepted and ignored.
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<CsvRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let col = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| TrackerError::validation(format!("Missing required column: {name}")))
    };

    let idx_date = col("date")?;
    let idx_name = col("name")?;
    let idx_meal = col("meal")?;
    let idx_cal = col("calories")?;

    let mut rows = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let field = |idx: usize| record.get(idx).unwrap_or("").to_string();
        rows.push(CsvRow {
            line: record.position().map_or(i + 2, |pos| pos.line() as usize),
            date: field(idx_date),
            name: field(idx_name),
            meal: field(idx_meal),
            calories: field(idx_cal),
        });
    }

    Ok(rows)
}
