use std::path::Path;

use anyhow::{Context, Result};

use super::Tracker;

pub(crate) fn cmd_export(tracker: &Tracker, output: Option<&Path>) -> Result<()> {
    let csv = tracker.export_csv()?;

    match output {
        Some(path) => {
            std::fs::write(path, &csv)
                .with_context(|| format!("Failed to write file: {}", path.display()))?;
            let count = tracker.entries().len();
            eprintln!("Exported {count} entries to {}", path.display());
        }
        None => print!("{csv}"),
    }
    Ok(())
}

pub(crate) fn cmd_import(tracker: &mut Tracker, path: &Path, json: bool) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;

    let summary = tracker.import_csv(&text)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Import complete.\n");
        println!("  Rows parsed:      {}", summary.rows_parsed);
        println!("  Entries imported: {}", summary.entries_imported);
        println!("  Rows skipped:     {}", summary.rows_skipped);
    }
    Ok(())
}
