use anyhow::{Context, Result};
use chrono::{Datelike, Duration, Local};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::grid::WeekSnapshot;
use crate::model::TimesheetEntry;

#[derive(Serialize)]
pub struct WeeklyLog {
    pub week_start: String,
    pub week_end: String,
    pub exported_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technician: Option<String>,
    pub total_minutes: i32,
    pub days: Vec<ExportDay>,
}

#[derive(Serialize)]
pub struct ExportDay {
    pub date: String,
    pub weekday: &'static str,
    pub total_minutes: i32,
    pub target_minutes: i32,
    pub entries: Vec<ExportEntry>,
}

#[derive(Serialize)]
pub struct ExportEntry {
    pub id: String,
    pub work_order_id: u32,
    pub start_time: String,
    pub duration_minutes: i32,
    pub status: String,
    pub notes: String,
}

impl From<&TimesheetEntry> for ExportEntry {
    fn from(entry: &TimesheetEntry) -> Self {
        Self {
            id: entry.id.clone(),
            work_order_id: entry.work_order_id,
            start_time: entry.start_time.clone(),
            duration_minutes: entry.duration_minutes,
            status: format!("{:?}", entry.status),
            notes: entry.notes.clone(),
        }
    }
}

/// Export a week snapshot to a JSON file under `out_dir`.
/// Returns the path of the created file on success.
/// If technician is provided, includes it in the filename and JSON.
pub fn export_week(
    snapshot: &WeekSnapshot,
    out_dir: &Path,
    technician: Option<&str>,
) -> Result<PathBuf> {
    fs::create_dir_all(out_dir).context("Failed to create export directory")?;

    // Calculate ISO week number
    let week_start = snapshot.week_start;
    let week_end = week_start + Duration::days(6);
    let iso_week = week_start.iso_week();

    // Build filename - include technician name if provided
    let filename = if let Some(name) = technician {
        // Sanitize name for filename (replace spaces with dashes, lowercase)
        let safe_name: String = name
            .chars()
            .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
            .collect();
        format!("{}-W{:02}-{}.json", iso_week.year(), iso_week.week(), safe_name)
    } else {
        format!("{}-W{:02}.json", iso_week.year(), iso_week.week())
    };
    let file_path = out_dir.join(&filename);

    let log = WeeklyLog {
        week_start: week_start.format("%Y-%m-%d").to_string(),
        week_end: week_end.format("%Y-%m-%d").to_string(),
        exported_at: Local::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
        technician: technician.map(String::from),
        total_minutes: snapshot.total_minutes(),
        days: snapshot
            .days
            .iter()
            .map(|day| ExportDay {
                date: day.date.format("%Y-%m-%d").to_string(),
                weekday: day.weekday_name,
                total_minutes: day.total_minutes,
                target_minutes: day.target_minutes,
                entries: day.entries.iter().map(ExportEntry::from).collect(),
            })
            .collect(),
    };

    let json = serde_json::to_string_pretty(&log).context("Failed to serialize weekly log")?;
    fs::write(&file_path, json).context("Failed to write weekly log")?;

    Ok(file_path)
}
