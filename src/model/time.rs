//! Time-slot math and wall-clock string parsing.
//!
//! The engine keeps wall-clock times as "HH:MM" strings and does all
//! arithmetic in minutes since midnight. The schedule grid is divided into
//! fixed 15-minute slots identified by their start minute (0, 15, 30, 45
//! past each hour).

use chrono::{Datelike, Duration, NaiveDate};

use crate::error::EngineError;

/// Width of one schedule slot in minutes.
pub const SLOT_MINUTES: i32 = 15;

/// Minutes in a day; valid minute-of-day values are `0..MINUTES_PER_DAY`.
pub const MINUTES_PER_DAY: i32 = 24 * 60;

/// Parse "HH:MM" to minutes since midnight, in [0, 1439].
pub fn time_to_minutes(time: &str) -> Result<i32, EngineError> {
    let malformed = || EngineError::Format {
        input: time.to_string(),
    };

    let (hours_part, minutes_part) = time.split_once(':').ok_or_else(malformed)?;
    let hours: i32 = hours_part.parse().map_err(|_| malformed())?;
    let minutes: i32 = minutes_part.parse().map_err(|_| malformed())?;

    if !(0..24).contains(&hours) || !(0..60).contains(&minutes) {
        return Err(malformed());
    }

    Ok(hours * 60 + minutes)
}

/// Format minutes since midnight as zero-padded "HH:MM".
/// Inverse of [`time_to_minutes`] for inputs in [0, 1439].
pub fn minutes_to_time(minutes: i32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// The start minute of the slot containing `minutes` (floor to a multiple
/// of 15). This single value decides which slot owns an entry.
pub fn slot_start(minutes: i32) -> i32 {
    (minutes / SLOT_MINUTES) * SLOT_MINUTES
}

/// Number of 15-minute slot rows a duration spans visually (round up).
/// Used for render height only, never for slot ownership.
pub fn slots_spanned(duration_minutes: i32) -> i32 {
    (duration_minutes + SLOT_MINUTES - 1) / SLOT_MINUTES
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let days_from_monday = date.weekday().num_days_from_monday();
    date - Duration::days(days_from_monday as i64)
}

/// Parse a user-entered start time (e.g. "9:00am", "14:30", "2pm", "9") to
/// canonical "HH:MM", snapped down to a 15-minute boundary.
/// Returns None on garbage input.
pub fn parse_time_input(input: &str) -> Option<String> {
    let input = input.trim().to_lowercase();
    if input.is_empty() {
        return None;
    }

    // Check for am/pm suffix
    let (time_part, is_pm) = if let Some(stripped) = input.strip_suffix("pm") {
        (stripped, true)
    } else if let Some(stripped) = input.strip_suffix("am") {
        (stripped, false)
    } else if let Some(stripped) = input.strip_suffix('p') {
        (stripped, true)
    } else if let Some(stripped) = input.strip_suffix('a') {
        (stripped, false)
    } else {
        (input.as_str(), false) // 24-hour format assumed
    };

    let time_part = time_part.trim();

    // Parse hour and optional minute
    let (hour, minute) = if let Some((h, m)) = time_part.split_once(':') {
        (h.parse::<i32>().ok()?, m.parse::<i32>().ok()?)
    } else {
        (time_part.parse::<i32>().ok()?, 0)
    };

    // Convert to 24-hour if am/pm was given; 12am is midnight
    let hour_24 = if is_pm && hour < 12 {
        hour + 12
    } else if !is_pm && hour == 12 && input.contains('a') {
        0
    } else {
        hour
    };

    if !(0..24).contains(&hour_24) || !(0..60).contains(&minute) {
        return None;
    }

    Some(minutes_to_time(slot_start(hour_24 * 60 + minute)))
}

/// Parse a user-entered duration ("1h 30m", "1.5h", "90m", bare numbers)
/// to minutes, snapped up to a positive multiple of 15.
/// Returns None on garbage or zero.
pub fn parse_duration_input(input: &str) -> Option<i32> {
    let input = input.trim().to_lowercase();
    if input.is_empty() {
        return None;
    }

    let mut total_minutes: f32 = 0.0;
    let mut current_num = String::new();
    let mut has_unit = false;

    for c in input.chars() {
        if c.is_ascii_digit() || c == '.' {
            current_num.push(c);
        } else if c == 'h' {
            if let Ok(hours) = current_num.parse::<f32>() {
                total_minutes += hours * 60.0;
                has_unit = true;
            }
            current_num.clear();
        } else if c == 'm' {
            if let Ok(mins) = current_num.parse::<f32>() {
                total_minutes += mins;
                has_unit = true;
            }
            current_num.clear();
        } else if c.is_whitespace() {
            // ignore whitespace
        } else {
            return None; // invalid character
        }
    }

    // Handle trailing number without unit
    if !current_num.is_empty() {
        if let Ok(num) = current_num.parse::<f32>() {
            if has_unit {
                // Units already consumed, a trailing bare number is invalid
                return None;
            }
            // Bare number: decimals are hours; small integers are hours
            // (nobody logs 3 minutes), 9+ are minutes
            if current_num.contains('.') {
                total_minutes = num * 60.0;
            } else if (1.0..=8.0).contains(&num) {
                total_minutes = num * 60.0;
            } else {
                total_minutes = num;
            }
        }
    }

    let minutes = total_minutes.round() as i32;
    if minutes <= 0 {
        return None;
    }

    Some(slots_spanned(minutes) * SLOT_MINUTES)
}

/// Format minutes as "Xh Ym".
pub fn format_duration(minutes: i32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;

    if hours > 0 && mins > 0 {
        format!("{}h {}m", hours, mins)
    } else if hours > 0 {
        format!("{}h", hours)
    } else if mins > 0 {
        format!("{}m", mins)
    } else {
        "0m".to_string()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn minutes_round_trip() {
        for m in 0..MINUTES_PER_DAY {
            assert_eq!(time_to_minutes(&minutes_to_time(m)).unwrap(), m);
        }
    }

    #[rstest]
    #[case("")]
    #[case("0900")]
    #[case("ab:cd")]
    #[case("24:00")]
    #[case("10:60")]
    #[case("-1:30")]
    #[case("10:30:00")]
    fn rejects_malformed_times(#[case] input: &str) {
        assert!(matches!(
            time_to_minutes(input),
            Err(EngineError::Format { .. })
        ));
    }

    #[rstest]
    #[case("09:05", 545)]
    #[case("00:00", 0)]
    #[case("23:45", 1425)]
    fn parses_valid_times(#[case] input: &str, #[case] expected: i32) {
        assert_eq!(time_to_minutes(input).unwrap(), expected);
    }

    #[test]
    fn slot_start_floors_to_quarter_hour() {
        assert_eq!(slot_start(545), 540); // 09:05 belongs to the 09:00 slot
        assert_eq!(slot_start(540), 540);
        assert_eq!(slot_start(554), 540);
        assert_eq!(slot_start(555), 555);
        assert_eq!(slot_start(0), 0);
    }

    #[test]
    fn slots_spanned_rounds_up() {
        assert_eq!(slots_spanned(60), 4);
        assert_eq!(slots_spanned(61), 5);
        assert_eq!(slots_spanned(15), 1);
        assert_eq!(slots_spanned(1), 1);
    }

    #[test]
    fn week_start_is_monday() {
        let wed = NaiveDate::from_ymd_opt(2025, 1, 8).unwrap();
        let mon = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        assert_eq!(week_start(wed), mon);
        assert_eq!(week_start(mon), mon);
        // Sunday belongs to the week starting the previous Monday
        let sun = NaiveDate::from_ymd_opt(2025, 1, 12).unwrap();
        assert_eq!(week_start(sun), mon);
    }

    #[rstest]
    #[case("9", "09:00")]
    #[case("9:30", "09:30")]
    #[case("2pm", "14:00")]
    #[case("12am", "00:00")]
    #[case("12pm", "12:00")]
    #[case("14:37", "14:30")] // snapped down to the slot boundary
    #[case("  8:05 AM ", "08:00")]
    fn parses_time_input(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(parse_time_input(input).as_deref(), Some(expected));
    }

    #[rstest]
    #[case("")]
    #[case("25:00")]
    #[case("noon")]
    fn rejects_time_input(#[case] input: &str) {
        assert_eq!(parse_time_input(input), None);
    }

    #[rstest]
    #[case("1h 30m", 90)]
    #[case("1.5h", 90)]
    #[case("90m", 90)]
    #[case("2", 120)] // small bare integers are hours
    #[case("45", 45)] // larger bare integers are minutes
    #[case("20m", 30)] // snapped up to a slot multiple
    fn parses_duration_input(#[case] input: &str, #[case] expected: i32) {
        assert_eq!(parse_duration_input(input), Some(expected));
    }

    #[rstest]
    #[case("")]
    #[case("0m")]
    #[case("1h oops")]
    #[case("1h 5")]
    fn rejects_duration_input(#[case] input: &str) {
        assert_eq!(parse_duration_input(input), None);
    }

    #[test]
    fn formats_durations() {
        assert_eq!(format_duration(90), "1h 30m");
        assert_eq!(format_duration(120), "2h");
        assert_eq!(format_duration(45), "45m");
        assert_eq!(format_duration(0), "0m");
    }
}
