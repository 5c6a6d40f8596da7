use chrono::NaiveDate;

/// Game dates are always written month-day-year.
pub const GAME_DATE_FORMAT: &str = "%m-%d-%Y";

/// Tooltip rendering of a game date, e.g. `Mar 7, 2024`.
pub const DISPLAY_DATE_FORMAT: &str = "%b %-d, %Y";

/// Parse a game date with the fixed month-day-year pattern.
/// Anything else (ISO dates, slashes, garbage) yields `None`.
pub fn parse_game_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, GAME_DATE_FORMAT).ok()
}

pub fn format_game_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

/// Excel serial day number (1900 system) as a game-date string, so that
/// date cells read from a workbook parse like text cells from a CSV.
pub fn excel_serial_to_game_date(serial: f64) -> Option<String> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    let date = epoch.checked_add_days(chrono::Days::new(serial.floor() as u64))?;
    Some(date.format(GAME_DATE_FORMAT).to_string())
}
