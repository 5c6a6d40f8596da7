use crate::data::datetime;
use crate::data::mapping::{ColumnMapping, RawRow, RawValue};
use crate::state::record::{Position, ShotRecord};

/// Coerce a cell to `f64`. Empty or unparsable cells become `NaN`.
pub fn coerce_number(value: Option<&RawValue>) -> f64 {
    match value {
        Some(RawValue::Number(n)) => *n,
        Some(RawValue::Text(s)) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
        Some(RawValue::Bool(_)) | Some(RawValue::Empty) | None => f64::NAN,
    }
}

/// Coerce a cell to an integer field. Fractional values are truncated the way
/// the numeric column reader would; non-finite values are absent.
pub fn coerce_int(value: Option<&RawValue>) -> Option<i32> {
    let n = coerce_number(value);
    if n.is_finite() && n >= i32::MIN as f64 && n <= i32::MAX as f64 {
        Some(n.trunc() as i32)
    } else {
        None
    }
}

/// Only `"TRUE"`, `true` and `1` (as number or text) count as made.
pub fn coerce_made(value: Option<&RawValue>) -> bool {
    match value {
        Some(RawValue::Bool(b)) => *b,
        Some(RawValue::Number(n)) => *n == 1.0,
        Some(RawValue::Text(s)) => {
            let s = s.trim();
            s == "TRUE" || s == "1"
        }
        Some(RawValue::Empty) | None => false,
    }
}

fn coerce_text(value: Option<&RawValue>) -> String {
    value.map(RawValue::to_display).unwrap_or_default()
}

fn coerce_date(value: Option<&RawValue>) -> Option<chrono::NaiveDate> {
    value.and_then(RawValue::as_text).and_then(datetime::parse_game_date)
}

/// Convert one raw row into a shot record. Never fails: missing or malformed
/// fields fall back to their sentinel.
pub fn normalize_row(row: &RawRow, mapping: &ColumnMapping) -> ShotRecord {
    let cell = |col: &str| row.get(col);
    ShotRecord {
        position: Position::new(coerce_number(cell(&mapping.x)), coerce_number(cell(&mapping.y))),
        made: coerce_made(cell(&mapping.made)),
        actor: coerce_text(cell(&mapping.player)),
        group: coerce_text(cell(&mapping.team)),
        distance: coerce_number(cell(&mapping.distance)),
        timestamp: coerce_date(cell(&mapping.date)),
        period: coerce_int(cell(&mapping.quarter)),
        minutes_remaining: coerce_int(cell(&mapping.mins_left)),
        seconds_remaining: coerce_int(cell(&mapping.secs_left)),
    }
}

/// Normalize a whole table. Output has the same length and order as `rows`.
pub fn normalize(rows: &[RawRow], mapping: &ColumnMapping) -> Vec<ShotRecord> {
    let records: Vec<ShotRecord> = rows.iter().map(|r| normalize_row(r, mapping)).collect();

    let bad_positions = records.iter().filter(|r| !r.position.is_finite()).count();
    let bad_distances = records.iter().filter(|r| !r.distance.is_finite()).count();
    if bad_positions > 0 || bad_distances > 0 {
        tracing::warn!(
            "Normalized {} rows: {bad_positions} without a court position, {bad_distances} without a distance",
            records.len()
        );
    } else {
        tracing::debug!("Normalized {} rows", records.len());
    }
    records
}
