use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Positional identity of a shot within the normalized record set.
/// Stable for the lifetime of a mounted chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(pub usize);

impl RecordId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Court-space location of a shot (feet, hoop at the origin).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// One observed shot. Immutable once normalized; numeric fields that could
/// not be parsed are `NaN` or `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotRecord {
    pub position: Position,
    pub made: bool,
    /// Player name.
    pub actor: String,
    /// Team name.
    pub group: String,
    /// Shot distance in feet.
    pub distance: f64,
    pub timestamp: Option<NaiveDate>,
    /// Quarter, overtime periods continue the count.
    pub period: Option<i32>,
    pub minutes_remaining: Option<i32>,
    pub seconds_remaining: Option<i32>,
}

impl ShotRecord {
    pub fn outcome_label(&self) -> &'static str {
        if self.made {
            "Made"
        } else {
            "Missed"
        }
    }

    /// Game clock as `minutes:seconds`; absent parts render empty.
    pub fn clock_label(&self) -> String {
        let mins = self
            .minutes_remaining
            .map(|m| m.to_string())
            .unwrap_or_default();
        let secs = self
            .seconds_remaining
            .map(|s| format!("{s:02}"))
            .unwrap_or_default();
        format!("{mins}:{secs}")
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::shot;

    #[test]
    fn clock_pads_seconds() {
        let mut s = shot("A", "T", true, 5.0);
        s.minutes_remaining = Some(3);
        s.seconds_remaining = Some(7);
        assert_eq!(s.clock_label(), "3:07");
    }

    #[test]
    fn clock_with_missing_parts_renders_empty() {
        let mut s = shot("A", "T", true, 5.0);
        assert_eq!(s.clock_label(), ":");
        s.minutes_remaining = Some(11);
        assert_eq!(s.clock_label(), "11:");
    }
}
