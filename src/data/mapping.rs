use std::collections::HashMap;
use serde::{Deserialize, Serialize};

/// A single cell from the source table. CSV cells always arrive as text;
/// Excel cells keep their native type.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Empty,
}

impl RawValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Render the cell for display and string-keyed fields.
    pub fn to_display(&self) -> String {
        match self {
            RawValue::Text(s) => s.trim().to_string(),
            RawValue::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() {
                    format!("{n:.0}")
                } else {
                    n.to_string()
                }
            }
            RawValue::Bool(b) => b.to_string(),
            RawValue::Empty => String::new(),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            RawValue::Empty
        } else {
            RawValue::Text(s.to_string())
        }
    }
}

/// One row of the source table keyed by column name.
pub type RawRow = HashMap<String, RawValue>;

/// Which source column feeds each shot field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub x: String,
    pub y: String,
    pub made: String,
    pub player: String,
    pub team: String,
    pub distance: String,
    pub date: String,
    pub quarter: String,
    #[serde(rename = "minsLeft")]
    pub mins_left: String,
    #[serde(rename = "secsLeft")]
    pub secs_left: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            x: "LOC_X".to_string(),
            y: "LOC_Y".to_string(),
            made: "SHOT_MADE".to_string(),
            player: "PLAYER_NAME".to_string(),
            team: "TEAM_NAME".to_string(),
            distance: "SHOT_DISTANCE".to_string(),
            date: "GAME_DATE".to_string(),
            quarter: "QUARTER".to_string(),
            mins_left: "MINS_LEFT".to_string(),
            secs_left: "SECS_LEFT".to_string(),
        }
    }
}

/// Mapping keys in display order, paired with their labels.
pub const MAPPING_FIELDS: [(&str, &str); 10] = [
    ("x", "Court X"),
    ("y", "Court Y"),
    ("made", "Shot made"),
    ("player", "Player"),
    ("team", "Team"),
    ("distance", "Distance"),
    ("date", "Game date"),
    ("quarter", "Quarter"),
    ("minsLeft", "Minutes left"),
    ("secsLeft", "Seconds left"),
];

impl ColumnMapping {
    pub fn get(&self, key: &str) -> Option<&str> {
        let col = match key {
            "x" => &self.x,
            "y" => &self.y,
            "made" => &self.made,
            "player" => &self.player,
            "team" => &self.team,
            "distance" => &self.distance,
            "date" => &self.date,
            "quarter" => &self.quarter,
            "minsLeft" => &self.mins_left,
            "secsLeft" => &self.secs_left,
            _ => return None,
        };
        Some(col.as_str())
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut String> {
        match key {
            "x" => Some(&mut self.x),
            "y" => Some(&mut self.y),
            "made" => Some(&mut self.made),
            "player" => Some(&mut self.player),
            "team" => Some(&mut self.team),
            "distance" => Some(&mut self.distance),
            "date" => Some(&mut self.date),
            "quarter" => Some(&mut self.quarter),
            "minsLeft" => Some(&mut self.mins_left),
            "secsLeft" => Some(&mut self.secs_left),
            _ => None,
        }
    }

    /// Mapping keys whose column is not among `columns`.
    pub fn missing_columns(&self, columns: &[String]) -> Vec<&'static str> {
        MAPPING_FIELDS
            .iter()
            .filter(|(key, _)| {
                self.get(key)
                    .map(|col| !columns.iter().any(|c| c == col))
                    .unwrap_or(true)
            })
            .map(|(key, _)| *key)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_uses_camel_case_keys() {
        let json = r#"{"x":"cx","minsLeft":"ml","secsLeft":"sl"}"#;
        let m: ColumnMapping = serde_json::from_str(json).unwrap();
        assert_eq!(m.x, "cx");
        assert_eq!(m.mins_left, "ml");
        assert_eq!(m.secs_left, "sl");
        assert_eq!(m.player, "PLAYER_NAME");
    }

    #[test]
    fn missing_columns_lists_unmapped_keys() {
        let m = ColumnMapping::default();
        let columns: Vec<String> = ["LOC_X", "LOC_Y", "SHOT_MADE", "PLAYER_NAME", "TEAM_NAME", "SHOT_DISTANCE"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(m.missing_columns(&columns), vec!["date", "quarter", "minsLeft", "secsLeft"]);
    }

    #[test]
    fn numeric_cells_display_without_trailing_zero() {
        assert_eq!(RawValue::Number(3.0).to_display(), "3");
        assert_eq!(RawValue::Number(2.5).to_display(), "2.5");
        assert_eq!(RawValue::from("").to_display(), "");
    }
}
