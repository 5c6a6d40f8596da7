use egui::{Color32, Visuals};
use serde::{Deserialize, Serialize};

const MADE_COLOR: [u8; 4] = [46, 204, 113, 220];
const MISSED_COLOR: [u8; 4] = [231, 76, 60, 200];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn toggle(&self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn visuals(&self) -> Visuals {
        match self {
            Theme::Dark => Visuals::dark(),
            Theme::Light => Visuals::light(),
        }
    }

    /// Marker fill, keyed by outcome only.
    pub fn shot_color(&self, made: bool) -> [u8; 4] {
        if made {
            MADE_COLOR
        } else {
            MISSED_COLOR
        }
    }

    pub fn court_bg(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_rgb(28, 24, 20),
            Theme::Light => Color32::from_rgb(244, 232, 210),
        }
    }

    pub fn court_line(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_gray(170),
            Theme::Light => Color32::from_gray(70),
        }
    }

    pub fn bar_fill(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_rgb(90, 140, 200),
            Theme::Light => Color32::from_rgb(70, 120, 180),
        }
    }

    pub fn brush_fill(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_rgba_unmultiplied(255, 255, 255, 40),
            Theme::Light => Color32::from_rgba_unmultiplied(0, 0, 0, 30),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Dark
    }
}
