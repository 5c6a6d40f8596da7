use std::cmp::Ordering;
use egui_extras::{Column, TableBuilder};
use crate::data::datetime;
use crate::state::record::{RecordId, ShotRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotColumn {
    Player,
    Team,
    Result,
    Distance,
    Date,
    Quarter,
    Clock,
}

impl ShotColumn {
    pub const ALL: [ShotColumn; 7] = [
        ShotColumn::Player,
        ShotColumn::Team,
        ShotColumn::Result,
        ShotColumn::Distance,
        ShotColumn::Date,
        ShotColumn::Quarter,
        ShotColumn::Clock,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            ShotColumn::Player => "Player",
            ShotColumn::Team => "Team",
            ShotColumn::Result => "Result",
            ShotColumn::Distance => "Distance",
            ShotColumn::Date => "Date",
            ShotColumn::Quarter => "Qtr",
            ShotColumn::Clock => "Clock",
        }
    }

    fn cell(&self, r: &ShotRecord) -> String {
        match self {
            ShotColumn::Player => r.actor.clone(),
            ShotColumn::Team => r.group.clone(),
            ShotColumn::Result => r.outcome_label().to_string(),
            ShotColumn::Distance if r.distance.is_finite() => format!("{:.1}", r.distance),
            ShotColumn::Distance => "-".to_string(),
            ShotColumn::Date => r.timestamp.map(datetime::format_game_date).unwrap_or_default(),
            ShotColumn::Quarter => r.period.map(|p| p.to_string()).unwrap_or_default(),
            ShotColumn::Clock if r.period.is_some() => r.clock_label(),
            ShotColumn::Clock => String::new(),
        }
    }

    /// Missing values sort first.
    fn compare(&self, a: &ShotRecord, b: &ShotRecord) -> Ordering {
        match self {
            ShotColumn::Player => a.actor.cmp(&b.actor),
            ShotColumn::Team => a.group.cmp(&b.group),
            ShotColumn::Result => a.made.cmp(&b.made),
            ShotColumn::Distance => a.distance.total_cmp(&b.distance),
            ShotColumn::Date => a.timestamp.cmp(&b.timestamp),
            ShotColumn::Quarter => a.period.cmp(&b.period),
            // Game clock counts down.
            ShotColumn::Clock => (b.minutes_remaining, b.seconds_remaining)
                .cmp(&(a.minutes_remaining, a.seconds_remaining)),
        }
    }
}

/// Per-chart table state.
#[derive(Debug, Clone, Default)]
pub struct ShotTableState {
    pub sort: Option<(ShotColumn, SortDirection)>,
}

impl ShotTableState {
    /// Ascending, then descending, then unsorted.
    pub fn cycle_sort(&mut self, col: ShotColumn) {
        self.sort = match self.sort {
            Some((c, SortDirection::Ascending)) if c == col => Some((col, SortDirection::Descending)),
            Some((c, SortDirection::Descending)) if c == col => None,
            _ => Some((col, SortDirection::Ascending)),
        };
    }

    /// `visible` reordered by the current sort; stable so ties keep record order.
    pub fn sorted_rows(&self, records: &[ShotRecord], visible: &[RecordId]) -> Vec<RecordId> {
        let mut rows = visible.to_vec();
        if let Some((col, dir)) = self.sort {
            rows.sort_by(|a, b| {
                let cmp = col.compare(&records[a.index()], &records[b.index()]);
                match dir {
                    SortDirection::Ascending => cmp,
                    SortDirection::Descending => cmp.reverse(),
                }
            });
        }
        rows
    }
}

pub fn show_shot_table(
    ui: &mut egui::Ui,
    state: &mut ShotTableState,
    records: &[ShotRecord],
    visible: &[RecordId],
) {
    if visible.is_empty() {
        ui.label("No shots match the current filters.");
        return;
    }

    let rows = state.sorted_rows(records, visible);
    let current_sort = state.sort;
    let clicked_col: std::cell::Cell<Option<ShotColumn>> = std::cell::Cell::new(None);

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .columns(Column::auto().at_least(60.0), ShotColumn::ALL.len())
        .min_scrolled_height(200.0)
        .header(20.0, |mut header| {
            for col in ShotColumn::ALL {
                header.col(|ui| {
                    let arrow = match current_sort {
                        Some((c, SortDirection::Ascending)) if c == col => " ^",
                        Some((c, SortDirection::Descending)) if c == col => " v",
                        _ => "",
                    };
                    if ui.button(format!("{}{arrow}", col.header())).clicked() {
                        clicked_col.set(Some(col));
                    }
                });
            }
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let record = &records[rows[row.index()].index()];
                for col in ShotColumn::ALL {
                    row.col(|ui| {
                        ui.label(col.cell(record));
                    });
                }
            });
        });

    if let Some(col) = clicked_col.get() {
        state.cycle_sort(col);
    }
}
