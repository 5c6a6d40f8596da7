use std::path::PathBuf;
use crate::data::loader::LoadedTable;
use crate::data::mapping::{ColumnMapping, MAPPING_FIELDS};

/// State for the column mapping dialog, created when a file has been loaded
/// and its columns have to be matched to shot fields.
pub struct MappingDialogState {
    pub table: LoadedTable,
    pub path: PathBuf,
    pub mapping: ColumnMapping,
}

impl MappingDialogState {
    /// Pre-fill from the configured mapping, correcting names that only
    /// differ in case from a column of the file.
    pub fn new(table: LoadedTable, path: PathBuf, configured: &ColumnMapping) -> Self {
        let mapping = match_case_insensitive(configured, &table.columns);
        Self { table, path, mapping }
    }

    pub fn missing(&self) -> Vec<&'static str> {
        self.mapping.missing_columns(&self.table.columns)
    }
}

fn match_case_insensitive(configured: &ColumnMapping, columns: &[String]) -> ColumnMapping {
    let mut mapping = configured.clone();
    for (key, _) in MAPPING_FIELDS {
        let Some(name) = mapping.get_mut(key) else {
            continue;
        };
        if columns.iter().any(|c| c == name) {
            continue;
        }
        if let Some(found) = columns.iter().find(|c| c.eq_ignore_ascii_case(name)) {
            *name = found.clone();
        }
    }
    mapping
}

/// Result of the mapping dialog interaction each frame.
pub enum DialogResult {
    Ok(ColumnMapping),
    Cancel,
}

/// Show the mapping dialog as an egui window.
///
/// Returns `Some(DialogResult)` when the user presses OK or Cancel,
/// or `None` while the dialog is still open.
pub fn show_mapping_dialog(ctx: &egui::Context, state: &mut MappingDialogState) -> Option<DialogResult> {
    let mut result = None;
    let file_name = state
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    egui::Window::new("Map Shot Columns")
        .collapsible(false)
        .resizable(true)
        .default_width(420.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(egui::RichText::new(format!(
                "{file_name}: {} columns, {} rows.",
                state.table.columns.len(),
                state.table.row_count(),
            )).weak());

            ui.add_space(12.0);

            egui::Grid::new("column_mapping_grid")
                .num_columns(2)
                .spacing([12.0, 6.0])
                .show(ui, |ui| {
                    for (key, label) in MAPPING_FIELDS {
                        ui.label(egui::RichText::new(label).strong());
                        if let Some(selected) = state.mapping.get_mut(key) {
                            let present = state.table.columns.iter().any(|c| c == selected);
                            let text = if present {
                                egui::RichText::new(selected.as_str())
                            } else {
                                egui::RichText::new(format!("{selected} (missing)"))
                                    .color(ui.visuals().warn_fg_color)
                            };
                            egui::ComboBox::from_id_salt(("mapping", key))
                                .selected_text(text)
                                .width(240.0)
                                .show_ui(ui, |ui| {
                                    for col in &state.table.columns {
                                        ui.selectable_value(selected, col.clone(), col);
                                    }
                                });
                        }
                        ui.end_row();
                    }
                });

            let missing = state.missing();
            if !missing.is_empty() {
                ui.add_space(8.0);
                ui.label(
                    egui::RichText::new(format!(
                        "Unmapped fields stay empty for every shot: {}",
                        missing.join(", ")
                    ))
                    .weak(),
                );
            }

            ui.add_space(16.0);

            ui.horizontal(|ui| {
                let ok_btn = ui.add(
                    egui::Button::new(egui::RichText::new("OK").strong())
                        .min_size(egui::vec2(100.0, 32.0)),
                );
                if ok_btn.clicked() {
                    result = Some(DialogResult::Ok(state.mapping.clone()));
                }

                if ui.add(egui::Button::new("Cancel").min_size(egui::vec2(100.0, 32.0))).clicked() {
                    result = Some(DialogResult::Cancel);
                }
            });
        });

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str]) -> LoadedTable {
        LoadedTable {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    #[test]
    fn prefill_fixes_case_only_differences() {
        let t = table(&["loc_x", "LOC_Y", "Shot_Made", "PLAYER_NAME"]);
        let state = MappingDialogState::new(t, PathBuf::from("shots.csv"), &ColumnMapping::default());
        assert_eq!(state.mapping.x, "loc_x");
        assert_eq!(state.mapping.y, "LOC_Y");
        assert_eq!(state.mapping.made, "Shot_Made");
        assert!(state.missing().contains(&"team"));
        assert!(!state.missing().contains(&"x"));
    }
}
