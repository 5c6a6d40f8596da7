use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use eframe::egui;
use crate::config::AppConfig;
use crate::data::loader::{self, LoadedTable};
use crate::data::mapping::ColumnMapping;
use crate::data::normalize;
use crate::error::LoadError;
use crate::state::chart_state::ChartState;
use crate::state::events::{EventKind, ListenerId};
use crate::state::theme::Theme;
use crate::ui::chart_panel::{self, ChartPanelState};
use crate::ui::mapping_dialog::{self, DialogResult, MappingDialogState};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Pending async file load result.
struct PendingLoad {
    path: PathBuf,
    result: Arc<Mutex<Option<Result<LoadedTable, LoadError>>>>,
}

/// The shot chart application: loads a file, maps its columns and mounts
/// one chart over the normalized shots.
pub struct ShotChartApp {
    config: AppConfig,
    theme: Theme,
    chart: Option<ChartState>,
    /// Logging listeners registered on `chart`.
    listeners: Vec<ListenerId>,
    panel: ChartPanelState,
    /// Active column mapping dialog (shown after a file is loaded).
    mapping_dialog: Option<MappingDialogState>,
    /// An error message to display until dismissed.
    error_message: Option<String>,
    /// Async file load in progress.
    pending_load: Option<PendingLoad>,
}

fn is_supported(path: &Path) -> bool {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    ext == "csv" || ext == "xls" || ext == "xlsx"
}

fn rounded(mut vis: egui::Visuals) -> egui::Visuals {
    vis.window_corner_radius = egui::CornerRadius::same(8);
    vis.widgets.noninteractive.corner_radius = egui::CornerRadius::same(6);
    vis.widgets.inactive.corner_radius = egui::CornerRadius::same(6);
    vis.widgets.hovered.corner_radius = egui::CornerRadius::same(6);
    vis.widgets.active.corner_radius = egui::CornerRadius::same(6);
    vis.widgets.open.corner_radius = egui::CornerRadius::same(6);
    vis
}

impl ShotChartApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig, data_file: Option<PathBuf>) -> Self {
        let ctx = &cc.egui_ctx;
        let mut style = (*ctx.style()).clone();

        style.text_styles.insert(
            egui::TextStyle::Body,
            egui::FontId::proportional(14.0),
        );
        style.text_styles.insert(
            egui::TextStyle::Heading,
            egui::FontId::proportional(20.0),
        );
        style.spacing.button_padding = egui::vec2(8.0, 4.0);
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        style.spacing.window_margin = egui::Margin::same(12);

        ctx.set_style(style);
        let theme = Theme::default();
        ctx.set_visuals(rounded(theme.visuals()));

        let mut app = Self {
            config,
            theme,
            chart: None,
            listeners: Vec::new(),
            panel: ChartPanelState::default(),
            mapping_dialog: None,
            error_message: None,
            pending_load: None,
        };
        if let Some(path) = data_file {
            app.load_file(&path);
        }
        app
    }

    /// Open a native file dialog and load the picked file.
    fn open_file_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Shot Data", &["csv", "xls", "xlsx"])
            .add_filter("All Files", &["*"])
            .pick_file()
        {
            self.load_file(&path);
        }
    }

    /// Parse a data file on a worker thread so the UI stays responsive.
    fn load_file(&mut self, path: &Path) {
        let path_buf = path.to_path_buf();
        let result: Arc<Mutex<Option<Result<LoadedTable, LoadError>>>> = Arc::new(Mutex::new(None));
        let result_clone = Arc::clone(&result);

        std::thread::spawn(move || {
            let loaded = loader::load_file(&path_buf);
            if let Ok(mut slot) = result_clone.lock() {
                *slot = Some(loaded);
            }
        });

        self.pending_load = Some(PendingLoad { path: path.to_path_buf(), result });
    }

    fn poll_pending_load(&mut self) {
        let Some(pending) = &self.pending_load else {
            return;
        };
        let finished = match pending.result.lock() {
            Ok(mut slot) => slot.take(),
            Err(_) => Some(Err(LoadError::Io {
                path: pending.path.clone(),
                source: std::io::Error::other("loader thread panicked"),
            })),
        };
        let Some(result) = finished else {
            return;
        };
        let Some(pending) = self.pending_load.take() else {
            return;
        };
        match result {
            Ok(table) => {
                tracing::info!(
                    path = %pending.path.display(),
                    columns = table.columns.len(),
                    rows = table.row_count(),
                    "file loaded"
                );
                self.mapping_dialog = Some(MappingDialogState::new(table, pending.path, &self.config.columns));
            }
            Err(e) => {
                tracing::error!("Failed to load file: {e}");
                self.error_message = Some(format!("Failed to load file: {e}"));
            }
        }
    }

    /// Normalize the mapped rows and replace the current chart with a new one.
    fn mount_chart(&mut self, table: &LoadedTable, mapping: ColumnMapping) {
        let missing = mapping.missing_columns(&table.columns);
        if !missing.is_empty() {
            tracing::warn!(?missing, "mapped columns not found in file");
        }
        let records = normalize::normalize(&table.rows, &mapping);
        self.config.columns = mapping;

        if let Some(mut old) = self.chart.take() {
            for id in self.listeners.drain(..) {
                old.unsubscribe(id);
            }
            old.unmount();
        }
        self.panel = ChartPanelState::default();

        match ChartState::mount(self.config.title.clone(), records, &self.config) {
            Ok(mut chart) => {
                chart.set_theme(self.theme);
                self.listeners.push(chart.subscribe(EventKind::Filter, |event, outcome| {
                    tracing::info!(?event, visible = outcome.visible_count, "filter changed");
                }));
                self.listeners.push(chart.subscribe(EventKind::Brush, |_, outcome| {
                    if outcome.changed {
                        tracing::debug!(visible = outcome.visible_count, "brush moved");
                    }
                }));
                self.chart = Some(chart);
            }
            Err(e) => {
                tracing::error!("Failed to build chart: {e}");
                self.error_message = Some(format!("Failed to build chart: {e}"));
            }
        }
    }
}

impl eframe::App for ShotChartApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(rounded(self.theme.visuals()));

        // ------------------------------------------------------------------
        // 1. Handle dropped files
        // ------------------------------------------------------------------
        let dropped: Option<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .find(|p| is_supported(p))
        });
        if let Some(path) = dropped {
            self.load_file(&path);
        }

        // --- Header panel ---
        let mut open_file = false;
        egui::TopBottomPanel::top("header")
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(16, 8)))
            .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Shot Chart");
                ui.separator();

                if ui.button("Open Data...").clicked() {
                    open_file = true;
                }

                if let Some(msg) = &self.error_message {
                    ui.separator();
                    ui.colored_label(egui::Color32::from_rgb(255, 80, 80), msg);
                    if ui.small_button("dismiss").clicked() {
                        self.error_message = None;
                    }
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let theme_label = match self.theme {
                        Theme::Dark => "Light Mode",
                        Theme::Light => "Dark Mode",
                    };
                    if ui.button(theme_label).clicked() {
                        self.theme = self.theme.toggle();
                        if let Some(chart) = &mut self.chart {
                            chart.set_theme(self.theme);
                        }
                    }

                    ui.separator();
                    ui.small(format!("v{VERSION}"));
                });
            });
        });

        if open_file {
            self.open_file_dialog();
        }

        // --- Central panel with the chart ---
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| match &mut self.chart {
                Some(chart) => chart_panel::show_chart(ui, chart, &mut self.panel),
                None => {
                    ui.add_space(40.0);
                    ui.vertical_centered(|ui| {
                        ui.label(egui::RichText::new("No shots loaded").strong().size(16.0));
                        ui.add_space(6.0);
                        ui.label(egui::RichText::new("Open a CSV or Excel file, or drag-and-drop one here.").weak());
                    });
                }
            });
        });

        // ------------------------------------------------------------------
        // 2. Poll async file load
        // ------------------------------------------------------------------
        self.poll_pending_load();

        if self.pending_load.is_some() {
            egui::Window::new("Loading")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Loading file...");
                    });
                });
            ctx.request_repaint();
        }

        // ------------------------------------------------------------------
        // 3. Column mapping dialog
        // ------------------------------------------------------------------
        let mut accepted = None;
        if let Some(dialog) = &mut self.mapping_dialog {
            match mapping_dialog::show_mapping_dialog(ctx, dialog) {
                Some(DialogResult::Ok(mapping)) => accepted = Some(mapping),
                Some(DialogResult::Cancel) => self.mapping_dialog = None,
                None => {}
            }
        }
        if let Some(mapping) = accepted {
            if let Some(dialog) = self.mapping_dialog.take() {
                self.mount_chart(&dialog.table, mapping);
            }
        }
    }
}
