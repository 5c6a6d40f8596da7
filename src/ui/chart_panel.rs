use crate::render::brush::{self, BrushEvent};
use crate::render::histogram;
use crate::render::transform::{self, ZoomGesture, ZoomTransform};
use crate::state::chart_state::ChartState;
use crate::state::events::{ChartEvent, HoverEvent};
use crate::state::theme::Theme;
use crate::ui::filter_controls;
use crate::ui::shot_table::{self, ShotTableState};

/// Space under the histogram for tick labels.
const AXIS_HEIGHT: f32 = 20.0;

/// UI-only state kept next to a mounted chart between frames.
#[derive(Debug, Default)]
pub struct ChartPanelState {
    pub table: ShotTableState,
    brush_origin: Option<f64>,
    last_hover: Option<[f64; 2]>,
}

fn to_pos(origin: egui::Pos2, p: [f64; 2]) -> egui::Pos2 {
    origin + egui::vec2(p[0] as f32, p[1] as f32)
}

fn color(rgba: [u8; 4]) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(rgba[0], rgba[1], rgba[2], rgba[3])
}

/// Draw one chart: filters, scatter, histogram, status line and table.
pub fn show_chart(ui: &mut egui::Ui, chart: &mut ChartState, panel: &mut ChartPanelState) {
    let theme = chart.theme();

    ui.heading(chart.title());
    ui.add_space(4.0);

    for event in filter_controls::show_filter_controls(ui, chart) {
        chart.dispatch(event);
    }
    ui.add_space(6.0);

    show_scatter(ui, chart, panel, theme);
    ui.add_space(6.0);
    show_histogram(ui, chart, panel, theme);
    ui.add_space(4.0);
    show_status_line(ui, chart, panel, theme);

    ui.add_space(8.0);
    egui::CollapsingHeader::new(format!("Visible shots ({})", chart.visible_subset().len()))
        .id_salt(("shot_table", chart.title()))
        .default_open(false)
        .show(ui, |ui| {
            shot_table::show_shot_table(ui, &mut panel.table, chart.records(), chart.visible_subset());
        });
}

fn show_scatter(ui: &mut egui::Ui, chart: &mut ChartState, panel: &mut ChartPanelState, theme: Theme) {
    let [w, h] = chart.scatter_size();
    let rect = ui.allocate_space(egui::vec2(w, h)).1;
    let id = egui::Id::new("shot_scatter").with(chart.title());
    let response = ui.interact(rect, id, egui::Sense::click_and_drag());

    let gestures = transform::read_zoom_gestures(&response, rect);
    let zoomed = !gestures.is_empty();
    for gesture in gestures {
        chart.dispatch(ChartEvent::Zoom(gesture));
    }

    match response.hover_pos() {
        Some(pos) => {
            let local = pos - rect.min;
            let local = [local.x as f64, local.y as f64];
            if zoomed || panel.last_hover != Some(local) {
                panel.last_hover = Some(local);
                chart.dispatch(ChartEvent::Hover(HoverEvent::Move { pos: local }));
            }
        }
        None => {
            if panel.last_hover.take().is_some() {
                chart.dispatch(ChartEvent::Hover(HoverEvent::Leave));
            }
        }
    }

    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, theme.court_bg());

    let line = egui::Stroke::new(1.5, theme.court_line());
    for polyline in chart.court_px() {
        let points: Vec<egui::Pos2> = polyline.iter().map(|p| to_pos(rect.min, *p)).collect();
        painter.add(egui::Shape::line(points, line));
    }

    for el in chart.points().elements() {
        painter.circle_filled(to_pos(rect.min, el.center), el.radius, el.color32());
    }

    if let Some(el) = chart.hovered().and_then(|id| chart.points().get(id)) {
        painter.circle_stroke(
            to_pos(rect.min, el.center),
            el.radius + 2.0,
            egui::Stroke::new(1.5, ui.visuals().strong_text_color()),
        );
    }

    if chart.points().is_empty() {
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            "No shots to display",
            egui::FontId::proportional(14.0),
            theme.court_line(),
        );
    }

    let accent = chart
        .hovered()
        .map(|id| color(theme.shot_color(chart.records()[id.index()].made)))
        .unwrap_or_else(|| theme.court_line());
    chart.tooltip().paint(ui.ctx(), rect.min, accent);
}

fn show_histogram(ui: &mut egui::Ui, chart: &mut ChartState, panel: &mut ChartPanelState, theme: Theme) {
    let [w, h] = chart.histogram_size();
    let total = ui.allocate_space(egui::vec2(w, h + AXIS_HEIGHT)).1;
    let rect = egui::Rect::from_min_size(total.min, egui::vec2(w, h));
    let id = egui::Id::new("shot_histogram").with(chart.title());
    let response = ui.interact(rect, id, egui::Sense::click_and_drag());

    if let Some(event) = brush::read_brush_gesture(&response, rect, &mut panel.brush_origin) {
        chart.dispatch(ChartEvent::Brush(event));
    }

    let painter = ui.painter_at(total);
    let text_color = ui.visuals().text_color();
    let weak = ui.visuals().weak_text_color();
    let font = egui::FontId::proportional(10.0);

    let model = chart.histogram();
    for bar in model.bar_rects() {
        let bar_rect = egui::Rect::from_min_max(
            to_pos(rect.min, [bar.x0, bar.top]),
            to_pos(rect.min, [bar.x1, bar.bottom]),
        );
        painter.rect_filled(bar_rect.shrink2(egui::vec2(0.5, 0.0)), 0.0, theme.bar_fill());
    }

    if let Some((lo, hi)) = chart.brush().selection() {
        let sel = egui::Rect::from_min_max(to_pos(rect.min, [lo, 0.0]), to_pos(rect.min, [hi, h as f64]));
        painter.rect_filled(sel, 0.0, theme.brush_fill());
        painter.rect_stroke(sel, 0.0, egui::Stroke::new(1.0, text_color), egui::StrokeKind::Inside);
    }

    // Distance axis.
    painter.line_segment([rect.left_bottom(), rect.right_bottom()], egui::Stroke::new(1.0, weak));
    let domain = model.domain();
    let scale = model.x_scale();
    for value in histogram::distance_ticks(domain.lower, domain.upper) {
        let x = rect.left() + scale.apply(value) as f32;
        painter.line_segment(
            [egui::pos2(x, rect.bottom()), egui::pos2(x, rect.bottom() + 5.0)],
            egui::Stroke::new(1.0, weak),
        );
        painter.text(
            egui::pos2(x, rect.bottom() + 6.0),
            egui::Align2::CENTER_TOP,
            histogram::format_tick_value(value),
            font.clone(),
            text_color,
        );
    }

    // Count axis: the tallest bar sets the top.
    let max = model.max_count();
    if max > 0 {
        painter.text(
            rect.left_top() + egui::vec2(2.0, 0.0),
            egui::Align2::LEFT_TOP,
            format!("{max} shots"),
            font.clone(),
            weak,
        );
    }
    painter.text(
        rect.right_bottom() + egui::vec2(0.0, 6.0),
        egui::Align2::RIGHT_TOP,
        "ft",
        font,
        weak,
    );
}

fn show_status_line(ui: &mut egui::Ui, chart: &mut ChartState, panel: &ChartPanelState, theme: Theme) {
    let mut events = Vec::new();

    ui.horizontal(|ui| {
        ui.label(format!(
            "{} of {} shots",
            chart.visible_subset().len(),
            chart.records().len()
        ));
        let unplotted = chart.visible_subset().len().saturating_sub(chart.points().len());
        if unplotted > 0 {
            ui.label(egui::RichText::new(format!("({unplotted} without position)")).weak());
        }

        if let Some(range) = chart.filters().distance_range() {
            ui.label(
                egui::RichText::new(format!("{:.1} to {:.1} ft", range.low, range.high)).weak(),
            );
        }

        ui.separator();

        let zoomed = chart.pipeline().zoom() != ZoomTransform::IDENTITY;
        if ui.add_enabled(zoomed, egui::Button::new("Reset zoom")).clicked() {
            events.push(ChartEvent::Zoom(ZoomGesture::Reset));
        }
        let brushed = chart.brush().selection().is_some();
        if ui.add_enabled(brushed, egui::Button::new("Clear brush")).clicked() {
            events.push(ChartEvent::Brush(BrushEvent::Clear));
        }

        if let Some(pos) = panel.last_hover {
            let court = chart.pipeline().to_data(pos);
            ui.label(egui::RichText::new(format!("({:.1}, {:.1})", court.x, court.y)).weak());
        }

        ui.separator();

        for (made, label) in [(true, "Made"), (false, "Missed")] {
            let (dot, _) = ui.allocate_exact_size(egui::vec2(10.0, 10.0), egui::Sense::hover());
            ui.painter().circle_filled(dot.center(), 4.0, color(theme.shot_color(made)));
            ui.label(label);
        }
    });

    for event in events {
        chart.dispatch(event);
    }
}
