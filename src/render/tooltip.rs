use crate::data::datetime;
use crate::state::record::{RecordId, ShotRecord};

/// Offset from the cursor to the tooltip's top-left corner, in points.
const CURSOR_OFFSET: [f64; 2] = [12.0, -8.0];

/// Text lines describing one shot, in display order.
pub fn tooltip_lines(record: &ShotRecord) -> Vec<String> {
    let mut lines = vec![
        record.actor.clone(),
        record.group.clone(),
        record.outcome_label().to_string(),
    ];
    if record.distance.is_finite() {
        lines.push(format!("Distance: {:.1} ft", record.distance));
    } else {
        lines.push("Distance: NA".to_string());
    }
    if let Some(date) = record.timestamp {
        lines.push(datetime::format_game_date(date));
    }
    if let Some(period) = record.period {
        lines.push(format!("Q{period} {}", record.clock_label()));
    }
    lines
}

#[derive(Debug, Clone, PartialEq)]
pub struct TooltipContent {
    pub record: RecordId,
    /// Surface-local position of the tooltip's top-left corner.
    pub anchor: [f64; 2],
    pub lines: Vec<String>,
}

/// Floating tooltip layer owned by one mounted chart. It exists from
/// `mount` to `destroy` and is shown or hidden in between.
#[derive(Debug)]
pub struct TooltipOverlay {
    id: egui::Id,
    mounted: bool,
    content: Option<TooltipContent>,
}

impl TooltipOverlay {
    pub fn mount(owner: &str) -> Self {
        let id = egui::Id::new(("shot_tooltip", owner));
        tracing::debug!(?id, "tooltip overlay created");
        Self { id, mounted: true, content: None }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn content(&self) -> Option<&TooltipContent> {
        self.content.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.content.is_some()
    }

    /// Show details of `record` next to `cursor`. Ignored after `destroy`.
    pub fn show(&mut self, id: RecordId, record: &ShotRecord, cursor: [f64; 2]) {
        if !self.mounted {
            return;
        }
        let anchor = [cursor[0] + CURSOR_OFFSET[0], cursor[1] + CURSOR_OFFSET[1]];
        match &mut self.content {
            Some(content) if content.record == id => content.anchor = anchor,
            _ => {
                self.content = Some(TooltipContent {
                    record: id,
                    anchor,
                    lines: tooltip_lines(record),
                })
            }
        }
    }

    pub fn hide(&mut self) {
        self.content = None;
    }

    pub fn destroy(&mut self) {
        if self.mounted {
            self.content = None;
            self.mounted = false;
            tracing::debug!(id = ?self.id, "tooltip overlay destroyed");
        }
    }

    /// Paint the tooltip in its own foreground area. `origin` is the
    /// screen position of the scatter surface's top-left corner.
    pub fn paint(&self, ctx: &egui::Context, origin: egui::Pos2, accent: egui::Color32) {
        let Some(content) = &self.content else {
            return;
        };
        let pos = origin + egui::vec2(content.anchor[0] as f32, content.anchor[1] as f32);
        egui::Area::new(self.id)
            .order(egui::Order::Tooltip)
            .fixed_pos(pos)
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style())
                    .stroke(egui::Stroke::new(0.5, accent))
                    .show(ui, |ui| {
                        let mut lines = content.lines.iter();
                        if let Some(first) = lines.next() {
                            ui.strong(first);
                        }
                        for line in lines {
                            ui.label(egui::RichText::new(line).size(11.0));
                        }
                    });
            });
    }
}

impl Drop for TooltipOverlay {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::record::fixtures::shot;
    use chrono::NaiveDate;

    #[test]
    fn full_record_lines() {
        let mut r = shot("Stephen Curry", "Golden State Warriors", true, 24.04);
        r.timestamp = NaiveDate::from_ymd_opt(2023, 11, 2);
        r.period = Some(4);
        r.minutes_remaining = Some(1);
        r.seconds_remaining = Some(7);
        assert_eq!(
            tooltip_lines(&r),
            vec![
                "Stephen Curry",
                "Golden State Warriors",
                "Made",
                "Distance: 24.0 ft",
                "Nov 2, 2023",
                "Q4 1:07",
            ]
        );
    }

    #[test]
    fn absent_parts_are_omitted_or_blank() {
        let mut r = shot("A", "T", false, f64::NAN);
        assert_eq!(tooltip_lines(&r), vec!["A", "T", "Missed", "Distance: NA"]);

        r.period = Some(2);
        assert_eq!(tooltip_lines(&r).last().unwrap(), "Q2 :");
    }

    #[test]
    fn hidden_then_destroyed() {
        let r = shot("A", "T", true, 3.0);
        let mut overlay = TooltipOverlay::mount("chart");
        overlay.show(RecordId(0), &r, [10.0, 20.0]);
        assert_eq!(overlay.content().unwrap().anchor, [22.0, 12.0]);
        overlay.hide();
        assert!(!overlay.is_visible());

        overlay.destroy();
        overlay.show(RecordId(0), &r, [10.0, 20.0]);
        assert!(!overlay.is_mounted());
        assert!(!overlay.is_visible());
    }
}
