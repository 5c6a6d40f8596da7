use crate::render::transform::LinearScale;
use crate::state::filter_state::DistanceRange;

/// Selections narrower than this (in points) count as a click, which clears.
pub const MIN_BRUSH_WIDTH: f64 = 1.0;

/// Brush input over the histogram, in surface-local pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BrushEvent {
    /// Current extent of an active drag, emitted on every pointer move.
    Drag { from: f64, to: f64 },
    Clear,
}

/// Turns histogram brush selections into the distance-range criterion.
/// The scale is the histogram's own and is never zoomed.
#[derive(Debug, Clone, PartialEq)]
pub struct BrushBridge {
    scale: LinearScale,
    /// Pixel extent currently drawn, already clamped and ordered.
    selection: Option<(f64, f64)>,
}

impl BrushBridge {
    pub fn new(scale: LinearScale) -> Self {
        Self { scale, selection: None }
    }

    pub fn scale(&self) -> &LinearScale {
        &self.scale
    }

    pub fn selection(&self) -> Option<(f64, f64)> {
        self.selection
    }

    fn clamp_px(&self, px: f64) -> f64 {
        let (r0, r1) = self.scale.range;
        px.clamp(r0.min(r1), r0.max(r1))
    }

    /// Clamp a pixel interval to the histogram and order it. `None` when the
    /// result is too narrow to be a selection.
    pub fn normalize_selection(&self, from: f64, to: f64) -> Option<(f64, f64)> {
        if !from.is_finite() || !to.is_finite() {
            return None;
        }
        let a = self.clamp_px(from);
        let b = self.clamp_px(to);
        let (lo, hi) = (a.min(b), a.max(b));
        if hi - lo < MIN_BRUSH_WIDTH {
            None
        } else {
            Some((lo, hi))
        }
    }

    /// Invert a pixel interval into data space.
    pub fn invert_selection(&self, lo: f64, hi: f64) -> DistanceRange {
        DistanceRange::new(self.scale.invert(lo), self.scale.invert(hi))
    }

    /// Apply a brush event and return the criterion value it implies.
    /// `None` means "no brush filter".
    pub fn apply(&mut self, event: BrushEvent) -> Option<DistanceRange> {
        self.selection = match event {
            BrushEvent::Drag { from, to } => self.normalize_selection(from, to),
            BrushEvent::Clear => None,
        };
        self.selection.map(|(lo, hi)| self.invert_selection(lo, hi))
    }
}

/// Decode one frame of pointer input over the histogram into a brush event.
/// `origin` holds the drag start between frames.
pub fn read_brush_gesture(
    response: &egui::Response,
    rect: egui::Rect,
    origin: &mut Option<f64>,
) -> Option<BrushEvent> {
    let local_x = |pos: egui::Pos2| (pos.x - rect.left()) as f64;

    if response.drag_started_by(egui::PointerButton::Primary) {
        *origin = response.interact_pointer_pos().map(local_x);
    }

    if response.dragged_by(egui::PointerButton::Primary) {
        if let (Some(from), Some(pos)) = (*origin, response.interact_pointer_pos()) {
            return Some(BrushEvent::Drag { from, to: local_x(pos) });
        }
    }

    if response.drag_stopped() {
        *origin = None;
        return None;
    }

    if response.clicked() {
        *origin = None;
        return Some(BrushEvent::Clear);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::state::filter_state::FilterState;
    use crate::state::record::fixtures::shot;
    use crate::state::record::RecordId;

    fn bridge() -> BrushBridge {
        BrushBridge::new(LinearScale::new((0.0, 35.0), (0.0, 1000.0)))
    }

    #[test]
    fn half_width_drag_inverts_to_half_domain() {
        let mut b = bridge();
        let range = b.apply(BrushEvent::Drag { from: 0.0, to: 500.0 }).unwrap();
        assert_relative_eq!(range.low, 0.0);
        assert_relative_eq!(range.high, 17.5);

        let records = vec![
            shot("A", "T", true, 0.0),
            shot("A", "T", true, 17.5),
            shot("A", "T", true, 17.6),
            shot("A", "T", true, f64::NAN),
            shot("A", "T", true, 9.0),
        ];
        let mut filters = FilterState::all_selected(&records);
        filters.set_distance_range(Some(range));
        assert_eq!(filters.visible_subset(&records), vec![RecordId(0), RecordId(1), RecordId(4)]);
    }

    #[test]
    fn reversed_drag_is_ordered() {
        let mut b = bridge();
        let range = b.apply(BrushEvent::Drag { from: 800.0, to: 200.0 }).unwrap();
        assert_relative_eq!(range.low, 7.0);
        assert_relative_eq!(range.high, 28.0);
        assert_eq!(b.selection(), Some((200.0, 800.0)));
    }

    #[test]
    fn zero_width_or_explicit_clear_removes_filter() {
        let mut b = bridge();
        assert!(b.apply(BrushEvent::Drag { from: 0.0, to: 300.0 }).is_some());
        assert_eq!(b.apply(BrushEvent::Drag { from: 300.0, to: 300.0 }), None);
        assert_eq!(b.selection(), None);

        assert!(b.apply(BrushEvent::Drag { from: 10.0, to: 300.0 }).is_some());
        assert_eq!(b.apply(BrushEvent::Clear), None);
        assert_eq!(b.selection(), None);
    }

    #[test]
    fn out_of_range_drag_is_clamped() {
        let mut b = bridge();
        let range = b.apply(BrushEvent::Drag { from: -200.0, to: 2000.0 }).unwrap();
        assert_relative_eq!(range.low, 0.0);
        assert_relative_eq!(range.high, 35.0);

        // Entirely outside the surface collapses to zero width.
        assert_eq!(b.apply(BrushEvent::Drag { from: 1200.0, to: 1500.0 }), None);
    }
}
