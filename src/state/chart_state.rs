use std::collections::BTreeSet;
use crate::config::AppConfig;
use crate::error::{ChartError, ChartResult};
use crate::processing::kd_tree::HoverTree;
use crate::render::brush::{BrushBridge, BrushEvent};
use crate::render::court;
use crate::render::histogram::HistogramModel;
use crate::render::reconcile::{PointLayer, ReconcileStats};
use crate::render::tooltip::TooltipOverlay;
use crate::render::transform::{CoordinatePipeline, DomainScale, ZoomGesture};
use crate::state::events::{
    ChartEvent, EventKind, EventOutcome, FilterChange, HoverEvent, ListenerId, Listeners,
};
use crate::state::filter_state::FilterState;
use crate::state::record::{Position, RecordId, ShotRecord};
use crate::state::theme::Theme;

/// Extra pixels around a marker that still count as hovering it.
const HOVER_SLACK: f64 = 2.0;

/// One mounted shot chart: the records it was built from, the filters over
/// them, and everything derived for drawing.
#[derive(Debug)]
pub struct ChartState {
    title: String,
    records: Vec<ShotRecord>,
    actors: Vec<String>,
    groups: Vec<String>,
    theme: Theme,
    point_radius: f32,
    scatter_size: [f32; 2],
    histogram_size: [f32; 2],

    filters: FilterState,
    visible: Vec<RecordId>,
    /// Filter generation `visible` was computed for.
    visible_generation: Option<u64>,

    histogram: HistogramModel,
    brush: BrushBridge,
    pipeline: CoordinatePipeline,
    court_outline: Vec<Vec<Position>>,
    court_px: Vec<Vec<[f64; 2]>>,
    points: PointLayer,
    hover_tree: HoverTree,
    hovered: Option<RecordId>,
    tooltip: TooltipOverlay,
    listeners: Listeners,
    mounted: bool,
}

fn valid_size(size: [f32; 2]) -> bool {
    size.iter().all(|v| v.is_finite() && *v > 0.0)
}

fn distinct(values: impl Iterator<Item = String>) -> Vec<String> {
    values.collect::<BTreeSet<_>>().into_iter().collect()
}

impl ChartState {
    /// Build a chart over `records` and draw it once. Domains (court
    /// extent, histogram distance range) are fixed here for the chart's
    /// lifetime.
    pub fn mount(title: impl Into<String>, records: Vec<ShotRecord>, config: &AppConfig) -> ChartResult<Self> {
        for size in [config.scatter_size, config.histogram_size] {
            if !valid_size(size) {
                return Err(ChartError::InvalidSurface { width: size[0], height: size[1] });
            }
        }
        let title = title.into();
        let scatter = [config.scatter_size[0] as f64, config.scatter_size[1] as f64];
        let hist = [config.histogram_size[0] as f64, config.histogram_size[1] as f64];

        let positions: Vec<Position> = records.iter().map(|r| r.position).collect();
        let domain = DomainScale::fit(&positions, scatter[0], scatter[1]);
        let pipeline = CoordinatePipeline::new(domain, config.zoom_extent);
        let histogram = HistogramModel::new(&records, config.histogram_quantile, config.bin_count.max(1), hist);
        let brush = BrushBridge::new(histogram.x_scale());

        let mut chart = Self {
            tooltip: TooltipOverlay::mount(&title),
            title,
            actors: distinct(records.iter().map(|r| r.actor.clone())),
            groups: distinct(records.iter().map(|r| r.group.clone())),
            filters: FilterState::all_selected(&records),
            records,
            theme: Theme::default(),
            point_radius: config.point_radius,
            scatter_size: config.scatter_size,
            histogram_size: config.histogram_size,
            visible: Vec::new(),
            visible_generation: None,
            histogram,
            brush,
            pipeline,
            court_outline: court::court_outline(),
            court_px: Vec::new(),
            points: PointLayer::default(),
            hover_tree: HoverTree::default(),
            hovered: None,
            listeners: Listeners::default(),
            mounted: true,
        };
        chart.redraw();
        tracing::info!(
            title = %chart.title,
            records = chart.records.len(),
            actors = chart.actors.len(),
            groups = chart.groups.len(),
            "chart mounted"
        );
        Ok(chart)
    }

    /// Tear down the drawn layers, the tooltip overlay and every listener.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.tooltip.destroy();
        self.listeners.clear();
        self.points.clear();
        self.hover_tree = HoverTree::default();
        self.hovered = None;
        self.mounted = false;
        tracing::info!(title = %self.title, "chart unmounted");
    }

    pub fn subscribe(
        &mut self,
        kind: EventKind,
        handler: impl FnMut(&ChartEvent, &EventOutcome) + 'static,
    ) -> ListenerId {
        self.listeners.subscribe(kind, handler)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Handle one interaction to completion, then notify listeners.
    pub fn dispatch(&mut self, event: ChartEvent) -> EventOutcome {
        if !self.mounted {
            return EventOutcome { changed: false, visible_count: 0, hovered: None };
        }
        let changed = match &event {
            ChartEvent::Filter(change) => {
                let changed = self.apply_filter(change);
                if changed {
                    self.refresh();
                }
                changed
            }
            ChartEvent::Brush(brush) => self.apply_brush(*brush),
            ChartEvent::Zoom(gesture) => {
                let changed = match *gesture {
                    ZoomGesture::Pan { dx, dy } => self.pipeline.pan_by(dx, dy),
                    ZoomGesture::Wheel { focal, factor } => self.pipeline.zoom_about(focal, factor),
                    ZoomGesture::Reset => self.pipeline.reset_zoom(),
                };
                if changed {
                    let zoom = self.pipeline.zoom();
                    tracing::debug!(k = zoom.k, tx = zoom.tx, ty = zoom.ty, "zoom updated");
                    self.redraw();
                }
                changed
            }
            ChartEvent::Hover(hover) => self.apply_hover(*hover),
        };

        let outcome = EventOutcome {
            changed,
            visible_count: self.visible.len(),
            hovered: self.hovered,
        };
        self.listeners.notify(&event, &outcome);
        outcome
    }

    fn apply_filter(&mut self, change: &FilterChange) -> bool {
        match change {
            FilterChange::Actor { name, selected } => self.filters.set_actor_selected(name, *selected),
            FilterChange::AllActors(all) => {
                let next = if *all { self.actors.clone() } else { Vec::new() };
                self.filters.set_actors(next)
            }
            FilterChange::Group { name, selected } => self.filters.set_group_selected(name, *selected),
            FilterChange::AllGroups(all) => {
                let next = if *all { self.groups.clone() } else { Vec::new() };
                self.filters.set_groups(next)
            }
            FilterChange::Outcome(outcome) => self.filters.set_outcome(*outcome),
            FilterChange::Band(band) => self.filters.set_band(*band),
        }
    }

    /// Every brush position filters the scatter; the histogram is left alone.
    fn apply_brush(&mut self, event: BrushEvent) -> bool {
        let before = self.brush.selection();
        let range = self.brush.apply(event);
        let filter_changed = self.filters.set_distance_range(range);
        if filter_changed {
            tracing::debug!(?range, "brush range updated");
            self.redraw();
        }
        filter_changed || before != self.brush.selection()
    }

    fn apply_hover(&mut self, hover: HoverEvent) -> bool {
        let before = self.hovered;
        match hover {
            HoverEvent::Move { pos } => {
                let max = self.point_radius as f64 + HOVER_SLACK;
                self.hovered = self.hover_tree.nearest_within(pos[0], pos[1], max);
                match self.hovered {
                    Some(id) => self.tooltip.show(id, &self.records[id.index()], pos),
                    None => self.tooltip.hide(),
                }
            }
            HoverEvent::Leave => {
                self.hovered = None;
                self.tooltip.hide();
            }
        }
        before != self.hovered
    }

    /// Full downstream refresh after a non-brush filter change: re-bin the
    /// histogram over every record, then redraw the scatter.
    pub fn refresh(&mut self) {
        self.histogram.rebin(&self.records);
        self.redraw();
    }

    fn ensure_visible(&mut self) {
        let generation = self.filters.generation();
        if self.visible_generation != Some(generation) {
            self.visible = self.filters.visible_subset(&self.records);
            self.visible_generation = Some(generation);
        }
    }

    /// Reconcile the drawn layers with the current filters and transform.
    /// Calling it twice without a state change leaves everything as is.
    pub fn redraw(&mut self) -> ReconcileStats {
        if !self.mounted {
            return ReconcileStats::default();
        }
        self.ensure_visible();
        let stats = self.points.reconcile(
            &self.visible,
            &self.records,
            &self.pipeline,
            &self.theme,
            self.point_radius,
        );
        self.court_px = court::project_court(&self.court_outline, &self.pipeline);
        self.hover_tree = HoverTree::build(self.points.elements().map(|el| (el.id, el.center)));

        if let Some(id) = self.hovered {
            if self.points.get(id).is_none() {
                self.hovered = None;
                self.tooltip.hide();
            }
        }
        tracing::debug!(
            visible = self.visible.len(),
            entered = stats.entered,
            updated = stats.updated,
            exited = stats.exited,
            hover_targets = self.hover_tree.len(),
            "redraw"
        );
        stats
    }

    pub fn set_theme(&mut self, theme: Theme) {
        if self.theme != theme {
            self.theme = theme;
            self.redraw();
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn records(&self) -> &[ShotRecord] {
        &self.records
    }

    pub fn actors(&self) -> &[String] {
        &self.actors
    }

    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Ids of the records passing every filter, as of the last redraw.
    pub fn visible_subset(&self) -> &[RecordId] {
        &self.visible
    }

    pub fn histogram(&self) -> &HistogramModel {
        &self.histogram
    }

    pub fn brush(&self) -> &BrushBridge {
        &self.brush
    }

    pub fn pipeline(&self) -> &CoordinatePipeline {
        &self.pipeline
    }

    pub fn court_px(&self) -> &[Vec<[f64; 2]>] {
        &self.court_px
    }

    pub fn points(&self) -> &PointLayer {
        &self.points
    }

    pub fn hovered(&self) -> Option<RecordId> {
        self.hovered
    }

    pub fn tooltip(&self) -> &TooltipOverlay {
        &self.tooltip
    }

    pub fn scatter_size(&self) -> [f32; 2] {
        self.scatter_size
    }

    pub fn histogram_size(&self) -> [f32; 2] {
        self.histogram_size
    }
}

impl Drop for ChartState {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::filter_state::{DistanceBand, Outcome};
    use crate::state::record::fixtures::shot;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn records() -> Vec<ShotRecord> {
        let mut out = Vec::new();
        for i in 0..40 {
            let actor = ["Curry", "Thompson", "Green"][i % 3];
            let group = if i % 4 == 0 { "Lakers" } else { "Warriors" };
            let mut r = shot(actor, group, i % 2 == 0, i as f64);
            r.position = Position::new((i as f64) - 20.0, i as f64);
            out.push(r);
        }
        out
    }

    fn chart() -> ChartState {
        ChartState::mount("Test", records(), &AppConfig::default()).unwrap()
    }

    #[test]
    fn mount_shows_everything() {
        let c = chart();
        assert_eq!(c.visible_subset().len(), 40);
        assert_eq!(c.points().len(), 40);
        assert_eq!(c.actors(), ["Curry", "Green", "Thompson"]);
        assert!(c.tooltip().is_mounted());
        assert!(!c.court_px().is_empty());
    }

    #[test]
    fn zero_sized_surface_is_rejected() {
        let config = AppConfig { scatter_size: [0.0, 470.0], ..AppConfig::default() };
        let err = ChartState::mount("Bad", records(), &config).unwrap_err();
        assert!(matches!(err, ChartError::InvalidSurface { .. }));
    }

    #[test]
    fn redraw_is_idempotent() {
        let mut c = chart();
        c.dispatch(ChartEvent::Filter(FilterChange::Outcome(Outcome::Made)));
        let before: Vec<_> = c.points().elements().cloned().collect();
        let stats = c.redraw();
        assert_eq!(stats.entered, 0);
        assert_eq!(stats.exited, 0);
        let after: Vec<_> = c.points().elements().cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn histogram_stable_under_non_distance_filters() {
        let mut c = chart();
        let bins = c.histogram().bins().to_vec();
        let domain = c.histogram().domain();
        c.dispatch(ChartEvent::Filter(FilterChange::AllActors(false)));
        c.dispatch(ChartEvent::Filter(FilterChange::Actor { name: "Curry".into(), selected: true }));
        c.dispatch(ChartEvent::Filter(FilterChange::Group { name: "Lakers".into(), selected: false }));
        c.dispatch(ChartEvent::Filter(FilterChange::Outcome(Outcome::Missed)));
        c.dispatch(ChartEvent::Filter(FilterChange::Band(DistanceBand::Mid)));
        assert_eq!(c.histogram().bins(), bins.as_slice());
        assert_eq!(c.histogram().domain(), domain);
        assert!(c.visible_subset().iter().all(|id| {
            let r = &c.records()[id.index()];
            r.actor == "Curry" && r.group == "Warriors" && !r.made && r.distance > 10.0 && r.distance <= 23.0
        }));
    }

    #[test]
    fn each_brush_position_filters_live() {
        let mut c = chart();
        let width = c.histogram().x_scale().range.1;
        let bins = c.histogram().bins().to_vec();
        let domain = c.histogram().domain();
        let mut counts = Vec::new();
        for to in [width * 0.25, width * 0.5, width] {
            let out = c.dispatch(ChartEvent::Brush(BrushEvent::Drag { from: 0.0, to }));
            counts.push(out.visible_count);
            assert_eq!(c.histogram().bins(), bins.as_slice());
            assert_eq!(c.histogram().domain(), domain);
        }
        assert!(counts[0] < counts[1] && counts[1] < counts[2]);
        assert_eq!(c.points().len(), counts[2]);

        let out = c.dispatch(ChartEvent::Brush(BrushEvent::Clear));
        assert_eq!(out.visible_count, 40);
        assert!(c.filters().distance_range().is_none());
        assert_eq!(c.histogram().bins(), bins.as_slice());
        assert_eq!(c.histogram().domain(), domain);
    }

    #[test]
    fn straight_on_shots_share_one_column() {
        let records: Vec<ShotRecord> = (0..600)
            .map(|i| {
                let mut r = shot("Curry", "Warriors", i % 2 == 0, (i % 30) as f64);
                r.position = Position::new(0.0, i as f64 * 0.05);
                r
            })
            .collect();
        let mut c = ChartState::mount("Column", records, &AppConfig::default()).unwrap();
        assert_eq!(c.points().len(), 600);

        let target = c.points().get(RecordId(300)).unwrap().center;
        c.dispatch(ChartEvent::Hover(HoverEvent::Move { pos: target }));
        assert_eq!(c.hovered(), Some(RecordId(300)));
    }

    #[test]
    fn zoom_keeps_markers_and_moves_them() {
        let mut c = chart();
        let id = RecordId(5);
        let before = c.points().get(id).unwrap().clone();
        let out = c.dispatch(ChartEvent::Zoom(ZoomGesture::Wheel { focal: [250.0, 235.0], factor: 2.0 }));
        assert!(out.changed);
        let after = c.points().get(id).unwrap();
        assert_eq!(after.created_pass, before.created_pass);
        assert_eq!(after.center, c.pipeline().to_screen(c.records()[5].position));

        c.dispatch(ChartEvent::Zoom(ZoomGesture::Reset));
        assert_eq!(c.points().get(id).unwrap().center, before.center);
    }

    #[test]
    fn hover_shows_then_leave_hides() {
        let mut c = chart();
        let center = c.points().get(RecordId(7)).unwrap().center;
        let out = c.dispatch(ChartEvent::Hover(HoverEvent::Move { pos: center }));
        assert_eq!(out.hovered, Some(RecordId(7)));
        assert_eq!(c.tooltip().content().unwrap().lines[0], "Thompson");

        c.dispatch(ChartEvent::Hover(HoverEvent::Leave));
        assert!(!c.tooltip().is_visible());
        assert!(c.tooltip().is_mounted());
    }

    #[test]
    fn filtered_out_hover_target_hides_tooltip() {
        let mut c = chart();
        let center = c.points().get(RecordId(1)).unwrap().center;
        c.dispatch(ChartEvent::Hover(HoverEvent::Move { pos: center }));
        c.dispatch(ChartEvent::Filter(FilterChange::Outcome(Outcome::Made)));
        assert_eq!(c.hovered(), None);
        assert!(!c.tooltip().is_visible());
    }

    #[test]
    fn unmount_detaches_everything() {
        let mut c = chart();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        c.subscribe(EventKind::Filter, move |_, out| log.borrow_mut().push(out.visible_count));
        c.dispatch(ChartEvent::Filter(FilterChange::Outcome(Outcome::Made)));
        assert_eq!(*seen.borrow(), vec![20]);

        c.unmount();
        assert!(!c.tooltip().is_mounted());
        assert!(c.points().is_empty());
        let out = c.dispatch(ChartEvent::Filter(FilterChange::Outcome(Outcome::All)));
        assert!(!out.changed);
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn empty_dataset_draws_nothing() {
        let mut c = ChartState::mount("Empty", Vec::new(), &AppConfig::default()).unwrap();
        assert!(c.points().is_empty());
        assert!(c.histogram().bar_rects().is_empty());
        let out = c.dispatch(ChartEvent::Hover(HoverEvent::Move { pos: [10.0, 10.0] }));
        assert_eq!(out.hovered, None);
    }
}
