use std::collections::{BTreeMap, BTreeSet};
use crate::render::transform::CoordinatePipeline;
use crate::state::record::{RecordId, ShotRecord};
use crate::state::theme::Theme;

/// Outcome of matching existing keys against the next key set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyDiff<K> {
    /// Keys in `next` with no existing element.
    pub enter: Vec<K>,
    /// Keys present in both.
    pub update: Vec<K>,
    /// Existing keys absent from `next`.
    pub exit: Vec<K>,
}

impl<K> KeyDiff<K> {
    pub fn is_noop(&self) -> bool {
        self.enter.is_empty() && self.exit.is_empty()
    }
}

/// Keyed diff independent of what the elements are. `enter` and `update`
/// follow the order of `next`; `exit` follows the order of `current`.
pub fn diff_keys<K: Ord + Copy>(current: impl IntoIterator<Item = K>, next: &[K]) -> KeyDiff<K> {
    let current: Vec<K> = current.into_iter().collect();
    let current_set: BTreeSet<K> = current.iter().copied().collect();
    let next_set: BTreeSet<K> = next.iter().copied().collect();

    let mut diff = KeyDiff { enter: Vec::new(), update: Vec::new(), exit: Vec::new() };
    for &k in next {
        if current_set.contains(&k) {
            diff.update.push(k);
        } else {
            diff.enter.push(k);
        }
    }
    diff.exit = current.into_iter().filter(|k| !next_set.contains(k)).collect();
    diff
}

/// One rendered shot marker.
#[derive(Debug, Clone, PartialEq)]
pub struct PointElement {
    pub id: RecordId,
    /// Surface-local pixel centre.
    pub center: [f64; 2],
    pub radius: f32,
    pub fill: [u8; 4],
    /// Redraw pass in which the element was created.
    pub created_pass: u64,
}

impl PointElement {
    pub fn color32(&self) -> egui::Color32 {
        let [r, g, b, a] = self.fill;
        egui::Color32::from_rgba_unmultiplied(r, g, b, a)
    }
}

/// Counts from one reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileStats {
    pub entered: usize,
    pub updated: usize,
    pub exited: usize,
}

/// The live set of shot markers keyed by record id.
#[derive(Debug, Clone, Default)]
pub struct PointLayer {
    elements: BTreeMap<RecordId, PointElement>,
    pass: u64,
}

impl PointLayer {
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, id: RecordId) -> Option<&PointElement> {
        self.elements.get(&id)
    }

    /// Elements in paint order (record order).
    pub fn elements(&self) -> impl Iterator<Item = &PointElement> {
        self.elements.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.elements.keys().copied()
    }

    /// Bring the layer in line with `visible`: create markers for entering
    /// ids, move kept markers to their current position, drop exiting ones.
    /// Records without a finite position never get a marker.
    pub fn reconcile(
        &mut self,
        visible: &[RecordId],
        records: &[ShotRecord],
        pipeline: &CoordinatePipeline,
        theme: &Theme,
        radius: f32,
    ) -> ReconcileStats {
        self.pass += 1;
        let drawable: Vec<RecordId> = visible
            .iter()
            .copied()
            .filter(|id| {
                records
                    .get(id.index())
                    .is_some_and(|r| r.position.is_finite())
            })
            .collect();
        let diff = diff_keys(self.keys(), &drawable);
        if !diff.is_noop() {
            tracing::trace!(enter = diff.enter.len(), exit = diff.exit.len(), "marker set changed");
        }

        for id in &diff.exit {
            self.elements.remove(id);
        }
        for &id in &diff.update {
            let record = &records[id.index()];
            if let Some(el) = self.elements.get_mut(&id) {
                el.center = pipeline.to_screen(record.position);
                el.radius = radius;
                el.fill = theme.shot_color(record.made);
            }
        }
        for &id in &diff.enter {
            let record = &records[id.index()];
            self.elements.insert(
                id,
                PointElement {
                    id,
                    center: pipeline.to_screen(record.position),
                    radius,
                    fill: theme.shot_color(record.made),
                    created_pass: self.pass,
                },
            );
        }

        ReconcileStats {
            entered: diff.enter.len(),
            updated: diff.update.len(),
            exited: diff.exit.len(),
        }
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::transform::DomainScale;
    use crate::state::record::fixtures::shot;
    use crate::state::record::Position;

    fn setup() -> (Vec<ShotRecord>, CoordinatePipeline) {
        let mut records: Vec<ShotRecord> = (0..5).map(|i| shot("A", "T", i % 2 == 0, i as f64)).collect();
        records[4].position = Position::new(f64::NAN, 1.0);
        let positions: Vec<Position> = records.iter().map(|r| r.position).collect();
        let pipeline = CoordinatePipeline::new(DomainScale::fit(&positions, 200.0, 200.0), [0.8, 8.0]);
        (records, pipeline)
    }

    #[test]
    fn diff_splits_enter_update_exit() {
        let diff = diff_keys([1, 2, 3], &[3, 4, 1]);
        assert_eq!(diff.enter, vec![4]);
        assert_eq!(diff.update, vec![3, 1]);
        assert_eq!(diff.exit, vec![2]);
        assert!(diff_keys([1, 2], &[2, 1]).is_noop());
    }

    #[test]
    fn kept_markers_are_not_recreated() {
        let (records, pipeline) = setup();
        let theme = Theme::Dark;
        let mut layer = PointLayer::default();

        let stats = layer.reconcile(&[RecordId(0), RecordId(1)], &records, &pipeline, &theme, 3.0);
        assert_eq!(stats, ReconcileStats { entered: 2, updated: 0, exited: 0 });
        let first_pass = layer.get(RecordId(1)).unwrap().created_pass;

        let stats = layer.reconcile(&[RecordId(1), RecordId(2)], &records, &pipeline, &theme, 3.0);
        assert_eq!(stats, ReconcileStats { entered: 1, updated: 1, exited: 1 });
        assert_eq!(layer.get(RecordId(1)).unwrap().created_pass, first_pass);
        assert!(layer.get(RecordId(0)).is_none());
        assert_eq!(layer.get(RecordId(2)).unwrap().fill, theme.shot_color(true));
        assert_eq!(layer.get(RecordId(1)).unwrap().fill, theme.shot_color(false));
    }

    #[test]
    fn unpositioned_records_get_no_marker() {
        let (records, pipeline) = setup();
        let mut layer = PointLayer::default();
        layer.reconcile(&[RecordId(3), RecordId(4)], &records, &pipeline, &Theme::Dark, 3.0);
        assert_eq!(layer.keys().collect::<Vec<_>>(), vec![RecordId(3)]);
    }

    #[test]
    fn zoom_moves_kept_markers() {
        let (records, mut pipeline) = setup();
        let mut layer = PointLayer::default();
        let ids = [RecordId(0), RecordId(3)];
        layer.reconcile(&ids, &records, &pipeline, &Theme::Dark, 3.0);
        pipeline.zoom_about([100.0, 100.0], 2.0);
        let stats = layer.reconcile(&ids, &records, &pipeline, &Theme::Dark, 3.0);
        assert_eq!(stats.entered, 0);
        let el = layer.get(RecordId(3)).unwrap();
        assert_eq!(el.center, pipeline.to_screen(records[3].position));
    }
}
