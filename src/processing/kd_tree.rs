use std::collections::HashSet;
use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;
use crate::state::record::RecordId;

/// Built once per redraw. Straight-on shots share one x coordinate, which
/// the immutable tree tolerates at any count.
type MarkerTree = ImmutableKdTree<f64, u64, 2, 32>;

/// 2D KD-tree over rendered shot markers (surface pixels) for hover lookup.
/// Tree items index into `ids`.
pub struct HoverTree {
    tree: Option<MarkerTree>,
    ids: Vec<RecordId>,
}

impl std::fmt::Debug for HoverTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HoverTree").field("len", &self.ids.len()).finish()
    }
}

impl Default for HoverTree {
    fn default() -> Self {
        Self::build(std::iter::empty())
    }
}

impl HoverTree {
    /// Build from `(id, [px, py])` pairs in paint order. Non-finite positions
    /// are skipped; of several markers at the same pixel only the last one
    /// painted (the one on top) is kept.
    pub fn build(points: impl Iterator<Item = (RecordId, [f64; 2])>) -> Self {
        let points: Vec<(RecordId, [f64; 2])> = points
            .filter(|(_, p)| p[0].is_finite() && p[1].is_finite())
            .collect();
        let mut seen = HashSet::new();
        let mut ids = Vec::new();
        let mut coords = Vec::new();
        for (id, p) in points.iter().rev() {
            if seen.insert((p[0].to_bits(), p[1].to_bits())) {
                ids.push(*id);
                coords.push(*p);
            }
        }
        let tree = (!coords.is_empty()).then(|| MarkerTree::new_from_slice(&coords));
        Self { tree, ids }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Nearest marker within `max_distance` pixels of `(qx, qy)`.
    pub fn nearest_within(&self, qx: f64, qy: f64, max_distance: f64) -> Option<RecordId> {
        let tree = self.tree.as_ref()?;
        let result = tree.nearest_one::<SquaredEuclidean>(&[qx, qy]);
        if result.distance.sqrt() <= max_distance {
            self.ids.get(result.item as usize).copied()
        } else {
            None
        }
    }
}
