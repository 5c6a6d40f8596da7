use std::collections::BTreeSet;
use serde::{Deserialize, Serialize};
use crate::state::record::{RecordId, ShotRecord};

/// Upper bound (inclusive) of the `Near` band, in feet.
pub const NEAR_MAX: f64 = 10.0;
/// Upper bound (inclusive) of the `Mid` band, in feet.
pub const MID_MAX: f64 = 23.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    All,
    Made,
    Missed,
}

impl Outcome {
    pub const ALL: [Outcome; 3] = [Outcome::All, Outcome::Made, Outcome::Missed];

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::All => "All",
            Outcome::Made => "Made",
            Outcome::Missed => "Missed",
        }
    }

    pub fn matches(&self, made: bool) -> bool {
        match self {
            Outcome::All => true,
            Outcome::Made => made,
            Outcome::Missed => !made,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DistanceBand {
    #[default]
    All,
    Near,
    Mid,
    Far,
}

impl DistanceBand {
    pub const ALL: [DistanceBand; 4] = [
        DistanceBand::All,
        DistanceBand::Near,
        DistanceBand::Mid,
        DistanceBand::Far,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DistanceBand::All => "All distances",
            DistanceBand::Near => "0-10 ft",
            DistanceBand::Mid => "10-23 ft",
            DistanceBand::Far => "23+ ft",
        }
    }

    /// Band a distance falls in; `None` for non-finite distances.
    pub fn classify(distance: f64) -> Option<DistanceBand> {
        if !distance.is_finite() {
            None
        } else if distance <= NEAR_MAX {
            Some(DistanceBand::Near)
        } else if distance <= MID_MAX {
            Some(DistanceBand::Mid)
        } else {
            Some(DistanceBand::Far)
        }
    }

    pub fn matches(&self, distance: f64) -> bool {
        match self {
            DistanceBand::All => true,
            band => DistanceBand::classify(distance) == Some(*band),
        }
    }
}

/// Inclusive distance interval from the histogram brush.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceRange {
    pub low: f64,
    pub high: f64,
}

impl DistanceRange {
    /// Build a range from two bounds in either order.
    pub fn new(a: f64, b: f64) -> Self {
        Self { low: a.min(b), high: a.max(b) }
    }

    pub fn contains(&self, distance: f64) -> bool {
        distance.is_finite() && distance >= self.low && distance <= self.high
    }
}

/// Every filter criterion of one chart. The visible subset is the
/// conjunction of all of them; each mutation bumps `generation` when it
/// actually changes something.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterState {
    selected_actors: BTreeSet<String>,
    selected_groups: BTreeSet<String>,
    outcome: Outcome,
    band: DistanceBand,
    distance_range: Option<DistanceRange>,
    generation: u64,
}

impl FilterState {
    /// Initial state: every actor and group selected, nothing else filtered.
    pub fn all_selected(records: &[ShotRecord]) -> Self {
        Self {
            selected_actors: records.iter().map(|r| r.actor.clone()).collect(),
            selected_groups: records.iter().map(|r| r.group.clone()).collect(),
            ..Self::default()
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn selected_actors(&self) -> &BTreeSet<String> {
        &self.selected_actors
    }

    pub fn selected_groups(&self) -> &BTreeSet<String> {
        &self.selected_groups
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn band(&self) -> DistanceBand {
        self.band
    }

    pub fn distance_range(&self) -> Option<DistanceRange> {
        self.distance_range
    }

    fn touch(&mut self, changed: bool) -> bool {
        if changed {
            self.generation += 1;
        }
        changed
    }

    pub fn set_actor_selected(&mut self, actor: &str, selected: bool) -> bool {
        let changed = if selected {
            self.selected_actors.insert(actor.to_string())
        } else {
            self.selected_actors.remove(actor)
        };
        self.touch(changed)
    }

    pub fn set_actors<I: IntoIterator<Item = String>>(&mut self, actors: I) -> bool {
        let next: BTreeSet<String> = actors.into_iter().collect();
        let changed = next != self.selected_actors;
        self.selected_actors = next;
        self.touch(changed)
    }

    pub fn set_group_selected(&mut self, group: &str, selected: bool) -> bool {
        let changed = if selected {
            self.selected_groups.insert(group.to_string())
        } else {
            self.selected_groups.remove(group)
        };
        self.touch(changed)
    }

    pub fn set_groups<I: IntoIterator<Item = String>>(&mut self, groups: I) -> bool {
        let next: BTreeSet<String> = groups.into_iter().collect();
        let changed = next != self.selected_groups;
        self.selected_groups = next;
        self.touch(changed)
    }

    pub fn set_outcome(&mut self, outcome: Outcome) -> bool {
        let changed = self.outcome != outcome;
        self.outcome = outcome;
        self.touch(changed)
    }

    pub fn set_band(&mut self, band: DistanceBand) -> bool {
        let changed = self.band != band;
        self.band = band;
        self.touch(changed)
    }

    /// `None` removes the brush criterion entirely.
    pub fn set_distance_range(&mut self, range: Option<DistanceRange>) -> bool {
        let changed = self.distance_range != range;
        self.distance_range = range;
        self.touch(changed)
    }

    /// Whether a record passes every active criterion.
    pub fn matches(&self, record: &ShotRecord) -> bool {
        self.selected_actors.contains(&record.actor)
            && self.selected_groups.contains(&record.group)
            && self.outcome.matches(record.made)
            && self.band.matches(record.distance)
            && self
                .distance_range
                .map_or(true, |range| range.contains(record.distance))
    }

    /// Ids of the records passing every criterion, in record order.
    pub fn visible_subset(&self, records: &[ShotRecord]) -> Vec<RecordId> {
        records
            .iter()
            .enumerate()
            .filter(|(_, r)| self.matches(r))
            .map(|(i, _)| RecordId(i))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::record::fixtures::shot;
    use proptest::prelude::*;

    fn five_shots() -> Vec<ShotRecord> {
        vec![
            shot("A", "Hawks", true, 4.0),
            shot("A", "Hawks", false, 6.0),
            shot("A", "Hawks", true, 18.0),
            shot("B", "Hawks", true, 2.0),
            shot("C", "Bulls", true, 26.0),
        ]
    }

    #[test]
    fn band_thresholds_are_inclusive_on_the_upper_edge() {
        assert_eq!(DistanceBand::classify(10.0), Some(DistanceBand::Near));
        assert_eq!(DistanceBand::classify(10.0001), Some(DistanceBand::Mid));
        assert_eq!(DistanceBand::classify(23.0), Some(DistanceBand::Mid));
        assert_eq!(DistanceBand::classify(23.0001), Some(DistanceBand::Far));
        assert_eq!(DistanceBand::classify(f64::NAN), None);
        assert!(DistanceBand::All.matches(f64::NAN));
        assert!(!DistanceBand::Near.matches(f64::NAN));
    }

    #[test]
    fn combined_criteria_pick_the_single_match() {
        let records = five_shots();
        let mut f = FilterState::all_selected(&records);
        f.set_actors(["A".to_string()]);
        f.set_outcome(Outcome::Made);
        f.set_band(DistanceBand::Near);
        assert_eq!(f.visible_subset(&records), vec![RecordId(0)]);
    }

    #[test]
    fn empty_selection_hides_everything() {
        let records = five_shots();
        let mut f = FilterState::all_selected(&records);
        assert_eq!(f.visible_subset(&records).len(), 5);
        f.set_groups(Vec::new());
        assert!(f.visible_subset(&records).is_empty());

        let mut f = FilterState::all_selected(&records);
        f.set_actors(Vec::new());
        assert!(f.visible_subset(&records).is_empty());
    }

    #[test]
    fn band_and_brush_both_apply() {
        let records = five_shots();
        let mut f = FilterState::all_selected(&records);
        f.set_band(DistanceBand::Near);
        f.set_distance_range(Some(DistanceRange::new(5.0, 30.0)));
        assert_eq!(f.visible_subset(&records), vec![RecordId(1)]);
    }

    #[test]
    fn brush_range_is_inclusive_and_skips_nan() {
        let mut records = five_shots();
        records.push(shot("A", "Hawks", true, f64::NAN));
        let mut f = FilterState::all_selected(&records);
        f.set_distance_range(Some(DistanceRange::new(18.0, 2.0)));
        assert_eq!(
            f.visible_subset(&records),
            vec![RecordId(0), RecordId(1), RecordId(2), RecordId(3)]
        );
        f.set_distance_range(None);
        assert_eq!(f.visible_subset(&records).len(), 6);
    }

    #[test]
    fn generation_moves_only_on_real_changes() {
        let records = five_shots();
        let mut f = FilterState::all_selected(&records);
        let g0 = f.generation();
        assert!(!f.set_outcome(Outcome::All));
        assert!(!f.set_actor_selected("A", true));
        assert_eq!(f.generation(), g0);
        assert!(f.set_actor_selected("A", false));
        assert!(f.set_distance_range(Some(DistanceRange::new(0.0, 1.0))));
        assert_eq!(f.generation(), g0 + 2);
    }

    fn arb_record() -> impl Strategy<Value = ShotRecord> {
        (
            prop::sample::select(vec!["A", "B", "C"]),
            prop::sample::select(vec!["Hawks", "Bulls"]),
            any::<bool>(),
            prop_oneof![9 => 0.0f64..40.0, 1 => Just(f64::NAN)],
        )
            .prop_map(|(a, g, made, d)| shot(a, g, made, d))
    }

    proptest! {
        #[test]
        fn visible_subset_is_intersection_of_each_criterion(
            records in prop::collection::vec(arb_record(), 0..40),
            actors in prop::sample::subsequence(vec!["A", "B", "C"], 0..=3),
            groups in prop::sample::subsequence(vec!["Hawks", "Bulls"], 0..=2),
            outcome in prop::sample::select(Outcome::ALL.to_vec()),
            band in prop::sample::select(DistanceBand::ALL.to_vec()),
            range in prop::option::of((0.0f64..40.0, 0.0f64..40.0)),
        ) {
            let range = range.map(|(a, b)| DistanceRange::new(a, b));
            let mut combined = FilterState::all_selected(&records);
            combined.set_actors(actors.iter().map(|s| s.to_string()));
            combined.set_groups(groups.iter().map(|s| s.to_string()));
            combined.set_outcome(outcome);
            combined.set_band(band);
            combined.set_distance_range(range);

            let base = FilterState::all_selected(&records);
            let mut only_actors = base.clone();
            only_actors.set_actors(actors.iter().map(|s| s.to_string()));
            let mut only_groups = base.clone();
            only_groups.set_groups(groups.iter().map(|s| s.to_string()));
            let mut only_outcome = base.clone();
            only_outcome.set_outcome(outcome);
            let mut only_band = base.clone();
            only_band.set_band(band);
            let mut only_range = base.clone();
            only_range.set_distance_range(range);

            let singles = [only_actors, only_groups, only_outcome, only_band, only_range];
            let expected: Vec<RecordId> = (0..records.len())
                .map(RecordId)
                .filter(|id| singles.iter().all(|f| f.visible_subset(&records).contains(id)))
                .collect();
            prop_assert_eq!(combined.visible_subset(&records), expected);
        }
    }
}
