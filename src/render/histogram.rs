use crate::processing::binning::{self, Bin, HistogramDomain};
use crate::render::transform::LinearScale;
use crate::state::record::ShotRecord;

/// Bar geometry in histogram-local pixels (y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarRect {
    pub x0: f64,
    pub x1: f64,
    pub top: f64,
    pub bottom: f64,
    pub count: u32,
}

/// Context histogram of shot distance: bars always come from the full
/// record set, whatever the scatter filters are.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramModel {
    domain: HistogramDomain,
    bin_count: usize,
    bins: Vec<Bin>,
    x_scale: LinearScale,
    height: f64,
}

impl HistogramModel {
    /// Fix the domain from `records` and bin them.
    pub fn new(records: &[ShotRecord], quantile: f64, bin_count: usize, size: [f64; 2]) -> Self {
        let domain = HistogramDomain::from_records(records, quantile);
        let mut model = Self {
            domain,
            bin_count,
            bins: Vec::new(),
            x_scale: LinearScale::new((domain.lower, domain.upper), (0.0, size[0])),
            height: size[1],
        };
        model.rebin(records);
        model
    }

    /// Recount bars over the fixed domain.
    pub fn rebin(&mut self, records: &[ShotRecord]) {
        self.bins = binning::compute_bins(records, self.domain, self.bin_count);
    }

    pub fn domain(&self) -> HistogramDomain {
        self.domain
    }

    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    /// Non-zoomable distance-to-pixel scale shared with the brush.
    pub fn x_scale(&self) -> LinearScale {
        self.x_scale
    }

    pub fn max_count(&self) -> u32 {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }

    pub fn bar_rects(&self) -> Vec<BarRect> {
        let max = self.max_count();
        if max == 0 {
            return Vec::new();
        }
        let y_scale = LinearScale::new((0.0, max as f64), (self.height, 0.0));
        self.bins
            .iter()
            .filter(|b| b.count > 0)
            .map(|b| BarRect {
                x0: self.x_scale.apply(b.lower_bound),
                x1: self.x_scale.apply(b.upper_bound),
                top: y_scale.apply(b.count as f64),
                bottom: self.height,
                count: b.count,
            })
            .collect()
    }
}

/// Candidate spacings between distance ticks, in feet.
const TICK_STEPS: [f64; 7] = [1.0, 2.0, 5.0, 10.0, 20.0, 25.0, 50.0];
/// Most ticks drawn across the axis.
const MAX_TICKS: f64 = 8.0;

/// Tick positions on the distance axis: multiples of the smallest step
/// that keeps at most `MAX_TICKS` intervals over `[lower, upper]`.
pub fn distance_ticks(lower: f64, upper: f64) -> Vec<f64> {
    let span = upper - lower;
    if span <= 0.0 || !span.is_finite() {
        return Vec::new();
    }
    let step = TICK_STEPS
        .into_iter()
        .find(|step| span / step <= MAX_TICKS)
        .unwrap_or_else(|| (span / MAX_TICKS).ceil());
    let first = (lower / step).ceil() as i64;
    let last = (upper / step).floor() as i64;
    (first..=last).map(|i| i as f64 * step).collect()
}

/// Format a numeric value for axis tick labels.
pub fn format_tick_value(val: f64) -> String {
    if val == 0.0 {
        "0".to_string()
    } else {
        let s = format!("{val:.2}");
        let s = s.trim_end_matches('0');
        let s = s.trim_end_matches('.');
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::record::fixtures::shot;

    fn records() -> Vec<ShotRecord> {
        let mut out = Vec::new();
        for i in 0..60 {
            let actor = if i % 3 == 0 { "A" } else { "B" };
            out.push(shot(actor, "T", i % 2 == 0, (i % 30) as f64));
        }
        out
    }

    #[test]
    fn bar_geometry_spans_surface() {
        let records = records();
        let model = HistogramModel::new(&records, 1.0, 29, [290.0, 100.0]);
        let bars = model.bar_rects();
        assert_eq!(bars.first().unwrap().x0, 0.0);
        assert!((bars.last().unwrap().x1 - 290.0).abs() < 1e-9);
        let tallest = bars.iter().map(|b| b.top).fold(f64::INFINITY, f64::min);
        assert!(tallest.abs() < 1e-9);
        assert!(bars.iter().all(|b| b.bottom == 100.0));
    }

    #[test]
    fn empty_data_draws_no_bars() {
        let model = HistogramModel::new(&[], 0.99, 30, [500.0, 100.0]);
        assert!(model.bar_rects().is_empty());
        assert_eq!(model.bins().len(), 30);
    }

    #[test]
    fn ticks_use_a_round_step() {
        assert_eq!(distance_ticks(0.0, 35.0), vec![0.0, 5.0, 10.0, 15.0, 20.0, 25.0, 30.0, 35.0]);
        assert_eq!(distance_ticks(0.0, 17.3), vec![0.0, 5.0, 10.0, 15.0]);
        assert_eq!(distance_ticks(0.0, 6.0).len(), 7);
        assert!(distance_ticks(0.0, 0.0).is_empty());
        assert_eq!(format_tick_value(17.5), "17.5");
        assert_eq!(format_tick_value(20.0), "20");
    }
}
