use crate::processing::statistics;
use crate::state::record::ShotRecord;

/// Histogram domain used when no shot has a finite distance.
pub const FALLBACK_DOMAIN: HistogramDomain = HistogramDomain { lower: 0.0, upper: 35.0 };

const MIN_DOMAIN_SPAN: f64 = 1.0;

/// One histogram bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub count: u32,
}

/// Closed distance interval the histogram covers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramDomain {
    pub lower: f64,
    pub upper: f64,
}

impl HistogramDomain {
    /// `[0, q]` where `q` is quantile `p` of the finite distances of every
    /// record passed in, not the maximum.
    pub fn from_records(records: &[ShotRecord], p: f64) -> Self {
        match statistics::quantile(records.iter().map(|r| r.distance), p) {
            Some(q) => Self {
                lower: 0.0,
                upper: q.max(MIN_DOMAIN_SPAN),
            },
            None => FALLBACK_DOMAIN,
        }
    }

    pub fn span(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Count finite distances into `bin_count` uniform bins over `domain`.
/// Values outside the domain are dropped; the last bin is closed on the
/// right.
pub fn compute_bins<'a>(
    records: impl IntoIterator<Item = &'a ShotRecord>,
    domain: HistogramDomain,
    bin_count: usize,
) -> Vec<Bin> {
    let bin_count = bin_count.max(1);
    let width = domain.span() / bin_count as f64;
    let mut bins: Vec<Bin> = (0..bin_count)
        .map(|i| Bin {
            lower_bound: domain.lower + width * i as f64,
            upper_bound: if i + 1 == bin_count {
                domain.upper
            } else {
                domain.lower + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    if width <= 0.0 || !width.is_finite() {
        return bins;
    }

    for record in records {
        let d = record.distance;
        if !d.is_finite() || !domain.contains(d) {
            continue;
        }
        let idx = (((d - domain.lower) / width).floor() as usize).min(bin_count - 1);
        bins[idx].count += 1;
    }
    bins
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::record::fixtures::shot;

    #[test]
    fn bins_are_uniform_and_closed_on_the_right() {
        let records: Vec<ShotRecord> = [0.0, 4.9, 5.0, 9.99, 10.0, 10.5, f64::NAN, -1.0]
            .iter()
            .map(|&d| shot("A", "T", true, d))
            .collect();
        let domain = HistogramDomain { lower: 0.0, upper: 10.0 };
        let bins = compute_bins(&records, domain, 2);

        assert_eq!(bins.len(), 2);
        assert_eq!((bins[0].lower_bound, bins[0].upper_bound), (0.0, 5.0));
        assert_eq!((bins[1].lower_bound, bins[1].upper_bound), (5.0, 10.0));
        assert_eq!(bins[0].count, 2);
        assert_eq!(bins[1].count, 3);
    }

    #[test]
    fn domain_uses_high_quantile_not_max() {
        let mut records: Vec<ShotRecord> = (0..100).map(|i| shot("A", "T", true, i as f64 * 0.3)).collect();
        records.push(shot("A", "T", false, 80.0));
        records.push(shot("A", "T", false, f64::NAN));

        let domain = HistogramDomain::from_records(&records, 0.99);
        assert_eq!(domain.lower, 0.0);
        assert!(domain.upper < 80.0);
        assert!(domain.upper > 29.0);
    }

    #[test]
    fn empty_or_degenerate_data_falls_back() {
        assert_eq!(HistogramDomain::from_records(&[], 0.99), FALLBACK_DOMAIN);
        let zeros = vec![shot("A", "T", true, 0.0); 3];
        assert_eq!(HistogramDomain::from_records(&zeros, 0.99).upper, MIN_DOMAIN_SPAN);

        let bins = compute_bins(&[], FALLBACK_DOMAIN, 5);
        assert_eq!(bins.len(), 5);
        assert!(bins.iter().all(|b| b.count == 0));
    }
}
