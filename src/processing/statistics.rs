/// Finite values of `values`, sorted ascending.
pub fn sorted_finite(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut vals: Vec<f64> = values.filter(|v| v.is_finite()).collect();
    vals.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    vals
}

/// Quantile `p` of an ascending slice, interpolating linearly between the
/// two nearest order statistics. `None` for an empty slice.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 || !p.is_finite() {
        return None;
    }
    let p = p.clamp(0.0, 1.0);
    if n == 1 || p == 0.0 {
        return Some(sorted[0]);
    }
    if p == 1.0 {
        return Some(sorted[n - 1]);
    }
    let pos = (n - 1) as f64 * p;
    let lo = pos.floor() as usize;
    let frac = pos - lo as f64;
    let a = sorted[lo];
    let b = sorted[(lo + 1).min(n - 1)];
    Some(a + (b - a) * frac)
}

/// Quantile of the finite entries of an unsorted sequence.
pub fn quantile(values: impl Iterator<Item = f64>, p: f64) -> Option<f64> {
    quantile_sorted(&sorted_finite(values), p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn interpolates_between_order_statistics() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(quantile_sorted(&v, 0.5).unwrap(), 2.5);
        assert_relative_eq!(quantile_sorted(&v, 0.0).unwrap(), 1.0);
        assert_relative_eq!(quantile_sorted(&v, 1.0).unwrap(), 4.0);
        assert_relative_eq!(quantile_sorted(&v, 0.99).unwrap(), 3.97);
    }

    #[test]
    fn skips_non_finite_values() {
        let q = quantile([f64::NAN, 10.0, f64::INFINITY, 0.0].into_iter(), 0.5).unwrap();
        assert_relative_eq!(q, 5.0);
        assert_eq!(quantile([f64::NAN].into_iter(), 0.5), None);
    }
}
