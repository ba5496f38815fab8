//! Box statistics and box placement.

/// Whisker reach as a multiple of the interquartile range
pub const WHISKER_IQR: f64 = 1.5;

/// Summary statistics drawn as one box
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    /// Number of finite values summarized
    pub count: usize,
    /// First quartile
    pub q1: f64,
    /// Median
    pub median: f64,
    /// Third quartile
    pub q3: f64,
    /// Lowest datum within `q1 - 1.5 * IQR`
    pub whisker_low: f64,
    /// Highest datum within `q3 + 1.5 * IQR`
    pub whisker_high: f64,
    /// Data beyond the whiskers
    pub fliers: Vec<f64>,
}

/// Quantile of sorted data using linear interpolation between closest ranks
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    sorted[lower] + (sorted[upper] - sorted[lower]) * (position - lower as f64)
}

impl BoxStats {
    /// Summarize `values`, ignoring non-finite entries; `None` if none are finite
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(|a, b| a.total_cmp(b));

        let q1 = quantile(&sorted, 0.25);
        let median = quantile(&sorted, 0.5);
        let q3 = quantile(&sorted, 0.75);
        let reach = WHISKER_IQR * (q3 - q1);
        let (low_fence, high_fence) = (q1 - reach, q3 + reach);

        let (inside, fliers): (Vec<f64>, Vec<f64>) = sorted
            .iter()
            .copied()
            .partition(|v| *v >= low_fence && *v <= high_fence);
        let whisker_low = inside.first().copied().unwrap_or(q1);
        let whisker_high = inside.last().copied().unwrap_or(q3);

        Some(Self {
            count: sorted.len(),
            q1,
            median,
            q3,
            whisker_low,
            whisker_high,
            fliers,
        })
    }
}

/// Center and width of the box for `hue` within the slot of `sample`
///
/// Boxes of one sample share `group_width` around the integer position of
/// that sample, split evenly between `n_hues` sample types.
pub fn box_position(sample: usize, hue: usize, n_hues: usize, group_width: f64) -> (f64, f64) {
    let width = group_width / n_hues.max(1) as f64;
    let center = sample as f64 - group_width / 2.0 + width * (hue as f64 + 0.5);
    (center, width)
}

/// Y-axis range covering every finite value and the threshold, padded by 5%
pub fn value_range<I: IntoIterator<Item = f64>>(values: I, threshold: f64) -> (f64, f64) {
    let mut low = if threshold.is_finite() { threshold } else { 0.0 };
    let mut high = low;
    for value in values.into_iter().filter(|v| v.is_finite()) {
        low = low.min(value);
        high = high.max(value);
    }
    if high - low <= f64::EPSILON {
        return (low - 1.0, high + 1.0);
    }
    let pad = 0.05 * (high - low);
    (low - pad, high + pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quartiles_interpolate() {
        let stats = BoxStats::from_values(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(stats.count, 4);
        assert_eq!(stats.q1, 1.75);
        assert_eq!(stats.median, 2.5);
        assert_eq!(stats.q3, 3.25);
        assert_eq!(stats.whisker_low, 1.0);
        assert_eq!(stats.whisker_high, 4.0);
        assert!(stats.fliers.is_empty());
    }

    #[test]
    fn test_fliers_beyond_whiskers() {
        let stats =
            BoxStats::from_values(&[7.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 100.0]).unwrap();
        assert_eq!(stats.q1, 2.75);
        assert_eq!(stats.q3, 6.25);
        assert_eq!(stats.fliers, vec![100.0]);
        assert_eq!(stats.whisker_high, 7.0);
        assert_eq!(stats.whisker_low, 1.0);
    }

    #[test]
    fn test_non_finite_values_ignored() {
        let stats =
            BoxStats::from_values(&[f64::NAN, 2.0, f64::INFINITY, f64::NEG_INFINITY]).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.median, 2.0);
        assert_eq!(stats.q1, stats.q3);

        assert!(BoxStats::from_values(&[f64::NAN]).is_none());
        assert!(BoxStats::from_values(&[]).is_none());
    }

    #[test]
    fn test_box_position() {
        let (center, width) = box_position(0, 0, 1, 0.8);
        assert!((center - 0.0).abs() < 1e-12);
        assert!((width - 0.8).abs() < 1e-12);

        let (left, width) = box_position(2, 0, 2, 0.8);
        let (right, _) = box_position(2, 1, 2, 0.8);
        assert!((width - 0.4).abs() < 1e-12);
        assert!((left - 1.8).abs() < 1e-12);
        assert!((right - 2.2).abs() < 1e-12);
    }

    #[test]
    fn test_value_range_includes_threshold() {
        let (low, high) = value_range([1.0, 2.0, f64::NAN], 10.0);
        assert!(low < 1.0);
        assert!(high > 10.0);

        let (low, high) = value_range(Vec::new(), 3.0);
        assert_eq!((low, high), (2.0, 4.0));
    }
}
