//! Ratios and distribution summaries over sampled values.
//!
//! Sample-based summaries treat every retained point alike. When several
//! series were sampled at different rates, use [`pooled_summary`], which
//! weights each point by the population records it stands for.

use serde::Serialize;

/// `part / whole` as a percentage; `0.0` when `whole` is not positive.
pub fn percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 { part / whole * 100.0 } else { 0.0 }
}

/// Arithmetic mean, `0.0` for an empty input.
pub fn mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistributionSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub p95: f64,
    pub p99: f64,
}

impl DistributionSummary {
    /// Summarise finite values; `None` when there are none.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let weighted: Vec<(f64, f64)> = values.iter().map(|&v| (v, 1.0)).collect();
        Self::from_weighted(weighted)
    }

    /// Summarise `(value, weight)` pairs. Non-finite values and
    /// non-positive weights are ignored.
    pub fn from_weighted(points: Vec<(f64, f64)>) -> Option<Self> {
        let mut points: Vec<(f64, f64)> = points
            .into_iter()
            .filter(|(v, w)| v.is_finite() && *w > 0.0 && w.is_finite())
            .collect();
        if points.is_empty() {
            return None;
        }
        points.sort_by(|a, b| a.0.total_cmp(&b.0));

        let total_weight: f64 = points.iter().map(|(_, w)| w).sum();
        let mean = points.iter().map(|(v, w)| v * w).sum::<f64>() / total_weight;
        let variance = points
            .iter()
            .map(|(v, w)| w * (v - mean).powi(2))
            .sum::<f64>()
            / total_weight;

        let ranks = rank_positions(&points, total_weight);
        Some(Self {
            count: points.len(),
            mean,
            median: quantile(&points, &ranks, 0.50),
            std_dev: variance.sqrt(),
            min: points[0].0,
            max: points[points.len() - 1].0,
            p95: quantile(&points, &ranks, 0.95),
            p99: quantile(&points, &ranks, 0.99),
        })
    }
}

/// Position of each sorted point on `[0, 1]`. With equal weights point `i`
/// of `n` sits at `i / (n - 1)`, matching linear interpolation between
/// closest ranks.
fn rank_positions(points: &[(f64, f64)], total_weight: f64) -> Vec<f64> {
    let first = points[0].1;
    let last = points[points.len() - 1].1;
    let span = total_weight - (first + last) / 2.0;

    let mut cumulative = 0.0;
    points
        .iter()
        .map(|(_, w)| {
            cumulative += w;
            if span > 0.0 {
                ((cumulative - w / 2.0 - first / 2.0) / span).clamp(0.0, 1.0)
            } else {
                0.0
            }
        })
        .collect()
}

fn quantile(points: &[(f64, f64)], ranks: &[f64], q: f64) -> f64 {
    let upper = ranks.partition_point(|&r| r < q);
    if upper == 0 {
        return points[0].0;
    }
    if upper == points.len() {
        return points[points.len() - 1].0;
    }
    let lower = upper - 1;
    let gap = ranks[upper] - ranks[lower];
    if gap <= 0.0 {
        return points[upper].0;
    }
    let frac = (q - ranks[lower]) / gap;
    points[lower].0 + (points[upper].0 - points[lower].0) * frac
}

/// Summary of several sampled series pooled into one distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PooledSummary {
    /// Weighted by each series' population-per-point ratio.
    pub summary: DistributionSummary,
    /// Points actually retained across the pooled series.
    pub sampled_points: usize,
    /// Records the pooled series held before sampling.
    pub estimated_population: u64,
}

/// Pool `(values, total_count)` groups, weighting each retained value by
/// `total_count / values.len()` so heavily sampled series do not dominate.
pub fn pooled_summary<'a, I>(groups: I) -> Option<PooledSummary>
where
    I: IntoIterator<Item = (&'a [f64], u64)>,
{
    let mut points = Vec::new();
    let mut population = 0u64;
    for (values, total_count) in groups {
        if values.is_empty() {
            continue;
        }
        let weight = total_count.max(values.len() as u64) as f64 / values.len() as f64;
        points.extend(values.iter().map(|&v| (v, weight)));
        population += total_count;
    }
    let sampled_points = points.len();

    DistributionSummary::from_weighted(points).map(|summary| PooledSummary {
        summary,
        sampled_points,
        estimated_population: population,
    })
}

/// Sorted `(value, cumulative fraction)` pairs, evenly thinned to at most
/// `max_points` entries.
pub fn empirical_cdf(values: &[f64], max_points: usize) -> Vec<(f64, f64)> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() || max_points == 0 {
        return Vec::new();
    }
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let point = |i: usize| (sorted[i], (i + 1) as f64 / n as f64);
    if n <= max_points {
        return (0..n).map(point).collect();
    }
    if max_points == 1 {
        return vec![point(0)];
    }
    (0..max_points)
        .map(|j| point(j * (n - 1) / (max_points - 1)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_percent_defaults_to_zero() {
        assert_eq!(percent(5.0, 0.0), 0.0);
        assert_eq!(percent(1.0, 4.0), 25.0);
        assert_eq!(mean(Vec::new()), 0.0);
        assert_eq!(mean([1.0, 2.0, 6.0]), 3.0);
    }

    #[test]
    fn test_summary_matches_linear_interpolation() {
        let values: Vec<f64> = (1..=10).map(f64::from).collect();
        let s = DistributionSummary::from_values(&values).unwrap();
        assert_eq!(s.count, 10);
        assert!(close(s.mean, 5.5));
        assert!(close(s.median, 5.5));
        assert!(close(s.p95, 9.55));
        assert!(close(s.p99, 9.91));
        assert!(close(s.std_dev, 8.25f64.sqrt()));
        assert_eq!((s.min, s.max), (1.0, 10.0));
    }

    #[test]
    fn test_summary_edge_cases() {
        assert!(DistributionSummary::from_values(&[]).is_none());
        assert!(DistributionSummary::from_values(&[f64::NAN]).is_none());

        let single = DistributionSummary::from_values(&[4.0]).unwrap();
        assert_eq!((single.median, single.p99, single.std_dev), (4.0, 4.0, 0.0));
    }

    #[test]
    fn test_pooled_weights_by_population() {
        let a = [1.0, 2.0];
        let b = [10.0];
        let pooled = pooled_summary([(&a[..], 2), (&b[..], 8)]).unwrap();

        assert_eq!(pooled.sampled_points, 3);
        assert_eq!(pooled.estimated_population, 10);
        // 1 + 2 + 8 * 10 over 10 records, not the naive (1 + 2 + 10) / 3.
        assert!(close(pooled.summary.mean, 8.3));
    }

    #[test]
    fn test_pooled_with_equal_rates_matches_plain_summary() {
        let a = [3.0, 1.0, 4.0];
        let b = [1.0, 5.0, 9.0];
        let pooled = pooled_summary([(&a[..], 30), (&b[..], 30)]).unwrap();
        let all: Vec<f64> = a.iter().chain(b.iter()).copied().collect();
        let plain = DistributionSummary::from_values(&all).unwrap();

        assert!(close(pooled.summary.mean, plain.mean));
        assert!(close(pooled.summary.median, plain.median));
        assert!(close(pooled.summary.p95, plain.p95));
    }

    #[test]
    fn test_empirical_cdf_thinning() {
        let values: Vec<f64> = (0..10).rev().map(f64::from).collect();
        let full = empirical_cdf(&values, 100);
        assert_eq!(full.len(), 10);
        assert_eq!(full[0], (0.0, 0.1));
        assert_eq!(full[9], (9.0, 1.0));

        let thin = empirical_cdf(&values, 4);
        assert_eq!(thin.iter().map(|p| p.0).collect::<Vec<_>>(), [0.0, 3.0, 6.0, 9.0]);
        assert!(empirical_cdf(&values, 0).is_empty());
    }
}
