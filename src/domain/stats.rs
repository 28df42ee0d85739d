//! Summary statistics over a computed allocation.

use crate::domain::allocation::Allocation;

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStats {
    pub holdings_count: usize,
    pub country_count: usize,
    pub top3_concentration: f64,
    pub top5_concentration: f64,
    pub top10_concentration: f64,
    pub mean_pct: f64,
    pub median_pct: f64,
    pub stddev_pct: f64,
    pub max_pct: f64,
    pub min_pct: f64,
}

impl SummaryStats {
    pub fn compute(allocation: &Allocation, holdings_count: usize) -> Self {
        let percentages: Vec<f64> = allocation.entries.iter().map(|e| e.percentage).collect();
        let n = percentages.len();

        let (mean, stddev) = mean_and_stddev(&percentages);
        let median = median(&percentages);

        // Entries are sorted descending, so max is first and min is last.
        let max_pct = percentages.first().copied().unwrap_or(0.0);
        let min_pct = percentages.last().copied().unwrap_or(0.0);

        SummaryStats {
            holdings_count,
            country_count: n,
            top3_concentration: allocation.concentration(3),
            top5_concentration: allocation.concentration(5),
            top10_concentration: allocation.concentration(10),
            mean_pct: mean,
            median_pct: median,
            stddev_pct: stddev,
            max_pct,
            min_pct,
        }
    }
}

fn mean_and_stddev(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

fn median(sorted_desc: &[f64]) -> f64 {
    let n = sorted_desc.len();
    if n == 0 {
        return 0.0;
    }
    if n % 2 == 1 {
        sorted_desc[n / 2]
    } else {
        (sorted_desc[n / 2 - 1] + sorted_desc[n / 2]) / 2.0
    }
}
