//! Country-level aggregation and percentage allocation.

use crate::domain::holdings::CleanHolding;
use std::collections::BTreeMap;

/// One country's share of the fund.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryAllocation {
    pub country: String,
    pub total_weight: f64,
    pub percentage: f64,
}

/// All countries, sorted descending by total weight (ties by name).
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub entries: Vec<CountryAllocation>,
    pub total_weight: f64,
}

impl Allocation {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn country_count(&self) -> usize {
        self.entries.len()
    }

    /// Cumulative percentage of the top `k` countries.
    pub fn concentration(&self, k: usize) -> f64 {
        self.entries
            .iter()
            .take(k)
            .map(|e| e.percentage)
            .sum()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Group holdings by country, sum weights, compute rounded percentages.
///
/// A zero (or negative) total weight yields an empty allocation rather than
/// dividing by zero.
pub fn aggregate(holdings: &[CleanHolding]) -> Allocation {
    let mut by_country: BTreeMap<&str, f64> = BTreeMap::new();
    for holding in holdings {
        *by_country.entry(holding.country.as_str()).or_insert(0.0) += holding.weight;
    }

    let total_weight: f64 = by_country.values().sum();
    if total_weight <= 0.0 {
        return Allocation {
            entries: Vec::new(),
            total_weight: 0.0,
        };
    }

    let mut entries: Vec<CountryAllocation> = by_country
        .into_iter()
        .map(|(country, weight)| CountryAllocation {
            country: country.to_string(),
            total_weight: weight,
            percentage: round2(weight / total_weight * 100.0),
        })
        .collect();

    // BTreeMap iteration gives the name order used for tie-breaking.
    entries.sort_by(|a, b| {
        b.total_weight
            .partial_cmp(&a.total_weight)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.country.cmp(&b.country))
    });

    Allocation {
        entries,
        total_weight,
    }
}
