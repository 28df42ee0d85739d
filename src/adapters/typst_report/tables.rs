//! Typst table markup for allocation reports.

use crate::domain::allocation::Allocation;
use crate::domain::stats::SummaryStats;

/// Full allocation table, one row per country plus a total row.
pub fn render_allocation_table(allocation: &Allocation) -> String {
    if allocation.is_empty() {
        return "_No allocation data._\n".to_string();
    }

    let mut output = String::new();
    output.push_str("#table(\n");
    output.push_str("  columns: (auto, 1fr, auto, auto),\n");
    output.push_str("  [*\\#*], [*Country*], [*Weight*], [*Percentage*],\n");

    for (i, entry) in allocation.entries.iter().enumerate() {
        output.push_str(&format!(
            "  [{}], [{}], [{:.4}], [{:.2}%],\n",
            i + 1,
            escape_typst(&entry.country),
            entry.total_weight,
            entry.percentage
        ));
    }

    let pct_sum: f64 = allocation.entries.iter().map(|e| e.percentage).sum();
    output.push_str(&format!(
        "  [], [*Total*], [*{:.4}*], [*{:.2}%*],\n",
        allocation.total_weight, pct_sum
    ));
    output.push_str(")\n");
    output
}

/// Summary statistics table.
pub fn render_summary_stats(stats: &SummaryStats) -> String {
    let mut output = String::new();
    output.push_str("#table(\n");
    output.push_str("  columns: (1fr, auto),\n");
    output.push_str("  [*Statistic*], [*Value*],\n");
    output.push_str(&format!("  [Holdings], [{}],\n", stats.holdings_count));
    output.push_str(&format!("  [Countries], [{}],\n", stats.country_count));
    output.push_str(&format!(
        "  [Top 3 concentration], [{:.2}%],\n",
        stats.top3_concentration
    ));
    output.push_str(&format!(
        "  [Top 5 concentration], [{:.2}%],\n",
        stats.top5_concentration
    ));
    output.push_str(&format!(
        "  [Top 10 concentration], [{:.2}%],\n",
        stats.top10_concentration
    ));
    output.push_str(&format!("  [Mean allocation], [{:.2}%],\n", stats.mean_pct));
    output.push_str(&format!(
        "  [Median allocation], [{:.2}%],\n",
        stats.median_pct
    ));
    output.push_str(&format!(
        "  [Std deviation], [{:.2}%],\n",
        stats.stddev_pct
    ));
    output.push_str(&format!("  [Largest], [{:.2}%],\n", stats.max_pct));
    output.push_str(&format!("  [Smallest], [{:.2}%],\n", stats.min_pct));
    output.push_str(")\n");
    output
}

/// Escape characters with markup meaning in Typst content blocks.
fn escape_typst(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '#' | '[' | ']' | '*' | '_' | '$' | '@' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::allocation::{aggregate, CountryAllocation};
    use crate::domain::holdings::CleanHolding;

    fn holding(country: &str, weight: f64) -> CleanHolding {
        CleanHolding {
            country: country.to_string(),
            weight,
        }
    }

    #[test]
    fn allocation_table_has_rows_and_total() {
        let allocation = aggregate(&[
            holding("United States", 70.0),
            holding("Japan", 30.0),
        ]);
        let table = render_allocation_table(&allocation);

        assert!(table.starts_with("#table(\n"));
        assert!(table.contains("[United States], [70.0000], [70.00%]"));
        assert!(table.contains("[Japan], [30.0000], [30.00%]"));
        assert!(table.contains("[*Total*], [*100.0000*], [*100.00%*]"));
    }

    #[test]
    fn allocation_table_empty_placeholder() {
        let allocation = Allocation {
            entries: Vec::new(),
            total_weight: 0.0,
        };
        assert_eq!(render_allocation_table(&allocation), "_No allocation data._\n");
    }

    #[test]
    fn allocation_table_escapes_markup() {
        let allocation = Allocation {
            entries: vec![CountryAllocation {
                country: "A[B]#C".to_string(),
                total_weight: 1.0,
                percentage: 100.0,
            }],
            total_weight: 1.0,
        };
        let table = render_allocation_table(&allocation);
        assert!(table.contains("A\\[B\\]\\#C"));
    }

    #[test]
    fn summary_stats_table_lists_all_fields() {
        let allocation = aggregate(&[
            holding("United States", 40.0),
            holding("Japan", 30.0),
            holding("Germany", 30.0),
        ]);
        let stats = SummaryStats::compute(&allocation, 3);
        let table = render_summary_stats(&stats);

        assert!(table.contains("[Holdings], [3]"));
        assert!(table.contains("[Countries], [3]"));
        assert!(table.contains("[Top 3 concentration], [100.00%]"));
        assert!(table.contains("Median allocation"));
        assert!(table.contains("Std deviation"));
    }
}
