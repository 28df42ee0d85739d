//! SVG chart rendering for allocation reports.
//!
//! Charts are emitted as plain SVG strings; the report module wraps them in
//! `#image.decode(...)` for Typst.

use crate::domain::allocation::CountryAllocation;

const PALETTE: [&str; 12] = [
    "#4E79A7", "#F28E2B", "#E15759", "#76B7B2", "#59A14F", "#EDC948", "#B07AA1", "#FF9DA7",
    "#9C755F", "#BAB0AC", "#2F4B7C", "#A05195",
];

fn color(i: usize) -> &'static str {
    PALETTE[i % PALETTE.len()]
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Pie chart of country percentages. Countries below `other_threshold_pct`
/// are folded into a single "Other" slice.
pub fn pie_chart_svg(entries: &[CountryAllocation], other_threshold_pct: f64) -> String {
    if entries.is_empty() {
        return String::new();
    }

    let mut slices: Vec<(String, f64)> = Vec::new();
    let mut other = 0.0;
    for entry in entries {
        if entry.percentage >= other_threshold_pct {
            slices.push((entry.country.clone(), entry.percentage));
        } else {
            other += entry.percentage;
        }
    }
    if other > 0.0 {
        slices.push(("Other".to_string(), other));
    }

    let total: f64 = slices.iter().map(|(_, p)| p).sum();
    if total <= 0.0 {
        return String::new();
    }

    let (width, height) = (640.0, 360.0);
    let (cx, cy, r) = (180.0, 180.0, 150.0);

    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">"
    );

    // Degenerate single-slice pie is a full circle, not an arc.
    if slices.len() == 1 {
        svg.push_str(&format!(
            "<circle cx=\"{cx}\" cy=\"{cy}\" r=\"{r}\" fill=\"{}\"/>",
            color(0)
        ));
    } else {
        let mut angle = -std::f64::consts::FRAC_PI_2;
        for (i, (_, pct)) in slices.iter().enumerate() {
            let sweep = pct / total * std::f64::consts::TAU;
            let (x0, y0) = (cx + r * angle.cos(), cy + r * angle.sin());
            let end = angle + sweep;
            let (x1, y1) = (cx + r * end.cos(), cy + r * end.sin());
            let large_arc = if sweep > std::f64::consts::PI { 1 } else { 0 };
            svg.push_str(&format!(
                "<path d=\"M {cx:.2} {cy:.2} L {x0:.2} {y0:.2} A {r:.2} {r:.2} 0 {large_arc} 1 {x1:.2} {y1:.2} Z\" fill=\"{}\" stroke=\"white\" stroke-width=\"1\"/>",
                color(i)
            ));
            angle = end;
        }
    }

    // Legend down the right-hand side.
    for (i, (name, pct)) in slices.iter().enumerate() {
        let y = 30.0 + i as f64 * 24.0;
        svg.push_str(&format!(
            "<rect x=\"370\" y=\"{:.1}\" width=\"14\" height=\"14\" fill=\"{}\"/>",
            y - 11.0,
            color(i)
        ));
        svg.push_str(&format!(
            "<text x=\"392\" y=\"{y:.1}\" font-family=\"sans-serif\" font-size=\"13\">{} ({pct:.2}%)</text>",
            escape_xml(name)
        ));
    }

    svg.push_str("</svg>");
    svg
}

/// Horizontal bar chart of the top `top_n` countries by percentage.
pub fn ranking_chart_svg(entries: &[CountryAllocation], top_n: usize) -> String {
    if entries.is_empty() {
        return String::new();
    }

    let shown = &entries[..entries.len().min(top_n)];
    let max_pct = shown
        .iter()
        .map(|e| e.percentage)
        .fold(f64::NEG_INFINITY, f64::max)
        .max(f64::MIN_POSITIVE);

    let bar_height = 22.0;
    let gap = 8.0;
    let label_width = 170.0;
    let plot_width = 380.0;
    let width = label_width + plot_width + 80.0;
    let height = 20.0 + shown.len() as f64 * (bar_height + gap);

    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.0}\" height=\"{height:.0}\" viewBox=\"0 0 {width:.0} {height:.0}\">"
    );

    for (i, entry) in shown.iter().enumerate() {
        let y = 10.0 + i as f64 * (bar_height + gap);
        let w = entry.percentage / max_pct * plot_width;
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" font-family=\"sans-serif\" font-size=\"13\" text-anchor=\"end\">{}</text>",
            label_width - 8.0,
            y + bar_height - 6.0,
            escape_xml(&entry.country)
        ));
        svg.push_str(&format!(
            "<rect x=\"{label_width:.1}\" y=\"{y:.1}\" width=\"{w:.2}\" height=\"{bar_height:.1}\" fill=\"{}\"/>",
            color(i)
        ));
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" font-family=\"sans-serif\" font-size=\"13\">{:.2}%</text>",
            label_width + w + 6.0,
            y + bar_height - 6.0,
            entry.percentage
        ));
    }

    svg.push_str("</svg>");
    svg
}

/// Histogram of per-country percentage values, ten equal-width bins from
/// zero to the maximum percentage.
pub fn histogram_svg(entries: &[CountryAllocation]) -> String {
    if entries.is_empty() {
        return String::new();
    }

    let max_pct = entries
        .iter()
        .map(|e| e.percentage)
        .fold(f64::NEG_INFINITY, f64::max)
        .max(f64::MIN_POSITIVE);

    const BINS: usize = 10;
    let bin_width = max_pct / BINS as f64;
    let mut counts = [0usize; BINS];
    for entry in entries {
        let mut idx = (entry.percentage / bin_width) as usize;
        if idx >= BINS {
            idx = BINS - 1;
        }
        counts[idx] += 1;
    }
    let max_count = counts.iter().copied().max().unwrap_or(1).max(1);

    let (width, height, padding) = (520.0, 260.0, 40.0);
    let plot_width = width - 2.0 * padding;
    let plot_height = height - 2.0 * padding;
    let bar_w = plot_width / BINS as f64;

    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.0}\" height=\"{height:.0}\" viewBox=\"0 0 {width:.0} {height:.0}\">"
    );
    svg.push_str(&format!(
        "<line x1=\"{padding:.0}\" y1=\"{:.0}\" x2=\"{:.0}\" y2=\"{:.0}\" stroke=\"black\"/>",
        height - padding,
        width - padding,
        height - padding
    ));
    svg.push_str(&format!(
        "<line x1=\"{padding:.0}\" y1=\"{padding:.0}\" x2=\"{padding:.0}\" y2=\"{:.0}\" stroke=\"black\"/>",
        height - padding
    ));

    for (i, &count) in counts.iter().enumerate() {
        if count == 0 {
            continue;
        }
        let h = count as f64 / max_count as f64 * plot_height;
        let x = padding + i as f64 * bar_w;
        let y = height - padding - h;
        svg.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{y:.2}\" width=\"{:.2}\" height=\"{h:.2}\" fill=\"{}\" stroke=\"white\"/>",
            x + 1.0,
            bar_w - 2.0,
            PALETTE[0]
        ));
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" font-family=\"sans-serif\" font-size=\"11\" text-anchor=\"middle\">{count}</text>",
            x + bar_w / 2.0,
            y - 4.0
        ));
    }

    // Bin edge labels on the x axis.
    for i in 0..=BINS {
        let x = padding + i as f64 * bar_w;
        svg.push_str(&format!(
            "<text x=\"{x:.1}\" y=\"{:.1}\" font-family=\"sans-serif\" font-size=\"10\" text-anchor=\"middle\">{:.1}</text>",
            height - padding + 14.0,
            i as f64 * bin_width
        ));
    }

    svg.push_str("</svg>");
    svg
}

/// Box plot of per-country percentage values: min, quartiles, max, with
/// the median drawn through the box.
pub fn box_plot_svg(entries: &[CountryAllocation]) -> String {
    if entries.is_empty() {
        return String::new();
    }

    let mut values: Vec<f64> = entries.iter().map(|e| e.percentage).collect();
    values.sort_by(f64::total_cmp);

    let min = values[0];
    let max = values[values.len() - 1];
    let q1 = quantile(&values, 0.25);
    let q2 = quantile(&values, 0.50);
    let q3 = quantile(&values, 0.75);

    let (width, height, padding) = (520.0, 160.0, 40.0);
    let plot_width = width - 2.0 * padding;
    let range = (max - min).max(f64::MIN_POSITIVE);
    let x = |v: f64| padding + (v - min) / range * plot_width;

    let (box_top, box_bottom) = (40.0, 110.0);
    let mid = (box_top + box_bottom) / 2.0;

    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.0}\" height=\"{height:.0}\" viewBox=\"0 0 {width:.0} {height:.0}\">"
    );

    // Whiskers.
    svg.push_str(&format!(
        "<line x1=\"{:.2}\" y1=\"{mid:.1}\" x2=\"{:.2}\" y2=\"{mid:.1}\" stroke=\"black\"/>",
        x(min),
        x(q1)
    ));
    svg.push_str(&format!(
        "<line x1=\"{:.2}\" y1=\"{mid:.1}\" x2=\"{:.2}\" y2=\"{mid:.1}\" stroke=\"black\"/>",
        x(q3),
        x(max)
    ));
    for v in [min, max] {
        svg.push_str(&format!(
            "<line x1=\"{:.2}\" y1=\"{:.1}\" x2=\"{:.2}\" y2=\"{:.1}\" stroke=\"black\"/>",
            x(v),
            mid - 15.0,
            x(v),
            mid + 15.0
        ));
    }

    // Interquartile box and median line.
    svg.push_str(&format!(
        "<rect x=\"{:.2}\" y=\"{box_top:.1}\" width=\"{:.2}\" height=\"{:.1}\" fill=\"{}\" fill-opacity=\"0.5\" stroke=\"black\"/>",
        x(q1),
        (x(q3) - x(q1)).max(1.0),
        box_bottom - box_top,
        PALETTE[3]
    ));
    svg.push_str(&format!(
        "<line x1=\"{:.2}\" y1=\"{box_top:.1}\" x2=\"{:.2}\" y2=\"{box_bottom:.1}\" stroke=\"black\" stroke-width=\"2\"/>",
        x(q2),
        x(q2)
    ));

    for (v, label) in [(min, "min"), (q2, "median"), (max, "max")] {
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" font-family=\"sans-serif\" font-size=\"10\" text-anchor=\"middle\">{label} {v:.2}%</text>",
            x(v),
            box_top - 8.0
        ));
    }

    svg.push_str("</svg>");
    svg
}

/// Linear-interpolated quantile of an ascending-sorted slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
