//! Country name canonicalization.
//!
//! Vendor exports disagree on country labels; the fixed mapping below folds
//! the variants we have seen into one canonical name per country. Unmapped
//! names pass through unchanged.

/// (variant, canonical) pairs. Lookup is exact after whitespace trimming.
const CANONICAL_COUNTRIES: [(&str, &str); 12] = [
    ("Korea (South)", "South Korea"),
    ("Korea, Republic of", "South Korea"),
    ("Republic of Korea", "South Korea"),
    ("USA", "United States"),
    ("U.S.A.", "United States"),
    ("United States of America", "United States"),
    ("UK", "United Kingdom"),
    ("Great Britain", "United Kingdom"),
    ("Russian Federation", "Russia"),
    ("Taiwan, Province of China", "Taiwan"),
    ("Hong Kong SAR", "Hong Kong"),
    ("Viet Nam", "Vietnam"),
];

/// Trim and canonicalize a raw location string.
pub fn normalize_country(raw: &str) -> String {
    let trimmed = raw.trim();
    for (variant, canonical) in CANONICAL_COUNTRIES {
        if trimmed == variant {
            return canonical.to_string();
        }
    }
    trimmed.to_string()
}
