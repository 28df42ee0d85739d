//! Built-in Typst report template.

/// Default template used when no `template_path` is configured.
pub fn template() -> &'static str {
    r#"#set page(paper: "a4", margin: 2cm)
#set text(font: "New Computer Modern", size: 10pt)

= Geographic Allocation Report

Source file: `{{SOURCE_FILE}}` \
Generated: {{GENERATED_AT}}

== Summary

{{SUMMARY_STATS}}

== Allocation by Country

{{ALLOCATION_TABLE}}

#pagebreak()

== Charts

=== Country Share

{{PIE_CHART}}

=== Top Countries

{{RANKING_CHART}}

#pagebreak()

=== Allocation Distribution

{{HISTOGRAM}}

=== Spread

{{BOX_PLOT}}
"#
}
