//! Formatted terminal and file output.
//!
//! We keep formatting code in one place so:
//! - the pivot/completeness code stays clean and testable
//! - output changes are localized

use crate::domain::{FetchOutcome, FetchReport};
use crate::panel::PanelTable;
use crate::report::ColumnCompleteness;

/// Body of the completeness summary file.
pub fn format_completeness_report(entries: &[ColumnCompleteness]) -> String {
    let mut out = String::new();
    out.push_str("Data Completeness Summary (% of non-missing values)\n");
    out.push_str(&"=".repeat(50));
    out.push('\n');
    for entry in entries {
        out.push_str(&format!("{}: {:.1}%\n", entry.column, entry.pct));
    }
    out
}

/// One-line dataset summary for the terminal.
pub fn format_panel_summary(panel: &PanelTable) -> String {
    match panel.year_range() {
        Some((min, max)) => format!(
            "Dataset contains {} countries, from {min} to {max}",
            panel.country_count()
        ),
        None => "Dataset contains no rows".to_string(),
    }
}

/// Per-indicator outcome summary for the terminal.
pub fn format_fetch_report(report: &FetchReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Indicators: {} fetched, {} failed\n",
        report.fetched().count(),
        report.failed().count()
    ));
    for item in report.failed() {
        if let FetchOutcome::Failed { reason } = &item.outcome {
            out.push_str(&format!("  {} ({}): {reason}\n", item.name, item.code));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FetchOutcome, IndicatorDef};
    use crate::panel::PanelRow;

    #[test]
    fn completeness_report_layout() {
        let entries = vec![
            ColumnCompleteness {
                column: "country".to_string(),
                pct: 100.0,
            },
            ColumnCompleteness {
                column: "rd_exp".to_string(),
                pct: 33.333333,
            },
        ];

        let text = format_completeness_report(&entries);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "Data Completeness Summary (% of non-missing values)"
        );
        assert_eq!(lines[1], "=".repeat(50));
        assert_eq!(lines[2], "country: 100.0%");
        assert_eq!(lines[3], "rd_exp: 33.3%");
    }

    #[test]
    fn panel_summary_names_countries_and_years() {
        let panel = PanelTable {
            columns: vec!["gdp_growth".to_string()],
            rows: vec![
                PanelRow {
                    country: "IND".to_string(),
                    year: 2000,
                    values: vec![Some(1.0)],
                },
                PanelRow {
                    country: "BRA".to_string(),
                    year: 2020,
                    values: vec![Some(2.0)],
                },
            ],
        };
        assert_eq!(
            format_panel_summary(&panel),
            "Dataset contains 2 countries, from 2000 to 2020"
        );
    }

    #[test]
    fn fetch_report_lists_failures_with_reasons() {
        let mut report = FetchReport::default();
        report.record(
            &IndicatorDef::new("NY.GDP.PCAP.CD", "gdp_per_capita"),
            FetchOutcome::Fetched { rows: 42 },
        );
        report.record(
            &IndicatorDef::new("SE.SEC.ENRR", "secondary_enrollment"),
            FetchOutcome::Failed {
                reason: "Request timed out".to_string(),
            },
        );

        let text = format_fetch_report(&report);
        assert!(text.starts_with("Indicators: 1 fetched, 1 failed\n"));
        assert!(text.contains("secondary_enrollment (SE.SEC.ENRR): Request timed out"));
        assert!(!text.contains("gdp_per_capita ("));
    }
}
