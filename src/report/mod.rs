//! Reporting utilities: completeness stats and formatted output.

pub mod format;

pub use format::*;

use crate::panel::PanelTable;

/// Non-missing percentage for one wide column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnCompleteness {
    pub column: String,
    pub pct: f64,
}

/// Per-column completeness of the wide panel, sorted non-increasing.
///
/// Every column is measured, including the always-present `country` and
/// `year` keys. The sort is stable, so ties keep column order.
pub fn completeness(panel: &PanelTable) -> Vec<ColumnCompleteness> {
    let n = panel.rows.len();
    let pct_of = |count: usize| {
        if n == 0 {
            0.0
        } else {
            count as f64 / n as f64 * 100.0
        }
    };

    let mut entries = vec![
        ColumnCompleteness {
            column: "country".to_string(),
            pct: pct_of(n),
        },
        ColumnCompleteness {
            column: "year".to_string(),
            pct: pct_of(n),
        },
    ];

    for (idx, column) in panel.columns.iter().enumerate() {
        let count = panel
            .rows
            .iter()
            .filter(|row| row.values[idx].is_some())
            .count();
        entries.push(ColumnCompleteness {
            column: column.clone(),
            pct: pct_of(count),
        });
    }

    entries.sort_by(|a, b| b.pct.partial_cmp(&a.pct).unwrap_or(std::cmp::Ordering::Equal));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::{PanelRow, PanelTable};

    fn panel() -> PanelTable {
        PanelTable {
            columns: vec!["gdp_growth".to_string(), "rd_exp".to_string()],
            rows: vec![
                PanelRow {
                    country: "A".to_string(),
                    year: 2010,
                    values: vec![Some(1.0), None],
                },
                PanelRow {
                    country: "A".to_string(),
                    year: 2011,
                    values: vec![Some(2.0), Some(0.5)],
                },
                PanelRow {
                    country: "B".to_string(),
                    year: 2010,
                    values: vec![Some(3.0), None],
                },
            ],
        }
    }

    #[test]
    fn percentages_bounded_and_sorted_non_increasing() {
        let entries = completeness(&panel());
        for entry in &entries {
            assert!((0.0..=100.0).contains(&entry.pct), "{entry:?}");
        }
        for pair in entries.windows(2) {
            assert!(pair[0].pct >= pair[1].pct);
        }
    }

    #[test]
    fn counts_non_missing_cells() {
        let entries = completeness(&panel());
        let pct = |name: &str| {
            entries
                .iter()
                .find(|e| e.column == name)
                .map(|e| e.pct)
                .unwrap()
        };

        assert_eq!(pct("country"), 100.0);
        assert_eq!(pct("year"), 100.0);
        assert_eq!(pct("gdp_growth"), 100.0);
        assert!((pct("rd_exp") - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn key_columns_lead_on_ties() {
        // Stable sort: country/year stay ahead of fully-populated indicators.
        let entries = completeness(&panel());
        assert_eq!(entries[0].column, "country");
        assert_eq!(entries[1].column, "year");
        assert_eq!(entries[2].column, "gdp_growth");
    }
}
