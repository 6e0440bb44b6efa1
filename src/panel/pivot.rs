//! Pivot the long observation table into a (country, year) panel.
//!
//! Design goals:
//! - **Deterministic output** (BTreeMap keys, sorted columns) so re-runs
//!   produce byte-identical files
//! - **Row-level semantics**: a cell exists only where the provider reported
//!   a value; a (country, year) key with no non-null cell produces no row
//! - **Separation of concerns**: no file I/O here

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};

use crate::domain::Observation;
use crate::error::AppError;

const EDUCATION_EXP: &str = "education_exp";
const HEALTH_EXP: &str = "health_exp";
const GOVT_EXPENDITURE: &str = "govt_expenditure";
const EDUCATION_SHARE: &str = "education_share";
const HEALTH_SHARE: &str = "health_share";

/// The wide panel: one row per (country, year), one column per indicator
/// plus the derived share columns when their inputs are present.
#[derive(Debug, Clone)]
pub struct PanelTable {
    /// Value column names in output order: indicators sorted ascending,
    /// then derived columns.
    pub columns: Vec<String>,
    /// Rows sorted by (country, year).
    pub rows: Vec<PanelRow>,
}

/// One wide row; `values` is parallel to `PanelTable::columns`.
#[derive(Debug, Clone)]
pub struct PanelRow {
    pub country: String,
    pub year: i32,
    pub values: Vec<Option<f64>>,
}

impl PanelTable {
    pub fn country_count(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.country.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Inclusive (min, max) year across rows.
    pub fn year_range(&self) -> Option<(i32, i32)> {
        let min = self.rows.iter().map(|r| r.year).min()?;
        let max = self.rows.iter().map(|r| r.year).max()?;
        Some((min, max))
    }

    /// Index of a value column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// Pivot observations into the wide panel and attach derived shares.
///
/// Duplicate (country, year, indicator) triples resolve last-write-wins in
/// input order. A derived share column is added only when both of its input
/// columns made it into the panel; within a row the share is missing when
/// either input is missing, and a 0/0 quotient is also recorded as missing.
pub fn build_panel(observations: &[Observation]) -> Result<PanelTable, AppError> {
    let mut cells: BTreeMap<(String, i32), BTreeMap<String, f64>> = BTreeMap::new();
    let mut indicator_columns: BTreeSet<String> = BTreeSet::new();

    for obs in observations {
        let year = parse_year(&obs.date)
            .map_err(|e| AppError::new(4, format!("Bad observation date for {}: {e}", obs.country)))?;

        let Some(value) = obs.value else { continue };
        indicator_columns.insert(obs.indicator.clone());
        cells
            .entry((obs.country.clone(), year))
            .or_default()
            .insert(obs.indicator.clone(), value);
    }

    let mut columns: Vec<String> = indicator_columns.into_iter().collect();

    let has_education_share =
        columns.iter().any(|c| c == EDUCATION_EXP) && columns.iter().any(|c| c == GOVT_EXPENDITURE);
    let has_health_share =
        columns.iter().any(|c| c == HEALTH_EXP) && columns.iter().any(|c| c == GOVT_EXPENDITURE);

    if has_education_share {
        columns.push(EDUCATION_SHARE.to_string());
    }
    if has_health_share {
        columns.push(HEALTH_SHARE.to_string());
    }

    let mut rows = Vec::with_capacity(cells.len());
    for ((country, year), by_indicator) in cells {
        let mut values: Vec<Option<f64>> = columns
            .iter()
            .map(|c| by_indicator.get(c).copied())
            .collect();

        if has_education_share {
            let idx = values.len() - if has_health_share { 2 } else { 1 };
            values[idx] = ratio(
                by_indicator.get(EDUCATION_EXP),
                by_indicator.get(GOVT_EXPENDITURE),
            );
        }
        if has_health_share {
            let idx = values.len() - 1;
            values[idx] = ratio(
                by_indicator.get(HEALTH_EXP),
                by_indicator.get(GOVT_EXPENDITURE),
            );
        }

        rows.push(PanelRow {
            country,
            year,
            values,
        });
    }

    Ok(PanelTable { columns, rows })
}

/// Quotient of two optional cells, with NaN (0/0) mapped back to missing.
fn ratio(numerator: Option<&f64>, denominator: Option<&f64>) -> Option<f64> {
    let (n, d) = (numerator?, denominator?);
    let q = n / d;
    if q.is_nan() { None } else { Some(q) }
}

/// Extract the calendar year from an observation date.
///
/// Annual series report plain `YYYY`; monthly/quarterly variants report ISO
/// dates. Anything else is an error.
pub fn parse_year(s: &str) -> Result<i32, String> {
    let s = s.trim();
    if let Ok(year) = s.parse::<i32>() {
        return Ok(year);
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.year());
    }
    Err(format!("Invalid date '{s}'. Expected YYYY or YYYY-MM-DD."))
}
