//! CSV and text exports.
//!
//! The exports are meant to be easy to consume in spreadsheets or downstream
//! analysis scripts. Country display names contain commas ("Congo, Dem.
//! Rep."), so all tabular output goes through the `csv` writer rather than
//! raw line printing.

use std::path::Path;

use crate::domain::{Country, Observation};
use crate::error::AppError;
use crate::panel::PanelTable;

/// Write the resolved country reference list.
pub fn write_countries_csv(path: &Path, countries: &[Country]) -> Result<(), AppError> {
    let mut writer = open_writer(path)?;

    writer
        .write_record(["id", "name", "income_level", "region"])
        .map_err(|e| write_err(path, e))?;
    for country in countries {
        writer
            .write_record([
                country.id.as_str(),
                country.name.as_str(),
                country.income_tier.label(),
                country.region.as_str(),
            ])
            .map_err(|e| write_err(path, e))?;
    }

    writer.flush().map_err(|e| flush_err(path, e))
}

/// Write the concatenated long-format observation table.
pub fn write_long_csv(path: &Path, observations: &[Observation]) -> Result<(), AppError> {
    let mut writer = open_writer(path)?;

    writer
        .write_record(["country", "date", "value", "indicator"])
        .map_err(|e| write_err(path, e))?;
    for obs in observations {
        let cell = fmt_cell(obs.value);
        writer
            .write_record([
                obs.country.as_str(),
                obs.date.as_str(),
                cell.as_str(),
                obs.indicator.as_str(),
            ])
            .map_err(|e| write_err(path, e))?;
    }

    writer.flush().map_err(|e| flush_err(path, e))
}

/// Write the wide (country, year) panel.
pub fn write_panel_csv(path: &Path, panel: &PanelTable) -> Result<(), AppError> {
    let mut writer = open_writer(path)?;

    let mut header = vec!["country".to_string(), "year".to_string()];
    header.extend(panel.columns.iter().cloned());
    writer
        .write_record(&header)
        .map_err(|e| write_err(path, e))?;

    for row in &panel.rows {
        let mut record = vec![row.country.clone(), row.year.to_string()];
        record.extend(row.values.iter().map(|v| fmt_cell(*v)));
        writer
            .write_record(&record)
            .map_err(|e| write_err(path, e))?;
    }

    writer.flush().map_err(|e| flush_err(path, e))
}

/// Write a plain-text report, overwriting any previous run's file.
pub fn write_text(path: &Path, body: &str) -> Result<(), AppError> {
    std::fs::write(path, body)
        .map_err(|e| AppError::new(2, format!("Failed to write '{}': {e}", path.display())))
}

/// Missing cells are empty; present values use the shortest round-trip
/// float form.
fn fmt_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn open_writer(path: &Path) -> Result<csv::Writer<std::fs::File>, AppError> {
    csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", path.display())))
}

fn write_err(path: &Path, e: csv::Error) -> AppError {
    AppError::new(2, format!("Failed to write '{}': {e}", path.display()))
}

fn flush_err(path: &Path, e: std::io::Error) -> AppError {
    AppError::new(2, format!("Failed to flush '{}': {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::IncomeTier;
    use crate::panel::PanelRow;

    #[test]
    fn countries_csv_quotes_names_with_commas() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("countries.csv");

        let countries = vec![
            Country {
                id: "COD".to_string(),
                name: "Congo, Dem. Rep.".to_string(),
                income_tier: IncomeTier::Lmic,
                region: "Sub-Saharan Africa".to_string(),
            },
            Country {
                id: "BRA".to_string(),
                name: "Brazil".to_string(),
                income_tier: IncomeTier::Umic,
                region: "Latin America & Caribbean".to_string(),
            },
        ];

        write_countries_csv(&path, &countries).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "id,name,income_level,region");
        assert_eq!(
            lines[1],
            "COD,\"Congo, Dem. Rep.\",LMIC,Sub-Saharan Africa"
        );
        assert_eq!(lines[2], "BRA,Brazil,UMIC,Latin America & Caribbean");
    }

    #[test]
    fn long_csv_leaves_missing_values_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.csv");

        let rows = vec![
            Observation {
                country: "IND".to_string(),
                date: "2019".to_string(),
                value: Some(2100.5),
                indicator: "gdp_per_capita".to_string(),
            },
            Observation {
                country: "IND".to_string(),
                date: "2020".to_string(),
                value: None,
                indicator: "gdp_per_capita".to_string(),
            },
        ];

        write_long_csv(&path, &rows).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "country,date,value,indicator");
        assert_eq!(lines[1], "IND,2019,2100.5,gdp_per_capita");
        assert_eq!(lines[2], "IND,2020,,gdp_per_capita");
    }

    #[test]
    fn panel_csv_round_trips_columns_and_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("panel.csv");

        let panel = PanelTable {
            columns: vec!["gdp_growth".to_string(), "education_share".to_string()],
            rows: vec![PanelRow {
                country: "IND".to_string(),
                year: 2010,
                values: vec![Some(5.0), None],
            }],
        };

        write_panel_csv(&path, &panel).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "country,year,gdp_growth,education_share");
        assert_eq!(lines[1], "IND,2010,5,");
    }

    #[test]
    fn text_report_overwrites_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.txt");

        write_text(&path, "first\n").unwrap();
        write_text(&path, "second\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second\n");
    }
}
