//! Shared collection pipeline used by both output modes.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! country resolution -> per-indicator fetch -> raw save -> pivot -> report
//!
//! The pipeline takes its data source and pacer as arguments so tests can
//! run against an in-memory source without real delays.

use std::fs;
use std::path::PathBuf;

use crate::data::{FixedDelay, Pacer, WbClient, WdiSource};
use crate::domain::{
    CollectConfig, Country, FetchOutcome, FetchReport, IncomeTier, Observation, OutputMode,
};
use crate::error::AppError;
use crate::io::export;
use crate::panel::build_panel;
use crate::report;

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct CollectOutput {
    pub countries: Vec<Country>,
    pub report: FetchReport,
    /// Rows written to the long-format CSV (0 means the save was skipped).
    pub raw_rows: usize,
    /// Present only when the full pipeline produced processed outputs.
    pub processed: Option<ProcessedSummary>,
}

#[derive(Debug, Clone)]
pub struct ProcessedSummary {
    pub countries: usize,
    pub year_min: i32,
    pub year_max: i32,
    pub columns: usize,
}

/// Execute the pipeline against the live provider.
pub fn run_collect(config: &CollectConfig) -> Result<CollectOutput, AppError> {
    let client = WbClient::from_env();
    let pacer = FixedDelay::new(config.pause);
    run_collect_with_source(config, &client, &pacer)
}

/// Execute the pipeline with an injected source and pacer.
pub fn run_collect_with_source(
    config: &CollectConfig,
    source: &impl WdiSource,
    pacer: &impl Pacer,
) -> Result<CollectOutput, AppError> {
    if config.start_year > config.end_year {
        return Err(AppError::new(
            2,
            format!(
                "Invalid year range {}..{} (start must not exceed end).",
                config.start_year, config.end_year
            ),
        ));
    }
    if config.indicators.is_empty() {
        return Err(AppError::new(2, "No indicators configured."));
    }

    println!("Collecting data from World Bank Development Indicators...");

    println!("Fetching middle-income country list...");
    let countries = resolve_countries(source)?;
    println!("Identified {} middle-income countries.", countries.len());

    let paths = OutputPaths::prepare(config)?;

    if config.mode == OutputMode::Full {
        export::write_countries_csv(&paths.countries, &countries)?;
    }

    let (fetch_report, long_rows) = fetch_indicators(config, source, pacer, &countries);

    if long_rows.is_empty() {
        println!("No data collected. Please check for errors above.");
        return Ok(CollectOutput {
            countries,
            report: fetch_report,
            raw_rows: 0,
            processed: None,
        });
    }

    export::write_long_csv(&paths.raw, &long_rows)?;
    println!("Raw data saved with {} records", long_rows.len());

    let processed = match config.mode {
        OutputMode::RawOnly => None,
        OutputMode::Full => match process_and_save(&paths, &long_rows) {
            Ok(summary) => Some(summary),
            Err(e) => {
                // The raw table is already on disk; withhold processed outputs.
                eprintln!("Error processing data: {e}");
                None
            }
        },
    };

    Ok(CollectOutput {
        countries,
        report: fetch_report,
        raw_rows: long_rows.len(),
        processed,
    })
}

/// Resolve the LMIC + UMIC country set from the remote catalog.
///
/// Both tier listings are fetched for their id sets, then the full catalog
/// attaches display name and region. Output keeps catalog order; a country
/// present in both tiers is labeled LMIC.
pub fn resolve_countries(source: &impl WdiSource) -> Result<Vec<Country>, AppError> {
    let lmic: Vec<String> = source
        .countries_by_income(IncomeTier::Lmic)?
        .into_iter()
        .map(|c| c.id)
        .collect();
    let umic: Vec<String> = source
        .countries_by_income(IncomeTier::Umic)?
        .into_iter()
        .map(|c| c.id)
        .collect();

    let mut countries = Vec::with_capacity(lmic.len() + umic.len());
    for record in source.all_countries()? {
        let tier = if lmic.contains(&record.id) {
            IncomeTier::Lmic
        } else if umic.contains(&record.id) {
            IncomeTier::Umic
        } else {
            continue;
        };
        countries.push(Country {
            id: record.id,
            name: record.name,
            income_tier: tier,
            region: record.region,
        });
    }

    Ok(countries)
}

/// Fetch each configured indicator in definition order, pacing after every
/// attempt. Failures are recorded and skipped.
fn fetch_indicators(
    config: &CollectConfig,
    source: &impl WdiSource,
    pacer: &impl Pacer,
    countries: &[Country],
) -> (FetchReport, Vec<Observation>) {
    let ids: Vec<String> = countries.iter().map(|c| c.id.clone()).collect();
    let total = config.indicators.len();

    println!("Fetching data for {total} indicators...");

    let mut report = FetchReport::default();
    let mut long_rows = Vec::new();

    for (i, indicator) in config.indicators.iter().enumerate() {
        println!("Fetching {} ({}/{total})...", indicator.name, i + 1);

        match source.indicator_observations(
            &indicator.code,
            &ids,
            config.start_year,
            config.end_year,
        ) {
            Ok(rows) => {
                report.record(indicator, FetchOutcome::Fetched { rows: rows.len() });
                long_rows.extend(rows.into_iter().map(|r| Observation {
                    country: r.country_id,
                    date: r.date,
                    value: r.value,
                    indicator: indicator.name.clone(),
                }));
            }
            Err(e) => {
                eprintln!("Error fetching {}: {e}", indicator.name);
                report.record(
                    indicator,
                    FetchOutcome::Failed {
                        reason: e.to_string(),
                    },
                );
            }
        }

        pacer.wait();
    }

    (report, long_rows)
}

/// Pivot, derive shares, and write the processed outputs.
fn process_and_save(paths: &OutputPaths, long_rows: &[Observation]) -> Result<ProcessedSummary, AppError> {
    let panel = build_panel(long_rows)?;
    export::write_panel_csv(&paths.panel, &panel)?;

    let completeness = report::completeness(&panel);
    export::write_text(
        &paths.completeness,
        &report::format_completeness_report(&completeness),
    )?;

    println!("{}", report::format_panel_summary(&panel));
    println!("Processed data saved to {}", paths.panel.display());
    println!("Data collection complete!");

    let (year_min, year_max) = panel.year_range().unwrap_or((0, 0));
    Ok(ProcessedSummary {
        countries: panel.country_count(),
        year_min,
        year_max,
        columns: panel.columns.len(),
    })
}

/// Resolved output locations for one run.
struct OutputPaths {
    countries: PathBuf,
    raw: PathBuf,
    panel: PathBuf,
    completeness: PathBuf,
}

impl OutputPaths {
    fn prepare(config: &CollectConfig) -> Result<Self, AppError> {
        let mkdir = |dir: &PathBuf| {
            fs::create_dir_all(dir).map_err(|e| {
                AppError::new(2, format!("Failed to create '{}': {e}", dir.display()))
            })
        };

        match config.mode {
            OutputMode::Full => {
                let raw_dir = config.out_dir.join("raw");
                let processed_dir = config.out_dir.join("processed");
                mkdir(&raw_dir)?;
                mkdir(&processed_dir)?;
                Ok(Self {
                    countries: raw_dir.join("middle_income_countries.csv"),
                    raw: raw_dir.join("wdi_raw_data.csv"),
                    panel: processed_dir.join("middle_income_policy_data.csv"),
                    completeness: processed_dir.join("data_completeness_summary.txt"),
                })
            }
            OutputMode::RawOnly => {
                mkdir(&config.out_dir)?;
                let raw = config.out_dir.join("world_bank_data.csv");
                Ok(Self {
                    countries: config.out_dir.join("middle_income_countries.csv"),
                    raw: raw.clone(),
                    panel: raw.clone(),
                    completeness: raw,
                })
            }
        }
    }
}
