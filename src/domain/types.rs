//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - accumulated in-memory during the fetch loop
//! - exported to CSV
//! - inspected by tests (the fetch report in particular)

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// World Bank income classification tier targeted by this tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IncomeTier {
    /// Lower-middle-income country.
    Lmic,
    /// Upper-middle-income country.
    Umic,
}

impl IncomeTier {
    /// Label used in output files ("LMIC" / "UMIC").
    pub fn label(self) -> &'static str {
        match self {
            IncomeTier::Lmic => "LMIC",
            IncomeTier::Umic => "UMIC",
        }
    }

    /// Classification code understood by the catalog API.
    pub fn api_code(self) -> &'static str {
        match self {
            IncomeTier::Lmic => "LMC",
            IncomeTier::Umic => "UMC",
        }
    }
}

/// A resolved middle-income country.
///
/// Identity is the ISO id; built once per run from the remote catalog and
/// written to the reference CSV unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Country {
    pub id: String,
    pub name: String,
    pub income_tier: IncomeTier,
    pub region: String,
}

/// A statistical series to fetch: provider code plus the short column name
/// it becomes in the wide panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorDef {
    pub code: String,
    pub name: String,
}

impl IndicatorDef {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// One long-format row: (country, date, value) tagged with the indicator
/// short name. `value` is `None` where the provider reported no data.
#[derive(Debug, Clone)]
pub struct Observation {
    pub country: String,
    pub date: String,
    pub value: Option<f64>,
    pub indicator: String,
}

/// Which outputs a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Raw long table + wide panel + completeness report.
    Full,
    /// Single long-format CSV, no post-processing.
    RawOnly,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults); nothing in the pipeline
/// reads globals, so tests can substitute indicator lists, paths, and delays.
#[derive(Debug, Clone)]
pub struct CollectConfig {
    pub indicators: Vec<IndicatorDef>,
    pub start_year: i32,
    pub end_year: i32,
    pub out_dir: PathBuf,
    /// Pause inserted after every indicator request (success or failure).
    pub pause: Duration,
    pub mode: OutputMode,
}

impl CollectConfig {
    /// The fixed indicator set: economic, policy, infrastructure, and human
    /// capital series from the World Development Indicators database.
    pub fn default_indicators() -> Vec<IndicatorDef> {
        [
            ("NY.GDP.PCAP.CD", "gdp_per_capita"),
            ("NY.GDP.MKTP.KD.ZG", "gdp_growth"),
            ("SE.XPD.TOTL.GD.ZS", "education_exp"),
            ("SH.XPD.CHEX.GD.ZS", "health_exp"),
            ("NE.GDI.TOTL.ZS", "investment"),
            ("GB.XPD.RSDV.GD.ZS", "rd_exp"),
            ("NE.TRD.GNFS.ZS", "trade_openness"),
            ("GC.XPN.TOTL.GD.ZS", "govt_expenditure"),
            ("IT.NET.USER.ZS", "internet_users"),
            ("EG.ELC.ACCS.ZS", "electricity_access"),
            ("SE.SEC.ENRR", "secondary_enrollment"),
            ("SE.TER.ENRR", "tertiary_enrollment"),
        ]
        .into_iter()
        .map(|(code, name)| IndicatorDef::new(code, name))
        .collect()
    }
}

/// Outcome of a single indicator fetch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Fetched { rows: usize },
    Failed { reason: String },
}

/// Per-indicator result, in fetch order.
#[derive(Debug, Clone)]
pub struct IndicatorFetch {
    pub code: String,
    pub name: String,
    pub outcome: FetchOutcome,
}

/// All per-indicator outcomes of a run, so downstream code and tests can
/// inspect exactly which indicators failed and why.
#[derive(Debug, Clone, Default)]
pub struct FetchReport {
    pub items: Vec<IndicatorFetch>,
}

impl FetchReport {
    pub fn record(&mut self, def: &IndicatorDef, outcome: FetchOutcome) {
        self.items.push(IndicatorFetch {
            code: def.code.clone(),
            name: def.name.clone(),
            outcome,
        });
    }

    pub fn fetched(&self) -> impl Iterator<Item = &IndicatorFetch> {
        self.items
            .iter()
            .filter(|item| matches!(item.outcome, FetchOutcome::Fetched { .. }))
    }

    pub fn failed(&self) -> impl Iterator<Item = &IndicatorFetch> {
        self.items
            .iter()
            .filter(|item| matches!(item.outcome, FetchOutcome::Failed { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_codes_and_labels() {
        assert_eq!(IncomeTier::Lmic.api_code(), "LMC");
        assert_eq!(IncomeTier::Umic.api_code(), "UMC");
        assert_eq!(IncomeTier::Lmic.label(), "LMIC");
        assert_eq!(IncomeTier::Umic.label(), "UMIC");
    }

    #[test]
    fn default_indicator_set() {
        let indicators = CollectConfig::default_indicators();
        assert_eq!(indicators.len(), 12);
        assert_eq!(indicators[0].code, "NY.GDP.PCAP.CD");
        assert_eq!(indicators[0].name, "gdp_per_capita");
        // The two share denominators/numerators must be present for the
        // derived columns to ever materialize.
        for name in ["education_exp", "health_exp", "govt_expenditure"] {
            assert!(indicators.iter().any(|d| d.name == name), "missing {name}");
        }
    }

    #[test]
    fn fetch_report_partitions() {
        let mut report = FetchReport::default();
        report.record(
            &IndicatorDef::new("A", "a"),
            FetchOutcome::Fetched { rows: 10 },
        );
        report.record(
            &IndicatorDef::new("B", "b"),
            FetchOutcome::Failed {
                reason: "boom".to_string(),
            },
        );

        assert_eq!(report.fetched().count(), 1);
        assert_eq!(report.failed().count(), 1);
        assert_eq!(report.failed().next().unwrap().name, "b");
    }
}
