use crate::error::{Result, ResultExt as _, StatsError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::data::model::TeamId;

pub const DEFAULT_SOURCE_URL: &str = "http://www.batterseabadgers.co.uk/data";

/// Where the source document comes from and where the caches live.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SourceConfig {
    pub url: String,
    pub cache_dir: PathBuf,
    /// Raw document, stored verbatim after a network fetch
    pub raw_cache_file: String,
    pub batting_cache_file: String,
    pub bowling_cache_file: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SOURCE_URL.to_owned(),
            cache_dir: PathBuf::from("."),
            raw_cache_file: "data.json".to_owned(),
            batting_cache_file: "batting.parquet".to_owned(),
            bowling_cache_file: "bowling.parquet".to_owned(),
        }
    }
}

impl SourceConfig {
    pub fn raw_cache_path(&self) -> PathBuf {
        self.cache_dir.join(&self.raw_cache_file)
    }

    pub fn batting_cache_path(&self) -> PathBuf {
        self.cache_dir.join(&self.batting_cache_file)
    }

    pub fn bowling_cache_path(&self) -> PathBuf {
        self.cache_dir.join(&self.bowling_cache_file)
    }

    pub fn cache_paths(&self) -> [PathBuf; 3] {
        [
            self.raw_cache_path(),
            self.batting_cache_path(),
            self.bowling_cache_path(),
        ]
    }
}

/// Fixed membership lists used when annotating performances.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// The Badgers' own team id
    pub home_team_id: TeamId,
    /// Opponents only ever played on tour
    pub touring_team_ids: BTreeSet<TeamId>,
    /// Player slugs taking part in the quiz
    pub cohort: BTreeSet<String>,
}

const TOURING_TEAM_IDS: [u32; 25] = [
    11, 12, 13, 27, 28, 38, 39, 40, 47, 48, 51, 52, 53, 54, 57, 58, 59, 66, 67, 72, 73, 74, 87, 88,
    92,
];

const QUIZ_COHORT: [&str; 12] = [
    "andrew-thorpe",
    "jan-marchant",
    "martin-cloke",
    "peter-warman",
    "peter-jinks",
    "chris-shone",
    "joshua-lee",
    "nick-foord",
    "peter-cade",
    "t-rex",
    "david-hirst",
    "james-hamblin",
];

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            home_team_id: TeamId(1),
            touring_team_ids: TOURING_TEAM_IDS.into_iter().map(TeamId).collect(),
            cohort: QUIZ_COHORT.into_iter().map(str::to_owned).collect(),
        }
    }
}

/// Knobs for individual questions.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    /// Format compared in the averages question
    pub format_id: u32,
    /// Player whose running distance is totted up
    pub featured_player: String,
    /// Length of a pitch, wicket to wicket
    pub metres_per_run: f64,
    /// Epanechnikov kernel width for the hazard curve, in runs
    pub hazard_bandwidth: f64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format_id: 1,
            featured_player: "andrew-thorpe".to_owned(),
            metres_per_run: 17.68,
            hazard_bandwidth: 5.0,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct QuizConfig {
    pub source: SourceConfig,
    pub enrichment: EnrichmentConfig,
    pub report: ReportConfig,
}

impl QuizConfig {
    /// Reads a JSON config; fields left out keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| StatsError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` when given, otherwise the built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config {}", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let bandwidth = self.report.hazard_bandwidth;
        if bandwidth.is_nan() || bandwidth <= 0.0 {
            return Err(StatsError::Config(format!(
                "hazard_bandwidth must be positive, got {bandwidth}"
            )));
        }
        if !self.report.metres_per_run.is_finite() || self.report.metres_per_run < 0.0 {
            return Err(StatsError::Config(format!(
                "metres_per_run must be a non-negative number, got {}",
                self.report.metres_per_run
            )));
        }
        Ok(())
    }
}
