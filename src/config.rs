//! Optional TOML configuration for the dashboard's defaults.

use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::dashboard::{ClubMetric, DashboardOptions, Selections, Skill};

/// Default configuration template, written by `--write-default-config`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# pitchboard configuration

[defaults]
# Initial nationality selection (must exist in the loaded dataset)
nationality = "Brazil"
# One of: "Ball control", "Dribbling", "Finishing"
skill = "Dribbling"
# One of: "Overall", "Potential", "Age"
club_metric = "Overall"

[charts]
# Bin count for the age distribution histogram
histogram_bins = 10
# Clubs with fewer contributing players are dropped from club performance
min_club_group_size = 3
"#;

/// Complete application configuration. Unknown keys are rejected;
/// missing sections fall back to defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub defaults: DefaultsConfig,
    pub charts: ChartsConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            defaults: DefaultsConfig::default(),
            charts: ChartsConfig::default(),
        }
    }
}

/// Initial selection state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultsConfig {
    pub nationality: String,
    pub skill: Skill,
    pub club_metric: ClubMetric,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        let selections = Selections::default();
        Self {
            nationality: selections.nationality,
            skill: selections.skill,
            club_metric: selections.club_metric,
        }
    }
}

/// Chart tuning knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartsConfig {
    pub histogram_bins: usize,
    pub min_club_group_size: usize,
}

impl Default for ChartsConfig {
    fn default() -> Self {
        let options = DashboardOptions::default();
        Self {
            histogram_bins: options.histogram_bins,
            min_club_group_size: options.min_club_group_size,
        }
    }
}

impl AppConfig {
    /// Parse a config file. Fails on unreadable files or invalid TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| eyre!("could not read config {}: {}", path.display(), e))?;
        let config: AppConfig = toml::from_str(&content)
            .map_err(|e| eyre!("invalid config {}: {}", path.display(), e))?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Initial selections from the configured defaults.
    pub fn selections(&self) -> Selections {
        Selections {
            nationality: self.defaults.nationality.clone(),
            skill: self.defaults.skill,
            club_metric: self.defaults.club_metric,
            player_a: None,
            player_b: None,
        }
    }

    pub fn dashboard_options(&self) -> DashboardOptions {
        DashboardOptions {
            histogram_bins: self.charts.histogram_bins,
            min_club_group_size: self.charts.min_club_group_size,
        }
    }
}
