//! One synchronous derivation pass: (base table, selections) -> every
//! widget's view. The hosting UI owns event wiring and calls
//! [`compute_dashboard`] again whenever a selection changes; nothing is
//! cached between calls and the base table is never touched.

use clap::ValueEnum;
use color_eyre::Result;
use serde::{Deserialize, Serialize};

use crate::aggregate::{
    correlation_matrix, grouped_mean, position_frequency, top_n, CorrelationMatrix, GroupMean,
    PlayerNotFound, PositionCount,
};
use crate::chart_data::{
    prepare_bar_series, prepare_histogram, prepare_radar, prepare_scatter, prepare_table,
    BarSeries, HistogramData, RadarSeries, ScatterSeries, TableData,
};
use crate::dataset::{
    coerce_numeric, Dataset, AGE, CLUB, CORRELATION_COLUMNS, NAME, POTENTIAL,
    PREFERRED_POSITIONS, RADAR_ATTRIBUTES,
};

/// Bars in the top-players chart.
pub const TOP_PLAYER_COUNT: usize = 10;

/// Skill metric selectable in the dashboard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum Skill {
    #[serde(rename = "Ball control")]
    BallControl,
    #[default]
    Dribbling,
    Finishing,
}

impl Skill {
    /// Column name in the source table.
    pub fn as_column(&self) -> &'static str {
        match self {
            Skill::BallControl => "Ball control",
            Skill::Dribbling => "Dribbling",
            Skill::Finishing => "Finishing",
        }
    }
}

impl std::fmt::Display for Skill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_column())
    }
}

/// Metric for the club performance chart.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum ClubMetric {
    #[default]
    Overall,
    Potential,
    Age,
}

impl ClubMetric {
    pub fn as_column(&self) -> &'static str {
        match self {
            ClubMetric::Overall => "Overall",
            ClubMetric::Potential => "Potential",
            ClubMetric::Age => "Age",
        }
    }
}

impl std::fmt::Display for ClubMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_column())
    }
}

/// The user's current selections. Defaults mirror the dashboard's initial
/// state: Brazil, Dribbling, club performance by Overall, no comparison.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Selections {
    pub nationality: String,
    pub skill: Skill,
    pub club_metric: ClubMetric,
    pub player_a: Option<String>,
    pub player_b: Option<String>,
}

impl Default for Selections {
    fn default() -> Self {
        Self {
            nationality: "Brazil".to_string(),
            skill: Skill::default(),
            club_metric: ClubMetric::default(),
            player_a: None,
            player_b: None,
        }
    }
}

/// Tuning knobs with config-file defaults.
#[derive(Clone, Copy, Debug)]
pub struct DashboardOptions {
    pub histogram_bins: usize,
    /// Clubs with fewer contributing players than this are dropped from
    /// the club performance chart.
    pub min_club_group_size: usize,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            histogram_bins: 10,
            min_club_group_size: 3,
        }
    }
}

/// Every widget's view for one set of selections.
#[derive(Clone, Debug, Serialize)]
pub struct DashboardView {
    pub nationality: String,
    pub skill: String,
    pub club_metric: String,
    pub players_table: TableData,
    pub top_players: BarSeries,
    pub positions: Vec<PositionCount>,
    pub age_histogram: HistogramData,
    pub potential_vs_age: ScatterSeries,
    pub skill_correlation: CorrelationMatrix,
    /// None when no pair is selected or a selected name was not found;
    /// the UI renders a placeholder in that case.
    pub head_to_head: Option<RadarSeries>,
    pub club_performance: Vec<GroupMean>,
}

/// Compute all derived views from the base table and the current
/// selections in one pass. An empty nationality subset yields empty
/// views, never an error.
pub fn compute_dashboard(
    dataset: &Dataset,
    selections: &Selections,
    options: &DashboardOptions,
) -> Result<DashboardView> {
    let subset = dataset.filter_by_nationality(&selections.nationality)?;
    // One coercion pass covers the skill, radar, and correlation columns;
    // always a new frame, the base table stays as loaded.
    let subset = coerce_numeric(&subset, CORRELATION_COLUMNS)?;

    let skill_column = selections.skill.as_column();
    let skill_available = subset.column(skill_column).is_ok();
    if !skill_available {
        log::warn!(
            "skill column '{}' not in dataset; dependent views will be empty",
            skill_column
        );
    }

    let players_table = prepare_table(
        &subset,
        &[NAME, CLUB, AGE, POTENTIAL, PREFERRED_POSITIONS, skill_column],
    )?;

    let top_players = if skill_available {
        let top = top_n(&subset, skill_column, TOP_PLAYER_COUNT, true)?;
        prepare_bar_series(&top, skill_column)?
    } else {
        BarSeries::empty()
    };

    let positions = position_frequency(&subset)?;
    let age_histogram = prepare_histogram(&subset, AGE, options.histogram_bins)?;
    let potential_vs_age = prepare_scatter(&subset, AGE, POTENTIAL)?;
    let skill_correlation = correlation_matrix(&subset, CORRELATION_COLUMNS)?;

    let head_to_head = match (&selections.player_a, &selections.player_b) {
        (Some(a), Some(b)) => match prepare_radar(&subset, RADAR_ATTRIBUTES, a, b) {
            Ok(radar) => Some(radar),
            Err(err) => match err.downcast_ref::<PlayerNotFound>() {
                Some(missing) => {
                    log::warn!("{missing}; rendering empty comparison");
                    None
                }
                None => return Err(err),
            },
        },
        _ => None,
    };

    let club_performance = grouped_mean(
        &subset,
        CLUB,
        selections.club_metric.as_column(),
        options.min_club_group_size,
    )?;

    Ok(DashboardView {
        nationality: selections.nationality.clone(),
        skill: skill_column.to_string(),
        club_metric: selections.club_metric.as_column().to_string(),
        players_table,
        top_players,
        positions,
        age_histogram,
        potential_vs_age,
        skill_correlation,
        head_to_head,
        club_performance,
    })
}
