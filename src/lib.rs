//! Derivation core for a football player data exploration dashboard.
//!
//! The base table is loaded once ([`dataset::Dataset`]) and every widget
//! view is a pure function of (base table, selections); see
//! [`dashboard::compute_dashboard`]. UI rendering, chart drawing, and
//! HTTP hosting are the caller's concern.

pub mod aggregate;
pub mod chart_data;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod dataset;

pub use aggregate::{CorrelationMatrix, GroupMean, PlayerNotFound, PositionCount};
pub use config::AppConfig;
pub use dashboard::{
    compute_dashboard, ClubMetric, DashboardOptions, DashboardView, Selections, Skill,
};
pub use dataset::{coerce_numeric, Dataset, LoadOptions};

/// Application name used for config paths and logging.
pub const APP_NAME: &str = "pitchboard";
