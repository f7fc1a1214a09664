//! Chart-ready series built from aggregated frames: each `prepare_*`
//! function feeds exactly one rendering widget. All outputs serialize to
//! JSON for the hosting UI layer (non-finite floats become null).

use color_eyre::Result;
use polars::prelude::*;
use serde::Serialize;

use crate::aggregate::attribute_vector;
use crate::dataset::{CLUB, NAME};

/// Tabular rows for display: stringified cells, missing values blank.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TableData {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Categorical bar series: one (label, value, group) triple per bar.
#[derive(Clone, Debug, Serialize)]
pub struct BarSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    /// Color grouping per bar (the player's club for the top-players chart).
    pub groups: Vec<String>,
}

impl BarSeries {
    pub fn empty() -> Self {
        Self {
            labels: Vec::new(),
            values: Vec::new(),
            groups: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Equal-width histogram bins over the observed value range.
/// `edges` has one more entry than `counts`; the last bin is closed.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HistogramData {
    pub edges: Vec<f64>,
    pub counts: Vec<u32>,
}

impl HistogramData {
    pub fn empty() -> Self {
        Self {
            edges: Vec::new(),
            counts: Vec::new(),
        }
    }
}

/// Scatter points with both coordinates present and finite.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScatterSeries {
    pub x: String,
    pub y: String,
    pub points: Vec<(f64, f64)>,
}

/// One player's polar trace on the head-to-head radar.
#[derive(Clone, Debug, Serialize)]
pub struct RadarPlayer {
    pub name: String,
    pub values: Vec<f64>,
}

/// Radar axes plus one value vector per compared player.
#[derive(Clone, Debug, Serialize)]
pub struct RadarSeries {
    pub attributes: Vec<String>,
    pub players: Vec<RadarPlayer>,
}

/// Stringified view of the given columns, restricted to those present.
pub fn prepare_table(frame: &DataFrame, columns: &[&str]) -> Result<TableData> {
    let present: Vec<&str> = columns
        .iter()
        .copied()
        .filter(|c| frame.column(c).is_ok())
        .collect();
    let selected = frame.select(present.iter().copied())?;

    let mut rows = vec![Vec::with_capacity(present.len()); selected.height()];
    for column in selected.get_columns() {
        for (i, row) in rows.iter_mut().enumerate() {
            let value = column.get(i)?;
            if matches!(value, AnyValue::Null) {
                row.push(String::new());
            } else {
                row.push(value.str_value().to_string());
            }
        }
    }

    Ok(TableData {
        columns: present.iter().map(|c| c.to_string()).collect(),
        rows,
    })
}

/// Bar series from a top-N frame: player names as labels, `value_column`
/// as heights, clubs as color groups. Missing heights become NaN bars.
pub fn prepare_bar_series(frame: &DataFrame, value_column: &str) -> Result<BarSeries> {
    let names = frame.column(NAME)?.str()?;
    let clubs = frame.column(CLUB)?.str()?;
    let values = frame.column(value_column)?.cast(&DataType::Float64)?;
    let values = values.f64()?;

    let mut series = BarSeries::empty();
    for i in 0..frame.height() {
        series.labels.push(names.get(i).unwrap_or_default().to_string());
        series.values.push(values.get(i).unwrap_or(f64::NAN));
        series.groups.push(clubs.get(i).unwrap_or_default().to_string());
    }
    Ok(series)
}

/// Equal-width histogram of a numeric column, missing values dropped.
/// A constant column collapses to a single bin.
pub fn prepare_histogram(frame: &DataFrame, column: &str, bins: usize) -> Result<HistogramData> {
    let values = frame.column(column)?.cast(&DataType::Float64)?;
    let values: Vec<f64> = values
        .f64()?
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .collect();
    if values.is_empty() || bins == 0 {
        return Ok(HistogramData::empty());
    }

    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if max == min {
        return Ok(HistogramData {
            edges: vec![min, max],
            counts: vec![values.len() as u32],
        });
    }

    let width = (max - min) / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|i| min + width * i as f64).collect();
    let mut counts = vec![0u32; bins];
    for value in values {
        // The maximum falls into the last (closed) bin
        let bin = (((value - min) / width) as usize).min(bins - 1);
        counts[bin] += 1;
    }

    Ok(HistogramData { edges, counts })
}

/// Scatter points of `y_column` against `x_column`: select, cast to f64,
/// drop rows with a null on either axis, skip non-finite survivors.
pub fn prepare_scatter(frame: &DataFrame, x_column: &str, y_column: &str) -> Result<ScatterSeries> {
    let df = frame
        .clone()
        .lazy()
        .select([
            col(x_column).cast(DataType::Float64),
            col(y_column).cast(DataType::Float64),
        ])
        .drop_nulls(None)
        .collect()?;

    let xs = df.column(x_column)?.f64()?;
    let ys = df.column(y_column)?.f64()?;
    let mut points = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let x = xs.get(i).unwrap_or(f64::NAN);
        let y = ys.get(i).unwrap_or(f64::NAN);
        if x.is_finite() && y.is_finite() {
            points.push((x, y));
        }
    }

    Ok(ScatterSeries {
        x: x_column.to_string(),
        y: y_column.to_string(),
        points,
    })
}

/// Head-to-head radar series for two players over the attribute axes
/// present in the frame. Either name failing to match is a
/// [`crate::aggregate::PlayerNotFound`] error for the caller to map to a
/// placeholder.
pub fn prepare_radar(
    frame: &DataFrame,
    attributes: &[&str],
    player_a: &str,
    player_b: &str,
) -> Result<RadarSeries> {
    let present: Vec<&str> = attributes
        .iter()
        .copied()
        .filter(|a| frame.column(a).is_ok())
        .collect();

    let mut players = Vec::with_capacity(2);
    for name in [player_a, player_b] {
        let values = attribute_vector(frame, name, &present)?;
        players.push(RadarPlayer {
            name: name.to_string(),
            values,
        });
    }

    Ok(RadarSeries {
        attributes: present.iter().map(|a| a.to_string()).collect(),
        players,
    })
}
