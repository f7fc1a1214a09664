//! Pure aggregations over a (usually nationality-filtered) player frame.
//!
//! Every operation is request/response and idempotent: same frame, same
//! parameters, same result. Inputs are never mutated.

use color_eyre::Result;
use polars::prelude::*;
use serde::Serialize;
use std::collections::HashMap;

use crate::dataset::{self, NAME, PREFERRED_POSITIONS};

/// Token used for rows with no position information at all.
pub const UNKNOWN_POSITION: &str = "Unknown";

/// Pairs needing fewer rows than this are reported as NaN.
const MIN_CORRELATION_ROWS: usize = 3;

/// One slice of the position frequency chart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PositionCount {
    pub position: String,
    pub count: u64,
}

/// One group of a grouped-mean aggregation (e.g. one club).
#[derive(Clone, Debug, Serialize)]
pub struct GroupMean {
    pub group: String,
    pub mean: f64,
    /// Rows that contributed a non-missing value to the mean.
    pub count: u32,
}

/// Symmetric pairwise Pearson matrix over the columns that were present.
#[derive(Clone, Debug, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

/// Raised when a player name lookup finds no row. The dashboard maps this
/// to a placeholder view instead of an error for the end user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerNotFound(pub String);

impl std::fmt::Display for PlayerNotFound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "player '{}' not found", self.0)
    }
}

impl std::error::Error for PlayerNotFound {}

/// First `n` rows sorted by `sort_column` (stable, missing values last).
///
/// Sorts the column as-is; coerce it to numeric first if it may hold
/// strings (see [`dataset::coerce_numeric`]).
pub fn top_n(frame: &DataFrame, sort_column: &str, n: usize, descending: bool) -> Result<DataFrame> {
    let options = SortMultipleOptions::default()
        .with_order_descending(descending)
        .with_nulls_last(true)
        .with_maintain_order(true);
    let df = frame
        .clone()
        .lazy()
        .sort_by_exprs(vec![col(sort_column)], options)
        .limit(n as IdxSize)
        .collect()?;
    Ok(df)
}

/// Counts of individual position tokens across the frame, descending by
/// count with ties in first-encounter order.
///
/// Each `Preferred Positions` value is split on whitespace; a missing or
/// blank value contributes a single [`UNKNOWN_POSITION`] token, so the
/// counts always sum to the total token count.
pub fn position_frequency(frame: &DataFrame) -> Result<Vec<PositionCount>> {
    let positions = frame.column(PREFERRED_POSITIONS)?.str()?;

    // Encounter-ordered counts: the Vec preserves first-seen order, the
    // map indexes into it.
    let mut counts: Vec<PositionCount> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut bump = |token: &str, counts: &mut Vec<PositionCount>, index: &mut HashMap<String, usize>| {
        if let Some(&i) = index.get(token) {
            counts[i].count += 1;
        } else {
            index.insert(token.to_string(), counts.len());
            counts.push(PositionCount {
                position: token.to_string(),
                count: 1,
            });
        }
    };

    for value in positions.into_iter() {
        match value {
            Some(s) if !s.trim().is_empty() => {
                for token in s.split_whitespace() {
                    bump(token, &mut counts, &mut index);
                }
            }
            _ => bump(UNKNOWN_POSITION, &mut counts, &mut index),
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count)); // stable: ties keep encounter order
    Ok(counts)
}

/// Mean of `value_column` per `group_column` group, ignoring missing
/// values. Groups with fewer than `min_group_size` contributing rows are
/// dropped; the result is descending by mean, truncated to the top 10.
pub fn grouped_mean(
    frame: &DataFrame,
    group_column: &str,
    value_column: &str,
    min_group_size: usize,
) -> Result<Vec<GroupMean>> {
    let frame = dataset::coerce_numeric(frame, &[value_column])?;
    // A zero minimum would admit groups where every value is missing.
    let min_group_size = min_group_size.max(1);

    let grouped = frame
        .lazy()
        .group_by([col(group_column)])
        .agg([
            col(value_column).mean().alias("mean"),
            col(value_column).count().alias("count"),
        ])
        .filter(col("count").gt_eq(lit(min_group_size as u32)))
        .sort_by_exprs(
            vec![col("mean")],
            SortMultipleOptions::default()
                .with_order_descending(true)
                .with_nulls_last(true),
        )
        .limit(10)
        .collect()?;

    let groups = grouped.column(group_column)?.str()?;
    let means = grouped.column("mean")?.f64()?;
    let counts = grouped.column("count")?.u32()?;

    let mut out = Vec::with_capacity(grouped.height());
    for i in 0..grouped.height() {
        out.push(GroupMean {
            group: groups.get(i).unwrap_or_default().to_string(),
            mean: means.get(i).unwrap_or(f64::NAN),
            count: counts.get(i).unwrap_or(0),
        });
    }
    Ok(out)
}

/// Pairwise Pearson correlation over the subset of `columns` present in
/// the frame. Rows missing either value of a pair are ignored for that
/// pair; the diagonal is 1.0 by definition.
pub fn correlation_matrix(frame: &DataFrame, columns: &[&str]) -> Result<CorrelationMatrix> {
    let present: Vec<&str> = columns
        .iter()
        .copied()
        .filter(|c| frame.column(c).is_ok())
        .collect();
    let coerced = dataset::coerce_numeric(frame, &present)?;

    let n = present.len();
    let mut values = vec![vec![1.0; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let col1 = coerced.column(present[i])?;
            let col2 = coerced.column(present[j])?;

            // Drop rows missing either side of the pair
            let mask = col1.is_not_null() & col2.is_not_null();
            let col1 = col1.filter(&mask)?;
            let col2 = col2.filter(&mask)?;

            let r = if col1.len() < MIN_CORRELATION_ROWS {
                f64::NAN
            } else {
                pearson(col1.f64()?, col2.f64()?)
            };
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        columns: present.iter().map(|c| c.to_string()).collect(),
        values,
    })
}

fn pearson(a: &Float64Chunked, b: &Float64Chunked) -> f64 {
    let xs: Vec<f64> = a.into_iter().flatten().collect();
    let ys: Vec<f64> = b.into_iter().flatten().collect();
    if xs.len() != ys.len() || xs.len() < 2 {
        return f64::NAN;
    }

    let mean_x: f64 = xs.iter().sum::<f64>() / xs.len() as f64;
    let mean_y: f64 = ys.iter().sum::<f64>() / ys.len() as f64;

    let numerator: f64 = xs
        .iter()
        .zip(ys.iter())
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum();
    let var_x: f64 = xs.iter().map(|x| (x - mean_x).powi(2)).sum();
    let var_y: f64 = ys.iter().map(|y| (y - mean_y).powi(2)).sum();

    if var_x == 0.0 || var_y == 0.0 {
        return 0.0;
    }
    numerator / (var_x.sqrt() * var_y.sqrt())
}

/// Values of `attributes` for the first row whose Name equals
/// `player_name`. Absent columns and missing cells yield NaN entries;
/// an unmatched name is a [`PlayerNotFound`] error.
pub fn attribute_vector(
    frame: &DataFrame,
    player_name: &str,
    attributes: &[&str],
) -> Result<Vec<f64>> {
    let names = frame.column(NAME)?.str()?;
    let row = names
        .into_iter()
        .position(|v| v == Some(player_name))
        .ok_or_else(|| PlayerNotFound(player_name.to_string()))?;

    let mut out = Vec::with_capacity(attributes.len());
    for attribute in attributes {
        let value = match frame.column(attribute) {
            Ok(column) => column
                .cast(&DataType::Float64)?
                .f64()?
                .get(row)
                .unwrap_or(f64::NAN),
            Err(_) => f64::NAN,
        };
        out.push(value);
    }
    Ok(out)
}
