//! The base table: load the player CSV once, then expose read-only views.
//!
//! Every function here returns a new frame; the loaded table is never
//! mutated by any derived computation.

use color_eyre::eyre::eyre;
use color_eyre::Result;
use polars::prelude::*;
use std::path::Path;
use std::sync::Arc;

/// Player name column.
pub const NAME: &str = "Name";
/// Nationality column, matched exactly (case-sensitive) when filtering.
pub const NATIONALITY: &str = "Nationality";
/// Club column, the grouping key for club performance.
pub const CLUB: &str = "Club";
pub const AGE: &str = "Age";
pub const OVERALL: &str = "Overall";
pub const POTENTIAL: &str = "Potential";
/// Zero or more space-separated position tokens (e.g. "ST CF").
pub const PREFERRED_POSITIONS: &str = "Preferred Positions";

/// Columns that must be present in the source file. Missing any of these
/// aborts startup; missing skill columns are tolerated and skipped instead.
pub const REQUIRED_COLUMNS: &[&str] = &[
    NAME,
    NATIONALITY,
    CLUB,
    AGE,
    OVERALL,
    POTENTIAL,
    PREFERRED_POSITIONS,
];

/// The selectable skill metrics offered by the dashboard.
pub const SKILL_COLUMNS: &[&str] = &["Ball control", "Dribbling", "Finishing"];

/// Fixed numeric set for the pairwise correlation matrix. Columns absent
/// from the loaded file are silently excluded.
pub const CORRELATION_COLUMNS: &[&str] = &[
    AGE,
    OVERALL,
    POTENTIAL,
    "Ball control",
    "Dribbling",
    "Finishing",
    "Acceleration",
    "Sprint speed",
    "Stamina",
    "Strength",
];

/// Attribute axes for the head-to-head radar comparison.
pub const RADAR_ATTRIBUTES: &[&str] = &[
    "Ball control",
    "Dribbling",
    "Finishing",
    "Acceleration",
    "Sprint speed",
    "Stamina",
];

/// Options for reading the source file.
#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub delimiter: Option<u8>,
    pub has_header: Option<bool>,
    pub infer_schema_length: Option<usize>,
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    pub fn with_has_header(mut self, has_header: bool) -> Self {
        self.has_header = Some(has_header);
        self
    }

    pub fn with_infer_schema_length(mut self, rows: usize) -> Self {
        self.infer_schema_length = Some(rows);
        self
    }
}

/// The immutable in-memory player table, shared read-only for the process
/// lifetime. Cloning is cheap; the frame itself is behind an [`Arc`].
#[derive(Clone, Debug)]
pub struct Dataset {
    frame: Arc<DataFrame>,
}

impl Dataset {
    /// Load the player table from a delimited file with a header row.
    ///
    /// Fails if the file cannot be read or if any required column is
    /// missing. This is the only fatal condition in the system.
    pub fn load(path: &Path, options: &LoadOptions) -> Result<Self> {
        let pl_path = PlPath::Local(Arc::from(path));
        let mut reader = LazyCsvReader::new(pl_path);
        if let Some(delimiter) = options.delimiter {
            reader = reader.with_separator(delimiter);
        }
        if let Some(has_header) = options.has_header {
            reader = reader.with_has_header(has_header);
        }
        if let Some(rows) = options.infer_schema_length {
            reader = reader.with_infer_schema_length(Some(rows));
        }
        let frame = reader.finish()?.collect()?;
        log::info!(
            "loaded {} rows x {} columns from {}",
            frame.height(),
            frame.width(),
            path.display()
        );
        Self::from_frame(frame)
    }

    /// Wrap an already-built frame, validating required columns.
    pub fn from_frame(frame: DataFrame) -> Result<Self> {
        for name in REQUIRED_COLUMNS {
            if frame.column(name).is_err() {
                return Err(eyre!("required column '{}' not found in dataset", name));
            }
        }
        Ok(Self {
            frame: Arc::new(frame),
        })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// Rows whose Nationality equals `nationality` exactly. An unmatched
    /// value yields an empty frame, not an error.
    pub fn filter_by_nationality(&self, nationality: &str) -> Result<DataFrame> {
        let df = self
            .frame
            .as_ref()
            .clone()
            .lazy()
            .filter(col(NATIONALITY).eq(lit(nationality)))
            .collect()?;
        Ok(df)
    }

    /// Distinct Nationality values in ascending case-sensitive lexical
    /// order, used to populate the selection dropdown.
    pub fn distinct_nationalities(&self) -> Result<Vec<String>> {
        let column = self.frame.column(NATIONALITY)?;
        let values = column.str()?;
        let mut out: Vec<String> = Vec::new();
        for value in values.into_iter().flatten() {
            out.push(value.to_string());
        }
        out.sort();
        out.dedup();
        Ok(out)
    }
}

/// Reinterpret the named columns as Float64, producing a new frame.
/// Unparseable values become null; columns absent from the frame are
/// skipped. The input frame is left untouched.
pub fn coerce_numeric(frame: &DataFrame, columns: &[&str]) -> Result<DataFrame> {
    let mut out = Vec::with_capacity(frame.width());
    for column in frame.get_columns() {
        if columns.contains(&column.name().as_str()) {
            out.push(column.cast(&DataType::Float64)?);
        } else {
            out.push(column.clone());
        }
    }
    Ok(DataFrame::new(out)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn sample_frame() -> DataFrame {
        df!(
            NAME => &["Neymar", "Coutinho", "Casemiro", "Kane"],
            NATIONALITY => &["Brazil", "Brazil", "Brazil", "England"],
            CLUB => &["PSG", "Liverpool", "Real Madrid", "Spurs"],
            AGE => &[25i64, 25, 25, 23],
            OVERALL => &[92i64, 86, 85, 86],
            POTENTIAL => &[94i64, 89, 88, 90],
            PREFERRED_POSITIONS => &["LW", "CM CAM", "CDM", "ST"],
            "Dribbling" => &["96", "90", "62+2", "75"],
        )
        .unwrap()
    }

    #[test]
    fn from_frame_rejects_missing_required_column() {
        let frame = df!(NAME => &["A"], NATIONALITY => &["B"]).unwrap();
        assert!(Dataset::from_frame(frame).is_err());
    }

    #[test]
    fn filter_by_nationality_exact_match() {
        let ds = Dataset::from_frame(sample_frame()).unwrap();
        let brazil = ds.filter_by_nationality("Brazil").unwrap();
        assert_eq!(brazil.height(), 3);
        let none = ds.filter_by_nationality("brazil").unwrap();
        assert_eq!(none.height(), 0);
    }

    #[test]
    fn filter_partitions_table() {
        let ds = Dataset::from_frame(sample_frame()).unwrap();
        let total: usize = ds
            .distinct_nationalities()
            .unwrap()
            .iter()
            .map(|n| ds.filter_by_nationality(n).unwrap().height())
            .sum();
        assert_eq!(total, ds.height());
    }

    #[test]
    fn distinct_nationalities_sorted() {
        let ds = Dataset::from_frame(sample_frame()).unwrap();
        assert_eq!(
            ds.distinct_nationalities().unwrap(),
            vec!["Brazil".to_string(), "England".to_string()]
        );
    }

    #[test]
    fn coerce_numeric_turns_junk_into_null() {
        let frame = sample_frame();
        let coerced = coerce_numeric(&frame, &["Dribbling"]).unwrap();
        let values = coerced.column("Dribbling").unwrap().f64().unwrap();
        assert_eq!(values.get(0), Some(96.0));
        assert_eq!(values.get(2), None); // "62+2" is not a number
        // source frame is untouched
        assert_eq!(frame.column("Dribbling").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn coerce_numeric_skips_absent_columns() {
        let frame = sample_frame();
        let coerced = coerce_numeric(&frame, &["No Such Column", AGE]).unwrap();
        assert_eq!(coerced.width(), frame.width());
        assert_eq!(coerced.column(AGE).unwrap().dtype(), &DataType::Float64);
    }
}
