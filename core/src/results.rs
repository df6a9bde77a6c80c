//! Loading exported experiment results and reducing them to the final state
//! of every fold.
//!
//! The export is delimited text whose first row is the header and whose
//! first column is the row index written by the exporter. Rows of one fold
//! appear in the order the engine recorded them, so the last row of a
//! (learner id, fold id) group is that fold's final labelling cost and
//! accuracy.

use std::{
    cmp::Ordering,
    collections::BTreeMap,
    fmt,
    fs::File,
    io::Read,
    path::Path,
};

use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::MalformedTableError;

/// Header names of the columns the tradeoff needs.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ColumnNames {
    pub learner: String,
    pub fold: String,
    pub acquisitions: String,
    pub accuracy: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            learner: "learner id".to_string(),
            fold: "fold id".to_string(),
            acquisitions: "Rel Number of Label Acquisitions".to_string(),
            accuracy: "classifications correct (percent)".to_string(),
        }
    }
}

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                natural_cmp(&self.0, &other.0)
            }
        }

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_type!(
    /// Identifier of one learner configuration in the export.
    LearnerId
);
id_type!(
    /// Identifier of one repetition of an experiment.
    FoldId
);

/// Numeric ids order by value, then any other text lexically.
fn natural_cmp(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<i64>(), b.trim().parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeriesKey {
    pub learner: LearnerId,
    pub fold: FoldId,
}

/// Final recorded state of one fold.
#[derive(Clone, Debug, PartialEq)]
pub struct FoldSeries {
    pub learner: LearnerId,
    pub fold: FoldId,
    /// Relative number of label acquisitions.
    pub acquisitions: f64,
    /// Accuracy in percent.
    pub accuracy: f64,
    /// Zero-based position of the source record in the export.
    pub row: usize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TradeoffPoint {
    pub x: f64,
    pub y: f64,
}

/// Rows of an exported result table, kept in file order.
#[derive(Clone, Debug)]
pub struct ResultTable {
    headers: StringRecord,
    records: Vec<StringRecord>,
}

impl ResultTable {
    pub fn load(path: &Path, delimiter: u8) -> Result<Self, MalformedTableError> {
        let file = File::open(path).map_err(|source| MalformedTableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_reader(file, delimiter)?;
        debug!(
            path = %path.display(),
            rows = table.len(),
            columns = table.headers.len(),
            "loaded result table"
        );
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Self, MalformedTableError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        if headers.is_empty() {
            return Err(MalformedTableError::EmptyHeader);
        }

        let records = reader.records().collect::<Result<Vec<_>, _>>()?;
        Ok(Self { headers, records })
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.headers.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Row index label written by the exporter (the first column).
    pub fn row_index(&self, row: usize) -> Option<&str> {
        self.records.get(row).and_then(|record| record.get(0))
    }

    /// Raw cell text by column name.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let position = self.column_position(column)?;
        self.records.get(row).and_then(|record| record.get(position))
    }

    fn column_position(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|header| header.trim() == column)
    }

    fn require_column(&self, column: &str) -> Result<usize, MalformedTableError> {
        self.column_position(column)
            .ok_or_else(|| MalformedTableError::MissingColumn {
                column: column.to_string(),
            })
    }
}

struct ColumnPositions {
    learner: usize,
    fold: usize,
    acquisitions: usize,
    accuracy: usize,
}

/// Reduce every (learner id, fold id) group to its last row in file order.
pub fn aggregate(
    table: &ResultTable,
    columns: &ColumnNames,
) -> Result<BTreeMap<SeriesKey, FoldSeries>, MalformedTableError> {
    let positions = ColumnPositions {
        learner: table.require_column(&columns.learner)?,
        fold: table.require_column(&columns.fold)?,
        acquisitions: table.require_column(&columns.acquisitions)?,
        accuracy: table.require_column(&columns.accuracy)?,
    };

    let mut last_rows: BTreeMap<SeriesKey, usize> = BTreeMap::new();
    for (row, record) in table.records.iter().enumerate() {
        let key = SeriesKey {
            learner: LearnerId::new(field(record, positions.learner).trim()),
            fold: FoldId::new(field(record, positions.fold).trim()),
        };
        last_rows.insert(key, row);
    }

    let mut series = BTreeMap::new();
    for (key, row) in last_rows {
        let record = &table.records[row];
        let acquisitions = number(record, row, positions.acquisitions, &columns.acquisitions)?;
        let accuracy = number(record, row, positions.accuracy, &columns.accuracy)?;
        series.insert(
            key.clone(),
            FoldSeries {
                learner: key.learner,
                fold: key.fold,
                acquisitions,
                accuracy,
                row,
            },
        );
    }

    debug!(groups = series.len(), rows = table.len(), "aggregated result table");
    Ok(series)
}

/// Project final fold states to tradeoff points, one cluster per learner.
pub fn clusters(series: &BTreeMap<SeriesKey, FoldSeries>) -> BTreeMap<LearnerId, Vec<TradeoffPoint>> {
    let mut clusters: BTreeMap<LearnerId, Vec<TradeoffPoint>> = BTreeMap::new();
    for fold in series.values() {
        clusters
            .entry(fold.learner.clone())
            .or_default()
            .push(TradeoffPoint {
                x: fold.acquisitions,
                y: fold.accuracy,
            });
    }
    clusters
}

fn field(record: &StringRecord, position: usize) -> &str {
    record.get(position).unwrap_or_default()
}

fn number(
    record: &StringRecord,
    row: usize,
    position: usize,
    column: &str,
) -> Result<f64, MalformedTableError> {
    let value = field(record, position).trim();
    match value.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(number),
        _ => Err(MalformedTableError::InvalidNumber {
            column: column.to_string(),
            row,
            value: value.to_string(),
        }),
    }
}
