//! Table boundary
//!
//! Input is an ordered table of JSON-object records with at least a `review`
//! field; every other field is carried through untouched. Output is the same
//! records (minus rows whose review was null) with `sentiment_score` added.

use crate::error::{BatchError, ScoringResult};
use crate::types::{BatchResult, Review, RowFailure};
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

/// Field holding the review text
pub const REVIEW_FIELD: &str = "review";

/// Field added to every scored record
pub const SCORE_FIELD: &str = "sentiment_score";

/// One table row
pub type Record = Map<String, Value>;

/// Ordered input table
#[derive(Debug, Clone, Default)]
pub struct ReviewTable {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl ReviewTable {
    /// Table with an explicit column list (e.g. a file header)
    pub fn new(columns: Vec<String>, records: Vec<Record>) -> Self {
        Self { columns, records }
    }

    /// Table whose columns are every key seen, in first-seen order
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for record in &records {
            for key in record.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }
        Self { columns, records }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Validate the table and split it into retained records plus reviews
    ///
    /// Rows whose review is null or absent are dropped; survivors are
    /// renumbered 0..k-1 and `records[i]` belongs to the review with
    /// `row_index == i`. Non-string reviews are scored on their JSON text.
    pub fn into_reviews(self) -> ScoringResult<(TableRows, Vec<Review>)> {
        if !self.has_field(REVIEW_FIELD) {
            return Err(BatchError::MissingField(REVIEW_FIELD.to_string()));
        }

        let total = self.records.len();
        let mut records = Vec::with_capacity(total);
        let mut reviews = Vec::with_capacity(total);

        for record in self.records {
            let text = match record.get(REVIEW_FIELD) {
                None | Some(Value::Null) => continue,
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
            };
            reviews.push(Review::new(reviews.len(), text));
            records.push(record);
        }

        debug!(
            retained = records.len(),
            dropped = total - records.len(),
            "Null reviews filtered"
        );
        Ok((
            TableRows {
                columns: self.columns,
                records,
            },
            reviews,
        ))
    }
}

/// Records retained after null filtering, awaiting their scores
#[derive(Debug, Clone)]
pub struct TableRows {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl TableRows {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Output table: retained records with `sentiment_score`, in original order
#[derive(Debug, Clone)]
pub struct ScoredTable {
    pub batch_id: Uuid,
    pub columns: Vec<String>,
    pub records: Vec<Record>,
    /// Rows that received the fallback score
    pub failures: Vec<RowFailure>,
}

impl ScoredTable {
    /// Attach each score to the record with the same row index
    pub fn assemble(rows: TableRows, result: BatchResult) -> ScoringResult<Self> {
        if rows.records.len() != result.rows.len() {
            return Err(BatchError::Common(sentiscore_common::Error::Internal(format!(
                "{} records but {} scores",
                rows.records.len(),
                result.rows.len()
            ))));
        }

        let mut columns = rows.columns;
        if !columns.iter().any(|c| c == SCORE_FIELD) {
            columns.push(SCORE_FIELD.to_string());
        }

        let records = rows
            .records
            .into_iter()
            .zip(result.rows)
            .map(|(mut record, scored)| {
                record.insert(SCORE_FIELD.to_string(), Value::from(scored.sentiment_score));
                record
            })
            .collect();

        Ok(Self {
            batch_id: result.batch_id,
            columns,
            records,
            failures: result.failures,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Score of every record, in order
    pub fn scores(&self) -> Vec<f64> {
        self.records
            .iter()
            .filter_map(|r| r.get(SCORE_FIELD).and_then(Value::as_f64))
            .collect()
    }
}
