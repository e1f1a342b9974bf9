// Copyright 2025 Sushanth (https://github.com/sushanthpy)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Tabular intake
//!
//! Reads the interaction table (one record per row) into [`EdgeRecord`]s.
//! The header is validated against the required column set before any row
//! is read, so a schema failure aborts the run before analysis starts.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{AgoraError, AgoraResult};
use crate::record::{EdgeRecord, DEFAULT_WEIGHT};

/// Columns every input table must carry
pub const REQUIRED_COLUMNS: [&str; 3] = ["source", "target", "conversation"];

/// Optional weight column
pub const WEIGHT_COLUMN: &str = "weight";

/// Check a header row against [`REQUIRED_COLUMNS`]. Names must match exactly.
pub fn validate_columns<'a, I>(headers: I) -> AgoraResult<()>
where
    I: IntoIterator<Item = &'a str>,
{
    let present: HashSet<&str> = headers.into_iter().collect();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !present.contains(column))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AgoraError::schema(missing))
    }
}

/// Column positions resolved from the header row
struct ColumnIndex {
    source: usize,
    target: usize,
    conversation: usize,
    weight: Option<usize>,
}

impl ColumnIndex {
    fn resolve(headers: &csv::StringRecord) -> AgoraResult<Self> {
        validate_columns(headers.iter())?;

        let position = |name: &str| headers.iter().position(|h| h == name);
        match (
            position("source"),
            position("target"),
            position("conversation"),
        ) {
            (Some(source), Some(target), Some(conversation)) => Ok(Self {
                source,
                target,
                conversation,
                weight: position(WEIGHT_COLUMN),
            }),
            _ => Err(AgoraError::schema(REQUIRED_COLUMNS)),
        }
    }
}

/// Read records from any CSV source, in row order
pub fn read_records<R: Read>(reader: R) -> AgoraResult<Vec<EdgeRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let columns = ColumnIndex::resolve(&headers)?;

    let mut records = Vec::new();
    let mut defaulted_weights = 0usize;

    for result in rdr.records() {
        let row = result?;
        let cell = |i: usize| row.get(i).unwrap_or("");
        let line = row.position().map_or(0, |p| p.line());

        let source = required_cell(&row, columns.source, "source", line)?;
        let target = required_cell(&row, columns.target, "target", line)?;
        let conversation = row.get(columns.conversation).ok_or_else(|| {
            AgoraError::Csv(format!("line {}: missing 'conversation' value", line))
        })?;

        let weight = match columns.weight.map(cell) {
            Some(raw) => match parse_weight(raw) {
                Some(w) => w,
                None => {
                    defaulted_weights += 1;
                    DEFAULT_WEIGHT
                }
            },
            None => DEFAULT_WEIGHT,
        };

        records.push(EdgeRecord {
            source: source.to_string(),
            target: target.to_string(),
            conversation: conversation.to_string(),
            weight,
        });
    }

    if defaulted_weights > 0 {
        tracing::warn!(
            rows = defaulted_weights,
            "Non-numeric weights replaced with default {}",
            DEFAULT_WEIGHT
        );
    }
    if records.is_empty() {
        tracing::warn!("Input table has no records");
    }
    let self_loops = records.iter().filter(|r| r.is_self_loop()).count();
    if self_loops > 0 {
        tracing::debug!(rows = self_loops, "Self-referencing records kept as self-loops");
    }

    Ok(records)
}

/// Read records from a CSV file on disk
pub fn read_records_from_path<P: AsRef<Path>>(path: P) -> AgoraResult<Vec<EdgeRecord>> {
    let file = File::open(path.as_ref())?;
    read_records(file)
}

/// Trimmed node id; a short row or blank id is rejected
fn required_cell<'r>(
    row: &'r csv::StringRecord,
    index: usize,
    column: &str,
    line: u64,
) -> AgoraResult<&'r str> {
    match row.get(index).map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(AgoraError::Csv(format!(
            "line {}: missing '{}' value",
            line, column
        ))),
    }
}

fn parse_weight(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|w| w.is_finite())
}
