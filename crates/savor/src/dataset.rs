// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

//! The immutable in-memory restaurant table.
//!
//! Loaded once at startup, read-only afterwards. Numeric fields are
//! normalised at load time: ratings shed a trailing "/5"-style suffix,
//! costs shed thousands separators, and anything unparsable coerces to
//! missing rather than dropping the row.

use crate::error::{DataError, DataResult};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Columns the dashboards know about. Unknown CSV columns are ignored;
/// any of these may be absent, in which case the analyses that need
/// them degrade to a "data not available" outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Name,
    OnlineOrder,
    BookTable,
    Rating,
    Votes,
    Location,
    Cuisines,
    Cost,
    ListedIn,
}
impl Column {
    pub fn all() -> [Column; 9] {
        [
            Column::Name,
            Column::OnlineOrder,
            Column::BookTable,
            Column::Rating,
            Column::Votes,
            Column::Location,
            Column::Cuisines,
            Column::Cost,
            Column::ListedIn,
        ]
    }
    /// Header spellings accepted for this column, lowercased. The first
    /// alias is the canonical header of the source dataset.
    pub fn header_aliases(&self) -> &'static [&'static str] {
        match self {
            Column::Name => &["name", "restaurant_name"],
            Column::OnlineOrder => &["online_order"],
            Column::BookTable => &["book_table"],
            Column::Rating => &["rate", "rating"],
            Column::Votes => &["votes"],
            Column::Location => &["location"],
            Column::Cuisines => &["cuisines"],
            Column::Cost => &["approx_cost(for two people)", "approx_cost", "cost"],
            Column::ListedIn => &["listed_in(type)", "rest_type", "type"],
        }
    }
    pub fn display_name(&self) -> &'static str {
        match self {
            Column::Name => "Name",
            Column::OnlineOrder => "Online order",
            Column::BookTable => "Table booking",
            Column::Rating => "Rating",
            Column::Votes => "Votes",
            Column::Location => "Location",
            Column::Cuisines => "Cuisine",
            Column::Cost => "Cost",
            Column::ListedIn => "Restaurant type",
        }
    }
    fn from_header(header: &str) -> Option<Column> {
        let normalised = header.trim().to_lowercase();
        Column::all()
            .into_iter()
            .find(|column| column.header_aliases().contains(&normalised.as_str()))
    }
}

/// One restaurant row. Text fields keep the source spelling; numeric
/// fields are `None` where the source was blank or unparsable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub name: String,
    pub online_order: Option<String>,
    pub book_table: Option<String>,
    pub rating: Option<f64>,
    pub votes: Option<u64>,
    pub location: Option<String>,
    pub cuisines: Option<String>,
    pub cost_for_two: Option<f64>,
    pub listed_in: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetId(String);
impl DatasetId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}
impl Default for DatasetId {
    fn default() -> Self {
        Self::new()
    }
}
impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub id: DatasetId,
    pub name: String,
    pub row_count: usize,
    pub column_count: usize,
    pub loaded_at: DateTime<Utc>,
    pub source_path: Option<PathBuf>,
}

/// The dataset: every record in original file order, plus which of the
/// known columns the file actually carried.
#[derive(Debug)]
pub struct Dataset {
    metadata: DatasetMetadata,
    records: Vec<Restaurant>,
    columns: HashSet<Column>,
}

// Accepts "4.1/5", "4.1 / 5", "4.1" etc.; the capture is the numerator.
static RATING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d+(?:\.\d+)?)\s*(?:/\s*\d+(?:\.\d+)?)?\s*$").unwrap());

fn parse_rating(raw: &str) -> Option<f64> {
    RATING_RE
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

fn parse_votes(raw: &str) -> Option<u64> {
    raw.trim().replace(',', "").parse::<u64>().ok()
}

fn parse_cost(raw: &str) -> Option<f64> {
    raw.trim().replace(',', "").parse::<f64>().ok()
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl Dataset {
    pub fn from_csv_file<P: AsRef<Path>>(path: P) -> DataResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DataError::DataFileError {
            path: path.display().to_string(),
            source,
        })?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "dataset".to_string());
        Self::from_csv_reader(file, name, Some(path.to_path_buf()))
    }

    pub fn from_csv_reader<R: Read>(
        reader: R,
        name: String,
        source_path: Option<PathBuf>,
    ) -> DataResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        if headers.is_empty() {
            return Err(DataError::MissingHeaders);
        }
        // header position -> known column, unknown headers ignored
        let mapping: Vec<Option<Column>> =
            headers.iter().map(Column::from_header).collect();
        let columns: HashSet<Column> = mapping.iter().flatten().copied().collect();

        let mut records = Vec::new();
        for row in csv_reader.records() {
            let row = row?;
            let field = |column: Column| -> Option<&str> {
                mapping
                    .iter()
                    .position(|mapped| *mapped == Some(column))
                    .and_then(|idx| row.get(idx))
            };
            records.push(Restaurant {
                name: field(Column::Name)
                    .map(|raw| raw.trim().to_string())
                    .unwrap_or_default(),
                online_order: field(Column::OnlineOrder).and_then(non_empty),
                book_table: field(Column::BookTable).and_then(non_empty),
                rating: field(Column::Rating).and_then(parse_rating),
                votes: field(Column::Votes).and_then(parse_votes),
                location: field(Column::Location).and_then(non_empty),
                cuisines: field(Column::Cuisines).and_then(non_empty),
                cost_for_two: field(Column::Cost).and_then(parse_cost),
                listed_in: field(Column::ListedIn).and_then(non_empty),
            });
        }
        if records.is_empty() {
            return Err(DataError::EmptyDataset);
        }
        log::info!(
            "loaded dataset '{}': {} rows, {} recognised columns",
            name,
            records.len(),
            columns.len()
        );
        let metadata = DatasetMetadata {
            id: DatasetId::new(),
            name,
            row_count: records.len(),
            column_count: columns.len(),
            loaded_at: Utc::now(),
            source_path,
        };
        Ok(Self {
            metadata,
            records,
            columns,
        })
    }

    pub fn metadata(&self) -> &DatasetMetadata {
        &self.metadata
    }
    pub fn records(&self) -> &[Restaurant] {
        &self.records
    }
    pub fn len(&self) -> usize {
        self.records.len()
    }
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    /// Non-missing ratings in row order.
    pub fn ratings(&self) -> impl Iterator<Item = f64> + '_ {
        self.records.iter().filter_map(|r| r.rating)
    }
    /// Non-missing vote counts in row order.
    pub fn votes(&self) -> impl Iterator<Item = u64> + '_ {
        self.records.iter().filter_map(|r| r.votes)
    }
    /// Non-missing costs in row order.
    pub fn costs(&self) -> impl Iterator<Item = f64> + '_ {
        self.records.iter().filter_map(|r| r.cost_for_two)
    }
}
