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

use crate::dataset::Column;
use thiserror::Error;
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Catalog configuration error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("Data error: {0}")]
    Data(#[from] DataError),
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),
    #[error("Router configuration error: {0}")]
    Router(#[from] RouterError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialisation error: {0}")]
    Serialisation(#[from] serde_json::Error),
}
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to parse catalog YAML: {source}")]
    YamlParseError {
        #[from]
        source: serde_yaml::Error,
    },
    #[error("Failed to read catalog file '{path}': {source}")]
    CatalogFileError {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Duplicate category entry: '{key}'")]
    DuplicateCategory { key: String },
    #[error("Category '{key}' has no synonyms")]
    EmptySynonyms { key: String },
    #[error("Catalog is empty")]
    EmptyCatalog,
}
#[derive(Error, Debug)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to read data file '{path}': {source}")]
    DataFileError {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Dataset has no header row")]
    MissingHeaders,
    #[error("Empty dataset provided")]
    EmptyDataset,
}
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Column '{}' not present in dataset", .column.display_name())]
    ColumnUnavailable { column: Column },
    #[error("No usable values for {what}")]
    NoData { what: String },
}
#[derive(Error, Debug)]
pub enum RouterError {
    #[error("Invalid router configuration: {0}")]
    InvalidConfig(String),
}
pub type Result<T> = std::result::Result<T, DashboardError>;
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;
pub type DataResult<T> = std::result::Result<T, DataError>;
pub type AnalysisResult<T> = std::result::Result<T, AnalysisError>;
impl AnalysisError {
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::ColumnUnavailable { column } => {
                format!(
                    "{} data not available in the dataset",
                    column.display_name()
                )
            }
            AnalysisError::NoData { what } => format!("No {what} data available"),
        }
    }
}
impl DashboardError {
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DashboardError::Analysis(_) | DashboardError::Router(_)
        )
    }
    pub fn category(&self) -> &'static str {
        match self {
            DashboardError::Catalog(_) => "Catalog",
            DashboardError::Data(_) => "Data",
            DashboardError::Analysis(_) => "Analysis",
            DashboardError::Router(_) => "Router",
            DashboardError::Io(_) => "I/O",
            DashboardError::Serialisation(_) => "Serialisation",
        }
    }
    pub fn user_message(&self) -> String {
        match self {
            DashboardError::Analysis(e) => e.user_message(),
            DashboardError::Data(DataError::EmptyDataset) => {
                "The dataset appears to be empty. Please provide data with at least one row."
                    .to_string()
            }
            DashboardError::Catalog(_) => {
                "Unable to load the analysis catalog. Please check the configuration file."
                    .to_string()
            }
            _ => self.to_string(),
        }
    }
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}
impl ErrorSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorSeverity::Info => "INFO",
            ErrorSeverity::Warning => "WARNING",
            ErrorSeverity::Error => "ERROR",
            ErrorSeverity::Critical => "CRITICAL",
        }
    }
}
pub fn error_severity(error: &DashboardError) -> ErrorSeverity {
    match error {
        DashboardError::Analysis(_) => ErrorSeverity::Warning,
        DashboardError::Router(_) => ErrorSeverity::Error,
        DashboardError::Catalog(CatalogError::EmptyCatalog) => ErrorSeverity::Critical,
        DashboardError::Catalog(_) => ErrorSeverity::Error,
        DashboardError::Data(_) => ErrorSeverity::Error,
        DashboardError::Io(_) => ErrorSeverity::Error,
        DashboardError::Serialisation(_) => ErrorSeverity::Error,
    }
}
pub struct ErrorReporter {
    pub show_hints: bool,
    pub colored_output: bool,
}
impl ErrorReporter {
    pub fn new() -> Self {
        Self {
            show_hints: true,
            colored_output: false,
        }
    }
    pub fn report(&self, error: &DashboardError) -> String {
        let severity = error_severity(error);
        let mut output = String::new();
        output.push_str(&format!("[{}] {}\n", severity.as_str(), error));
        if self.show_hints {
            let hints = self.hints(error);
            if !hints.is_empty() {
                output.push_str("\nHints:\n");
                for hint in hints {
                    output.push_str(&format!("  - {hint}\n"));
                }
            }
        }
        output
    }
    fn hints(&self, error: &DashboardError) -> Vec<String> {
        match error {
            DashboardError::Data(DataError::EmptyDataset) => vec![
                "Check that the CSV file has rows below the header".to_string(),
            ],
            DashboardError::Data(DataError::DataFileError { .. }) => vec![
                "Verify the file path and that the file is readable".to_string(),
                "The file must be comma-delimited with a header row".to_string(),
            ],
            DashboardError::Analysis(AnalysisError::ColumnUnavailable { column }) => vec![format!(
                "Add a '{}' column to the input file to enable this view",
                column.header_aliases()[0]
            )],
            _ => Vec::new(),
        }
    }
}
impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}
