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

//! Column summaries and the numeric primitives the analyses share.

use crate::dataset::{Column, Dataset};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub q25: Option<f64>,
    pub q75: Option<f64>,
    pub outlier_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub column: Column,
    pub present: bool,
    pub non_missing: usize,
    pub missing: usize,
    pub numeric: Option<NumericSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub name: String,
    pub row_count: usize,
    pub columns: Vec<ColumnSummary>,
}

/// Linear-interpolation quantile over an already-sorted slice.
pub fn quantile_linear(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    if sorted.len() == 1 {
        return Some(sorted[0]);
    }
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Five-number-summary style stats with IQR outlier counting.
pub fn numeric_summary(values: &[f64]) -> NumericSummary {
    let count = values.len();
    if count == 0 {
        return NumericSummary {
            count: 0,
            mean: None,
            median: None,
            std: None,
            min: None,
            max: None,
            q25: None,
            q75: None,
            outlier_count: 0,
        };
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mean = sorted.iter().sum::<f64>() / count as f64;
    let std = if count > 1 {
        let variance =
            sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
        Some(variance.sqrt())
    } else {
        None
    };
    let q25 = quantile_linear(&sorted, 0.25);
    let q75 = quantile_linear(&sorted, 0.75);
    let outlier_count = if let (Some(q25), Some(q75)) = (q25, q75) {
        let iqr = q75 - q25;
        if iqr > 0.0 {
            let lower = q25 - 1.5 * iqr;
            let upper = q75 + 1.5 * iqr;
            sorted.iter().filter(|&&v| v < lower || v > upper).count()
        } else {
            0
        }
    } else {
        0
    };
    NumericSummary {
        count,
        mean: Some(mean),
        median: quantile_linear(&sorted, 0.5),
        std,
        min: sorted.first().copied(),
        max: sorted.last().copied(),
        q25,
        q75,
        outlier_count,
    }
}

/// Pearson correlation over paired observations. Returns NaN when fewer
/// than two pairs exist or either side has zero variance; callers render
/// NaN cells rather than failing.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return f64::NAN;
    }
    let mean_x = x[..n].iter().sum::<f64>() / n as f64;
    let mean_y = y[..n].iter().sum::<f64>() / n as f64;
    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for i in 0..n {
        let dx = x[i] - mean_x;
        let dy = y[i] - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    covariance / (var_x.sqrt() * var_y.sqrt())
}

/// Equal-width histogram bins: `bins + 1` edges and `bins` counts.
/// Values equal to the upper edge fall into the last bin. Returns None
/// for empty input or a degenerate (single-valued) range.
pub fn histogram_bins(values: &[f64], bins: usize) -> Option<(Vec<f64>, Vec<usize>)> {
    if values.is_empty() || bins == 0 {
        return None;
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return None;
    }
    if max == min {
        // All values identical: a single bin of nominal unit width.
        return Some((vec![min, min + 1.0], vec![values.len()]));
    }
    let width = (max - min) / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|i| min + width * i as f64).collect();
    let mut counts = vec![0usize; bins];
    for &value in values {
        let idx = (((value - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    Some((edges, counts))
}

fn column_values(dataset: &Dataset, column: Column) -> (usize, Option<Vec<f64>>) {
    let records = dataset.records();
    match column {
        Column::Rating => {
            let values: Vec<f64> = dataset.ratings().collect();
            (values.len(), Some(values))
        }
        Column::Votes => {
            let values: Vec<f64> = dataset.votes().map(|v| v as f64).collect();
            (values.len(), Some(values))
        }
        Column::Cost => {
            let values: Vec<f64> = dataset.costs().collect();
            (values.len(), Some(values))
        }
        Column::Name => (
            records.iter().filter(|r| !r.name.is_empty()).count(),
            None,
        ),
        Column::OnlineOrder => (
            records.iter().filter(|r| r.online_order.is_some()).count(),
            None,
        ),
        Column::BookTable => (
            records.iter().filter(|r| r.book_table.is_some()).count(),
            None,
        ),
        Column::Location => (
            records.iter().filter(|r| r.location.is_some()).count(),
            None,
        ),
        Column::Cuisines => (
            records.iter().filter(|r| r.cuisines.is_some()).count(),
            None,
        ),
        Column::ListedIn => (
            records.iter().filter(|r| r.listed_in.is_some()).count(),
            None,
        ),
    }
}

/// Summarise every known column. Columns are profiled in parallel; the
/// dataset itself is only read.
pub fn summarize(dataset: &Dataset) -> DatasetSummary {
    let columns = Column::all()
        .into_par_iter()
        .map(|column| {
            let present = dataset.has_column(column);
            let (non_missing, values) = if present {
                column_values(dataset, column)
            } else {
                (0, None)
            };
            ColumnSummary {
                column,
                present,
                non_missing,
                missing: dataset.len().saturating_sub(non_missing),
                numeric: values
                    .filter(|v| !v.is_empty())
                    .map(|v| numeric_summary(&v)),
            }
        })
        .collect();
    DatasetSummary {
        name: dataset.metadata().name.clone(),
        row_count: dataset.len(),
        columns,
    }
}

impl DatasetSummary {
    pub fn export_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
    pub fn report(&self) -> String {
        let mut report = String::new();
        report.push_str(&format!(
            "Dataset '{}': {} rows\n",
            self.name, self.row_count
        ));
        for summary in &self.columns {
            if !summary.present {
                report.push_str(&format!(
                    "  - {}: not present\n",
                    summary.column.display_name()
                ));
                continue;
            }
            report.push_str(&format!(
                "  - {}: {} values, {} missing",
                summary.column.display_name(),
                summary.non_missing,
                summary.missing
            ));
            if let Some(stats) = &summary.numeric {
                if let (Some(mean), Some(min), Some(max)) = (stats.mean, stats.min, stats.max) {
                    report.push_str(&format!(
                        " (mean {mean:.2}, range {min:.2}..{max:.2})"
                    ));
                }
            }
            report.push('\n');
        }
        report
    }
}
