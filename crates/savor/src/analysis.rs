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

//! The analysis catalog: one deterministic operation per category, plus
//! the sidebar-only variants. Every operation takes the read-only
//! dataset and produces fully-computed figure data (already sorted,
//! binned and counted) together with a fixed explanatory sentence, so
//! rendering stays a pure drawing concern.

use crate::catalog::Category;
use crate::dataset::{Column, Dataset, Restaurant};
use crate::error::{AnalysisError, AnalysisResult};
use crate::profile::{histogram_bins, numeric_summary, pearson, quantile_linear};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub mod limits {
    pub const TOP_RATED_LIMIT: usize = 10;
    /// Query-resolved votes chart shows this many restaurants...
    pub const VOTES_TOP_LIMIT: usize = 10;
    /// ...while the sidebar leaderboard shows this many. Both entry
    /// points exist on purpose; do not fold them together.
    pub const VOTES_PANEL_LIMIT: usize = 20;
    pub const RATING_HIST_BINS: usize = 20;
    pub const COST_HIST_BINS: usize = 30;
    pub const VOTES_HIST_BINS: usize = 30;
    pub const LOCATION_LIMIT: usize = 10;
    pub const CLOUD_WORD_LIMIT: usize = 50;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub title: String,
    pub figures: Vec<Figure>,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub kind: FigureKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FigureKind {
    Bar {
        labels: Vec<String>,
        values: Vec<f64>,
    },
    Histogram {
        /// `counts.len() + 1` ascending bin edges.
        edges: Vec<f64>,
        counts: Vec<usize>,
        /// Edges are log10 of the underlying values.
        log_x: bool,
    },
    Scatter {
        points: Vec<[f64; 2]>,
    },
    Pie {
        slices: Vec<PieSlice>,
    },
    Box {
        groups: Vec<BoxGroup>,
    },
    Heatmap {
        labels: Vec<String>,
        /// Row-major `labels.len()` x `labels.len()` matrix.
        values: Vec<Vec<f64>>,
    },
    WordCloud {
        words: Vec<WordWeight>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieSlice {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxGroup {
    pub label: String,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordWeight {
    pub word: String,
    pub count: usize,
}

/// Dispatch for router-resolved categories. 1:1 with [`Category`].
pub fn render(category: Category, dataset: &Dataset) -> AnalysisResult<Analysis> {
    match category {
        Category::TopRated => top_rated(dataset),
        Category::OnlineVsOffline => online_vs_offline(dataset),
        Category::Cost => cost_analysis(dataset),
        Category::RestaurantType => restaurant_types(dataset),
        Category::Rating => rating_analysis(dataset),
        Category::Votes => votes_analysis(dataset),
        Category::Location => location_analysis(dataset),
        Category::BookTable => book_table_analysis(dataset),
    }
}

fn require(dataset: &Dataset, column: Column) -> AnalysisResult<()> {
    if dataset.has_column(column) {
        Ok(())
    } else {
        Err(AnalysisError::ColumnUnavailable { column })
    }
}

/// Indices of records carrying `value`, sorted descending by it. The
/// sort is stable, so ties keep original row order.
fn ranked_desc<F>(records: &[Restaurant], value: F) -> Vec<(usize, f64)>
where
    F: Fn(&Restaurant) -> Option<f64>,
{
    let mut ranked: Vec<(usize, f64)> = records
        .iter()
        .enumerate()
        .filter_map(|(idx, record)| value(record).map(|v| (idx, v)))
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked
}

fn leaderboard_figure(
    dataset: &Dataset,
    ranked: Vec<(usize, f64)>,
    limit: usize,
    title: &str,
    y_label: &str,
) -> Figure {
    let records = dataset.records();
    let mut labels = Vec::new();
    let mut values = Vec::new();
    for (idx, value) in ranked.into_iter().take(limit) {
        labels.push(records[idx].name.clone());
        values.push(value);
    }
    Figure {
        title: title.to_string(),
        x_label: "Restaurant Name".to_string(),
        y_label: y_label.to_string(),
        kind: FigureKind::Bar { labels, values },
    }
}

/// Top 10 restaurants by rating, descending.
pub fn top_rated(dataset: &Dataset) -> AnalysisResult<Analysis> {
    require(dataset, Column::Name)?;
    require(dataset, Column::Rating)?;
    let ranked = ranked_desc(dataset.records(), |r| r.rating);
    if ranked.is_empty() {
        return Err(AnalysisError::NoData {
            what: "rating".to_string(),
        });
    }
    let figure = leaderboard_figure(
        dataset,
        ranked,
        limits::TOP_RATED_LIMIT,
        "Top 10 Rated Restaurants",
        "Rating",
    );
    Ok(Analysis {
        title: "Top Rated Restaurants".to_string(),
        figures: vec![figure],
        explanation: "This chart shows the top 10 highest-rated restaurants in the dataset."
            .to_string(),
    })
}

/// Sidebar leaderboard: top `limit` restaurants by votes.
pub fn votes_leaderboard(dataset: &Dataset, limit: usize) -> AnalysisResult<Analysis> {
    require(dataset, Column::Name)?;
    require(dataset, Column::Votes)?;
    let ranked = ranked_desc(dataset.records(), |r| r.votes.map(|v| v as f64));
    if ranked.is_empty() {
        return Err(AnalysisError::NoData {
            what: "votes".to_string(),
        });
    }
    let figure = leaderboard_figure(
        dataset,
        ranked,
        limit,
        &format!("Top {limit} Restaurants by Votes"),
        "Votes",
    );
    Ok(Analysis {
        title: "Votes Distribution".to_string(),
        figures: vec![figure],
        explanation: format!(
            "This chart shows the {limit} restaurants with the most votes."
        ),
    })
}

/// Query-resolved votes view: log-scale distribution plus top 10.
pub fn votes_analysis(dataset: &Dataset) -> AnalysisResult<Analysis> {
    require(dataset, Column::Name)?;
    require(dataset, Column::Votes)?;
    let positive: Vec<f64> = dataset
        .votes()
        .filter(|&v| v > 0)
        .map(|v| (v as f64).log10())
        .collect();
    let ranked = ranked_desc(dataset.records(), |r| r.votes.map(|v| v as f64));
    if ranked.is_empty() {
        return Err(AnalysisError::NoData {
            what: "votes".to_string(),
        });
    }
    let mut figures = Vec::new();
    if let Some((edges, counts)) = histogram_bins(&positive, limits::VOTES_HIST_BINS) {
        figures.push(Figure {
            title: "Distribution of Votes".to_string(),
            x_label: "Number of Votes (log10)".to_string(),
            y_label: "Frequency".to_string(),
            kind: FigureKind::Histogram {
                edges,
                counts,
                log_x: true,
            },
        });
    }
    figures.push(leaderboard_figure(
        dataset,
        ranked,
        limits::VOTES_TOP_LIMIT,
        "Top 10 Most Voted Restaurants",
        "Votes",
    ));
    Ok(Analysis {
        title: "Votes Analysis".to_string(),
        figures,
        explanation: "The left chart shows the distribution of votes (log scale). The right chart shows the top 10 restaurants with the most votes.".to_string(),
    })
}

/// Sidebar rating histogram.
pub fn rating_distribution(dataset: &Dataset) -> AnalysisResult<Analysis> {
    require(dataset, Column::Rating)?;
    let ratings: Vec<f64> = dataset.ratings().collect();
    let (edges, counts) =
        histogram_bins(&ratings, limits::RATING_HIST_BINS).ok_or(AnalysisError::NoData {
            what: "rating".to_string(),
        })?;
    Ok(Analysis {
        title: "Rating Distribution".to_string(),
        figures: vec![Figure {
            title: "Ratings Distribution".to_string(),
            x_label: "Rating".to_string(),
            y_label: "Frequency".to_string(),
            kind: FigureKind::Histogram {
                edges,
                counts,
                log_x: false,
            },
        }],
        explanation: "This chart shows how restaurant ratings are distributed.".to_string(),
    })
}

/// Query-resolved rating view: distribution plus top 10.
pub fn rating_analysis(dataset: &Dataset) -> AnalysisResult<Analysis> {
    let mut analysis = rating_distribution(dataset)?;
    if dataset.has_column(Column::Name) {
        let ranked = ranked_desc(dataset.records(), |r| r.rating);
        analysis.figures.push(leaderboard_figure(
            dataset,
            ranked,
            limits::TOP_RATED_LIMIT,
            "Top 10 Highest Rated Restaurants",
            "Rating",
        ));
    }
    analysis.title = "Rating Analysis".to_string();
    analysis.explanation = "The left chart shows the distribution of ratings. The right chart shows the top 10 highest rated restaurants.".to_string();
    Ok(analysis)
}

/// Sidebar cost histogram.
pub fn cost_distribution(dataset: &Dataset) -> AnalysisResult<Analysis> {
    require(dataset, Column::Cost)?;
    let costs: Vec<f64> = dataset.costs().collect();
    let (edges, counts) =
        histogram_bins(&costs, limits::COST_HIST_BINS).ok_or(AnalysisError::NoData {
            what: "cost".to_string(),
        })?;
    Ok(Analysis {
        title: "Average Cost for Two".to_string(),
        figures: vec![Figure {
            title: "Distribution of Approximate Cost for Two People".to_string(),
            x_label: "Cost".to_string(),
            y_label: "Frequency".to_string(),
            kind: FigureKind::Histogram {
                edges,
                counts,
                log_x: false,
            },
        }],
        explanation: "This chart shows how the approximate cost for two people is distributed."
            .to_string(),
    })
}

/// Query-resolved cost view: distribution plus cost against rating.
pub fn cost_analysis(dataset: &Dataset) -> AnalysisResult<Analysis> {
    let mut analysis = cost_distribution(dataset)?;
    let points: Vec<[f64; 2]> = dataset
        .records()
        .iter()
        .filter_map(|r| match (r.cost_for_two, r.rating) {
            (Some(cost), Some(rating)) => Some([cost, rating]),
            _ => None,
        })
        .collect();
    if !points.is_empty() {
        analysis.figures.push(Figure {
            title: "Cost vs Rating".to_string(),
            x_label: "Cost for Two People".to_string(),
            y_label: "Rating".to_string(),
            kind: FigureKind::Scatter { points },
        });
    }
    analysis.title = "Cost Analysis".to_string();
    analysis.explanation = "The left chart shows the distribution of costs for two people. The right chart shows the relationship between cost and rating.".to_string();
    Ok(analysis)
}

fn counted_slices<'a, I: Iterator<Item = &'a str>>(values: I) -> Vec<PieSlice> {
    values
        .counts()
        .into_iter()
        .map(|(label, count)| PieSlice {
            label: label.to_string(),
            count,
        })
        .sorted_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)))
        .collect()
}

/// Pie of listed restaurant types.
pub fn restaurant_types(dataset: &Dataset) -> AnalysisResult<Analysis> {
    require(dataset, Column::ListedIn)?;
    let slices = counted_slices(
        dataset
            .records()
            .iter()
            .filter_map(|r| r.listed_in.as_deref()),
    );
    if slices.is_empty() {
        return Err(AnalysisError::NoData {
            what: "restaurant type".to_string(),
        });
    }
    Ok(Analysis {
        title: "Restaurant Types".to_string(),
        figures: vec![Figure {
            title: "Distribution of Restaurant Types".to_string(),
            x_label: String::new(),
            y_label: String::new(),
            kind: FigureKind::Pie { slices },
        }],
        explanation: "This chart shows the share of each restaurant type in the dataset."
            .to_string(),
    })
}

/// Rating five-number summaries per flag value, labels ascending.
fn rating_boxes_by_flag<F>(dataset: &Dataset, flag: F) -> Vec<BoxGroup>
where
    F: Fn(&Restaurant) -> Option<&str>,
{
    let mut grouped: std::collections::BTreeMap<String, Vec<f64>> = Default::default();
    for record in dataset.records() {
        if let (Some(value), Some(rating)) = (flag(record), record.rating) {
            grouped.entry(value.to_string()).or_default().push(rating);
        }
    }
    grouped
        .into_iter()
        .filter_map(|(label, mut ratings)| {
            ratings.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            let summary = numeric_summary(&ratings);
            Some(BoxGroup {
                label,
                min: summary.min?,
                q1: quantile_linear(&ratings, 0.25)?,
                median: summary.median?,
                q3: quantile_linear(&ratings, 0.75)?,
                max: summary.max?,
                count: ratings.len(),
            })
        })
        .collect()
}

/// Rating comparison between restaurants taking and not taking online
/// orders.
pub fn online_vs_offline(dataset: &Dataset) -> AnalysisResult<Analysis> {
    require(dataset, Column::OnlineOrder)?;
    require(dataset, Column::Rating)?;
    let groups = rating_boxes_by_flag(dataset, |r| r.online_order.as_deref());
    if groups.is_empty() {
        return Err(AnalysisError::NoData {
            what: "online order".to_string(),
        });
    }
    Ok(Analysis {
        title: "Online vs Offline Orders".to_string(),
        figures: vec![Figure {
            title: "Online vs Offline Orders - Ratings".to_string(),
            x_label: "Online Order".to_string(),
            y_label: "Rating".to_string(),
            kind: FigureKind::Box { groups },
        }],
        explanation:
            "This chart compares ratings for restaurants with and without online ordering."
                .to_string(),
    })
}

/// Table booking: share of restaurants offering it, and ratings with
/// and without it (the rating comparison is skipped when the dataset
/// has no rating column).
pub fn book_table_analysis(dataset: &Dataset) -> AnalysisResult<Analysis> {
    require(dataset, Column::BookTable)?;
    let slices = counted_slices(
        dataset
            .records()
            .iter()
            .filter_map(|r| r.book_table.as_deref()),
    );
    if slices.is_empty() {
        return Err(AnalysisError::NoData {
            what: "table booking".to_string(),
        });
    }
    let mut figures = vec![Figure {
        title: "Proportion of Restaurants Offering Table Booking".to_string(),
        x_label: String::new(),
        y_label: String::new(),
        kind: FigureKind::Pie { slices },
    }];
    if dataset.has_column(Column::Rating) {
        let groups = rating_boxes_by_flag(dataset, |r| r.book_table.as_deref());
        if !groups.is_empty() {
            figures.push(Figure {
                title: "Ratings for Restaurants With and Without Table Booking".to_string(),
                x_label: "Table Booking Available".to_string(),
                y_label: "Rating".to_string(),
                kind: FigureKind::Box { groups },
            });
        }
    }
    Ok(Analysis {
        title: "Table Booking Analysis".to_string(),
        figures,
        explanation: "The left chart shows the proportion of restaurants offering table booking. The right chart compares ratings for restaurants with and without table booking.".to_string(),
    })
}

/// Counts for the ten most common locations.
pub fn location_analysis(dataset: &Dataset) -> AnalysisResult<Analysis> {
    require(dataset, Column::Location)?;
    let counted: Vec<(String, usize)> = dataset
        .records()
        .iter()
        .filter_map(|r| r.location.as_deref())
        .counts()
        .into_iter()
        .map(|(label, count)| (label.to_string(), count))
        .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
        .take(limits::LOCATION_LIMIT)
        .collect();
    if counted.is_empty() {
        return Err(AnalysisError::NoData {
            what: "location".to_string(),
        });
    }
    let (labels, values): (Vec<String>, Vec<f64>) = counted
        .into_iter()
        .map(|(label, count)| (label, count as f64))
        .unzip();
    Ok(Analysis {
        title: "Location Analysis".to_string(),
        figures: vec![Figure {
            title: "Top 10 Locations by Restaurant Count".to_string(),
            x_label: "Location".to_string(),
            y_label: "Number of Restaurants".to_string(),
            kind: FigureKind::Bar { labels, values },
        }],
        explanation: "This chart shows the ten locations with the most restaurants.".to_string(),
    })
}

pub const PRICE_BUCKET_LABELS: [&str; 5] =
    ["0-500", "501-1000", "1001-1500", "1501-2000", "2000+"];

/// Fixed price bucket for a cost value. The first bucket is closed on
/// both ends, so a cost of exactly 500 lands in "0-500" and 2001 lands
/// in "2000+". Negative costs land in no bucket.
pub fn price_bucket(cost: f64) -> Option<&'static str> {
    if cost < 0.0 {
        None
    } else if cost <= 500.0 {
        Some(PRICE_BUCKET_LABELS[0])
    } else if cost <= 1000.0 {
        Some(PRICE_BUCKET_LABELS[1])
    } else if cost <= 1500.0 {
        Some(PRICE_BUCKET_LABELS[2])
    } else if cost <= 2000.0 {
        Some(PRICE_BUCKET_LABELS[3])
    } else {
        Some(PRICE_BUCKET_LABELS[4])
    }
}

/// Restaurant counts per fixed price bucket. All five buckets are
/// reported even when empty.
pub fn price_range(dataset: &Dataset) -> AnalysisResult<Analysis> {
    require(dataset, Column::Cost)?;
    let mut counts = [0usize; PRICE_BUCKET_LABELS.len()];
    let mut total = 0usize;
    for cost in dataset.costs() {
        if let Some(label) = price_bucket(cost) {
            let idx = PRICE_BUCKET_LABELS
                .iter()
                .position(|&l| l == label)
                .unwrap_or(0);
            counts[idx] += 1;
            total += 1;
        }
    }
    if total == 0 {
        return Err(AnalysisError::NoData {
            what: "cost".to_string(),
        });
    }
    Ok(Analysis {
        title: "Price Range Distribution".to_string(),
        figures: vec![Figure {
            title: "Price Range Distribution".to_string(),
            x_label: "Price Range (for two people)".to_string(),
            y_label: "Number of Restaurants".to_string(),
            kind: FigureKind::Bar {
                labels: PRICE_BUCKET_LABELS.iter().map(|s| s.to_string()).collect(),
                values: counts.iter().map(|&c| c as f64).collect(),
            },
        }],
        explanation: "This chart shows how many restaurants fall in each price range for two people.".to_string(),
    })
}

/// Pearson correlation heatmap over exactly {rating, votes, cost},
/// pairwise complete observations. Zero-variance columns produce NaN
/// cells; the widget prints them as such.
pub fn correlation(dataset: &Dataset) -> AnalysisResult<Analysis> {
    require(dataset, Column::Rating)?;
    require(dataset, Column::Votes)?;
    require(dataset, Column::Cost)?;
    let numeric = |record: &Restaurant, idx: usize| -> Option<f64> {
        match idx {
            0 => record.rating,
            1 => record.votes.map(|v| v as f64),
            _ => record.cost_for_two,
        }
    };
    let labels = vec![
        "rating".to_string(),
        "votes".to_string(),
        "cost".to_string(),
    ];
    let mut values = vec![vec![f64::NAN; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            let (xs, ys): (Vec<f64>, Vec<f64>) = dataset
                .records()
                .iter()
                .filter_map(|r| match (numeric(r, i), numeric(r, j)) {
                    (Some(x), Some(y)) => Some((x, y)),
                    _ => None,
                })
                .unzip();
            values[i][j] = pearson(&xs, &ys);
        }
    }
    Ok(Analysis {
        title: "Correlation Heatmap".to_string(),
        figures: vec![Figure {
            title: "Correlation Heatmap".to_string(),
            x_label: String::new(),
            y_label: String::new(),
            kind: FigureKind::Heatmap { labels, values },
        }],
        explanation: "This chart shows the Pearson correlation between rating, votes and cost."
            .to_string(),
    })
}

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z]+").unwrap());

/// Frequency-weighted cuisine terms over every non-missing cuisine
/// field, case-folded. Deterministic order: count descending, then
/// token ascending.
pub fn cuisine_cloud(dataset: &Dataset) -> AnalysisResult<Analysis> {
    require(dataset, Column::Cuisines)?;
    let text = dataset
        .records()
        .iter()
        .filter_map(|r| r.cuisines.as_deref())
        .join(" ")
        .to_lowercase();
    let words: Vec<WordWeight> = WORD_RE
        .find_iter(&text)
        .map(|m| m.as_str())
        .counts()
        .into_iter()
        .map(|(word, count)| WordWeight {
            word: word.to_string(),
            count,
        })
        .sorted_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)))
        .take(limits::CLOUD_WORD_LIMIT)
        .collect();
    if words.is_empty() {
        return Err(AnalysisError::NoData {
            what: "cuisine".to_string(),
        });
    }
    Ok(Analysis {
        title: "Cuisine Word Cloud".to_string(),
        figures: vec![Figure {
            title: "Cuisine Word Cloud".to_string(),
            x_label: String::new(),
            y_label: String::new(),
            kind: FigureKind::WordCloud { words },
        }],
        explanation: "This chart shows the most frequent cuisine terms across the dataset."
            .to_string(),
    })
}
