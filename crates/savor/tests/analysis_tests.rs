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

use savor::analysis::{
    self, limits, price_bucket, FigureKind, PRICE_BUCKET_LABELS,
};
use savor::{AnalysisError, Category, Column, Dataset};

const FULL_HEADER: &str =
    "name,online_order,book_table,rate,votes,location,cuisines,\"approx_cost(for two people)\",\"listed_in(type)\"";

fn dataset_from(rows: &[String]) -> Dataset {
    let csv = format!("{FULL_HEADER}\n{}", rows.join("\n"));
    Dataset::from_csv_reader(csv.as_bytes(), "test".to_string(), None).unwrap()
}

fn row(name: &str, rating: &str, votes: u64, cost: &str) -> String {
    format!("{name},Yes,No,{rating},{votes},BTM,North Indian,{cost},Buffet")
}

fn fifteen_rows() -> Vec<String> {
    (0..15)
        .map(|i| {
            row(
                &format!("r{i}"),
                &format!("{:.1}/5", 1.0 + 0.2 * i as f64),
                (i * 10) as u64,
                "500",
            )
        })
        .collect()
}

#[test]
fn top_rated_returns_exactly_ten_rows_sorted_descending() {
    let dataset = dataset_from(&fifteen_rows());
    let analysis = analysis::top_rated(&dataset).unwrap();
    let FigureKind::Bar { labels, values } = &analysis.figures[0].kind else {
        panic!("expected a bar figure");
    };
    assert_eq!(labels.len(), 10);
    assert_eq!(values.len(), 10);
    assert!(values.windows(2).all(|pair| pair[0] >= pair[1]));
    // Highest rating in the fixture is 1.0 + 0.2 * 14 = 3.8 on row r14.
    assert_eq!(labels[0], "r14");
    assert!((values[0] - 3.8).abs() < 1e-9);
}

#[test]
fn top_rated_ties_keep_original_row_order() {
    let rows = vec![
        row("first", "4.0/5", 1, "100"),
        row("second", "4.0/5", 2, "100"),
        row("third", "4.5/5", 3, "100"),
    ];
    let dataset = dataset_from(&rows);
    let analysis = analysis::top_rated(&dataset).unwrap();
    let FigureKind::Bar { labels, .. } = &analysis.figures[0].kind else {
        panic!("expected a bar figure");
    };
    assert_eq!(labels, &["third", "first", "second"]);
}

#[test]
fn rows_without_rating_are_excluded_from_rankings() {
    let rows = vec![
        row("rated", "4.0/5", 1, "100"),
        row("unrated", "NEW", 2, "100"),
    ];
    let dataset = dataset_from(&rows);
    let analysis = analysis::top_rated(&dataset).unwrap();
    let FigureKind::Bar { labels, .. } = &analysis.figures[0].kind else {
        panic!("expected a bar figure");
    };
    assert_eq!(labels, &["rated"]);
}

#[test]
fn votes_entry_points_keep_their_distinct_limits() {
    let rows: Vec<String> = (0..25)
        .map(|i| row(&format!("r{i}"), "4.0/5", 1000 - i as u64, "300"))
        .collect();
    let dataset = dataset_from(&rows);

    let sidebar = analysis::votes_leaderboard(&dataset, limits::VOTES_PANEL_LIMIT).unwrap();
    let FigureKind::Bar { labels, .. } = &sidebar.figures[0].kind else {
        panic!("expected a bar figure");
    };
    assert_eq!(labels.len(), 20);

    let query_view = analysis::votes_analysis(&dataset).unwrap();
    let FigureKind::Bar { labels, .. } = &query_view.figures.last().unwrap().kind else {
        panic!("expected a bar figure");
    };
    assert_eq!(labels.len(), 10);
    assert_eq!(labels[0], "r0");
}

#[test]
fn price_bucket_edges_are_inclusive_on_the_right() {
    assert_eq!(price_bucket(0.0), Some("0-500"));
    assert_eq!(price_bucket(500.0), Some("0-500"));
    assert_eq!(price_bucket(500.5), Some("501-1000"));
    assert_eq!(price_bucket(1000.0), Some("501-1000"));
    assert_eq!(price_bucket(2000.0), Some("1501-2000"));
    assert_eq!(price_bucket(2001.0), Some("2000+"));
    assert_eq!(price_bucket(-1.0), None);
}

#[test]
fn price_range_reports_all_buckets() {
    let rows = vec![
        row("a", "4.0/5", 1, "500"),
        row("b", "4.0/5", 1, "501"),
        row("c", "4.0/5", 1, "2000"),
        row("d", "4.0/5", 1, "2001"),
        row("e", "4.0/5", 1, "0"),
    ];
    let dataset = dataset_from(&rows);
    let analysis = analysis::price_range(&dataset).unwrap();
    let FigureKind::Bar { labels, values } = &analysis.figures[0].kind else {
        panic!("expected a bar figure");
    };
    assert_eq!(labels.len(), PRICE_BUCKET_LABELS.len());
    assert_eq!(values, &[2.0, 1.0, 0.0, 1.0, 1.0]);
}

#[test]
fn correlation_with_constant_column_yields_nan_not_a_crash() {
    let rows = vec![
        row("a", "4.0/5", 10, "100"),
        row("b", "4.0/5", 20, "200"),
        row("c", "4.0/5", 30, "300"),
    ];
    let dataset = dataset_from(&rows);
    let analysis = analysis::correlation(&dataset).unwrap();
    let FigureKind::Heatmap { labels, values } = &analysis.figures[0].kind else {
        panic!("expected a heatmap figure");
    };
    assert_eq!(labels, &["rating", "votes", "cost"]);
    // rating has zero variance: every cell touching it is NaN.
    assert!(values[0][0].is_nan());
    assert!(values[0][1].is_nan());
    assert!(values[1][0].is_nan());
    // votes and cost correlate perfectly in this fixture.
    assert!((values[1][2] - 1.0).abs() < 1e-9);
    assert!((values[1][1] - 1.0).abs() < 1e-9);
}

#[test]
fn missing_location_column_degrades_gracefully() {
    let csv = "name,rate,votes\nr1,4.0/5,10\n";
    let dataset = Dataset::from_csv_reader(csv.as_bytes(), "test".to_string(), None).unwrap();
    let err = analysis::location_analysis(&dataset).unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::ColumnUnavailable {
            column: Column::Location
        }
    ));
    assert!(err.user_message().contains("not available"));
}

#[test]
fn cuisine_cloud_counts_tokens_deterministically() {
    let rows = vec![
        row("a", "4.0/5", 1, "100").replace("North Indian", "North Indian Chinese"),
        row("b", "4.0/5", 1, "100").replace("North Indian", "chinese cafe"),
        row("c", "4.0/5", 1, "100").replace("North Indian", "Cafe"),
    ];
    let dataset = dataset_from(&rows);
    let analysis = analysis::cuisine_cloud(&dataset).unwrap();
    let FigureKind::WordCloud { words } = &analysis.figures[0].kind else {
        panic!("expected a word cloud figure");
    };
    // "chinese" and "cafe" both occur twice; ties order alphabetically.
    assert_eq!(words[0].word, "cafe");
    assert_eq!(words[0].count, 2);
    assert_eq!(words[1].word, "chinese");
    assert_eq!(words[1].count, 2);
}

#[test]
fn cuisine_cloud_without_any_tokens_reports_no_data() {
    let csv = "name,rate,cuisines\nr1,4.0/5,\nr2,3.0/5,\n";
    let dataset = Dataset::from_csv_reader(csv.as_bytes(), "test".to_string(), None).unwrap();
    let err = analysis::cuisine_cloud(&dataset).unwrap_err();
    assert!(matches!(err, AnalysisError::NoData { .. }));
    assert_eq!(err.user_message(), "No cuisine data available");
}

#[test]
fn online_vs_offline_groups_are_labelled_and_ordered() {
    let rows = vec![
        row("a", "4.0/5", 1, "100"),
        row("b", "3.0/5", 1, "100").replace("Yes,No", "No,No"),
        row("c", "2.0/5", 1, "100").replace("Yes,No", "No,No"),
    ];
    let dataset = dataset_from(&rows);
    let analysis = analysis::online_vs_offline(&dataset).unwrap();
    let FigureKind::Box { groups } = &analysis.figures[0].kind else {
        panic!("expected a box figure");
    };
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].label, "No");
    assert_eq!(groups[0].count, 2);
    assert_eq!(groups[0].median, 2.5);
    assert_eq!(groups[1].label, "Yes");
    assert_eq!(groups[1].count, 1);
}

#[test]
fn book_table_skips_rating_comparison_without_ratings() {
    let csv = "name,book_table\nr1,Yes\nr2,No\n";
    let dataset = Dataset::from_csv_reader(csv.as_bytes(), "test".to_string(), None).unwrap();
    let analysis = analysis::book_table_analysis(&dataset).unwrap();
    assert_eq!(analysis.figures.len(), 1);
    assert!(matches!(analysis.figures[0].kind, FigureKind::Pie { .. }));
}

#[test]
fn restaurant_types_counts_each_label() {
    let rows = vec![
        row("a", "4.0/5", 1, "100"),
        row("b", "4.0/5", 1, "100").replace("Buffet", "Cafes"),
        row("c", "4.0/5", 1, "100").replace("Buffet", "Cafes"),
    ];
    let dataset = dataset_from(&rows);
    let analysis = analysis::restaurant_types(&dataset).unwrap();
    let FigureKind::Pie { slices } = &analysis.figures[0].kind else {
        panic!("expected a pie figure");
    };
    assert_eq!(slices[0].label, "Cafes");
    assert_eq!(slices[0].count, 2);
    assert_eq!(slices[1].label, "Buffet");
    assert_eq!(slices[1].count, 1);
}

#[test]
fn render_dispatch_covers_every_category() {
    let dataset = dataset_from(&fifteen_rows());
    for category in Category::all() {
        let analysis = analysis::render(category, &dataset).unwrap();
        assert!(!analysis.figures.is_empty(), "no figures for {category}");
        assert!(!analysis.explanation.is_empty());
    }
}

#[test]
fn analyses_are_deterministic() {
    let dataset = dataset_from(&fifteen_rows());
    for category in Category::all() {
        let first = analysis::render(category, &dataset).unwrap();
        let second = analysis::render(category, &dataset).unwrap();
        assert_eq!(first, second, "non-deterministic output for {category}");
    }
}
