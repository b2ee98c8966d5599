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

use savor::profile;
use savor::{Column, DataError, Dataset};
use std::io::Write;

fn write_csv(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn loads_and_normalises_the_source_format() {
    let file = write_csv(
        "name,online_order,book_table,rate,votes,location,cuisines,\"approx_cost(for two people)\",\"listed_in(type)\"\n\
         Jalsa,Yes,Yes,4.1/5,775,Banashankari,\"North Indian, Chinese\",\"1,200\",Buffet\n\
         Spice Elephant,Yes,No,NEW,787,Banashankari,Thai,800,Buffet\n",
    );
    let dataset = Dataset::from_csv_file(file.path()).unwrap();
    assert_eq!(dataset.len(), 2);
    assert_eq!(dataset.metadata().row_count, 2);
    assert!(dataset.metadata().source_path.is_some());

    let first = &dataset.records()[0];
    assert_eq!(first.name, "Jalsa");
    assert_eq!(first.rating, Some(4.1));
    assert_eq!(first.votes, Some(775));
    assert_eq!(first.cost_for_two, Some(1200.0));
    assert_eq!(first.cuisines.as_deref(), Some("North Indian, Chinese"));

    // "NEW" is not a rating; the row stays, the value goes missing.
    let second = &dataset.records()[1];
    assert_eq!(second.rating, None);
    assert_eq!(second.votes, Some(787));
}

#[test]
fn missing_optional_columns_are_tolerated() {
    let file = write_csv("name,rate\nOnly,3.5/5\n");
    let dataset = Dataset::from_csv_file(file.path()).unwrap();
    assert!(dataset.has_column(Column::Name));
    assert!(dataset.has_column(Column::Rating));
    assert!(!dataset.has_column(Column::Location));
    assert!(!dataset.has_column(Column::Cuisines));
    assert_eq!(dataset.records()[0].location, None);
}

#[test]
fn unknown_columns_are_ignored() {
    let file = write_csv("name,rate,mystery_column\nOnly,3.5/5,42\n");
    let dataset = Dataset::from_csv_file(file.path()).unwrap();
    assert_eq!(dataset.metadata().column_count, 2);
    assert_eq!(dataset.records()[0].rating, Some(3.5));
}

#[test]
fn header_only_file_is_an_empty_dataset() {
    let file = write_csv("name,rate,votes\n");
    let err = Dataset::from_csv_file(file.path()).unwrap_err();
    assert!(matches!(err, DataError::EmptyDataset));
}

#[test]
fn missing_file_reports_the_path() {
    let err = Dataset::from_csv_file("/nonexistent/restaurants.csv").unwrap_err();
    match err {
        DataError::DataFileError { path, .. } => {
            assert!(path.contains("restaurants.csv"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn summary_profiles_every_known_column() {
    let file = write_csv(
        "name,rate,votes\na,4.0/5,10\nb,NEW,20\nc,3.0/5,30\n",
    );
    let dataset = Dataset::from_csv_file(file.path()).unwrap();
    let summary = profile::summarize(&dataset);
    assert_eq!(summary.row_count, 3);
    assert_eq!(summary.columns.len(), Column::all().len());

    let rating = summary
        .columns
        .iter()
        .find(|c| c.column == Column::Rating)
        .unwrap();
    assert!(rating.present);
    assert_eq!(rating.non_missing, 2);
    assert_eq!(rating.missing, 1);
    let stats = rating.numeric.as_ref().unwrap();
    assert_eq!(stats.mean, Some(3.5));
    assert_eq!(stats.min, Some(3.0));
    assert_eq!(stats.max, Some(4.0));

    let location = summary
        .columns
        .iter()
        .find(|c| c.column == Column::Location)
        .unwrap();
    assert!(!location.present);

    let report = summary.report();
    assert!(report.contains("3 rows"));
    assert!(report.contains("not present"));

    let json = summary.export_json().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["row_count"], 3);
}

#[test]
fn numeric_iterators_skip_missing_values() {
    let file = write_csv(
        "name,rate,votes,approx_cost\na,4.0/5,10,100\nb,NEW,,\nc,2.5,30,\"1,500\"\n",
    );
    let dataset = Dataset::from_csv_file(file.path()).unwrap();
    assert_eq!(dataset.ratings().collect::<Vec<_>>(), vec![4.0, 2.5]);
    assert_eq!(dataset.votes().collect::<Vec<_>>(), vec![10, 30]);
    assert_eq!(dataset.costs().collect::<Vec<_>>(), vec![100.0, 1500.0]);
}
