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

use savor::router::{
    explain_resolution, resolve_query, resolve_query_validated, QueryOutcome, RouterConfig,
};
use savor::{Category, CategoryCatalog, RouterError};

fn catalog() -> CategoryCatalog {
    CategoryCatalog::builtin().unwrap()
}

#[test]
fn exact_synonym_resolves() {
    let outcome = resolve_query(
        "show me expensive restaurants",
        &catalog(),
        &RouterConfig::default(),
    );
    assert_eq!(outcome, QueryOutcome::Resolved(Category::Cost));
}

#[test]
fn casing_and_surrounding_text_are_tolerated() {
    let outcome = resolve_query(
        "Is DELIVERY available around here?",
        &catalog(),
        &RouterConfig::default(),
    );
    assert_eq!(outcome, QueryOutcome::Resolved(Category::OnlineVsOffline));
}

#[test]
fn small_typo_still_resolves() {
    // "bokking" is one indel pair away from "booking": scores 85.7.
    let outcome = resolve_query(
        "can I try bokking a table",
        &catalog(),
        &RouterConfig::default(),
    );
    assert_eq!(outcome, QueryOutcome::Resolved(Category::BookTable));
}

#[test]
fn priority_order_picks_the_first_match() {
    // Matches "top" (top-rated), "rate" via "highest rated" (top-rated),
    // "rate" (rating) and "place" (location); top-rated is checked first.
    let outcome = resolve_query(
        "whats the top rated place",
        &catalog(),
        &RouterConfig::default(),
    );
    assert_eq!(outcome, QueryOutcome::Resolved(Category::TopRated));
}

#[test]
fn later_category_wins_only_without_earlier_match() {
    let outcome = resolve_query(
        "what are the scores like",
        &catalog(),
        &RouterConfig::default(),
    );
    assert_eq!(outcome, QueryOutcome::Resolved(Category::Rating));
}

#[test]
fn empty_query_is_unresolved() {
    let catalog = catalog();
    let config = RouterConfig::default();
    assert_eq!(resolve_query("", &catalog, &config), QueryOutcome::Unresolved);
    assert_eq!(
        resolve_query("   \t  ", &catalog, &config),
        QueryOutcome::Unresolved
    );
}

#[test]
fn gibberish_is_unresolved() {
    let outcome = resolve_query("zzzz qqqq", &catalog(), &RouterConfig::default());
    assert_eq!(outcome, QueryOutcome::Unresolved);
}

#[test]
fn threshold_is_strictly_greater_than() {
    let catalog = catalog();
    let config = RouterConfig::default();
    // "prick" vs synonym "price" scores exactly 80: not a match.
    assert_eq!(
        resolve_query("prick", &catalog, &config),
        QueryOutcome::Unresolved
    );
    // "pricey" contains "price" outright: 100.
    assert_eq!(
        resolve_query("pricey", &catalog, &config),
        QueryOutcome::Resolved(Category::Cost)
    );
}

#[test]
fn threshold_is_configurable() {
    let catalog = catalog();
    let lenient = RouterConfig {
        match_threshold: 75.0,
        ..Default::default()
    };
    assert_eq!(
        resolve_query("prick", &catalog, &lenient),
        QueryOutcome::Resolved(Category::Cost)
    );
}

#[test]
fn custom_priority_order_is_respected() {
    let catalog = catalog();
    let mut config = RouterConfig::default();
    config.priority = vec![Category::Rating, Category::TopRated];
    // "highest rated" and "rate" both match; Rating now comes first.
    assert_eq!(
        resolve_query("highest rated", &catalog, &config),
        QueryOutcome::Resolved(Category::Rating)
    );
}

#[test]
fn validation_rejects_bad_configs() {
    let catalog = catalog();
    let bad_threshold = RouterConfig {
        match_threshold: 140.0,
        ..Default::default()
    };
    assert!(matches!(
        resolve_query_validated("top", &catalog, &bad_threshold),
        Err(RouterError::InvalidConfig(_))
    ));
    let mut duplicated = RouterConfig::default();
    duplicated.priority.push(Category::TopRated);
    assert!(matches!(
        resolve_query_validated("top", &catalog, &duplicated),
        Err(RouterError::InvalidConfig(_))
    ));
    let empty_priority = RouterConfig {
        priority: Vec::new(),
        ..Default::default()
    };
    assert!(matches!(
        resolve_query_validated("top", &catalog, &empty_priority),
        Err(RouterError::InvalidConfig(_))
    ));
}

#[test]
fn explain_resolution_scores_every_category() {
    let catalog = catalog();
    let config = RouterConfig::default();
    let trace = explain_resolution("whats the top rated place", &catalog, &config);
    assert_eq!(trace.len(), catalog.len());
    assert_eq!(trace[0].category, Category::TopRated);
    assert!(trace[0].matched);
    assert_eq!(trace[0].score, 100.0);
    let location = trace
        .iter()
        .find(|score| score.category == Category::Location)
        .unwrap();
    assert!(location.matched, "'place' should also have matched");
}

#[test]
fn resolution_is_stateless_across_queries() {
    let catalog = catalog();
    let config = RouterConfig::default();
    let first = resolve_query("best places", &catalog, &config);
    let second = resolve_query("best places", &catalog, &config);
    assert_eq!(first, second);
}
