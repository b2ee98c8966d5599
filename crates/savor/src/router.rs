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

use crate::catalog::{Category, CategoryCatalog};
use crate::error::RouterError;
use crate::similarity::partial_ratio;
use serde::{Deserialize, Serialize};

/// Router tuning. The threshold and the category priority order are
/// explicit configuration rather than implicit code order; both are
/// observable behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// A synonym must score strictly above this (0-100) to match.
    pub match_threshold: f64,
    /// Categories are tried in this order; the first match wins even if
    /// a later category would score higher.
    pub priority: Vec<Category>,
}
impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            match_threshold: 80.0,
            priority: Category::all().to_vec(),
        }
    }
}
impl RouterConfig {
    pub fn validate(&self, catalog: &CategoryCatalog) -> Result<(), String> {
        if !(0.0..=100.0).contains(&self.match_threshold) {
            return Err("match_threshold must be between 0 and 100".to_string());
        }
        if self.priority.is_empty() {
            return Err("priority order must name at least one category".to_string());
        }
        let mut seen = std::collections::HashSet::new();
        for category in &self.priority {
            if !seen.insert(category) {
                return Err(format!("category '{category}' appears twice in priority order"));
            }
            if catalog.get(*category).is_none() {
                return Err(format!("category '{category}' is not in the catalog"));
            }
        }
        Ok(())
    }
    /// Fewer false positives, at the price of missing some rephrasings.
    pub fn for_strict_matching() -> Self {
        Self {
            match_threshold: 90.0,
            ..Default::default()
        }
    }
    /// More tolerant of typos; expect more accidental matches.
    pub fn for_lenient_matching() -> Self {
        Self {
            match_threshold: 70.0,
            ..Default::default()
        }
    }
}

/// Outcome of resolving one free-text query. Ephemeral; nothing about a
/// query is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOutcome {
    Resolved(Category),
    Unresolved,
}
impl QueryOutcome {
    pub fn category(&self) -> Option<Category> {
        match self {
            QueryOutcome::Resolved(category) => Some(*category),
            QueryOutcome::Unresolved => None,
        }
    }
}

/// Resolve a free-text query to a category.
///
/// The query is lowercased; no other normalisation. For each category in
/// priority order, every synonym is scored with [`partial_ratio`]
/// against the whole query, and the first category with a synonym
/// strictly above the threshold wins. An empty or whitespace-only query
/// scores 0 against every synonym and is therefore always unresolved.
pub fn resolve_query(
    query: &str,
    catalog: &CategoryCatalog,
    config: &RouterConfig,
) -> QueryOutcome {
    let query = query.to_lowercase();
    for category in &config.priority {
        let Some(node) = catalog.get(*category) else {
            continue;
        };
        let matched = node
            .synonyms
            .iter()
            .any(|synonym| partial_ratio(synonym, &query) > config.match_threshold);
        if matched {
            return QueryOutcome::Resolved(*category);
        }
    }
    QueryOutcome::Unresolved
}

/// [`resolve_query`] with the configuration checked first.
pub fn resolve_query_validated(
    query: &str,
    catalog: &CategoryCatalog,
    config: &RouterConfig,
) -> Result<QueryOutcome, RouterError> {
    config
        .validate(catalog)
        .map_err(RouterError::InvalidConfig)?;
    Ok(resolve_query(query, catalog, config))
}

/// Per-category scoring detail for one query, in priority order.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryScore {
    pub category: Category,
    pub best_synonym: String,
    pub score: f64,
    pub matched: bool,
}

/// Score every category against the query without short-circuiting.
/// Diagnostic companion to [`resolve_query`]; the dashboard surfaces
/// this in its configuration panel.
pub fn explain_resolution(
    query: &str,
    catalog: &CategoryCatalog,
    config: &RouterConfig,
) -> Vec<CategoryScore> {
    let query = query.to_lowercase();
    config
        .priority
        .iter()
        .filter_map(|category| catalog.get(*category))
        .map(|node| {
            let (best_synonym, score) = node
                .synonyms
                .iter()
                .map(|synonym| (synonym.as_str(), partial_ratio(synonym, &query)))
                .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
                .unwrap_or(("", 0.0));
            CategoryScore {
                category: node.category,
                best_synonym: best_synonym.to_string(),
                score,
                matched: score > config.match_threshold,
            }
        })
        .collect()
}
