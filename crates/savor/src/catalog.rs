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

use crate::error::{CatalogError, CatalogResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// The closed set of analysis topics the query router can resolve to.
/// Each category maps 1:1 to a rendering operation in [`crate::analysis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    TopRated,
    OnlineVsOffline,
    Cost,
    RestaurantType,
    Rating,
    Votes,
    Location,
    BookTable,
}
impl Category {
    /// Every category, in the documented router priority order. The
    /// order is observable behaviour: a query matching several
    /// categories resolves to the earliest one here.
    pub fn all() -> [Category; 8] {
        [
            Category::TopRated,
            Category::OnlineVsOffline,
            Category::Cost,
            Category::RestaurantType,
            Category::Rating,
            Category::Votes,
            Category::Location,
            Category::BookTable,
        ]
    }
    pub fn key(&self) -> &'static str {
        match self {
            Category::TopRated => "top-rated",
            Category::OnlineVsOffline => "online-vs-offline",
            Category::Cost => "cost",
            Category::RestaurantType => "restaurant-type",
            Category::Rating => "rating",
            Category::Votes => "votes",
            Category::Location => "location",
            Category::BookTable => "book-table",
        }
    }
}
impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// One catalog entry: display metadata plus the synonym phrases the
/// router matches against. Synonyms are static process-wide state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryNode {
    pub category: Category,
    pub title: String,
    pub description: String,
    pub synonyms: Vec<String>,
}
#[derive(Debug, Serialize, Deserialize)]
struct CatalogConfig {
    categories: Vec<CategoryNode>,
}

/// The analysis catalog, held in router priority order.
#[derive(Debug)]
pub struct CategoryCatalog {
    nodes: Vec<CategoryNode>,
    index_by_category: HashMap<Category, usize>,
}

/// Default catalog document, compiled in so the system works without a
/// config directory. Synonym casing is normalised at load time.
const DEFAULT_CATALOG_YAML: &str = include_str!("../config/categories.yml");

impl CategoryCatalog {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> CatalogResult<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|source| CatalogError::CatalogFileError {
                path: path.as_ref().display().to_string(),
                source,
            })?;
        Self::from_yaml_str(&content)
    }
    pub fn from_yaml_str(yaml: &str) -> CatalogResult<Self> {
        let config: CatalogConfig = serde_yaml::from_str(yaml)?;
        if config.categories.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }
        let mut index_by_category = HashMap::new();
        for (idx, node) in config.categories.iter().enumerate() {
            if node.synonyms.iter().all(|s| s.trim().is_empty()) {
                return Err(CatalogError::EmptySynonyms {
                    key: node.category.key().to_string(),
                });
            }
            if index_by_category.insert(node.category, idx).is_some() {
                return Err(CatalogError::DuplicateCategory {
                    key: node.category.key().to_string(),
                });
            }
        }
        let nodes = config
            .categories
            .into_iter()
            .map(|mut node| {
                for synonym in &mut node.synonyms {
                    *synonym = synonym.trim().to_lowercase();
                }
                node.synonyms.retain(|s| !s.is_empty());
                node
            })
            .collect();
        Ok(Self {
            nodes,
            index_by_category,
        })
    }
    /// Catalog built from the compiled-in document.
    pub fn builtin() -> CatalogResult<Self> {
        Self::from_yaml_str(DEFAULT_CATALOG_YAML)
    }
    /// Entries in router priority order.
    pub fn in_priority_order(&self) -> &[CategoryNode] {
        &self.nodes
    }
    pub fn get(&self, category: Category) -> Option<&CategoryNode> {
        self.index_by_category
            .get(&category)
            .map(|&idx| &self.nodes[idx])
    }
    pub fn title(&self, category: Category) -> &str {
        self.get(category).map_or(category.key(), |n| &n.title)
    }
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_lists_all_categories_in_priority_order() {
        let catalog = CategoryCatalog::builtin().unwrap();
        let order: Vec<Category> = catalog
            .in_priority_order()
            .iter()
            .map(|n| n.category)
            .collect();
        assert_eq!(order, Category::all().to_vec());
    }

    #[test]
    fn synonyms_are_lowercased_at_load() {
        let catalog = CategoryCatalog::from_yaml_str(
            "categories:\n  - category: cost\n    title: Cost\n    description: d\n    synonyms: [\" Price \", EXPENSIVE]\n",
        )
        .unwrap();
        let node = catalog.get(Category::Cost).unwrap();
        assert_eq!(node.synonyms, vec!["price", "expensive"]);
    }

    #[test]
    fn duplicate_category_is_rejected() {
        let err = CategoryCatalog::from_yaml_str(
            "categories:\n  - category: cost\n    title: a\n    description: d\n    synonyms: [price]\n  - category: cost\n    title: b\n    description: d\n    synonyms: [cheap]\n",
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateCategory { .. }));
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let err = CategoryCatalog::from_yaml_str("categories: []\n").unwrap_err();
        assert!(matches!(err, CatalogError::EmptyCatalog));
    }
}
