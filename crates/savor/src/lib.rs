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

pub mod analysis;
pub mod catalog;
pub mod dataset;
pub mod error;
pub mod profile;
pub mod router;
pub mod similarity;
pub mod widgets;

pub use analysis::{Analysis, Figure, FigureKind};
pub use catalog::{Category, CategoryCatalog, CategoryNode};
pub use dataset::{Column, Dataset, DatasetMetadata, Restaurant};
pub use error::{
    AnalysisError, CatalogError, DashboardError, DataError, ErrorReporter, Result, RouterError,
};
pub use profile::{DatasetSummary, NumericSummary};
pub use router::{QueryOutcome, RouterConfig};

use std::path::Path;
use std::sync::Arc;

/// Catalog, router configuration and dataset bundled behind one handle.
/// The dataset is loaded once and shared read-only; queries and renders
/// are side-effect free.
pub struct AnalyticsSystem {
    catalog: CategoryCatalog,
    router_config: RouterConfig,
    dataset: Option<Arc<Dataset>>,
}
impl AnalyticsSystem {
    pub fn new() -> Result<Self> {
        let catalog = CategoryCatalog::builtin()?;
        Ok(Self {
            catalog,
            router_config: RouterConfig::default(),
            dataset: None,
        })
    }
    pub fn with_config(catalog_path: &str, router_config: RouterConfig) -> Result<Self> {
        let catalog = CategoryCatalog::from_yaml_file(catalog_path)?;
        router_config
            .validate(&catalog)
            .map_err(RouterError::InvalidConfig)?;
        Ok(Self {
            catalog,
            router_config,
            dataset: None,
        })
    }
    pub fn load_dataset<P: AsRef<Path>>(&mut self, path: P) -> Result<Arc<Dataset>> {
        let dataset = Arc::new(Dataset::from_csv_file(path)?);
        self.dataset = Some(Arc::clone(&dataset));
        Ok(dataset)
    }
    pub fn dataset(&self) -> Option<&Arc<Dataset>> {
        self.dataset.as_ref()
    }
    pub fn catalog(&self) -> &CategoryCatalog {
        &self.catalog
    }
    pub fn router_config(&self) -> &RouterConfig {
        &self.router_config
    }
    pub fn router_config_mut(&mut self) -> &mut RouterConfig {
        &mut self.router_config
    }
    /// Resolve a free-text query against the loaded catalog.
    pub fn resolve(&self, query: &str) -> QueryOutcome {
        router::resolve_query(query, &self.catalog, &self.router_config)
    }
    /// Resolve a query and, when it lands on a category, run its
    /// analysis against the loaded dataset.
    pub fn answer(&self, query: &str) -> Result<Option<Analysis>> {
        match self.resolve(query) {
            QueryOutcome::Resolved(category) => {
                let dataset = self
                    .dataset
                    .as_ref()
                    .ok_or(DashboardError::Data(DataError::EmptyDataset))?;
                Ok(Some(analysis::render(category, dataset)?))
            }
            QueryOutcome::Unresolved => Ok(None),
        }
    }
    pub fn summary(&self) -> Option<DatasetSummary> {
        self.dataset.as_ref().map(|dataset| profile::summarize(dataset))
    }
}
impl Default for AnalyticsSystem {
    fn default() -> Self {
        Self::new().expect("Failed to create default analytics system")
    }
}
