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

use anyhow::Context;
use eframe::egui;
use std::path::PathBuf;
use std::sync::Arc;

use savor::analysis::{self, limits};
use savor::router::{explain_resolution, resolve_query, QueryOutcome};
use savor::widgets;
use savor::{Analysis, AnalysisError, AnalyticsSystem, Dataset, DatasetSummary, RouterConfig};

/// Probed in order at startup; the first existing file wins. The first
/// entry is the source dataset's own (oddly spaced) filename.
const DATA_PATH_CANDIDATES: [&str; 4] = [
    "Zomato data .csv",
    "data/zomato.csv",
    "data/restaurants.csv",
    "restaurants.csv",
];

const FALLBACK_MESSAGE: &str =
    "I'm sorry, I couldn't understand your query. Please try again with a different question.";

fn main() -> std::result::Result<(), eframe::Error> {
    env_logger::init();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 700.0])
            .with_title("Restaurant Analytics Dashboard"),
        ..Default::default()
    };
    eframe::run_native(
        "Restaurant Analytics Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new()))),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Panel {
    Summary,
    RestaurantTypes,
    VotesDistribution,
    RatingDistribution,
    OnlineVsOffline,
    AverageCost,
    TopRated,
    PriceRange,
    CorrelationHeatmap,
    CuisineCloud,
    DataQuery,
}
impl Panel {
    fn all() -> [Panel; 11] {
        [
            Panel::Summary,
            Panel::RestaurantTypes,
            Panel::VotesDistribution,
            Panel::RatingDistribution,
            Panel::OnlineVsOffline,
            Panel::AverageCost,
            Panel::TopRated,
            Panel::PriceRange,
            Panel::CorrelationHeatmap,
            Panel::CuisineCloud,
            Panel::DataQuery,
        ]
    }
    fn title(&self) -> &'static str {
        match self {
            Panel::Summary => "Dataset Summary",
            Panel::RestaurantTypes => "Restaurant Types",
            Panel::VotesDistribution => "Votes Distribution",
            Panel::RatingDistribution => "Rating Distribution",
            Panel::OnlineVsOffline => "Online vs Offline Orders",
            Panel::AverageCost => "Average Cost for Two",
            Panel::TopRated => "Top Rated Restaurants",
            Panel::PriceRange => "Price Range Distribution",
            Panel::CorrelationHeatmap => "Correlation Heatmap",
            Panel::CuisineCloud => "Cuisine Word Cloud",
            Panel::DataQuery => "Data Query",
        }
    }
}

enum QueryAnswer {
    Chart(Analysis),
    NotUnderstood,
}

struct DashboardApp {
    system: AnalyticsSystem,
    summary: Option<DatasetSummary>,
    active_panel: Panel,
    panel_result: Option<(Panel, Result<Analysis, AnalysisError>)>,
    query_input: String,
    last_query: Option<String>,
    query_answer: Option<QueryAnswer>,
    show_config: bool,
    error_message: Option<String>,
}

impl DashboardApp {
    fn new() -> Self {
        let mut app = Self {
            system: AnalyticsSystem::default(),
            summary: None,
            active_panel: Panel::Summary,
            panel_result: None,
            query_input: String::new(),
            last_query: None,
            query_answer: None,
            show_config: false,
            error_message: None,
        };
        if let Some(path) = DATA_PATH_CANDIDATES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
        {
            app.load_dataset(path);
        } else {
            log::warn!(
                "no dataset found at any default path; waiting for a file selection"
            );
        }
        app
    }

    fn load_dataset(&mut self, path: PathBuf) {
        self.error_message = None;
        self.panel_result = None;
        self.query_answer = None;
        self.summary = None;
        let loaded = self
            .system
            .load_dataset(&path)
            .with_context(|| format!("Failed to load dataset from '{}'", path.display()));
        match loaded {
            Ok(_) => {
                self.summary = self.system.summary();
            }
            Err(e) => {
                self.error_message = Some(format!("{e:#}"));
            }
        }
    }

    fn dataset(&self) -> Option<&Arc<Dataset>> {
        self.system.dataset()
    }

    fn run_panel(&mut self, panel: Panel) {
        let Some(dataset) = self.dataset().cloned() else {
            return;
        };
        let result = match panel {
            Panel::RestaurantTypes => analysis::restaurant_types(&dataset),
            Panel::VotesDistribution => {
                analysis::votes_leaderboard(&dataset, limits::VOTES_PANEL_LIMIT)
            }
            Panel::RatingDistribution => analysis::rating_distribution(&dataset),
            Panel::OnlineVsOffline => analysis::online_vs_offline(&dataset),
            Panel::AverageCost => analysis::cost_distribution(&dataset),
            Panel::TopRated => analysis::top_rated(&dataset),
            Panel::PriceRange => analysis::price_range(&dataset),
            Panel::CorrelationHeatmap => analysis::correlation(&dataset),
            Panel::CuisineCloud => analysis::cuisine_cloud(&dataset),
            Panel::Summary | Panel::DataQuery => return,
        };
        self.panel_result = Some((panel, result));
    }

    fn submit_query(&mut self) {
        let query = self.query_input.trim().to_string();
        self.last_query = Some(query.clone());
        let Some(dataset) = self.dataset().cloned() else {
            return;
        };
        let outcome = resolve_query(&query, self.system.catalog(), self.system.router_config());
        self.query_answer = Some(match outcome {
            QueryOutcome::Resolved(category) => match analysis::render(category, &dataset) {
                Ok(result) => QueryAnswer::Chart(result),
                Err(e) => {
                    // Resolved but the data cannot back it: show the
                    // per-analysis message, not the generic fallback.
                    QueryAnswer::Chart(Analysis {
                        title: self.system.catalog().title(category).to_string(),
                        figures: Vec::new(),
                        explanation: e.user_message(),
                    })
                }
            },
            QueryOutcome::Unresolved => QueryAnswer::NotUnderstood,
        });
    }

    fn render_sidebar(&mut self, ui: &mut egui::Ui) {
        ui.heading("Analyses");
        ui.separator();
        let mut clicked = None;
        for panel in Panel::all() {
            let selected = self.active_panel == panel;
            if ui.selectable_label(selected, panel.title()).clicked() {
                clicked = Some(panel);
            }
        }
        if let Some(panel) = clicked {
            self.active_panel = panel;
            self.run_panel(panel);
        }
        ui.separator();
        if ui.button("Refresh Data").clicked() {
            if let Some(path) = self
                .dataset()
                .and_then(|d| d.metadata().source_path.clone())
            {
                self.load_dataset(path);
                self.run_panel(self.active_panel);
            }
        }
    }

    fn render_summary(&self, ui: &mut egui::Ui) {
        let Some(summary) = &self.summary else {
            ui.label("No dataset summary available.");
            return;
        };
        ui.heading("Dataset Summary");
        ui.separator();
        ui.label(format!("Rows: {}", summary.row_count));
        ui.add_space(6.0);
        egui::ScrollArea::vertical().show(ui, |ui| {
            for column in &summary.columns {
                ui.group(|ui| {
                    ui.horizontal(|ui| {
                        ui.strong(column.column.display_name());
                        if !column.present {
                            ui.colored_label(egui::Color32::GRAY, "not present");
                            return;
                        }
                        ui.label(format!(
                            "{} values, {} missing",
                            column.non_missing, column.missing
                        ));
                    });
                    if let Some(stats) = &column.numeric {
                        ui.horizontal(|ui| {
                            if let Some(mean) = stats.mean {
                                ui.label(format!("Mean: {mean:.2}"));
                            }
                            if let Some(median) = stats.median {
                                ui.label(format!("Median: {median:.2}"));
                            }
                            if let (Some(min), Some(max)) = (stats.min, stats.max) {
                                ui.label(format!("Range: {min:.2}..{max:.2}"));
                            }
                            if stats.outlier_count > 0 {
                                ui.label(format!("Outliers: {}", stats.outlier_count));
                            }
                        });
                    }
                });
            }
        });
    }

    fn render_query_page(&mut self, ui: &mut egui::Ui) {
        ui.heading("Data Query");
        ui.label("Enter your question about the restaurant data:");
        ui.horizontal(|ui| {
            let edit = ui.text_edit_singleline(&mut self.query_input);
            let submitted =
                edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Submit").clicked() || submitted {
                self.submit_query();
            }
        });
        ui.separator();
        match &self.query_answer {
            Some(QueryAnswer::Chart(result)) => {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    widgets::show_analysis(ui, result);
                });
            }
            Some(QueryAnswer::NotUnderstood) => {
                ui.label(FALLBACK_MESSAGE);
            }
            None => {}
        }
    }

    fn render_panel_content(&mut self, ui: &mut egui::Ui) {
        match self.active_panel {
            Panel::Summary => self.render_summary(ui),
            Panel::DataQuery => self.render_query_page(ui),
            panel => {
                if self
                    .panel_result
                    .as_ref()
                    .is_none_or(|(cached, _)| *cached != panel)
                {
                    self.run_panel(panel);
                }
                match &self.panel_result {
                    Some((_, Ok(result))) => {
                        egui::ScrollArea::vertical().show(ui, |ui| {
                            widgets::show_analysis(ui, result);
                        });
                    }
                    Some((_, Err(e))) => {
                        ui.heading(panel.title());
                        ui.separator();
                        ui.label(e.user_message());
                    }
                    None => {
                        ui.label("No dataset loaded.");
                    }
                }
            }
        }
    }

    fn render_config_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Configuration");
        ui.collapsing("Query Router", |ui| {
            ui.label("Match threshold:");
            ui.add(egui::Slider::new(
                &mut self.system.router_config_mut().match_threshold,
                0.0..=100.0,
            ));
            if ui.button("Reset to Defaults").clicked() {
                *self.system.router_config_mut() = RouterConfig::default();
            }
        });
        if let Some(query) = self.last_query.clone() {
            ui.collapsing("Last Resolution", |ui| {
                ui.monospace(&query);
                let trace =
                    explain_resolution(&query, self.system.catalog(), self.system.router_config());
                for score in trace {
                    ui.horizontal(|ui| {
                        ui.label(score.category.key());
                        ui.monospace(format!("{:.1}", score.score));
                        ui.label(format!("('{}')", score.best_synonym));
                        if score.matched {
                            ui.colored_label(egui::Color32::GREEN, "match");
                        }
                    });
                }
            });
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Restaurant Analytics Dashboard");
                ui.separator();
                if ui.button("Open CSV").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("CSV files", &["csv"])
                        .pick_file()
                    {
                        self.load_dataset(path);
                        self.run_panel(self.active_panel);
                    }
                }
                if let Some(dataset) = self.dataset() {
                    if let Some(path) = &dataset.metadata().source_path {
                        ui.label(format!("File: {}", path.display()));
                    }
                }
            });
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(dataset) = self.dataset() {
                    ui.label(format!("Rows: {}", dataset.len()));
                    ui.label(format!(
                        "Loaded: {}",
                        dataset.metadata().loaded_at.format("%H:%M:%S")
                    ));
                } else {
                    ui.label("No dataset loaded");
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.toggle_value(&mut self.show_config, "Config");
                });
            });
        });

        egui::SidePanel::left("sidebar")
            .default_width(220.0)
            .show(ctx, |ui| {
                self.render_sidebar(ui);
            });

        if self.show_config {
            egui::SidePanel::right("config_panel").show(ctx, |ui| {
                self.render_config_panel(ui);
            });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(error) = &self.error_message {
                ui.colored_label(egui::Color32::RED, "Error:");
                ui.separator();
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.monospace(error);
                });
                return;
            }
            if self.dataset().is_none() {
                ui.centered_and_justified(|ui| {
                    ui.heading("Welcome to the Restaurant Analytics Dashboard\nOpen a CSV file to get started");
                });
                return;
            }
            self.render_panel_content(ui);
        });
    }
}
