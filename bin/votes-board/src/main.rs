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

//! Minimal companion dashboard: one bar chart of votes per restaurant.

use eframe::egui;
use std::path::PathBuf;

use savor::analysis::{Figure, FigureKind};
use savor::widgets;
use savor::{Dataset, DashboardError, ErrorReporter};

const DATA_PATH_CANDIDATES: [&str; 4] = [
    "Zomato data .csv",
    "data/zomato.csv",
    "data/restaurants.csv",
    "restaurants.csv",
];

fn main() -> std::result::Result<(), eframe::Error> {
    env_logger::init();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([800.0, 600.0])
            .with_title("Restaurant Votes Board"),
        ..Default::default()
    };
    eframe::run_native(
        "Restaurant Votes Board",
        options,
        Box::new(|_cc| Ok(Box::new(VotesBoardApp::new()))),
    )
}

struct VotesBoardApp {
    figure: Option<Figure>,
    error_message: Option<String>,
    reporter: ErrorReporter,
}

impl VotesBoardApp {
    fn new() -> Self {
        let mut app = Self {
            figure: None,
            error_message: None,
            reporter: ErrorReporter::new(),
        };
        if let Some(path) = DATA_PATH_CANDIDATES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
        {
            app.load(path);
        }
        app
    }

    fn load(&mut self, path: PathBuf) {
        self.error_message = None;
        self.figure = None;
        match Dataset::from_csv_file(&path) {
            Ok(dataset) => self.figure = Some(votes_figure(&dataset)),
            Err(e) => {
                let error = DashboardError::from(e);
                log::error!("failed to load '{}': {error}", path.display());
                self.error_message = Some(self.reporter.report(&error));
            }
        }
    }
}

/// Votes for every restaurant in file order, the way the source data
/// arrives; no top-N truncation here.
fn votes_figure(dataset: &Dataset) -> Figure {
    let mut labels = Vec::new();
    let mut values = Vec::new();
    for record in dataset.records() {
        if let Some(votes) = record.votes {
            labels.push(record.name.clone());
            values.push(votes as f64);
        }
    }
    Figure {
        title: "Votes for Restaurants".to_string(),
        x_label: "Restaurant Name".to_string(),
        y_label: "Votes".to_string(),
        kind: FigureKind::Bar { labels, values },
    }
}

impl eframe::App for VotesBoardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Restaurant Votes Dashboard");
            ui.separator();
            if ui.button("Open CSV").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("CSV files", &["csv"])
                    .pick_file()
                {
                    self.load(path);
                }
            }
            if let Some(error) = &self.error_message {
                ui.colored_label(egui::Color32::RED, "Error:");
                ui.monospace(error);
                return;
            }
            match &self.figure {
                Some(figure) => {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        widgets::show_figure(ui, figure, 0);
                    });
                }
                None => {
                    ui.label("Open a CSV file to see the votes chart.");
                }
            }
        });
    }
}
