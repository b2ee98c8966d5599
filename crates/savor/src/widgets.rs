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

//! egui rendering of the figure data model. Everything here is a pure
//! drawing concern; the numbers arrive precomputed from
//! [`crate::analysis`].

use crate::analysis::{Analysis, BoxGroup, Figure, FigureKind, PieSlice, WordWeight};
use egui::{Align2, Color32, CornerRadius, FontId, Pos2, Rect, Sense, Shape, Stroke, Vec2};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Plot, PlotPoints, Points};

const PALETTE: [Color32; 10] = [
    Color32::from_rgb(52, 152, 219),
    Color32::from_rgb(231, 76, 60),
    Color32::from_rgb(46, 204, 113),
    Color32::from_rgb(241, 196, 15),
    Color32::from_rgb(155, 89, 182),
    Color32::from_rgb(230, 126, 34),
    Color32::from_rgb(26, 188, 156),
    Color32::from_rgb(149, 165, 166),
    Color32::from_rgb(52, 73, 94),
    Color32::from_rgb(243, 156, 18),
];

const PLOT_HEIGHT: f32 = 320.0;

fn palette_color(index: usize) -> Color32 {
    PALETTE[index % PALETTE.len()]
}

/// Show a full analysis: title, every figure, then the explanation.
pub fn show_analysis(ui: &mut egui::Ui, analysis: &Analysis) {
    ui.heading(&analysis.title);
    ui.separator();
    for (index, figure) in analysis.figures.iter().enumerate() {
        show_figure(ui, figure, index);
        ui.add_space(8.0);
    }
    ui.label(&analysis.explanation);
}

pub fn show_figure(ui: &mut egui::Ui, figure: &Figure, id_salt: usize) {
    ui.push_id(id_salt, |ui| {
        ui.strong(&figure.title);
        match &figure.kind {
            FigureKind::Bar { labels, values } => show_bar(ui, figure, labels, values),
            FigureKind::Histogram {
                edges,
                counts,
                log_x,
            } => show_histogram(ui, figure, edges, counts, *log_x),
            FigureKind::Scatter { points } => show_scatter(ui, figure, points),
            FigureKind::Pie { slices } => show_pie(ui, slices),
            FigureKind::Box { groups } => show_box(ui, figure, groups),
            FigureKind::Heatmap { labels, values } => show_heatmap(ui, labels, values),
            FigureKind::WordCloud { words } => show_word_cloud(ui, words),
        }
    });
}

fn show_bar(ui: &mut egui::Ui, figure: &Figure, labels: &[String], values: &[f64]) {
    let bars: Vec<Bar> = values
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            Bar::new(i as f64, value)
                .width(0.6)
                .name(labels.get(i).map(String::as_str).unwrap_or(""))
                .fill(palette_color(0))
        })
        .collect();
    let chart = BarChart::new(figure.y_label.clone(), bars);
    Plot::new(&figure.title)
        .height(PLOT_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
        });
    if !labels.is_empty() {
        // Long leaderboards get unreadable as a caption; hovering a bar
        // still shows its name.
        const MAX_CAPTION_LABELS: usize = 25;
        ui.horizontal_wrapped(|ui| {
            ui.label(format!("{}: ", figure.x_label));
            for (i, label) in labels.iter().take(MAX_CAPTION_LABELS).enumerate() {
                ui.label(format!("{}. {label}", i + 1));
            }
            if labels.len() > MAX_CAPTION_LABELS {
                ui.label(format!("... and {} more", labels.len() - MAX_CAPTION_LABELS));
            }
        });
    }
}

fn show_histogram(ui: &mut egui::Ui, figure: &Figure, edges: &[f64], counts: &[usize], log_x: bool) {
    let bars: Vec<Bar> = counts
        .iter()
        .enumerate()
        .map(|(i, &count)| {
            let center = (edges[i] + edges[i + 1]) / 2.0;
            let width = edges[i + 1] - edges[i];
            let label = if log_x {
                format!(
                    "{:.0}..{:.0}",
                    10f64.powf(edges[i]),
                    10f64.powf(edges[i + 1])
                )
            } else {
                format!("{:.1}..{:.1}", edges[i], edges[i + 1])
            };
            Bar::new(center, count as f64)
                .width(width * 0.95)
                .name(label)
                .fill(palette_color(0))
        })
        .collect();
    let chart = BarChart::new(figure.y_label.clone(), bars);
    Plot::new(&figure.title)
        .height(PLOT_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
        });
    ui.small(format!("{} / {}", figure.x_label, figure.y_label));
}

fn show_scatter(ui: &mut egui::Ui, figure: &Figure, points: &[[f64; 2]]) {
    let plot_points = PlotPoints::from(points.to_vec());
    let markers = Points::new(figure.title.clone(), plot_points)
        .radius(2.0)
        .color(palette_color(1));
    Plot::new(&figure.title)
        .height(PLOT_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.points(markers);
        });
    ui.small(format!("{} / {}", figure.x_label, figure.y_label));
}

fn show_box(ui: &mut egui::Ui, figure: &Figure, groups: &[BoxGroup]) {
    let elems: Vec<BoxElem> = groups
        .iter()
        .enumerate()
        .map(|(i, group)| {
            BoxElem::new(
                i as f64,
                BoxSpread::new(group.min, group.q1, group.median, group.q3, group.max),
            )
            .name(format!("{} (n={})", group.label, group.count))
            .fill(palette_color(i))
        })
        .collect();
    let plot = BoxPlot::new(figure.y_label.clone(), elems);
    Plot::new(&figure.title)
        .height(PLOT_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.box_plot(plot);
        });
    ui.horizontal_wrapped(|ui| {
        ui.label(format!("{}: ", figure.x_label));
        for (i, group) in groups.iter().enumerate() {
            ui.colored_label(palette_color(i), format!("{}. {}", i + 1, group.label));
        }
    });
}

fn show_pie(ui: &mut egui::Ui, slices: &[PieSlice]) {
    let total: usize = slices.iter().map(|s| s.count).sum();
    if total == 0 {
        ui.label("No data");
        return;
    }
    let (response, painter) =
        ui.allocate_painter(Vec2::new(PLOT_HEIGHT, PLOT_HEIGHT), Sense::hover());
    let rect = response.rect;
    let center = rect.center();
    let radius = rect.width().min(rect.height()) * 0.45;
    let mut start_angle = -std::f64::consts::FRAC_PI_2;
    for (i, slice) in slices.iter().enumerate() {
        let sweep = slice.count as f64 / total as f64 * std::f64::consts::TAU;
        let end_angle = start_angle + sweep;
        let mut points = vec![center];
        let steps = ((sweep / std::f64::consts::TAU * 64.0).ceil() as usize).max(2);
        for step in 0..=steps {
            let angle = start_angle + sweep * step as f64 / steps as f64;
            points.push(Pos2::new(
                center.x + radius * angle.cos() as f32,
                center.y + radius * angle.sin() as f32,
            ));
        }
        painter.add(Shape::convex_polygon(
            points,
            palette_color(i),
            Stroke::new(1.0, Color32::WHITE),
        ));
        start_angle = end_angle;
    }
    ui.horizontal_wrapped(|ui| {
        for (i, slice) in slices.iter().enumerate() {
            let share = slice.count as f64 / total as f64 * 100.0;
            ui.colored_label(
                palette_color(i),
                format!("■ {} ({share:.1}%)", slice.label),
            );
        }
    });
}

fn heatmap_color(value: f64) -> Color32 {
    if value.is_nan() {
        return Color32::from_gray(60);
    }
    // -1 -> blue, 0 -> white, +1 -> red
    let clamped = value.clamp(-1.0, 1.0);
    if clamped >= 0.0 {
        let t = clamped as f32;
        Color32::from_rgb(
            255,
            (255.0 * (1.0 - t * 0.7)) as u8,
            (255.0 * (1.0 - t * 0.8)) as u8,
        )
    } else {
        let t = (-clamped) as f32;
        Color32::from_rgb(
            (255.0 * (1.0 - t * 0.8)) as u8,
            (255.0 * (1.0 - t * 0.6)) as u8,
            255,
        )
    }
}

fn show_heatmap(ui: &mut egui::Ui, labels: &[String], values: &[Vec<f64>]) {
    let n = labels.len();
    if n == 0 {
        ui.label("No data");
        return;
    }
    let cell = 90.0f32;
    let margin = 80.0f32;
    let size = Vec2::new(margin + cell * n as f32, margin + cell * n as f32);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let origin = response.rect.min;
    for (i, row) in values.iter().enumerate() {
        for (j, &value) in row.iter().enumerate() {
            let min = Pos2::new(
                origin.x + margin + cell * j as f32,
                origin.y + margin + cell * i as f32,
            );
            let rect = Rect::from_min_size(min, Vec2::splat(cell - 2.0));
            painter.rect_filled(rect, CornerRadius::ZERO, heatmap_color(value));
            let text = if value.is_nan() {
                "nan".to_string()
            } else {
                format!("{value:.2}")
            };
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                text,
                FontId::proportional(14.0),
                Color32::BLACK,
            );
        }
    }
    for (i, label) in labels.iter().enumerate() {
        // column headers
        painter.text(
            Pos2::new(
                origin.x + margin + cell * i as f32 + cell / 2.0,
                origin.y + margin / 2.0,
            ),
            Align2::CENTER_CENTER,
            label,
            FontId::proportional(14.0),
            ui.visuals().text_color(),
        );
        // row headers
        painter.text(
            Pos2::new(
                origin.x + margin / 2.0,
                origin.y + margin + cell * i as f32 + cell / 2.0,
            ),
            Align2::CENTER_CENTER,
            label,
            FontId::proportional(14.0),
            ui.visuals().text_color(),
        );
    }
}

fn show_word_cloud(ui: &mut egui::Ui, words: &[WordWeight]) {
    let max_count = words.iter().map(|w| w.count).max().unwrap_or(1).max(1);
    ui.horizontal_wrapped(|ui| {
        for (i, word) in words.iter().enumerate() {
            let weight = word.count as f32 / max_count as f32;
            let size = 12.0 + 26.0 * weight;
            ui.label(
                egui::RichText::new(&word.word)
                    .size(size)
                    .color(palette_color(i)),
            )
            .on_hover_text(format!("{} occurrences", word.count));
        }
    });
}
