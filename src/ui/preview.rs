// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Cropped preview panel.
//!
//! This module shows the region as it will be saved, cut from the
//! full-resolution frame, together with its parameters in display and
//! source coordinates.

use crate::models::session::Session;

/// Display the cropped preview and the ROI parameters.
pub fn show(ui: &mut egui::Ui, session: &Session, texture: Option<&egui::TextureHandle>) {
    ui.heading("Cropped");
    ui.separator();

    match texture {
        Some(texture) => {
            let max = egui::vec2(ui.available_width(), ui.available_height() * 0.6);
            ui.add(
                egui::Image::new((texture.id(), texture.size_vec2()))
                    .max_size(max)
                    .maintain_aspect_ratio(true),
            );
        }
        None => {
            ui.label(egui::RichText::new("No region selected").weak().italics());
        }
    }

    ui.separator();

    let roi = session.roi();
    let region = roi.region();
    let (source, shear) = roi.to_source(session.scale());
    let source = source.rounded();

    egui::Grid::new("roi_parameters")
        .num_columns(2)
        .striped(true)
        .show(ui, |ui| {
            ui.label("Mode");
            ui.label(if roi.is_watershed() { "Watershed" } else { "Rectangle" });
            ui.end_row();

            ui.label("Display");
            ui.label(format!(
                "{}, {}  {}×{}",
                region.x, region.y, region.width, region.height
            ));
            ui.end_row();

            ui.label("Source");
            ui.label(format!(
                "{}, {}  {}×{}",
                source.x, source.y, source.width, source.height
            ));
            ui.end_row();

            ui.label("Rotation");
            ui.label(format!("{}°", roi.rotation));
            ui.end_row();

            ui.label("Shear");
            ui.label(format!("{:.0}, {:.0}", shear.0, shear.1));
            ui.end_row();

            if let Some(seed) = roi.seed() {
                ui.label("Seed");
                ui.label(format!(
                    "{}, {}  r={}",
                    seed.center.x, seed.center.y, seed.radius
                ));
                ui.end_row();
            }
        });
}
