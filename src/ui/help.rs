// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Mouse and keyboard reference.

/// Bindings as `(input, effect)` pairs.
pub const BINDINGS: &[(&str, &str)] = &[
    ("Left drag", "Select a rectangle region"),
    ("Right drag inside", "Move the rectangle or watershed marker"),
    ("Right drag outside", "Resize by dragging the nearest edges"),
    ("Middle or Shift + Left drag", "Place and size the watershed marker"),
    ("s", "Save the selected region as an image"),
    ("f", "Forward: show the next image or frame"),
    ("Space", "Save and forward"),
    ("b", "Backward"),
    ("q or Esc", "Quit"),
    ("h j k l", "Move left, down, up, right"),
    ("y u i o", "Shrink width, expand height, shrink height, expand width"),
    ("n m , .", "Shear left, down, up, right"),
    ("r / R", "Rotate counter-clockwise / clockwise"),
    ("e / E", "Expand / shrink on all sides"),
    ("+ / -", "Increase / decrease the increment step"),
    ("] / [", "Zoom in / out"),
];

/// Log the bindings once at startup.
pub fn log_usage() {
    log::info!("Application usage:");
    for (input, effect) in BINDINGS {
        log::info!("  {:<28} {}", input, effect);
    }
}

/// Show the bindings in a window.
pub fn show(ctx: &egui::Context, open: &mut bool) {
    egui::Window::new("Usage")
        .open(open)
        .resizable(false)
        .collapsible(false)
        .show(ctx, |ui| {
            egui::Grid::new("bindings").num_columns(2).striped(true).show(ui, |ui| {
                for (input, effect) in BINDINGS {
                    ui.label(egui::RichText::new(*input).monospace());
                    ui.label(*effect);
                    ui.end_row();
                }
            });
        });
}
