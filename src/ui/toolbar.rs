// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Status bar.
//!
//! This module shows which frame is loaded and the current scale,
//! increment step and interaction state.

use crate::io::media::MediaKind;
use crate::models::session::Session;
use std::path::Path;

/// Display the status bar.
pub fn show(ui: &mut egui::Ui, session: &Session, last_saved: Option<&Path>) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        let frame = session.frame();
        let name = frame
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let position = session.position();
        let label = match (session.kind(), position.total) {
            (MediaKind::Video, Some(total)) => format!("{}  frame {}/{}", name, position.index, total),
            (MediaKind::Video, None) => format!("{}  frame {}", name, position.index),
            (MediaKind::Images, Some(total)) => format!("{}  ({}/{})", name, position.index, total),
            (MediaKind::Images, None) => name,
        };
        ui.label(label);

        ui.separator();
        ui.label(format!("Scale: {:.3}", session.scale()));

        ui.separator();
        ui.label(format!("Inc: {}", session.step()));

        ui.separator();
        ui.label(format!("{:?}", session.drag_state()));

        if let Some(path) = last_saved {
            ui.separator();
            ui.label(
                egui::RichText::new(format!("Saved {}", path.display()))
                    .italics()
                    .weak(),
            );
        }
    });
}
