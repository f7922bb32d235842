// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main display of the current frame with the selection overlay.
//!
//! The canvas draws the session's display image at one point per pixel and
//! translates raw pointer input into display-space [`PointerEvent`]s.

use crate::models::editor::{PointerAction, PointerButton, PointerEvent};
use crate::models::session::Session;
use crate::util::geometry::{Point, RotatedRect};

/// Map window buttons to selection roles.
fn role(button: egui::PointerButton) -> Option<PointerButton> {
    match button {
        egui::PointerButton::Primary => Some(PointerButton::Primary),
        egui::PointerButton::Middle => Some(PointerButton::Secondary),
        egui::PointerButton::Secondary => Some(PointerButton::Tertiary),
        _ => None,
    }
}

/// Display the frame, draw the ROI and collect pointer events.
pub fn show(
    ui: &mut egui::Ui,
    session: &Session,
    texture: Option<&egui::TextureHandle>,
) -> Vec<PointerEvent> {
    let mut events = Vec::new();
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    let Some(texture) = texture else {
        ui.centered_and_justified(|ui| {
            ui.label(egui::RichText::new("Loading image...").color(egui::Color32::WHITE));
        });
        return events;
    };

    let (width, height) = session.display().dimensions();

    egui::ScrollArea::both()
        .drag_to_scroll(false)
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let size = egui::vec2(width as f32, height as f32);
            let (image_rect, _response) = ui.allocate_exact_size(size, egui::Sense::click_and_drag());

            ui.painter().image(
                texture.id(),
                image_rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );

            let points_per_pixel = image_rect.width() / width as f32;
            let to_display = |pos: egui::Pos2| {
                let rel = (pos - image_rect.min) / points_per_pixel;
                Point::new(rel.x.floor() as i32, rel.y.floor() as i32)
            };
            let to_screen = |(x, y): (f32, f32)| image_rect.min + egui::vec2(x, y) * points_per_pixel;

            let visible = ui.clip_rect().intersect(image_rect);
            ui.input(|i| {
                for event in &i.events {
                    match event {
                        egui::Event::PointerButton {
                            pos,
                            button,
                            pressed,
                            modifiers,
                            ..
                        } => {
                            let Some(button) = role(*button) else {
                                continue;
                            };
                            // Presses must start on the image; releases count anywhere.
                            if *pressed && !visible.contains(*pos) {
                                continue;
                            }
                            let action = if *pressed {
                                PointerAction::Down(button)
                            } else {
                                PointerAction::Up(button)
                            };
                            events.push(PointerEvent::new(action, to_display(*pos), modifiers.shift));
                        }
                        egui::Event::PointerMoved(pos) => {
                            let shift = i.modifiers.shift;
                            events.push(PointerEvent::new(PointerAction::Move, to_display(*pos), shift));
                        }
                        _ => {}
                    }
                }
            });

            draw_roi(ui.painter(), session, &to_screen, points_per_pixel);
        });

    events
}

/// Draw the selection quadrilateral and, in watershed mode, the seed.
fn draw_roi(
    painter: &egui::Painter,
    session: &Session,
    to_screen: &dyn Fn((f32, f32)) -> egui::Pos2,
    points_per_pixel: f32,
) {
    let roi = session.roi();

    if let Some(seed) = roi.seed() {
        let center = to_screen((seed.center.x as f32, seed.center.y as f32));
        painter.circle_stroke(
            center,
            seed.radius as f32 * points_per_pixel,
            egui::Stroke::new(1.5, egui::Color32::LIGHT_BLUE),
        );
        painter.circle_filled(center, 3.0, egui::Color32::LIGHT_BLUE);
    }

    let region = roi.region();
    if region.width == 0 && region.height == 0 {
        return;
    }
    let shear = (roi.shear.x as f32, roi.shear.y as f32);
    let corners: Vec<egui::Pos2> = RotatedRect::from_rect(region, roi.rotation)
        .corners(shear)
        .into_iter()
        .map(to_screen)
        .collect();

    painter.add(egui::Shape::closed_line(
        corners.clone(),
        egui::Stroke::new(2.0, egui::Color32::YELLOW),
    ));

    // Mark the anchor corner that rotation and shear pivot on.
    painter.circle_filled(corners[0], 4.0, egui::Color32::YELLOW);
    painter.circle_stroke(corners[0], 4.0, egui::Stroke::new(1.0, egui::Color32::BLACK));
}
