// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Pointer-driven editing of the region of interest.
//!
//! [`RoiEditor`] is a small state machine. A button press picks the
//! interaction (draw, move, resize, seed), pointer motion applies it and any
//! release returns to [`DragState::Idle`]. Keyboard edits apply regardless of
//! the pointer state.

use super::roi::{ActiveSelection, KeyAction, Roi, WatershedSeed};
use crate::util::geometry::{Point, Rect};
use crate::util::watershed;
use image::RgbaImage;

/// Pointer buttons by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Draws a rectangle (left mouse).
    Primary,
    /// Places a watershed seed (middle mouse).
    Secondary,
    /// Moves or resizes the selection (right mouse).
    Tertiary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    Down(PointerButton),
    Move,
    Up(PointerButton),
}

/// A pointer event in display coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub action: PointerAction,
    pub pos: Point,
    pub shift: bool,
}

impl PointerEvent {
    pub fn new(action: PointerAction, pos: Point, shift: bool) -> Self {
        Self { action, pos, shift }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalEdge {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalEdge {
    Top,
    Bottom,
}

/// Edges being dragged during a resize; both set means a corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Edges {
    pub horizontal: Option<HorizontalEdge>,
    pub vertical: Option<VerticalEdge>,
}

impl Edges {
    /// Edges a press at `p` grabs relative to `rect`.
    fn grabbed(rect: &Rect, p: Point) -> Self {
        let horizontal = if p.x <= rect.x {
            Some(HorizontalEdge::Left)
        } else if p.x >= rect.right() {
            Some(HorizontalEdge::Right)
        } else {
            None
        };
        let vertical = if p.y <= rect.y {
            Some(VerticalEdge::Top)
        } else if p.y >= rect.bottom() {
            Some(VerticalEdge::Bottom)
        } else {
            None
        };
        Self {
            horizontal,
            vertical,
        }
    }
}

/// Current pointer interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    DraggingRect {
        anchor: Point,
    },
    MovingRect {
        last: Point,
    },
    ResizingRect {
        edges: Edges,
        last: Point,
    },
    DraggingWatershedSeed,
    MovingWatershedSeed {
        last: Point,
    },
    ResizingWatershedSeed,
}

/// Owns the ROI and the pointer interaction mutating it.
#[derive(Debug, Clone, Default)]
pub struct RoiEditor {
    roi: Roi,
    state: DragState,
}

impl RoiEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn roi(&self) -> &Roi {
        &self.roi
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    /// Feed a pointer event. `display` is the image the watershed runs on.
    ///
    /// Returns true when the ROI changed.
    pub fn pointer(&mut self, event: PointerEvent, display: &RgbaImage) -> bool {
        let p = event.pos;
        match event.action {
            PointerAction::Down(button) => {
                self.press(button, event.shift, p);
                log::debug!("{:?} down at ({}, {}) -> {:?}", button, p.x, p.y, self.state);
                true
            }
            PointerAction::Up(_) => {
                if self.state != DragState::Idle {
                    log::debug!("Pointer released, leaving {:?}", self.state);
                }
                self.state = DragState::Idle;
                false
            }
            PointerAction::Move => self.drag(p, display),
        }
    }

    fn press(&mut self, button: PointerButton, shift: bool, p: Point) {
        match button {
            PointerButton::Primary if !shift => {
                self.roi.clear_transform();
                self.roi.into_rectangle();
                self.state = DragState::DraggingRect { anchor: p };
            }
            PointerButton::Primary | PointerButton::Secondary => {
                self.roi.clear_transform();
                let region = Rect::new(p.x, p.y, 0, 0);
                self.roi.selection = ActiveSelection::Watershed {
                    seed: WatershedSeed {
                        center: p,
                        radius: 0,
                    },
                    region,
                };
                self.state = DragState::DraggingWatershedSeed;
            }
            PointerButton::Tertiary => self.state = self.classify_adjust(p),
        }
    }

    /// Pick move or resize for a press of the adjust button.
    fn classify_adjust(&mut self, p: Point) -> DragState {
        if let Some(seed) = self.roi.seed() {
            let d = p.distance(seed.center).trunc();
            let r = seed.radius as f32;
            if r - 1.0 <= d && d <= r {
                return DragState::ResizingWatershedSeed;
            }
            if d <= r {
                return DragState::MovingWatershedSeed { last: p };
            }
        }

        let rect = *self.roi.into_rectangle();
        if rect.contains_strictly(p) {
            DragState::MovingRect { last: p }
        } else {
            DragState::ResizingRect {
                edges: Edges::grabbed(&rect, p),
                last: p,
            }
        }
    }

    fn drag(&mut self, p: Point, display: &RgbaImage) -> bool {
        match self.state {
            DragState::Idle => false,
            DragState::DraggingRect { anchor } => {
                *self.roi.into_rectangle() = Rect::from_corners(anchor, p);
                true
            }
            DragState::MovingRect { last } => {
                let (dx, dy) = p.delta_from(last);
                let rect = self.roi.into_rectangle();
                rect.x += dx;
                rect.y += dy;
                self.state = DragState::MovingRect { last: p };
                true
            }
            DragState::ResizingRect { mut edges, last } => {
                let (dx, dy) = p.delta_from(last);
                resize(self.roi.into_rectangle(), &mut edges, dx, dy);
                self.state = DragState::ResizingRect { edges, last: p };
                true
            }
            DragState::DraggingWatershedSeed | DragState::ResizingWatershedSeed => {
                self.update_seed(display, |seed| {
                    seed.radius = p.distance(seed.center) as i32;
                })
            }
            DragState::MovingWatershedSeed { last } => {
                let (dx, dy) = p.delta_from(last);
                self.state = DragState::MovingWatershedSeed { last: p };
                self.update_seed(display, |seed| {
                    seed.center.x += dx;
                    seed.center.y += dy;
                })
            }
        }
    }

    fn update_seed(&mut self, display: &RgbaImage, edit: impl FnOnce(&mut WatershedSeed)) -> bool {
        let ActiveSelection::Watershed { seed, region } = &mut self.roi.selection else {
            return false;
        };
        edit(seed);
        *region = watershed::segment(display, seed.center, seed.radius);
        true
    }

    /// Apply a keyboard edit; watershed selections are re-segmented.
    pub fn key(&mut self, action: KeyAction, step: i32, display: &RgbaImage) {
        let bounds = (display.width() as i32, display.height() as i32);
        if self.roi.apply_key(action, step, bounds) {
            self.update_seed(display, |_| {});
        }
        log::debug!("{:?} by {} -> {:?}", action, step, self.roi);
    }
}

/// Move the grabbed edges by `(dx, dy)`.
///
/// A dimension that goes negative is flipped and the opposite edge becomes
/// the grabbed one, so the drag keeps following the pointer.
fn resize(rect: &mut Rect, edges: &mut Edges, dx: i32, dy: i32) {
    match edges.horizontal {
        Some(HorizontalEdge::Left) => {
            rect.x += dx;
            rect.width -= dx;
        }
        Some(HorizontalEdge::Right) => rect.width += dx,
        None => {}
    }
    match edges.vertical {
        Some(VerticalEdge::Top) => {
            rect.y += dy;
            rect.height -= dy;
        }
        Some(VerticalEdge::Bottom) => rect.height += dy,
        None => {}
    }

    if rect.width < 0 {
        rect.x += rect.width;
        rect.width = -rect.width;
        edges.horizontal = edges.horizontal.map(|e| match e {
            HorizontalEdge::Left => HorizontalEdge::Right,
            HorizontalEdge::Right => HorizontalEdge::Left,
        });
    }
    if rect.height < 0 {
        rect.y += rect.height;
        rect.height = -rect.height;
        edges.vertical = edges.vertical.map(|e| match e {
            VerticalEdge::Top => VerticalEdge::Bottom,
            VerticalEdge::Bottom => VerticalEdge::Top,
        });
    }
}
