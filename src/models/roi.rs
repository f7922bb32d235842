// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Region of interest data structures.
//!
//! This module defines the selection being clipped: either a rectangle
//! dragged by hand or a watershed seed whose segmentation yields the
//! rectangle, plus the rotation and shear applied to it on export.

use crate::util::geometry::{normalize_degrees, Point, Rect, RotatedRect};

/// Circle seeding the watershed tool, in display coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WatershedSeed {
    pub center: Point,
    pub radius: i32,
}

/// The selection currently in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveSelection {
    Rectangle(Rect),
    /// `region` is the bounding box of the segmented foreground.
    Watershed { seed: WatershedSeed, region: Rect },
}

/// Keyboard edits applied to the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    MoveLeft,
    MoveDown,
    MoveUp,
    MoveRight,
    ShrinkWidth,
    ExpandHeight,
    ShrinkHeight,
    ExpandWidth,
    ShearLeft,
    ShearDown,
    ShearUp,
    ShearRight,
    RotateCounterClockwise,
    RotateClockwise,
    Expand,
    Shrink,
}

impl KeyAction {
    /// Vi-style bindings: `hjkl` move, `yuio` resize, `nm,.` shear,
    /// `r`/`R` rotate, `e`/`E` expand and shrink.
    pub fn from_char(c: char) -> Option<Self> {
        let action = match c {
            'h' => Self::MoveLeft,
            'j' => Self::MoveDown,
            'k' => Self::MoveUp,
            'l' => Self::MoveRight,
            'y' => Self::ShrinkWidth,
            'u' => Self::ExpandHeight,
            'i' => Self::ShrinkHeight,
            'o' => Self::ExpandWidth,
            'n' => Self::ShearLeft,
            'm' => Self::ShearDown,
            ',' => Self::ShearUp,
            '.' => Self::ShearRight,
            'r' => Self::RotateCounterClockwise,
            'R' => Self::RotateClockwise,
            'e' => Self::Expand,
            'E' => Self::Shrink,
            _ => return None,
        };
        Some(action)
    }
}

/// Selection plus the rotation and shear applied when cropping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Roi {
    pub selection: ActiveSelection,
    /// Degrees in `[0, 360)`.
    pub rotation: i32,
    pub shear: Point,
}

impl Default for Roi {
    fn default() -> Self {
        Self {
            selection: ActiveSelection::Rectangle(Rect::default()),
            rotation: 0,
            shear: Point::default(),
        }
    }
}

impl Roi {
    /// Rectangle in display coordinates, whichever selection is active.
    pub fn region(&self) -> Rect {
        match self.selection {
            ActiveSelection::Rectangle(rect) => rect,
            ActiveSelection::Watershed { region, .. } => region,
        }
    }

    pub fn seed(&self) -> Option<WatershedSeed> {
        match self.selection {
            ActiveSelection::Watershed { seed, .. } => Some(seed),
            ActiveSelection::Rectangle(_) => None,
        }
    }

    pub fn is_watershed(&self) -> bool {
        self.seed().is_some()
    }

    pub fn clear_transform(&mut self) {
        self.rotation = 0;
        self.shear = Point::default();
    }

    /// Leave watershed mode, keeping its derived box as a plain rectangle.
    pub fn into_rectangle(&mut self) -> &mut Rect {
        if let ActiveSelection::Watershed { region, .. } = self.selection {
            self.selection = ActiveSelection::Rectangle(region);
        }
        match &mut self.selection {
            ActiveSelection::Rectangle(rect) => rect,
            ActiveSelection::Watershed { region, .. } => region,
        }
    }

    /// Source-space rectangle and shear for cropping at `scale`.
    pub fn to_source(&self, scale: f32) -> (RotatedRect, (f32, f32)) {
        let rect = RotatedRect::from_display(self.region(), self.rotation, scale);
        let shear = (self.shear.x as f32 / scale, self.shear.y as f32 / scale);
        (rect, shear)
    }

    /// Apply a keyboard edit.
    ///
    /// `bounds` is the display image size, which limits how far `Shrink`
    /// can push the origin. Returns true when a watershed seed changed and
    /// the segmentation must be recomputed.
    pub fn apply_key(&mut self, action: KeyAction, step: i32, bounds: (i32, i32)) -> bool {
        use KeyAction::*;

        match action {
            ShearLeft => self.shear.x -= step,
            ShearDown => self.shear.y += step,
            ShearUp => self.shear.y -= step,
            ShearRight => self.shear.x += step,
            RotateCounterClockwise => self.rotation = normalize_degrees(self.rotation + step),
            RotateClockwise => self.rotation = normalize_degrees(self.rotation - step),
            _ => {
                return match &mut self.selection {
                    ActiveSelection::Rectangle(rect) => {
                        edit_rect(rect, action, step, bounds);
                        false
                    }
                    ActiveSelection::Watershed { seed, .. } => {
                        edit_seed(seed, action, step);
                        true
                    }
                }
            }
        }
        false
    }
}

fn edit_rect(rect: &mut Rect, action: KeyAction, step: i32, bounds: (i32, i32)) {
    use KeyAction::*;

    match action {
        MoveLeft => rect.x -= step,
        MoveDown => rect.y += step,
        MoveUp => rect.y -= step,
        MoveRight => rect.x += step,
        ShrinkWidth => rect.width = (rect.width - step).max(0),
        ExpandHeight => rect.height += step,
        ShrinkHeight => rect.height = (rect.height - step).max(0),
        ExpandWidth => rect.width += step,
        Expand => {
            rect.x = (rect.x - step).max(0);
            rect.width += 2 * step;
            rect.y = (rect.y - step).max(0);
            rect.height += 2 * step;
        }
        Shrink => {
            rect.x = (rect.x + step).min(bounds.0);
            rect.width = (rect.width - 2 * step).max(0);
            rect.y = (rect.y + step).min(bounds.1);
            rect.height = (rect.height - 2 * step).max(0);
        }
        _ => {}
    }
}

fn edit_seed(seed: &mut WatershedSeed, action: KeyAction, step: i32) {
    use KeyAction::*;

    match action {
        MoveLeft => seed.center.x -= step,
        MoveDown => seed.center.y += step,
        MoveUp => seed.center.y -= step,
        MoveRight => seed.center.x += step,
        ExpandHeight | ExpandWidth | Expand => seed.radius += step,
        ShrinkWidth | ShrinkHeight | Shrink => seed.radius = (seed.radius - step).max(0),
        _ => {}
    }
}
