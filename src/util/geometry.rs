// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides the integer rectangle used in display space, the
//! floating-point rotated rectangle used in source space, and the
//! transformations between the two.

/// A pixel position in display coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Point) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }

    /// Component-wise difference `self - origin`.
    pub fn delta_from(self, origin: Point) -> (i32, i32) {
        (self.x - origin.x, self.y - origin.y)
    }
}

/// An axis-aligned rectangle in display coordinates.
///
/// Width and height are kept non-negative by every mutation in the ROI
/// editor; the type itself does not enforce it so that intermediate resize
/// steps can be normalized in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Bounding box of two corner points.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// True if the point lies strictly inside, edges excluded.
    pub fn contains_strictly(&self, p: Point) -> bool {
        self.x < p.x && p.x < self.right() && self.y < p.y && p.y < self.bottom()
    }

    pub fn has_area(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// A rectangle in source coordinates rotated about its top-left corner.
///
/// `angle` is in degrees, counter-clockwise as seen on screen.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RotatedRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub angle: f32,
}

impl RotatedRect {
    pub fn from_rect(rect: Rect, angle: i32) -> Self {
        Self {
            x: rect.x as f32,
            y: rect.y as f32,
            width: rect.width as f32,
            height: rect.height as f32,
            angle: angle as f32,
        }
    }

    /// Map a display-space rectangle into source space by dividing by `scale`.
    pub fn from_display(rect: Rect, angle: i32, scale: f32) -> Self {
        let inv = 1.0 / scale;
        Self {
            x: rect.x as f32 * inv,
            y: rect.y as f32 * inv,
            width: rect.width as f32 * inv,
            height: rect.height as f32 * inv,
            angle: angle as f32,
        }
    }

    /// Nearest integer rectangle, ignoring rotation.
    pub fn rounded(&self) -> Rect {
        Rect {
            x: self.x.round() as i32,
            y: self.y.round() as i32,
            width: self.width.round() as i32,
            height: self.height.round() as i32,
        }
    }

    pub fn is_axis_aligned(&self) -> bool {
        self.angle.rem_euclid(360.0) == 0.0
    }

    /// Position of local coordinate `(u, v)` after shear and rotation.
    ///
    /// `u` runs along the width, `v` along the height. Shear offsets are
    /// fully applied at the far edges and scale linearly in between.
    pub fn map(&self, u: f32, v: f32, shear: (f32, f32)) -> (f32, f32) {
        let su = if self.height != 0.0 {
            u + shear.0 * v / self.height
        } else {
            u
        };
        let sv = if self.width != 0.0 {
            v + shear.1 * u / self.width
        } else {
            v
        };
        let (sin, cos) = self.angle.to_radians().sin_cos();
        (self.x + cos * su + sin * sv, self.y - sin * su + cos * sv)
    }

    /// Corners in drawing order: top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self, shear: (f32, f32)) -> [(f32, f32); 4] {
        [
            self.map(0.0, 0.0, shear),
            self.map(self.width, 0.0, shear),
            self.map(self.width, self.height, shear),
            self.map(0.0, self.height, shear),
        ]
    }
}

/// Wrap a rotation in degrees into `[0, 360)`.
pub fn normalize_degrees(angle: i32) -> i32 {
    angle.rem_euclid(360)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners_any_order() {
        let r = Rect::from_corners(Point::new(50, 10), Point::new(20, 40));
        assert_eq!(r, Rect::new(20, 10, 30, 30));
        let r = Rect::from_corners(Point::new(5, 5), Point::new(5, 5));
        assert_eq!(r, Rect::new(5, 5, 0, 0));
    }

    #[test]
    fn test_contains_strictly_excludes_edges() {
        let r = Rect::new(10, 10, 10, 10);
        assert!(r.contains_strictly(Point::new(15, 15)));
        assert!(!r.contains_strictly(Point::new(10, 15)));
        assert!(!r.contains_strictly(Point::new(15, 20)));
    }

    #[test]
    fn test_distance() {
        assert_eq!(Point::new(0, 0).distance(Point::new(3, 4)), 5.0);
    }

    #[test]
    fn test_scale_roundtrip_within_one_pixel() {
        for &scale in &[1.0f32, 0.5, 0.25, 0.95, 1.05 * 1.05, 0.5 * 0.95] {
            for &rect in &[Rect::new(100, 50, 200, 100), Rect::new(7, 3, 11, 13), Rect::new(0, 0, 1, 1)] {
                let source = RotatedRect::from_display(rect, 0, scale);
                let back = Rect::new(
                    (source.x * scale).round() as i32,
                    (source.y * scale).round() as i32,
                    (source.width * scale).round() as i32,
                    (source.height * scale).round() as i32,
                );
                assert!((back.x - rect.x).abs() <= 1, "scale {scale}: {back:?} vs {rect:?}");
                assert!((back.y - rect.y).abs() <= 1);
                assert!((back.width - rect.width).abs() <= 1);
                assert!((back.height - rect.height).abs() <= 1);
            }
        }
    }

    #[test]
    fn test_unit_scale_is_identity() {
        let rect = Rect::new(100, 50, 200, 100);
        assert_eq!(RotatedRect::from_display(rect, 0, 1.0).rounded(), rect);
    }

    #[test]
    fn test_corners_without_rotation() {
        let r = RotatedRect::from_rect(Rect::new(10, 20, 30, 40), 0);
        let c = r.corners((0.0, 0.0));
        assert_eq!(c[0], (10.0, 20.0));
        assert_eq!(c[2], (40.0, 60.0));
    }

    #[test]
    fn test_quarter_turn_is_counter_clockwise_on_screen() {
        let r = RotatedRect::from_rect(Rect::new(0, 0, 10, 5), 90);
        let (x, y) = r.map(10.0, 0.0, (0.0, 0.0));
        // The width axis now points up the screen.
        assert!(x.abs() < 1e-4);
        assert!((y + 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_shear_offsets_far_corners() {
        let r = RotatedRect::from_rect(Rect::new(0, 0, 10, 10), 0);
        let c = r.corners((3.0, -2.0));
        assert_eq!(c[0], (0.0, 0.0));
        assert_eq!(c[1], (10.0, -2.0));
        assert_eq!(c[3], (3.0, 10.0));
    }

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(360), 0);
        assert_eq!(normalize_degrees(-1), 359);
        assert_eq!(normalize_degrees(725), 5);
    }
}
