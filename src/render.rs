// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Display scaling and crop preview.
//!
//! Everything the window shows is derived here from the full-resolution
//! frame: the scaled display image and the cropped preview.

use crate::models::roi::Roi;
use crate::util::crop;
use image::{imageops, imageops::FilterType, RgbaImage};

/// Zoom step for the zoom-in command.
pub const ZOOM_IN: f32 = 1.05;
/// Zoom step for the zoom-out command.
pub const ZOOM_OUT: f32 = 0.95;

/// Largest power-of-two reduction that fits `size` on `screen`.
///
/// Both dimensions are halved (rounding down) until neither exceeds the
/// screen; returns the scale factor and the resulting display size.
/// `screen` must be non-zero on both axes.
pub fn fit_to_screen(size: (u32, u32), screen: (u32, u32)) -> (f32, (u32, u32)) {
    let mut scale = 1.0f32;
    let (mut width, mut height) = size;
    while width > screen.0 || height > screen.1 {
        width /= 2;
        height /= 2;
        scale /= 2.0;
    }
    (scale, display_size(size, scale))
}

/// Display size of a `size` source at `scale`, truncated and at least one
/// pixel.
pub fn display_size(size: (u32, u32), scale: f32) -> (u32, u32) {
    // Absorbs f32 error in zoom factors such as 1.05 before truncating.
    let truncate = |n: u32| ((n as f64 * scale as f64 + 1e-3).floor() as u32).max(1);
    (truncate(size.0), truncate(size.1))
}

/// Resample the source for display at `scale`.
pub fn display_image(source: &RgbaImage, scale: f32) -> RgbaImage {
    let (width, height) = display_size(source.dimensions(), scale);
    if (width, height) == source.dimensions() {
        return source.clone();
    }
    imageops::resize(source, width, height, FilterType::Triangle)
}

/// Crop of the full-resolution source under `roi`, if it has any area.
pub fn crop_preview(source: &RgbaImage, roi: &Roi, scale: f32) -> Option<RgbaImage> {
    if !roi.region().has_area() {
        return None;
    }
    let (rect, shear) = roi.to_source(scale);
    crop::crop_rotated(source, &rect, shear)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::roi::ActiveSelection;
    use crate::util::geometry::Rect;
    use image::Rgba;

    #[test]
    fn test_full_hd_on_small_laptop_screen() {
        let (scale, size) = fit_to_screen((1920, 1080), (1366, 768));
        assert_eq!(scale, 0.5);
        assert_eq!(size, (960, 540));
        assert_eq!(display_size((1920, 1080), scale), size);
    }

    #[test]
    fn test_fitting_image_keeps_unit_scale() {
        assert_eq!(fit_to_screen((800, 600), (1366, 768)), (1.0, (800, 600)));
    }

    #[test]
    fn test_repeated_halving() {
        let (scale, size) = fit_to_screen((6000, 4000), (1366, 768));
        assert_eq!(scale, 0.125);
        assert_eq!(size, (750, 500));
    }

    #[test]
    fn test_display_image_size() {
        let src = RgbaImage::from_pixel(100, 60, Rgba([1, 2, 3, 255]));
        assert_eq!(display_image(&src, 0.5).dimensions(), (50, 30));
        assert_eq!(display_image(&src, 1.05).dimensions(), (105, 63));
    }

    #[test]
    fn test_odd_sizes_truncate() {
        let (scale, size) = fit_to_screen((1921, 1081), (1366, 768));
        assert_eq!(scale, 0.5);
        assert_eq!(size, (960, 540));
        let src = RgbaImage::new(1921, 1081);
        assert_eq!(display_image(&src, scale).dimensions(), size);
        assert_eq!(display_size((101, 101), ZOOM_OUT), (95, 95));
    }

    #[test]
    fn test_thin_strip_keeps_halving() {
        let (scale, size) = fit_to_screen((4000, 1), (1366, 768));
        assert_eq!(scale, 0.25);
        assert_eq!(size, (1000, 1));
    }

    #[test]
    fn test_preview_uses_source_coordinates() {
        let src = RgbaImage::from_fn(200, 100, |x, y| Rgba([x as u8, y as u8, 0, 255]));
        let roi = Roi {
            selection: ActiveSelection::Rectangle(Rect::new(10, 5, 20, 10)),
            ..Roi::default()
        };
        let out = crop_preview(&src, &roi, 0.5).unwrap();
        assert_eq!(out.dimensions(), (40, 20));
        assert_eq!(out.get_pixel(0, 0), &Rgba([20, 10, 0, 255]));
        assert!(crop_preview(&src, &Roi::default(), 0.5).is_none());
    }
}
