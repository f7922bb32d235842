// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Cropping of rotated and sheared rectangles out of a source image.

use super::geometry::RotatedRect;
use image::{imageops, Rgba, RgbaImage};
use imageproc::geometric_transformations::{warp_into_with, Interpolation};

const OUTSIDE: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Size of the crop produced for `rect`, or `None` when it has no area.
pub fn crop_size(rect: &RotatedRect) -> Option<(u32, u32)> {
    let width = rect.width.round();
    let height = rect.height.round();
    (width >= 1.0 && height >= 1.0).then_some((width as u32, height as u32))
}

/// Sample `rect` out of `source`.
///
/// Destination pixel `(u, v)` reads the source at `rect.map(u, v, shear)`.
/// Samples outside the source are black. Axis-aligned, unsheared crops on
/// whole pixels inside the image are copied without resampling.
pub fn crop_rotated(source: &RgbaImage, rect: &RotatedRect, shear: (f32, f32)) -> Option<RgbaImage> {
    let (width, height) = crop_size(rect)?;

    let integral = rect.x.fract() == 0.0 && rect.y.fract() == 0.0;
    let inside = rect.x >= 0.0
        && rect.y >= 0.0
        && rect.x as u32 + width <= source.width()
        && rect.y as u32 + height <= source.height();
    let straight = rect.is_axis_aligned() && shear == (0.0, 0.0);
    if straight && integral && inside {
        let view = imageops::crop_imm(source, rect.x as u32, rect.y as u32, width, height);
        return Some(view.to_image());
    }

    let interpolation = if straight {
        Interpolation::Nearest
    } else {
        Interpolation::Bilinear
    };
    let mut out = RgbaImage::new(width, height);
    let rect = *rect;
    warp_into_with(
        source,
        move |u, v| rect.map(u, v, shear),
        interpolation,
        OUTSIDE,
        &mut out,
    );
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::geometry::Rect;

    fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 0, 255]))
    }

    #[test]
    fn test_axis_aligned_crop_is_exact() {
        let src = gradient(64, 32);
        let rect = RotatedRect::from_rect(Rect::new(10, 5, 20, 8), 0);
        let out = crop_rotated(&src, &rect, (0.0, 0.0)).unwrap();
        assert_eq!(out.dimensions(), (20, 8));
        assert_eq!(out.get_pixel(0, 0), &Rgba([10, 5, 0, 255]));
        assert_eq!(out.get_pixel(19, 7), &Rgba([29, 12, 0, 255]));
    }

    #[test]
    fn test_zero_area_has_no_crop() {
        let src = gradient(8, 8);
        let rect = RotatedRect::from_rect(Rect::new(1, 1, 0, 5), 0);
        assert!(crop_rotated(&src, &rect, (0.0, 0.0)).is_none());
    }

    #[test]
    fn test_out_of_bounds_samples_are_black() {
        let src = RgbaImage::from_pixel(10, 10, Rgba([200, 200, 200, 255]));
        let rect = RotatedRect::from_rect(Rect::new(-5, 0, 10, 4), 0);
        let out = crop_rotated(&src, &rect, (0.0, 0.0)).unwrap();
        assert_eq!(out.dimensions(), (10, 4));
        assert_eq!(out.get_pixel(0, 0), &OUTSIDE);
        assert_eq!(out.get_pixel(8, 2), &Rgba([200, 200, 200, 255]));
    }

    #[test]
    fn test_half_turn_reads_up_and_left() {
        let src = gradient(64, 64);
        let rect = RotatedRect::from_rect(Rect::new(40, 40, 10, 10), 180);
        let out = crop_rotated(&src, &rect, (0.0, 0.0)).unwrap();
        let px = out.get_pixel(5, 5);
        // (40,40) - (5,5) after a half turn.
        assert!((px[0] as i32 - 35).abs() <= 1);
        assert!((px[1] as i32 - 35).abs() <= 1);
    }
}
