// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Marker-based watershed segmentation seeded by a circle.
//!
//! Pixels on or outside the circle are background markers, a small disk at
//! the center is the foreground marker. Unlabelled pixels are flooded in
//! order of increasing gradient magnitude, each taking the label of the
//! neighbour that reached it first. The foreground's bounding box becomes
//! the selection.

use super::geometry::{Point, Rect};
use image::{imageops, DynamicImage, RgbaImage};
use imageproc::gradients::sobel_gradients;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

const UNKNOWN: u8 = 0;
const BACKGROUND: u8 = 1;
const FOREGROUND: u8 = 2;

/// Segment the object around `center` within `radius` and return its
/// bounding box. Degenerate seeds yield an empty rectangle at the center.
pub fn segment(image: &RgbaImage, center: Point, radius: i32) -> Rect {
    let empty = Rect::new(center.x, center.y, 0, 0);
    if radius < 2 {
        return empty;
    }

    // Work only on the circle's bounding box plus a one pixel margin.
    let x0 = (center.x - radius - 1).max(0);
    let y0 = (center.y - radius - 1).max(0);
    let x1 = (center.x + radius + 2).min(image.width() as i32);
    let y1 = (center.y + radius + 2).min(image.height() as i32);
    if x1 - x0 < 3 || y1 - y0 < 3 {
        return empty;
    }
    let (width, height) = ((x1 - x0) as usize, (y1 - y0) as usize);

    let patch = imageops::crop_imm(image, x0 as u32, y0 as u32, width as u32, height as u32).to_image();
    let gray = DynamicImage::ImageRgba8(patch).to_luma8();
    let gradient = sobel_gradients(&gray);

    let seed_radius = (radius / 8).max(1) as f32;
    let mut labels = vec![UNKNOWN; width * height];
    for ly in 0..height {
        for lx in 0..width {
            let p = Point::new(x0 + lx as i32, y0 + ly as i32);
            let d = p.distance(center);
            labels[ly * width + lx] = if d >= radius as f32 {
                BACKGROUND
            } else if d <= seed_radius {
                FOREGROUND
            } else {
                UNKNOWN
            };
        }
    }
    if !labels.contains(&FOREGROUND) {
        return empty;
    }

    let mut queue = BinaryHeap::new();
    let mut order: u64 = 0;
    let mut push_neighbours = |idx: usize, label: u8, labels: &[u8], queue: &mut BinaryHeap<_>| {
        let (lx, ly) = (idx % width, idx / width);
        let neighbours = [
            (lx > 0).then(|| idx - 1),
            (lx + 1 < width).then(|| idx + 1),
            (ly > 0).then(|| idx - width),
            (ly + 1 < height).then(|| idx + width),
        ];
        for n in neighbours.into_iter().flatten() {
            if labels[n] == UNKNOWN {
                let g = gradient.get_pixel((n % width) as u32, (n / width) as u32)[0];
                queue.push(Reverse((g, order, n, label)));
                order += 1;
            }
        }
    };

    for idx in 0..labels.len() {
        if labels[idx] != UNKNOWN {
            push_neighbours(idx, labels[idx], &labels, &mut queue);
        }
    }
    while let Some(Reverse((_, _, idx, label))) = queue.pop() {
        if labels[idx] != UNKNOWN {
            continue;
        }
        labels[idx] = label;
        push_neighbours(idx, label, &labels, &mut queue);
    }

    let mut min = (i32::MAX, i32::MAX);
    let mut max = (i32::MIN, i32::MIN);
    for (idx, _) in labels.iter().enumerate().filter(|(_, l)| **l == FOREGROUND) {
        let x = x0 + (idx % width) as i32;
        let y = y0 + (idx / width) as i32;
        min = (min.0.min(x), min.1.min(y));
        max = (max.0.max(x), max.1.max(y));
    }
    Rect::new(min.0, min.1, max.0 - min.0 + 1, max.1 - min.1 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn square_on_black() -> RgbaImage {
        RgbaImage::from_fn(100, 100, |x, y| {
            if (30..50).contains(&x) && (30..50).contains(&y) {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([0, 0, 0, 255])
            }
        })
    }

    #[test]
    fn test_finds_bright_square() {
        let rect = segment(&square_on_black(), Point::new(40, 40), 25);
        assert!((rect.x - 30).abs() <= 2, "{rect:?}");
        assert!((rect.y - 30).abs() <= 2, "{rect:?}");
        assert!((rect.width - 20).abs() <= 3, "{rect:?}");
        assert!((rect.height - 20).abs() <= 3, "{rect:?}");
    }

    #[test]
    fn test_result_stays_within_circle() {
        let flat = RgbaImage::from_pixel(100, 100, Rgba([90, 90, 90, 255]));
        let rect = segment(&flat, Point::new(50, 50), 10);
        assert!(rect.x >= 40 && rect.right() <= 61, "{rect:?}");
        assert!(rect.y >= 40 && rect.bottom() <= 61, "{rect:?}");
    }

    #[test]
    fn test_degenerate_seeds() {
        let img = square_on_black();
        assert_eq!(segment(&img, Point::new(40, 40), 0), Rect::new(40, 40, 0, 0));
        assert_eq!(segment(&img, Point::new(-50, -50), 10), Rect::new(-50, -50, 0, 0));
    }
}
