// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Writing the selected region to disk.

use super::media::{is_image_path, Frame};
use super::template::{format_output_path, TemplateFields};
use crate::error::ClipError;
use crate::models::roi::Roi;
use crate::util::crop;
use image::{DynamicImage, ImageFormat};
use std::path::{Path, PathBuf};

/// Output path for `roi` on `frame`, with source-space values substituted.
pub fn output_path(frame: &Frame, roi: &Roi, scale: f32, template: &str) -> PathBuf {
    let (rect, shear) = roi.to_source(scale);
    let fields = TemplateFields {
        source: &frame.path,
        rect: rect.rounded(),
        rotation: roi.rotation,
        shear: (shear.0.round() as i32, shear.1.round() as i32),
        frame: frame.number,
    };
    format_output_path(template, &fields)
}

/// Crop `roi` out of the full-resolution frame and save it.
///
/// Returns `Ok(None)` without touching the filesystem when the region has
/// no area.
pub fn save(frame: &Frame, roi: &Roi, scale: f32, template: &str) -> Result<Option<PathBuf>, ClipError> {
    if !roi.region().has_area() {
        return Ok(None);
    }

    let path = output_path(frame, roi, scale, template);
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if !is_image_path(&path) {
        return Err(ClipError::UnsupportedFormat(extension));
    }
    let format = encoder_for(&extension).ok_or_else(|| ClipError::EncoderUnavailable(extension.clone()))?;

    let (rect, shear) = roi.to_source(scale);
    let Some(cropped) = crop::crop_rotated(&frame.image, &rect, shear) else {
        return Ok(None);
    };
    log::debug!(
        "Scale factor is {}, source rect is {:.1}, {:.1}, {:.1}, {:.1}",
        scale,
        rect.x,
        rect.y,
        rect.width,
        rect.height
    );

    create_parent(&path)?;
    let rgba = DynamicImage::ImageRgba8(cropped);
    let encoded = match format {
        ImageFormat::OpenExr => DynamicImage::ImageRgb32F(rgba.to_rgb32f()),
        _ => DynamicImage::ImageRgb8(rgba.to_rgb8()),
    };
    encoded
        .save_with_format(&path, format)
        .map_err(|source| ClipError::Encode {
            path: path.clone(),
            source,
        })?;

    log::info!("Saved {}", path.display());
    Ok(Some(path))
}

/// Encoder for a supported extension; some listed types have none.
fn encoder_for(extension: &str) -> Option<ImageFormat> {
    match extension {
        "dib" => Some(ImageFormat::Bmp),
        "jpe" => Some(ImageFormat::Jpeg),
        "sr" | "ras" | "jp2" => None,
        other => ImageFormat::from_extension(other),
    }
}

fn create_parent(path: &Path) -> Result<(), ClipError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            std::fs::create_dir_all(dir).map_err(|source| ClipError::Io {
                path: dir.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}
