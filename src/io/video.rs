// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Video frame extraction through OpenCV.

use super::media::{absolute, Frame, MediaKind, MediaPosition, MediaSource};
use crate::error::ClipError;
use image::RgbaImage;
use opencv::{core::Mat, imgproc, prelude::*, videoio};
use std::path::{Path, PathBuf};

fn backend(e: opencv::Error) -> ClipError {
    ClipError::Video(e.to_string())
}

/// Frames decoded from a video file, addressed by 1-based frame number.
pub struct VideoSource {
    capture: videoio::VideoCapture,
    path: PathBuf,
    frame: Frame,
    frame_count: Option<usize>,
}

impl VideoSource {
    pub fn open(path: &Path, start_frame: u32) -> Result<Self, ClipError> {
        let unreadable = || ClipError::UnreadableVideo(absolute(path));
        let name = path.to_str().ok_or_else(unreadable)?;

        log::info!("Reading video {}", path.display());
        let mut capture =
            videoio::VideoCapture::from_file(name, videoio::CAP_ANY).map_err(|_| unreadable())?;
        if !capture.is_opened().map_err(backend)? {
            return Err(unreadable());
        }

        let number = start_frame.max(1);
        let image = read_at(&mut capture, number)?.ok_or_else(unreadable)?;

        let frame_count = capture
            .get(videoio::CAP_PROP_FRAME_COUNT)
            .ok()
            .filter(|n| *n > 0.0)
            .map(|n| n as usize);
        if let Some(n) = frame_count {
            log::info!("{} frames totally", n);
        }

        let source = Self {
            capture,
            path: path.to_path_buf(),
            frame: Frame {
                image,
                path: path.to_path_buf(),
                number,
            },
            frame_count,
        };
        source.log_current();
        Ok(source)
    }

    fn log_current(&self) {
        log::info!("Now showing {} {}", self.path.display(), self.frame.number);
    }
}

impl MediaSource for VideoSource {
    fn kind(&self) -> MediaKind {
        MediaKind::Video
    }

    fn current(&self) -> &Frame {
        &self.frame
    }

    fn advance(&mut self) -> Result<Option<&Frame>, ClipError> {
        match read_next(&mut self.capture)? {
            Some(image) => {
                self.frame.image = image;
                self.frame.number += 1;
                self.log_current();
                Ok(Some(&self.frame))
            }
            None => Ok(None),
        }
    }

    fn retreat(&mut self) -> Result<Option<&Frame>, ClipError> {
        if self.frame.number <= 1 {
            return Ok(None);
        }
        // Capture backends only read forward, so seek from the start.
        let number = self.frame.number - 1;
        match read_at(&mut self.capture, number)? {
            Some(image) => {
                self.frame.image = image;
                self.frame.number = number;
                self.log_current();
                Ok(Some(&self.frame))
            }
            None => Ok(None),
        }
    }

    fn position(&self) -> MediaPosition {
        MediaPosition {
            index: self.frame.number as usize,
            total: self.frame_count,
        }
    }
}

fn read_at(capture: &mut videoio::VideoCapture, number: u32) -> Result<Option<RgbaImage>, ClipError> {
    capture
        .set(videoio::CAP_PROP_POS_FRAMES, f64::from(number - 1))
        .map_err(backend)?;
    read_next(capture)
}

fn read_next(capture: &mut videoio::VideoCapture) -> Result<Option<RgbaImage>, ClipError> {
    let mut bgr = Mat::default();
    if !capture.read(&mut bgr).map_err(backend)? || bgr.empty() {
        return Ok(None);
    }
    mat_to_rgba(&bgr).map(Some)
}

fn mat_to_rgba(bgr: &Mat) -> Result<RgbaImage, ClipError> {
    let mut rgba = Mat::default();
    imgproc::cvt_color(bgr, &mut rgba, imgproc::COLOR_BGR2RGBA, 0).map_err(backend)?;
    let width = rgba.cols() as u32;
    let height = rgba.rows() as u32;
    let bytes = rgba.data_bytes().map_err(backend)?.to_vec();
    RgbaImage::from_raw(width, height, bytes)
        .ok_or_else(|| ClipError::Video("frame buffer size mismatch".to_string()))
}
