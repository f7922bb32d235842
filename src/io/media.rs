// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Media file loading (images and videos).
//!
//! This module resolves a command-line reference into a frame source and
//! steps through it. A directory or image file becomes a sorted listing of
//! image files; anything else is treated as a video.

use crate::error::ClipError;
use image::RgbaImage;
use std::path::{Path, PathBuf};

/// Image file extensions recognized for input listing and output.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "bmp", "dib", "jpeg", "jpg", "jpe", "png", "pbm", "pgm", "ppm", "sr", "ras", "tiff", "exr",
    "jp2",
];

/// Check the file extension against [`IMAGE_EXTENSIONS`], ignoring case.
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}

/// A full-resolution frame and where it came from.
#[derive(Debug, Clone)]
pub struct Frame {
    pub image: RgbaImage,
    /// Image file, or the video file for video frames.
    pub path: PathBuf,
    /// 1-based frame number in the source.
    pub number: u32,
}

/// Kind of reference being clipped; selects the default output template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Images,
    Video,
}

/// Cursor position for status display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaPosition {
    /// 1-based.
    pub index: usize,
    pub total: Option<usize>,
}

/// A sequence of frames with a cursor.
///
/// `advance` and `retreat` return `Ok(None)` at either end and leave the
/// cursor where it was.
pub trait MediaSource {
    fn kind(&self) -> MediaKind;
    fn current(&self) -> &Frame;
    fn advance(&mut self) -> Result<Option<&Frame>, ClipError>;
    fn retreat(&mut self) -> Result<Option<&Frame>, ClipError>;
    fn position(&self) -> MediaPosition;
}

/// Decode an image file into RGBA pixels.
pub fn load_image(path: &Path) -> Result<RgbaImage, ClipError> {
    let io_err = |source| ClipError::Io {
        path: path.to_path_buf(),
        source,
    };
    let img = image::ImageReader::open(path)
        .map_err(io_err)?
        .with_guessed_format()
        .map_err(io_err)?
        .decode()
        .map_err(|source| ClipError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(img.to_rgba8())
}

/// Image files directly under `dir`, sorted by path.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>, ClipError> {
    let entries = std::fs::read_dir(dir).map_err(|source| ClipError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && is_image_path(p))
        .collect();
    files.sort();
    Ok(files)
}

/// Frames backed by a sorted listing of image files.
pub struct DirectorySource {
    files: Vec<PathBuf>,
    cursor: usize,
    frame: Frame,
}

impl DirectorySource {
    /// Open every image in `dir`, starting at the first.
    pub fn open_dir(dir: &Path) -> Result<Self, ClipError> {
        let files = list_images(dir)?;
        if files.is_empty() {
            return Err(ClipError::EmptyDirectory(absolute(dir)));
        }
        Self::from_listing(files, 0)
    }

    /// Open the directory containing `file`, starting at `file`.
    pub fn open_at(file: &Path) -> Result<Self, ClipError> {
        if !file.is_file() {
            return Err(ClipError::ReferenceNotFound(absolute(file)));
        }
        let dir = match file.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let files = list_images(&dir)?;
        let target = absolute(file);
        let cursor = files
            .iter()
            .position(|f| absolute(f) == target)
            .unwrap_or(0);
        if files.is_empty() {
            return Err(ClipError::EmptyDirectory(absolute(&dir)));
        }
        Self::from_listing(files, cursor)
    }

    fn from_listing(files: Vec<PathBuf>, cursor: usize) -> Result<Self, ClipError> {
        let frame = Self::load(&files, cursor)?;
        log::info!("Now showing {}", frame.path.display());
        Ok(Self {
            files,
            cursor,
            frame,
        })
    }

    fn load(files: &[PathBuf], cursor: usize) -> Result<Frame, ClipError> {
        let path = files[cursor].clone();
        let image = load_image(&path)?;
        Ok(Frame {
            image,
            path,
            number: cursor as u32 + 1,
        })
    }

    fn step_to(&mut self, cursor: usize) -> Result<Option<&Frame>, ClipError> {
        // The listing may be stale, so a missing file only skips this step.
        self.frame = Self::load(&self.files, cursor).map_err(|e| match e {
            ClipError::Io { path, source } => ClipError::FrameUnreadable { path, source },
            other => other,
        })?;
        self.cursor = cursor;
        log::info!("Now showing {}", self.frame.path.display());
        Ok(Some(&self.frame))
    }
}

impl MediaSource for DirectorySource {
    fn kind(&self) -> MediaKind {
        MediaKind::Images
    }

    fn current(&self) -> &Frame {
        &self.frame
    }

    fn advance(&mut self) -> Result<Option<&Frame>, ClipError> {
        if self.cursor + 1 >= self.files.len() {
            return Ok(None);
        }
        self.step_to(self.cursor + 1)
    }

    fn retreat(&mut self) -> Result<Option<&Frame>, ClipError> {
        if self.cursor == 0 {
            return Ok(None);
        }
        self.step_to(self.cursor - 1)
    }

    fn position(&self) -> MediaPosition {
        MediaPosition {
            index: self.cursor + 1,
            total: Some(self.files.len()),
        }
    }
}

/// Resolve a reference into a frame source.
///
/// Directories and image files become a [`DirectorySource`]; any other
/// existing file is opened as a video starting at the 1-based `start_frame`.
pub fn open_reference(reference: &Path, start_frame: u32) -> Result<Box<dyn MediaSource>, ClipError> {
    if reference.is_dir() {
        log::info!("Reading directory {}", reference.display());
        return Ok(Box::new(DirectorySource::open_dir(reference)?));
    }
    if is_image_path(reference) {
        return Ok(Box::new(DirectorySource::open_at(reference)?));
    }
    if !reference.is_file() {
        return Err(ClipError::ReferenceNotFound(absolute(reference)));
    }
    open_video(reference, start_frame)
}

#[cfg(feature = "video-opencv")]
fn open_video(reference: &Path, start_frame: u32) -> Result<Box<dyn MediaSource>, ClipError> {
    Ok(Box::new(super::video::VideoSource::open(reference, start_frame)?))
}

#[cfg(not(feature = "video-opencv"))]
fn open_video(reference: &Path, _start_frame: u32) -> Result<Box<dyn MediaSource>, ClipError> {
    Err(ClipError::VideoUnsupported(absolute(reference)))
}

/// Best-effort absolute path for messages and comparisons.
pub fn absolute(path: &Path) -> PathBuf {
    std::fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
