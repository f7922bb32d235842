// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types shared by the media, export and configuration layers.

use std::path::PathBuf;

/// Failures that end the clipping session or reject a single operation.
#[derive(Debug, thiserror::Error)]
pub enum ClipError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("{} does not exist or is not readable", .0.display())]
    ReferenceNotFound(PathBuf),

    #[error("no image file exists under directory {}", .0.display())]
    EmptyDirectory(PathBuf),

    #[cfg_attr(not(feature = "video-opencv"), allow(dead_code))]
    #[error("{} was assumed to be a video, but could not be read", .0.display())]
    UnreadableVideo(PathBuf),

    #[cfg_attr(feature = "video-opencv", allow(dead_code))]
    #[error("{} is not an image; video input requires the `video-opencv` feature", .0.display())]
    VideoUnsupported(PathBuf),

    #[cfg_attr(not(feature = "video-opencv"), allow(dead_code))]
    #[error("video backend error: {0}")]
    Video(String),

    #[error("the image type {0:?} is not supported")]
    UnsupportedFormat(String),

    #[error("no encoder is available for the image type {0:?}")]
    EncoderUnavailable(String),

    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to write {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to read {}: {source}", path.display())]
    FrameUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ClipError {
    /// The reference given on the command line cannot be read.
    pub fn is_reference_error(&self) -> bool {
        matches!(
            self,
            ClipError::ReferenceNotFound(_)
                | ClipError::EmptyDirectory(_)
                | ClipError::UnreadableVideo(_)
                | ClipError::VideoUnsupported(_)
        )
    }

    /// Errors that end the process when they occur inside the interactive loop.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            ClipError::Decode { .. } | ClipError::FrameUnreadable { .. } | ClipError::Video(_)
        )
    }
}
