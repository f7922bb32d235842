// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations for media, exported crops and settings files.

pub mod export;
pub mod media;
pub mod serialization;
pub mod template;
#[cfg(feature = "video-opencv")]
pub mod video;
