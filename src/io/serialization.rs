// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Settings file serialization and deserialization.
//!
//! This module reads settings files in YAML and JSON formats; the format is
//! picked from the file extension.

use crate::config::FileConfig;
use crate::error::ClipError;
use std::path::Path;

fn read(path: &Path) -> Result<String, ClipError> {
    std::fs::read_to_string(path).map_err(|source| ClipError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Import settings from YAML format.
pub fn import_yaml(path: &Path) -> Result<FileConfig, ClipError> {
    let yaml = read(path)?;
    serde_yaml::from_str(&yaml)
        .map_err(|e| ClipError::Config(format!("{}: {}", path.display(), e)))
}

/// Import settings from JSON format.
pub fn import_json(path: &Path) -> Result<FileConfig, ClipError> {
    let json = read(path)?;
    serde_json::from_str(&json)
        .map_err(|e| ClipError::Config(format!("{}: {}", path.display(), e)))
}

/// Import settings, choosing the parser by extension.
pub fn import_settings(path: &Path) -> Result<FileConfig, ClipError> {
    let extension = path.extension().and_then(|s| s.to_str());
    match extension {
        Some("yaml") | Some("yml") => import_yaml(path),
        Some("json") => import_json(path),
        _ => Err(ClipError::Config(format!(
            "unsupported settings file extension: {:?}",
            extension
        ))),
    }
}
