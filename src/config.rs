// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Session settings.
//!
//! Settings come from three layers: built-in defaults, an optional settings
//! file and the command line, later layers overriding earlier ones.

use crate::cli::Args;
use crate::error::ClipError;
use crate::io::media::MediaKind;
use crate::io::serialization;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default output template for image inputs.
pub const DEFAULT_IMGOUT_FORMAT: &str = "%d/image_clipper/%i.%e_%04r_%04x_%04y_%04w_%04h.png";
/// Default output template for video inputs.
pub const DEFAULT_VIDOUT_FORMAT: &str = "%d/image_clipper/%i.%e_%04f_%04r_%04x_%04y_%04w_%04h.png";
/// Screen size assumed when fitting large images.
pub const DEFAULT_SCREEN: (u32, u32) = (1366, 768);

/// Settings file contents; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub output_format: Option<String>,
    pub imgout_format: Option<String>,
    pub vidout_format: Option<String>,
    pub frame: Option<u32>,
    pub screen_width: Option<u32>,
    pub screen_height: Option<u32>,
    pub step: Option<i32>,
}

/// Fully resolved settings for one session.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub reference: PathBuf,
    /// Overrides both per-kind templates when set.
    pub output_format: Option<String>,
    pub imgout_format: String,
    pub vidout_format: String,
    /// 1-based starting frame for video input.
    pub frame: u32,
    pub screen: (u32, u32),
    pub step: i32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reference: PathBuf::from("."),
            output_format: None,
            imgout_format: DEFAULT_IMGOUT_FORMAT.to_string(),
            vidout_format: DEFAULT_VIDOUT_FORMAT.to_string(),
            frame: 1,
            screen: DEFAULT_SCREEN,
            step: 1,
        }
    }
}

impl Settings {
    /// Load the settings file named by `args`, if any, and merge.
    pub fn load(args: &Args) -> Result<Self, ClipError> {
        let file = match &args.config {
            Some(path) => serialization::import_settings(path)?,
            None => FileConfig::default(),
        };
        Self::merge(args, file)
    }

    /// Layer `file` and then `args` over the defaults.
    pub fn merge(args: &Args, file: FileConfig) -> Result<Self, ClipError> {
        let defaults = Settings::default();
        let screen_from_file = (
            file.screen_width.unwrap_or(defaults.screen.0),
            file.screen_height.unwrap_or(defaults.screen.1),
        );

        let settings = Settings {
            reference: args.reference.clone(),
            output_format: args.output_format.clone().or(file.output_format),
            imgout_format: args
                .imgout_format
                .clone()
                .or(file.imgout_format)
                .unwrap_or(defaults.imgout_format),
            vidout_format: args
                .vidout_format
                .clone()
                .or(file.vidout_format)
                .unwrap_or(defaults.vidout_format),
            frame: args.frame.or(file.frame).unwrap_or(defaults.frame),
            screen: args.screen.unwrap_or(screen_from_file),
            step: args.step.or(file.step).unwrap_or(defaults.step),
        };
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ClipError> {
        if self.frame == 0 {
            return Err(ClipError::Config("frame numbers start at 1".to_string()));
        }
        if self.step < 1 {
            return Err(ClipError::Config(format!("step must be at least 1, got {}", self.step)));
        }
        if self.screen.0 == 0 || self.screen.1 == 0 {
            return Err(ClipError::Config("screen size must be non-zero".to_string()));
        }
        Ok(())
    }

    /// Output template for the kind of media being clipped.
    pub fn template_for(&self, kind: MediaKind) -> &str {
        if let Some(format) = &self.output_format {
            return format;
        }
        match kind {
            MediaKind::Images => &self.imgout_format,
            MediaKind::Video => &self.vidout_format,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file_or_flags() {
        let settings = Settings::merge(&Args::default(), FileConfig::default()).unwrap();
        assert_eq!(settings.template_for(MediaKind::Images), DEFAULT_IMGOUT_FORMAT);
        assert_eq!(settings.template_for(MediaKind::Video), DEFAULT_VIDOUT_FORMAT);
        assert_eq!(settings.screen, DEFAULT_SCREEN);
        assert_eq!(settings.step, 1);
        assert_eq!(settings.frame, 1);
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = FileConfig {
            imgout_format: Some("file.png".to_string()),
            step: Some(3),
            screen_width: Some(2560),
            ..FileConfig::default()
        };
        let args = Args {
            step: Some(5),
            ..Args::default()
        };
        let settings = Settings::merge(&args, file).unwrap();
        assert_eq!(settings.step, 5);
        assert_eq!(settings.imgout_format, "file.png");
        assert_eq!(settings.screen, (2560, 768));
    }

    #[test]
    fn test_output_format_overrides_both_kinds() {
        let args = Args {
            output_format: Some("%i.%e".to_string()),
            imgout_format: Some("ignored.png".to_string()),
            ..Args::default()
        };
        let settings = Settings::merge(&args, FileConfig::default()).unwrap();
        assert_eq!(settings.template_for(MediaKind::Images), "%i.%e");
        assert_eq!(settings.template_for(MediaKind::Video), "%i.%e");
    }

    #[test]
    fn test_invalid_values() {
        let args = Args {
            step: Some(0),
            ..Args::default()
        };
        assert!(Settings::merge(&args, FileConfig::default()).is_err());

        let args = Args {
            frame: Some(0),
            ..Args::default()
        };
        assert!(Settings::merge(&args, FileConfig::default()).is_err());
    }
}
