// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Command-line arguments.

use clap::Parser;
use std::path::PathBuf;

const AFTER_HELP: &str = "\
Output format expressions:
  %d  dirname of the original
  %i  filename of the original without extension
  %e  filename extension of the original
  %x  upper-left x coord     %y  upper-left y coord
  %w  width                  %h  height
  %r  rotation degree
  %.  shear deformation in x %,  shear deformation in y
  %f  frame number (video) or position in the listing (images)
Numeric fields take a width, e.g. %04x.

Supported image types:
  bmp|dib|jpeg|jpg|jpe|png|pbm|pgm|ppm|sr|ras|tiff|exr|jp2";

/// Parse a screen size given as WIDTHxHEIGHT.
fn parse_screen(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once('x')
        .ok_or_else(|| format!("Invalid screen size '{}'. Use WIDTHxHEIGHT (e.g., 1366x768)", s))?;
    let width: u32 = w
        .parse()
        .map_err(|_| format!("Invalid width '{}' in screen size", w))?;
    let height: u32 = h
        .parse()
        .map_err(|_| format!("Invalid height '{}' in screen size", h))?;
    if width == 0 || height == 0 {
        return Err("Screen width and height must be greater than 0".to_string());
    }
    Ok((width, height))
}

/// Image clipping helper: select a region with the mouse and save it.
///
/// The reference is a directory (its images are read in order), an image
/// file (reading starts at that file within its directory) or any other
/// file, which is read frame by frame as a video.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "imageclip", version, after_help = AFTER_HELP)]
pub struct Args {
    /// Directory, image or video to clip from
    #[arg(value_name = "REFERENCE", default_value = ".")]
    pub reference: PathBuf,

    /// Output file path format; shorthand for both -i and -v
    #[arg(short = 'o', long = "output_format", value_name = "FORMAT")]
    pub output_format: Option<String>,

    /// Output file path format for image inputs
    #[arg(short = 'i', long = "imgout_format", value_name = "FORMAT")]
    pub imgout_format: Option<String>,

    /// Output file path format for a video input
    #[arg(short = 'v', long = "vidout_format", value_name = "FORMAT")]
    pub vidout_format: Option<String>,

    /// Frame number of the video to start reading from
    #[arg(short = 'f', long = "frame", value_name = "N")]
    pub frame: Option<u32>,

    /// Settings file (.yaml, .yml or .json)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Screen size used to fit large images, as WIDTHxHEIGHT
    #[arg(long, value_name = "WxH", value_parser = parse_screen)]
    pub screen: Option<(u32, u32)>,

    /// Initial keyboard increment in pixels or degrees
    #[arg(long, value_name = "N")]
    pub step: Option<i32>,

    /// Log state machine transitions and key handling
    #[arg(long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["imageclip"]).unwrap();
        assert_eq!(args.reference, PathBuf::from("."));
        assert!(args.output_format.is_none());
        assert!(args.frame.is_none());
    }

    #[test]
    fn test_short_and_long_flags() {
        let args = Args::try_parse_from([
            "imageclip",
            "-o",
            "%i.png",
            "--vidout_format",
            "%f.png",
            "-f",
            "12",
            "--screen",
            "1920x1080",
            "movie.avi",
        ])
        .unwrap();
        assert_eq!(args.output_format.as_deref(), Some("%i.png"));
        assert_eq!(args.vidout_format.as_deref(), Some("%f.png"));
        assert_eq!(args.frame, Some(12));
        assert_eq!(args.screen, Some((1920, 1080)));
        assert_eq!(args.reference, PathBuf::from("movie.avi"));
    }

    #[test]
    fn test_bad_screen_is_rejected() {
        assert!(parse_screen("1920").is_err());
        assert!(parse_screen("0x10").is_err());
        assert!(parse_screen("axb").is_err());
        assert!(Args::try_parse_from(["imageclip", "--screen", "big"]).is_err());
    }
}
