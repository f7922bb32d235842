// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Output path templates.
//!
//! A template is an ordinary path with `%` tokens:
//!
//! | token | value |
//! |-------|-------|
//! | `%d`  | directory of the source (`.` when there is none) |
//! | `%i`  | source file name without extension |
//! | `%e`  | source file extension |
//! | `%x` `%y` `%w` `%h` | crop rectangle in source pixels |
//! | `%r`  | rotation in degrees |
//! | `%.` `%,` | shear in x and y |
//! | `%f`  | frame number |
//! | `%%`  | a literal `%` |
//!
//! Tokens take an optional printf-style width, `%04x` zero-pads to four
//! digits and `%4x` space-pads. Unknown tokens are copied unchanged.

use crate::util::geometry::Rect;
use std::path::{Path, PathBuf};

/// Values substituted into a template.
#[derive(Debug, Clone, Copy)]
pub struct TemplateFields<'a> {
    pub source: &'a Path,
    pub rect: Rect,
    pub rotation: i32,
    pub shear: (i32, i32),
    pub frame: u32,
}

enum Value<'a> {
    Text(&'a str),
    Number(i64),
}

/// Expand `template` into an output path.
pub fn format_output_path(template: &str, fields: &TemplateFields) -> PathBuf {
    let dirname = match fields.source.parent().and_then(|p| p.to_str()) {
        Some("") | None => ".",
        Some(dir) => dir,
    };
    let stem = fields
        .source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("");
    let extension = fields
        .source
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("");

    let mut out = String::with_capacity(template.len() + 32);
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        let mut width_text = String::new();
        while let Some(&d) = chars.peek() {
            if !d.is_ascii_digit() {
                break;
            }
            width_text.push(d);
            chars.next();
        }

        let Some(token) = chars.next() else {
            out.push('%');
            out.push_str(&width_text);
            break;
        };

        let value = match token {
            'd' => Value::Text(dirname),
            'i' => Value::Text(stem),
            'e' => Value::Text(extension),
            'x' => Value::Number(fields.rect.x.into()),
            'y' => Value::Number(fields.rect.y.into()),
            'w' => Value::Number(fields.rect.width.into()),
            'h' => Value::Number(fields.rect.height.into()),
            'r' => Value::Number(fields.rotation.into()),
            '.' => Value::Number(fields.shear.0.into()),
            ',' => Value::Number(fields.shear.1.into()),
            'f' => Value::Number(fields.frame.into()),
            '%' if width_text.is_empty() => Value::Text("%"),
            other => {
                out.push('%');
                out.push_str(&width_text);
                out.push(other);
                continue;
            }
        };

        let zero_pad = width_text.starts_with('0');
        let width: usize = width_text.parse().unwrap_or(0);
        match value {
            Value::Number(n) if zero_pad => out.push_str(&format!("{:0width$}", n)),
            Value::Number(n) => out.push_str(&format!("{:>width$}", n)),
            Value::Text(s) => out.push_str(&format!("{:>width$}", s)),
        }
    }

    PathBuf::from(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(source: &Path) -> TemplateFields<'_> {
        TemplateFields {
            source,
            rect: Rect::new(100, 50, 200, 100),
            rotation: 0,
            shear: (0, 0),
            frame: 1,
        }
    }

    #[test]
    fn test_zero_padded_rectangle() {
        let source = Path::new("/a/b/img.png");
        let path = format_output_path("%d/%i_%04x_%04y_%04w_%04h.%e", &fields(source));
        assert_eq!(path, PathBuf::from("/a/b/img_0100_0050_0200_0100.png"));
    }

    #[test]
    fn test_default_image_template() {
        let source = Path::new("shots/cat.jpg");
        let mut f = fields(source);
        f.rotation = 15;
        let path = format_output_path(
            "%d/image_clipper/%i.%e_%04r_%04x_%04y_%04w_%04h.png",
            &f,
        );
        assert_eq!(
            path,
            PathBuf::from("shots/image_clipper/cat.jpg_0015_0100_0050_0200_0100.png")
        );
    }

    #[test]
    fn test_bare_file_uses_current_directory() {
        let source = Path::new("img.png");
        let path = format_output_path("%d/%i.%e", &fields(source));
        assert_eq!(path, PathBuf::from("./img.png"));
    }

    #[test]
    fn test_frame_shear_and_negative_values() {
        let source = Path::new("/v/clip.avi");
        let mut f = fields(source);
        f.frame = 42;
        f.shear = (-3, 7);
        f.rect.x = -5;
        let path = format_output_path("%i_%05f_%.x%,_%03x", &f);
        assert_eq!(path, PathBuf::from("clip_00042_-3x7_-05"));
    }

    #[test]
    fn test_space_padding_literals_and_unknown_tokens() {
        let source = Path::new("/a/b/img.png");
        let path = format_output_path("%4w|%%|%q|%3", &fields(source));
        assert_eq!(path, PathBuf::from(" 200|%|%q|%3"));
    }
}
