// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Clipping session state.
//!
//! This module ties the frame source, the ROI editor, display scaling and
//! export together. The window layer only forwards events here and draws
//! whatever the session exposes.

use super::editor::{DragState, PointerEvent, RoiEditor};
use super::roi::{KeyAction, Roi};
use crate::config::Settings;
use crate::error::ClipError;
use crate::io::export;
use crate::io::media::{self, Frame, MediaKind, MediaPosition, MediaSource};
use crate::render;
use image::RgbaImage;
use std::path::PathBuf;

/// A keyboard command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Edit(KeyAction),
    StepUp,
    StepDown,
    ZoomIn,
    ZoomOut,
    FitToScreen,
    Save,
    Forward,
    SaveAndForward,
    Backward,
    Quit,
}

impl Command {
    /// Key bindings. Escape maps to [`Command::Quit`] in the window layer.
    pub fn from_char(c: char) -> Option<Self> {
        let command = match c {
            's' => Self::Save,
            'f' => Self::Forward,
            ' ' => Self::SaveAndForward,
            'b' => Self::Backward,
            'q' => Self::Quit,
            '+' => Self::StepUp,
            '-' => Self::StepDown,
            ']' => Self::ZoomIn,
            '[' => Self::ZoomOut,
            other => Self::Edit(KeyAction::from_char(other)?),
        };
        Some(command)
    }
}

/// What the window should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Saved(PathBuf),
    Quit,
}

/// Everything mutated by the interactive loop.
pub struct Session {
    settings: Settings,
    source: Box<dyn MediaSource>,
    editor: RoiEditor,
    scale: f32,
    step: i32,
    display: RgbaImage,
    preview: Option<RgbaImage>,
    display_revision: u64,
    preview_revision: u64,
}

impl Session {
    /// Resolve the reference in `settings` and load its first frame.
    pub fn open(settings: Settings) -> Result<Self, ClipError> {
        let source = media::open_reference(&settings.reference, settings.frame)?;
        Ok(Self::new(source, settings))
    }

    pub fn new(source: Box<dyn MediaSource>, settings: Settings) -> Self {
        let step = settings.step.max(1);
        let mut session = Self {
            settings,
            source,
            editor: RoiEditor::new(),
            scale: 1.0,
            step,
            display: RgbaImage::new(1, 1),
            preview: None,
            display_revision: 0,
            preview_revision: 0,
        };
        session.fit_to_screen();
        session
    }

    pub fn frame(&self) -> &Frame {
        self.source.current()
    }

    pub fn display(&self) -> &RgbaImage {
        &self.display
    }

    pub fn preview(&self) -> Option<&RgbaImage> {
        self.preview.as_ref()
    }

    pub fn roi(&self) -> &Roi {
        self.editor.roi()
    }

    pub fn drag_state(&self) -> DragState {
        self.editor.state()
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn step(&self) -> i32 {
        self.step
    }

    pub fn kind(&self) -> MediaKind {
        self.source.kind()
    }

    pub fn position(&self) -> MediaPosition {
        self.source.position()
    }

    /// Bumped whenever the display image is regenerated.
    pub fn display_revision(&self) -> u64 {
        self.display_revision
    }

    /// Bumped whenever the ROI or the preview changes.
    pub fn preview_revision(&self) -> u64 {
        self.preview_revision
    }

    pub fn template(&self) -> &str {
        self.settings.template_for(self.source.kind())
    }

    /// Swap in a new frame source, keeping the selection.
    pub fn replace_source(&mut self, source: Box<dyn MediaSource>) {
        self.source = source;
        self.fit_to_screen();
    }

    pub fn pointer(&mut self, event: PointerEvent) {
        if self.editor.pointer(event, &self.display) {
            self.refresh_preview();
        }
    }

    pub fn command(&mut self, command: Command) -> Result<Outcome, ClipError> {
        log::debug!("Command {:?}", command);
        match command {
            Command::Edit(action) => {
                self.editor.key(action, self.step, &self.display);
                self.refresh_preview();
            }
            Command::StepUp => {
                self.step += 1;
                log::info!("Inc: {}", self.step);
            }
            Command::StepDown => {
                self.step = (self.step - 1).max(1);
                log::info!("Inc: {}", self.step);
            }
            Command::ZoomIn => self.zoom(render::ZOOM_IN),
            Command::ZoomOut => self.zoom(render::ZOOM_OUT),
            Command::FitToScreen => self.fit_to_screen(),
            Command::Save => {
                if let Some(path) = self.save()? {
                    return Ok(Outcome::Saved(path));
                }
            }
            Command::Forward => {
                self.forward()?;
            }
            Command::SaveAndForward => {
                let saved = self.save()?;
                match (self.forward(), saved) {
                    (Ok(_), Some(path)) => return Ok(Outcome::Saved(path)),
                    (Ok(_), None) => {}
                    (Err(e), Some(path)) if !e.is_fatal() => {
                        log::warn!("{}", e);
                        return Ok(Outcome::Saved(path));
                    }
                    (Err(e), _) => return Err(e),
                }
            }
            Command::Backward => {
                self.backward()?;
            }
            Command::Quit => return Ok(Outcome::Quit),
        }
        Ok(Outcome::Continue)
    }

    /// Export the current ROI; `None` when it has no area.
    pub fn save(&self) -> Result<Option<PathBuf>, ClipError> {
        export::save(self.frame(), self.roi(), self.scale, self.template())
    }

    /// Step to the next frame. Returns false at the end.
    pub fn forward(&mut self) -> Result<bool, ClipError> {
        let moved = self.source.advance()?.is_some();
        if moved {
            self.fit_to_screen();
        } else {
            log::debug!("No frame to move forward to");
        }
        Ok(moved)
    }

    /// Step to the previous frame. Returns false at the start.
    pub fn backward(&mut self) -> Result<bool, ClipError> {
        let moved = self.source.retreat()?.is_some();
        if moved {
            self.fit_to_screen();
        } else {
            log::debug!("No frame to move backward to");
        }
        Ok(moved)
    }

    /// Multiply the scale by `factor`.
    pub fn zoom(&mut self, factor: f32) {
        self.rescale(self.scale * factor);
    }

    /// Reset the scale so the frame fits the configured screen.
    pub fn fit_to_screen(&mut self) {
        let (scale, _) = render::fit_to_screen(self.frame().image.dimensions(), self.settings.screen);
        self.rescale(scale);
    }

    fn rescale(&mut self, scale: f32) {
        self.scale = scale;
        self.display = render::display_image(&self.source.current().image, scale);
        self.display_revision += 1;
        log::info!(
            "Scale factor changed to {} ({}x{})",
            scale,
            self.display.width(),
            self.display.height()
        );
        self.refresh_preview();
    }

    fn refresh_preview(&mut self) {
        self.preview = render::crop_preview(&self.source.current().image, self.editor.roi(), self.scale);
        self.preview_revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::editor::{PointerAction, PointerButton};
    use crate::util::geometry::{Point, Rect};
    use image::Rgba;
    use tempfile::tempdir;

    struct StubSource {
        frames: Vec<Frame>,
        cursor: usize,
        corrupt_next: bool,
    }

    impl StubSource {
        fn boxed(sizes: &[(u32, u32)], dir: &std::path::Path) -> Box<dyn MediaSource> {
            let frames = sizes
                .iter()
                .enumerate()
                .map(|(i, &(w, h))| Frame {
                    image: RgbaImage::from_fn(w, h, |x, y| Rgba([x as u8, y as u8, i as u8, 255])),
                    path: dir.join(format!("frame{}.png", i)),
                    number: i as u32 + 1,
                })
                .collect();
            Box::new(Self {
                frames,
                cursor: 0,
                corrupt_next: false,
            })
        }

        /// A source whose second frame fails to decode.
        fn corrupt(dir: &std::path::Path) -> Box<dyn MediaSource> {
            let frame = Frame {
                image: RgbaImage::from_pixel(40, 30, Rgba([9, 9, 9, 255])),
                path: dir.join("frame0.png"),
                number: 1,
            };
            Box::new(Self {
                frames: vec![frame],
                cursor: 0,
                corrupt_next: true,
            })
        }
    }

    impl MediaSource for StubSource {
        fn kind(&self) -> MediaKind {
            MediaKind::Images
        }

        fn current(&self) -> &Frame {
            &self.frames[self.cursor]
        }

        fn advance(&mut self) -> Result<Option<&Frame>, ClipError> {
            if self.corrupt_next {
                let source = image::ImageError::Decoding(image::error::DecodingError::new(
                    image::error::ImageFormatHint::Unknown,
                    "truncated",
                ));
                return Err(ClipError::Decode {
                    path: PathBuf::from("frame1.png"),
                    source,
                });
            }
            if self.cursor + 1 == self.frames.len() {
                return Ok(None);
            }
            self.cursor += 1;
            Ok(Some(&self.frames[self.cursor]))
        }

        fn retreat(&mut self) -> Result<Option<&Frame>, ClipError> {
            if self.cursor == 0 {
                return Ok(None);
            }
            self.cursor -= 1;
            Ok(Some(&self.frames[self.cursor]))
        }

        fn position(&self) -> MediaPosition {
            MediaPosition {
                index: self.cursor + 1,
                total: Some(self.frames.len()),
            }
        }
    }

    fn settings(template: &str) -> Settings {
        Settings {
            output_format: Some(template.to_string()),
            ..Settings::default()
        }
    }

    fn drag(session: &mut Session, from: (i32, i32), to: (i32, i32)) {
        let press = PointerEvent::new(
            PointerAction::Down(PointerButton::Primary),
            Point::new(from.0, from.1),
            false,
        );
        let motion = PointerEvent::new(PointerAction::Move, Point::new(to.0, to.1), false);
        let release = PointerEvent::new(
            PointerAction::Up(PointerButton::Primary),
            Point::new(to.0, to.1),
            false,
        );
        for event in [press, motion, release] {
            session.pointer(event);
        }
    }

    #[test]
    fn test_large_frame_is_fitted_on_open() {
        let dir = tempdir().unwrap();
        let session = Session::new(StubSource::boxed(&[(1920, 1080)], dir.path()), settings("%i.png"));
        assert_eq!(session.scale(), 0.5);
        assert_eq!(session.display().dimensions(), (960, 540));
    }

    #[test]
    fn test_backward_at_first_frame_is_a_no_op() {
        let dir = tempdir().unwrap();
        let mut session = Session::new(StubSource::boxed(&[(40, 30), (50, 30)], dir.path()), settings("%i.png"));
        let revision = session.display_revision();

        let outcome = session.command(Command::Backward).unwrap();
        assert_eq!(outcome, Outcome::Continue);
        assert_eq!(session.position().index, 1);
        assert_eq!(session.display_revision(), revision);
        assert_eq!(session.display().dimensions(), (40, 30));
    }

    #[test]
    fn test_forward_refits_and_keeps_region() {
        let dir = tempdir().unwrap();
        let mut session = Session::new(
            StubSource::boxed(&[(800, 600), (3000, 1000)], dir.path()),
            settings("%i.png"),
        );
        drag(&mut session, (10, 10), (60, 40));
        session.command(Command::ZoomIn).unwrap();
        assert!((session.scale() - 1.05).abs() < 1e-6);

        session.command(Command::Forward).unwrap();
        assert_eq!(session.position().index, 2);
        assert_eq!(session.scale(), 0.25);
        assert_eq!(session.display().dimensions(), (750, 250));
        assert_eq!(session.roi().region(), Rect::new(10, 10, 50, 30));

        // Past the end nothing changes.
        session.command(Command::Forward).unwrap();
        assert_eq!(session.position().index, 2);
    }

    #[test]
    fn test_step_has_floor_of_one() {
        let dir = tempdir().unwrap();
        let mut session = Session::new(StubSource::boxed(&[(40, 30)], dir.path()), settings("%i.png"));
        session.command(Command::StepDown).unwrap();
        assert_eq!(session.step(), 1);
        session.command(Command::StepUp).unwrap();
        session.command(Command::StepUp).unwrap();
        assert_eq!(session.step(), 3);

        drag(&mut session, (5, 5), (15, 15));
        session.command(Command::from_char('l').unwrap()).unwrap();
        assert_eq!(session.roi().region(), Rect::new(8, 5, 10, 10));
    }

    #[test]
    fn test_save_writes_scaled_crop() {
        let dir = tempdir().unwrap();
        let template = format!("{}/out/%i_%x_%y_%w_%h.png", dir.path().display());
        let mut session = Session::new(StubSource::boxed(&[(2000, 1000)], dir.path()), settings(&template));
        assert_eq!(session.scale(), 0.5);

        drag(&mut session, (10, 20), (40, 60));
        assert_eq!(session.preview().unwrap().dimensions(), (60, 80));

        let outcome = session.command(Command::Save).unwrap();
        let expected = dir.path().join("out").join("frame0_20_40_60_80.png");
        assert_eq!(outcome, Outcome::Saved(expected.clone()));
        assert_eq!(image::open(expected).unwrap().to_rgba8().dimensions(), (60, 80));
    }

    #[test]
    fn test_save_and_forward() {
        let dir = tempdir().unwrap();
        let template = format!("{}/%i.png", dir.path().display());
        let mut session = Session::new(StubSource::boxed(&[(40, 30), (40, 30)], dir.path()), settings(&template));

        // Nothing selected: no file, but still advances.
        assert_eq!(session.command(Command::SaveAndForward).unwrap(), Outcome::Continue);
        assert_eq!(session.position().index, 2);

        session.command(Command::Backward).unwrap();
        drag(&mut session, (0, 0), (4, 4));
        let outcome = session.command(Command::from_char(' ').unwrap()).unwrap();
        assert_eq!(outcome, Outcome::Saved(dir.path().join("frame0.png")));
        assert_eq!(session.position().index, 2);
    }

    #[test]
    fn test_unsupported_output_type_is_fatal() {
        let dir = tempdir().unwrap();
        let mut session = Session::new(StubSource::boxed(&[(40, 30)], dir.path()), settings("%i.xyz"));
        drag(&mut session, (0, 0), (4, 4));
        let err = session.command(Command::Save).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_save_is_reported_when_next_frame_is_corrupt() {
        let dir = tempdir().unwrap();
        let template = format!("{}/%i_%w_%h.png", dir.path().display());
        let mut session = Session::new(StubSource::corrupt(dir.path()), settings(&template));
        drag(&mut session, (0, 0), (10, 5));

        let outcome = session.command(Command::SaveAndForward).unwrap();
        let expected = dir.path().join("frame0_10_5.png");
        assert_eq!(outcome, Outcome::Saved(expected.clone()));
        assert!(expected.is_file());
        assert_eq!(session.position().index, 1);

        // Without a region there is nothing to report, so the error surfaces.
        let mut empty = Session::new(StubSource::corrupt(dir.path()), settings(&template));
        let err = empty.command(Command::SaveAndForward).unwrap_err();
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_quit_and_key_map() {
        let dir = tempdir().unwrap();
        let mut session = Session::new(StubSource::boxed(&[(40, 30)], dir.path()), settings("%i.png"));
        assert_eq!(session.command(Command::Quit).unwrap(), Outcome::Quit);
        assert_eq!(Command::from_char('R'), Some(Command::Edit(KeyAction::RotateClockwise)));
        assert_eq!(Command::from_char('['), Some(Command::ZoomOut));
        assert_eq!(Command::from_char('z'), None);
    }
}
