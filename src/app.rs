// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! The window owns a [`Session`] and forwards pointer and keyboard input to
//! it. Errors that end the session are handed back to `main` over a channel
//! so the process can exit with a failure status after the window closes.

use crate::error::ClipError;
use crate::io::media::{self, IMAGE_EXTENSIONS};
use crate::models::session::{Command, Outcome, Session};
use crate::ui::{canvas, help, preview, toolbar};
use image::RgbaImage;
use std::path::PathBuf;
use std::sync::mpsc::Sender;

/// Actions picked from the menu bar, applied after the frame is laid out.
enum MenuAction {
    OpenImage(PathBuf),
    OpenFolder(PathBuf),
    Run(Command),
    ToggleHelp,
    None,
}

/// A texture that tracks which image revision it holds.
struct CachedTexture {
    name: &'static str,
    handle: Option<egui::TextureHandle>,
    revision: Option<u64>,
}

impl CachedTexture {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            handle: None,
            revision: None,
        }
    }

    /// Upload `image` unless `revision` is already on the GPU.
    fn sync(&mut self, ctx: &egui::Context, image: Option<&RgbaImage>, revision: u64) {
        if self.revision == Some(revision) {
            return;
        }
        self.revision = Some(revision);

        let Some(image) = image else {
            self.handle = None;
            return;
        };
        let size = [image.width() as usize, image.height() as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw());
        match &mut self.handle {
            Some(handle) => handle.set(color_image, egui::TextureOptions::NEAREST),
            None => {
                self.handle = Some(ctx.load_texture(self.name, color_image, egui::TextureOptions::NEAREST));
            }
        }
    }

    fn get(&self) -> Option<&egui::TextureHandle> {
        self.handle.as_ref()
    }
}

/// Main application state.
pub struct ClipperApp {
    session: Session,

    /// Frame shown on the canvas
    display_texture: CachedTexture,

    /// Cropped region shown in the side panel
    preview_texture: CachedTexture,

    /// Where fatal errors are reported
    fatal: Sender<anyhow::Error>,

    show_help: bool,

    last_saved: Option<PathBuf>,

    closing: bool,
}

impl ClipperApp {
    pub fn new(session: Session, fatal: Sender<anyhow::Error>) -> Self {
        Self {
            session,
            display_texture: CachedTexture::new("display"),
            preview_texture: CachedTexture::new("preview"),
            fatal,
            show_help: false,
            last_saved: None,
            closing: false,
        }
    }

    /// Run a command, closing the window on quit or a fatal error.
    fn run(&mut self, ctx: &egui::Context, command: Command) {
        match self.session.command(command) {
            Ok(Outcome::Continue) => {}
            Ok(Outcome::Saved(path)) => {
                log::info!("Saved {}", path.display());
                self.last_saved = Some(path);
            }
            Ok(Outcome::Quit) => self.close(ctx),
            Err(e) => self.fail(ctx, e),
        }
    }

    fn fail(&mut self, ctx: &egui::Context, error: ClipError) {
        if !error.is_fatal() {
            log::warn!("{}", error);
            return;
        }
        log::error!("{}", error);
        let _ = self.fatal.send(error.into());
        self.close(ctx);
    }

    fn close(&mut self, ctx: &egui::Context) {
        self.closing = true;
        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }

    /// Replace the frame source with `path`. Failures here keep the
    /// current source.
    fn open(&mut self, path: PathBuf) {
        match media::open_reference(&path, 1) {
            Ok(source) => {
                log::info!("Opened {}", path.display());
                self.session.replace_source(source);
                self.last_saved = None;
            }
            Err(e) => log::error!("Failed to open {}: {}", path.display(), e),
        }
    }

    /// Commands typed this frame, in order.
    fn typed_commands(ctx: &egui::Context) -> Vec<Command> {
        if ctx.wants_keyboard_input() {
            return Vec::new();
        }
        ctx.input(|i| {
            let mut commands = Vec::new();
            for event in &i.events {
                match event {
                    egui::Event::Text(text) => {
                        commands.extend(text.chars().filter_map(Command::from_char));
                    }
                    egui::Event::Key {
                        key: egui::Key::Escape,
                        pressed: true,
                        ..
                    } => commands.push(Command::Quit),
                    _ => {}
                }
            }
            commands
        })
    }

    fn menu_bar(&self, ui: &mut egui::Ui) -> MenuAction {
        let mut action = MenuAction::None;
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Open Image...").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("Images", IMAGE_EXTENSIONS)
                        .pick_file()
                    {
                        action = MenuAction::OpenImage(path);
                    }
                    ui.close_menu();
                }
                if ui.button("Open Folder...").clicked() {
                    if let Some(path) = rfd::FileDialog::new().pick_folder() {
                        action = MenuAction::OpenFolder(path);
                    }
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("Save Region (s)").clicked() {
                    action = MenuAction::Run(Command::Save);
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("Quit (q)").clicked() {
                    action = MenuAction::Run(Command::Quit);
                    ui.close_menu();
                }
            });

            ui.menu_button("View", |ui| {
                if ui.button("Zoom In (])").clicked() {
                    action = MenuAction::Run(Command::ZoomIn);
                    ui.close_menu();
                }
                if ui.button("Zoom Out ([)").clicked() {
                    action = MenuAction::Run(Command::ZoomOut);
                    ui.close_menu();
                }
                if ui.button("Fit to Screen").clicked() {
                    action = MenuAction::Run(Command::FitToScreen);
                    ui.close_menu();
                }
            });

            ui.menu_button("Help", |ui| {
                if ui.button("Usage").clicked() {
                    action = MenuAction::ToggleHelp;
                    ui.close_menu();
                }
            });
        });
        action
    }
}

impl eframe::App for ClipperApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.closing {
            return;
        }

        // Top menu bar
        let menu_action = egui::TopBottomPanel::top("menu_bar")
            .show(ctx, |ui| self.menu_bar(ui))
            .inner;

        match menu_action {
            MenuAction::OpenImage(path) | MenuAction::OpenFolder(path) => self.open(path),
            MenuAction::Run(command) => self.run(ctx, command),
            MenuAction::ToggleHelp => self.show_help = !self.show_help,
            MenuAction::None => {}
        }

        for command in Self::typed_commands(ctx) {
            if self.closing {
                return;
            }
            self.run(ctx, command);
        }
        if self.closing {
            return;
        }

        self.display_texture.sync(
            ctx,
            Some(self.session.display()),
            self.session.display_revision(),
        );
        self.preview_texture.sync(
            ctx,
            self.session.preview(),
            self.session.preview_revision(),
        );

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            toolbar::show(ui, &self.session, self.last_saved.as_deref());
        });

        // Preview panel (right side)
        egui::SidePanel::right("preview")
            .default_width(250.0)
            .show(ctx, |ui| {
                preview::show(ui, &self.session, self.preview_texture.get());
            });

        // Main canvas (center)
        let events = egui::CentralPanel::default()
            .show(ctx, |ui| canvas::show(ui, &self.session, self.display_texture.get()))
            .inner;

        if !events.is_empty() {
            for event in events {
                self.session.pointer(event);
            }
            ctx.request_repaint();
        }

        help::show(ctx, &mut self.show_help);
    }
}
