// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! imageclip - interactive image and video clipping
//!
//! Select a rectangular, rotated or sheared region of an image or video
//! frame with the mouse and keyboard, then save it as a new image.

mod app;
mod cli;
mod config;
mod error;
mod io;
mod models;
mod render;
mod ui;
mod util;

use anyhow::{Context, Result};
use app::ClipperApp;
use clap::{CommandFactory, Parser};
use cli::Args;
use config::Settings;
use models::session::Session;
use std::sync::mpsc::channel;

fn main() -> Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => e.exit(),
            _ => {
                let _ = e.print();
                std::process::exit(1);
            }
        },
    };

    // Initialize logging
    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let settings = Settings::load(&args).context("Failed to load settings")?;
    log::debug!("{:?}", settings);

    let session = match Session::open(settings.clone()) {
        Ok(session) => session,
        Err(e) if e.is_reference_error() => {
            log::error!("{}", e);
            eprintln!("{}", Args::command().render_usage());
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };
    let frame = session.frame();
    log::info!(
        "Loaded {} ({}x{})",
        frame.path.display(),
        frame.image.width(),
        frame.image.height()
    );
    ui::help::log_usage();

    let (width, height) = settings.screen;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width as f32, height as f32])
            .with_min_inner_size([640.0, 480.0])
            .with_title("imageclip"),
        ..Default::default()
    };

    let (sender, receiver) = channel();

    // Run the application
    eframe::run_native(
        "imageclip",
        options,
        Box::new(move |_cc| Ok(Box::new(ClipperApp::new(session, sender)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    if let Ok(error) = receiver.try_recv() {
        return Err(error);
    }

    Ok(())
}
