mod cli;
mod error;
mod files;
mod loader;
mod timer;
mod ui;

use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;
use winit::event_loop::EventLoop;

use crate::cli::Cli;
use crate::error::ViewerError;
use crate::loader::ImageHandle;
use crate::ui::state::ViewerState;
use crate::ui::{initial_window_size, App};

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let message = format!("{:#}", err);
            log::error!("{}", message);
            show_error_dialog(&message);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let path = cli.initial_image()?;
    log::info!("Opening {}", path.display());

    // Decode up front: the window is sized to the image.
    let mut image = ImageHandle::from_path(&path);
    let image_size = image
        .surface()
        .context("Could not open the initial image")?
        .size();

    let event_loop = EventLoop::new()
        .map_err(|e| ViewerError::Window(format!("create event loop: {}", e)))?;

    let mut app = App::new(ViewerState::new(image), initial_window_size(image_size));
    event_loop
        .run_app(&mut app)
        .map_err(|e| ViewerError::Window(format!("run event loop: {}", e)))?;

    match app.error.take() {
        Some(err) => Err(err).context("PhotoViewer stopped"),
        None => Ok(()),
    }
}

fn show_error_dialog(message: &str) {
    let _ = rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Error)
        .set_title("PhotoViewer critical error")
        .set_description(message)
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}
