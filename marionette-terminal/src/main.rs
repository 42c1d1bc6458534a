//! Marionette Terminal Viewer
//!
//! Renders the animated puppet with the terminal ASCII rasterizer.
//! Controls:
//!   - 1-5: Idle, Waving, Swimming, Somersault, Combo attack
//!   - R: Back to the rest pose
//!   - 0 / Tab: Toggle light power / cycle light kind
//!   - V: Toggle perspective and orthographic projection
//!   - C / F: Toggle back-face culling / wireframe
//!   - Arrow keys, + and -: Orbit and zoom the camera
//!   - I/K/J/L/O/P: Move the light
//!   - Q/ESC: Quit

mod cli;

use std::fs::File;

use anyhow::{Context, Result};
use clap::Parser;
use marionette_core::Config;
use marionette_terminal::TerminalApp;

use crate::cli::Cli;

fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logger. RUST_LOG, when set, takes precedence over -v and -q
    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if std::env::var_os("RUST_LOG").is_none() {
        logger.filter_level(cli.log_level());
    }
    if let Some(path) = &cli.log_file {
        let file = File::create(path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        logger.target(env_logger::Target::Pipe(Box::new(file)));
    }
    logger.init();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(mode) = cli.mode {
        config.animation.initial_mode = mode;
    }
    if let Some(fps) = cli.fps {
        config.terminal.fps = fps;
    }

    // Run the terminal app
    let mut app = TerminalApp::new(&config).context("failed to initialise the terminal")?;
    app.run().context("terminal session failed")?;

    Ok(())
}
