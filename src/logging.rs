//! Logger setup for binaries and demos embedding the explorer.
//!
//! The library itself only uses the `log` macros; nothing is printed until a
//! host installs a logger, for example with [`init_logging`].

use std::fs::File;
use std::path::Path;

use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

use crate::error::Result;

/// Install a terminal logger, and optionally a file logger, at `level`
///
/// Returns `Ok(false)` if a global logger was already installed. Fails
/// without installing anything when `log_file` cannot be created.
pub fn init_logging(level: LevelFilter, log_file: Option<&Path>) -> Result<bool> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];

    if let Some(path) = log_file {
        let file = File::create(path)?;
        loggers.push(WriteLogger::new(level, Config::default(), file));
    }

    Ok(CombinedLogger::init(loggers).is_ok())
}
