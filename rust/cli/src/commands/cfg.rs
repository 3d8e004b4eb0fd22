//! Configuration command handler.
//!
//! Displays the resolved configuration with the source of each value
//! (default, file or environment).
//!
//! # Example Output
//!
//! ```json
//! {
//!   "library_path": {
//!     "value": "data/library.sqlite",
//!     "source": "default"
//!   },
//!   ...
//! }
//! ```

use crate::config;
use crate::error::CliError;
use std::io::Write;

/// Handle the cfg command.
///
/// # Errors
///
/// Returns `CliError::Config` if configuration loading fails.
/// Returns `CliError::Io` if writing to output stream fails.
pub fn handle_cfg_command(out: &mut dyn Write) -> Result<(), CliError> {
    let resolved = config::load_with_sources()
        .map_err(|e| CliError::Config(format!("Invalid configuration: {}", e)))?;

    let config::ConfigResolved { config, sources } = resolved;
    let display = serde_json::json!({
        "library_path": {
            "value": config.library_path,
            "source": sources.library_path,
        },
        "position_count": {
            "value": config.position_count,
            "source": sources.position_count,
        },
        "hero_name": {
            "value": config.hero_name,
            "source": sources.hero_name,
        }
    });
    let json_str = serde_json::to_string_pretty(&display).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}
