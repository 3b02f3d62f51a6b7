//! Init-config command implementation.

use crate::cli::InitConfigArgs;
use crate::config;
use crate::error::Result;
use crate::output::Formatter;
use std::path::Path;

/// Execute the init-config command.
pub fn execute_init_config(args: InitConfigArgs, path: &Path, formatter: &Formatter) -> Result<()> {
    config::write_default(path, args.force)?;
    println!(
        "{}",
        formatter.success(&format!("Wrote default configuration to {}", path.display()))
    );
    Ok(())
}
