//! Init command implementation

use anyhow::Result;
use std::path::Path;
use threadsweep::Config;

/// Write a starter configuration file to `path`
///
/// An existing file is left alone unless `force` is set. Returns whether the
/// file was written.
pub fn run_init(path: &Path, force: bool) -> Result<bool> {
    if path.exists() && !force {
        println!(
            "📄 {} already exists (use --force to overwrite)",
            path.display()
        );
        return Ok(false);
    }

    Config::generate_default(path)?;
    println!("✅ Created configuration file: {}", path.display());
    println!("   Set server.url (and server.api_key if needed), then run threadsweep");
    Ok(true)
}
