//! `seachat init` — write a default configuration.
//!
//! - Creates `~/.seachat/config.json` (or the `--config` path) with defaults,
//!   never overwriting
//! - Creates the history directory

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use seachat_core::config::{get_config_path, save_config, Config};
use seachat_core::utils::get_data_path;

/// Run the init command.
pub fn run(config_path: Option<&Path>) -> Result<()> {
    println!();
    println!("{}", "🌊 SeaChat — Setup".cyan().bold());
    println!();

    let config_path = config_path.map_or_else(get_config_path, Path::to_path_buf);
    init_at(&config_path, &get_data_path().join("history"))?;

    println!();
    println!(
        "{}",
        "  Setup complete! Set ai.apiKey (or GEMINI_API_KEY), then run `seachat chat`.".green()
    );
    println!();

    Ok(())
}

/// Create the config file (if missing) and the history directory.
fn init_at(config_path: &Path, history_dir: &Path) -> Result<()> {
    if config_path.exists() {
        println!("  {} config already exists at {}", "✓".green(), config_path.display());
    } else {
        save_config(&Config::default(), Some(config_path))
            .with_context(|| format!("failed to write {}", config_path.display()))?;
        println!("  {} created config at {}", "✓".green(), config_path.display());
    }

    std::fs::create_dir_all(history_dir)
        .with_context(|| format!("failed to create {}", history_dir.display()))?;
    println!("  {} history dir at {}", "✓".green(), history_dir.display());

    Ok(())
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
