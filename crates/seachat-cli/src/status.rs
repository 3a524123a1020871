//! `seachat status` — show configuration and model availability.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use seachat_core::config::{get_config_path, load_config};
use seachat_core::types::StatusSnapshot;

use crate::app::build_resolver;

/// Run the status command.
pub async fn run(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path);
    let config_path = config_path.map_or_else(get_config_path, Path::to_path_buf);

    println!();
    println!("{}", "🌊 SeaChat Status".cyan().bold());
    println!();

    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        config_path.display(),
        if config_path.exists() {
            "✓".green().to_string()
        } else {
            "(not found)".red().to_string()
        }
    );
    println!("  {:<18} {}", "API base:".bold(), config.ai.api_base);
    println!(
        "  {:<18} {}",
        "API key:".bold(),
        if config.ai.is_configured() {
            format!("{} (key set)", "✓".green())
        } else {
            format!("{}", "· not configured".dimmed())
        }
    );
    println!(
        "  {:<18} {} | cache: {}s",
        "Fallback:".bold(),
        config.ai.fallback_model,
        config.ai.cache_ttl_secs
    );
    println!(
        "  {:<18} {}",
        "Tide station:".bold(),
        config.sources.tides.station_id
    );

    println!();
    println!("  {}", "Models:".bold());

    if !config.ai.is_configured() {
        for candidate in &config.ai.candidates {
            println!(
                "    {:<24} {}",
                candidate.display_name,
                "· not probed".dimmed()
            );
        }
        println!();
        return Ok(());
    }

    let (resolver, _provider) = build_resolver(&config)?;
    let snapshot = resolver.status().await;
    print_snapshot(&snapshot, &config.ai.fallback_model);
    println!();

    Ok(())
}

fn print_snapshot(snapshot: &StatusSnapshot, fallback_model: &str) {
    for entry in &snapshot.entries {
        let state = if entry.is_available {
            format!("{} available", "✓".green())
        } else {
            format!("{} unavailable", "✗".red())
        };
        let marker = if entry.candidate.name == fallback_model {
            " (fallback)".dimmed().to_string()
        } else {
            String::new()
        };
        println!("    {:<24} {state}{marker}", entry.candidate.display_name);
    }
    let summary = format!(
        "{}/{} available · checked {}",
        snapshot.available_count(),
        snapshot.entries.len(),
        snapshot.checked_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("    {}", summary.dimmed());
}
