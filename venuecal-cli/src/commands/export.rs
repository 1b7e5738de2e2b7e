use std::path::PathBuf;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use venuecal_core::Reconciler;
use venuecal_core::config::VenuecalConfig;

pub fn run(config: &VenuecalConfig, output: Option<PathBuf>) -> Result<()> {
    let reconciler = Reconciler::new(config.store());
    let entries = reconciler.all_events()?;

    let mut json = serde_json::to_string_pretty(&entries)?;
    json.push('\n');

    match output.or_else(|| config.export_path()) {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Could not create {}", parent.display()))?;
            }
            std::fs::write(&path, json)
                .with_context(|| format!("Could not write {}", path.display()))?;
            eprintln!(
                "Exported {} events to {}",
                entries.len(),
                path.display().to_string().bold()
            );
        }
        None => print!("{json}"),
    }

    Ok(())
}
