use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use venuecal_core::config::VenuecalConfig;
use venuecal_core::{Reconciler, ScrapeResult};

use crate::render::Render;

pub fn run(config: &VenuecalConfig, input: &Path, allow_empty: bool) -> Result<()> {
    let scrape = read_scrape(input)?;

    if scrape.events.is_empty() && !allow_empty {
        anyhow::bail!(
            "Scrape result contains no events.\n\n\
            This usually means the venue website changed its layout.\n\
            Re-run with --allow-empty to reconcile anyway."
        );
    }

    tracing::info!(
        events = scrape.events.len(),
        months = scrape.fetched_months.len(),
        "read scrape result"
    );

    let mut reconciler = Reconciler::new(config.store());
    let stats = reconciler
        .reconcile(&scrape.events, &scrape.fetched_months)
        .with_context(|| format!("Sync into {} failed", config.data_path().display()))?;

    println!("{}", stats.render());
    Ok(())
}

fn read_scrape(input: &Path) -> Result<ScrapeResult> {
    let content = if input == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Could not read scrape result from stdin")?;
        buf
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("Could not read {}", input.display()))?
    };

    parse_scrape(&content).with_context(|| format!("Invalid scrape result in {}", input.display()))
}

fn parse_scrape(content: &str) -> Result<ScrapeResult> {
    Ok(serde_json::from_str(content)?)
}
