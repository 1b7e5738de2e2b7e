use anyhow::Result;
use owo_colors::OwoColorize;
use venuecal_core::config::VenuecalConfig;

pub fn run(config: &VenuecalConfig) -> Result<()> {
    let path = VenuecalConfig::config_path()?;
    println!("{}", format!("# {}", path.display()).dimmed());
    print!("{}", config.to_toml()?);
    println!(
        "{}",
        format!("# data path: {}", config.data_path().display()).dimmed()
    );
    Ok(())
}
