// src/pipeline/validate.rs

use crate::error::Result;
use crate::models::Config;

/// Validate the configuration and log a summary of it.
pub fn run_validate(config: &Config) -> Result<()> {
    log::info!("Validating configuration...");

    if let Err(e) = config.validate() {
        log::error!("Config validation failed: {}", e);
        return Err(e);
    }

    log::info!("Config OK");
    log::info!("  User agent: {}", config.fetcher.user_agent);
    log::info!("  Timeout: {}s", config.fetcher.timeout_secs);
    log::info!("  Max concurrent: {}", config.fetcher.max_concurrent);
    log::info!("  Output directory: {}", config.paths.output_dir.display());
    log::info!(
        "  Converter: {} (timeout {}s)",
        config.converter.program.display(),
        config.converter.timeout_secs
    );
    if !config.converter.program.is_file() {
        log::warn!(
            "Converter {} not found; conversions will fail",
            config.converter.program.display()
        );
    }
    log::info!("  Sources: {}", config.sources.len());
    for source in &config.sources {
        log::info!(
            "    {} ({}): limit {}, {}",
            source.id,
            source.name,
            source.fetch_limit,
            source.url
        );
    }
    Ok(())
}
