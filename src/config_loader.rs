use crate::config::AnalysisConfig;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs::File;
use std::path::Path;

/// Load and parse configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<AnalysisConfig> {
    info!("Loading configuration from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open configuration '{}'", config_path.display()))?;

    let config: AnalysisConfig = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse configuration '{}'", config_path.display()))?;

    config.validate()?;

    Ok(config)
}

/// Load the configuration at `config_path`, or the defaults when no path is given
pub fn load_config_or_default(config_path: Option<&Path>) -> Result<AnalysisConfig> {
    match config_path {
        Some(path) => load_config(path),
        None => {
            info!("No configuration file given, using default thresholds");
            Ok(AnalysisConfig::default())
        }
    }
}

/// CLI arguments that override settings from the YAML file
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub locale: Option<String>,
}

/// Apply CLI overrides to a loaded configuration
pub fn apply_overrides(config: &mut AnalysisConfig, overrides: &CliOverrides) -> Result<()> {
    if let Some(locale) = &overrides.locale {
        info!("Overriding locale: {} -> {}", config.general.locale, locale);
        config.general.locale = locale.clone();
    }

    // Re-validate after applying overrides
    config.validate()?;

    Ok(())
}
