mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Locations searched, in order, when no config path is given.
pub const DEFAULT_CONFIG_PATHS: [&str; 3] = [
    "./mediatab.toml",
    "~/.config/mediatab/config.toml",
    "/etc/mediatab/config.toml",
];

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    expand_paths(&mut config);

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    match find_config() {
        Some(path) => {
            tracing::debug!("Using config file {:?}", path);
            load_config(&path)
        }
        None => Ok(Config::default()),
    }
}

/// First existing file among [`DEFAULT_CONFIG_PATHS`].
pub fn find_config() -> Option<PathBuf> {
    DEFAULT_CONFIG_PATHS
        .iter()
        .map(|path| PathBuf::from(shellexpand::tilde(path).as_ref()))
        .find(|path| path.exists())
}

fn expand_paths(config: &mut Config) {
    if let Some(path) = &config.source.tool_path {
        let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
        config.source.tool_path = Some(PathBuf::from(expanded));
    }
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.source.chunk_size == 0 {
        anyhow::bail!("Source chunk_size cannot be 0");
    }

    if !config.source.backend.is_supported() {
        anyhow::bail!(
            "Backend {:?} is not available in this build (enable the `native` feature)",
            config.source.backend
        );
    }

    if let Some(path) = &config.source.tool_path {
        if !path.exists() {
            tracing::warn!("Configured mediainfo path does not exist: {:?}", path);
        }
    }

    if config.report.orphan_lines == OrphanLines::Collect
        && config.report.orphan_section.trim().is_empty()
    {
        anyhow::bail!("Report orphan_section cannot be empty when collecting orphan lines");
    }

    if config.report.delimiter.is_whitespace() {
        anyhow::bail!("Report delimiter cannot be whitespace");
    }

    Ok(())
}
