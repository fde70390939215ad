//! Configuration loading for checklist audits

mod schema;

pub use schema::{
    Config, ExportConfig, SheetNamesConfig, ThresholdsConfig, DEFAULT_CSV_FILE,
    DEFAULT_WORKBOOK_FILE,
};

use crate::catalog::Catalog;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILENAME: &str = ".auditrc.json";

/// Find and load config file with extends resolution. Searches current directory then parents.
pub fn load_config(work_dir: &Path, custom_path: Option<&Path>) -> Result<Config> {
    let path = if let Some(p) = custom_path {
        let path = if p.is_absolute() {
            p.to_path_buf()
        } else {
            work_dir.join(p)
        };
        if path.exists() {
            Some(path)
        } else {
            anyhow::bail!("Config file not found: {}", path.display());
        }
    } else {
        find_config_in_parents(work_dir)?
    };

    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            let config = load_config_with_extends(&path, &mut HashSet::new())?;
            // Surface bad thresholds at load time rather than mid-run
            config.thresholds()?;
            Ok(config)
        }
        None => Ok(Config::default()),
    }
}

/// Load a config file and resolve extends chain
fn load_config_with_extends(config_path: &Path, visited: &mut HashSet<PathBuf>) -> Result<Config> {
    // Prevent circular extends
    let canonical = config_path
        .canonicalize()
        .unwrap_or_else(|_| config_path.to_path_buf());
    if visited.contains(&canonical) {
        anyhow::bail!(
            "Circular extends detected in config: {}",
            config_path.display()
        );
    }
    visited.insert(canonical);

    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
    let mut config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in config: {}", config_path.display()))?;

    // Catalog paths are relative to the file that names them
    let config_dir = config_path.parent().unwrap_or(Path::new("."));
    if let Some(ref catalog) = config.catalog {
        let catalog_path = Path::new(catalog);
        if catalog_path.is_relative() {
            config.catalog = Some(config_dir.join(catalog_path).to_string_lossy().into_owned());
        }
    }

    // Resolve extends
    if let Some(extends) = config.extends.take() {
        let base_config = resolve_extends(config_path, &extends, visited)?;
        config.merge_from(base_config);
    }

    Ok(config)
}

/// Resolve an extends reference to a config
fn resolve_extends(
    config_path: &Path,
    extends: &str,
    visited: &mut HashSet<PathBuf>,
) -> Result<Config> {
    let config_dir = config_path.parent().unwrap_or(Path::new("."));

    let extends_path = if Path::new(extends).is_absolute() {
        PathBuf::from(extends)
    } else {
        config_dir.join(extends)
    };

    // Ensure it has .json extension
    let extends_path = if extends_path.extension().is_none() {
        extends_path.with_extension("json")
    } else {
        extends_path
    };

    if !extends_path.exists() {
        anyhow::bail!(
            "Extended config not found: {} (referenced from {})",
            extends_path.display(),
            config_path.display()
        );
    }

    load_config_with_extends(&extends_path, visited)
}

/// Search for .auditrc.json in directory and its parents
fn find_config_in_parents(mut dir: &Path) -> Result<Option<PathBuf>> {
    loop {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Ok(Some(candidate));
        }
        dir = match dir.parent() {
            Some(p) => p,
            None => return Ok(None),
        };
    }
}

/// Load the configured catalog, or the built-in one. Relative paths resolve
/// against `work_dir`.
pub fn load_catalog(config: &Config, work_dir: &Path) -> Result<Catalog> {
    match config.catalog {
        Some(ref catalog) => {
            let path = Path::new(catalog);
            let path = if path.is_absolute() {
                path.to_path_buf()
            } else {
                work_dir.join(path)
            };
            debug!(path = %path.display(), "loading catalog");
            Catalog::load(&path)
        }
        None => Ok(Catalog::builtin()),
    }
}

/// Write a starter .auditrc.json into `dir`. Refuses to overwrite.
pub fn write_default_config(dir: &Path, thresholds: ThresholdsConfig) -> Result<PathBuf> {
    let path = dir.join(CONFIG_FILENAME);
    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }
    let config = Config {
        thresholds: Some(thresholds),
        ..Config::default()
    };
    // Validate before writing
    config.thresholds()?;
    let json = serde_json::to_string_pretty(&config)?;
    fs::write(&path, json + "\n")
        .with_context(|| format!("Failed to write config: {}", path.display()))?;
    Ok(path)
}
