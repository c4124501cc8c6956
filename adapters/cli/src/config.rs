use std::{fs, path::Path};

use anyhow::{Context, Result};
use log::info;
use memory_game_core::{GameConfig, LevelCatalog, SymbolPool};

/// Loads the level table and symbol pool, falling back to the built-in set
/// when no path is provided.
pub(crate) fn load_config(path: Option<&Path>) -> Result<(LevelCatalog, SymbolPool)> {
    let config = match path {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read config at {}", path.display()))?;
            let config = parse_config(&contents)
                .with_context(|| format!("invalid config at {}", path.display()))?;
            info!("loaded config from {}", path.display());
            config
        }
        None => GameConfig::default(),
    };

    let (catalog, symbols) = config
        .validate()
        .context("game configuration failed validation")?;
    info!(
        "{} levels and {} symbols available",
        catalog.len(),
        symbols.len()
    );
    Ok((catalog, symbols))
}

fn parse_config(contents: &str) -> Result<GameConfig> {
    toml::from_str(contents).context("failed to parse config toml contents")
}
