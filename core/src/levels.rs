use std::{collections::HashSet, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{GridSize, LevelId, SymbolKey};

/// Symbol names dealt onto cards when no custom pool is configured.
pub const STANDARD_SYMBOLS: [&str; 16] = [
    "apple",
    "banana",
    "cat",
    "dog",
    "lion",
    "tiger",
    "wolf",
    "zebra",
    "cherry",
    "grape",
    "orange1",
    "orange2",
    "peach",
    "pear",
    "watermelon",
    "strawberry",
];

/// (columns, rows, time budget in seconds, move budget) for levels 1..=6.
const STANDARD_LEVELS: [(u32, u32, u32, u32); 6] = [
    (2, 2, 30, 6),
    (4, 4, 75, 26),
    (6, 6, 150, 54),
    (8, 8, 240, 90),
    (10, 10, 360, 120),
    (12, 12, 480, 180),
];

/// Failure raised when a level lookup misses the configured catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The requested level is not part of the catalog.
    #[error("level {level} is not part of the catalog")]
    UnknownLevel {
        /// Level that was requested.
        level: LevelId,
    },
}

/// Failure raised while validating startup configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The grid of a level cannot be filled with pairs.
    #[error("level {level} has a {columns}x{rows} grid which cannot be filled with pairs")]
    InvalidLevel {
        /// Offending level.
        level: LevelId,
        /// Configured column count.
        columns: u32,
        /// Configured row count.
        rows: u32,
    },
    /// A level grants no time.
    #[error("level {level} has a zero time budget")]
    ZeroTimeBudget {
        /// Offending level.
        level: LevelId,
    },
    /// A level grants no moves.
    #[error("level {level} has a zero move budget")]
    ZeroMoveBudget {
        /// Offending level.
        level: LevelId,
    },
    /// Level identifiers must run 1, 2, 3, ... in order.
    #[error("expected level {expected} but found level {found}")]
    NonContiguousLevels {
        /// Identifier expected at this position.
        expected: LevelId,
        /// Identifier actually configured.
        found: LevelId,
    },
    /// The catalog holds no levels at all.
    #[error("the level catalog is empty")]
    NoLevels,
    /// The symbol pool holds no symbols.
    #[error("the symbol pool is empty")]
    EmptySymbolPool,
    /// A symbol appears more than once in the pool.
    #[error("symbol `{symbol}` appears more than once in the pool")]
    DuplicateSymbol {
        /// Repeated symbol.
        symbol: SymbolKey,
    },
}

/// Static parameters describing a single level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LevelDefinition {
    level: LevelId,
    grid: GridSize,
    time_budget_secs: u32,
    move_budget: u32,
}

impl LevelDefinition {
    /// Creates a new level definition.
    #[must_use]
    pub const fn new(level: LevelId, grid: GridSize, time_budget_secs: u32, move_budget: u32) -> Self {
        Self {
            level,
            grid,
            time_budget_secs,
            move_budget,
        }
    }

    /// Level identifier.
    #[must_use]
    pub const fn level(&self) -> LevelId {
        self.level
    }

    /// Board dimensions.
    #[must_use]
    pub const fn grid(&self) -> GridSize {
        self.grid
    }

    /// Time budget in whole seconds.
    #[must_use]
    pub const fn time_budget_secs(&self) -> u32 {
        self.time_budget_secs
    }

    /// Time budget as a duration.
    #[must_use]
    pub const fn time_budget(&self) -> Duration {
        Duration::from_secs(self.time_budget_secs as u64)
    }

    /// Number of pair attempts granted for the round.
    #[must_use]
    pub const fn move_budget(&self) -> u32 {
        self.move_budget
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.grid.is_pairable() {
            return Err(ConfigError::InvalidLevel {
                level: self.level,
                columns: self.grid.columns(),
                rows: self.grid.rows(),
            });
        }
        if self.time_budget_secs == 0 {
            return Err(ConfigError::ZeroTimeBudget { level: self.level });
        }
        if self.move_budget == 0 {
            return Err(ConfigError::ZeroMoveBudget { level: self.level });
        }
        Ok(())
    }
}

/// Validated mapping from level number to its definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelCatalog {
    levels: Vec<LevelDefinition>,
}

impl LevelCatalog {
    /// Validates the provided definitions and builds a catalog from them.
    ///
    /// Levels must be numbered contiguously starting at 1 and every grid must
    /// hold an even, non-zero number of cards.
    pub fn new(levels: Vec<LevelDefinition>) -> Result<Self, ConfigError> {
        if levels.is_empty() {
            return Err(ConfigError::NoLevels);
        }

        for (index, definition) in levels.iter().enumerate() {
            let expected = LevelId::new(index as u32 + 1);
            if definition.level() != expected {
                return Err(ConfigError::NonContiguousLevels {
                    expected,
                    found: definition.level(),
                });
            }
            definition.validate()?;
        }

        Ok(Self { levels })
    }

    /// Catalog holding the six built-in levels.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            levels: standard_levels(),
        }
    }

    /// Retrieves the definition configured for `level`.
    pub fn definition_for(&self, level: LevelId) -> Result<LevelDefinition, CatalogError> {
        let index = (level.get() as usize)
            .checked_sub(1)
            .ok_or(CatalogError::UnknownLevel { level })?;
        self.levels
            .get(index)
            .copied()
            .ok_or(CatalogError::UnknownLevel { level })
    }

    /// Reports whether `level` is part of the catalog.
    #[must_use]
    pub fn contains(&self, level: LevelId) -> bool {
        self.definition_for(level).is_ok()
    }

    /// Highest configured level.
    #[must_use]
    pub fn last_level(&self) -> LevelId {
        LevelId::new(self.levels.len() as u32)
    }

    /// Level following `level`, if the catalog has one.
    #[must_use]
    pub fn next_after(&self, level: LevelId) -> Option<LevelId> {
        let next = level.next();
        self.contains(next).then_some(next)
    }

    /// Iterates over every definition in level order.
    pub fn iter(&self) -> impl Iterator<Item = &LevelDefinition> {
        self.levels.iter()
    }

    /// Number of configured levels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Reports whether the catalog holds no levels. Always false once validated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl Default for LevelCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// Non-empty list of distinct symbols that boards are dealt from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolPool {
    symbols: Vec<SymbolKey>,
}

impl SymbolPool {
    /// Validates and wraps the provided symbols.
    pub fn new(symbols: Vec<SymbolKey>) -> Result<Self, ConfigError> {
        if symbols.is_empty() {
            return Err(ConfigError::EmptySymbolPool);
        }

        let mut seen = HashSet::with_capacity(symbols.len());
        for symbol in &symbols {
            if !seen.insert(symbol) {
                return Err(ConfigError::DuplicateSymbol {
                    symbol: symbol.clone(),
                });
            }
        }

        Ok(Self { symbols })
    }

    /// Pool holding the sixteen built-in symbols.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            symbols: standard_symbols(),
        }
    }

    /// Symbols in configuration order.
    #[must_use]
    pub fn as_slice(&self) -> &[SymbolKey] {
        &self.symbols
    }

    /// Number of distinct symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Reports whether the pool is empty. Always false once validated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl Default for SymbolPool {
    fn default() -> Self {
        Self::standard()
    }
}

/// Game content supplied at startup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Symbols that boards are dealt from.
    pub symbols: Vec<SymbolKey>,
    /// Level table, numbered from 1.
    pub levels: Vec<LevelDefinition>,
}

impl GameConfig {
    /// Validates the configuration and splits it into its runtime parts.
    pub fn validate(self) -> Result<(LevelCatalog, SymbolPool), ConfigError> {
        let catalog = LevelCatalog::new(self.levels)?;
        let pool = SymbolPool::new(self.symbols)?;
        Ok((catalog, pool))
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            symbols: standard_symbols(),
            levels: standard_levels(),
        }
    }
}

fn standard_symbols() -> Vec<SymbolKey> {
    STANDARD_SYMBOLS.iter().copied().map(SymbolKey::new).collect()
}

fn standard_levels() -> Vec<LevelDefinition> {
    STANDARD_LEVELS
        .iter()
        .zip(1..)
        .map(|(&(columns, rows, time, moves), level)| {
            LevelDefinition::new(
                LevelId::new(level),
                GridSize::new(columns, rows),
                time,
                moves,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{
        CatalogError, ConfigError, GameConfig, LevelCatalog, LevelDefinition, SymbolPool,
    };
    use crate::{GridSize, LevelId, SymbolKey};
    use std::time::Duration;

    #[test]
    fn standard_catalog_matches_the_level_table() {
        let catalog = LevelCatalog::standard();
        let expected = [
            (2, 30, 6),
            (4, 75, 26),
            (6, 150, 54),
            (8, 240, 90),
            (10, 360, 120),
            (12, 480, 180),
        ];

        assert_eq!(catalog.len(), 6);
        for (index, (edge, time, moves)) in expected.into_iter().enumerate() {
            let level = LevelId::new(index as u32 + 1);
            let definition = catalog.definition_for(level).expect("configured level");
            assert_eq!(definition.level(), level);
            assert_eq!(definition.grid(), GridSize::new(edge, edge));
            assert_eq!(definition.time_budget(), Duration::from_secs(time));
            assert_eq!(definition.move_budget(), moves);
        }
    }

    #[test]
    fn unknown_levels_are_rejected() {
        let catalog = LevelCatalog::standard();

        for raw in [0, 7, 99] {
            let level = LevelId::new(raw);
            assert_eq!(
                catalog.definition_for(level),
                Err(CatalogError::UnknownLevel { level })
            );
        }
    }

    #[test]
    fn next_after_stops_at_the_last_level() {
        let catalog = LevelCatalog::standard();

        assert_eq!(catalog.last_level(), LevelId::new(6));
        assert_eq!(catalog.next_after(LevelId::new(1)), Some(LevelId::new(2)));
        assert_eq!(catalog.next_after(LevelId::new(6)), None);
    }

    #[test]
    fn odd_grids_fail_validation() {
        let levels = vec![LevelDefinition::new(
            LevelId::new(1),
            GridSize::new(3, 3),
            30,
            6,
        )];

        assert_eq!(
            LevelCatalog::new(levels),
            Err(ConfigError::InvalidLevel {
                level: LevelId::new(1),
                columns: 3,
                rows: 3,
            })
        );
    }

    #[test]
    fn zero_budgets_fail_validation() {
        let no_time = vec![LevelDefinition::new(LevelId::new(1), GridSize::new(2, 2), 0, 6)];
        let no_moves = vec![LevelDefinition::new(LevelId::new(1), GridSize::new(2, 2), 30, 0)];

        assert_eq!(
            LevelCatalog::new(no_time),
            Err(ConfigError::ZeroTimeBudget {
                level: LevelId::new(1)
            })
        );
        assert_eq!(
            LevelCatalog::new(no_moves),
            Err(ConfigError::ZeroMoveBudget {
                level: LevelId::new(1)
            })
        );
    }

    #[test]
    fn gaps_in_level_numbers_fail_validation() {
        let levels = vec![
            LevelDefinition::new(LevelId::new(1), GridSize::new(2, 2), 30, 6),
            LevelDefinition::new(LevelId::new(3), GridSize::new(4, 4), 75, 26),
        ];

        assert_eq!(
            LevelCatalog::new(levels),
            Err(ConfigError::NonContiguousLevels {
                expected: LevelId::new(2),
                found: LevelId::new(3),
            })
        );
        assert_eq!(LevelCatalog::new(Vec::new()), Err(ConfigError::NoLevels));
    }

    #[test]
    fn symbol_pool_rejects_duplicates_and_emptiness() {
        assert_eq!(SymbolPool::new(Vec::new()), Err(ConfigError::EmptySymbolPool));
        assert_eq!(
            SymbolPool::new(vec![SymbolKey::new("cat"), SymbolKey::new("cat")]),
            Err(ConfigError::DuplicateSymbol {
                symbol: SymbolKey::new("cat")
            })
        );
        assert_eq!(SymbolPool::standard().len(), 16);
    }

    #[test]
    fn default_config_validates_into_standard_parts() {
        let (catalog, pool) = GameConfig::default().validate().expect("valid defaults");

        assert_eq!(catalog, LevelCatalog::standard());
        assert_eq!(pool, SymbolPool::standard());
    }

    #[test]
    fn config_parses_from_toml() {
        let source = r#"
            symbols = ["sun", "moon"]

            [[levels]]
            level = 1
            time_budget_secs = 20
            move_budget = 4
            grid = { columns = 2, rows = 2 }
        "#;

        let config: GameConfig = toml::from_str(source).expect("parse config");
        let (catalog, pool) = config.validate().expect("valid config");

        assert_eq!(pool.as_slice(), &[SymbolKey::new("sun"), SymbolKey::new("moon")]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog
                .definition_for(LevelId::new(1))
                .expect("level 1")
                .move_budget(),
            4
        );
    }

    #[test]
    fn partial_config_keeps_default_levels() {
        let config: GameConfig = toml::from_str(r#"symbols = ["a", "b", "c"]"#).expect("parse");

        assert_eq!(config.levels, GameConfig::default().levels);
    }
}
