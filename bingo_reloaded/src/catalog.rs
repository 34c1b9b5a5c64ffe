//! Immutable game data shared by every session: task pools, card
//! definitions and settings presets.
//!
//! A catalog is loaded once (from JSON or the built-in defaults) and handed
//! to sessions as `Arc<Catalog>`.

use serde::{Deserialize, Serialize};
use std::{collections::HashMap, path::Path};
use thiserror::Error;

use crate::{
    card::{CardDefinition, TaskSource, Task},
    settings::Settings,
};

/// Catalog loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Card '{0}' is defined more than once")]
    DuplicateCard(String),

    #[error("Preset '{preset}' references unknown card '{card}'")]
    PresetCardMissing { preset: String, card: String },
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Catalog {
    /// Task pools by name
    #[serde(default)]
    pub pools: HashMap<String, Vec<Task>>,

    /// Card definitions
    #[serde(default)]
    pub cards: Vec<CardDefinition>,

    /// Settings presets by name
    #[serde(default)]
    pub presets: HashMap<String, Settings>,
}

impl Catalog {
    pub fn from_json(json: &str) -> CatalogResult<Self> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_path(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Small catalog used when no data file is configured.
    #[must_use]
    pub fn builtin() -> Self {
        let items = |names: &[&str]| names.iter().map(|n| Task::item(*n, 1)).collect::<Vec<_>>();

        let mut pools = HashMap::new();
        pools.insert(
            "overworld_easy".to_string(),
            items(&[
                "oak_log",
                "cobblestone",
                "wheat_seeds",
                "apple",
                "stick",
                "crafting_table",
                "white_wool",
                "flint",
                "sugar_cane",
                "torch",
                "coal",
                "birch_sapling",
            ]),
        );
        pools.insert(
            "overworld_hard".to_string(),
            items(&[
                "iron_ingot",
                "gold_ingot",
                "diamond",
                "obsidian",
                "lapis_lazuli",
                "redstone",
                "bucket",
                "shield",
                "book",
                "cake",
                "compass",
                "clock",
            ]),
        );
        pools.insert(
            "milestones".to_string(),
            vec![
                Task::milestone("story/mine_stone"),
                Task::milestone("story/smelt_iron"),
                Task::milestone("story/enter_the_nether"),
                Task::milestone("husbandry/plant_seed"),
            ],
        );

        let cards = vec![
            CardDefinition::new("default_card")
                .with_pool("overworld_easy", 12)
                .with_pool("overworld_hard", 10)
                .with_pool("milestones", 3),
            CardDefinition::new("easy_card").with_pool("overworld_easy", 25),
        ];

        let mut presets = HashMap::new();
        presets.insert("default".to_string(), Settings::default());

        Self {
            pools,
            cards,
            presets,
        }
    }

    /// Rejects duplicate card names and presets naming unknown cards.
    /// Cards naming unknown pools are allowed; those slots become filler.
    pub fn validate(&self) -> CatalogResult<()> {
        let mut seen = std::collections::HashSet::new();
        for card in &self.cards {
            if !seen.insert(card.name.as_str()) {
                return Err(CatalogError::DuplicateCard(card.name.clone()));
            }
            for selection in &card.pools {
                if !self.pools.contains_key(&selection.pool) {
                    log::warn!(
                        "Card '{}' draws from unknown pool '{}'",
                        card.name,
                        selection.pool
                    );
                }
            }
        }

        for (preset, settings) in &self.presets {
            if self.card(&settings.card).is_none() {
                return Err(CatalogError::PresetCardMissing {
                    preset: preset.clone(),
                    card: settings.card.clone(),
                });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn card(&self, name: &str) -> Option<&CardDefinition> {
        self.cards.iter().find(|c| c.name == name)
    }

    #[must_use]
    pub fn card_names(&self) -> Vec<&str> {
        self.cards.iter().map(|c| c.name.as_str()).collect()
    }

    /// Preset by name, falling back to the default settings.
    #[must_use]
    pub fn preset(&self, name: &str) -> Settings {
        self.presets.get(name).cloned().unwrap_or_else(|| {
            log::warn!("Settings preset '{name}' not found, using defaults");
            Settings::default()
        })
    }
}

impl TaskSource for Catalog {
    fn pool(&self, pool: &str) -> &[Task] {
        self.pools.pool(pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = Catalog::builtin();
        assert!(catalog.validate().is_ok());
        assert!(catalog.card("default_card").is_some());
        assert_eq!(catalog.preset("default"), Settings::default());
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "pools": {
                "basics": [
                    { "kind": "item", "item": "stone", "count": 3 },
                    { "kind": "item", "item": "dirt" },
                    { "kind": "milestone", "milestone": "story/root" }
                ]
            },
            "cards": [
                { "name": "basic", "pools": [ { "pool": "basics", "count": 9 } ] }
            ],
            "presets": {
                "quick": {
                    "card": "basic", "mode": "lockout", "size": 3,
                    "kit": "hardcore", "max_team_size": 2
                }
            }
        }"#;

        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.pool("basics").len(), 3);
        assert_eq!(catalog.pool("basics")[1], Task::item("dirt", 1));
        assert_eq!(catalog.preset("quick").size, crate::card::CardSize::X3);
    }

    #[test]
    fn test_preset_with_unknown_card_is_rejected() {
        let json = r#"{
            "presets": {
                "broken": {
                    "card": "nope", "mode": "regular", "size": 5,
                    "kit": "normal", "max_team_size": 4
                }
            }
        }"#;
        assert!(matches!(
            Catalog::from_json(json),
            Err(CatalogError::PresetCardMissing { .. })
        ));
    }

    #[test]
    fn test_invalid_card_size_is_rejected() {
        let json = r#"{
            "presets": {
                "tiny": {
                    "card": "x", "mode": "regular", "size": 1,
                    "kit": "normal", "max_team_size": 4
                }
            }
        }"#;
        assert!(matches!(Catalog::from_json(json), Err(CatalogError::Json(_))));
    }
}
