//! Combat configuration loader.
//!
//! Files are partial: every key is optional and missing keys keep the value
//! of the configuration the file is applied to.
//!
//! ```toml
//! heal_threshold = 40.0
//! avoid_danger_zones = false
//! preferred_types = ["enemy_elite", "enemy"]
//!
//! [weights]
//! isolation = 0.4
//!
//! [keywords]
//! enemy = ["enemy", "hostile", "goblin"]
//! ```

use std::path::Path;

use agent_core::{CombatConfig, CombatConfigPatch};
use anyhow::Context;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat configuration overrides.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads a file and applies it over [`CombatConfig::default`].
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let mut config = CombatConfig::default();
        Self::load_patch(path)?.apply(&mut config);
        Ok(config)
    }

    /// Loads a file as a patch without applying it.
    pub fn load_patch(path: &Path) -> LoadResult<CombatConfigPatch> {
        let content = read_file(path)?;
        Self::parse_patch(&content)
            .with_context(|| format!("invalid combat config {}", path.display()))
    }

    pub fn parse_patch(content: &str) -> LoadResult<CombatConfigPatch> {
        let patch: CombatConfigPatch = toml::from_str(content)?;
        Ok(patch)
    }
}
