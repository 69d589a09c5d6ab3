//! Skill roster loader.
//!
//! ```toml
//! [[skill]]
//! id = "strike"
//! name = "Power Strike"
//! key = "2"
//! cooldown_ms = 6000
//! priority = 2
//!
//! [[skill]]
//! id = "cleave"
//! name = "Cleave"
//! key = "3"
//! cooldown_ms = 8000
//! is_area = true
//! min_targets = 3
//! ```

use std::collections::HashSet;
use std::path::Path;

use agent_core::Skill;
use anyhow::{Context, bail};

use crate::loaders::{LoadResult, read_file};

#[derive(serde::Deserialize)]
struct RosterFile {
    #[serde(default, rename = "skill")]
    skills: Vec<Skill>,
}

/// Loader for skill rosters.
pub struct RosterLoader;

impl RosterLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<Skill>> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("invalid skill roster {}", path.display()))
    }

    /// Parses a roster. Cooldown stamps in the file are ignored and skill ids
    /// must be unique.
    pub fn parse(content: &str) -> LoadResult<Vec<Skill>> {
        let file: RosterFile = toml::from_str(content)?;

        let mut seen = HashSet::new();
        for skill in &file.skills {
            if !seen.insert(skill.id.as_str()) {
                bail!("duplicate skill id '{}'", skill.id);
            }
        }

        Ok(file
            .skills
            .into_iter()
            .map(|skill| Skill {
                last_used_ms: None,
                ..skill
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roster_in_file_order() {
        let roster = RosterLoader::parse(
            r#"
            [[skill]]
            id = "strike"
            name = "Strike"
            key = "1"
            cooldown_ms = 1000

            [[skill]]
            id = "cleave"
            name = "Cleave"
            key = "3"
            cooldown_ms = 8000
            priority = 4
            is_area = true
            min_targets = 3
            last_used_ms = 500
            "#,
        )
        .expect("valid roster");

        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].id, "strike");
        assert_eq!(roster[1].min_targets, Some(3));
        assert!(roster[1].is_area);
        assert_eq!(roster[1].last_used_ms, None);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = RosterLoader::parse(
            r#"
            [[skill]]
            id = "strike"
            name = "Strike"
            key = "1"
            cooldown_ms = 1000

            [[skill]]
            id = "strike"
            name = "Strike again"
            key = "2"
            cooldown_ms = 1000
            "#,
        )
        .unwrap_err();

        assert!(err.to_string().contains("duplicate skill id"));
    }

    #[test]
    fn test_empty_roster() {
        assert!(RosterLoader::parse("").expect("empty roster").is_empty());
    }
}
