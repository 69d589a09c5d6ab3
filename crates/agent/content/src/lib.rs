//! Skill rosters and combat configuration as data.
//!
//! This crate provides:
//! - built-in presets (a default melee roster)
//! - TOML loaders for [`CombatConfig`](agent_core::CombatConfig) overrides
//! - TOML loaders for skill rosters
//!
//! Content is handed to the runtime at startup or on reload and never mutated
//! here.

pub mod presets;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use presets::default_roster;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, LoadResult, RosterLoader};
