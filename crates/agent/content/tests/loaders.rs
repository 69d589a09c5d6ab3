use std::io::Write;
use std::path::PathBuf;

use agent_content::{ConfigLoader, RosterLoader, default_roster};
use agent_core::CombatConfig;

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

#[test]
fn test_shipped_roster_matches_preset() {
    let roster = RosterLoader::load(&data_dir().join("roster.toml")).expect("shipped roster loads");
    assert_eq!(roster, default_roster());
}

#[test]
fn test_shipped_config_matches_defaults() {
    let config = ConfigLoader::load(&data_dir().join("combat.toml")).expect("shipped config loads");
    assert_eq!(config, CombatConfig::default());
}

#[test]
fn test_load_partial_config_from_disk() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "kite_enabled = false\nloot_key = \"g\"").expect("write config");

    let config = ConfigLoader::load(file.path()).expect("config loads");

    assert!(!config.kite_enabled);
    assert_eq!(config.loot_key, "g");
    assert!(config.auto_loot);
}

#[test]
fn test_missing_file_names_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("absent.toml");

    let err = RosterLoader::load(&path).unwrap_err();

    assert!(format!("{err:#}").contains("absent.toml"));
}

#[test]
fn test_parse_error_names_path() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "[[skill]]\nid = 3").expect("write roster");

    let err = RosterLoader::load(file.path()).unwrap_err();

    assert!(format!("{err:#}").contains("invalid skill roster"));
}
