//! Integration tests for gamebox packages.
//!
//! These tests exercise a gamebox end to end through the public API:
//! - Identifier assignment and persistence
//! - Cache invalidation with `refresh()`
//! - Target symlink, configuration file and cover art round trips
//! - Game info persistence across re-opens
//!
//! Run with: `cargo test --test gamebox_integration`

use std::fs;
use std::path::{Path, PathBuf};

use image::{DynamicImage, Rgba, RgbaImage};
use tempfile::TempDir;

use gamebox::package::{
    executables_digest, GameIdentifierType, GameInfoValue, GAME_IDENTIFIER_KEY,
};
use gamebox::{Gamebox, GameboxConfig, GameboxError};

// ============================================================================
// Helper Functions
// ============================================================================

/// Build a gamebox laid out like a typical installed DOS game.
fn build_keen_gamebox(parent: &Path) -> PathBuf {
    let root = parent.join("Commander Keen 4.boxer");
    fs::create_dir_all(root.join("C.harddisk/KEEN")).unwrap();
    fs::create_dir_all(root.join("Documentation")).unwrap();
    fs::create_dir(root.join("Keen.cdrom")).unwrap();

    fs::write(root.join("C.harddisk/KEEN/KEEN4E.EXE"), b"MZ keen episode four").unwrap();
    fs::write(root.join("C.harddisk/KEEN/KEEN4.BAT"), b"KEEN4E.EXE /nojoy").unwrap();
    fs::write(root.join("C.harddisk/KEEN/SETUP.EXE"), b"MZ setup").unwrap();
    fs::write(root.join("C.harddisk/KEEN/DOS4GW.EXE"), b"MZ extender").unwrap();
    fs::write(root.join("C.harddisk/KEEN/README.TXT"), b"Welcome to Keen").unwrap();
    fs::write(root.join("C.harddisk/KEEN/ORDER.FRM"), b"not documentation").unwrap();
    fs::write(root.join("Documentation/Manual.pdf"), b"%PDF-1.4").unwrap();
    fs::write(root.join("Documentation/LICENSE.TXT"), b"license").unwrap();

    root
}

fn solid_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(
        width,
        height,
        Rgba([20, 120, 220, 255]),
    ))
}

// ============================================================================
// Discovery
// ============================================================================

#[test]
fn test_discovery_applies_type_and_exclusion_rules() {
    let temp = TempDir::new().unwrap();
    let root = build_keen_gamebox(temp.path());
    let mut gamebox = Gamebox::open(&root).unwrap();

    assert_eq!(
        gamebox.executables(),
        &[
            root.join("C.harddisk/KEEN/KEEN4.BAT"),
            root.join("C.harddisk/KEEN/KEEN4E.EXE"),
        ]
    );
    assert_eq!(
        gamebox.documentation(),
        &[
            root.join("C.harddisk/KEEN/README.TXT"),
            root.join("Documentation/Manual.pdf"),
        ]
    );
    assert_eq!(gamebox.hdd_volumes(), vec![root.join("C.harddisk")]);
    assert_eq!(gamebox.cd_volumes(), vec![root.join("Keen.cdrom")]);
    assert!(gamebox.floppy_volumes().is_empty());
}

#[test]
fn test_refresh_makes_new_files_visible() {
    let temp = TempDir::new().unwrap();
    let root = build_keen_gamebox(temp.path());
    let mut gamebox = Gamebox::open(&root).unwrap();

    let docs_before = gamebox.documentation().len();
    let exes_before = gamebox.executables().len();

    fs::write(root.join("Documentation/Hints.txt"), b"jump").unwrap();
    fs::write(root.join("C.harddisk/KEEN/KEEN5E.EXE"), b"MZ keen five").unwrap();

    assert_eq!(gamebox.documentation().len(), docs_before);
    assert_eq!(gamebox.executables().len(), exes_before);

    gamebox.refresh();

    assert_eq!(gamebox.documentation().len(), docs_before + 1);
    assert_eq!(gamebox.executables().len(), exes_before + 1);
    assert!(gamebox
        .executables()
        .contains(&root.join("C.harddisk/KEEN/KEEN5E.EXE")));
}

#[test]
fn test_custom_exclusions() {
    let temp = TempDir::new().unwrap();
    let root = build_keen_gamebox(temp.path());

    let config = GameboxConfig::default().with_executable_exclusions(vec!["*.bat".to_string()]);
    let mut gamebox = Gamebox::open_with_config(&root, config).unwrap();

    // SETUP.EXE and DOS4GW.EXE come back once the default exclusions are replaced
    assert_eq!(gamebox.executables().len(), 3);
    assert!(gamebox
        .executables()
        .iter()
        .all(|p| p.extension().unwrap() != "BAT"));
}

// ============================================================================
// Identity
// ============================================================================

#[test]
fn test_identifier_is_digest_of_sorted_executables() {
    let temp = TempDir::new().unwrap();
    let root = build_keen_gamebox(temp.path());
    let mut gamebox = Gamebox::open(&root).unwrap();

    let expected = executables_digest(&[
        root.join("C.harddisk/KEEN/KEEN4E.EXE"),
        root.join("C.harddisk/KEEN/KEEN4.BAT"),
    ])
    .unwrap();

    let first = gamebox.game_identifier().unwrap();
    let second = gamebox.game_identifier().unwrap();

    assert_eq!(first, expected);
    assert_eq!(first, second);
    assert_eq!(
        gamebox.game_identifier_type(),
        GameIdentifierType::ExecutableDigest
    );
}

#[test]
fn test_identical_games_share_an_identifier() {
    let first_dir = TempDir::new().unwrap();
    let second_dir = TempDir::new().unwrap();
    let first = build_keen_gamebox(first_dir.path());
    let second = build_keen_gamebox(second_dir.path());

    let a = Gamebox::open(&first).unwrap().game_identifier().unwrap();
    let b = Gamebox::open(&second).unwrap().game_identifier().unwrap();

    assert_eq!(a, b);
}

#[test]
fn test_empty_gameboxes_get_distinct_uuids() {
    let temp = TempDir::new().unwrap();
    let mut first = Gamebox::create(temp.path().join("First.boxer")).unwrap();
    let mut second = Gamebox::create(temp.path().join("Second.boxer")).unwrap();

    let a = first.game_identifier().unwrap();
    let b = second.game_identifier().unwrap();

    assert_ne!(a, b);
    assert_eq!(first.game_identifier_type(), GameIdentifierType::Uuid);
    assert_eq!(second.game_identifier_type(), GameIdentifierType::Uuid);
}

#[test]
fn test_identifier_survives_reopen() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("Empty.boxer");
    let id = Gamebox::create(&path).unwrap().game_identifier().unwrap();

    let mut reopened = Gamebox::open(&path).unwrap();
    assert_eq!(
        reopened.game_info(GAME_IDENTIFIER_KEY),
        Some(GameInfoValue::String(id.clone()))
    );
    assert_eq!(reopened.game_identifier().unwrap(), id);
}

#[test]
fn test_unstorable_value_does_not_disturb_identifier() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("Empty.boxer");
    let mut gamebox = Gamebox::create(&path).unwrap();
    let id = gamebox.game_identifier().unwrap();

    assert!(matches!(
        gamebox.set_game_info("ratio", f64::NAN),
        Err(GameboxError::InvalidValue { .. })
    ));
    assert!(gamebox.game_info("ratio").is_none());

    let mut reopened = Gamebox::open(&path).unwrap();
    assert_eq!(reopened.game_identifier().unwrap(), id);
    assert_eq!(reopened.game_identifier_type(), GameIdentifierType::Uuid);
}

#[test]
fn test_null_entry_in_record_keeps_identifier() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("Empty.boxer");
    let id = Gamebox::create(&path).unwrap().game_identifier().unwrap();

    // Another tool wrote a value this record cannot hold
    let record = path.join("Game Info.json");
    let text = fs::read_to_string(&record).unwrap();
    let edited = text.replacen('{', "{\n  \"notes\": null,", 1);
    fs::write(&record, edited).unwrap();

    let mut reopened = Gamebox::open(&path).unwrap();
    assert!(reopened.game_info("notes").is_none());
    assert_eq!(reopened.game_identifier().unwrap(), id);
}

// ============================================================================
// Mutations
// ============================================================================

#[test]
fn test_game_info_persists_without_explicit_save() {
    let temp = TempDir::new().unwrap();
    let root = build_keen_gamebox(temp.path());

    {
        let mut gamebox = Gamebox::open(&root).unwrap();
        gamebox.set_game_info("k", "v").unwrap();
        assert_eq!(gamebox.game_info("k"), Some(GameInfoValue::from("v")));
    }

    let mut reopened = Gamebox::open(&root).unwrap();
    assert_eq!(reopened.game_info("k"), Some(GameInfoValue::from("v")));
}

#[test]
fn test_target_round_trip() {
    let temp = TempDir::new().unwrap();
    let root = build_keen_gamebox(temp.path());
    let mut gamebox = Gamebox::open(&root).unwrap();
    let exe = root.join("C.harddisk/KEEN/KEEN4E.EXE");

    assert_eq!(gamebox.target_path(), None);

    gamebox.set_target_path(Some(&exe)).unwrap();
    assert_eq!(gamebox.target_path(), Some(exe));
    // The symlink never shows up as an executable
    gamebox.refresh();
    assert_eq!(gamebox.executables().len(), 2);

    gamebox.set_target_path(None).unwrap();
    assert_eq!(gamebox.target_path(), None);
}

#[test]
fn test_configuration_round_trip() {
    let temp = TempDir::new().unwrap();
    let root = build_keen_gamebox(temp.path());
    let source = temp.path().join("keen.conf");
    let contents = b"[sdl]\nfullscreen=true\n\n[cpu]\ncycles=3000\n";
    fs::write(&source, contents).unwrap();

    let mut gamebox = Gamebox::open(&root).unwrap();
    gamebox.set_configuration_file(Some(&source)).unwrap();

    assert_eq!(
        gamebox.configuration_file(),
        Some(gamebox.configuration_file_path())
    );
    assert_eq!(
        fs::read(gamebox.configuration_file_path()).unwrap(),
        contents.to_vec()
    );

    // Overwrites an existing configuration
    fs::write(&source, b"[cpu]\ncycles=max\n").unwrap();
    gamebox.set_configuration_file(Some(&source)).unwrap();
    assert_eq!(
        fs::read(gamebox.configuration_file_path()).unwrap(),
        b"[cpu]\ncycles=max\n".to_vec()
    );

    gamebox.set_configuration_file(None).unwrap();
    assert_eq!(gamebox.configuration_file(), None);
}

#[test]
fn test_cover_art_round_trip() {
    let temp = TempDir::new().unwrap();
    let root = build_keen_gamebox(temp.path());
    let mut gamebox = Gamebox::open(&root).unwrap();

    assert!(gamebox.cover_art().unwrap().is_none());

    gamebox.set_cover_art(Some(&solid_image(40, 60))).unwrap();
    let art = gamebox.cover_art().unwrap().unwrap();
    assert_eq!((art.width(), art.height()), (40, 60));

    gamebox.set_cover_art(None).unwrap();
    assert!(gamebox.cover_art().unwrap().is_none());
}

#[test]
fn test_mutation_errors_are_surfaced() {
    let temp = TempDir::new().unwrap();
    let root = build_keen_gamebox(temp.path());
    let mut gamebox = Gamebox::open(&root).unwrap();

    let missing = temp.path().join("missing.conf");
    assert!(matches!(
        gamebox.set_configuration_file(Some(&missing)),
        Err(GameboxError::CopyFailed { .. })
    ));
    assert!(matches!(
        gamebox.set_target_path(Some(&root.join("NOPE.EXE"))),
        Err(GameboxError::SymlinkFailed { .. })
    ));
}
