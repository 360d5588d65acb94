//! Configuration loading tests
//!
//! Tests that configuration files load correctly and provide expected
//! default values

use std::fs;
use stenospeak::config::Config;
use stenospeak::steno::MappingOrientation;

#[test]
fn test_missing_config_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stenospeak.cfg");

    let config = Config::load_from(&path).expect("Failed to load config");
    assert!(path.exists());
    assert_eq!(config.path(), &path);

    // Defaults are written to disk and read back
    let reloaded = Config::load_from(&path).expect("Failed to reload config");
    assert_eq!(reloaded.voice_settings(), config.voice_settings());
    assert_eq!(reloaded.orientation().unwrap(), MappingOrientation::WordToStroke);
}

#[test]
fn test_partial_config_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stenospeak.cfg");
    fs::write(
        &path,
        "[voice]\nvoice = en_US/cmu-arctic_low\nlength_scale = 1.5\n\n[steno]\norientation = plover\n",
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    let voice = config.voice_settings();
    assert_eq!(voice.voice, "en_US/cmu-arctic_low");
    assert_eq!(voice.length_scale, Some(1.5));
    assert_eq!(voice.rate, 0.6);
    assert!(voice.preload.is_empty());
    assert_eq!(config.orientation().unwrap(), MappingOrientation::StrokeToWord);
    assert_eq!(config.sentence_pause(), "1");
    assert_eq!(config.player(), "auto");
}

#[test]
fn test_save_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stenospeak.cfg");

    let mut config = Config::load_from(&path).unwrap();
    config.set("ssml", "sentence_pause", "2");
    config.save().unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.sentence_pause(), "2");
}

#[test]
fn test_preload_list() {
    let mut config = Config::defaults();
    config.set("voice", "preload", "en_UK/apope_low, en_US/vctk_low,,");
    assert_eq!(
        config.voice_settings().preload,
        vec!["en_UK/apope_low".to_string(), "en_US/vctk_low".to_string()]
    );
}
