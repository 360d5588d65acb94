//! SSML generation tests
//!
//! Tests sentence scripts turn into the expected speech markup

use std::fs;
use stenospeak::app::build_document;
use stenospeak::config::Config;
use stenospeak::script::SentenceScript;
use stenospeak::speech::VoiceSettings;
use stenospeak::ssml::{sentence_fragment, SsmlDocument};

#[test]
fn test_punctuation_spoken() {
    assert_eq!(
        sentence_fragment("1", "Hi, there?"),
        "<s>Hi, comma, <break time='1s'/> there, query?</s>"
    );
    assert_eq!(
        sentence_fragment("2", "Can you hear me now?"),
        "<s>Can <break time='2s'/> you <break time='2s'/> hear <break time='2s'/> me <break time='2s'/> now, query?</s>"
    );
}

#[test]
fn test_script_to_fragments() {
    let script = SentenceScript::parse("1\nHello world").unwrap();
    let doc = SsmlDocument::from_script(&script, &VoiceSettings::default(), "1");

    assert_eq!(script.pause, "1");
    assert_eq!(doc.fragments(), &["<s>Hello <break time='1s'/> world</s>".to_string()]);
}

#[test]
fn test_one_fragment_per_sentence() {
    let script = SentenceScript::parse("0.5\nOne.\nTwo, three.\nFour?").unwrap();
    let doc = SsmlDocument::from_script(&script, &VoiceSettings::default(), "1");
    assert_eq!(doc.fragments().len(), 3);

    let ssml = doc.render();
    assert_eq!(ssml.matches("<s>").count(), 3);
    assert_eq!(ssml.matches("</s><break time='1s'/><s>").count(), 2);
    assert!(ssml.contains("<s>Two, comma, <break time='0.5s'/> three, period.</s>"));
}

#[test]
fn test_prosody_follows_voice_settings() {
    let settings = VoiceSettings {
        voice: "en_US/vctk_low".to_string(),
        rate: 0.8,
        ..Default::default()
    };
    let script = SentenceScript::parse("1\nHi").unwrap();
    let ssml = SsmlDocument::from_script(&script, &settings, "3").render();

    assert!(ssml.contains("<voice name=\"en_US/vctk_low\">"));
    assert!(ssml.contains("<prosody rate=\"0.8\"><s>Hi</s>"));
}

#[test]
fn test_document_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let sentences = dir.path().join("sentences.txt");
    fs::write(&sentences, "1\nHello world\nGood bye.\n").unwrap();

    let mut config = Config::defaults();
    config.set("paths", "sentences", sentences.to_str().unwrap());
    config.set("ssml", "sentence_pause", "2");

    let ssml = build_document(&config).unwrap().render();
    assert!(ssml.contains(
        "<s>Hello <break time='1s'/> world</s><break time='2s'/><s>Good <break time='1s'/> bye, period.</s>"
    ));
}

#[test]
fn test_missing_script_is_error() {
    let mut config = Config::defaults();
    config.set("paths", "sentences", "/nonexistent/sentences.txt");
    assert!(build_document(&config).is_err());
}
