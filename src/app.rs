//! The two flows the binary runs
//!
//! Indexing and speaking share nothing but the configuration; either can run
//! on its own.

use crate::audio::create_player;
use crate::config::Config;
use crate::script::SentenceScript;
use crate::speech::{create_engine, EngineKind, TtsSession};
use crate::ssml::SsmlDocument;
use crate::steno::{classify_simple_pairs, ReverseIndex, SimplePair, StenoDictionary};
use crate::Result;
use log::info;

/// Load the steno dictionary and return its simple pairs
pub fn index_dictionary(config: &Config) -> Result<Vec<SimplePair>> {
    let dictionary = StenoDictionary::load(config.mapping_path(), config.orientation()?)?;
    let index = ReverseIndex::build(&dictionary);
    let pairs = classify_simple_pairs(&index);
    info!(
        "{} simple pairs among {} strokes ({} entries)",
        pairs.len(),
        index.len(),
        dictionary.len()
    );
    Ok(pairs)
}

/// Read the sentence script and turn it into one SSML document
pub fn build_document(config: &Config) -> Result<SsmlDocument> {
    let script = SentenceScript::load(config.sentences_path())?;
    let document =
        SsmlDocument::from_script(&script, &config.voice_settings(), &config.sentence_pause());
    info!("Built SSML for {} sentences", document.fragments().len());
    Ok(document)
}

/// Create the engine, the player and the session around them
pub fn open_session(config: &Config) -> Result<TtsSession> {
    let engine = create_engine(config.engine().parse::<EngineKind>()?)?;
    let player = create_player(&config.player())?;
    TtsSession::new(engine, player, config.voice_settings())
}

/// Speak the whole sentence script
pub fn speak_script(config: &Config, session: &mut TtsSession) -> Result<()> {
    let document = build_document(config)?;
    session.speak_document(&document)
}
