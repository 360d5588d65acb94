//! SSML generation for sentence scripts
//!
//! Each sentence becomes one `<s>` element with a timed break between words
//! and its punctuation spoken aloud ("comma", "query", "period"). Sentences
//! are then joined into a single `<speak>` document.

use crate::script::SentenceScript;
use crate::speech::VoiceSettings;

/// Punctuation rewrites, applied in this order
const PUNCTUATION: [(&str, &str); 3] = [
    (",", ", comma,"),
    ("?", ", query?"),
    (".", ", period."),
];

/// Default pause between sentences, in seconds
pub const DEFAULT_SENTENCE_PAUSE: &str = "1";

/// `<break time='{seconds}s'/>`
pub fn break_tag(seconds: &str) -> String {
    format!("<break time='{}s'/>", seconds)
}

/// Escape XML markup characters in sentence text
pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(text: &str) -> String {
    escape_text(text).replace('"', "&quot;")
}

/// Spell out commas, question marks and periods
pub fn verbalize_punctuation(text: &str) -> String {
    PUNCTUATION
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
}

/// Build one `<s>` element, words separated by a break of `pause` seconds
///
/// Words are split on single spaces. The pause literal is substituted after
/// punctuation is rewritten, so a pause like `0.5` is left untouched.
pub fn sentence_fragment(pause: &str, sentence: &str) -> String {
    let separator = format!(" {} ", break_tag(pause));
    let body = sentence
        .split(' ')
        .map(|word| verbalize_punctuation(&escape_text(word)))
        .collect::<Vec<_>>()
        .join(separator.as_str());
    format!("<s>{}</s>", body)
}

/// A full `<speak>` document
#[derive(Debug, Clone)]
pub struct SsmlDocument {
    voice: String,
    rate: f32,
    sentence_pause: String,
    fragments: Vec<String>,
}

impl SsmlDocument {
    /// Empty document for a voice and prosody rate
    pub fn new(voice: &str, rate: f32) -> Self {
        Self {
            voice: voice.to_string(),
            rate,
            sentence_pause: DEFAULT_SENTENCE_PAUSE.to_string(),
            fragments: Vec::new(),
        }
    }

    /// Document for every sentence of a script, voiced by the session defaults
    pub fn from_script(
        script: &SentenceScript,
        voice: &VoiceSettings,
        sentence_pause: &str,
    ) -> Self {
        let mut doc = Self::new(&voice.voice, voice.rate).with_sentence_pause(sentence_pause);
        for sentence in &script.sentences {
            doc.push_sentence(&script.pause, sentence);
        }
        doc
    }

    /// Pause between sentences, in seconds
    pub fn with_sentence_pause(mut self, seconds: &str) -> Self {
        self.sentence_pause = seconds.to_string();
        self
    }

    pub fn push_sentence(&mut self, pause: &str, sentence: &str) {
        self.fragments.push(sentence_fragment(pause, sentence));
    }

    /// The `<s>` elements built so far
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    pub fn render(&self) -> String {
        let body = self.fragments.join(break_tag(&self.sentence_pause).as_str());
        format!(
            "<speak>\n    <voice name=\"{}\">\n        <prosody rate=\"{}\">{}\n        </prosody>\n    </voice>\n</speak>\n",
            escape_attr(&self.voice),
            self.rate,
            body
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_punctuation_order() {
        assert_eq!(verbalize_punctuation("Hi,"), "Hi, comma,");
        assert_eq!(verbalize_punctuation("now?"), "now, query?");
        assert_eq!(verbalize_punctuation("end."), "end, period.");
        assert_eq!(verbalize_punctuation("a,b?c."), "a, comma,b, query?c, period.");
    }

    #[test]
    fn test_fragment_with_punctuation() {
        assert_eq!(
            sentence_fragment("1", "Hi, there?"),
            "<s>Hi, comma, <break time='1s'/> there, query?</s>"
        );
    }

    #[test]
    fn test_fractional_pause_untouched() {
        assert_eq!(sentence_fragment("0.5", "Stop."), "<s>Stop, period.</s>");
        assert_eq!(sentence_fragment("0.5", "a b"), "<s>a <break time='0.5s'/> b</s>");
    }

    #[test]
    fn test_markup_escaped() {
        assert_eq!(
            sentence_fragment("1", "R&D <now>"),
            "<s>R&amp;D <break time='1s'/> &lt;now&gt;</s>"
        );
    }

    #[test]
    fn test_double_space_keeps_empty_word() {
        assert_eq!(
            sentence_fragment("1", "a  b"),
            "<s>a <break time='1s'/>  <break time='1s'/> b</s>"
        );
    }

    #[test]
    fn test_render() {
        let mut doc = SsmlDocument::new("en_UK/apope_low", 0.6);
        doc.push_sentence("1", "One");
        doc.push_sentence("1", "Two");
        let ssml = doc.render();

        assert!(ssml.starts_with("<speak>"));
        assert!(ssml.contains("<voice name=\"en_UK/apope_low\">"));
        assert!(ssml.contains("<prosody rate=\"0.6\"><s>One</s><break time='1s'/><s>Two</s>"));
        assert!(ssml.trim_end().ends_with("</speak>"));
    }
}
