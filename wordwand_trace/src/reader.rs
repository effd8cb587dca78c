use serde_derive::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::error::TraceError;
use super::speech::{SpeechBackend, SpeechSlot, RATE_NORMAL, RATE_SLOW};

const VOWELS: &str = "aeiouy";
// Stagger between syllable box animations
const SYLLABLE_DELAY_MS: u32 = 400;

/// Page data for the reader: OCR output plus precomputed word lists.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ReaderData {
    pub ocr_text: String,
    #[serde(default)]
    pub hard_words: Vec<String>,
    // Clean word -> hyphenated syllables, e.g. "el-e-phant"
    #[serde(default)]
    pub syllables: HashMap<String, String>,
}

impl ReaderData {
    pub fn from_json(json: &str) -> Result<ReaderData, TraceError> {
        serde_json::from_str(json).map_err(TraceError::InvalidReaderData)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Word {
    pub index: usize,
    // As it appears in the text, punctuation included
    pub text: String,
    pub clean: String,
    pub hard: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SyllableBox {
    pub text: String,
    pub delay_ms: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Popup {
    pub word: String,
    pub title: String,
    pub boxes: Vec<SyllableBox>,
}

/// Strips everything but ASCII word characters and lowercases the rest.
pub fn clean_word(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Kid-friendly split: a syllable ends at a vowel that is not followed by
/// another vowel. Trailing consonants form a last piece of their own.
pub fn split_into_syllables(word: &str) -> Vec<String> {
    let word: Vec<char> = word.to_lowercase().chars().collect();
    let mut res: Vec<String> = Vec::new();
    let mut current = String::new();
    for i in 0..word.len() {
        current.push(word[i]);
        let is_vowel = VOWELS.contains(word[i]);
        let next_is_vowel = i + 1 < word.len() && VOWELS.contains(word[i + 1]);
        if is_vowel && !next_is_vowel {
            res.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        res.push(current);
    }
    res
}

/// Index of the word that starts at `char_index`: the number of words before
/// that position. Speech engines count the index in UTF-16 code units.
pub fn word_index_at(text: &str, char_index: usize) -> usize {
    let units: Vec<u16> = text.encode_utf16().take(char_index).collect();
    String::from_utf16_lossy(&units).split_whitespace().count()
}

pub fn tokenize(text: &str, hard_words: &HashSet<String>) -> Vec<Word> {
    text.split_whitespace()
        .enumerate()
        .map(|(ix, raw)| {
            let clean = clean_word(raw);
            let hard = hard_words.contains(&clean);
            Word {
                index: ix,
                text: raw.to_string(),
                clean: clean,
                hard: hard,
            }
        })
        .collect()
}

/// Read-aloud text with tappable hard words. All speech goes through one
/// slot, so every new request interrupts whatever was playing.
pub struct HardWordReader<B: SpeechBackend> {
    text: String,
    words: Vec<Word>,
    syllables: HashMap<String, String>,
    speech: SpeechSlot<B>,
    popup: Option<Popup>,
    last_popup_word: Option<String>,
    highlight: Option<usize>,
}

impl<B: SpeechBackend> HardWordReader<B> {
    pub fn new(data: ReaderData, backend: B) -> HardWordReader<B> {
        // Entries are matched as given against each word's clean form
        let hard_words: HashSet<String> = data.hard_words.iter().cloned().collect();
        let words = tokenize(&data.ocr_text, &hard_words);
        log::debug!("Reader has {} words, {} hard", words.len(), words.iter().filter(|w| w.hard).count());
        HardWordReader {
            text: data.ocr_text,
            words: words,
            syllables: data.syllables,
            speech: SpeechSlot::new(backend),
            popup: None,
            last_popup_word: None,
            highlight: None,
        }
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Precomputed syllables when available, otherwise the vowel-group split.
    pub fn syllables_for(&self, word: &str) -> Vec<String> {
        let clean = clean_word(word);
        match self.syllables.get(&clean) {
            Some(data) => data.split('-').map(|s| s.to_string()).collect(),
            None => split_into_syllables(&clean),
        }
    }

    fn build_popup(&self, word: &str) -> Popup {
        let boxes = self.syllables_for(word)
            .into_iter()
            .enumerate()
            .map(|(ix, syl)| SyllableBox {
                text: syl,
                delay_ms: ix as u32 * SYLLABLE_DELAY_MS,
            })
            .collect();
        Popup {
            word: word.to_string(),
            title: word.to_uppercase(),
            boxes: boxes,
        }
    }

    /// Shows the syllable popup for a word and says it slowly.
    pub fn open_popup(&mut self, word: &str) -> Option<&Popup> {
        let clean = clean_word(word);
        if clean.is_empty() {
            return None;
        }
        self.popup = Some(self.build_popup(&clean));
        self.speech.play(&clean, RATE_SLOW);
        self.last_popup_word = Some(clean);
        self.popup.as_ref()
    }

    /// Replays the animation and sound of the last popup word.
    pub fn hear_again(&mut self) -> Option<&Popup> {
        let word = self.last_popup_word.clone()?;
        self.popup = Some(self.build_popup(&word));
        self.speech.play(&word, RATE_SLOW);
        self.popup.as_ref()
    }

    pub fn speak_syllable(&mut self, index: usize) {
        let text = match self.popup.as_ref().and_then(|p| p.boxes.get(index)) {
            Some(syllable) => syllable.text.clone(),
            None => return,
        };
        self.speech.play(&text, RATE_SLOW);
    }

    pub fn close_popup(&mut self) {
        self.popup = None;
    }

    pub fn read_normal(&mut self) {
        self.read(RATE_NORMAL);
    }

    pub fn read_slow(&mut self) {
        self.read(RATE_SLOW);
    }

    fn read(&mut self, rate: f32) {
        self.stop();
        if self.words.is_empty() {
            return;
        }
        let text = self.text.clone();
        self.speech.play(&text, rate);
    }

    /// Word boundary reported by the speech engine, as a character index
    /// into the text. Highlights that word.
    pub fn on_boundary(&mut self, char_index: usize) -> Option<usize> {
        let ix = word_index_at(&self.text, char_index);
        self.highlight = if ix < self.words.len() { Some(ix) } else { None };
        self.highlight
    }

    /// End of utterance `id`. Ends of utterances already cancelled keep the
    /// highlight of the one now playing.
    pub fn on_end(&mut self, id: u32) {
        if self.speech.finished(id) {
            self.highlight = None;
        }
    }

    pub fn stop(&mut self) {
        self.speech.stop();
        self.highlight = None;
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlight
    }

    pub fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }

    pub fn speech(&self) -> &SpeechSlot<B> {
        &self.speech
    }

    pub fn speech_mut(&mut self) -> &mut SpeechSlot<B> {
        &mut self.speech
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::speech::{SpeechEvent, SpeechLog};

    static DATA: &str = "{\"ocr_text\":\"The elephant was reading, quietly.\",\"hard_words\":[\"elephant\",\"Quietly\"],\"syllables\":{\"elephant\":\"el-e-phant\"}}";

    fn reader() -> HardWordReader<SpeechLog> {
        HardWordReader::new(ReaderData::from_json(DATA).unwrap(), SpeechLog::default())
    }

    #[test]
    fn test_clean_word() {
        assert_eq!(clean_word("Reading,"), "reading");
        assert_eq!(clean_word("\"don't!\""), "dont");
        assert_eq!(clean_word("..."), "");
    }

    #[test]
    fn test_split_into_syllables() {
        assert_eq!(split_into_syllables("elephant"), vec!["e", "le", "pha", "nt"]);
        assert_eq!(split_into_syllables("Reading"), vec!["rea", "di", "ng"]);
        assert_eq!(split_into_syllables("sky"), vec!["sky"]);
        assert_eq!(split_into_syllables("banana"), vec!["ba", "na", "na"]);
        assert!(split_into_syllables("").is_empty());
    }

    #[test]
    fn test_tokenize() {
        let r = reader();
        let words = r.words();
        assert_eq!(words.len(), 5);
        assert_eq!(words[1].clean, "elephant");
        assert!(words[1].hard);
        assert_eq!(words[3].text, "reading,");
        assert!(!words[3].hard);
        // "Quietly" in the list does not match the clean form "quietly"
        assert!(!words[4].hard);
        assert_eq!(words[4].index, 4);
        let data = ReaderData {
            ocr_text: "Quietly, quietly.".to_string(),
            hard_words: vec!["quietly".to_string()],
            ..ReaderData::default()
        };
        let r = HardWordReader::new(data, SpeechLog::default());
        assert!(r.words().iter().all(|w| w.hard));
    }

    #[test]
    fn test_word_index_at() {
        let text = "The elephant  was reading";
        assert_eq!(word_index_at(text, 0), 0);
        assert_eq!(word_index_at(text, 4), 1);
        assert_eq!(word_index_at(text, 14), 2);
        assert_eq!(word_index_at(text, 18), 3);
        // The emoji takes two UTF-16 units, so "dog" starts at 7
        let text = "\u{1F600} cat dog";
        assert_eq!(word_index_at(text, 3), 1);
        assert_eq!(word_index_at(text, 7), 2);
    }

    #[test]
    fn test_popup_prefers_data() {
        let mut r = reader();
        let popup = r.open_popup("Elephant").unwrap().clone();
        assert_eq!(popup.title, "ELEPHANT");
        let texts: Vec<&str> = popup.boxes.iter().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, vec!["el", "e", "phant"]);
        assert_eq!(popup.boxes[2].delay_ms, 800);
        let current = r.speech().current().unwrap();
        assert_eq!((current.text.as_str(), current.rate), ("elephant", RATE_SLOW));
        // No precomputed entry: fall back to the splitter
        let popup = r.open_popup("quietly.").unwrap().clone();
        let texts: Vec<&str> = popup.boxes.iter().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, vec!["quie", "tly"]);
        assert!(r.open_popup("!!").is_none());
    }

    #[test]
    fn test_hear_again_and_close() {
        let mut r = reader();
        assert!(r.hear_again().is_none());
        r.open_popup("elephant");
        r.close_popup();
        assert!(r.popup().is_none());
        assert_eq!(r.hear_again().unwrap().word, "elephant");
        r.speak_syllable(1);
        r.speak_syllable(9);
        assert_eq!(r.speech().current().unwrap().text, "e");
        let events = &r.speech().backend().events;
        assert_eq!(events.iter().filter(|e| **e == SpeechEvent::Cancel).count(), 2);
    }

    #[test]
    fn test_read_and_highlight() {
        let mut r = reader();
        r.read_slow();
        assert_eq!(r.speech().current().unwrap().rate, RATE_SLOW);
        assert_eq!(r.on_boundary(4), Some(1));
        assert_eq!(r.highlighted(), Some(1));
        r.read_normal();
        assert_eq!(r.highlighted(), None);
        assert_eq!(r.speech().current().unwrap().rate, RATE_NORMAL);
        r.on_boundary(13);
        assert_eq!(r.highlighted(), Some(2));
        let id = r.speech().current().unwrap().id;
        r.on_end(id);
        assert_eq!(r.highlighted(), None);
        assert!(r.speech().current().is_none());
    }

    #[test]
    fn test_late_end_keeps_highlight() {
        let mut r = reader();
        r.read_slow();
        let first = r.speech().current().unwrap().id;
        r.read_normal();
        assert_eq!(r.on_boundary(4), Some(1));
        r.on_end(first);
        assert_eq!(r.highlighted(), Some(1));
        assert_eq!(r.speech().current().unwrap().rate, RATE_NORMAL);
        r.read_slow();
        let events = &r.speech().backend().events;
        assert_eq!(events.iter().filter(|e| **e == SpeechEvent::Cancel).count(), 2);
    }

    #[test]
    fn test_boundary_after_emoji() {
        let data = ReaderData { ocr_text: "\u{1F600} cat dog".to_string(), ..ReaderData::default() };
        let mut r = HardWordReader::new(data, SpeechLog::default());
        r.read_normal();
        assert_eq!(r.on_boundary(7), Some(2));
        assert_eq!(r.words()[2].text, "dog");
    }

    #[test]
    fn test_read_empty_text() {
        let data = ReaderData { ocr_text: "   ".to_string(), ..ReaderData::default() };
        let mut r = HardWordReader::new(data, SpeechLog::default());
        r.read_normal();
        assert!(r.speech().current().is_none());
        assert!(r.speech().backend().events.is_empty());
    }
}
