use serde_derive::{Deserialize, Serialize};

pub const RATE_NORMAL: f32 = 1.0;
pub const RATE_SLOW: f32 = 0.6;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Utterance {
    // Echoed back by the host when this utterance ends
    pub id: u32,
    pub text: String,
    pub rate: f32,
}

/// The platform's text-to-speech engine.
pub trait SpeechBackend {
    fn speak(&mut self, utterance: &Utterance);
    fn cancel(&mut self);
}

/// Single-slot playback: at most one utterance is current, and starting a
/// new one always cancels the previous one first.
///
/// Engines report the end of a cancelled utterance late, often after the
/// next one has started. End reports therefore carry the utterance id, and
/// only the current utterance's end empties the slot.
pub struct SpeechSlot<B: SpeechBackend> {
    backend: B,
    current: Option<Utterance>,
    next_id: u32,
}

impl<B: SpeechBackend> SpeechSlot<B> {
    pub fn new(backend: B) -> SpeechSlot<B> {
        SpeechSlot {
            backend: backend,
            current: None,
            next_id: 1,
        }
    }

    /// Cancels whatever is playing and speaks `text`. Returns the new
    /// utterance's id.
    pub fn play(&mut self, text: &str, rate: f32) -> u32 {
        self.stop();
        let utterance = Utterance {
            id: self.next_id,
            text: text.to_string(),
            rate: rate,
        };
        self.next_id = self.next_id.wrapping_add(1);
        log::debug!("Speaking #{} {:?} at rate {}", utterance.id, utterance.text, utterance.rate);
        self.backend.speak(&utterance);
        let id = utterance.id;
        self.current = Some(utterance);
        id
    }

    pub fn stop(&mut self) {
        if self.current.take().is_some() {
            self.backend.cancel();
        }
    }

    /// Called when the backend reports utterance `id` finished. Returns
    /// whether that was the current one; stale reports are ignored.
    pub fn finished(&mut self, id: u32) -> bool {
        match self.current {
            Some(ref utterance) if utterance.id == id => {
                self.current = None;
                true
            }
            _ => {
                log::debug!("Ignoring end of stale utterance #{}", id);
                false
            }
        }
    }

    pub fn current(&self) -> Option<&Utterance> {
        self.current.as_ref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

/// Backend that records calls, for tests and for hosts that replay them on
/// the real engine.
#[derive(Debug, Default)]
pub struct SpeechLog {
    pub events: Vec<SpeechEvent>,
}

impl SpeechLog {
    pub fn take_events(&mut self) -> Vec<SpeechEvent> {
        std::mem::take(&mut self.events)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SpeechEvent {
    Speak(Utterance),
    Cancel,
}

impl SpeechBackend for SpeechLog {
    fn speak(&mut self, utterance: &Utterance) {
        self.events.push(SpeechEvent::Speak(utterance.clone()));
    }

    fn cancel(&mut self) {
        self.events.push(SpeechEvent::Cancel);
    }
}
