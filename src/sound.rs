use serde::{Deserialize, Serialize};
use std::io::Write;

/// Audio cues the game asks for; how they are produced is up to the sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Sound {
    /// Minute hand moved to a new notch
    Tick,
    /// Hour hand moved to a new notch
    Tock,
    Correct,
    Incorrect,
    /// Run finished
    Tada,
}

/// Fire-and-forget audio output. Playing can never fail from the caller's
/// point of view; sinks swallow their own errors.
pub trait SoundSink {
    fn play(&mut self, sound: Sound);
}

impl<S: SoundSink + ?Sized> SoundSink for Box<S> {
    fn play(&mut self, sound: Sound) {
        (**self).play(sound)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl SoundSink for Silent {
    fn play(&mut self, _sound: Sound) {}
}

/// Rings the terminal bell for answer feedback. Drag ticks are left silent,
/// a bell per notch is too noisy.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalBell;

impl TerminalBell {
    fn rings_for(sound: Sound) -> bool {
        matches!(sound, Sound::Correct | Sound::Incorrect | Sound::Tada)
    }
}

impl SoundSink for TerminalBell {
    fn play(&mut self, sound: Sound) {
        if !Self::rings_for(sound) {
            return;
        }
        let mut out = std::io::stdout();
        if let Err(e) = out.write_all(b"\x07").and_then(|_| out.flush()) {
            log::debug!("bell for {sound} failed: {e}");
        }
    }
}

/// Keeps every requested sound in order
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub played: Vec<Sound>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, sound: Sound) -> usize {
        self.played.iter().filter(|s| **s == sound).count()
    }
}

impl SoundSink for RecordingSink {
    fn play(&mut self, sound: Sound) {
        self.played.push(sound);
    }
}
