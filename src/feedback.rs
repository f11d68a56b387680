use std::io::{self, Write};

/// Discrete physical-feedback cue emitted by a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum FeedbackEvent {
    /// The target was found
    Success,
    /// A new game started
    ImpactLight,
    /// A guess missed
    ImpactMedium,
}

/// Sink for feedback cues. Implementations perform the effect; the session
/// decides when to call and whether the player has them enabled.
pub trait FeedbackHook {
    fn emit(&mut self, event: FeedbackEvent);
}

/// Rings the terminal bell; misses ring once, wins ring twice
#[derive(Debug, Default)]
pub struct TerminalBell;

impl FeedbackHook for TerminalBell {
    fn emit(&mut self, event: FeedbackEvent) {
        let rings = match event {
            FeedbackEvent::Success => "\x07\x07",
            FeedbackEvent::ImpactMedium => "\x07",
            FeedbackEvent::ImpactLight => return,
        };

        let mut stdout = io::stdout();
        if let Err(e) = stdout.write_all(rings.as_bytes()).and_then(|_| stdout.flush()) {
            log::debug!("bell failed: {}", e);
        }
    }
}

/// Keeps every emitted cue, for tests and headless runs
#[derive(Debug, Default, Clone)]
pub struct RecordingHook {
    pub events: Vec<FeedbackEvent>,
}

impl FeedbackHook for RecordingHook {
    fn emit(&mut self, event: FeedbackEvent) {
        self.events.push(event);
    }
}
