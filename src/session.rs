use log::{debug, info, warn};

use crate::config::GameSettings;
use crate::engine::{self, GuessError};
use crate::feedback::{FeedbackEvent, FeedbackHook};
use crate::game::{Feedback, GameState, GameStats};
use crate::storage::{KeyValueStore, Storage};

/// Ticks the feedback line stays emphasised after a guess
pub const PULSE_TICKS: u8 = 3;

/// Longest raw input accepted into the guess buffer
pub const MAX_INPUT_LEN: usize = 20;

/// One player's game: the loaded records plus the transient input state
#[derive(Debug)]
pub struct Session<S: KeyValueStore, H: FeedbackHook> {
    storage: Storage<S>,
    hook: H,
    pub state: GameState,
    pub settings: GameSettings,
    pub stats: GameStats,
    pub input: String,
    pub input_error: Option<String>,
    pub pulse_ticks: u8,
}

impl<S: KeyValueStore, H: FeedbackHook> Session<S, H> {
    /// Load all records and make sure a game is ready to play.
    pub fn load(storage: Storage<S>, hook: H) -> Self {
        let state = storage.load::<GameState>();
        let mut settings = storage.load::<GameSettings>();
        let stats = storage.load::<GameStats>();

        if !settings.is_valid() {
            warn!(
                "Ignoring stored settings with inverted range [{}, {}]",
                settings.min_range, settings.max_range
            );
            settings = GameSettings::default();
        }

        let mut session = Self {
            storage,
            hook,
            state,
            settings,
            stats,
            input: String::new(),
            input_error: None,
            pulse_ticks: 0,
        };

        if session.state.needs_new_target() {
            debug!("Stored game is {}, generating a target", session.state.game_status);
            session.state = engine::start_new_game(&session.settings);
            session.storage.save(&session.state);
        } else {
            debug!(
                "Resuming {} game after {} attempts",
                session.state.game_status, session.state.attempts
            );
        }

        session
    }

    /// Abandon the current game and start over with the current settings
    pub fn new_game(&mut self) {
        self.state = engine::start_new_game(&self.settings);
        self.storage.save(&self.state);
        self.input.clear();
        self.input_error = None;
        self.pulse_ticks = 0;
        info!(
            "New game in [{}, {}]",
            self.state.min_range, self.state.max_range
        );
        self.emit(FeedbackEvent::ImpactLight);
    }

    pub fn push_char(&mut self, c: char) {
        if self.state.is_playing() && self.input.chars().count() < MAX_INPUT_LEN {
            self.input.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    /// Submit the buffered input as a guess
    pub fn submit(&mut self) -> Result<Feedback, GuessError> {
        let raw = std::mem::take(&mut self.input);
        let result = self.guess(&raw);
        if result.is_err() {
            self.input = raw;
        }
        result
    }

    /// Validate and score `raw`, persisting the new state and, on a win, the stats.
    ///
    /// Rejections leave the game untouched and set `input_error` to a message
    /// fit for display.
    pub fn guess(&mut self, raw: &str) -> Result<Feedback, GuessError> {
        self.input_error = None;

        let scored = engine::validate_guess(raw, self.state.min_range, self.state.max_range)
            .map_err(GuessError::from)
            .and_then(|guess| {
                let next = engine::apply_guess(&self.state, guess)?;
                Ok((next, engine::score_guess(guess, self.state.target_number)))
            });

        let (next, feedback) = match scored {
            Ok(scored) => scored,
            Err(e) => {
                self.input_error = Some(e.to_string());
                return Err(e);
            }
        };

        self.state = next;
        self.storage.save(&self.state);
        self.pulse_ticks = PULSE_TICKS;

        if self.state.is_won() {
            // re-read so the update applies to the stored stats, not our snapshot
            let current = self.storage.load::<GameStats>();
            self.stats = engine::record_win(self.state.attempts, &current);
            self.storage.save(&self.stats);
            info!(
                "Won in {} attempts (best {:?}, {} games)",
                self.state.attempts, self.stats.best_score, self.stats.games_played
            );
            self.emit(FeedbackEvent::Success);
        } else {
            self.emit(FeedbackEvent::ImpactMedium);
        }

        Ok(feedback)
    }

    pub fn on_tick(&mut self) {
        self.pulse_ticks = self.pulse_ticks.saturating_sub(1);
    }

    pub fn is_pulsing(&self) -> bool {
        self.pulse_ticks > 0
    }

    pub fn hook(&self) -> &H {
        &self.hook
    }

    pub fn storage(&self) -> &Storage<S> {
        &self.storage
    }

    fn emit(&mut self, event: FeedbackEvent) {
        if self.settings.haptic_enabled {
            self.hook.emit(event);
        }
    }
}
