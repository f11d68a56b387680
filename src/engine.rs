//! Rules of the guessing game as pure functions over explicit state values.
//!
//! Nothing in this module touches storage or the terminal; [`crate::session`]
//! sequences these calls and persists the results.

use chrono::Utc;
use rand::Rng;

use crate::config::GameSettings;
use crate::game::{Feedback, GameState, GameStats, GameStatus};

/// Why a raw guess was rejected before reaching the game
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter a number")]
    EmptyInput,
    #[error("Please enter a valid number")]
    NotANumber,
    #[error("Please enter a number between {min} and {max}")]
    OutOfRange { min: i64, max: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuessError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("The game is over, start a new game")]
    GameOver,
}

/// Pick a target uniformly from `[min, max]`.
pub fn generate_target(min: i64, max: i64) -> i64 {
    generate_target_with(&mut rand::thread_rng(), min, max)
}

pub fn generate_target_with<R: Rng>(rng: &mut R, min: i64, max: i64) -> i64 {
    let (low, high) = if min <= max { (min, max) } else { (max, min) };
    rng.gen_range(low..=high)
}

pub fn validate_guess(raw: &str, min: i64, max: i64) -> Result<i64, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyInput);
    }

    let guess = trimmed
        .parse::<i64>()
        .map_err(|_| ValidationError::NotANumber)?;

    if guess < min || guess > max {
        return Err(ValidationError::OutOfRange { min, max });
    }

    Ok(guess)
}

/// Direction from `guess` towards `target`
pub fn score_guess(guess: i64, target: i64) -> Feedback {
    match guess.cmp(&target) {
        std::cmp::Ordering::Equal => Feedback::Correct,
        std::cmp::Ordering::Less => Feedback::Higher,
        std::cmp::Ordering::Greater => Feedback::Lower,
    }
}

/// Score `guess` against `state`, returning the next state.
///
/// Only a game in the `playing` status accepts guesses.
pub fn apply_guess(state: &GameState, guess: i64) -> Result<GameState, GuessError> {
    if !state.is_playing() {
        return Err(GuessError::GameOver);
    }

    let feedback = score_guess(guess, state.target_number);
    let game_status = match feedback {
        Feedback::Correct => GameStatus::Won,
        Feedback::Higher | Feedback::Lower => GameStatus::Playing,
    };

    Ok(GameState {
        attempts: state.attempts.saturating_add(1),
        last_guess: Some(guess),
        feedback: Some(feedback),
        game_status,
        ..state.clone()
    })
}

pub fn record_win(attempts: u32, stats: &GameStats) -> GameStats {
    GameStats {
        games_played: stats.games_played.saturating_add(1),
        best_score: Some(
            stats
                .best_score
                .map_or(attempts, |best| best.min(attempts)),
        ),
        last_played_date: Some(Utc::now()),
    }
}

pub fn start_new_game(settings: &GameSettings) -> GameState {
    GameState {
        target_number: generate_target(settings.min_range, settings.max_range),
        attempts: 0,
        game_status: GameStatus::Playing,
        min_range: settings.min_range,
        max_range: settings.max_range,
        last_guess: None,
        feedback: None,
    }
}
