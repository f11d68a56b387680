use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use hilo::feedback::{FeedbackEvent, RecordingHook};
use hilo::game::{Feedback, GameState, GameStatus};
use hilo::runtime::{GameEvent, Runner, TestEventSource};
use hilo::session::Session;
use hilo::storage::{KeyValueStore, MemoryStore, Storage};

fn send_guess(tx: &mpsc::Sender<GameEvent>, guess: i64) {
    for c in guess.to_string().chars() {
        tx.send(GameEvent::Key(KeyEvent::new(
            KeyCode::Char(c),
            KeyModifiers::NONE,
        )))
        .unwrap();
    }
    tx.send(GameEvent::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)))
        .unwrap();
}

/// Pump events into the session until one Enter has been handled
fn pump_until_submit<S: KeyValueStore>(
    runner: &Runner<TestEventSource>,
    session: &mut Session<S, RecordingHook>,
) -> Option<Feedback> {
    for _ in 0..100u32 {
        match runner.step() {
            GameEvent::Tick => session.on_tick(),
            GameEvent::Resize => {}
            GameEvent::Key(key) => match key.code {
                KeyCode::Char(c) => session.push_char(c),
                KeyCode::Enter => return session.submit().ok(),
                _ => {}
            },
        }
    }
    None
}

// Headless game driven through the runtime without a TTY: a binary-search
// player must find any target in 1..=100 within seven guesses.
#[test]
fn headless_binary_search_finds_target() {
    let mut session = Session::load(Storage::new(MemoryStore::new()), RecordingHook::default());
    let target = session.state.target_number;

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(TestEventSource::new(rx), Duration::from_millis(5));

    let (mut low, mut high) = (session.state.min_range, session.state.max_range);
    let mut won = false;
    for _ in 0..7 {
        let guess = (low + high) / 2;
        send_guess(&tx, guess);

        match pump_until_submit(&runner, &mut session) {
            Some(Feedback::Correct) => {
                won = true;
                break;
            }
            Some(Feedback::Higher) => low = guess + 1,
            Some(Feedback::Lower) => high = guess - 1,
            None => panic!("guess {guess} was not accepted"),
        }
    }

    assert!(won, "did not find {target}");
    assert_eq!(session.state.game_status, GameStatus::Won);
    assert_eq!(session.state.last_guess, Some(target));
    assert_eq!(session.stats.games_played, 1);
    assert_eq!(session.stats.best_score, Some(session.state.attempts));
    assert_eq!(
        session.hook().events.last(),
        Some(&FeedbackEvent::Success)
    );
}

#[test]
fn headless_invalid_input_does_not_count() {
    let mut storage = Storage::new(MemoryStore::new());
    storage.save(&GameState {
        target_number: 64,
        game_status: GameStatus::Playing,
        ..GameState::default()
    });
    let mut session = Session::load(storage, RecordingHook::default());

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(TestEventSource::new(rx), Duration::from_millis(5));

    for c in "six".chars() {
        tx.send(GameEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)))
            .unwrap();
    }
    tx.send(GameEvent::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)))
        .unwrap();

    assert_eq!(pump_until_submit(&runner, &mut session), None);
    assert_eq!(session.state.attempts, 0);
    assert_eq!(
        session.input_error.as_deref(),
        Some("Please enter a valid number")
    );
    assert!(session.hook().events.is_empty());
}

#[test]
fn headless_pulse_fades_on_ticks() {
    let mut storage = Storage::new(MemoryStore::new());
    storage.save(&GameState {
        target_number: 64,
        game_status: GameStatus::Playing,
        ..GameState::default()
    });
    let mut session = Session::load(storage, RecordingHook::default());

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(TestEventSource::new(rx), Duration::from_millis(2));

    send_guess(&tx, 10);
    assert_eq!(
        pump_until_submit(&runner, &mut session),
        Some(Feedback::Higher)
    );
    assert!(session.is_pulsing());

    // nothing queued, so every step is a tick
    for _ in 0..10u32 {
        if let GameEvent::Tick = runner.step() {
            session.on_tick();
        }
    }
    assert!(!session.is_pulsing());
}
