mod ui;

use chrono::Utc;
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use hilo::{
    app_dirs::AppDirs,
    config::{GameSettings, SettingsOverrides},
    feedback::{FeedbackHook, TerminalBell},
    game::GameStats,
    runtime::{CrosstermEventSource, GameEvent, Runner, TICK_RATE_MS},
    session::Session,
    storage::{KeyValueStore, MemoryStore, SqliteStore, Storage},
    util::{format_best_score, last_played_text},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};

/// sleek number guessing tui with directional hints and persistent stats
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Guess the hidden number in as few attempts as possible. Every guess tells you to go higher or lower; your games played, best score and last win are kept between runs."
)]
pub struct Cli {
    /// lowest possible target (saved for future games)
    #[clap(long = "min", allow_negative_numbers = true)]
    min_range: Option<i64>,

    /// highest possible target (saved for future games)
    #[clap(long = "max", allow_negative_numbers = true)]
    max_range: Option<i64>,

    /// ring the terminal bell on misses and wins (saved for future games)
    #[clap(long, value_name = "BOOL")]
    haptic: Option<bool>,

    /// start a new game instead of resuming the saved one
    #[clap(short = 'n', long = "new")]
    new_game: bool,

    /// print cumulative stats and exit
    #[clap(long)]
    stats: bool,

    /// erase the saved game, settings and stats, then exit
    #[clap(
        long,
        conflicts_with_all = ["stats", "new_game", "min_range", "max_range", "haptic"]
    )]
    reset: bool,

    /// directory holding the game database and log
    #[clap(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            min_range: self.min_range,
            max_range: self.max_range,
            haptic_enabled: self.haptic,
        }
    }

    fn app_dirs(&self) -> AppDirs {
        match &self.data_dir {
            Some(dir) => AppDirs::in_dir(dir),
            None => AppDirs::resolve(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppState {
    Guessing,
    Won,
}

#[derive(Debug)]
pub struct App<S: KeyValueStore, H: FeedbackHook> {
    pub session: Session<S, H>,
    pub state: AppState,
}

impl<S: KeyValueStore, H: FeedbackHook> App<S, H> {
    pub fn new(session: Session<S, H>) -> Self {
        let state = if session.state.is_won() {
            AppState::Won
        } else {
            AppState::Guessing
        };
        Self { session, state }
    }

    pub fn new_game(&mut self) {
        self.session.new_game();
        self.state = AppState::Guessing;
    }

    /// Handle one key press; returns false when the player asked to quit
    pub fn on_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => return false,
            KeyCode::Char('c') if ctrl => return false,
            KeyCode::Char('n') if ctrl => self.new_game(),
            _ => match self.state {
                AppState::Guessing => match key.code {
                    KeyCode::Char(c) => self.session.push_char(c),
                    KeyCode::Backspace => self.session.backspace(),
                    KeyCode::Enter => {
                        if self.session.submit().is_ok() && self.session.state.is_won() {
                            self.state = AppState::Won;
                        }
                    }
                    _ => {}
                },
                AppState::Won => match key.code {
                    KeyCode::Char('n') | KeyCode::Enter => self.new_game(),
                    KeyCode::Char('q') => return false,
                    _ => {}
                },
            },
        }

        true
    }
}

fn init_logging(dirs: &AppDirs) {
    let path = dirs.log_path();
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }

    // stderr belongs to the alternate screen while the game runs, so log to a file
    if let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
            .target(env_logger::Target::Pipe(Box::new(file)))
            .try_init();
    }
}

fn open_storage(dirs: &AppDirs) -> Storage<Box<dyn KeyValueStore>> {
    let db_path = dirs.db_path();
    let store: Box<dyn KeyValueStore> = match SqliteStore::open(&db_path) {
        Ok(store) => Box::new(store),
        Err(e) => {
            log::error!("Could not open {}: {}", db_path.display(), e);
            eprintln!(
                "warning: could not open {}, progress will not be saved",
                db_path.display()
            );
            Box::new(MemoryStore::new())
        }
    };
    Storage::new(store)
}

fn print_stats(stats: &GameStats) {
    println!("Games played: {}", stats.games_played);
    println!("Best score:   {}", format_best_score(stats.best_score));
    println!(
        "Last played:  {}",
        last_played_text(stats.last_played_date, Utc::now())
    );
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let dirs = cli.app_dirs();
    init_logging(&dirs);

    let mut storage = open_storage(&dirs);

    if cli.reset {
        storage.clear_all();
        println!("All game data cleared.");
        return Ok(());
    }

    let overrides = cli.overrides();
    if !overrides.is_empty() {
        let current = storage.load::<GameSettings>();
        match current.with_overrides(&overrides) {
            Some(settings) => {
                log::info!("Saving settings {:?}", settings);
                storage.save(&settings);
            }
            None => {
                let mut cmd = Cli::command();
                cmd.error(
                    ErrorKind::ArgumentConflict,
                    format!(
                        "--min ({}) must not be greater than --max ({})",
                        overrides.min_range.unwrap_or(current.min_range),
                        overrides.max_range.unwrap_or(current.max_range)
                    ),
                )
                .exit();
            }
        }
    }

    if cli.stats {
        print_stats(&storage.load::<GameStats>());
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let mut session = Session::load(storage, TerminalBell);
    if cli.new_game {
        session.new_game();
    }
    let mut app = App::new(session);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend, S: KeyValueStore, H: FeedbackHook>(
    terminal: &mut Terminal<B>,
    app: &mut App<S, H>,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(TICK_RATE_MS),
    );

    terminal.draw(|f| ui(app, f))?;

    loop {
        match runner.step() {
            GameEvent::Tick => {
                // only the feedback pulse animates
                if app.session.is_pulsing() {
                    app.session.on_tick();
                    terminal.draw(|f| ui(app, f))?;
                }
            }
            GameEvent::Resize => {
                terminal.draw(|f| ui(app, f))?;
            }
            GameEvent::Key(key) => {
                if !app.on_key(key) {
                    break;
                }
                terminal.draw(|f| ui(app, f))?;
            }
        }
    }

    Ok(())
}

fn ui<S: KeyValueStore, H: FeedbackHook>(app: &App<S, H>, f: &mut Frame) {
    f.render_widget(app, f.area());

    if app.state == AppState::Won {
        ui::render_win_dialog(app, f);
    }
}
