pub mod app_dirs;
pub mod clock;
pub mod combo;
pub mod config;
pub mod ledger;
pub mod runtime;
pub mod score;
pub mod session;
pub mod target;
pub mod tier;
pub mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::KeyCode,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};

use crate::clock::SystemClock;
use crate::config::{ConfigStore, FileConfigStore};
use crate::ledger::{FileScoreStore, HighScoreLedger, ScoreStore, MAX_HIGH_SCORES};
use crate::runtime::{CrosstermEventSource, GameEvent, Runner};
use crate::session::SessionController;

const TICK_RATE_MS: u64 = 50;

/// terminal reflex micro-game
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Strike the ember node before it jumps away. The node speeds up as your score climbs; chained hits multiply the reward until you miss or hesitate."
)]
pub struct Cli {
    /// run length in seconds
    #[clap(short = 's', long)]
    seconds: Option<u64>,

    /// print the high-score ledger and exit
    #[clap(long)]
    scores: bool,

    /// alternate high-score file
    #[clap(long, value_name = "PATH")]
    store: Option<PathBuf>,
}

pub struct App {
    pub session: SessionController<FileScoreStore, SystemClock>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let store = match &cli.store {
        Some(path) => FileScoreStore::with_path(path),
        None => FileScoreStore::new(),
    };

    if cli.scores {
        print_scores(&store);
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let mut config = FileConfigStore::new().load();
    if let Some(secs) = cli.seconds {
        config.duration_secs = secs.max(1);
    }

    let ledger = HighScoreLedger::load(store);
    let session = SessionController::new(config, ledger, SystemClock);
    let mut app = App { session };

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn print_scores(store: &FileScoreStore) {
    let entries = store.load();
    if entries.is_empty() {
        println!("no high scores yet");
        return;
    }
    println!("high scores");
    for (idx, entry) in entries.iter().take(MAX_HIGH_SCORES).enumerate() {
        println!(
            "{:>2}. {:>4}  {}",
            idx + 1,
            entry.score,
            entry.date.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M")
        );
    }
}

fn run_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(TICK_RATE_MS),
    );

    loop {
        // Input first, then due timers: a tap always beats a timer
        // callback pending for the same instant
        match runner.step() {
            GameEvent::Key(key) => match key.code {
                KeyCode::Esc => break,
                KeyCode::Enter => {
                    if !app.session.is_active() {
                        app.session.start();
                    }
                }
                KeyCode::Char(c) => {
                    if app.session.is_active() {
                        let glyph = app.session.target().map(|t| t.glyph);
                        if glyph == Some(c.to_ascii_lowercase()) {
                            app.session.target_hit();
                        } else {
                            app.session.field_miss();
                        }
                    } else if c == ' ' {
                        app.session.start();
                    }
                }
                _ => {}
            },
            GameEvent::Resize | GameEvent::Tick => {}
        }

        app.session.advance();
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;
    }

    Ok(())
}
