mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use itertools::Itertools;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::{Duration, Instant},
};
use wordflash::{
    config::{Config, ConfigStore, FileConfigStore},
    pool::WordPool,
    runtime::{AppEvent, CrosstermEventSource, Runner},
    session::SessionRequest,
    speech::{CommandSpeaker, NullSpeaker, Speaker},
    trainer::{SourceSpec, Trainer},
};

const TICK_RATE_MS: u64 = 100;
const DELAY_STEP_SECS: f64 = 0.5;

/// terminal vocabulary flashcard trainer
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Loads a word list, draws a random subset, and presents each item one at a time with optional spoken playback and a configurable pause. Review the played list afterwards."
)]
pub struct Cli {
    /// number of items to draw per session
    #[clap(short = 'n', long)]
    count: Option<usize>,

    /// seconds to pause between items
    #[clap(short = 'd', long)]
    delay: Option<f64>,

    /// what to drill: words from a list, or random numbers
    #[clap(short = 'm', long, value_enum)]
    mode: Option<DrillMode>,

    /// embedded word list to use (see --show-lists)
    #[clap(short = 'l', long)]
    list: Option<String>,

    /// newline-delimited word file, one word per line (overrides --list)
    #[clap(short = 'f', long)]
    word_file: Option<PathBuf>,

    /// disable spoken playback
    #[clap(long)]
    no_speech: bool,

    /// external text-to-speech command (default: say on macOS, espeak elsewhere)
    #[clap(long)]
    speech_command: Option<String>,

    /// print the embedded word list names and exit
    #[clap(long)]
    show_lists: bool,

    /// persist the resolved settings as new defaults
    #[clap(long)]
    save_config: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
pub enum DrillMode {
    Words,
    Numbers,
}

/// Config file defaults overridden by whatever was passed on the CLI.
fn resolve_config(cli: &Cli, mut cfg: Config) -> Config {
    if let Some(count) = cli.count {
        cfg.count = count;
    }
    if let Some(delay) = cli.delay {
        cfg.delay_secs = delay;
    }
    if let Some(mode) = cli.mode {
        cfg.mode = mode.to_string().to_lowercase();
    }
    if let Some(list) = &cli.list {
        cfg.word_list = list.clone();
        cfg.word_file = None;
    }
    if let Some(file) = &cli.word_file {
        cfg.word_file = Some(file.clone());
    }
    if cli.no_speech {
        cfg.speech = false;
    }
    if let Some(cmd) = &cli.speech_command {
        cfg.speech_command = Some(cmd.clone());
    }
    cfg
}

fn source_spec(cfg: &Config) -> SourceSpec {
    if cfg.mode == "numbers" {
        SourceSpec::Numbers
    } else if let Some(file) = &cfg.word_file {
        SourceSpec::WordFile(file.clone())
    } else {
        SourceSpec::EmbeddedList(cfg.word_list.clone())
    }
}

fn make_speaker(cfg: &Config) -> Box<dyn Speaker> {
    if !cfg.speech {
        return Box::new(NullSpeaker);
    }
    match &cfg.speech_command {
        Some(cmd) => Box::new(CommandSpeaker::new(cmd.clone(), vec![])),
        None => Box::new(CommandSpeaker::platform_default()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Settings,
    Playing,
    Review,
}

pub struct App {
    pub trainer: Trainer,
    pub screen: Screen,
    pub count: usize,
    pub delay_secs: f64,
    pub status: String,
}

impl App {
    pub fn new(cfg: &Config) -> Self {
        let mut app = Self {
            trainer: Trainer::new(source_spec(cfg), make_speaker(cfg)),
            screen: Screen::Settings,
            count: cfg.count,
            delay_secs: cfg.delay_secs.max(0.0),
            status: String::new(),
        };
        app.reload_pool();
        app
    }

    pub fn reload_pool(&mut self) {
        match self.trainer.load_pool() {
            Ok(status) => {
                // Keep the count setting inside the new bounds.
                self.count = self.count.clamp(1, status.count);
                self.status = format!(
                    "Ready ({}). Adjust settings and press s to start.",
                    status.description
                );
            }
            Err(e) => {
                self.status = format!("Error loading items: {e}");
            }
        }
    }

    pub fn try_start(&mut self) {
        let request = match SessionRequest::from_seconds(self.count, self.delay_secs) {
            Ok(req) => req,
            Err(e) => {
                self.status = format!("Error: {e}");
                return;
            }
        };
        match self.trainer.start_session(request) {
            Ok(()) => {
                self.screen = Screen::Playing;
                self.status = "Starting sequence...".to_string();
            }
            Err(e) => {
                self.status = format!("Error: {e}");
            }
        }
    }

    pub fn on_session_finished(&mut self) {
        let items = self.trainer.last_session_items();
        let preview = items.iter().take(4).join(", ");
        self.status = if items.len() > 4 {
            format!("Finished! {} items played: {preview}, ...", items.len())
        } else {
            format!("Finished! {} items played: {preview}", items.len())
        };
        self.screen = Screen::Settings;
    }

    fn adjust_count(&mut self, up: bool) {
        let max = self.trainer.max_count().unwrap_or(1).max(1);
        self.count = if up {
            (self.count + 1).min(max)
        } else {
            self.count.saturating_sub(1).max(1)
        };
    }

    fn adjust_delay(&mut self, up: bool) {
        self.delay_secs = if up {
            self.delay_secs + DELAY_STEP_SECS
        } else {
            (self.delay_secs - DELAY_STEP_SECS).max(0.0)
        };
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.show_lists {
        for name in WordPool::embedded_names() {
            println!("{name}");
        }
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let cfg = resolve_config(&cli, store.load());
    if cli.save_config {
        store.save(&cfg)?;
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&cfg);
    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(TICK_RATE_MS),
    );

    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        match runner.step() {
            AppEvent::Tick => {
                if app.trainer.is_session_active() {
                    app.trainer.tick(Instant::now());
                    if !app.trainer.is_session_active() {
                        app.on_session_finished();
                    }
                }
            }
            AppEvent::Resize => {}
            AppEvent::Key(key) => {
                if handle_key(app, key) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Returns true when the app should quit.
fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    if key.code == KeyCode::Esc
        || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
    {
        return true;
    }

    match app.screen {
        Screen::Settings => match key.code {
            KeyCode::Up => app.adjust_count(true),
            KeyCode::Down => app.adjust_count(false),
            KeyCode::Right => app.adjust_delay(true),
            KeyCode::Left => app.adjust_delay(false),
            KeyCode::Char('s') => app.try_start(),
            KeyCode::Char('r') => app.reload_pool(),
            KeyCode::Char('l') => {
                if app.trainer.can_review() {
                    app.screen = Screen::Review;
                }
            }
            _ => {}
        },
        // No cancel affordance: a session runs to completion.
        Screen::Playing => {}
        Screen::Review => match key.code {
            KeyCode::Char('b') | KeyCode::Backspace => {
                app.screen = Screen::Settings;
            }
            _ => {}
        },
    }

    false
}
