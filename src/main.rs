// Terminal client for the Latin vocabulary trainer.
// - vocabulary list: add, edit, delete, sort, filter by type, search
// - multiple-choice quiz, verb and noun sorting quizzes (three items per round)
// - gallery of unlocked bronze cards

use std::{env, io, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use latin_vocab::{
    api::HttpApi,
    app::App,
    config::{AppConfig, API_ENV},
    keys::{handle_key, handle_mouse},
    logging::init_logging,
    theme::ThemeKind,
    ui::ui,
};

#[derive(Debug, Clone, Parser)]
#[command(name = "latin-vocab", about = "Latin vocabulary trainer TUI", version)]
struct Cli {
    /// API base URL, e.g. http://127.0.0.1:5000/api (overrides LATIN_VOCAB_API and the config file)
    #[arg(long)]
    api: Option<String>,

    /// Config file; defaults to the first latin-vocab.toml found from the working directory upwards
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Appearance: dark | light
    #[arg(long, value_enum)]
    theme: Option<ThemeKind>,

    /// Log filter, e.g. info or latin_vocab=debug
    #[arg(long = "log-level")]
    log_level: Option<String>,

    /// Directory for the rolling log file
    #[arg(long = "log-dir")]
    log_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref()).context("failed to load config")?;
    config.apply_api_override(cli.api.clone(), env::var(API_ENV).ok());
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if let Some(level) = cli.log_level {
        config.log.level = level;
    }
    if let Some(dir) = cli.log_dir {
        config.log.dir = dir;
    }

    let _log_guard = init_logging(&config.log.dir, &config.log.level)?;
    info!(api = %config.api_base, "starting");

    let api = HttpApi::new(&config.api_base, config.http.timeout())
        .context("failed to build HTTP client")?;
    let mut app = App::new(Box::new(api), &config);
    app.load_vocab();

    // TUI setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // restore
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    info!("exiting");
    res
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;
        if event::poll(Duration::from_millis(200))? {
            match event::read()? {
                Event::Key(k) => {
                    if handle_key(app, k) {
                        break;
                    }
                }
                Event::Mouse(m) => handle_mouse(app, m),
                _ => {}
            }
        }
    }
    Ok(())
}
