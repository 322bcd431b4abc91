use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::{
    event::{poll, read, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tclub::api::ClubApi;
use tclub::app::{App, View};
use tclub::config::Config;
use tclub::theme::Theme;
use tclub::ui::splash::{render as render_splash, SplashState};
use tclub::{event, ui};
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Terminal admin console for a football club
#[derive(Parser, Debug)]
#[command(name = "tclub", version, about, long_about = None)]
struct Args {
    /// Club API base URL
    #[arg(short, long)]
    api_url: Option<String>,

    /// Screen to open first
    #[arg(long, value_enum)]
    view: Option<ViewArg>,

    /// Theme name (dark, light, or a skin file)
    #[arg(short, long)]
    theme: Option<String>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,

    /// Run in read-only mode (block create, edit and delete)
    #[arg(long)]
    readonly: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ViewArg {
    Calendar,
    Teams,
    Students,
    Coaches,
}

impl From<ViewArg> for View {
    fn from(arg: ViewArg) -> Self {
        match arg {
            ViewArg::Calendar => View::Calendar,
            ViewArg::Teams => View::Teams,
            ViewArg::Students => View::Students,
            ViewArg::Coaches => View::Coaches,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("tclub started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = Config::config_dir() {
        return config_dir.join("tclub.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".tclub").join("tclub.log");
    }
    PathBuf::from("tclub.log")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = initialize_with_splash(&mut terminal, &args).await;

    match result {
        Ok(Some(mut app)) => {
            let run_result = run_app(&mut terminal, &mut app).await;
            cleanup_terminal(&mut terminal)?;

            if let Err(err) = run_result {
                eprintln!("Error: {err:?}");
            }
        },
        Ok(None) => {
            cleanup_terminal(&mut terminal)?;
        },
        Err(err) => {
            cleanup_terminal(&mut terminal)?;
            eprintln!("Initialization error: {err:?}");
        },
    }

    Ok(())
}

fn cleanup_terminal<B: Backend + std::io::Write>(terminal: &mut Terminal<B>) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn initialize_with_splash<B: Backend>(
    terminal: &mut Terminal<B>,
    args: &Args,
) -> Result<Option<App>>
where
    B::Error: Send + Sync + 'static,
{
    let mut splash = SplashState::new(3);

    // Step 1: Load configuration and theme
    let config = Config::load();
    let theme = Theme::resolve(&config.effective_theme(args.theme.as_deref()));
    terminal.draw(|f| render_splash(f, &splash, &theme))?;

    if check_abort()? {
        return Ok(None);
    }

    splash.set_message("Loading configuration");
    terminal.draw(|f| render_splash(f, &splash, &theme))?;
    let api_url = config.effective_api_url(args.api_url.as_deref());
    tracing::info!("Using API at {}", api_url);
    splash.complete_step();

    if check_abort()? {
        return Ok(None);
    }

    // Step 2: Build the API client
    splash.set_message(&format!("Connecting to {}", api_url));
    terminal.draw(|f| render_splash(f, &splash, &theme))?;

    let api = ClubApi::new(&api_url)
        .with_context(|| format!("Invalid API URL: {}", api_url))?;
    splash.complete_step();

    if check_abort()? {
        return Ok(None);
    }

    // Step 3: Load the first view
    let view = args
        .view
        .map(View::from)
        .or_else(|| config.last_view.as_deref().and_then(View::from_key))
        .unwrap_or_default();

    splash.set_message(&format!("Loading {}", view.title().to_lowercase()));
    terminal.draw(|f| render_splash(f, &splash, &theme))?;

    let mut app = App::new(api, view, config, theme, args.readonly);
    app.mount_view().await;

    splash.complete_step();
    splash.set_message("Ready!");
    terminal.draw(|f| render_splash(f, &splash, &app.theme))?;

    tokio::time::sleep(Duration::from_millis(200)).await;

    Ok(Some(app))
}

fn check_abort() -> Result<bool> {
    if poll(Duration::from_millis(50))? {
        if let Event::Key(key) = read()? {
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if event::handle_events(app).await? {
            return Ok(());
        }
    }
}
