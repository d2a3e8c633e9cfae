use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use tcal::app::App;
use tcal::config::Config;
use tcal::editor::ExternalEditor;
use tcal::event::{AppEvent, EventSource};
use tcal::store::{CsvStore, RecordStore};
use tcal::ui::theme::Theme;
use tcal::view::ViewMode;

#[derive(Parser)]
#[command(name = "tcal", version, about = "Keyboard-driven terminal agenda and calendar")]
struct Cli {
    #[arg(short, long, help = "CSV file holding the records")]
    data: Option<PathBuf>,

    #[arg(short, long, value_enum, help = "View to open on start")]
    view: Option<ViewMode>,

    #[arg(short, long, help = "Editor command used for editing records")]
    editor: Option<String>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,
}

/// Send logs to a file so they never land on the terminal.
fn init_tracing(log_path: &Path) -> Result<()> {
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = File::options()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("opening log file {}", log_path.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init()?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_default();
    if let Some(data) = cli.data {
        config.data_csv_path = data.to_string_lossy().to_string();
    }
    if let Some(view) = cli.view {
        config.default_view = view;
    }
    if let Some(editor) = cli.editor {
        config.editor = Some(editor);
    }
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    config.validate();

    init_tracing(Path::new(&config.log_file))?;
    info!(data = %config.data_csv_path, "starting");

    let store = CsvStore::new(&config.data_csv_path);
    let (records, load_error) = match store.load() {
        Ok(records) => {
            info!(count = records.len(), "loaded records");
            (records, None)
        }
        Err(err) => (Vec::new(), Some(err)),
    };
    let editor = ExternalEditor::from_env(config.editor.as_deref());
    let theme = Theme::load(&config.theme).unwrap_or_else(|| {
        warn!(theme = %config.theme, "unknown theme, using default");
        Theme::default()
    });
    let mut app = App::new(&config, theme, records, Box::new(store), Box::new(editor));
    if let Some(err) = load_error {
        app = app.with_load_error(&err);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventSource::new(config.tick_rate());

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventSource,
) -> Result<()> {
    let mut dirty = true;
    loop {
        if dirty {
            terminal.draw(|frame| app.render(frame))?;
        }

        match events.next()? {
            AppEvent::Key(key) => dirty = app.handle_input(key),
            AppEvent::Tick => dirty = app.tick(Instant::now()),
            AppEvent::Resize => dirty = true,
        }

        if app.has_pending_edit() {
            with_suspended_terminal(terminal, || app.run_pending_edit())?;
            dirty = true;
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Hand the terminal to a foreground program and take it back afterwards.
fn with_suspended_terminal(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    run: impl FnOnce(),
) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run();

    enable_raw_mode()?;
    execute!(terminal.backend_mut(), EnterAlternateScreen)?;
    terminal.clear()?;
    Ok(())
}
