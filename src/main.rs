use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Terminal,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use harvester_watch::data::duration::parse_duration;
use harvester_watch::export::{build_export, write_export};
use harvester_watch::{events, ui, App, Settings, SourceKind, TickDriver, View};

#[derive(Parser, Debug)]
#[command(name = "harvester-watch")]
#[command(about = "Live terminal dashboard for forest harvester sensor telemetry")]
struct Args {
    /// TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reading generator
    #[arg(short, long, value_enum)]
    source: Option<SourceKind>,

    /// Tick interval (e.g., "1s", "500ms")
    #[arg(short, long)]
    interval: Option<String>,

    /// Seed for the noise generator
    #[arg(long)]
    seed: Option<u64>,

    /// History points kept per sensor
    #[arg(long)]
    history_capacity: Option<usize>,

    /// File receiving log output (the terminal is owned by the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Run without a terminal and write the final state to a JSON file
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Ticks to run before exporting (used with --export)
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    ticks: u64,
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(ref path) = args.log_file {
        init_logging(path)?;
    }

    let settings = resolve_settings(&args)?;
    info!(?settings, "starting harvester-watch");

    if let Some(ref export_path) = args.export {
        return export_to_file(&settings, export_path, args.ticks);
    }

    run_tui(&settings)
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("harvester_watch=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Layer command-line flags over file and environment settings.
fn resolve_settings(args: &Args) -> Result<Settings> {
    let mut settings = Settings::load(args.config.as_deref())?;

    if let Some(source) = args.source {
        settings.source = source;
    }
    if let Some(ref interval) = args.interval {
        settings.tick_interval = parse_duration(interval)?;
    }
    if let Some(seed) = args.seed {
        settings.noise_seed = seed;
    }
    if let Some(capacity) = args.history_capacity {
        settings.history_capacity = capacity;
    }

    settings.validate()?;
    Ok(settings)
}

/// Run the TUI on a fresh tokio runtime.
fn run_tui(settings: &Settings) -> Result<()> {
    let driver = TickDriver::from_settings(settings)?;

    let rt = tokio::runtime::Runtime::new()?;
    let _guard = rt.enter();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let mut app = App::new(driver);
    app.start();

    let result = run_app(&mut terminal, &mut app);

    app.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 70;
    const MIN_HEIGHT: u16 = 18;

    while app.running {
        app.reload_data();

        terminal.draw(|frame| {
            let area = frame.area();

            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = Paragraph::new(msg)
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(Color::Yellow));
                let centered = Rect::new(0, (area.height / 2).saturating_sub(2), area.width, 5);
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(13),   // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::common::render_tabs(frame, app, chunks[1]);

            if let Some(ref message) = app.load_error {
                ui::common::render_error(frame, app, message, chunks[2]);
            } else {
                match app.current_view {
                    View::Overview => ui::overview::render(frame, app, chunks[2]),
                    View::Charts => ui::charts::render(frame, app, chunks[2]),
                }
            }

            ui::common::render_status_bar(frame, app, chunks[3]);

            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                // Content starts after header (1) + tabs (1)
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse, 2),
                _ => {}
            }
        }
    }

    Ok(())
}

/// Run a fixed number of ticks at one-second steps and export the result.
fn export_to_file(settings: &Settings, export_path: &Path, ticks: u64) -> Result<()> {
    let driver = TickDriver::from_settings(settings)?;
    let mut last = None;
    for t in 0..ticks {
        last = Some(driver.tick_at(t as f64)?);
    }
    let snapshot = last.context("No ticks were run")?;

    let export = build_export(&snapshot, &driver.history_buffer(), &driver.sensors())?;
    write_export(export_path, &export)?;

    info!(path = %export_path.display(), ticks, "exported state");
    println!("Exported harvester state to: {}", export_path.display());
    Ok(())
}
