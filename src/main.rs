use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
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
    layout::{Constraint, Layout},
    Terminal,
};
use tokio::runtime::Runtime;

use attackwatch::app::{export_json, App};
use attackwatch::config::{Overrides, Settings};
use attackwatch::logging::{self, LogTarget};
use attackwatch::{events, ui};
use attackwatch::{load_page, DashboardPoller, FileSource, HttpSource, Page, SnapshotSource};

#[derive(Parser, Debug)]
#[command(name = "attackwatch")]
#[command(about = "Terminal dashboard for attack metrics served at /update_data")]
struct Args {
    /// Dashboard address (e.g., "http://127.0.0.1:5000")
    #[arg(short, long, conflicts_with = "file")]
    url: Option<String>,

    /// Read snapshots from a saved /update_data response instead of HTTP
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Settings file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Refresh interval (e.g., "30s", "1m")
    #[arg(short, long)]
    refresh: Option<String>,

    /// Request timeout (e.g., "10s"). No timeout by default.
    #[arg(long)]
    timeout: Option<String>,

    /// Write diagnostics to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Load the page once, print it as JSON and exit
    #[arg(long, conflicts_with = "export")]
    once: bool,

    /// Load the page once, write it as JSON to a file and exit
    #[arg(short, long)]
    export: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let overrides = Overrides {
        base_url: args.url.clone(),
        refresh: args.refresh.clone(),
        request_timeout: args.timeout.clone(),
        log_file: args.log_file.clone(),
    };
    let settings = Settings::load(args.config.as_deref(), &overrides)?;

    let interactive = !args.once && args.export.is_none();
    logging::init(&LogTarget::select(settings.log_file.as_deref(), interactive))?;

    let rt = Runtime::new()?;
    let source = create_source(&args, &settings)?;

    // Handle one-shot modes (non-interactive)
    if args.once {
        let json = rt.block_on(load_once(source.as_ref()))?;
        println!("{}", json);
        return Ok(());
    }
    if let Some(ref export_path) = args.export {
        return export_to_file(&rt, source.as_ref(), export_path);
    }

    run_tui(&rt, source, &settings)
}

/// Build the snapshot source from flags and settings
fn create_source(args: &Args, settings: &Settings) -> Result<Arc<dyn SnapshotSource>> {
    if let Some(ref path) = args.file {
        return Ok(Arc::new(FileSource::new(path)));
    }

    let source = HttpSource::builder()
        .base_url(settings.base_url.clone())
        .endpoint(settings.endpoint.clone())
        .timeout(settings.request_timeout)
        .build()
        .context("Failed to create HTTP client")?;
    Ok(Arc::new(source))
}

/// Load a page once and serialize it
async fn load_once(source: &dyn SnapshotSource) -> Result<String> {
    let page = parking_lot::Mutex::new(Page::dashboard());
    load_page(source, &page)
        .await
        .with_context(|| format!("Failed to load dashboard from {}", source.description()))?;
    let json = export_json(&page.lock())?;
    Ok(json)
}

/// Export the dashboard state to a JSON file
fn export_to_file(rt: &Runtime, source: &dyn SnapshotSource, export_path: &Path) -> Result<()> {
    let json = rt.block_on(load_once(source))?;
    std::fs::write(export_path, json)
        .with_context(|| format!("Failed to write {}", export_path.display()))?;

    println!("Exported dashboard state to: {}", export_path.display());
    Ok(())
}

/// Run the TUI against the given source
fn run_tui(rt: &Runtime, source: Arc<dyn SnapshotSource>, settings: &Settings) -> Result<()> {
    // Load the page before the timer starts; a failure leaves it empty
    let page = Page::dashboard().into_shared();
    let loaded = rt.block_on(load_page(source.as_ref(), &page)).is_ok();

    let mut poller = DashboardPoller::new(source.clone(), page.clone()).with_period(settings.refresh);
    {
        let _guard = rt.enter();
        poller.start();
    }

    let mut app = App::new(
        source,
        page,
        poller,
        rt.handle().clone(),
        ui::Theme::auto_detect(),
    );
    if loaded {
        app.mark_loaded();
    }

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
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    // Run the main loop
    let result = run_app(&mut terminal, &mut app);

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
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 16;

    while app.running {
        app.poll_reload();

        // Draw UI
        terminal.draw(|frame| {
            let area = frame.area();

            // Check for minimum terminal size
            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let centered = ratatui::layout::Rect::new(
                    0,
                    (area.height / 2).saturating_sub(2),
                    area.width,
                    5.min(area.height),
                );
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Min(9),    // Dashboard
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::dashboard::render(frame, app, chunks[1]);
            ui::common::render_status_bar(frame, app, chunks[2]);

            // Render help overlay if active
            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout; the poller refreshes the
        // page on its own task
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse),
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }
    }

    Ok(())
}
