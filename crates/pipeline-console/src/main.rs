use ratatui::{
    backend::CrosstermBackend,
    crossterm::{
        event::{self, Event, KeyEventKind},
        execute,
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    },
    Terminal,
};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

mod actions;
mod dispatcher;
mod log_source;
mod logger;
mod middleware;
mod reducers;
mod state;
mod store;
mod view_models;
mod views;

use actions::Action;
use log_source::FileLogSource;
use middleware::{
    bootstrap_middleware::BootstrapMiddleware, keyboard_middleware::KeyboardMiddleware,
    log_fetch_middleware::LogFetchMiddleware, logging_middleware::LoggingMiddleware,
};
use pipeline_console_config::ConsoleConfig;
use pipeline_log_view::ContainerSize;
use state::AppState;
use store::Store;

fn main() -> anyhow::Result<()> {
    // File-based logger, the terminal belongs to the UI
    let log_file = logger::init();

    log::info!("Starting pipeline-console");
    if let Some(path) = &log_file {
        log::info!("Logging to {}", path.display());
    }

    let mut config = ConsoleConfig::load();
    if let Some(dir) = log_source::log_dir_from_args(std::env::args()) {
        config = config.with_log_dir(dir.to_string_lossy());
    }
    log::info!("Reading console logs from {}", config.log_dir);

    // Fetches run here; the UI loop stays on the main thread
    let runtime = tokio::runtime::Runtime::new()?;
    let source = Arc::new(FileLogSource::new(&config.log_dir));

    let mut store = Store::new(AppState::new(config.clone()));

    // Add middleware in order (they execute in this order)
    store.add_middleware(Box::new(LoggingMiddleware::new()));
    store.add_middleware(Box::new(BootstrapMiddleware::new(
        source.clone(),
        Duration::from_millis(config.tick_rate_ms),
    )));
    store.add_middleware(Box::new(KeyboardMiddleware::new()));
    store.add_middleware(Box::new(LogFetchMiddleware::new(
        source,
        config.fetch_size,
        runtime.handle().clone(),
    )));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main event loop
    let result = run_app(&mut terminal, &mut store);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        log::error!("Console loop failed: {}", err);
        eprintln!("Error: {}", err);
    }

    // Running fetches are not awaited
    runtime.shutdown_background();
    log::info!("Exiting pipeline-console");
    Ok(())
}

/// Time spent on queued actions before the next frame is drawn
const ACTION_BUDGET: Duration = Duration::from_millis(16);

/// Longest wait for a key press when nothing is queued
const IDLE_POLL: Duration = Duration::from_millis(50);

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    store: &mut Store,
) -> io::Result<()> {
    // Queue bootstrap to be processed by the main loop (not synchronously)
    // This ensures renders happen during bootstrap, not just after
    store.dispatcher().dispatch(Action::BootstrapStart);

    loop {
        // Process pending actions with a time budget to avoid blocking renders
        let start = Instant::now();

        while let Some(action) = store.dispatcher().pop() {
            store.dispatch(action);

            // Check budget after each action - remaining actions stay in queue
            if start.elapsed() >= ACTION_BUDGET {
                break;
            }
        }

        // Render
        let mut frame_area = ratatui::layout::Rect::default();
        terminal.draw(|frame| {
            frame_area = frame.area();
            views::render(store.state(), frame_area, frame);
        })?;

        // Card bodies are sized from the area left for the step list
        let container = ContainerSize::new(
            frame_area.width,
            frame_area.height.saturating_sub(views::STATUS_BAR_HEIGHT),
        );
        if store.state().console.container != container {
            store.dispatch(Action::GlobalResize(container));
        }

        // Check if we should quit
        if !store.state().running {
            break;
        }

        // Left over actions are drawn next frame without waiting for input
        let timeout = if store.dispatcher().pending() > 0 {
            Duration::ZERO
        } else {
            IDLE_POLL
        };
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press {
                    store.dispatch(Action::GlobalKeyPressed(key));
                }
            }
        }
    }

    Ok(())
}
