//! src/main.rs
//! Splashify: an endless photo feed in the terminal.

use std::{
    io::{self, Stdout},
    panic::PanicHookInfo,
    process::ExitCode,
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend};
use tokio::{
    signal,
    sync::{Notify, mpsc},
};
use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use splashify_core::{
    Logger,
    api::client::{PhotoApi, UnsplashClient},
    config::Config,
    controller::{
        action_dispatcher::ActionDispatcher,
        actions::Action,
        event_loop::{EventLoop, TaskResult},
    },
    model::app_state::AppState,
    view::{theme, ui::UIRenderer},
};

type AppTerminal = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() -> ExitCode {
    setup_panic_handler();

    let loaded = match Config::load().await {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("splashify: {e}");
            return ExitCode::from(2);
        }
    };
    let config = loaded.config;
    if let Some(e) = &loaded.rejected {
        eprintln!("splashify: invalid config, using defaults: {e}");
    }

    // Credentials are checked before the terminal is taken over so the
    // message stays readable.
    let access_key = match Config::config_path()
        .and_then(|path| config.api.resolve_access_key(&path))
    {
        Ok(key) => key,
        Err(e) => {
            eprintln!("splashify: {e}");
            return ExitCode::from(2);
        }
    };

    let _log_guard = init_logging(&config);
    if let Some(e) = loaded.rejected {
        warn!(error = %e, "Invalid config file, using defaults");
    }
    theme::init_theme();

    let result = match App::new(config, &access_key) {
        Ok(app) => app.run().await.context("Application runtime error"),
        Err(e) => Err(e.context("Failed to initialize application")),
    };

    match result {
        Ok(()) => {
            info!("Application exited cleanly");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e:#}");
            eprintln!("splashify: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// The app runs without file logs if the log directory is unusable.
fn init_logging(config: &Config) -> Option<WorkerGuard> {
    let dir = match config.log_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("splashify: logging disabled: {e}");
            return None;
        }
    };

    match Logger::init(&config.logging, &dir) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("splashify: logging disabled: {e}");
            None
        }
    }
}

struct App {
    terminal: AppTerminal,
    state: AppState,
    event_loop: EventLoop,
    dispatcher: ActionDispatcher,
    renderer: UIRenderer,
    shutdown: Arc<Notify>,
    started: Instant,
}

impl App {
    fn new(config: Config, access_key: &str) -> Result<Self> {
        info!("Starting Splashify");

        let client =
            UnsplashClient::new(&config.api, access_key).context("Failed to build HTTP client")?;
        let api: Arc<dyn PhotoApi> = Arc::new(client);

        let (task_tx, task_rx) = mpsc::unbounded_channel::<TaskResult>();
        let (dispatcher, debounce_rx) = ActionDispatcher::new(api, &config, task_tx);
        let state = AppState::new(&config);

        let terminal = setup_terminal().context("Failed to initialize terminal")?;
        let event_loop = EventLoop::new(task_rx, debounce_rx);

        Ok(Self {
            terminal,
            state,
            event_loop,
            dispatcher,
            renderer: UIRenderer::new(),
            shutdown: Arc::new(Notify::new()),
            started: Instant::now(),
        })
    }

    async fn run(mut self) -> Result<()> {
        self.setup_shutdown_handler();

        let size = self.terminal.size().context("Failed to query terminal size")?;
        self.dispatcher
            .handle(&mut self.state, Action::Resize(size.width, size.height));
        self.dispatcher.start(&mut self.state);

        info!("Entering event loop");
        loop {
            self.render()?;

            let action = tokio::select! {
                _ = self.shutdown.notified() => {
                    info!("Shutdown signal received");
                    break;
                }
                action = self.event_loop.next_action(&self.state) => action,
            };

            let Some(action) = action else { break };
            debug!("Dispatching action: {:?}", action);
            if !self.dispatcher.handle(&mut self.state, action) {
                break;
            }
        }

        self.dispatcher.shutdown(&mut self.state);
        self.log_final_metrics();
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        if !self.state.ui.needs_redraw() {
            return Ok(());
        }

        let start = Instant::now();
        let state = &self.state;
        let renderer = &mut self.renderer;
        self.terminal
            .draw(|frame: &mut Frame<'_>| renderer.render(frame, state))
            .context("Failed to draw terminal")?;
        self.state.ui.clear_redraw();

        let duration = start.elapsed();
        if duration > Duration::from_millis(16) {
            warn!("Slow render: {}ms (target: <16ms)", duration.as_millis());
        }
        Ok(())
    }

    fn log_final_metrics(&self) {
        let stats = self.dispatcher.stats();
        let render = self.renderer.stats();
        info!(
            uptime_s = self.started.elapsed().as_secs(),
            events = self.event_loop.events_seen(),
            actions = stats.actions,
            cycles = stats.cycles_launched,
            cycles_applied = self.state.cycles_applied,
            cycles_failed = self.state.cycles_failed,
            photos = self.state.photo_count(),
            frames = render.frames,
            slow_frames = render.slow,
            render_ms = render.total.as_millis() as u64,
            "Final metrics"
        );
    }

    fn setup_shutdown_handler(&self) {
        let shutdown = Arc::clone(&self.shutdown);
        tokio::spawn(async move {
            #[cfg(unix)]
            {
                use tokio::signal::unix::{SignalKind, signal};

                let mut sigterm = match signal(SignalKind::terminate()) {
                    Ok(s) => s,
                    Err(e) => {
                        warn!("Failed to create SIGTERM handler: {}", e);
                        return;
                    }
                };
                tokio::select! {
                    _ = sigterm.recv() => info!("Received SIGTERM"),
                    _ = signal::ctrl_c() => info!("Received Ctrl+C"),
                }
            }

            #[cfg(not(unix))]
            {
                if let Err(e) = signal::ctrl_c().await {
                    warn!("Failed to listen for Ctrl+C: {}", e);
                    return;
                }
                info!("Received Ctrl+C");
            }

            shutdown.notify_one();
        });
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Err(e) = cleanup_terminal(&mut self.terminal) {
            warn!("Failed to cleanup terminal: {}", e);
        }
    }
}

fn setup_terminal() -> Result<AppTerminal> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;

    info!("Terminal setup complete");
    Ok(terminal)
}

fn cleanup_terminal(terminal: &mut AppTerminal) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    info!("Terminal cleanup complete");
    Ok(())
}

fn setup_panic_handler() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info: &PanicHookInfo<'_>| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen, DisableMouseCapture);
        error!("Application panicked: {}", panic_info);
        original_hook(panic_info);
    }));
}
