mod app;
mod components;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::state::app_settings::AppSettings;
use crate::state::loader::{LoadWorker, LoadingState};
use crate::state::messages::{LoadRequest, LoadResponse, UiEvent};
use crate::state::refresher::PeriodicRefresher;
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use log::{error, info};
use std::io::Stdout;
use std::path::PathBuf;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tui::{Terminal, backend::CrosstermBackend};

#[derive(Debug, PartialEq)]
enum CliAction {
    Run { snapshot: Option<PathBuf> },
    Exit,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let CliAction::Run { snapshot } = handle_cli_args(std::env::args().skip(1)) else {
        return Ok(());
    };

    better_panic::install();

    let mut settings = AppSettings::load();
    if snapshot.is_some() {
        settings.snapshot = snapshot;
    }

    tui_logger::init_logger(settings.log_level)?;
    tui_logger::set_default_level(settings.log_level);

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal()?;

    let startup_snapshot = settings.snapshot.clone();
    let reload_every = settings.reload_every;
    let app = Arc::new(Mutex::new(App::new(settings)));

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (load_req_tx, load_req_rx) = mpsc::channel::<LoadRequest>(100);
    let (load_resp_tx, load_resp_rx) = mpsc::channel::<LoadResponse>(100);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Snapshot loader thread
    let load_worker = LoadWorker::new(load_req_rx, load_resp_tx);
    let load_task = tokio::spawn(load_worker.run());

    // Periodic snapshot reload thread
    let periodic_task = reload_every.map(|every| {
        info!("reloading snapshot every {}s", every.as_secs());
        tokio::spawn(PeriodicRefresher::new(load_req_tx.clone(), every).run())
    });

    // Trigger bracket load on startup
    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(terminal, app, ui_event_rx, load_req_tx, load_resp_rx, startup_snapshot).await;

    input_handler.abort();
    load_task.abort();
    if let Some(task) = periodic_task {
        task.abort();
    }
    cleanup_terminal();

    Ok(())
}

fn handle_cli_args(args: impl IntoIterator<Item = String>) -> CliAction {
    let mut snapshot = None;

    for arg in args {
        match arg.as_str() {
            "-h" | "--help" => {
                println!("{}", usage_text());
                return CliAction::Exit;
            }
            "-V" | "--version" => {
                println!("bracketview {}", env!("CARGO_PKG_VERSION"));
                return CliAction::Exit;
            }
            flag if flag.starts_with('-') => {
                eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
                std::process::exit(2);
            }
            _ if snapshot.is_some() => {
                eprintln!("Unexpected extra argument: {arg}\n\n{}", usage_text());
                std::process::exit(2);
            }
            path => snapshot = Some(PathBuf::from(path)),
        }
    }

    CliAction::Run { snapshot }
}

fn usage_text() -> &'static str {
    "bracketview - terminal viewer for bracket diagrams

Usage:
  bracketview [SNAPSHOT.json]
  bracketview --help
  bracketview --version

Environment:
  BRACKETVIEW_SNAPSHOT      Path to a bracket JSON snapshot (the argument wins)
  BRACKETVIEW_LOG           Log level: error, warn, info, debug, trace (default info)
  BRACKETVIEW_RELOAD_SECS   Snapshot reload interval, 0 disables (default 30)"
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    load_requests: mpsc::Sender<LoadRequest>,
    mut load_responses: mpsc::Receiver<LoadResponse>,
    startup_snapshot: Option<PathBuf>,
) {
    let mut loading = LoadingState::default();

    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                let should_redraw =
                    handle_ui_event(ui_event, &app, &load_requests, &startup_snapshot).await;
                if should_redraw && !loading.is_loading {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            Some(response) = load_responses.recv() => {
                let should_redraw = handle_load_response(response, &app, &mut loading).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            else => break,
        }
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    load_requests: &mpsc::Sender<LoadRequest>,
    startup_snapshot: &Option<PathBuf>,
) -> bool {
    match ui_event {
        UiEvent::AppStarted => {
            let path = startup_snapshot.clone();
            let _ = load_requests.send(LoadRequest::LoadSnapshot { path }).await;
            true
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, load_requests).await;
            true
        }
        UiEvent::Resize => true,
    }
}

async fn handle_load_response(
    response: LoadResponse,
    app: &Arc<Mutex<App>>,
    loading: &mut LoadingState,
) -> bool {
    match response {
        LoadResponse::LoadingStateChanged { loading_state } => {
            *loading = loading_state;
            return true;
        }
        LoadResponse::BracketLoaded { bracket } => {
            let mut guard = app.lock().await;
            guard.on_bracket_loaded(*bracket);
        }
        LoadResponse::Unchanged => return false,
        LoadResponse::Error { message } => {
            error!("Load error: {message}");
            let mut guard = app.lock().await;
            guard.on_error(message);
        }
    }
    !loading.is_loading
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        if let Ok(event) = crossterm_event::read() {
            let ui_event = match event {
                Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
                Event::Resize(_, _) => Some(UiEvent::Resize),
                _ => None,
            };

            if let Some(ui_event) = ui_event
                && ui_events.send(ui_event).await.is_err()
            {
                break;
            }
        }
    }
}

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;
    execute!(stdout, terminal::EnterAlternateScreen)?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    terminal::enable_raw_mode()
}

/// Restore the terminal. Best effort: it also runs from the panic hook.
pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, cursor::MoveTo(0, 0));
    let _ = execute!(stdout, terminal::Clear(terminal::ClearType::All));
    let _ = execute!(stdout, terminal::LeaveAlternateScreen);
    let _ = execute!(stdout, cursor::Show);
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
