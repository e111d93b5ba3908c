//! studio: label commits one at a time and export the labeled dataset.
//!
//! Entry point for the `studio` binary. Wires together config and CLI
//! (`config`, `cli`), the durable session store (`studio-core`), the terminal
//! lifecycle (`tui`), the event bus (`event`), the commit renderer (`diff`)
//! and the UI (`ui`).
//!
//! # Startup sequence
//!
//! 1. Logging to `.studio/studio.log`, then config and CLI overrides.
//! 2. Open the store, restore the session, open the persistence gate.
//! 3. Import `FILE` if one was given. A file that fails to import leaves the
//!    restored session in place and the error shows in the status bar. Fatal
//!    errors up to here print normally because the terminal has not been
//!    touched yet.
//! 4. Panic hook, SIGTERM flag, alternate screen, event task, diff thread.
//!
//! The event loop exits only via `break`, so `restore_tui()` always runs.
//! Pending slot writes are flushed before the process exits.

mod app;
mod cli;
mod config;
mod diff;
mod event;
mod theme;
mod tui;
mod ui;

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::Ordering;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use studio_core::persist::{self, SessionPersister, SlotWriter};
use studio_core::{Session, Studio};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::app::AppState;
use crate::event::AppEvent;
use crate::ui::keybindings::{self, KeyAction};

const STATE_DIR: &str = ".studio";
const LOG_FILE: &str = ".studio/studio.log";

/// Routes `tracing` output to the log file; the terminal belongs to the UI.
///
/// Filter comes from `STUDIO_LOG` (default `info`). Failure to open the file
/// leaves logging disabled.
fn init_logging() {
    if std::fs::create_dir_all(STATE_DIR).is_err() {
        return;
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(LOG_FILE) else {
        return;
    };
    let filter = EnvFilter::try_from_env("STUDIO_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
}

/// Reads and imports a JSONL file, recording its base name in the metadata.
async fn import_file(studio: &mut Studio, path: &Path) -> anyhow::Result<usize> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned());
    studio
        .import_jsonl(&bytes, name.as_deref())
        .with_context(|| format!("importing {}", path.display()))?;
    Ok(studio.session().len())
}

/// Imports the FILE given on the command line. A failure leaves the restored
/// session in place and returns the message for the status bar.
async fn open_at_startup(studio: &mut Studio, path: &Path) -> Option<String> {
    match import_file(studio, path).await {
        Ok(n) => {
            info!(items = n, path = %path.display(), "opened dataset");
            None
        }
        Err(e) => {
            warn!(error = %format!("{e:#}"), "startup import failed, keeping previous session");
            Some(format!("{e:#}"))
        }
    }
}

/// Performs the I/O half of a key action. Returns `true` when the loop should exit.
async fn run_action(
    action: KeyAction,
    state: &mut AppState,
    persister: &mut SessionPersister,
    out_dir: &Path,
) -> bool {
    match action {
        KeyAction::Continue => {}
        KeyAction::Quit => return true,
        KeyAction::Save => match state.studio.save() {
            Ok(export) => {
                let path = out_dir.join(&export.file_name);
                match tokio::fs::write(&path, &export.bytes).await {
                    Ok(()) => state.set_status(format!("saved {}", path.display())),
                    Err(e) => {
                        error!(path = %path.display(), error = %e, "export write failed");
                        state.set_error(format!("could not write {}: {e}", path.display()));
                    }
                }
            }
            Err(e) => {
                error!(error = %e, "export failed");
                state.set_error(e.to_string());
            }
        },
        KeyAction::Clear => persister.purge(),
        KeyAction::Open(path) => match import_file(&mut state.studio, Path::new(&path)).await {
            Ok(n) => state.set_status(format!("loaded {n} items from {path}")),
            Err(e) => {
                warn!(error = %format!("{e:#}"), "open failed");
                state.set_error(format!("{e:#}"));
            }
        },
    }
    false
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let args = cli::Args::parse();
    let config = config::load(args.config.as_deref());
    let db_path: PathBuf = args.db.unwrap_or(config.database);
    let out_dir: PathBuf = args.out_dir.unwrap_or(config.output_dir);
    let theme = theme::Theme::from_name(&config.theme);

    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let conn = studio_core::db::open_db(&db_path.to_string_lossy())
        .await
        .with_context(|| format!("opening session store {}", db_path.display()))?;

    let restored = match persist::restore(&conn).await {
        Ok(session) => session,
        Err(e) => {
            warn!(error = %e, "could not restore session, starting empty");
            Session::default()
        }
    };

    let (failures_tx, failures_rx) = tokio::sync::mpsc::unbounded_channel();
    let mut persister = SessionPersister::new(SlotWriter::spawn(conn, failures_tx));
    persister.initiate(&restored);

    let mut studio = Studio::with_session(restored, config.labels);
    let startup_error = match &args.file {
        Some(file) => open_at_startup(&mut studio, file).await,
        None => None,
    };
    persister.observe(studio.session())?;

    let mut state = AppState::new(studio);
    if let Some(msg) = startup_error {
        state.set_error(msg);
    }

    tui::install_panic_hook();
    let term_flag = tui::register_sigterm().context("registering SIGTERM handler")?;
    let mut terminal = tui::init_tui()?;

    let handler = event::EventHandler::new();
    event::spawn_event_task(handler.tx.clone());
    event::spawn_storage_forwarder(failures_rx, handler.tx.clone());
    let mut rx = handler.rx;

    let (diff_tx, diff_rx) = crossbeam_channel::unbounded();
    let worker_tx = handler.tx.clone();
    let worker_theme = theme.clone();
    std::thread::Builder::new()
        .name("studio-diff".to_owned())
        .spawn(move || diff::worker::diff_worker_loop(diff_rx, worker_tx, worker_theme))
        .context("spawning diff thread")?;
    state.diff_tx = Some(diff_tx);
    state.request_diff();

    let mut draw_result: std::io::Result<()> = Ok(());
    'event_loop: loop {
        tokio::select! {
            _ = tokio::time::sleep(Duration::from_millis(50)) => {
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
            maybe_event = rx.recv() => {
                let action = match maybe_event {
                    Some(AppEvent::Render) => {
                        if let Err(e) = terminal.draw(|frame| ui::render(frame, &mut state, &theme)) {
                            draw_result = Err(e);
                            break 'event_loop;
                        }
                        continue 'event_loop;
                    }
                    Some(AppEvent::Tick) => {
                        state.on_tick();
                        continue 'event_loop;
                    }
                    Some(AppEvent::Key(key)) => keybindings::handle_key(key, &mut state),
                    Some(AppEvent::Mouse(mouse)) => keybindings::handle_mouse(mouse, &mut state),
                    Some(AppEvent::DiffResult(payload)) => {
                        state.apply_diff_result(*payload);
                        KeyAction::Continue
                    }
                    Some(AppEvent::StorageFailed(msg)) => {
                        error!(error = %msg, "session write failed");
                        state.set_error(format!("session not saved: {msg}"));
                        KeyAction::Continue
                    }
                    // Resize is picked up by the next Render through frame.area().
                    Some(AppEvent::Resize(_, _)) => KeyAction::Continue,
                    None => break 'event_loop,
                };

                if run_action(action, &mut state, &mut persister, &out_dir).await {
                    break 'event_loop;
                }
                if let Err(e) = persister.observe(state.studio.session()) {
                    error!(error = %e, "could not encode session");
                    state.set_error(e.to_string());
                }
                state.request_diff();

                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
        }
    }

    tui::restore_tui()?;
    persister.flush().await;
    info!("exiting");
    draw_result.context("drawing frame")
}
