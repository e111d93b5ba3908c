//! Event bus for studio.
//!
//! Terminal input, timers and background results all arrive as [`AppEvent`]s
//! on one tokio unbounded channel. The main loop handles each event to
//! completion before receiving the next, so session callbacks never overlap.
//!
//! The input task runs two timers next to the crossterm stream: a 33 ms
//! render timer (about 30 FPS) and a 250 ms tick that expires status messages.

use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind, MouseEvent};
use futures::{FutureExt, StreamExt};
use studio_core::StudioError;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::interval;

use crate::diff::types::DiffResultPayload;

const RENDER_EVERY: Duration = Duration::from_millis(33);
const TICK_EVERY: Duration = Duration::from_millis(250);

#[derive(Debug)]
#[non_exhaustive]
pub enum AppEvent {
    /// Key press. Release and repeat events are dropped at the source so
    /// platforms that report both edges do not fire twice.
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// New terminal size in (columns, rows).
    Resize(u16, u16),
    Tick,
    /// Time to draw a frame.
    Render,
    /// Rendered commit view from the diff thread.
    DiffResult(Box<DiffResultPayload>),
    /// A durable slot write failed. In-memory state is unaffected.
    StorageFailed(String),
}

/// Both ends of the event channel. Producers get clones of `tx`; the main
/// loop owns `rx`.
pub struct EventHandler {
    pub tx: UnboundedSender<AppEvent>,
    pub rx: UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps a crossterm event onto the bus. Send errors mean the loop has exited.
fn forward(event: Event, tx: &UnboundedSender<AppEvent>) {
    let app_event = match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => AppEvent::Key(key),
        Event::Mouse(mouse) => AppEvent::Mouse(mouse),
        Event::Resize(cols, rows) => AppEvent::Resize(cols, rows),
        _ => return,
    };
    let _ = tx.send(app_event);
}

/// Spawns the task that feeds terminal input and timer events into `tx`.
pub fn spawn_event_task(tx: UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let mut ticks = interval(TICK_EVERY);
        let mut frames = interval(RENDER_EVERY);
        let mut input = EventStream::new();

        loop {
            // fuse() so select! never polls a finished stream future.
            let next_input = input.next().fuse();
            tokio::select! {
                _ = ticks.tick() => {
                    let _ = tx.send(AppEvent::Tick);
                }
                _ = frames.tick() => {
                    let _ = tx.send(AppEvent::Render);
                }
                maybe = next_input => match maybe {
                    Some(Ok(event)) => forward(event, &tx),
                    Some(Err(_)) => {}
                    None => break,
                },
            }
        }
    });
}

/// Forwards persistence failures from the slot writer onto the bus.
pub fn spawn_storage_forwarder(
    mut failures: UnboundedReceiver<StudioError>,
    tx: UnboundedSender<AppEvent>,
) {
    tokio::spawn(async move {
        while let Some(err) = failures.recv().await {
            if tx.send(AppEvent::StorageFailed(err.to_string())).is_err() {
                break;
            }
        }
    });
}
