//! Terminal setup and teardown.
//!
//! Frames go to stderr so stdout stays usable in pipelines; `tracing` output
//! goes to the log file set up in `main.rs`.

use std::io::{self, BufWriter, Stderr};
use std::panic;
use std::sync::{Arc, atomic::AtomicBool};

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use signal_hook::consts::SIGTERM;

/// Terminal drawing into buffered stderr, so each frame is few write(2) calls.
pub type Tui = Terminal<CrosstermBackend<BufWriter<Stderr>>>;

/// Switches to raw mode and the alternate screen with mouse capture on.
///
/// Every exit path must call [`restore_tui`] afterwards.
pub fn init_tui() -> io::Result<Tui> {
    let mut writer = BufWriter::new(io::stderr());
    enable_raw_mode()?;
    execute!(writer, EnterAlternateScreen, EnableMouseCapture)?;
    Terminal::new(CrosstermBackend::new(writer))
}

/// Leaves the alternate screen and raw mode. Safe to call more than once.
///
/// ratatui does not do this on drop, so the panic hook calls it too.
pub fn restore_tui() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stderr(), LeaveAlternateScreen, DisableMouseCapture)?;
    Ok(())
}

/// Chains a panic hook that puts the terminal back before the default
/// hook prints the message. Install before [`init_tui`].
pub fn install_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = restore_tui();
        previous(info);
    }));
}

/// Returns a flag that flips to `true` when SIGTERM arrives.
///
/// The event loop polls it on its heartbeat and after each event.
pub fn register_sigterm() -> io::Result<Arc<AtomicBool>> {
    let flag = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(SIGTERM, Arc::clone(&flag))?;
    Ok(flag)
}
