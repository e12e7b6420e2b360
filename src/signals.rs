//! Termination signals sent to the process from outside the terminal.

use std::io;
use std::thread::{self, JoinHandle};

use log::{debug, warn};
use signal_hook::consts::signal::{SIGINT, SIGTERM};
use signal_hook::iterator::{Handle, Signals};

/// Calls a handler on every SIGINT or SIGTERM until dropped. While the guard is alive the
/// signals no longer kill the process, so the terminal gets restored on the way out.
pub struct SignalGuard {
    handle: Handle,
    thread: Option<JoinHandle<()>>,
}

impl SignalGuard {
    pub fn new<F>(on_signal: F) -> io::Result<Self>
    where
        F: Fn() + Send + 'static,
    {
        let mut signals = Signals::new([SIGINT, SIGTERM]).map_err(io::Error::other)?;
        let handle = signals.handle();
        let thread = thread::Builder::new()
            .name("signals".to_string())
            .spawn(move || {
                for signal in signals.forever() {
                    warn!("Received signal {signal}, cancelling the game");
                    on_signal();
                }
            })?;
        debug!("Listening for SIGINT and SIGTERM");
        Ok(SignalGuard {
            handle,
            thread: Some(thread),
        })
    }
}

impl Drop for SignalGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("Signal listener panicked");
            }
        }
    }
}
