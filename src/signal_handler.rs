use std::path::PathBuf;
use std::thread;

use signal_hook::{
    consts::{SIGINT, SIGTERM},
    iterator::Signals,
};
use tracing::warn;

use crate::lock::remove_if_owned;

/// On SIGINT/SIGTERM drop the PID marker (if ours) and exit 1.
pub fn signal_handler(pid_marker: PathBuf) {
    thread::spawn(move || {
        let mut signals = match Signals::new([SIGINT, SIGTERM]) {
            Ok(signals) => signals,
            Err(err) => {
                warn!("signal handler setup failed: {}", err);
                return;
            }
        };
        if let Some(signal) = signals.forever().next() {
            warn!("received signal {}; aborting backup", signal);
            let _ = remove_if_owned(&pid_marker);
            std::process::exit(1);
        }
    });
}
