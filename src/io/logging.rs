use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Environment variable holding the log filter, e.g. `workboard=debug`.
pub const LOG_ENV: &str = "WORKBOARD_LOG";
pub const LOG_FILE: &str = "workboard.log";

/// Route tracing output to an append-only file in `dir`. The terminal belongs
/// to the TUI, so nothing is written to stdout or stderr.
pub fn init_tracing(dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))?;

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new("workboard=info,warn"));

    // A second init (tests, repeated runs in one process) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .compact()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init();
    Ok(())
}
