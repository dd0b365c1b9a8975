use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

fn filter(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Log to stderr. A second call is a no-op.
pub fn init(directives: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(directives))
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Log to `path`, or nowhere when `path` is `None`.
///
/// Used while the terminal quiz owns the screen.
pub fn init_for_terminal(directives: &str, path: Option<&Path>) -> io::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(directives))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}
