use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::{fmt, EnvFilter};

static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Build the filter: an explicit directive wins, otherwise DEBUG when `debug`
/// is set and INFO when not.
pub fn filter(debug: bool, directive: Option<&str>) -> EnvFilter {
    match directive {
        Some(d) => EnvFilter::try_new(d).unwrap_or_else(|e| {
            eprintln!("Ignoring invalid log filter '{}': {}", d, e);
            default_filter(debug)
        }),
        None => default_filter(debug),
    }
}

fn default_filter(debug: bool) -> EnvFilter {
    if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    }
}

/// Initialize the tracing subscriber on stderr, so stdout stays free for
/// converted payloads.
pub fn init(debug: bool, directive: Option<&str>) {
    fmt()
        .with_env_filter(filter(debug, directive))
        .with_writer(std::io::stderr)
        .with_timer(fmt::time::SystemTime)
        .with_level(true)
        .with_target(true)
        .init();
}

/// Set the global verbose mode flag.
pub fn set_verbose(enabled: bool) {
    VERBOSE.store(enabled, Ordering::SeqCst);
}

/// Check whether verbose mode is currently enabled.
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}
