use std::io::Write;

use crossterm::style::{Color, Stylize};

/// Print an error message in red to stderr.
pub fn error(msg: &str) {
    eprintln!("{}", msg.with(Color::Red));
}

/// Print a warning message in yellow to stderr.
pub fn warning(msg: &str) {
    eprintln!("{}", msg.with(Color::Yellow));
}

/// Print an info message in cyan to stderr.
///
/// Hints go to stderr so they never mix with a payload piped from stdout.
pub fn info(msg: &str) {
    eprintln!("{}", msg.with(Color::Cyan));
}

/// Write a converted payload to `out`, adding a trailing newline for text.
pub fn write_payload<W: Write>(out: &mut W, payload: &[u8], is_text: bool) -> std::io::Result<()> {
    out.write_all(payload)?;
    if is_text {
        out.write_all(b"\n")?;
    }
    out.flush()
}
