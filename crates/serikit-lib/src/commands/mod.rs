//! Handlers behind the `serikit` subcommands.
//!
//! Conversions are pure functions over in-memory buffers; `dispatch` adds
//! the file/stdin/stdout plumbing.

pub mod convert;

use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use clap::ArgMatches;
use tokio_util::sync::CancellationToken;

use crate::backend::JsonBackendKind;
use crate::cli::format_arg;
use crate::config::SerikitConfig;
use crate::errors::{Result, SerikitError};
use crate::facade::Serializer;
use crate::json::{Escaping, SerializationOptions};
use crate::output;
use crate::platform::{CompileTimeProbe, PlatformProbe};

pub use convert::{decode_document, encode_document, Rendered};

/// A form a document can take on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json(JsonBackendKind),
    MessagePack,
    B64u,
}

impl FromStr for Format {
    type Err = SerikitError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "tree" => Ok(Format::Json(JsonBackendKind::TreeJson)),
            "stream" => Ok(Format::Json(JsonBackendKind::StreamJson)),
            "msgpack" => Ok(Format::MessagePack),
            "b64u" => Ok(Format::B64u),
            other => Err(SerikitError::Config(format!("unknown format '{}'", other))),
        }
    }
}

/// Read the whole input from `path`, or stdin when `None`.
pub fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(p) => Ok(std::fs::read(p)?),
        None => {
            let mut buf = Vec::new();
            std::io::stdin().lock().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Run the parsed subcommand against `serializer`, writing results to stdout.
pub fn dispatch(
    serializer: &Serializer,
    matches: &ArgMatches,
    cancel: &CancellationToken,
) -> Result<()> {
    let config = SerikitConfig::get();
    match matches.subcommand() {
        Some(("encode", sub)) => {
            let to = required_format(sub, "to")?;
            let options = SerializationOptions::new()
                .pretty(sub.get_flag("pretty") || config.pretty)
                .omit_nulls(sub.get_flag("omit-nulls"));
            let escaping = if sub.get_flag("strict-escaping") {
                Escaping::Strict
            } else {
                Escaping::Relaxed
            };
            let input = read_input(sub.get_one::<String>("input").map(Path::new))?;
            let text = String::from_utf8(input).map_err(|e| SerikitError::Deserialization {
                backend: serializer.default_json_backend().into(),
                message: e.to_string(),
            })?;
            let rendered = encode_document(serializer, &text, to, options, escaping, Some(cancel))?;
            write_rendered(&rendered)
        }
        Some(("decode", sub)) => {
            let from = required_format(sub, "from")?;
            let input = read_input(sub.get_one::<String>("input").map(Path::new))?;
            let pretty = sub.get_flag("pretty") || config.pretty;
            let text = decode_document(serializer, &input, from, pretty, Some(cancel))?;
            write_rendered(&Rendered::Text(text))
        }
        Some(("backend", _)) => {
            let info = CompileTimeProbe.detect();
            println!("default JSON backend: {}", serializer.default_json_backend());
            println!("platform: {}", info);
            Ok(())
        }
        _ => Err(SerikitError::Config("no subcommand given".into())),
    }
}

fn required_format(matches: &ArgMatches, id: &str) -> Result<Format> {
    format_arg(matches, id).ok_or_else(|| SerikitError::Config(format!("--{} is required", id)))
}

fn write_rendered(rendered: &Rendered) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match rendered {
        Rendered::Text(text) => output::write_payload(&mut out, text.as_bytes(), true)?,
        Rendered::Bytes(bytes) => output::write_payload(&mut out, bytes, false)?,
    }
    Ok(())
}
