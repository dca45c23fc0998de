use clap::{Arg, ArgAction, Command};

use crate::commands::Format;

const FORMATS: [&str; 4] = ["tree", "stream", "msgpack", "b64u"];

/// Creates the root clap Command with global `--verbose` and `--json-backend` flags.
pub fn create_root_command() -> Command {
    Command::new("serikit")
        .about("Convert documents between JSON engines, MessagePack and base64url")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
        .arg(
            Arg::new("json-backend")
                .long("json-backend")
                .global(true)
                .value_parser(["tree", "stream"])
                .help("Override the default JSON engine"),
        )
        .subcommand(encode_command())
        .subcommand(decode_command())
        .subcommand(
            Command::new("backend")
                .about("Show the default JSON engine and the detected platform"),
        )
}

fn input_arg() -> Arg {
    Arg::new("input")
        .value_name("FILE")
        .help("Input file (reads stdin when omitted)")
}

fn pretty_arg() -> Arg {
    Arg::new("pretty")
        .long("pretty")
        .action(ArgAction::SetTrue)
        .help("Indent JSON output")
}

fn encode_command() -> Command {
    Command::new("encode")
        .alias("e")
        .about("Read a JSON document and write it in another form")
        .arg(
            Arg::new("to")
                .long("to")
                .required(true)
                .value_parser(FORMATS)
                .help("Output form"),
        )
        .arg(pretty_arg())
        .arg(
            Arg::new("omit-nulls")
                .long("omit-nulls")
                .action(ArgAction::SetTrue)
                .help("Drop null-valued members from JSON output"),
        )
        .arg(
            Arg::new("strict-escaping")
                .long("strict-escaping")
                .action(ArgAction::SetTrue)
                .help("Escape non-ASCII text with the stream engine"),
        )
        .arg(input_arg())
}

fn decode_command() -> Command {
    Command::new("decode")
        .alias("d")
        .about("Read a document in the given form and print it as JSON")
        .arg(
            Arg::new("from")
                .long("from")
                .required(true)
                .value_parser(FORMATS)
                .help("Input form"),
        )
        .arg(pretty_arg())
        .arg(input_arg())
}

/// Returns whether verbose mode is active based on parsed matches.
pub fn is_verbose(matches: &clap::ArgMatches) -> bool {
    matches.get_flag("verbose")
}

/// Reads a `--to`/`--from` value. Values are restricted by the parser.
pub(crate) fn format_arg(matches: &clap::ArgMatches, id: &str) -> Option<Format> {
    matches
        .get_one::<String>(id)
        .and_then(|s| s.parse::<Format>().ok())
}
