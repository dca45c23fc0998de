mod signal;

use anyhow::Context;

use serikit_lib::cli::{create_root_command, is_verbose};
use serikit_lib::config::SerikitConfig;
use serikit_lib::errors::{handle_command_error, SerikitError};
use serikit_lib::{commands, logger, output, JsonBackendKind, Serializer};

use signal::SignalHandler;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        match err.downcast_ref::<SerikitError>() {
            Some(e) => handle_command_error(e),
            None => output::error(&format!("{:#}", err)),
        }
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let (config, config_error) = SerikitConfig::load();

    let matches = create_root_command().get_matches();
    let verbose = is_verbose(&matches);
    logger::init(verbose, config.log_filter.as_deref());
    logger::set_verbose(verbose);

    if let Some(e) = config_error {
        output::warning(&format!("{}. Using defaults.", e));
    }
    SerikitConfig::install(config);

    let serializer = Serializer::global();
    if let Some(name) = matches.get_one::<String>("json-backend") {
        let kind: JsonBackendKind = name.parse()?;
        serializer.set_default_json_backend(kind);
    }

    let signal_handler = SignalHandler::new();
    let token = signal_handler.token();
    tokio::spawn(async move {
        signal_handler.listen().await;
    });

    // Codec work is synchronous; keep it off the runtime so signals are still served.
    tokio::task::spawn_blocking(move || commands::dispatch(serializer, &matches, &token))
        .await
        .context("conversion task failed")??;

    Ok(())
}
