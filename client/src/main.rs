//! `landslide` entry-point: loads settings, wires the adapters and runs one
//! command.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use landslide_client::config::ClientSettings;
use landslide_client::inbound::cli::{CliArgs, CliError, CommandRunner};
use landslide_client::outbound::{FileSessionStore, HttpBackend};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let args = CliArgs::parse();

    // Flags belong to clap; OrthoConfig only sees the program name so it
    // reads files and `LANDSLIDE_*` variables.
    let mut settings = ClientSettings::load_from_iter([OsString::from("landslide")])
        .map_err(|err| eyre!("failed to load landslide settings: {err}"))?;
    if args.base_url.is_some() {
        settings.base_url.clone_from(&args.base_url);
    }
    if args.session_file.is_some() {
        settings.session_file.clone_from(&args.session_file);
    }
    init_tracing(settings.log_json);

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build client runtime")?;
    runtime.block_on(run(args, &settings))
}

fn init_tracing(json: bool) {
    let builder = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr);
    let outcome = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = outcome {
        warn!(error = %e, "tracing init failed");
    }
}

async fn run(args: CliArgs, settings: &ClientSettings) -> Result<ExitCode> {
    let backend = Arc::new(
        HttpBackend::new(settings.base_url()?, settings.request_timeout())
            .wrap_err("failed to build HTTP client")?,
    );
    let store = Arc::new(
        FileSessionStore::new(settings.session_file()).wrap_err("invalid session file path")?,
    );
    let mut runner = CommandRunner::new(
        Arc::clone(&backend),
        backend,
        store,
        settings.fallback_landslide_id(),
    );

    let mut stdout = io::stdout().lock();
    match runner.run(&args.command, &mut stdout).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(CliError::Client(failure)) => {
            error!(kind = %failure.kind(), "command failed");
            writeln!(io::stderr(), "{failure}").wrap_err("failed to write error")?;
            Ok(ExitCode::FAILURE)
        }
        Err(other) => Err(other.into()),
    }
}
