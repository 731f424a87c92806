//! Entry point for the command-line resolver.

use std::process::ExitCode;

use clap::Parser;
use locale_resolver::cli::{
    Arguments,
    ExitStatus,
    run,
};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Arguments::parse();

    match run(&args, &mut std::io::stdout().lock()) {
        Ok(status) => status.into(),
        Err(error) => {
            tracing::error!("{error}");
            ExitStatus::Error.into()
        }
    }
}
