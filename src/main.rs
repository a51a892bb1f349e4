//! TLP Boost: toggle a laptop between TLP's default charging profile and
//! a temporary full recharge, re-validating sudo credentials in the
//! background so the user is prompted only once.

use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::Parser;

mod app;
mod auth;
mod cli;
mod logging;
mod tlp;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = logging::setup() {
        eprintln!("failed to set up logging: {e}");
    }

    let args = cli::UserArgs::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let message = format!("{e:#}");
            log::error!("{}", message);
            eprintln!("Error: {message}");
            app::notify_fatal(&message);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: cli::UserArgs) -> anyhow::Result<()> {
    // Fail early if TLP is not available.
    if !tlp::is_installed() {
        bail!("TLP is not installed or not in PATH.");
    }

    let session = app::authenticate().await?;

    // Ensure TLP starts from a known (default) profile. The session is
    // owned by the UI from here on and revokes sudo when it drops, on
    // success and error paths alike.
    tlp::initialize()
        .await
        .context("Could not initialize TLP")?;

    app::run(args, session).await
}
