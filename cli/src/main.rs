mod commands;
mod terminal;

use std::process::ExitCode;

use commands::{CommandLine, Commands, devices, scan};
use netbelt_common::{error, warn};
use terminal::input::InputHandle;
use terminal::{logging, print};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> ExitCode {
    let commands = CommandLine::parse_args();
    let opts = commands.options();

    logging::init_logging(opts.quiet);
    print::title(opts.quiet);

    let cfg = commands.scan_config();
    let cancel = CancellationToken::new();
    watch_ctrl_c(cancel.clone());
    let input: Option<InputHandle> = match commands.no_input {
        true => None,
        false => InputHandle::start(cancel.clone()),
    };

    let result: anyhow::Result<()> = match commands.command {
        Commands::Devices => devices::devices(&cfg, opts, &cancel, input).await,
        Commands::Scan { target, all } => scan::scan(target, all, &cfg, opts, &cancel, input).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Turns SIGINT into a cancellation so partial results still get printed.
fn watch_ctrl_c(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, wrapping up with what was found so far");
            cancel.cancel();
        }
    });
}
