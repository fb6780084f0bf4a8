mod cli;
mod error;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use wanwatch_api::NtfyClient;
use wanwatch_api::transport::{TlsMode, TransportConfig};
use wanwatch_core::{MemoryStore, Notifier, PollLoop, SessionManager, StateTracker};

use crate::cli::Cli;
use crate::error::CliError;

// One thread, strictly sequential: sleep, fetch, notify.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8, debug_mode: bool) {
    let filter = match (verbosity, debug_mode) {
        (0, false) => "info",
        (0 | 1, _) => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = wanwatch_config::load_config(cli.config.as_deref())?;

    if cli.print_config {
        print!("{}", wanwatch_config::to_toml_redacted(&config)?);
        return Ok(());
    }

    init_tracing(cli.verbose, config.debug_mode);
    info!("Starting wanwatch");

    let monitor = config.monitor_config()?;
    let controller = config.controller_config()?;
    let ntfy = config.ntfy_config()?;

    let publisher = NtfyClient::new(
        &ntfy.url,
        &ntfy.topic,
        ntfy.credentials,
        &TransportConfig {
            tls: TlsMode::System,
            timeout: ntfy.timeout,
            cookie_jar: None,
        },
    )?;

    let mut poll = PollLoop::new(
        SessionManager::new(controller),
        StateTracker::new(monitor.iface).with_event_key(monitor.event_key),
        Notifier::new(publisher, monitor.retry),
        MemoryStore::default(),
        monitor.poll_interval,
    );

    if cli.once {
        poll.start().await?;
        let outcome = poll.tick().await;
        info!(?outcome, "single poll cycle finished");
        return Ok(());
    }

    match poll.run().await {
        Ok(never) => match never {},
        Err(err) => Err(err.into()),
    }
}
