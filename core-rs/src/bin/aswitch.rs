//! aswitch - remote control for the wireless antenna switch
//!
//! Command-line entry point: reads settings, waits for the switch, then runs
//! the poll loop until the user quits.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tokio::sync::mpsc::unbounded_channel;
use tracing::{error, info, Level};

use aswitch_core::presenter::spawn_stdin_reader;
use aswitch_core::{
    ConsolePresenter, HttpTransport, LogPresenter, PollLoop, SwitchConfig, SwitchError, UiEvent,
};

#[derive(Parser)]
#[command(name = "aswitch")]
#[command(version)]
#[command(about = "Remote control for the Wireless Antenna Switch", long_about = None)]
struct Cli {
    /// Switch's URL [default: http://aswitch.home:8088]
    #[arg(long)]
    url: Option<String>,
    /// YAML settings file
    #[arg(long, short)]
    config: Option<PathBuf>,
    /// Log only: no port table, no keyboard input
    #[arg(long)]
    headless: bool,
    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<SwitchConfig> {
    let mut config = match &cli.config {
        Some(path) => SwitchConfig::load(path)
            .with_context(|| format!("Cannot load settings from {}", path.display()))?,
        None => SwitchConfig::default(),
    };
    if let Some(url) = &cli.url {
        config = config.with_base_url(url.clone());
    }
    config.validate()?;
    Ok(config)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    let transport =
        HttpTransport::new(&config.base_url)?.with_command_timeout(config.command_timeout());
    info!("Switch URL: {}", transport.base_url());

    let (tx, rx) = unbounded_channel();
    let quit = tx.clone();
    ctrlc::set_handler(move || {
        let _ = quit.send(UiEvent::Quit);
    })
    .context("Cannot install the Ctrl-C handler")?;

    let result = if cli.headless {
        PollLoop::new(transport, LogPresenter, config).run(rx).await
    } else {
        let presenter = ConsolePresenter::new(config.title.clone());
        spawn_stdin_reader(tx.clone()).context("Cannot read the terminal")?;
        PollLoop::new(transport, presenter, config).run(rx).await
    };

    match result {
        Ok(()) | Err(SwitchError::Interrupted) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            error!("{:#}", e);
            1
        }
    };
    // The terminal reader thread may still be blocked on stdin
    std::process::exit(code);
}
