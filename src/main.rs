//! Wardgate CLI - request cache and permission tooling for the hospital admin dashboard

use clap::Parser;
use env_logger::Env;

use wardgate::cli::{self, Cli, CommandContext, Commands, SessionCommands};
use wardgate::error::Result;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Commands::Version = cli.command {
        println!("wardgate version {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let ctx = CommandContext::from_cli(&cli)?;

    match cli.command {
        Commands::Can { ref module, action } => cli::access::can(&ctx, module, action),
        Commands::Permissions { ref modules } => cli::access::permissions(&ctx, modules),
        Commands::Menu { flat } => cli::menu::run(&ctx, flat),
        Commands::Fetch(ref args) => cli::fetch::run(&ctx, args).await,
        Commands::Status => cli::status::run(&ctx),
        Commands::Session(SessionCommands::Show) => cli::session::show(&ctx),
        Commands::Session(SessionCommands::Clear) => cli::session::clear(&ctx),
        Commands::Version => Ok(()),
    }
}

/// Logs go to stderr; `RUST_LOG` wins unless `--debug` is given
fn init_logging(debug: bool) {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_module("wardgate", log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}
