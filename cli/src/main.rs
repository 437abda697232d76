mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{index, rate, resolve, run};
use tracing_subscriber::{filter::LevelFilter, fmt, EnvFilter};

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Resolve(args) => resolve::run(&cli, args),
        Commands::Rate(args) => rate::run(&cli, args),
        Commands::Index(args) => index::run(&cli, args),
        Commands::Run(args) => run::run(&cli, args),
    }
}

/// Log to stderr at warn, info (-v) or debug (-vv) unless RUST_LOG says otherwise.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn main() -> anyhow::Result<()> { run() }
