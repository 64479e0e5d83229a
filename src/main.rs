use icyroute::cli::{Cli, CliCommand};
use icyroute::{IcyRouteConfig, cli, logging};
use structopt::StructOpt;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err:?}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::from_args();

    let config = IcyRouteConfig::load_from_path(cli.config)?;
    logging::init(&config.logging)?;

    cli::run(cli.command.unwrap_or(CliCommand::Serve), config).await
}
