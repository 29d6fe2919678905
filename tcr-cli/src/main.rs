//! TCR CLI - Command line tool for tropical cyclone return periods.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "tcr-cli",
    version,
    about = "Tropical cyclone return period toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: tcr_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    tcr_cmd::run(cli.command)
}
