use anyhow::Result;
use clap::Parser;
use reeldupe::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}
