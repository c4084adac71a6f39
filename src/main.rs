use anyhow::Result;
use clap::Parser;
use dsc_expression::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}
