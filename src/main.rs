use clap::Parser;

use option_chain_recorder::{record, replay, schema};

mod cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    match cli.command {
        cli::Command::Record {
            symbols,
            output,
            pace_secs,
            timeout_secs,
            base_url,
            dry_run,
        } => record::run(&record::RecordArgs {
            symbols,
            output,
            pace_secs,
            timeout_secs,
            base_url,
            dry_run,
        }),
        cli::Command::Flatten {
            file,
            symbol,
            output,
        } => replay::run(&file, &symbol, output.as_ref()),
        cli::Command::Schema { json } => schema::run(json),
    }
}
