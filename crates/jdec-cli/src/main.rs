use clap::Parser;

mod cli;
mod commands;
mod error;

pub use error::{CliError, CliResult};

use crate::cli::{CliArgs, Commands};

fn main() -> CliResult<()> {
    env_logger::init();

    let args = CliArgs::parse();
    let options = args.decoder_options();

    match args.command {
        Commands::Decode(decode) => decode.run(options),
        Commands::Inspect(inspect) => inspect.run(options),
    }
}
