use std::process::ExitCode;

use anyhow::Error;
use clap::Parser;
use log::{debug, error};

use kstools::{
    cli::{Cli, Commands},
    flatten, shell, validate,
};

fn run_ks(args: &Cli) -> Result<ExitCode, Error> {
    debug!("Running '{}'", args.command);

    match &args.command {
        Commands::Flatten {
            input,
            output,
            version,
        } => {
            flatten::flatten(input, output.as_deref(), *version)?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::Validate {
            input,
            version,
            first_error,
            json,
            list_versions,
        } => {
            if *list_versions {
                validate::list_versions();
                return Ok(ExitCode::SUCCESS);
            }

            // clap requires the input unless only listing versions
            let Some(input) = input else {
                return Ok(ExitCode::from(2));
            };

            if validate::validate(input, *version, *first_error, *json)? {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::from(1))
            }
        }

        Commands::Shell { input, version } => {
            shell::run(*version, input.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> ExitCode {
    // Parse args
    let args = Cli::parse();

    env_logger::builder()
        .format_timestamp(None)
        .filter_level(args.verbosity)
        .init();

    match run_ks(&args) {
        Ok(code) => code,
        Err(e) => {
            error!("'{}' failed", args.command);
            eprintln!("Error: {e:#}");
            ExitCode::from(1)
        }
    }
}
