use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    path::PathBuf,
};

use clap::{Parser, Subcommand};
use kickstart::Version;
use log::LevelFilter;

use crate::KSTOOLS_VERSION;

#[derive(Parser, Debug)]
#[clap(version = KSTOOLS_VERSION)]
pub struct Cli {
    /// Logging verbosity [OFF, ERROR, WARN, INFO, DEBUG, TRACE]
    #[arg(global = true, short, long, default_value_t = LevelFilter::Warn)]
    pub verbosity: LevelFilter,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve includes and %ksappend, then write the kickstart back out
    Flatten {
        /// Path or URL of the kickstart to flatten
        #[clap(index = 1)]
        input: String,

        /// Write the result here instead of stdout
        #[clap(short, long)]
        output: Option<PathBuf>,

        /// Kickstart syntax version
        #[clap(long, default_value_t = Version::latest())]
        version: Version,
    },

    /// Check a kickstart and report every problem found
    Validate {
        /// Path or URL of the kickstart to check
        #[clap(index = 1, required_unless_present = "list_versions")]
        input: Option<String>,

        /// Kickstart syntax version
        #[clap(long, default_value_t = Version::latest())]
        version: Version,

        /// Stop at the first error
        #[clap(long)]
        first_error: bool,

        /// Print diagnostics as JSON
        #[clap(long)]
        json: bool,

        /// Print the supported syntax versions and exit
        #[clap(long)]
        list_versions: bool,
    },

    /// Enter kickstart commands interactively
    Shell {
        /// Kickstart to load before the prompt appears
        #[clap(index = 1)]
        input: Option<String>,

        /// Kickstart syntax version
        #[clap(long, default_value_t = Version::latest())]
        version: Version,
    },
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Flatten { .. } => "flatten",
            Commands::Validate { .. } => "validate",
            Commands::Shell { .. } => "shell",
        }
    }
}

impl Display for Commands {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_args() {
        let cli = Cli::parse_from(["ks", "flatten", "in.ks", "-o", "out.ks", "--version", "f8"]);
        match cli.command {
            Commands::Flatten {
                input,
                output,
                version,
            } => {
                assert_eq!(input, "in.ks");
                assert_eq!(output, Some(PathBuf::from("out.ks")));
                assert_eq!(version, Version::F8);
            }
            other => panic!("Wrong command: {other}"),
        }
        assert_eq!(cli.verbosity, LevelFilter::Warn);
    }

    #[test]
    fn test_validate_args() {
        let cli = Cli::parse_from(["ks", "-v", "debug", "validate", "--list-versions"]);
        assert_eq!(cli.verbosity, LevelFilter::Debug);
        assert!(matches!(
            cli.command,
            Commands::Validate {
                input: None,
                list_versions: true,
                ..
            }
        ));

        // An input is needed unless only listing versions
        assert!(Cli::try_parse_from(["ks", "validate"]).is_err());
        assert!(Cli::try_parse_from(["ks", "validate", "a.ks", "--version", "F99"]).is_err());

        let cli = Cli::parse_from(["ks", "validate", "a.ks", "--json", "--first-error"]);
        match cli.command {
            Commands::Validate {
                version,
                json,
                first_error,
                ..
            } => {
                assert_eq!(version, Version::latest());
                assert!(json);
                assert!(first_error);
            }
            other => panic!("Wrong command: {other}"),
        }
    }
}
