use clap::{ArgGroup, Parser};

use crate::{errors::KickstartError, version::Version};

use super::{flag, opt_list, CommandBase, KickstartCommand, ParseContext};

#[derive(Parser, Debug)]
#[command(name = "ignoredisk")]
#[clap(group(ArgGroup::new("mode").required(true).multiple(false)))]
struct IgnoreDiskArgs {
    /// Disks the installer must not touch
    #[arg(long, value_delimiter = ',', group = "mode")]
    drives: Vec<String>,

    /// The only disks the installer may use
    #[arg(long = "only-use", alias = "onlyuse", value_delimiter = ',', group = "mode")]
    only_use: Vec<String>,

    /// Let the user choose disks interactively
    #[arg(long, group = "mode")]
    interactive: bool,
}

/// The `ignoredisk` command
#[derive(Debug, Default)]
pub struct IgnoreDisk {
    base: CommandBase,
    pub ignored: Vec<String>,
    pub only_use: Vec<String>,
    pub interactive: bool,
}

impl IgnoreDisk {
    pub fn boxed(_: Version) -> Box<dyn KickstartCommand> {
        Box::<Self>::default()
    }
}

impl KickstartCommand for IgnoreDisk {
    command_boilerplate!();

    fn name(&self) -> &'static str {
        "ignoredisk"
    }

    fn parse(&mut self, ctx: &mut ParseContext, tokens: Vec<String>) -> Result<(), KickstartError> {
        let args: IgnoreDiskArgs = ctx.parse_args(tokens)?;
        self.ignored = args.drives;
        self.only_use = args.only_use;
        self.interactive = args.interactive;
        Ok(())
    }
}

impl std::fmt::Display for IgnoreDisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.seen() {
            return Ok(());
        }
        let options = [
            opt_list("drives", &self.ignored),
            opt_list("only-use", &self.only_use),
            flag("interactive", self.interactive),
        ]
        .concat();
        writeln!(f, "ignoredisk{options}")
    }
}
