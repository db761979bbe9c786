use clap::Parser;

use crate::{errors::KickstartError, version::Version};

use super::{CommandBase, KickstartCommand, ParseContext};

#[derive(Parser, Debug)]
#[command(name = "eula")]
struct EulaArgs {
    /// Accept the end user license agreement
    #[arg(long, required = true)]
    agreed: bool,
}

/// The `eula` command
#[derive(Debug, Default)]
pub struct Eula {
    base: CommandBase,
    pub agreed: bool,
}

impl Eula {
    pub fn boxed(_: Version) -> Box<dyn KickstartCommand> {
        Box::<Self>::default()
    }
}

impl KickstartCommand for Eula {
    command_boilerplate!();

    fn name(&self) -> &'static str {
        "eula"
    }

    fn parse(&mut self, ctx: &mut ParseContext, tokens: Vec<String>) -> Result<(), KickstartError> {
        let args: EulaArgs = ctx.parse_args(tokens)?;
        self.agreed = args.agreed;
        Ok(())
    }
}

impl std::fmt::Display for Eula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.agreed {
            writeln!(f, "# License agreement")?;
            writeln!(f, "eula --agreed")?;
        }
        Ok(())
    }
}
