use clap::Parser;

use crate::{errors::KickstartError, version::Version};

use super::{flag, priority, CommandBase, KickstartCommand, ParseContext};

#[derive(Parser, Debug)]
#[command(name = "reqpart")]
struct ReqPartArgs {
    /// Also create a separate /boot partition
    #[arg(long = "add-boot")]
    add_boot: bool,
}

/// The `reqpart` command: create the partitions the platform needs
#[derive(Debug, Default)]
pub struct ReqPart {
    base: CommandBase,
    pub add_boot: bool,
}

impl ReqPart {
    pub fn boxed(_: Version) -> Box<dyn KickstartCommand> {
        Box::<Self>::default()
    }
}

impl KickstartCommand for ReqPart {
    command_boilerplate!();

    fn name(&self) -> &'static str {
        "reqpart"
    }

    fn write_priority(&self) -> i32 {
        priority::REQPART
    }

    fn parse(&mut self, ctx: &mut ParseContext, tokens: Vec<String>) -> Result<(), KickstartError> {
        let args: ReqPartArgs = ctx.parse_args(tokens)?;
        self.add_boot = args.add_boot;
        Ok(())
    }
}

impl std::fmt::Display for ReqPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.seen() {
            writeln!(f, "reqpart{}", flag("add-boot", self.add_boot))?;
        }
        Ok(())
    }
}
