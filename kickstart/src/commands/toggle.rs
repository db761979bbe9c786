use clap::Parser;

use crate::{errors::KickstartError, version::Version};

use super::{priority, CommandBase, KickstartCommand, ParseContext};

#[derive(Parser, Debug)]
struct ToggleArgs {}

/// A directive that takes no arguments and only records that it was given
///
/// `zerombr`, `skipx`, `autostep`, `interactive` and `mediacheck` are all
/// toggles; each gets its own instance.
#[derive(Debug)]
pub struct Toggle {
    base: CommandBase,
    name: &'static str,
    priority: i32,
}

impl Toggle {
    fn boxed(name: &'static str, priority: i32) -> Box<dyn KickstartCommand> {
        Box::new(Self {
            base: CommandBase::default(),
            name,
            priority,
        })
    }

    pub fn zerombr(_: Version) -> Box<dyn KickstartCommand> {
        Self::boxed("zerombr", priority::ZEROMBR)
    }

    pub fn skipx(_: Version) -> Box<dyn KickstartCommand> {
        Self::boxed("skipx", priority::DEFAULT)
    }

    pub fn autostep(_: Version) -> Box<dyn KickstartCommand> {
        Self::boxed("autostep", priority::DEFAULT)
    }

    pub fn interactive(_: Version) -> Box<dyn KickstartCommand> {
        Self::boxed("interactive", priority::DEFAULT)
    }

    pub fn mediacheck(_: Version) -> Box<dyn KickstartCommand> {
        Self::boxed("mediacheck", priority::DEFAULT)
    }

    pub fn enabled(&self) -> bool {
        self.seen()
    }
}

impl KickstartCommand for Toggle {
    command_boilerplate!();

    fn name(&self) -> &'static str {
        self.name
    }

    fn write_priority(&self) -> i32 {
        self.priority
    }

    fn parse(&mut self, ctx: &mut ParseContext, tokens: Vec<String>) -> Result<(), KickstartError> {
        let _: ToggleArgs = ctx.parse_args(tokens)?;
        Ok(())
    }
}

impl std::fmt::Display for Toggle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.seen() {
            writeln!(f, "{}", self.name)?;
        }
        Ok(())
    }
}
