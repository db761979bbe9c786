use clap::{ArgGroup, Parser};
use strum_macros::Display;

use crate::{errors::KickstartError, version::Version};

use super::{CommandBase, KickstartCommand, ParseContext};

#[derive(Parser, Debug)]
#[command(name = "selinux")]
#[clap(group(ArgGroup::new("mode").required(true).multiple(false)))]
struct SelinuxArgs {
    #[arg(long, group = "mode")]
    enforcing: bool,

    #[arg(long, group = "mode")]
    permissive: bool,

    #[arg(long, group = "mode")]
    disabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum SelinuxMode {
    Enforcing,
    Permissive,
    Disabled,
}

/// The `selinux` command
#[derive(Debug, Default)]
pub struct Selinux {
    base: CommandBase,
    pub mode: Option<SelinuxMode>,
}

impl Selinux {
    pub fn boxed(_: Version) -> Box<dyn KickstartCommand> {
        Box::<Self>::default()
    }
}

impl KickstartCommand for Selinux {
    command_boilerplate!();

    fn name(&self) -> &'static str {
        "selinux"
    }

    fn parse(&mut self, ctx: &mut ParseContext, tokens: Vec<String>) -> Result<(), KickstartError> {
        let args: SelinuxArgs = ctx.parse_args(tokens)?;
        self.mode = Some(if args.enforcing {
            SelinuxMode::Enforcing
        } else if args.permissive {
            SelinuxMode::Permissive
        } else {
            SelinuxMode::Disabled
        });
        Ok(())
    }
}

impl std::fmt::Display for Selinux {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(mode) = self.mode {
            writeln!(f, "# SELinux configuration")?;
            writeln!(f, "selinux --{mode}")?;
        }
        Ok(())
    }
}
