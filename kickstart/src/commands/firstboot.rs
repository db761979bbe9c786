use clap::{ArgGroup, Parser};
use strum_macros::Display;

use crate::{errors::KickstartError, version::Version};

use super::{CommandBase, KickstartCommand, ParseContext};

#[derive(Parser, Debug)]
#[command(name = "firstboot")]
#[clap(group(ArgGroup::new("state").multiple(false)))]
struct FirstbootArgs {
    #[arg(long, alias = "enabled", group = "state")]
    enable: bool,

    #[arg(long, alias = "disabled", group = "state")]
    disable: bool,

    /// Run the setup tool in reconfiguration mode
    #[arg(long, group = "state")]
    reconfig: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum FirstbootState {
    Enable,
    Disable,
    Reconfig,
}

/// The `firstboot` command
#[derive(Debug, Default)]
pub struct Firstboot {
    base: CommandBase,
    pub state: Option<FirstbootState>,
}

impl Firstboot {
    pub fn boxed(_: Version) -> Box<dyn KickstartCommand> {
        Box::<Self>::default()
    }
}

impl KickstartCommand for Firstboot {
    command_boilerplate!();

    fn name(&self) -> &'static str {
        "firstboot"
    }

    fn parse(&mut self, ctx: &mut ParseContext, tokens: Vec<String>) -> Result<(), KickstartError> {
        let args: FirstbootArgs = ctx.parse_args(tokens)?;
        self.state = Some(if args.reconfig {
            FirstbootState::Reconfig
        } else if args.disable {
            FirstbootState::Disable
        } else {
            FirstbootState::Enable
        });
        Ok(())
    }
}

impl std::fmt::Display for Firstboot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(state) = self.state {
            writeln!(f, "# Run the Setup Agent on first boot")?;
            writeln!(f, "firstboot --{state}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::KickstartHandler;

    #[test]
    fn test_parse() {
        let mut handler = KickstartHandler::new(Version::latest());
        handler.dispatch_line("firstboot").unwrap();
        assert_eq!(
            handler.command::<Firstboot>().unwrap().state,
            Some(FirstbootState::Enable)
        );
        handler.dispatch_line("firstboot --disabled").unwrap();
        assert_eq!(
            handler.command::<Firstboot>().unwrap().to_string(),
            "# Run the Setup Agent on first boot\nfirstboot --disable\n"
        );
        assert!(handler.dispatch_line("firstboot --enable --reconfig").is_err());
    }
}
