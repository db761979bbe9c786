use clap::Parser;
use strum_macros::{Display, EnumString};

use crate::{errors::KickstartError, version::Version};

use super::{flag, CommandBase, KickstartCommand, ParseContext};

#[derive(Parser, Debug)]
struct RebootArgs {
    /// Eject the installation media
    #[arg(long)]
    eject: bool,

    /// Reboot through kexec instead of the firmware
    #[arg(long)]
    kexec: bool,
}

/// What to do once the installation finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum RebootAction {
    Reboot,
    Poweroff,
    Shutdown,
    Halt,
}

/// The `reboot`, `poweroff`, `shutdown` and `halt` commands
///
/// All four share one instance; the directive seen last decides the action.
#[derive(Debug, Default)]
pub struct Reboot {
    base: CommandBase,
    pub action: Option<RebootAction>,
    pub eject: bool,
    pub kexec: bool,
}

impl Reboot {
    pub fn boxed(_: Version) -> Box<dyn KickstartCommand> {
        Box::<Self>::default()
    }
}

impl KickstartCommand for Reboot {
    command_boilerplate!();

    fn name(&self) -> &'static str {
        "reboot"
    }

    fn parse(&mut self, ctx: &mut ParseContext, tokens: Vec<String>) -> Result<(), KickstartError> {
        let args: RebootArgs = ctx.parse_args(tokens)?;
        let action = self
            .base
            .current_cmd
            .parse::<RebootAction>()
            .map_err(|_| ctx.value_error(format!("Unknown action {}", self.base.current_cmd)))?;

        self.action = Some(action);
        self.eject = args.eject;
        self.kexec = args.kexec;
        Ok(())
    }
}

impl std::fmt::Display for Reboot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(action) = self.action {
            writeln!(
                f,
                "# {} after installation\n{}{}{}",
                match action {
                    RebootAction::Reboot => "Reboot",
                    RebootAction::Poweroff | RebootAction::Shutdown => "Shutdown",
                    RebootAction::Halt => "Halt",
                },
                action,
                flag("eject", self.eject),
                flag("kexec", self.kexec)
            )?;
        }
        Ok(())
    }
}
