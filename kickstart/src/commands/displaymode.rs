use clap::Parser;
use strum_macros::{Display, EnumString};

use crate::{errors::KickstartError, version::Version};

use super::{flag, CommandBase, KickstartCommand, ParseContext};

#[derive(Parser, Debug)]
struct DisplayModeArgs {
    /// Do not allow the user to interact with the installer
    #[arg(long = "non-interactive")]
    non_interactive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum DisplayModeKind {
    Cmdline,
    Graphical,
    Text,
}

/// The `cmdline`, `graphical` and `text` commands
#[derive(Debug, Default)]
pub struct DisplayMode {
    base: CommandBase,
    pub mode: Option<DisplayModeKind>,
    pub non_interactive: bool,
}

impl DisplayMode {
    pub fn boxed(_: Version) -> Box<dyn KickstartCommand> {
        Box::<Self>::default()
    }
}

impl KickstartCommand for DisplayMode {
    command_boilerplate!();

    fn name(&self) -> &'static str {
        "displaymode"
    }

    fn parse(&mut self, ctx: &mut ParseContext, tokens: Vec<String>) -> Result<(), KickstartError> {
        let args: DisplayModeArgs = ctx.parse_args(tokens)?;
        let mode = self
            .base
            .current_cmd
            .parse::<DisplayModeKind>()
            .map_err(|_| ctx.value_error(format!("Unknown display mode {}", self.base.current_cmd)))?;

        if args.non_interactive && mode != DisplayModeKind::Graphical {
            return Err(ctx.value_error("--non-interactive is only valid for graphical"));
        }

        self.mode = Some(mode);
        self.non_interactive = args.non_interactive;
        Ok(())
    }
}

impl std::fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(mode) = self.mode {
            writeln!(f, "# Use {mode} install")?;
            writeln!(f, "{mode}{}", flag("non-interactive", self.non_interactive))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::KickstartHandler;

    #[test]
    fn test_mode() {
        let mut handler = KickstartHandler::new(Version::latest());
        handler.dispatch_line("text").unwrap();
        assert!(handler.dispatch_line("text --non-interactive").is_err());
        handler.dispatch_line("graphical --non-interactive").unwrap();

        assert_eq!(
            handler.command::<DisplayMode>().unwrap().to_string(),
            "# Use graphical install\ngraphical --non-interactive\n"
        );
    }
}
