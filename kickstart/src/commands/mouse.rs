use clap::Parser;

use crate::{errors::KickstartError, version::Version};

use super::{flag, opt_some, quote, CommandBase, KickstartCommand, ParseContext};

#[derive(Parser, Debug)]
#[command(name = "mouse")]
struct MouseArgs {
    #[arg(long)]
    device: Option<String>,

    /// Emulate a third button
    #[arg(long)]
    emulthree: bool,

    protocol: Option<String>,
}

/// The legacy `mouse` command
#[derive(Debug, Default)]
pub struct Mouse {
    base: CommandBase,
    pub device: Option<String>,
    pub emulthree: bool,
    pub protocol: Option<String>,
}

impl Mouse {
    pub fn boxed(_: Version) -> Box<dyn KickstartCommand> {
        Box::<Self>::default()
    }
}

impl KickstartCommand for Mouse {
    command_boilerplate!();

    fn name(&self) -> &'static str {
        "mouse"
    }

    fn parse(&mut self, ctx: &mut ParseContext, tokens: Vec<String>) -> Result<(), KickstartError> {
        let args: MouseArgs = ctx.parse_args(tokens)?;
        self.device = args.device;
        self.emulthree = args.emulthree;
        self.protocol = args.protocol;
        Ok(())
    }
}

impl std::fmt::Display for Mouse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.seen() {
            return Ok(());
        }
        let protocol = self
            .protocol
            .as_deref()
            .map(|p| format!(" {}", quote(p)))
            .unwrap_or_default();
        writeln!(
            f,
            "mouse{}{}{}",
            opt_some("device", &self.device),
            flag("emulthree", self.emulthree),
            protocol
        )
    }
}
