use clap::Parser;
use strum_macros::{Display, EnumString};

use crate::{errors::KickstartError, version::Version};

use super::{CommandBase, KickstartCommand, ParseContext};

#[derive(Parser, Debug)]
struct MethodArgs {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum MethodKind {
    Install,
    Upgrade,
}

/// The `install` and `upgrade` commands
#[derive(Debug, Default)]
pub struct Method {
    base: CommandBase,
    pub method: Option<MethodKind>,
}

impl Method {
    pub fn boxed(_: Version) -> Box<dyn KickstartCommand> {
        Box::<Self>::default()
    }
}

impl KickstartCommand for Method {
    command_boilerplate!();

    fn name(&self) -> &'static str {
        "install"
    }

    fn parse(&mut self, ctx: &mut ParseContext, tokens: Vec<String>) -> Result<(), KickstartError> {
        let _: MethodArgs = ctx.parse_args(tokens)?;
        let method = self
            .base
            .current_cmd
            .parse::<MethodKind>()
            .map_err(|_| ctx.value_error(format!("Unknown method {}", self.base.current_cmd)))?;
        self.method = Some(method);
        Ok(())
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(method) = self.method {
            writeln!(f, "{method}")?;
        }
        Ok(())
    }
}
