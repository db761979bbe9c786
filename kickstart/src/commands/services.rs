use clap::Parser;

use crate::{errors::KickstartError, version::Version};

use super::{opt_list, CommandBase, KickstartCommand, ParseContext};

#[derive(Parser, Debug)]
#[command(name = "services")]
struct ServicesArgs {
    #[arg(long, value_delimiter = ',')]
    enabled: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    disabled: Vec<String>,
}

/// The `services` command
#[derive(Debug, Default)]
pub struct Services {
    base: CommandBase,
    pub enabled: Vec<String>,
    pub disabled: Vec<String>,
}

impl Services {
    pub fn boxed(_: Version) -> Box<dyn KickstartCommand> {
        Box::<Self>::default()
    }
}

impl KickstartCommand for Services {
    command_boilerplate!();

    fn name(&self) -> &'static str {
        "services"
    }

    fn parse(&mut self, ctx: &mut ParseContext, tokens: Vec<String>) -> Result<(), KickstartError> {
        let args: ServicesArgs = ctx.parse_args(tokens)?;
        if args.enabled.is_empty() && args.disabled.is_empty() {
            return Err(ctx.value_error("services requires --enabled or --disabled"));
        }

        let enabled: Vec<String> = args.enabled.into_iter().map(|s| s.trim().to_string()).collect();
        let disabled: Vec<String> = args.disabled.into_iter().map(|s| s.trim().to_string()).collect();
        if let Some(both) = enabled.iter().find(|s| disabled.contains(s)) {
            return Err(ctx.value_error(format!(
                "Service {both} cannot be both enabled and disabled"
            )));
        }

        self.enabled = enabled;
        self.disabled = disabled;
        Ok(())
    }
}

impl std::fmt::Display for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.seen() {
            return Ok(());
        }
        writeln!(f, "# System services")?;
        writeln!(
            f,
            "services{}{}",
            opt_list("disabled", &self.disabled),
            opt_list("enabled", &self.enabled)
        )
    }
}
