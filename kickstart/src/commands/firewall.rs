use clap::{ArgGroup, Parser};

use crate::{errors::KickstartError, version::Version};

use super::{flag, opt, opt_list, CommandBase, KickstartCommand, ParseContext};

#[derive(Parser, Debug)]
#[command(name = "firewall")]
#[clap(group(ArgGroup::new("state").multiple(false)))]
struct FirewallArgs {
    #[arg(long, alias = "enable", group = "state")]
    enabled: bool,

    #[arg(long, alias = "disable", group = "state")]
    disabled: bool,

    /// Use the distribution's default rules
    #[arg(long = "use-system-defaults", group = "state")]
    use_system_defaults: bool,

    /// Interfaces to trust completely, may be repeated
    #[arg(long)]
    trust: Vec<String>,

    /// Ports to open, as `port:proto`
    #[arg(long, value_delimiter = ',')]
    port: Vec<String>,

    /// Services to allow
    #[arg(long, value_delimiter = ',')]
    service: Vec<String>,

    /// Services to block
    #[arg(long = "remove-service", value_delimiter = ',')]
    remove_service: Vec<String>,
}

/// The `firewall` command
#[derive(Debug, Default)]
pub struct Firewall {
    base: CommandBase,
    pub enabled: Option<bool>,
    pub use_system_defaults: bool,
    pub trusts: Vec<String>,
    pub ports: Vec<String>,
    pub services: Vec<String>,
    pub remove_services: Vec<String>,
}

impl Firewall {
    pub fn boxed(_: Version) -> Box<dyn KickstartCommand> {
        Box::<Self>::default()
    }
}

impl KickstartCommand for Firewall {
    command_boilerplate!();

    fn name(&self) -> &'static str {
        "firewall"
    }

    fn parse(&mut self, ctx: &mut ParseContext, tokens: Vec<String>) -> Result<(), KickstartError> {
        let args: FirewallArgs = ctx.parse_args(tokens)?;

        if args.enabled {
            self.enabled = Some(true);
        } else if args.disabled {
            self.enabled = Some(false);
        }
        self.use_system_defaults = args.use_system_defaults;
        self.trusts = args.trust;
        self.ports = args.port;
        self.services = args.service;
        self.remove_services = args.remove_service;
        Ok(())
    }
}

impl std::fmt::Display for Firewall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.seen() {
            return Ok(());
        }
        let state = match self.enabled {
            Some(true) => " --enabled",
            Some(false) => " --disabled",
            None => "",
        };
        let trusts: String = self.trusts.iter().map(|t| opt("trust", t)).collect();
        let options = [
            flag("use-system-defaults", self.use_system_defaults),
            trusts,
            opt_list("port", &self.ports),
            opt_list("service", &self.services),
            opt_list("remove-service", &self.remove_services),
        ]
        .concat();
        writeln!(f, "# Firewall configuration")?;
        writeln!(f, "firewall{state}{options}")
    }
}
