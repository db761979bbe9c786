use clap::{Args, Parser};

use crate::{errors::KickstartError, version::Version};

use super::{flag, opt_list, quote, CommandBase, KickstartCommand, ParseContext};

#[derive(Args, Debug)]
struct TimezoneBase {
    /// Hardware clock is set to UTC
    #[arg(long, visible_alias = "isUtc")]
    utc: bool,

    timezone: String,
}

#[derive(Parser, Debug)]
#[command(name = "timezone")]
struct TimezoneArgs {
    #[command(flatten)]
    base: TimezoneBase,
}

#[derive(Parser, Debug)]
#[command(name = "timezone")]
struct TimezoneNtpArgs {
    #[command(flatten)]
    base: TimezoneBase,

    /// Disable automatic time synchronization
    #[arg(long, conflicts_with = "ntpservers")]
    nontp: bool,

    /// Comma-separated list of NTP servers
    #[arg(long, value_delimiter = ',')]
    ntpservers: Vec<String>,
}

/// The `timezone` command
///
/// NTP options are only understood from F18 on.
#[derive(Debug, Default)]
pub struct Timezone {
    base: CommandBase,
    ntp: bool,
    pub timezone: Option<String>,
    pub utc: bool,
    pub nontp: bool,
    pub ntpservers: Vec<String>,
}

impl Timezone {
    pub fn boxed(_: Version) -> Box<dyn KickstartCommand> {
        Box::<Self>::default()
    }

    pub fn boxed_ntp(_: Version) -> Box<dyn KickstartCommand> {
        Box::new(Self {
            ntp: true,
            ..Default::default()
        })
    }

    fn apply_base(&mut self, base: TimezoneBase) {
        self.timezone = Some(base.timezone);
        self.utc = base.utc;
    }
}

impl KickstartCommand for Timezone {
    command_boilerplate!();

    fn name(&self) -> &'static str {
        "timezone"
    }

    fn parse(&mut self, ctx: &mut ParseContext, tokens: Vec<String>) -> Result<(), KickstartError> {
        if self.ntp {
            let args: TimezoneNtpArgs = ctx.parse_args(tokens)?;
            self.apply_base(args.base);
            self.nontp = args.nontp;
            self.ntpservers = args.ntpservers;
        } else {
            let args: TimezoneArgs = ctx.parse_args(tokens)?;
            self.apply_base(args.base);
        }
        Ok(())
    }
}

impl std::fmt::Display for Timezone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Some(timezone) = self.timezone.as_deref().filter(|_| self.seen()) else {
            return Ok(());
        };
        writeln!(f, "# System timezone")?;
        writeln!(
            f,
            "timezone {}{}{}{}",
            quote(timezone),
            flag("utc", self.utc),
            flag("nontp", self.nontp),
            opt_list("ntpservers", &self.ntpservers)
        )
    }
}
