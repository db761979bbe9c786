use clap::{Parser, ValueEnum};
use strum_macros::Display;

use crate::{errors::KickstartError, version::Version};

use super::{opt_some, CommandBase, KickstartCommand, ParseContext};

#[derive(Parser, Debug)]
#[command(name = "logging")]
struct LoggingArgs {
    /// Remote syslog host
    #[arg(long)]
    host: Option<String>,

    #[arg(long, requires = "host")]
    port: Option<u16>,

    /// Minimum level shown on tty3
    #[arg(long)]
    level: Option<LogLevel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Display)]
#[strum(serialize_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

/// The `logging` command
#[derive(Debug, Default)]
pub struct Logging {
    base: CommandBase,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub level: Option<LogLevel>,
}

impl Logging {
    pub fn boxed(_: Version) -> Box<dyn KickstartCommand> {
        Box::<Self>::default()
    }
}

impl KickstartCommand for Logging {
    command_boilerplate!();

    fn name(&self) -> &'static str {
        "logging"
    }

    fn parse(&mut self, ctx: &mut ParseContext, tokens: Vec<String>) -> Result<(), KickstartError> {
        let args: LoggingArgs = ctx.parse_args(tokens)?;
        if args.host.is_some() {
            self.host = args.host;
            self.port = args.port;
        }
        if args.level.is_some() {
            self.level = args.level;
        }
        Ok(())
    }
}

impl std::fmt::Display for Logging {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.seen() {
            return Ok(());
        }
        writeln!(
            f,
            "logging{}{}{}",
            opt_some("host", &self.host),
            opt_some("port", &self.port),
            opt_some("level", &self.level)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::KickstartHandler;

    #[test]
    fn test_parse() {
        let mut handler = KickstartHandler::new(Version::latest());
        handler
            .dispatch_line("logging --host=syslog.example.com --port=514")
            .unwrap();
        handler.dispatch_line("logging --level=warning").unwrap();
        assert_eq!(
            handler.command::<Logging>().unwrap().to_string(),
            "logging --host=syslog.example.com --port=514 --level=warning\n"
        );
        assert!(handler.dispatch_line("logging --port=514").is_err());
        assert!(handler.dispatch_line("logging --level=loud").is_err());
    }
}
