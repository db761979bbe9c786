use clap::{Parser, ValueEnum};
use strum_macros::Display;

use crate::{errors::KickstartError, version::Version};

use super::{
    flag, opt_some, partition::FsType, priority, CommandBase, KickstartCommand, ParseContext,
};

#[derive(Parser, Debug)]
#[command(name = "autopart")]
struct AutoPartArgs {
    /// Partitioning scheme to use
    #[arg(long = "type")]
    #[arg(conflicts_with = "nolvm")]
    autopart_type: Option<AutoPartType>,

    /// Same as `--type=plain`
    #[arg(long)]
    nolvm: bool,

    #[arg(long)]
    fstype: Option<FsType>,

    #[arg(long)]
    encrypted: bool,

    #[arg(long, requires = "encrypted")]
    passphrase: Option<String>,

    #[arg(long)]
    nohome: bool,

    #[arg(long)]
    noswap: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Display)]
#[strum(serialize_all = "lowercase")]
pub enum AutoPartType {
    Lvm,
    Plain,
    Thinp,
    Btrfs,
}

/// The `autopart` command
///
/// From F20 on automatic partitioning cannot be combined with manual
/// partitioning directives.
#[derive(Debug, Default)]
pub struct AutoPart {
    base: CommandBase,
    exclusive: bool,
    pub autopart_type: Option<AutoPartType>,
    pub fstype: Option<FsType>,
    pub encrypted: bool,
    pub passphrase: Option<String>,
    pub nohome: bool,
    pub noswap: bool,
}

impl AutoPart {
    pub fn boxed(_: Version) -> Box<dyn KickstartCommand> {
        Box::<Self>::default()
    }

    pub fn boxed_exclusive(_: Version) -> Box<dyn KickstartCommand> {
        Box::new(Self {
            exclusive: true,
            ..Default::default()
        })
    }
}

impl KickstartCommand for AutoPart {
    command_boilerplate!();

    fn name(&self) -> &'static str {
        "autopart"
    }

    fn write_priority(&self) -> i32 {
        priority::AUTOPART
    }

    fn conflicts(&self) -> &'static [&'static str] {
        if self.exclusive {
            &["partition", "raid", "volgroup", "logvol", "reqpart"]
        } else {
            &[]
        }
    }

    fn parse(&mut self, ctx: &mut ParseContext, tokens: Vec<String>) -> Result<(), KickstartError> {
        let args: AutoPartArgs = ctx.parse_args(tokens)?;

        let autopart_type = if args.nolvm {
            Some(AutoPartType::Plain)
        } else {
            args.autopart_type.or(self.autopart_type)
        };

        if args.fstype.is_some() && autopart_type == Some(AutoPartType::Btrfs) {
            return Err(ctx.value_error("--fstype cannot be used with --type=btrfs"));
        }

        self.autopart_type = autopart_type;
        if args.fstype.is_some() {
            self.fstype = args.fstype;
        }
        self.encrypted = args.encrypted;
        if args.passphrase.is_some() {
            self.passphrase = args.passphrase;
        }
        self.nohome = args.nohome;
        self.noswap = args.noswap;
        Ok(())
    }
}

impl std::fmt::Display for AutoPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.seen() {
            return Ok(());
        }
        let options = [
            opt_some("type", &self.autopart_type),
            opt_some("fstype", &self.fstype),
            flag("encrypted", self.encrypted),
            opt_some("passphrase", &self.passphrase),
            flag("nohome", self.nohome),
            flag("noswap", self.noswap),
        ]
        .concat();
        writeln!(f, "autopart{options}")
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
            .dispatch_line("autopart --nolvm --encrypted --passphrase='my secret'")
            .unwrap();

        let cmd = handler.command::<AutoPart>().unwrap();
        assert_eq!(cmd.autopart_type, Some(AutoPartType::Plain));
        assert_eq!(
            cmd.to_string(),
            "autopart --type=plain --encrypted --passphrase=\"my secret\"\n"
        );
    }

    #[test]
    fn test_btrfs_fstype() {
        let mut handler = KickstartHandler::new(Version::latest());
        assert!(handler
            .dispatch_line("autopart --type=btrfs --fstype=ext4")
            .is_err());
        assert!(handler
            .dispatch_line("autopart --type=lvm --nolvm")
            .is_err());
    }

    #[test]
    fn test_rejected_line_keeps_state() {
        let mut parser = crate::Parser::new(KickstartHandler::new(Version::latest()))
            .errors_are_fatal(false);
        parser
            .read_kickstart_from_string(
                "autopart --type=lvm\nautopart --type=btrfs --fstype=ext4\n",
                true,
            )
            .unwrap();
        assert_eq!(parser.error_count(), 1);

        let cmd = parser.handler().command::<AutoPart>().unwrap();
        assert_eq!(cmd.autopart_type, Some(AutoPartType::Lvm));
        assert_eq!(cmd.fstype, None);
        assert_eq!(cmd.to_string(), "autopart --type=lvm\n");
    }

    #[test]
    fn test_exclusive_since_f20() {
        let mut old = KickstartHandler::new(Version::F18);
        old.dispatch_line("autopart").unwrap();
        old.dispatch_line("part / --size=100").unwrap();

        let mut new = KickstartHandler::new(Version::F20);
        new.dispatch_line("autopart").unwrap();
        let err = new.dispatch_line("part / --size=100").unwrap_err();
        assert_eq!(err.category(), crate::ErrorCategory::Parse);

        // Order does not matter
        let mut new = KickstartHandler::new(Version::F20);
        new.dispatch_line("raid / --device=md0 --level=1 raid.01").unwrap();
        assert!(new.dispatch_line("autopart").is_err());
    }

    #[test]
    fn test_not_seen_is_empty() {
        let handler = KickstartHandler::new(Version::latest());
        assert_eq!(handler.command::<AutoPart>().unwrap().to_string(), "");
    }
}
