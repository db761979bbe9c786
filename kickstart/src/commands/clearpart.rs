use clap::{ArgGroup, Parser, ValueEnum};
use strum_macros::Display;

use crate::{errors::KickstartError, version::Version};

use super::{flag, opt_list, opt_some, priority, CommandBase, KickstartCommand, ParseContext};

#[derive(Parser, Debug)]
#[command(name = "clearpart")]
#[clap(group(ArgGroup::new("which").multiple(false)))]
struct ClearPartArgs {
    /// Remove all partitions
    #[arg(long, group = "which")]
    all: bool,

    /// Remove only Linux partitions
    #[arg(long, group = "which")]
    linux: bool,

    /// Do not remove any partition
    #[arg(long, group = "which")]
    none: bool,

    /// Limit clearing to these drives
    #[arg(long, value_delimiter = ',')]
    drives: Vec<String>,

    /// Remove exactly these devices
    #[arg(long, value_delimiter = ',')]
    list: Vec<String>,

    /// Create a new disk label on cleared drives
    #[arg(long)]
    initlabel: bool,

    #[arg(long)]
    disklabel: Option<DiskLabel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ClearPartType {
    All,
    Linux,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Display)]
#[strum(serialize_all = "lowercase")]
pub enum DiskLabel {
    Msdos,
    Gpt,
}

/// The `clearpart` command
#[derive(Debug, Default)]
pub struct ClearPart {
    base: CommandBase,
    pub clear_type: Option<ClearPartType>,
    pub drives: Vec<String>,
    pub devices: Vec<String>,
    pub initlabel: bool,
    pub disklabel: Option<DiskLabel>,
}

impl ClearPart {
    pub fn boxed(_: Version) -> Box<dyn KickstartCommand> {
        Box::<Self>::default()
    }
}

impl KickstartCommand for ClearPart {
    command_boilerplate!();

    fn name(&self) -> &'static str {
        "clearpart"
    }

    fn write_priority(&self) -> i32 {
        priority::CLEARPART
    }

    fn parse(&mut self, ctx: &mut ParseContext, tokens: Vec<String>) -> Result<(), KickstartError> {
        let args: ClearPartArgs = ctx.parse_args(tokens)?;

        if args.all {
            self.clear_type = Some(ClearPartType::All);
        } else if args.linux {
            self.clear_type = Some(ClearPartType::Linux);
        } else if args.none {
            self.clear_type = Some(ClearPartType::None);
        }

        if !args.drives.is_empty() {
            self.drives = args.drives;
        }
        if !args.list.is_empty() {
            self.devices = args.list;
        }
        self.initlabel = args.initlabel;
        if args.disklabel.is_some() {
            self.disklabel = args.disklabel;
        }
        Ok(())
    }
}

impl std::fmt::Display for ClearPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.seen() {
            return Ok(());
        }
        let clear = self
            .clear_type
            .map(|t| format!(" --{t}"))
            .unwrap_or_default();
        let options = [
            clear,
            opt_list("drives", &self.drives),
            opt_list("list", &self.devices),
            flag("initlabel", self.initlabel),
            opt_some("disklabel", &self.disklabel),
        ]
        .concat();
        writeln!(f, "# Partition clearing information")?;
        writeln!(f, "clearpart{options}")
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
            .dispatch_line("clearpart --all --initlabel --drives=sda,sdb")
            .unwrap();

        let cmd = handler.command::<ClearPart>().unwrap();
        assert_eq!(cmd.clear_type, Some(ClearPartType::All));
        assert_eq!(cmd.drives, vec!["sda", "sdb"]);
        assert_eq!(
            cmd.to_string(),
            "# Partition clearing information\nclearpart --all --drives=sda,sdb --initlabel\n"
        );
    }

    #[test]
    fn test_exclusive_types() {
        let mut handler = KickstartHandler::new(Version::latest());
        assert!(handler.dispatch_line("clearpart --all --linux").is_err());
    }

    #[test]
    fn test_later_occurrence_keeps_unset_values() {
        let mut handler = KickstartHandler::new(Version::latest());
        handler.dispatch_line("clearpart --linux --drives=sda").unwrap();
        handler.dispatch_line("clearpart --disklabel=gpt").unwrap();

        let cmd = handler.command::<ClearPart>().unwrap();
        assert_eq!(cmd.clear_type, Some(ClearPartType::Linux));
        assert_eq!(cmd.drives, vec!["sda"]);
        assert_eq!(cmd.disklabel, Some(DiskLabel::Gpt));
    }
}
