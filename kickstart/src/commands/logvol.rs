use clap::Parser;

use crate::{errors::KickstartError, types::KsLine, version::Version};

use super::{
    flag, opt, opt_list, opt_some,
    partition::{FsType, PartitionMount},
    priority, CommandBase, KickstartCommand, ParseContext,
};

/// One `logvol` line
#[derive(Parser, Debug, Clone)]
#[command(name = "logvol")]
pub struct LogVolData {
    #[clap(skip)]
    pub line: KsLine,

    pub mountpoint: PartitionMount,

    /// Volume group the logical volume lives in
    #[arg(long, required = true)]
    pub vgname: String,

    /// Name of the logical volume
    #[arg(long, required = true)]
    pub name: String,

    #[arg(long)]
    pub fstype: Option<FsType>,

    /// Size in MiB
    #[arg(long, conflicts_with = "percent")]
    pub size: Option<u64>,

    /// Size as a percentage of the free space in the group
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub percent: Option<u8>,

    #[arg(long)]
    pub grow: bool,

    #[arg(long, requires = "grow")]
    pub maxsize: Option<u64>,

    #[arg(long, conflicts_with_all = ["size", "percent"])]
    pub recommended: bool,

    #[arg(long)]
    pub label: Option<String>,

    #[arg(long, value_delimiter = ',')]
    pub fsoptions: Vec<String>,

    /// Create a thin pool instead of a regular volume
    #[arg(long, conflicts_with = "thin")]
    pub thinpool: bool,

    /// Allocate the volume from a thin pool
    #[arg(long, requires = "poolname")]
    pub thin: bool,

    #[arg(long, requires = "thin")]
    pub poolname: Option<String>,

    #[arg(long)]
    pub useexisting: bool,

    #[arg(long, requires = "useexisting")]
    pub noformat: bool,

    #[arg(long)]
    pub encrypted: bool,

    #[arg(long, requires = "encrypted")]
    pub passphrase: Option<String>,
}

/// Logical volumes are identified by their group and name together
impl PartialEq for LogVolData {
    fn eq(&self, other: &Self) -> bool {
        self.vgname == other.vgname && self.name == other.name
    }
}

impl std::fmt::Display for LogVolData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let options = [
            opt("vgname", &self.vgname),
            opt("name", &self.name),
            opt_some("fstype", &self.fstype),
            opt_some("size", &self.size),
            opt_some("percent", &self.percent),
            flag("grow", self.grow),
            opt_some("maxsize", &self.maxsize),
            flag("recommended", self.recommended),
            opt_some("label", &self.label),
            opt_list("fsoptions", &self.fsoptions),
            flag("thinpool", self.thinpool),
            flag("thin", self.thin),
            opt_some("poolname", &self.poolname),
            flag("useexisting", self.useexisting),
            flag("noformat", self.noformat),
            flag("encrypted", self.encrypted),
            opt_some("passphrase", &self.passphrase),
        ]
        .concat();
        writeln!(f, "logvol {}{}", self.mountpoint, options)
    }
}

/// The `logvol` command
#[derive(Debug, Default)]
pub struct LogVol {
    base: CommandBase,
    pub volumes: Vec<LogVolData>,
}

impl LogVol {
    pub fn boxed(_: Version) -> Box<dyn KickstartCommand> {
        Box::<Self>::default()
    }
}

impl KickstartCommand for LogVol {
    command_boilerplate!();

    fn name(&self) -> &'static str {
        "logvol"
    }

    fn write_priority(&self) -> i32 {
        priority::LOGVOL
    }

    fn parse(&mut self, ctx: &mut ParseContext, tokens: Vec<String>) -> Result<(), KickstartError> {
        let mut lv: LogVolData = ctx.parse_args(tokens)?;

        let sized = lv.size.is_some() || lv.percent.is_some() || lv.recommended;
        if !sized && !lv.useexisting && !lv.thinpool {
            return Err(ctx.value_error(format!(
                "Logical volume {} requires --size, --percent or --recommended",
                lv.name
            )));
        }

        lv.line = ctx.line().clone();
        ctx.push_data(&mut self.volumes, lv, |lv| {
            format!(
                "A logical volume with the name {} has already been defined in volume group {}",
                lv.name, lv.vgname
            )
        });
        Ok(())
    }
}

impl std::fmt::Display for LogVol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for lv in &self.volumes {
            write!(f, "{lv}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::KickstartHandler;

    #[test]
    fn test_key_is_group_and_name() {
        let mut handler = KickstartHandler::new(Version::latest());
        for line in [
            "logvol / --vgname=sysvg --name=root --size=4096",
            "logvol /home --vgname=othervg --name=root --percent=50",
        ] {
            assert!(handler.dispatch_line(line).unwrap().is_empty(), "{line}");
        }

        let warnings = handler
            .dispatch_line("logvol /srv --vgname=sysvg --name=root --size=1")
            .unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(handler.command::<LogVol>().unwrap().volumes.len(), 3);
    }

    #[test]
    fn test_display() {
        let mut handler = KickstartHandler::new(Version::latest());
        handler
            .dispatch_line("logvol swap --vgname=sysvg --name=swap --recommended")
            .unwrap();
        assert_eq!(
            handler.command::<LogVol>().unwrap().to_string(),
            "logvol swap --vgname=sysvg --name=swap --recommended\n"
        );
    }

    #[test]
    fn test_invalid() {
        let mut handler = KickstartHandler::new(Version::latest());
        for bad in [
            "logvol / --vgname=sysvg",
            "logvol / --vgname=sysvg --name=root",
            "logvol / --vgname=sysvg --name=root --size=1 --percent=2",
            "logvol / --vgname=sysvg --name=root --percent=101",
        ] {
            assert!(handler.dispatch_line(bad).is_err(), "{bad}");
        }
    }
}
