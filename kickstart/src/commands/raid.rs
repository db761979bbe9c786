use clap::Parser;

use crate::{errors::KickstartError, types::KsLine, version::Version};

use super::{
    flag, opt_list, opt_some,
    partition::{FsType, PartitionMount},
    priority, CommandBase, KickstartCommand, ParseContext,
};

/// One `raid` line
#[derive(Parser, Debug, Clone)]
#[command(name = "raid")]
pub struct RaidData {
    #[clap(skip)]
    pub line: KsLine,

    /// Where the RAID device is mounted, or `pv.<id>` when it backs LVM
    pub mountpoint: PartitionMount,

    /// Member partitions, e.g. `raid.01 raid.02`
    pub members: Vec<String>,

    /// Name of the md device, e.g. `md0`
    #[arg(long, required = true)]
    pub device: String,

    /// RAID level
    #[arg(long, required_unless_present = "useexisting")]
    pub level: Option<RaidLevel>,

    #[arg(long)]
    pub fstype: Option<FsType>,

    /// Number of spare members
    #[arg(long)]
    pub spares: Option<u32>,

    #[arg(long)]
    pub label: Option<String>,

    #[arg(long)]
    #[arg(value_delimiter = ',')]
    pub fsoptions: Vec<String>,

    /// Reuse an existing array
    #[arg(long)]
    pub useexisting: bool,

    #[arg(long, requires = "useexisting")]
    pub noformat: bool,

    #[arg(long)]
    pub encrypted: bool,

    #[arg(long, requires = "encrypted")]
    pub passphrase: Option<String>,
}

/// RAID arrays are identified by their device
impl PartialEq for RaidData {
    fn eq(&self, other: &Self) -> bool {
        self.device == other.device
    }
}

impl std::fmt::Display for RaidData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let options = [
            format!(" --device={}", self.device),
            opt_some("level", &self.level),
            opt_some("fstype", &self.fstype),
            opt_some("spares", &self.spares),
            opt_some("label", &self.label),
            opt_list("fsoptions", &self.fsoptions),
            flag("useexisting", self.useexisting),
            flag("noformat", self.noformat),
            flag("encrypted", self.encrypted),
            opt_some("passphrase", &self.passphrase),
        ]
        .concat();
        write!(f, "raid {}{}", self.mountpoint, options)?;
        for member in &self.members {
            write!(f, " {member}")?;
        }
        writeln!(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaidLevel {
    Raid0,
    Raid1,
    Raid4,
    Raid5,
    Raid6,
    Raid10,
}

impl std::str::FromStr for RaidLevel {
    type Err = String;

    /// Accepts `RAID1`, `raid1` and `1` alike; anything else is rejected
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase();
        match upper.strip_prefix("RAID").unwrap_or(&upper) {
            "0" => Ok(Self::Raid0),
            "1" => Ok(Self::Raid1),
            "4" => Ok(Self::Raid4),
            "5" => Ok(Self::Raid5),
            "6" => Ok(Self::Raid6),
            "10" => Ok(Self::Raid10),
            _ => Err(format!("invalid RAID level: {s}")),
        }
    }
}

impl std::fmt::Display for RaidLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self {
            RaidLevel::Raid0 => 0,
            RaidLevel::Raid1 => 1,
            RaidLevel::Raid4 => 4,
            RaidLevel::Raid5 => 5,
            RaidLevel::Raid6 => 6,
            RaidLevel::Raid10 => 10,
        };
        write!(f, "RAID{level}")
    }
}

/// The `raid` command
#[derive(Debug, Default)]
pub struct Raid {
    base: CommandBase,
    pub arrays: Vec<RaidData>,
}

impl Raid {
    pub fn boxed(_: Version) -> Box<dyn KickstartCommand> {
        Box::<Self>::default()
    }
}

impl KickstartCommand for Raid {
    command_boilerplate!();

    fn name(&self) -> &'static str {
        "raid"
    }

    fn write_priority(&self) -> i32 {
        priority::RAID
    }

    fn parse(&mut self, ctx: &mut ParseContext, tokens: Vec<String>) -> Result<(), KickstartError> {
        let mut raid: RaidData = ctx.parse_args(tokens)?;

        if raid.members.is_empty() && !raid.useexisting {
            return Err(ctx.value_error(format!(
                "Partitions required for RAID device {}",
                raid.device
            )));
        }

        raid.line = ctx.line().clone();
        ctx.push_data(&mut self.arrays, raid, |r| {
            format!("A RAID device with the name {} has already been defined", r.device)
        });
        Ok(())
    }
}

impl std::fmt::Display for Raid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for raid in &self.arrays {
            write!(f, "{raid}")?;
        }
        Ok(())
    }
}
