use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use strum_macros::Display;

use crate::{errors::KickstartError, types::KsLine, version::Version};

use super::{flag, opt_list, opt_some, priority, CommandBase, KickstartCommand, ParseContext};

/// One `part`/`partition` line
#[derive(Parser, Debug, Clone)]
#[command(name = "partition")]
pub struct PartData {
    #[clap(skip)]
    pub line: KsLine,

    /// The mountpoint of the partition
    ///
    /// Accepted values:
    ///
    /// - A path to a directory (e.g. `/`, `/boot`, `/home`)
    /// - `swap`, `biosboot`, `none`
    /// - `raid.<id>`, `pv.<id>`, `btrfs.<id>`
    #[arg(verbatim_doc_comment)]
    pub mountpoint: PartitionMount,

    /// The filesystem type of the partition
    #[arg(long)]
    pub fstype: Option<FsType>,

    /// Minimum size of the partition in MiB
    #[arg(long)]
    pub size: Option<u64>,

    /// Whether the partition should grow to fill the available space
    #[arg(long)]
    pub grow: bool,

    /// Maximum size in MiB when growing
    #[arg(long)]
    pub maxsize: Option<u64>,

    /// The target disk for this partition
    #[arg(long)]
    #[arg(alias = "ondrive")]
    pub ondisk: Option<String>,

    /// Use an existing partition
    #[arg(long)]
    #[arg(alias = "usepart")]
    pub onpart: Option<String>,

    /// Label to add to the filesystem
    #[arg(long)]
    pub label: Option<String>,

    /// Options to be used when mounting the filesystem
    #[arg(long)]
    #[arg(value_delimiter = ',')]
    pub fsoptions: Vec<String>,

    /// Force the partition to be allocated as a primary partition
    #[arg(long)]
    pub asprimary: bool,

    /// Do not format an existing partition
    #[arg(long, requires = "onpart")]
    pub noformat: bool,

    /// Let the installer pick the size
    #[arg(long, conflicts_with = "size")]
    pub recommended: bool,

    /// Encrypt the partition
    #[arg(long)]
    pub encrypted: bool,

    /// Passphrase for the encrypted partition
    #[arg(long, requires = "encrypted")]
    pub passphrase: Option<String>,
}

/// Two partitions are the same entity when they share a mountpoint
impl PartialEq for PartData {
    fn eq(&self, other: &Self) -> bool {
        self.mountpoint == other.mountpoint
    }
}

impl std::fmt::Display for PartData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let options = [
            opt_some("fstype", &self.fstype),
            opt_some("size", &self.size),
            flag("grow", self.grow),
            opt_some("maxsize", &self.maxsize),
            opt_some("ondisk", &self.ondisk),
            opt_some("onpart", &self.onpart),
            opt_some("label", &self.label),
            opt_list("fsoptions", &self.fsoptions),
            flag("asprimary", self.asprimary),
            flag("noformat", self.noformat),
            flag("recommended", self.recommended),
            flag("encrypted", self.encrypted),
            opt_some("passphrase", &self.passphrase),
        ]
        .concat();
        writeln!(f, "part {}{}", self.mountpoint, options)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PartitionMount {
    Path(PathBuf),
    Swap,
    Raid(String),
    Pv(String),
    Btrfs(String),
    BiosBoot,
    Unmounted,
}

impl std::str::FromStr for PartitionMount {
    type Err = Box<dyn std::error::Error + Send + Sync>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "swap" => Ok(Self::Swap),
            "biosboot" => Ok(Self::BiosBoot),
            "none" | "None" => Ok(Self::Unmounted),
            s if s.starts_with('/') => Ok(Self::Path(PathBuf::from_str(s)?)),
            s if s.starts_with("raid.") => Ok(Self::Raid(id_suffix(s)?)),
            s if s.starts_with("pv.") => Ok(Self::Pv(id_suffix(s)?)),
            s if s.starts_with("btrfs.") => Ok(Self::Btrfs(id_suffix(s)?)),
            _ => Err("Provided mountpoint does not match any known type".into()),
        }
    }
}

fn id_suffix(s: &str) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    match s.split_once('.') {
        Some((_, id)) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(format!("Missing identifier in '{s}'").into()),
    }
}

impl std::fmt::Display for PartitionMount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartitionMount::Path(path) => write!(f, "{}", path.display()),
            PartitionMount::Swap => write!(f, "swap"),
            PartitionMount::Raid(raid) => write!(f, "raid.{}", raid),
            PartitionMount::Pv(pv) => write!(f, "pv.{}", pv),
            PartitionMount::Btrfs(btrfs) => write!(f, "btrfs.{}", btrfs),
            PartitionMount::BiosBoot => write!(f, "biosboot"),
            PartitionMount::Unmounted => write!(f, "none"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Display)]
#[strum(serialize_all = "lowercase")]
pub enum FsType {
    Ext2,
    Ext3,
    Ext4,
    Xfs,
    Btrfs,
    Vfat,
    Efi,
    Swap,
    Biosboot,
    Prepboot,
}

/// The `part` / `partition` command
#[derive(Debug, Default)]
pub struct Partition {
    base: CommandBase,
    pub partitions: Vec<PartData>,
}

impl Partition {
    pub fn boxed(_: Version) -> Box<dyn KickstartCommand> {
        Box::<Self>::default()
    }
}

impl KickstartCommand for Partition {
    command_boilerplate!();

    fn name(&self) -> &'static str {
        "partition"
    }

    fn write_priority(&self) -> i32 {
        priority::PARTITION
    }

    fn parse(&mut self, ctx: &mut ParseContext, tokens: Vec<String>) -> Result<(), KickstartError> {
        let mut part: PartData = ctx.parse_args(tokens)?;

        if part.maxsize.is_some() && !part.grow {
            return Err(ctx.value_error("--maxsize requires --grow"));
        }

        part.line = ctx.line().clone();
        ctx.push_data(&mut self.partitions, part, |p| {
            format!(
                "A partition with the mountpoint {} has already been defined",
                p.mountpoint
            )
        });
        Ok(())
    }
}

impl std::fmt::Display for Partition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.partitions.is_empty() {
            return Ok(());
        }
        writeln!(f, "# Disk partitioning information")?;
        for part in &self.partitions {
            write!(f, "{part}")?;
        }
        Ok(())
    }
}
