use clap::{Parser, ValueEnum};
use strum_macros::Display;

use crate::{errors::KickstartError, types::KsLine, version::Version};

use super::{opt, priority, quote, CommandBase, KickstartCommand, ParseContext};

/// One `snapshot` line
#[derive(Parser, Debug, Clone)]
#[command(name = "snapshot")]
pub struct SnapshotData {
    #[clap(skip)]
    pub line: KsLine,

    /// Origin volume, as `<vgname>/<lvname>`
    pub origin: String,

    /// Name of the snapshot
    #[arg(long, required = true)]
    pub name: String,

    /// When the snapshot is taken
    #[arg(long, required = true)]
    pub when: SnapshotWhen,
}

impl PartialEq for SnapshotData {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl std::fmt::Display for SnapshotData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "snapshot {}{}{}",
            quote(&self.origin),
            opt("name", &self.name),
            opt("when", self.when)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum SnapshotWhen {
    PreInstall,
    PostInstall,
}

/// The `snapshot` command
#[derive(Debug, Default)]
pub struct Snapshot {
    base: CommandBase,
    pub snapshots: Vec<SnapshotData>,
}

impl Snapshot {
    pub fn boxed(_: Version) -> Box<dyn KickstartCommand> {
        Box::<Self>::default()
    }
}

impl KickstartCommand for Snapshot {
    command_boilerplate!();

    fn name(&self) -> &'static str {
        "snapshot"
    }

    fn write_priority(&self) -> i32 {
        priority::SNAPSHOT
    }

    fn parse(&mut self, ctx: &mut ParseContext, tokens: Vec<String>) -> Result<(), KickstartError> {
        let mut snapshot: SnapshotData = ctx.parse_args(tokens)?;

        match snapshot.origin.split_once('/') {
            Some((vg, lv)) if !vg.is_empty() && !lv.is_empty() && !lv.contains('/') => {}
            _ => {
                return Err(ctx.value_error(format!(
                    "Snapshot origin {} must be in the form VG/LV",
                    snapshot.origin
                )))
            }
        }

        snapshot.line = ctx.line().clone();
        ctx.push_data(&mut self.snapshots, snapshot, |s| {
            format!("A snapshot with the name {} has already been defined", s.name)
        });
        Ok(())
    }
}

impl std::fmt::Display for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for snapshot in &self.snapshots {
            write!(f, "{snapshot}")?;
        }
        Ok(())
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
            .dispatch_line("snapshot sysvg/root --name=pre --when=pre-install")
            .unwrap();
        assert_eq!(
            handler.command::<Snapshot>().unwrap().to_string(),
            "snapshot sysvg/root --name=pre --when=pre-install\n"
        );
    }

    #[test]
    fn test_invalid() {
        let mut handler = KickstartHandler::new(Version::latest());
        for bad in [
            "snapshot root --name=pre --when=pre-install",
            "snapshot sysvg/root --name=pre --when=later",
            "snapshot sysvg/root --when=post-install",
        ] {
            assert!(handler.dispatch_line(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_not_available_before_f29() {
        let mut handler = KickstartHandler::new(Version::F23);
        let err = handler
            .dispatch_line("snapshot sysvg/root --name=pre --when=pre-install")
            .unwrap_err();
        assert_eq!(err.category(), crate::ErrorCategory::Parse);
    }
}
