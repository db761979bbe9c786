use clap::Parser;

use crate::{errors::KickstartError, types::KsLine, version::Version};

use super::{flag, opt_some, priority, CommandBase, KickstartCommand, ParseContext};

/// One `volgroup` line
#[derive(Parser, Debug, Clone)]
#[command(name = "volgroup")]
pub struct VolGroupData {
    #[clap(skip)]
    pub line: KsLine,

    /// Name of the volume group
    pub vgname: String,

    /// Physical volumes, e.g. `pv.01 pv.02`
    pub physvols: Vec<String>,

    /// Physical extent size in KiB
    #[arg(long)]
    pub pesize: Option<u64>,

    /// Space to leave free in the group, in MiB
    #[arg(long = "reserved-space", conflicts_with = "reserved_percent")]
    pub reserved_space: Option<u64>,

    /// Percentage of the group to leave free
    #[arg(long = "reserved-percent", value_parser = clap::value_parser!(u8).range(1..100))]
    pub reserved_percent: Option<u8>,

    #[arg(long)]
    pub useexisting: bool,

    #[arg(long, requires = "useexisting")]
    pub noformat: bool,
}

impl PartialEq for VolGroupData {
    fn eq(&self, other: &Self) -> bool {
        self.vgname == other.vgname
    }
}

impl std::fmt::Display for VolGroupData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let options = [
            opt_some("pesize", &self.pesize),
            opt_some("reserved-space", &self.reserved_space),
            opt_some("reserved-percent", &self.reserved_percent),
            flag("useexisting", self.useexisting),
            flag("noformat", self.noformat),
        ]
        .concat();
        write!(f, "volgroup {}{}", super::quote(&self.vgname), options)?;
        for pv in &self.physvols {
            write!(f, " {pv}")?;
        }
        writeln!(f)
    }
}

/// The `volgroup` command
#[derive(Debug, Default)]
pub struct VolGroup {
    base: CommandBase,
    pub groups: Vec<VolGroupData>,
}

impl VolGroup {
    pub fn boxed(_: Version) -> Box<dyn KickstartCommand> {
        Box::<Self>::default()
    }
}

impl KickstartCommand for VolGroup {
    command_boilerplate!();

    fn name(&self) -> &'static str {
        "volgroup"
    }

    fn write_priority(&self) -> i32 {
        priority::VOLGROUP
    }

    fn parse(&mut self, ctx: &mut ParseContext, tokens: Vec<String>) -> Result<(), KickstartError> {
        let mut vg: VolGroupData = ctx.parse_args(tokens)?;

        if vg.physvols.is_empty() && !vg.useexisting {
            return Err(ctx.value_error(format!(
                "Volume group {} defined without any physical volumes",
                vg.vgname
            )));
        }

        vg.line = ctx.line().clone();
        ctx.push_data(&mut self.groups, vg, |vg| {
            format!("A volume group with the name {} has already been defined", vg.vgname)
        });
        Ok(())
    }
}

impl std::fmt::Display for VolGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for vg in &self.groups {
            write!(f, "{vg}")?;
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
            .dispatch_line("volgroup sysvg --pesize=4096 pv.01 pv.02")
            .unwrap();
        let warnings = handler.dispatch_line("volgroup sysvg pv.03").unwrap();
        assert_eq!(warnings.len(), 1);

        let cmd = handler.command::<VolGroup>().unwrap();
        assert_eq!(cmd.groups[0].physvols, vec!["pv.01", "pv.02"]);
        assert_eq!(
            cmd.to_string(),
            "volgroup sysvg --pesize=4096 pv.01 pv.02\nvolgroup sysvg pv.03\n"
        );
    }

    #[test]
    fn test_invalid() {
        let mut handler = KickstartHandler::new(Version::latest());
        assert!(handler.dispatch_line("volgroup sysvg").is_err());
        assert!(handler
            .dispatch_line("volgroup sysvg --reserved-percent=100 pv.01")
            .is_err());
        handler.dispatch_line("volgroup sysvg --useexisting").unwrap();
    }
}
