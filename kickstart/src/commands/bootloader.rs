use clap::{Parser, ValueEnum};
use strum_macros::Display;

use crate::{errors::KickstartError, version::Version};

use super::{flag, opt_list, opt_some, priority, CommandBase, KickstartCommand, ParseContext};

#[derive(Parser, Debug)]
#[command(name = "bootloader")]
struct BootloaderArgs {
    /// Extra kernel command line arguments
    #[arg(long)]
    append: Option<String>,

    #[arg(long)]
    location: Option<BootloaderLocation>,

    /// Bootloader password
    #[arg(long, alias = "md5pass")]
    password: Option<String>,

    #[arg(long, requires = "password")]
    iscrypted: bool,

    /// Seconds to wait before booting the default entry
    #[arg(long)]
    timeout: Option<u32>,

    /// Order in which drives are tried by the firmware
    #[arg(long, value_delimiter = ',')]
    driveorder: Vec<String>,

    /// Drive the bootloader is installed to
    #[arg(long = "boot-drive")]
    boot_drive: Option<String>,

    /// Do not install a bootloader at all
    #[arg(long, conflicts_with = "location")]
    disabled: bool,

    /// Keep the firmware boot order untouched
    #[arg(long)]
    leavebootorder: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum BootloaderLocation {
    Mbr,
    Partition,
    None,
    Boot,
}

/// The `bootloader` command
#[derive(Debug, Default)]
pub struct Bootloader {
    base: CommandBase,
    pub append: Option<String>,
    pub location: Option<BootloaderLocation>,
    pub password: Option<String>,
    pub iscrypted: bool,
    pub timeout: Option<u32>,
    pub driveorder: Vec<String>,
    pub boot_drive: Option<String>,
    pub disabled: bool,
    pub leavebootorder: bool,
}

impl Bootloader {
    pub fn boxed(_: Version) -> Box<dyn KickstartCommand> {
        Box::<Self>::default()
    }
}

impl KickstartCommand for Bootloader {
    command_boilerplate!();

    fn name(&self) -> &'static str {
        "bootloader"
    }

    fn write_priority(&self) -> i32 {
        priority::BOOTLOADER
    }

    fn parse(&mut self, ctx: &mut ParseContext, tokens: Vec<String>) -> Result<(), KickstartError> {
        let args: BootloaderArgs = ctx.parse_args(tokens)?;

        if args.append.is_some() {
            self.append = args.append;
        }
        if args.location.is_some() {
            self.location = args.location;
        }
        if args.password.is_some() {
            self.password = args.password;
            self.iscrypted = args.iscrypted;
        }
        if args.timeout.is_some() {
            self.timeout = args.timeout;
        }
        if !args.driveorder.is_empty() {
            self.driveorder = args.driveorder;
        }
        if args.boot_drive.is_some() {
            self.boot_drive = args.boot_drive;
        }
        self.disabled = args.disabled;
        self.leavebootorder = args.leavebootorder;
        Ok(())
    }
}

impl std::fmt::Display for Bootloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.seen() {
            return Ok(());
        }
        let options = [
            opt_some("append", &self.append),
            opt_some("location", &self.location),
            opt_some("password", &self.password),
            flag("iscrypted", self.iscrypted),
            opt_some("timeout", &self.timeout),
            opt_list("driveorder", &self.driveorder),
            opt_some("boot-drive", &self.boot_drive),
            flag("disabled", self.disabled),
            flag("leavebootorder", self.leavebootorder),
        ]
        .concat();
        writeln!(f, "# System bootloader configuration")?;
        writeln!(f, "bootloader{options}")
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
            .dispatch_line(r#"bootloader --location=mbr --append="console=ttyS0 quiet" --timeout=5"#)
            .unwrap();

        let cmd = handler.command::<Bootloader>().unwrap();
        assert_eq!(cmd.location, Some(BootloaderLocation::Mbr));
        assert_eq!(cmd.append.as_deref(), Some("console=ttyS0 quiet"));
        assert_eq!(
            cmd.to_string(),
            "# System bootloader configuration\nbootloader --append=\"console=ttyS0 quiet\" --location=mbr --timeout=5\n"
        );
    }

    #[test]
    fn test_invalid() {
        let mut handler = KickstartHandler::new(Version::latest());
        assert!(handler.dispatch_line("bootloader --location=floppy").is_err());
        assert!(handler.dispatch_line("bootloader --iscrypted").is_err());
        assert!(handler
            .dispatch_line("bootloader --disabled --location=mbr")
            .is_err());
    }
}
