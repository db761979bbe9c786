use clap::Parser;

use crate::{errors::KickstartError, version::Version};

use super::{flag, quote, CommandBase, KickstartCommand, ParseContext};

#[derive(Parser, Debug)]
#[command(name = "rootpw")]
struct RootpwArgs {
    /// States the password provided is already encrypted.
    #[arg(long, requires = "password", conflicts_with = "plaintext")]
    iscrypted: bool,

    /// States the password provided is in plain text. (Default)
    #[arg(long, requires = "password")]
    plaintext: bool,

    /// Locks the root account.
    #[arg(long)]
    lock: bool,

    /// The password to set for the root account.
    #[arg(required_unless_present = "lock")]
    password: Option<String>,
}

/// The `rootpw` command
#[derive(Debug, Default)]
pub struct Rootpw {
    base: CommandBase,
    pub password: Option<String>,
    pub iscrypted: bool,
    pub lock: bool,
}

impl Rootpw {
    pub fn boxed(_: Version) -> Box<dyn KickstartCommand> {
        Box::<Self>::default()
    }
}

impl KickstartCommand for Rootpw {
    command_boilerplate!();

    fn name(&self) -> &'static str {
        "rootpw"
    }

    fn parse(&mut self, ctx: &mut ParseContext, tokens: Vec<String>) -> Result<(), KickstartError> {
        let args: RootpwArgs = ctx.parse_args(tokens)?;
        self.password = args.password;
        self.iscrypted = args.iscrypted;
        self.lock = args.lock;
        Ok(())
    }
}

impl std::fmt::Display for Rootpw {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.seen() {
            return Ok(());
        }
        let password = self
            .password
            .as_deref()
            .map(|p| format!(" {}", quote(p)))
            .unwrap_or_default();
        writeln!(f, "# Root password")?;
        writeln!(
            f,
            "rootpw{}{}{}",
            flag("iscrypted", self.iscrypted),
            flag("lock", self.lock),
            password
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::KickstartHandler;

    #[test]
    fn test_last_occurrence_wins() {
        let mut handler = KickstartHandler::new(Version::latest());
        handler.dispatch_line("rootpw --plaintext hunter2").unwrap();
        handler.dispatch_line("rootpw --iscrypted '$6$x y'").unwrap();

        let cmd = handler.command::<Rootpw>().unwrap();
        assert!(cmd.iscrypted);
        assert_eq!(cmd.to_string(), "# Root password\nrootpw --iscrypted \"$6$x y\"\n");
    }

    #[test]
    fn test_lock() {
        let mut handler = KickstartHandler::new(Version::latest());
        handler.dispatch_line("rootpw --lock").unwrap();
        assert_eq!(
            handler.command::<Rootpw>().unwrap().to_string(),
            "# Root password\nrootpw --lock\n"
        );
        assert!(handler.dispatch_line("rootpw").is_err());
        assert!(handler.dispatch_line("rootpw --iscrypted --plaintext x").is_err());
    }
}
