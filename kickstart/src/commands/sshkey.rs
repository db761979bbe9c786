use clap::Parser;

use crate::{errors::KickstartError, types::KsLine, version::Version};

use super::{opt, quote, CommandBase, KickstartCommand, ParseContext};

/// One `sshkey` line
#[derive(Parser, Debug, Clone)]
#[command(name = "sshkey")]
pub struct SshKeyData {
    #[clap(skip)]
    pub line: KsLine,

    /// User the key is installed for
    #[arg(long, required = true)]
    pub username: String,

    /// The public key, quoted
    pub key: String,
}

impl PartialEq for SshKeyData {
    fn eq(&self, other: &Self) -> bool {
        self.username == other.username
    }
}

impl std::fmt::Display for SshKeyData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "sshkey{} {}", opt("username", &self.username), quote(&self.key))
    }
}

/// The `sshkey` command
#[derive(Debug, Default)]
pub struct SshKey {
    base: CommandBase,
    pub keys: Vec<SshKeyData>,
}

impl SshKey {
    pub fn boxed(_: Version) -> Box<dyn KickstartCommand> {
        Box::<Self>::default()
    }
}

impl KickstartCommand for SshKey {
    command_boilerplate!();

    fn name(&self) -> &'static str {
        "sshkey"
    }

    fn parse(&mut self, ctx: &mut ParseContext, tokens: Vec<String>) -> Result<(), KickstartError> {
        let mut key: SshKeyData = ctx.parse_args(tokens)?;
        key.line = ctx.line().clone();
        ctx.push_data(&mut self.keys, key, |k| {
            format!("An SSH key for user {} has already been defined", k.username)
        });
        Ok(())
    }
}

impl std::fmt::Display for SshKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for key in &self.keys {
            write!(f, "{key}")?;
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
            .dispatch_line(r#"sshkey --username=root "ssh-ed25519 AAAAC3Nza admin@example""#)
            .unwrap();
        assert_eq!(
            handler.command::<SshKey>().unwrap().to_string(),
            "sshkey --username=root \"ssh-ed25519 AAAAC3Nza admin@example\"\n"
        );
        assert!(handler.dispatch_line("sshkey --username=root").is_err());
    }
}
