use clap::Parser;

use crate::{errors::KickstartError, types::KsLine, version::Version};

use super::{flag, opt, opt_list, opt_some, CommandBase, KickstartCommand, ParseContext};

/// One `user` line
#[derive(Parser, Debug, Clone)]
#[command(name = "user")]
pub struct UserData {
    #[clap(skip)]
    pub line: KsLine,

    #[arg(long, required = true)]
    pub name: String,

    #[arg(long)]
    pub homedir: Option<String>,

    #[arg(long, requires = "password", conflicts_with = "plaintext")]
    pub iscrypted: bool,

    #[arg(long)]
    pub password: Option<String>,

    #[arg(long, requires = "password")]
    pub plaintext: bool,

    #[arg(long)]
    pub lock: bool,

    #[arg(long)]
    pub shell: Option<String>,

    #[arg(long)]
    pub uid: Option<u32>,

    #[arg(long)]
    pub gid: Option<u32>,

    #[arg(long)]
    pub gecos: Option<String>,

    #[arg(long, value_delimiter = ',')]
    pub groups: Vec<String>,
}

impl PartialEq for UserData {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl std::fmt::Display for UserData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let options = [
            opt("name", &self.name),
            opt_some("homedir", &self.homedir),
            flag("iscrypted", self.iscrypted),
            flag("plaintext", self.plaintext),
            opt_some("password", &self.password),
            flag("lock", self.lock),
            opt_some("shell", &self.shell),
            opt_some("uid", &self.uid),
            opt_some("gid", &self.gid),
            opt_some("gecos", &self.gecos),
            opt_list("groups", &self.groups),
        ]
        .concat();
        writeln!(f, "user{options}")
    }
}

/// The `user` command
#[derive(Debug, Default)]
pub struct User {
    base: CommandBase,
    pub users: Vec<UserData>,
}

impl User {
    pub fn boxed(_: Version) -> Box<dyn KickstartCommand> {
        Box::<Self>::default()
    }
}

impl KickstartCommand for User {
    command_boilerplate!();

    fn name(&self) -> &'static str {
        "user"
    }

    fn parse(&mut self, ctx: &mut ParseContext, tokens: Vec<String>) -> Result<(), KickstartError> {
        let mut user: UserData = ctx.parse_args(tokens)?;

        if user.name == "root" {
            return Err(ctx.value_error(
                "user command cannot be used on the root user, use rootpw instead",
            ));
        }

        user.line = ctx.line().clone();
        ctx.push_data(&mut self.users, user, |u| {
            format!("A user with the name {} has already been defined", u.name)
        });
        Ok(())
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for user in &self.users {
            write!(f, "{user}")?;
        }
        Ok(())
    }
}

/// One `group` line
#[derive(Parser, Debug, Clone)]
#[command(name = "group")]
pub struct GroupData {
    #[clap(skip)]
    pub line: KsLine,

    #[arg(long, required = true)]
    pub name: String,

    #[arg(long)]
    pub gid: Option<u32>,
}

impl PartialEq for GroupData {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl std::fmt::Display for GroupData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "group{}{}", opt("name", &self.name), opt_some("gid", &self.gid))
    }
}

/// The `group` command
#[derive(Debug, Default)]
pub struct Group {
    base: CommandBase,
    pub groups: Vec<GroupData>,
}

impl Group {
    pub fn boxed(_: Version) -> Box<dyn KickstartCommand> {
        Box::<Self>::default()
    }
}

impl KickstartCommand for Group {
    command_boilerplate!();

    fn name(&self) -> &'static str {
        "group"
    }

    fn parse(&mut self, ctx: &mut ParseContext, tokens: Vec<String>) -> Result<(), KickstartError> {
        let mut group: GroupData = ctx.parse_args(tokens)?;
        group.line = ctx.line().clone();
        ctx.push_data(&mut self.groups, group, |g| {
            format!("A group with the name {} has already been defined", g.name)
        });
        Ok(())
    }
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for group in &self.groups {
            write!(f, "{group}")?;
        }
        Ok(())
    }
}
