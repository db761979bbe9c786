use clap::{ArgGroup, Parser};

use crate::{errors::KickstartError, types::KsLine, version::Version};

use super::{flag, opt, opt_list, opt_some, CommandBase, KickstartCommand, ParseContext};

/// One `repo` line
#[derive(Parser, Debug, Clone)]
#[command(name = "repo")]
#[clap(group(ArgGroup::new("source").required(true).multiple(false)))]
pub struct RepoData {
    #[clap(skip)]
    pub line: KsLine,

    #[arg(long, required = true)]
    pub name: String,

    #[arg(long, group = "source")]
    pub baseurl: Option<String>,

    #[arg(long, group = "source")]
    pub mirrorlist: Option<String>,

    #[arg(long, group = "source")]
    pub metalink: Option<String>,

    /// Relative priority, lower is preferred
    #[arg(long)]
    pub cost: Option<u32>,

    #[arg(long, value_delimiter = ',')]
    pub excludepkgs: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    pub includepkgs: Vec<String>,

    #[arg(long)]
    pub proxy: Option<String>,

    #[arg(long)]
    pub noverifyssl: bool,

    /// Also configure the repository on the installed system
    #[arg(long)]
    pub install: bool,
}

impl PartialEq for RepoData {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl std::fmt::Display for RepoData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let options = [
            opt("name", &self.name),
            opt_some("baseurl", &self.baseurl),
            opt_some("mirrorlist", &self.mirrorlist),
            opt_some("metalink", &self.metalink),
            opt_some("cost", &self.cost),
            opt_list("excludepkgs", &self.excludepkgs),
            opt_list("includepkgs", &self.includepkgs),
            opt_some("proxy", &self.proxy),
            flag("noverifyssl", self.noverifyssl),
            flag("install", self.install),
        ]
        .concat();
        writeln!(f, "repo{options}")
    }
}

/// The `repo` command
#[derive(Debug, Default)]
pub struct Repo {
    base: CommandBase,
    pub repos: Vec<RepoData>,
}

impl Repo {
    pub fn boxed(_: Version) -> Box<dyn KickstartCommand> {
        Box::<Self>::default()
    }
}

impl KickstartCommand for Repo {
    command_boilerplate!();

    fn name(&self) -> &'static str {
        "repo"
    }

    fn parse(&mut self, ctx: &mut ParseContext, tokens: Vec<String>) -> Result<(), KickstartError> {
        let mut repo: RepoData = ctx.parse_args(tokens)?;
        repo.line = ctx.line().clone();
        ctx.push_data(&mut self.repos, repo, |r| {
            format!("A repo with the name {} has already been defined", r.name)
        });
        Ok(())
    }
}

impl std::fmt::Display for Repo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for repo in &self.repos {
            write!(f, "{repo}")?;
        }
        Ok(())
    }
}
