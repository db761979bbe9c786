use clap::{ArgGroup, Parser};

use crate::{errors::KickstartError, version::Version};

use super::{flag, opt_some, CommandBase, KickstartCommand, ParseContext};

#[derive(Parser, Debug)]
#[command(name = "url")]
#[clap(group(ArgGroup::new("source").required(true).multiple(false)))]
struct UrlArgs {
    /// Installation tree
    #[arg(long, group = "source")]
    url: Option<::url::Url>,

    #[arg(long, group = "source")]
    mirrorlist: Option<::url::Url>,

    #[arg(long, group = "source")]
    metalink: Option<::url::Url>,

    #[arg(long)]
    proxy: Option<String>,

    #[arg(long)]
    noverifyssl: bool,
}

/// The `url` command: install from a network tree
#[derive(Debug, Default)]
pub struct Url {
    base: CommandBase,
    pub url: Option<::url::Url>,
    pub mirrorlist: Option<::url::Url>,
    pub metalink: Option<::url::Url>,
    pub proxy: Option<String>,
    pub noverifyssl: bool,
}

impl Url {
    pub fn boxed(_: Version) -> Box<dyn KickstartCommand> {
        Box::<Self>::default()
    }
}

impl KickstartCommand for Url {
    command_boilerplate!();

    fn name(&self) -> &'static str {
        "url"
    }

    fn parse(&mut self, ctx: &mut ParseContext, tokens: Vec<String>) -> Result<(), KickstartError> {
        let args: UrlArgs = ctx.parse_args(tokens)?;
        self.url = args.url;
        self.mirrorlist = args.mirrorlist;
        self.metalink = args.metalink;
        self.proxy = args.proxy;
        self.noverifyssl = args.noverifyssl;
        Ok(())
    }
}

impl std::fmt::Display for Url {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.seen() {
            return Ok(());
        }
        writeln!(f, "# Use network installation")?;
        writeln!(
            f,
            "url{}{}{}{}{}",
            opt_some("url", &self.url),
            opt_some("mirrorlist", &self.mirrorlist),
            opt_some("metalink", &self.metalink),
            opt_some("proxy", &self.proxy),
            flag("noverifyssl", self.noverifyssl)
        )
    }
}
