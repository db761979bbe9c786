use clap::Parser;

use crate::{errors::KickstartError, version::Version};

use super::{flag, opt, opt_some, CommandBase, KickstartCommand, ParseContext};

#[derive(Parser, Debug)]
#[command(name = "liveimg")]
struct LiveImgArgs {
    /// Location of the image to install from
    #[arg(long, required = true)]
    url: url::Url,

    #[arg(long)]
    proxy: Option<String>,

    #[arg(long)]
    noverifyssl: bool,

    /// sha256 checksum of the image
    #[arg(long)]
    checksum: Option<String>,
}

/// The `liveimg` command
#[derive(Debug, Default)]
pub struct LiveImg {
    base: CommandBase,
    pub url: Option<url::Url>,
    pub proxy: Option<String>,
    pub noverifyssl: bool,
    pub checksum: Option<String>,
}

impl LiveImg {
    pub fn boxed(_: Version) -> Box<dyn KickstartCommand> {
        Box::<Self>::default()
    }
}

impl KickstartCommand for LiveImg {
    command_boilerplate!();

    fn name(&self) -> &'static str {
        "liveimg"
    }

    fn parse(&mut self, ctx: &mut ParseContext, tokens: Vec<String>) -> Result<(), KickstartError> {
        let args: LiveImgArgs = ctx.parse_args(tokens)?;
        self.url = Some(args.url);
        self.proxy = args.proxy;
        self.noverifyssl = args.noverifyssl;
        self.checksum = args.checksum;
        Ok(())
    }
}

impl std::fmt::Display for LiveImg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(url) = &self.url {
            writeln!(
                f,
                "liveimg{}{}{}{}",
                opt("url", url),
                opt_some("proxy", &self.proxy),
                flag("noverifyssl", self.noverifyssl),
                opt_some("checksum", &self.checksum)
            )?;
        }
        Ok(())
    }
}
