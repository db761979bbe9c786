use clap::Parser;

use crate::{errors::KickstartError, version::Version};

use super::{opt_list, opt_some, quote, CommandBase, KickstartCommand, ParseContext};

#[derive(Parser, Debug)]
#[command(name = "lang")]
struct LangArgs {
    /// Language of the installation, e.g. `en_US.UTF-8`
    lang: String,

    /// Additional languages to install support for
    #[arg(long, value_delimiter = ',')]
    addsupport: Vec<String>,
}

/// The `lang` command
#[derive(Debug, Default)]
pub struct Lang {
    base: CommandBase,
    pub lang: Option<String>,
    pub addsupport: Vec<String>,
}

impl Lang {
    pub fn boxed(_: Version) -> Box<dyn KickstartCommand> {
        Box::<Self>::default()
    }
}

impl KickstartCommand for Lang {
    command_boilerplate!();

    fn name(&self) -> &'static str {
        "lang"
    }

    fn parse(&mut self, ctx: &mut ParseContext, tokens: Vec<String>) -> Result<(), KickstartError> {
        let args: LangArgs = ctx.parse_args(tokens)?;
        self.lang = Some(args.lang);
        self.addsupport = args.addsupport;
        Ok(())
    }
}

impl std::fmt::Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(lang) = self.lang.as_deref() {
            writeln!(f, "# System language")?;
            writeln!(f, "lang {}{}", quote(lang), opt_list("addsupport", &self.addsupport))?;
        }
        Ok(())
    }
}

#[derive(Parser, Debug)]
#[command(name = "langsupport")]
struct LangSupportArgs {
    #[arg(long)]
    default: Option<String>,

    languages: Vec<String>,
}

/// The legacy `langsupport` command
#[derive(Debug, Default)]
pub struct LangSupport {
    base: CommandBase,
    pub default: Option<String>,
    pub languages: Vec<String>,
}

impl LangSupport {
    pub fn boxed(_: Version) -> Box<dyn KickstartCommand> {
        Box::<Self>::default()
    }
}

impl KickstartCommand for LangSupport {
    command_boilerplate!();

    fn name(&self) -> &'static str {
        "langsupport"
    }

    fn parse(&mut self, ctx: &mut ParseContext, tokens: Vec<String>) -> Result<(), KickstartError> {
        let args: LangSupportArgs = ctx.parse_args(tokens)?;
        self.default = args.default;
        self.languages = args.languages;
        Ok(())
    }
}

impl std::fmt::Display for LangSupport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.seen() {
            return Ok(());
        }
        write!(f, "langsupport{}", opt_some("default", &self.default))?;
        for lang in &self.languages {
            write!(f, " {}", quote(lang))?;
        }
        writeln!(f)
    }
}
