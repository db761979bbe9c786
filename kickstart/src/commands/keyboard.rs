use clap::Parser;

use crate::{errors::KickstartError, version::Version};

use super::{opt_list, opt_some, quote, CommandBase, KickstartCommand, ParseContext};

#[derive(Parser, Debug)]
#[command(name = "keyboard")]
struct KeyboardArgs {
    keymap: String,
}

#[derive(Parser, Debug)]
#[command(name = "keyboard")]
struct KeyboardLayoutArgs {
    /// Keymap for the virtual console and X
    keymap: Option<String>,

    /// Keymap for the virtual console only
    #[arg(long)]
    vckeymap: Option<String>,

    /// X layouts, e.g. `us,cz (qwerty)`
    #[arg(long, value_delimiter = ',')]
    xlayouts: Vec<String>,

    /// Layout switching options
    #[arg(long, value_delimiter = ',')]
    switch: Vec<String>,
}

/// The `keyboard` command
///
/// Before F18 only a single positional keymap is accepted.
#[derive(Debug, Default)]
pub struct Keyboard {
    base: CommandBase,
    layouts: bool,
    pub keymap: Option<String>,
    pub vckeymap: Option<String>,
    pub xlayouts: Vec<String>,
    pub switch: Vec<String>,
}

impl Keyboard {
    pub fn boxed(_: Version) -> Box<dyn KickstartCommand> {
        Box::<Self>::default()
    }

    pub fn boxed_layouts(_: Version) -> Box<dyn KickstartCommand> {
        Box::new(Self {
            layouts: true,
            ..Default::default()
        })
    }
}

impl KickstartCommand for Keyboard {
    command_boilerplate!();

    fn name(&self) -> &'static str {
        "keyboard"
    }

    fn parse(&mut self, ctx: &mut ParseContext, tokens: Vec<String>) -> Result<(), KickstartError> {
        if !self.layouts {
            let args: KeyboardArgs = ctx.parse_args(tokens)?;
            self.keymap = Some(args.keymap);
            return Ok(());
        }

        let args: KeyboardLayoutArgs = ctx.parse_args(tokens)?;
        if args.keymap.is_none() && args.vckeymap.is_none() && args.xlayouts.is_empty() {
            return Err(ctx.value_error(
                "keyboard requires a keymap, --vckeymap or --xlayouts",
            ));
        }
        self.keymap = args.keymap;
        self.vckeymap = args.vckeymap;
        self.xlayouts = args.xlayouts;
        self.switch = args.switch;
        Ok(())
    }
}

impl std::fmt::Display for Keyboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.seen() {
            return Ok(());
        }
        let keymap = self
            .keymap
            .as_deref()
            .map(|k| format!(" {}", quote(k)))
            .unwrap_or_default();
        writeln!(f, "# Keyboard layouts")?;
        writeln!(
            f,
            "keyboard{}{}{}{}",
            keymap,
            opt_some("vckeymap", &self.vckeymap),
            opt_list("xlayouts", &self.xlayouts),
            opt_list("switch", &self.switch)
        )
    }
}
