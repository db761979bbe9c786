use std::{any::Any, borrow::Cow, fmt::Debug, fmt::Display};

use clap::Parser;

use crate::{
    errors::{KickstartError, ToResultKickstartError},
    types::KsLine,
    version::Version,
};

/// Implements the accessor methods of [`KickstartCommand`] for a struct with a
/// `base: CommandBase` field
macro_rules! command_boilerplate {
    () => {
        fn base(&self) -> &$crate::commands::CommandBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut $crate::commands::CommandBase {
            &mut self.base
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
            self
        }
    };
}

pub mod autopart;
pub mod bootloader;
pub mod clearpart;
pub mod displaymode;
pub mod eula;
pub mod firewall;
pub mod firstboot;
pub mod ignoredisk;
pub mod keyboard;
pub mod lang;
pub mod liveimg;
pub mod logging;
pub mod logvol;
pub mod method;
pub mod mouse;
pub mod network;
pub mod partition;
pub mod raid;
pub mod reboot;
pub mod repo;
pub mod reqpart;
pub mod rootpw;
pub mod selinux;
pub mod services;
pub mod snapshot;
pub mod sshkey;
pub mod timezone;
pub mod toggle;
pub mod url;
pub mod user;
pub mod volgroup;

/// Serialization order of commands; lower values are written first
pub mod priority {
    pub const BOOTLOADER: i32 = 5;
    pub const DEFAULT: i32 = 10;
    pub const AUTOPART: i32 = 100;
    pub const REQPART: i32 = 100;
    pub const ZEROMBR: i32 = 110;
    pub const CLEARPART: i32 = 120;
    pub const PARTITION: i32 = 130;
    pub const RAID: i32 = 131;
    pub const VOLGROUP: i32 = 132;
    pub const LOGVOL: i32 = 133;
    pub const SNAPSHOT: i32 = 140;
}

/// Builds a command with factory defaults for the given version
pub type CommandFactory = fn(Version) -> Box<dyn KickstartCommand>;

/// State shared by every command
#[derive(Debug, Clone, Default)]
pub struct CommandBase {
    /// The literal directive that triggered the most recent parse
    pub current_cmd: String,
    /// Line of the most recent occurrence
    pub line: KsLine,
    /// Whether the directive appeared in the input at all
    pub seen: bool,
}

/// Trait implemented by every directive family
///
/// One instance lives in the handler per family. `parse()` is called once
/// per occurrence of any of the directive names bound to it and either
/// updates the instance itself or appends a new data object.
/// `Display` renders the accumulated state back into kickstart syntax.
pub trait KickstartCommand: Display + Debug + Any {
    /// Canonical directive name
    fn name(&self) -> &'static str;

    fn write_priority(&self) -> i32 {
        priority::DEFAULT
    }

    fn base(&self) -> &CommandBase;

    fn base_mut(&mut self) -> &mut CommandBase;

    /// Parse one occurrence; `tokens[0]` is the directive name
    fn parse(&mut self, ctx: &mut ParseContext, tokens: Vec<String>)
        -> Result<(), KickstartError>;

    /// Canonical names of directive families this one cannot be combined with
    fn conflicts(&self) -> &'static [&'static str] {
        &[]
    }

    fn seen(&self) -> bool {
        self.base().seen
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Per-dispatch context handed to [`KickstartCommand::parse`]
#[derive(Debug)]
pub struct ParseContext {
    version: Version,
    line: KsLine,
    warnings: Vec<KickstartError>,
}

impl ParseContext {
    pub fn new(version: Version, line: KsLine) -> Self {
        Self {
            version,
            line,
            warnings: Vec::new(),
        }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn line(&self) -> &KsLine {
        &self.line
    }

    /// Run the option parser of a command over its tokens
    pub fn parse_args<T: Parser>(&self, tokens: Vec<String>) -> Result<T, KickstartError> {
        T::try_parse_from(tokens).to_result_parser_error(&self.line)
    }

    pub fn value_error(&self, message: impl Into<String>) -> KickstartError {
        KickstartError::new_value(self.line.clone(), message)
    }

    pub fn warn(&mut self, warning: KickstartError) {
        self.warnings.push(warning);
    }

    pub fn into_warnings(self) -> Vec<KickstartError> {
        self.warnings
    }

    /// Append a data object, warning if an equal one already exists
    ///
    /// Both objects are kept.
    pub fn push_data<T: PartialEq>(
        &mut self,
        list: &mut Vec<T>,
        item: T,
        describe: impl FnOnce(&T) -> String,
    ) {
        if list.contains(&item) {
            let message = describe(&item);
            self.warnings
                .push(KickstartError::new_duplicate(self.line.clone(), message));
        }
        list.push(item);
    }
}

/// Quote a value so it tokenizes back to itself
pub fn quote(value: &str) -> Cow<'_, str> {
    let plain = !value.is_empty()
        && !value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '\\' | '#' | '`'));
    if plain {
        Cow::Borrowed(value)
    } else {
        Cow::Owned(format!(
            "\"{}\"",
            value.replace('\\', "\\\\").replace('"', "\\\"")
        ))
    }
}

/// Render `--name=value` with the value quoted when needed
pub(crate) fn opt(name: &str, value: impl Display) -> String {
    format!(" --{}={}", name, quote(&value.to_string()))
}

/// Render `--name=a,b,c`, or nothing for an empty list
pub(crate) fn opt_list(name: &str, values: &[String]) -> String {
    if values.is_empty() {
        String::new()
    } else {
        opt(name, values.join(","))
    }
}

/// Render `--name=value` when the value is set
pub(crate) fn opt_some<T: Display>(name: &str, value: &Option<T>) -> String {
    value.as_ref().map(|v| opt(name, v)).unwrap_or_default()
}

/// Render `--name` when the flag is set
pub(crate) fn flag(name: &str, set: bool) -> String {
    if set {
        format!(" --{name}")
    } else {
        String::new()
    }
}

/// Accepts the usual kickstart spellings of a boolean
pub(crate) fn parse_bool(s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "on" | "yes" | "true" => Ok(true),
        "0" | "off" | "no" | "false" => Ok(false),
        _ => Err(format!("invalid boolean value: {s}")),
    }
}
