use clap::error::ErrorKind;
use log::{debug, error, warn};
use serde::Serialize;

use crate::{types::KsLine, version::Version};

/// External facing representation of a parser diagnostic
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct KickstartError {
    pub line: KsLine,
    pub error: KickstartErrorKind,
}

/// External facing representation of a parser diagnostic type
#[derive(Serialize, Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KickstartErrorKind {
    #[error("%ksappend error: {0}")]
    KsAppend(String),
    #[error("Failed to load {location}: {reason}")]
    Load { location: String, reason: String },
    #[error("Mismatched quotes")]
    MismatchedQuotes,
    #[error("Syntax error: {0}")]
    Syntax(String),
    #[error("Include error: {0}")]
    Include(String),
    #[error("Unknown section: {0}")]
    UnknownSection(String),
    #[error("Ignoring unknown section: {0}")]
    IgnoredSection(String),
    #[error("Section {0} does not end with %end")]
    UnterminatedSection(String),
    #[error("Unknown command: \"{0}\"")]
    UnknownCommand(String),
    #[error("Ignoring unknown command: \"{0}\"")]
    IgnoredCommand(String),
    #[error("Command \"{command}\" has been removed as of version {version}")]
    RemovedCommand { command: String, version: Version },
    #[error("Command \"{command}\" is deprecated as of version {version} and has no effect on installation")]
    Deprecated { command: String, version: Version },
    #[error("Value error: {0}")]
    Value(String),
    #[error("Duplicate definition: {0}")]
    Duplicate(String),
    #[error("Unknown version: {0}")]
    UnknownVersion(String),
}

/// Kind of failure, independent of the concrete message
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCategory {
    /// Structural or syntactic problem tied to a line
    Parse,
    /// Arguments were well formed but semantically invalid
    Value,
    /// Requested syntax version does not exist
    Version,
    /// A file or URL could not be fetched
    Io,
    /// Directive is recognized but scheduled for removal
    Deprecation,
    /// An entity was defined more than once
    Duplicate,
    /// Any other non-fatal notice
    Warning,
    /// Directive no longer exists in the target version
    Removed,
}

impl KickstartErrorKind {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::KsAppend(_)
            | Self::Syntax(_)
            | Self::Include(_)
            | Self::UnknownSection(_)
            | Self::UnterminatedSection(_)
            | Self::UnknownCommand(_) => ErrorCategory::Parse,
            Self::Value(_) | Self::MismatchedQuotes => ErrorCategory::Value,
            Self::Load { .. } => ErrorCategory::Io,
            Self::UnknownVersion(_) => ErrorCategory::Version,
            Self::RemovedCommand { .. } => ErrorCategory::Removed,
            Self::Deprecated { .. } => ErrorCategory::Deprecation,
            Self::Duplicate(_) => ErrorCategory::Duplicate,
            Self::IgnoredSection(_) | Self::IgnoredCommand(_) => ErrorCategory::Warning,
        }
    }
}

impl KickstartError {
    pub fn new(line: KsLine, error: KickstartErrorKind) -> Self {
        Self { line, error }
    }

    pub fn log(&self, verbose: bool) {
        if !verbose {
            debug!("{}", self);
        } else if self.is_warning() {
            warn!("{}", self);
        } else {
            error!("{}", self);
        }
    }

    pub fn category(&self) -> ErrorCategory {
        self.error.category()
    }

    pub fn is_warning(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Deprecation | ErrorCategory::Duplicate | ErrorCategory::Warning
        )
    }

    /// Errors that abort parsing even when errors are not fatal
    pub fn is_fatal(&self) -> bool {
        matches!(self.category(), ErrorCategory::Io | ErrorCategory::Version)
            || matches!(self.error, KickstartErrorKind::MismatchedQuotes)
    }

    pub fn new_mismatched_quotes(line: KsLine) -> Self {
        Self::new(line, KickstartErrorKind::MismatchedQuotes)
    }

    pub fn new_syntax(line: KsLine, error: impl Into<String>) -> Self {
        Self::new(line, KickstartErrorKind::Syntax(error.into()))
    }

    pub fn new_ksappend(line: KsLine, error: impl Into<String>) -> Self {
        Self::new(line, KickstartErrorKind::KsAppend(error.into()))
    }

    pub fn new_load(line: KsLine, location: impl Into<String>, reason: impl ToString) -> Self {
        Self::new(
            line,
            KickstartErrorKind::Load {
                location: location.into(),
                reason: reason.to_string(),
            },
        )
    }

    pub fn new_include(line: KsLine, error: impl Into<String>) -> Self {
        Self::new(line, KickstartErrorKind::Include(error.into()))
    }

    pub fn new_unknown_section(line: KsLine, section: impl Into<String>) -> Self {
        Self::new(line, KickstartErrorKind::UnknownSection(section.into()))
    }

    pub fn new_ignored_section(line: KsLine, section: impl Into<String>) -> Self {
        Self::new(line, KickstartErrorKind::IgnoredSection(section.into()))
    }

    pub fn new_unterminated_section(line: KsLine, section: impl Into<String>) -> Self {
        Self::new(line, KickstartErrorKind::UnterminatedSection(section.into()))
    }

    pub fn new_unknown_command(line: KsLine, command: impl Into<String>) -> Self {
        Self::new(line, KickstartErrorKind::UnknownCommand(command.into()))
    }

    pub fn new_ignored_command(line: KsLine, command: impl Into<String>) -> Self {
        Self::new(line, KickstartErrorKind::IgnoredCommand(command.into()))
    }

    pub fn new_removed(line: KsLine, command: impl Into<String>, version: Version) -> Self {
        Self::new(
            line,
            KickstartErrorKind::RemovedCommand {
                command: command.into(),
                version,
            },
        )
    }

    pub fn new_deprecated(line: KsLine, command: impl Into<String>, version: Version) -> Self {
        Self::new(
            line,
            KickstartErrorKind::Deprecated {
                command: command.into(),
                version,
            },
        )
    }

    pub fn new_value(line: KsLine, error: impl Into<String>) -> Self {
        Self::new(line, KickstartErrorKind::Value(error.into()))
    }

    pub fn new_duplicate(line: KsLine, error: impl Into<String>) -> Self {
        Self::new(line, KickstartErrorKind::Duplicate(error.into()))
    }

    pub fn new_unknown_version(version: impl Into<String>) -> Self {
        Self::new(
            KsLine::default(),
            KickstartErrorKind::UnknownVersion(version.into()),
        )
    }

    pub fn from_clap(line: KsLine, mut error: clap::Error) -> Self {
        // Suppress usage info
        error.insert(
            clap::error::ContextKind::Usage,
            clap::error::ContextValue::None,
        );

        // Suppress help info
        error.insert(
            clap::error::ContextKind::Suggested,
            clap::error::ContextValue::None,
        );

        // Get only the first line of the error
        let string = error
            .to_string()
            .replace("For more information, try '--help'.", "")
            .trim()
            .trim_start_matches("error: ")
            .to_owned();

        let kind = match error.kind() {
            ErrorKind::InvalidValue
            | ErrorKind::ValueValidation
            | ErrorKind::ArgumentConflict
            | ErrorKind::MissingRequiredArgument
            | ErrorKind::TooManyValues
            | ErrorKind::TooFewValues
            | ErrorKind::WrongNumberOfValues => KickstartErrorKind::Value(string),
            _ => KickstartErrorKind::Syntax(string),
        };

        Self::new(line, kind)
    }
}

impl std::fmt::Display for KickstartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if matches!(self.line.source, crate::types::KsLineSource::Unknown) && self.line.raw.is_empty()
        {
            return write!(f, "{}", self.error);
        }
        write!(
            f,
            "{} at {}:{}\n    {}",
            self.error, self.line.source, self.line.lineno, self.line.raw
        )
    }
}

impl std::error::Error for KickstartError {}

/// A useful trait to convert any arbitrary Result into a Result<_, KickstartError>
pub trait ToResultKickstartError<T> {
    fn to_result_parser_error(self, line: &KsLine) -> Result<T, KickstartError>;
}

impl<T> ToResultKickstartError<T> for Result<T, clap::Error> {
    fn to_result_parser_error(self, line: &KsLine) -> Result<T, KickstartError> {
        self.map_err(|e| KickstartError::from_clap(line.clone(), e))
    }
}

impl<T> ToResultKickstartError<T> for Result<T, shellwords::MismatchedQuotes> {
    fn to_result_parser_error(self, line: &KsLine) -> Result<T, KickstartError> {
        self.map_err(|_| KickstartError::new_mismatched_quotes(line.clone()))
    }
}

#[derive(Debug)]
pub struct KickstartErrorList(pub Vec<KickstartError>);
impl std::error::Error for KickstartErrorList {}
impl std::fmt::Display for KickstartErrorList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for error in &self.0 {
            writeln!(f, "{error}")?;
        }
        Ok(())
    }
}
