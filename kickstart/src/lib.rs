//! Parser, data model and serializer for kickstart files
//!
//! A [`Parser`] reads kickstart text into a [`KickstartHandler`] built for one
//! syntax [`Version`]. The handler can be inspected through typed access to
//! its commands and written back out with `to_string()`.

pub mod commands;
mod errors;
mod handler;
mod load;
mod options;
mod parser;
mod preprocess;
pub mod registry;
pub mod sections;
mod types;
mod version;

// Republish
pub use errors::{ErrorCategory, KickstartError, KickstartErrorKind, KickstartErrorList};
pub use handler::KickstartHandler;
pub use load::{lines_from_str, resolve_location, DefaultLoader, LoadError, Loader};
pub use options::ParserOptions;
pub use parser::Parser;
pub use preprocess::{preprocess, preprocess_from_string, preprocess_kickstart, PreprocessMode};
pub use types::{KsLine, KsLineSource};
pub use version::{UnknownVersionError, Version, DEVEL};

/// Parse kickstart text for `version` with the default options
pub fn parse_string(text: &str, version: Version) -> Result<KickstartHandler, KickstartError> {
    let mut parser = Parser::new(KickstartHandler::new(version));
    parser.read_kickstart_from_string(text, true)?;
    Ok(parser.into_handler())
}

/// Parse a version token such as `F34` or `DEVEL`
pub fn parse_version(token: &str) -> Result<Version, KickstartError> {
    token
        .parse()
        .map_err(|e: UnknownVersionError| KickstartError::new_unknown_version(e.0))
}
