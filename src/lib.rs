//! Command line front-ends for the `kickstart` crate

pub mod cli;
pub mod flatten;
pub mod shell;
pub mod validate;

pub const KSTOOLS_VERSION: &str = env!("CARGO_PKG_VERSION");
