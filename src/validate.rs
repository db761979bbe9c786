use anyhow::{Context, Error};
use kickstart::{KickstartError, KickstartErrorList, KickstartHandler, Parser, Version};
use log::{debug, info};
use serde_json::json;

/// Everything found while checking one kickstart
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<KickstartError>,
    pub warnings: Vec<KickstartError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn to_json(&self, input: &str, version: Version) -> serde_json::Value {
        json!({
            "input": input,
            "version": version,
            "valid": self.is_valid(),
            "errors": self.errors.iter().map(diagnostic_json).collect::<Vec<_>>(),
            "warnings": self.warnings.iter().map(diagnostic_json).collect::<Vec<_>>(),
        })
    }
}

fn diagnostic_json(error: &KickstartError) -> serde_json::Value {
    json!({
        "category": error.category(),
        "message": error.error.to_string(),
        "source": error.line.source.to_string(),
        "line": error.line.lineno,
        "text": error.line.raw,
    })
}

/// Parse `input` and gather its diagnostics
///
/// With `first_error` parsing stops at the first problem, otherwise every
/// recoverable error is collected.
pub fn check(input: &str, version: Version, first_error: bool) -> ValidationReport {
    let mut parser = Parser::new(KickstartHandler::new(version)).errors_are_fatal(first_error);

    let result = parser.read_kickstart(input, true);
    let mut report = ValidationReport {
        warnings: parser.warnings().to_vec(),
        ..Default::default()
    };
    if let Err(KickstartErrorList(errors)) = parser.collected_errors() {
        report.errors = errors;
    }
    if let Err(e) = result {
        debug!("Parsing stopped: {e}");
        report.errors.push(e);
    }

    info!(
        "Checked {input}: {} error(s), {} warning(s)",
        report.errors.len(),
        report.warnings.len()
    );
    report
}

/// Print the known syntax versions, oldest first
pub fn list_versions() {
    for version in Version::all() {
        println!("{version}");
    }
}

/// Check `input` and print the report, returning whether it is valid
pub fn validate(input: &str, version: Version, first_error: bool, as_json: bool) -> Result<bool, Error> {
    let report = check(input, version, first_error);

    if as_json {
        let text = serde_json::to_string_pretty(&report.to_json(input, version))
            .context("Failed to serialize report")?;
        println!("{text}");
    } else {
        for warning in &report.warnings {
            println!("warning: {warning}");
        }
        for error in &report.errors {
            println!("error: {error}");
        }
        if report.is_valid() {
            println!("{input}: valid for {version}");
        }
    }

    Ok(report.is_valid())
}
