use log::debug;

use crate::{
    errors::KickstartError,
    load::{lines_from_str, Loader},
    types::{KsLine, KsLineSource},
};

/// How to process %ksappend lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreprocessMode {
    /// Drop %ksappend lines without fetching anything
    Skip,
    /// Splice in the fetched content, failing on fetch errors
    Process,
    /// Splice in the fetched content, dropping directives that fail to fetch
    ProcessNoError,
}

impl PreprocessMode {
    pub fn new(process: bool, missing_is_fatal: bool) -> Self {
        match (process, missing_is_fatal) {
            (false, _) => Self::Skip,
            (true, true) => Self::Process,
            (true, false) => Self::ProcessNoError,
        }
    }

    fn missing_is_error(self) -> bool {
        match self {
            Self::Skip | Self::Process => true,
            Self::ProcessNoError => false,
        }
    }
}

/// Replace every `%ksappend <location>` line with the content it points to
///
/// Fetched content is not scanned again.
pub fn preprocess(
    lines: Vec<KsLine>,
    mode: PreprocessMode,
    loader: &dyn Loader,
) -> Result<Vec<KsLine>, KickstartError> {
    let mut pre_processed: Vec<KsLine> = Vec::with_capacity(lines.len());
    for line in lines.into_iter() {
        let raw_line = line.raw.clone();
        let mut words = raw_line.split_whitespace();

        if words.next() != Some("%ksappend") {
            // Preserve empty lines and comments because they can be part of a section
            pre_processed.push(line);
            continue;
        }

        let Some(location) = words.next() else {
            return Err(KickstartError::new_ksappend(line, "Missing file path"));
        };

        if words.next().is_some() {
            return Err(KickstartError::new_ksappend(line, "Too many arguments"));
        }

        if mode == PreprocessMode::Skip {
            debug!("Skipping %ksappend: {}", location);
            continue;
        }

        debug!("Processing %ksappend: {}", location);
        match loader.load(location) {
            Ok(text) => {
                let source = KsLineSource::new_ksappend(location.to_string(), &line);
                let appended = lines_from_str(&text, source);
                debug!("Loaded {} lines from {}", appended.len(), location);
                pre_processed.extend(appended);
            }
            Err(e) if mode.missing_is_error() => {
                return Err(KickstartError::new_load(line, location, e));
            }
            Err(e) => {
                debug!("Dropping %ksappend {}: {}", location, e);
            }
        }
    }

    Ok(pre_processed)
}

/// Flatten the `%ksappend` directives of a kickstart held in memory
pub fn preprocess_from_string(text: &str, loader: &dyn Loader) -> Result<String, KickstartError> {
    let lines = preprocess(
        lines_from_str(text, KsLineSource::InputString),
        PreprocessMode::Process,
        loader,
    )?;
    Ok(join_lines(&lines))
}

/// Flatten the `%ksappend` directives of the kickstart at `location`
pub fn preprocess_kickstart(location: &str, loader: &dyn Loader) -> Result<String, KickstartError> {
    let text = loader
        .load(location)
        .map_err(|e| KickstartError::new_load(KsLine::default(), location, e))?;
    let lines = preprocess(
        lines_from_str(&text, KsLineSource::File(location.to_string())),
        PreprocessMode::Process,
        loader,
    )?;
    Ok(join_lines(&lines))
}

fn join_lines(lines: &[KsLine]) -> String {
    lines.iter().map(|l| format!("{}\n", l.raw)).collect()
}
