use log::debug;

use crate::{errors::KickstartError, handler::KickstartHandler, types::KsLine, version::Version};

use super::SectionHandler;

/// Raw content of a section that is accepted but not interpreted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NullSectionData {
    pub opener: String,
    pub header: KsLine,
    pub body: Vec<String>,
    pub version: Version,
}

impl std::fmt::Display for NullSectionData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n{}", self.header.raw.trim())?;
        for line in &self.body {
            writeln!(f, "{line}")?;
        }
        if self.version.requires_section_end() {
            writeln!(f, "%end")?;
        }
        Ok(())
    }
}

/// Handler for sections we want to recognize but do nothing with
///
/// The text is preserved so it can be written back unchanged.
#[derive(Debug)]
pub struct NullSection {
    opener: String,
    data: Option<NullSectionData>,
}

impl NullSection {
    pub fn new(opener: impl Into<String>) -> Self {
        Self {
            opener: opener.into(),
            data: None,
        }
    }
}

impl SectionHandler for NullSection {
    fn opener(&self) -> &str {
        &self.opener
    }

    fn all_lines(&self) -> bool {
        true
    }

    fn handle_header(
        &mut self,
        version: Version,
        line: &KsLine,
        _: Vec<String>,
    ) -> Result<(), KickstartError> {
        self.data = Some(NullSectionData {
            opener: self.opener.clone(),
            header: line.clone(),
            body: Vec::new(),
            version,
        });
        Ok(())
    }

    fn handle_line(&mut self, line: &KsLine) {
        if let Some(data) = self.data.as_mut() {
            data.body.push(line.raw.clone());
        }
    }

    fn finalize(&mut self, handler: &mut KickstartHandler) -> Result<(), KickstartError> {
        if let Some(mut data) = self.data.take() {
            while data.body.last().is_some_and(|l| l.trim().is_empty()) {
                data.body.pop();
            }
            debug!(
                "Preserving {} section from {} ({} lines)",
                data.opener,
                data.header.source,
                data.body.len()
            );
            handler.null_sections.push(data);
        }
        Ok(())
    }

    fn new_instance(&self) -> Box<dyn SectionHandler> {
        Self::new(self.opener.clone()).boxed()
    }
}
