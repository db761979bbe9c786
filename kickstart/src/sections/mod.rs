use std::{collections::BTreeMap, fmt::Debug};

use crate::{errors::KickstartError, handler::KickstartHandler, types::KsLine, version::Version};

pub mod null;
pub mod packages;
pub mod script;

use null::NullSection;
use packages::PackageSection;
use script::{ScriptSection, ScriptType};

/// Registry of the sections known to one syntax version
#[derive(Debug)]
pub struct SectionManager {
    handlers: BTreeMap<String, Box<dyn SectionHandler>>,
}

impl SectionManager {
    pub fn for_version(version: Version) -> Self {
        let mut handlers = vec![
            ScriptSection::new(ScriptType::Pre).boxed(),
            ScriptSection::new(ScriptType::Post).boxed(),
            PackageSection::default().boxed(),
        ];

        if version >= Version::F8 {
            handlers.push(ScriptSection::new(ScriptType::Traceback).boxed());
        }

        if version >= Version::F23 {
            handlers.push(ScriptSection::new(ScriptType::PreInstall).boxed());
            handlers.push(NullSection::new("%addon").boxed());
            handlers.push(NullSection::new("%anaconda").boxed());
        }

        if version >= Version::F29 {
            handlers.push(ScriptSection::new(ScriptType::OnError).boxed());
        }

        Self {
            handlers: handlers
                .into_iter()
                .map(|h| (h.opener().to_string(), h))
                .collect(),
        }
    }

    /// Register a handler, replacing any previous one with the same opener
    pub fn register(&mut self, handler: Box<dyn SectionHandler>) {
        self.handlers.insert(handler.opener().to_string(), handler);
    }

    /// A fresh handler for one occurrence of the section
    pub fn get(&self, opener: &str) -> Option<Box<dyn SectionHandler>> {
        self.handlers.get(opener).map(|h| h.new_instance())
    }

    /// Check if a section is known
    pub fn is_known_section(&self, opener: &str) -> bool {
        self.handlers.contains_key(opener)
    }

    /// All known openers, sorted
    pub fn openers(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(|k| k.as_str())
    }
}

/// Trait to be implemented by all section handlers
///
/// The parser asks the manager for a fresh instance per occurrence, feeds it
/// the header tokens and then the body one line at a time, and finally lets
/// it store its result in the handler.
pub trait SectionHandler: Debug {
    /// The verbatim opener for this section
    fn opener(&self) -> &str;

    /// Whether blank and comment lines are part of the body
    fn all_lines(&self) -> bool {
        false
    }

    /// Parse the header; `tokens[0]` is the opener
    fn handle_header(
        &mut self,
        version: Version,
        line: &KsLine,
        tokens: Vec<String>,
    ) -> Result<(), KickstartError>;

    /// Accumulate one body line
    fn handle_line(&mut self, line: &KsLine);

    /// Store the finished section in the handler
    fn finalize(&mut self, handler: &mut KickstartHandler) -> Result<(), KickstartError>;

    /// A handler of the same kind with no state
    fn new_instance(&self) -> Box<dyn SectionHandler>;

    /// Opener without the %
    fn bare_opener(&self) -> &str {
        self.opener()
            .strip_prefix('%')
            .unwrap_or(self.opener())
    }

    /// Box this handler
    fn boxed(self) -> Box<dyn SectionHandler>
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_version() {
        let fc3 = SectionManager::for_version(Version::FC3);
        assert_eq!(
            fc3.openers().collect::<Vec<_>>(),
            vec!["%packages", "%post", "%pre"]
        );

        let f8 = SectionManager::for_version(Version::F8);
        assert!(f8.is_known_section("%traceback"));
        assert!(!f8.is_known_section("%onerror"));

        let latest = SectionManager::for_version(Version::latest());
        for opener in [
            "%pre",
            "%pre-install",
            "%post",
            "%traceback",
            "%onerror",
            "%packages",
            "%addon",
            "%anaconda",
        ] {
            assert!(latest.is_known_section(opener), "{opener}");
        }
    }

    #[test]
    fn test_register() {
        let mut manager = SectionManager::for_version(Version::FC3);
        manager.register(NullSection::new("%custom").boxed());
        let section = manager.get("%custom").unwrap();
        assert_eq!(section.bare_opener(), "custom");
        assert!(section.all_lines());
    }
}
