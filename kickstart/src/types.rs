use serde::Serialize;

/// Represents a line in a kickstart file
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct KsLine {
    /// Origin of this kickstart line
    pub source: KsLineSource,
    /// Line number in the source, starting at 1
    pub lineno: usize,
    /// The raw text of the line
    pub raw: String,
}

impl KsLine {
    pub fn new(source: KsLineSource, lineno: usize, raw: impl Into<String>) -> Self {
        Self {
            source,
            lineno,
            raw: raw.into(),
        }
    }

    pub fn get_id(&self) -> String {
        format!(
            "{}/{}",
            self.source.location().unwrap_or("unknown"),
            self.lineno
        )
    }
}

impl std::fmt::Display for KsLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{} \"{}\"", self.source, self.lineno, self.raw)
    }
}

/// Represents the source of a line in a kickstart file
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub enum KsLineSource {
    #[default]
    Unknown,
    InputString,
    File(String),
    KsAppend(String, Box<KsLine>),
    Include(String, Box<KsLine>),
}

impl KsLineSource {
    pub fn new_ksappend(location: String, line: &KsLine) -> Self {
        Self::KsAppend(location, Box::new(line.clone()))
    }

    pub fn new_include(location: String, line: &KsLine) -> Self {
        Self::Include(location, Box::new(line.clone()))
    }

    /// Path or URL this line was read from, if any
    pub fn location(&self) -> Option<&str> {
        match self {
            KsLineSource::File(location) => Some(location),
            KsLineSource::KsAppend(location, _) => Some(location),
            KsLineSource::Include(location, _) => Some(location),
            KsLineSource::InputString | KsLineSource::Unknown => None,
        }
    }

    /// Locations of every file in the include chain, innermost first
    pub fn include_chain(&self) -> Vec<&str> {
        let mut chain = Vec::new();
        let mut current = self;
        loop {
            if let Some(location) = current.location() {
                chain.push(location);
            }
            match current {
                KsLineSource::Include(_, parent) | KsLineSource::KsAppend(_, parent) => {
                    current = &parent.source;
                }
                _ => break,
            }
        }
        chain
    }

    /// Number of nested `%include` directives that led to this line
    pub fn include_depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self;
        loop {
            match current {
                KsLineSource::Include(_, parent) => {
                    depth += 1;
                    current = &parent.source;
                }
                KsLineSource::KsAppend(_, parent) => current = &parent.source,
                _ => break,
            }
        }
        depth
    }
}

impl std::fmt::Display for KsLineSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KsLineSource::Unknown => write!(f, "Unknown"),
            KsLineSource::InputString => write!(f, "InputString"),
            KsLineSource::File(location) => write!(f, "{}", location),
            KsLineSource::KsAppend(location, line) => {
                write!(f, "{}:{}>ksappend({})", line.source, line.lineno, location)
            }
            KsLineSource::Include(location, line) => {
                write!(f, "{}:{}>include({})", line.source, line.lineno, location)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_include_chain() {
        let root = KsLine::new(KsLineSource::File("/ks/root.ks".into()), 3, "%include a.ks");
        let first = KsLine::new(
            KsLineSource::new_include("/ks/a.ks".into(), &root),
            7,
            "%include b.ks",
        );
        let source = KsLineSource::new_include("/ks/b.ks".into(), &first);

        assert_eq!(
            source.include_chain(),
            vec!["/ks/b.ks", "/ks/a.ks", "/ks/root.ks"]
        );
        assert_eq!(source.include_depth(), 2);
        assert_eq!(root.source.include_depth(), 0);
    }

    #[test]
    fn test_display() {
        let root = KsLine::new(KsLineSource::InputString, 2, "%ksappend /tmp/x");
        let line = KsLine::new(
            KsLineSource::new_ksappend("/tmp/x".into(), &root),
            1,
            "autopart",
        );
        assert_eq!(
            line.to_string(),
            "InputString:2>ksappend(/tmp/x):1 \"autopart\""
        );
        assert_eq!(line.get_id(), "/tmp/x/1");
    }
}
