use std::{
    fmt::Debug,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};

use log::{debug, trace};
use reqwest::StatusCode;
use url::Url;

use crate::types::{KsLine, KsLineSource};

const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("{location}: {source}")]
    Io {
        location: String,
        source: std::io::Error,
    },

    #[error("{location}: {source}")]
    Http {
        location: String,
        source: reqwest::Error,
    },

    #[error("Invalid URL {location}: {reason}")]
    InvalidUrl { location: String, reason: String },

    #[error("{location}: server returned {status}")]
    Status { location: String, status: StatusCode },
}

impl LoadError {
    /// The target simply does not exist
    pub fn is_not_found(&self) -> bool {
        match self {
            LoadError::Io { source, .. } => source.kind() == ErrorKind::NotFound,
            LoadError::Status { status, .. } => *status == StatusCode::NOT_FOUND,
            LoadError::Http { .. } | LoadError::InvalidUrl { .. } => false,
        }
    }
}

/// Fetches the text behind an `%include` or `%ksappend` location
pub trait Loader: Debug {
    fn load(&self, location: &str) -> Result<String, LoadError>;
}

/// Loader for local paths, `file://` URLs and `http(s)://` URLs
#[derive(Debug, Clone)]
pub struct DefaultLoader {
    timeout: Duration,
}

impl DefaultLoader {
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }

    /// Timeout applied to each HTTP request
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn load_file(&self, location: &str, path: &Path) -> Result<String, LoadError> {
        trace!("Reading {}", path.display());
        std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            location: location.to_string(),
            source,
        })
    }

    fn load_http(&self, location: &str, url: Url) -> Result<String, LoadError> {
        let http_err = |source| LoadError::Http {
            location: location.to_string(),
            source,
        };

        debug!("Fetching {url}");
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(http_err)?;
        let response = client.get(url).send().map_err(http_err)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                location: location.to_string(),
                status,
            });
        }

        response.text().map_err(http_err)
    }
}

impl Default for DefaultLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl Loader for DefaultLoader {
    fn load(&self, location: &str) -> Result<String, LoadError> {
        if !is_url(location) {
            return self.load_file(location, Path::new(location));
        }

        let url = Url::parse(location).map_err(|e| LoadError::InvalidUrl {
            location: location.to_string(),
            reason: e.to_string(),
        })?;

        match url.scheme() {
            "http" | "https" => self.load_http(location, url),
            "file" => {
                let path = url.to_file_path().map_err(|_| LoadError::InvalidUrl {
                    location: location.to_string(),
                    reason: "not a local file path".into(),
                })?;
                self.load_file(location, &path)
            }
            scheme => Err(LoadError::InvalidUrl {
                location: location.to_string(),
                reason: format!("unsupported scheme '{scheme}'"),
            }),
        }
    }
}

fn is_url(location: &str) -> bool {
    location.contains("://")
}

/// Split text into numbered lines, all tagged with `source`
pub fn lines_from_str(text: &str, source: KsLineSource) -> Vec<KsLine> {
    text.lines()
        .enumerate()
        .map(|(i, raw)| KsLine::new(source.clone(), i + 1, raw))
        .collect()
}

/// Resolve the target of an `%include` relative to the file containing it
pub fn resolve_location(includer: &KsLineSource, target: &str) -> String {
    if is_url(target) || Path::new(target).is_absolute() {
        return target.to_string();
    }

    let Some(base) = includer.location() else {
        return target.to_string();
    };

    if is_url(base) {
        return Url::parse(base)
            .and_then(|u| u.join(target))
            .map(|u| u.to_string())
            .unwrap_or_else(|_| target.to_string());
    }

    match Path::new(base).parent() {
        Some(parent) => PathBuf::from(parent).join(target).display().to_string(),
        None => target.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use indoc::indoc;
    use tempfile::NamedTempFile;

    use super::*;

    const TEST_FILE: &str = indoc! {r#"
        # with blank lines

        part / --fstype ext4 --size 1 --grow
        part swap --size 1024

        %include /tmp/include
    "#};

    #[test]
    fn test_lines_from_str() {
        let lines = lines_from_str(TEST_FILE, KsLineSource::InputString);
        assert_eq!(lines.len(), TEST_FILE.lines().count());
        assert_eq!(lines[2].lineno, 3);
        assert_eq!(lines[2].raw, "part / --fstype ext4 --size 1 --grow");
        assert!(lines
            .iter()
            .all(|l| matches!(l.source, KsLineSource::InputString)));
    }

    #[test]
    fn test_load_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(TEST_FILE.as_bytes()).unwrap();
        file.flush().unwrap();

        let loader = DefaultLoader::new();
        let path = file.path().to_str().unwrap();
        assert_eq!(loader.load(path).unwrap(), TEST_FILE);

        let url = Url::from_file_path(file.path()).unwrap();
        assert_eq!(loader.load(url.as_str()).unwrap(), TEST_FILE);
    }

    #[test]
    fn test_load_missing_file() {
        let err = DefaultLoader::new()
            .load("/file/that/definitely/does/not/exist.ks")
            .unwrap_err();
        assert!(err.is_not_found(), "{err}");
    }

    #[test]
    fn test_load_bad_scheme() {
        let err = DefaultLoader::new().load("ftp://example.com/ks.cfg").unwrap_err();
        assert!(matches!(err, LoadError::InvalidUrl { .. }));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_load_http() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/ks/base.ks")
            .with_status(200)
            .with_body("autopart\n")
            .expect(1)
            .create();
        let missing = server.mock("GET", "/ks/missing.ks").with_status(404).create();

        let loader = DefaultLoader::new().with_timeout(Duration::from_secs(5));
        let body = loader.load(&format!("{}/ks/base.ks", server.url())).unwrap();
        assert_eq!(body, "autopart\n");
        mock.assert();

        let err = loader
            .load(&format!("{}/ks/missing.ks", server.url()))
            .unwrap_err();
        assert!(matches!(err, LoadError::Status { .. }));
        assert!(err.is_not_found());
        missing.assert();
    }

    #[test]
    fn test_resolve_location() {
        let root = KsLine::new(KsLineSource::File("/ks/root.ks".into()), 1, "");
        assert_eq!(resolve_location(&root.source, "part.ks"), "/ks/part.ks");
        assert_eq!(resolve_location(&root.source, "/abs/x.ks"), "/abs/x.ks");
        assert_eq!(
            resolve_location(&KsLineSource::InputString, "part.ks"),
            "part.ks"
        );

        let nested = KsLineSource::new_include("http://host/ks/sub/a.ks".into(), &root);
        assert_eq!(
            resolve_location(&nested, "b.ks"),
            "http://host/ks/sub/b.ks"
        );
        assert_eq!(
            resolve_location(&nested, "http://other/c.ks"),
            "http://other/c.ks"
        );
    }
}
