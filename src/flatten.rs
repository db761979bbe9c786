use std::path::Path;

use anyhow::{Context, Error};
use kickstart::{KickstartHandler, Parser, Version};
use log::info;

/// Parse `input` with includes and `%ksappend` resolved and return the
/// serialized result
pub fn flatten_kickstart(input: &str, version: Version) -> Result<String, Error> {
    let mut parser = Parser::new(KickstartHandler::new(version));
    parser
        .read_kickstart(input, true)
        .with_context(|| format!("Failed to parse {input}"))?;
    Ok(parser.handler().to_string())
}

/// Flatten `input` into `output`, or stdout when no output is given
pub fn flatten(input: &str, output: Option<&Path>, version: Version) -> Result<(), Error> {
    let text = flatten_kickstart(input, version)?;

    match output {
        Some(path) => {
            std::fs::write(path, text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote flattened kickstart to {}", path.display());
        }
        None => print!("{text}"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use indoc::indoc;
    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_flatten_include() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("disk.ks"), "zerombr\nclearpart --all\n").unwrap();
        let root = dir.path().join("root.ks");
        std::fs::write(
            &root,
            indoc! {r#"
                skipx
                %include disk.ks
            "#},
        )
        .unwrap();

        let output = dir.path().join("out.ks");
        flatten(root.to_str().unwrap(), Some(&output), Version::F34).unwrap();

        let text = std::fs::read_to_string(&output).unwrap();
        assert!(text.starts_with("#version=F34\n"));
        assert!(text.contains("skipx\n"));
        assert!(text.contains("zerombr\n"));
        assert!(text.contains("clearpart --all\n"));
        assert!(!text.contains("%include"));
    }

    #[test]
    fn test_flatten_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"definitely-not-a-command\n").unwrap();
        file.flush().unwrap();

        let err = flatten_kickstart(file.path().to_str().unwrap(), Version::F34).unwrap_err();
        assert!(format!("{err:#}").contains("Unknown command"), "{err:#}");
    }

    #[test]
    fn test_flatten_missing_input() {
        assert!(flatten_kickstart("/no/such/kickstart.ks", Version::F34).is_err());
    }
}
