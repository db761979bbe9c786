use serde::{Deserialize, Serialize};

/// Knobs controlling how strictly a kickstart is parsed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ParserOptions {
    /// Stop at the first error instead of collecting them
    pub errors_are_fatal: bool,

    /// Process `%include` directives; when false they are inert
    pub follow_includes: bool,

    /// Fail when an `%include` target does not exist
    pub missing_include_is_fatal: bool,

    /// Fail on unknown sections instead of keeping them verbatim
    pub unknown_sections_are_fatal: bool,

    /// Fail on unknown commands instead of warning
    pub unknown_commands_are_fatal: bool,

    /// Treat deprecation and duplicate warnings as errors
    pub warnings_are_errors: bool,

    /// Splice in `%ksappend` content before parsing
    pub process_ksappend: bool,

    /// Fail when a `%ksappend` target cannot be fetched
    pub missing_ksappend_is_fatal: bool,

    /// Maximum nesting of `%include` directives
    pub max_include_depth: usize,

    /// Log collected errors at warn/error level instead of debug
    pub verbose_errors: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            errors_are_fatal: true,
            follow_includes: true,
            missing_include_is_fatal: true,
            unknown_sections_are_fatal: true,
            unknown_commands_are_fatal: true,
            warnings_are_errors: false,
            process_ksappend: true,
            missing_ksappend_is_fatal: true,
            max_include_depth: 32,
            verbose_errors: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let options: ParserOptions =
            serde_json::from_str(r#"{"errors-are-fatal": false, "max-include-depth": 4}"#).unwrap();
        assert!(!options.errors_are_fatal);
        assert_eq!(options.max_include_depth, 4);
        assert!(options.follow_includes);
        assert!(!options.warnings_are_errors);
    }

    #[test]
    fn test_serialize_kebab_case() {
        let value = serde_json::to_value(ParserOptions::default()).unwrap();
        assert_eq!(value["missing-include-is-fatal"], true);
        assert_eq!(value["max-include-depth"], 32);
    }
}
