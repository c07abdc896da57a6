//! Datatype string selection by file-name globs.

use glob::{MatchOptions, Pattern};

use crate::config::Config;
use crate::error::LhcbDataError;

/// Whole-name, case-sensitive matching where `*` and `?` also match `/`.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Picks the datatype string for a file name.
///
/// Tags are tried in configuration order and the first tag with a matching
/// pattern wins; names matching nothing get the default string.
#[derive(Clone, Debug)]
pub struct DatatypeMatcher {
    default: String,
    entries: Vec<(String, Vec<Pattern>)>,
}

impl DatatypeMatcher {
    /// Compiles the pattern table of `config`.
    ///
    /// # Errors
    /// Returns [`LhcbDataError::InvalidPattern`] for a malformed glob.
    pub fn from_config(config: &Config) -> Result<Self, LhcbDataError> {
        let mut entries = Vec::with_capacity(config.datatype_string_patterns.len());
        for entry in &config.datatype_string_patterns {
            let compiled = entry
                .patterns
                .iter()
                .map(|pattern| compile_glob(pattern))
                .collect::<Result<Vec<_>, _>>()?;
            entries.push((entry.tag.clone(), compiled));
        }
        Ok(Self {
            default: config.datatype_string_default.clone(),
            entries,
        })
    }

    /// Datatype string for `file_name`.
    pub fn datatype_for(&self, file_name: &str) -> &str {
        self.entries
            .iter()
            .find(|(_, patterns)| patterns.iter().any(|p| glob_matches(p, file_name)))
            .map(|(tag, _)| tag.as_str())
            .unwrap_or(&self.default)
    }
}

/// Compiles a shell-style glob (`*`, `?`, `[seq]`, `[!seq]`).
pub fn compile_glob(pattern: &str) -> Result<Pattern, LhcbDataError> {
    Pattern::new(pattern).map_err(|source| LhcbDataError::InvalidPattern {
        pattern: pattern.to_string(),
        message: source.to_string(),
    })
}

/// Matches `name` as a whole against `pattern`.
pub fn glob_matches(pattern: &Pattern, name: &str) -> bool {
    pattern.matches_with(name, MATCH_OPTIONS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatatypePattern;

    fn matches(pattern: &str, name: &str) -> bool {
        glob_matches(&compile_glob(pattern).expect("compile"), name)
    }

    #[test]
    fn star_and_question_mark() {
        assert!(matches("*.dst", "/lhcb/data/00001.dst"));
        assert!(!matches("*.dst", "/lhcb/data/00001.dst.gz"));
        assert!(matches("file?.raw", "file1.raw"));
        assert!(!matches("file?.raw", "file12.raw"));
    }

    #[test]
    fn literal_characters_match_themselves() {
        assert!(matches("a+b(1).mdf", "a+b(1).mdf"));
        assert!(!matches("*.mdf", "x_mdf"));
    }

    #[test]
    fn character_classes() {
        assert!(matches("run[0-9].raw", "run7.raw"));
        assert!(!matches("run[!0-9].raw", "run7.raw"));
        assert!(matches("run[!0-9].raw", "runX.raw"));
        assert!(matches("[]]x", "]x"));
    }

    #[test]
    fn malformed_glob_is_rejected() {
        let err = compile_glob("a[b").expect_err("unterminated class");
        assert!(matches!(err, LhcbDataError::InvalidPattern { .. }));

        let config = Config {
            datatype_string_patterns: vec![DatatypePattern::new("BAD", ["run[0-"])],
            ..Default::default()
        };
        assert!(DatatypeMatcher::from_config(&config).is_err());
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert!(!matches("*.raw", "FILE.RAW"));
    }

    #[test]
    fn first_matching_tag_wins() {
        let config = Config {
            datatype_string_default: "DEFAULT".into(),
            datatype_string_patterns: vec![
                DatatypePattern::new("MDF", ["*.mdf"]),
                DatatypePattern::new("ANY", ["*"]),
            ],
            ..Default::default()
        };
        let matcher = DatatypeMatcher::from_config(&config).expect("matcher");
        assert_eq!(matcher.datatype_for("/x/run.mdf"), "MDF");
        assert_eq!(matcher.datatype_for("/x/run.dst"), "ANY");
    }

    #[test]
    fn default_when_nothing_matches() {
        let matcher = DatatypeMatcher::from_config(&Config::default()).expect("matcher");
        assert_eq!(
            matcher.datatype_for("/lhcb/file.dst"),
            "TYP='POOL_ROOTTREE' OPT='READ'"
        );
        assert_eq!(
            matcher.datatype_for("/lhcb/file.RAW"),
            "SVC='LHCb::MDFSelector'"
        );
    }
}
