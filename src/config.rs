//! Configuration for dataset operations.
//!
//! Settings come from a YAML file (all keys optional) with environment
//! overrides applied on top:
//!
//! ```yaml
//! local_site: LCG.CERN.ch
//! datatype_string_default: "TYP='POOL_ROOTTREE' OPT='READ'"
//! datatype_string_patterns:
//!   "SVC='LHCb::MDFSelector'": ["*.raw", "*.RAW", "*.mdf", "*.MDF"]
//! remote_command: ["lhcb-dirac-bridge", "--json"]
//! ```
//!
//! The order of `datatype_string_patterns` is significant: the first tag
//! with a matching pattern wins.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::LhcbDataError;

/// Environment variable overriding [`Config::local_site`].
pub const LOCAL_SITE_ENV: &str = "LHCBDATA_LOCAL_SITE";

/// A datatype tag and the glob patterns that select it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatatypePattern {
    pub tag: String,
    pub patterns: Vec<String>,
}

impl DatatypePattern {
    pub fn new<I, S>(tag: impl Into<String>, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tag: tag.into(),
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }
}

/// Dataset configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site used for catalog generation when none is given.
    pub local_site: String,

    /// Datatype string used when no pattern matches a file name.
    pub datatype_string_default: String,

    /// Ordered datatype tags with their file-name globs.
    #[serde(with = "ordered_patterns")]
    pub datatype_string_patterns: Vec<DatatypePattern>,

    /// Program and arguments of the remote command bridge.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub remote_command: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            local_site: String::new(),
            datatype_string_default: "TYP='POOL_ROOTTREE' OPT='READ'".to_string(),
            datatype_string_patterns: vec![DatatypePattern::new(
                "SVC='LHCb::MDFSelector'",
                ["*.raw", "*.RAW", "*.mdf", "*.MDF"],
            )],
            remote_command: Vec::new(),
        }
    }
}

impl Config {
    /// Reads a YAML configuration file and applies environment overrides.
    pub fn load(path: &Path) -> Result<Self, LhcbDataError> {
        let text = fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&text).map_err(|source| LhcbDataError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config.with_env_overrides())
    }

    /// Loads `path` if given, otherwise the defaults; environment overrides
    /// apply either way.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, LhcbDataError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default().with_env_overrides()),
        }
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(site) = std::env::var(LOCAL_SITE_ENV) {
            if !site.trim().is_empty() {
                tracing::debug!(site = %site, "local site taken from {}", LOCAL_SITE_ENV);
                self.local_site = site;
            }
        }
        self
    }
}

/// (De)serializes the pattern table as a YAML/JSON mapping, keeping key order.
mod ordered_patterns {
    use super::DatatypePattern;
    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S>(value: &[DatatypePattern], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(value.len()))?;
        for entry in value {
            map.serialize_entry(&entry.tag, &entry.patterns)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<DatatypePattern>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PatternVisitor;

        impl<'de> Visitor<'de> for PatternVisitor {
            type Value = Vec<DatatypePattern>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping from datatype string to a list of glob patterns")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut out = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((tag, patterns)) = access.next_entry::<String, Vec<String>>()? {
                    out.push(DatatypePattern { tag, patterns });
                }
                Ok(out)
            }
        }

        deserializer.deserialize_map(PatternVisitor)
    }
}
