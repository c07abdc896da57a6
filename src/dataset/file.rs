//! File references held by a dataset.
//!
//! A file is either logical (an LFN, resolved through the replica catalog)
//! or physical (a PFN, a direct location). The kind is fixed at construction
//! and the pair renders as a canonical `LFN:<name>` / `PFN:<name>` string,
//! which is the equality key for set combination.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::LhcbDataError;

/// Whether a file reference is logical or physical.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// Logical file name, location independent.
    Logical,
    /// Physical file name, a concrete path or URL.
    Physical,
}

impl FileKind {
    /// Upper-case tag used in canonical names and job options.
    pub fn tag(self) -> &'static str {
        match self {
            FileKind::Logical => "LFN",
            FileKind::Physical => "PFN",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A single file reference.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DataFile {
    kind: FileKind,
    name: String,
}

impl DataFile {
    /// Creates a logical file reference.
    pub fn logical(name: impl Into<String>) -> Self {
        Self {
            kind: FileKind::Logical,
            name: name.into(),
        }
    }

    /// Creates a physical file reference.
    pub fn physical(name: impl Into<String>) -> Self {
        Self {
            kind: FileKind::Physical,
            name: name.into(),
        }
    }

    /// The bare file name, without any kind prefix.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> FileKind {
        self.kind
    }

    #[inline]
    pub fn is_lfn(&self) -> bool {
        self.kind == FileKind::Logical
    }

    #[inline]
    pub fn is_pfn(&self) -> bool {
        self.kind == FileKind::Physical
    }

    /// Canonical `LFN:<name>` / `PFN:<name>` form.
    pub fn full_name(&self) -> String {
        format!("{}:{}", self.kind.tag(), self.name)
    }
}

impl fmt::Debug for DataFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            FileKind::Logical => write!(f, "LogicalFile({:?})", self.name),
            FileKind::Physical => write!(f, "PhysicalFile({:?})", self.name),
        }
    }
}

impl fmt::Display for DataFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.tag(), self.name)
    }
}

/// Parses a prefixed specifier (`lfn:...` or `pfn:...`) into a file reference.
///
/// The prefix is matched case-insensitively, so canonical names such as
/// `LFN:/x` parse back to the reference they were rendered from. The name
/// is taken verbatim, surrounding whitespace included.
///
/// # Errors
/// Returns [`LhcbDataError::InvalidArgument`] when the prefix is missing.
pub fn parse_data_file(spec: &str) -> Result<DataFile, LhcbDataError> {
    match split_prefix(spec) {
        Some((FileKind::Logical, name)) => Ok(DataFile::logical(name)),
        Some((FileKind::Physical, name)) => Ok(DataFile::physical(name)),
        None => Err(LhcbDataError::InvalidArgument(format!(
            "cannot interpret '{}' as a file reference (expected an 'lfn:' or 'pfn:' prefix)",
            spec
        ))),
    }
}

/// Parses a specifier that must be logical, as required for input-sandbox LFN lists.
pub fn parse_lfn_only(spec: &str) -> Result<DataFile, LhcbDataError> {
    let file = parse_data_file(spec)?;
    if file.is_pfn() {
        return Err(LhcbDataError::InvalidArgument(format!(
            "only LFNs are accepted here, got '{}'",
            spec
        )));
    }
    Ok(file)
}

fn split_prefix(spec: &str) -> Option<(FileKind, &str)> {
    let (prefix, rest) = spec.split_at_checked(4)?;
    if prefix.eq_ignore_ascii_case("lfn:") {
        Some((FileKind::Logical, rest))
    } else if prefix.eq_ignore_ascii_case("pfn:") {
        Some((FileKind::Physical, rest))
    } else {
        None
    }
}

/// Input accepted wherever a file can be added to a dataset.
///
/// Call sites take either a ready-made reference or a prefixed string; both
/// go through [`FileSpec::resolve`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FileSpec {
    File(DataFile),
    Text(String),
}

impl FileSpec {
    /// Resolves the specifier into a typed reference.
    pub fn resolve(self) -> Result<DataFile, LhcbDataError> {
        match self {
            FileSpec::File(file) => Ok(file),
            FileSpec::Text(text) => parse_data_file(&text),
        }
    }
}

impl From<DataFile> for FileSpec {
    fn from(file: DataFile) -> Self {
        FileSpec::File(file)
    }
}

impl From<&DataFile> for FileSpec {
    fn from(file: &DataFile) -> Self {
        FileSpec::File(file.clone())
    }
}

impl From<String> for FileSpec {
    fn from(text: String) -> Self {
        FileSpec::Text(text)
    }
}

impl From<&str> for FileSpec {
    fn from(text: &str) -> Self {
        FileSpec::Text(text.to_string())
    }
}

impl From<&String> for FileSpec {
    fn from(text: &String) -> Self {
        FileSpec::Text(text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lfn_and_pfn_prefixes() {
        let lfn = parse_data_file("lfn:/lhcb/data/file.dst").expect("lfn");
        assert!(lfn.is_lfn());
        assert_eq!(lfn.name(), "/lhcb/data/file.dst");

        let pfn = parse_data_file("pfn:/tmp/local.dst").expect("pfn");
        assert!(pfn.is_pfn());
        assert_eq!(pfn.name(), "/tmp/local.dst");
    }

    #[test]
    fn canonical_names_parse_back() {
        let file = DataFile::logical("/x");
        assert_eq!(file.full_name(), "LFN:/x");
        assert_eq!(parse_data_file(&file.full_name()).expect("reparse"), file);

        let file = DataFile::physical("/y");
        assert_eq!(parse_data_file("PFN:/y").expect("reparse"), file);
    }

    #[test]
    fn whitespace_in_names_is_preserved() {
        let file = DataFile::logical("/x ");
        assert_eq!(parse_data_file(&file.full_name()).expect("reparse"), file);
        assert_eq!(parse_data_file("pfn: /y").expect("parse").name(), " /y");
        assert!(parse_data_file(" lfn:/x").is_err());
    }

    #[test]
    fn unprefixed_name_is_rejected() {
        let err = parse_data_file("/no/prefix.dst").expect_err("should fail");
        assert!(matches!(err, LhcbDataError::InvalidArgument(_)));

        assert!(parse_data_file("lf").is_err());
    }

    #[test]
    fn lfn_only_rejects_physical_files() {
        assert!(parse_lfn_only("lfn:/a").is_ok());
        let err = parse_lfn_only("pfn:/a").expect_err("pfn must be rejected");
        assert!(err.to_string().contains("only LFNs"));
    }

    #[test]
    fn specifier_resolution() {
        let from_text: FileSpec = "pfn:/z".into();
        assert_eq!(from_text.resolve().expect("resolve"), DataFile::physical("/z"));

        let from_file: FileSpec = DataFile::logical("/q").into();
        assert_eq!(from_file.resolve().expect("resolve"), DataFile::logical("/q"));
    }

    #[test]
    fn debug_shows_variant() {
        assert_eq!(format!("{:?}", DataFile::logical("/a")), "LogicalFile(\"/a\")");
        assert_eq!(format!("{:?}", DataFile::physical("/b")), "PhysicalFile(\"/b\")");
    }
}
