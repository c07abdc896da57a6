//! The dataset entity.
//!
//! A [`Dataset`] is an ordered list of file references (duplicates allowed,
//! insertion order preserved) plus the settings needed to resolve it on the
//! grid: the ancestor depth for bookkeeping queries, an optional pre-fetched
//! XML catalog slice, the persistency technology and a metadata cache.
//!
//! Mutating the file list always drops cached bookkeeping metadata; new
//! files carry no verified provenance.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::ops::{Bound, RangeBounds};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::file::{DataFile, FileSpec};
use super::metadata::{BkMetadata, MetadataMap};
use crate::error::LhcbDataError;

/// Persistency technology used to read the dataset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Persistency {
    Root,
    Pool,
    /// Anything else; rendered as if no persistency were set.
    Other(String),
}

impl Persistency {
    pub fn as_str(&self) -> &str {
        match self {
            Persistency::Root => "ROOT",
            Persistency::Pool => "POOL",
            Persistency::Other(value) => value,
        }
    }
}

impl FromStr for Persistency {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Persistency::from(s.to_string()))
    }
}

impl From<String> for Persistency {
    fn from(value: String) -> Self {
        match value.as_str() {
            "ROOT" => Persistency::Root,
            "POOL" => Persistency::Pool,
            _ => Persistency::Other(value),
        }
    }
}

impl From<Persistency> for String {
    fn from(value: Persistency) -> Self {
        match value {
            Persistency::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Persistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An LHCb dataset: the input data of a job.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    files: Vec<DataFile>,

    /// Ancestor depth to be queried from the bookkeeping.
    #[serde(default)]
    pub depth: u32,

    /// Use the contents of this file rather than generating a catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xml_catalogue_slice: Option<PathBuf>,

    /// Persistency technology; `None` renders the generic options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistency: Option<Persistency>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<BkMetadata>,
}

impl Dataset {
    /// Creates an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a dataset from already-typed file references.
    pub fn from_files(files: Vec<DataFile>) -> Self {
        Self {
            files,
            ..Default::default()
        }
    }

    /// Creates a dataset from a mix of prefixed strings and file references.
    ///
    /// # Errors
    /// Returns [`LhcbDataError::InvalidArgument`] if any string lacks an
    /// `lfn:`/`pfn:` prefix.
    pub fn from_specs<I, S>(specs: I) -> Result<Self, LhcbDataError>
    where
        I: IntoIterator<Item = S>,
        S: Into<FileSpec>,
    {
        Ok(Self::from_files(resolve_all(specs)?))
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_persistency(mut self, persistency: Persistency) -> Self {
        self.persistency = Some(persistency);
        self
    }

    pub fn with_xml_catalogue_slice(mut self, path: impl Into<PathBuf>) -> Self {
        self.xml_catalogue_slice = Some(path.into());
        self
    }

    /// Attaches partial bookkeeping metadata obtained while building the
    /// dataset; it is merged with a fresh fetch by
    /// [`crate::bookkeeping::bk_metadata`].
    pub fn with_seeded_metadata(mut self, metadata: MetadataMap) -> Self {
        self.metadata = Some(BkMetadata::Seeded(metadata));
        self
    }

    /// Number of files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn files(&self) -> &[DataFile] {
        &self.files
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DataFile> {
        self.files.iter()
    }

    pub fn get(&self, index: usize) -> Option<&DataFile> {
        self.files.get(index)
    }

    /// Returns the file at `index`.
    ///
    /// # Errors
    /// Returns [`LhcbDataError::IndexOutOfRange`] past the end.
    pub fn file(&self, index: usize) -> Result<&DataFile, LhcbDataError> {
        self.files.get(index).ok_or(LhcbDataError::IndexOutOfRange {
            index,
            len: self.files.len(),
        })
    }

    /// Returns a new dataset holding the files in `range`.
    ///
    /// Bounds are clamped to the dataset length. The slice keeps the depth
    /// and catalog slice, but starts with no metadata and no persistency.
    pub fn slice<R: RangeBounds<usize>>(&self, range: R) -> Dataset {
        let len = self.files.len();
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.saturating_add(1),
            Bound::Unbounded => 0,
        }
        .min(len);
        let end = match range.end_bound() {
            Bound::Included(&e) => e.saturating_add(1),
            Bound::Excluded(&e) => e,
            Bound::Unbounded => len,
        }
        .min(len);

        let files = if start < end {
            self.files[start..end].to_vec()
        } else {
            Vec::new()
        };

        Dataset {
            files,
            depth: self.depth,
            xml_catalogue_slice: self.xml_catalogue_slice.clone(),
            ..Default::default()
        }
    }

    /// Appends files. With `unique`, files whose name is already present
    /// (before this call) are skipped.
    ///
    /// The whole batch is resolved before anything is appended, so a bad
    /// specifier leaves the dataset untouched.
    pub fn extend<I, S>(&mut self, specs: I, unique: bool) -> Result<(), LhcbDataError>
    where
        I: IntoIterator<Item = S>,
        S: Into<FileSpec>,
    {
        let incoming = resolve_all(specs)?;

        self.invalidate_metadata();

        let existing: HashSet<String> = self.file_names().into_iter().collect();
        for file in incoming {
            if unique && existing.contains(file.name()) {
                continue;
            }
            self.files.push(file);
        }
        Ok(())
    }

    /// Removes the first reference equal to `file`.
    ///
    /// # Errors
    /// Returns [`LhcbDataError::NotFound`] if the dataset does not hold it.
    pub fn remove_file(&mut self, file: &DataFile) -> Result<DataFile, LhcbDataError> {
        let position = self
            .files
            .iter()
            .position(|candidate| candidate == file)
            .ok_or_else(|| LhcbDataError::NotFound {
                name: file.name().to_string(),
            })?;

        let removed = self.files.remove(position);
        self.invalidate_metadata();
        Ok(removed)
    }

    /// Names of all logical files, in order.
    pub fn lfns(&self) -> Vec<String> {
        self.files
            .iter()
            .filter(|f| f.is_lfn())
            .map(|f| f.name().to_string())
            .collect()
    }

    /// Names of all physical files, in order.
    pub fn pfns(&self) -> Vec<String> {
        self.files
            .iter()
            .filter(|f| f.is_pfn())
            .map(|f| f.name().to_string())
            .collect()
    }

    /// Bare names of all files, in order.
    pub fn file_names(&self) -> Vec<String> {
        self.files.iter().map(|f| f.name().to_string()).collect()
    }

    /// `LFN:`/`PFN:` prefixed names of all files, in order.
    pub fn full_file_names(&self) -> Vec<String> {
        self.files.iter().map(DataFile::full_name).collect()
    }

    pub fn has_lfns(&self) -> bool {
        self.files.iter().any(DataFile::is_lfn)
    }

    /// Cached bookkeeping metadata, if any.
    pub fn metadata(&self) -> Option<&BkMetadata> {
        self.metadata.as_ref()
    }

    pub(crate) fn set_metadata(&mut self, metadata: BkMetadata) {
        self.metadata = Some(metadata);
    }

    /// Path of the pre-fetched catalog slice, if one is configured.
    pub fn catalogue_slice_path(&self) -> Option<&Path> {
        self.xml_catalogue_slice.as_deref()
    }

    fn invalidate_metadata(&mut self) {
        if self.metadata.is_some() {
            tracing::debug!("file list changed, dropping cached bookkeeping metadata");
            self.metadata = None;
        }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a DataFile;
    type IntoIter = std::slice::Iter<'a, DataFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

fn resolve_all<I, S>(specs: I) -> Result<Vec<DataFile>, LhcbDataError>
where
    I: IntoIterator<Item = S>,
    S: Into<FileSpec>,
{
    specs
        .into_iter()
        .map(|spec| spec.into().resolve())
        .collect()
}
