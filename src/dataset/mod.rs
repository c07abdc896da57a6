//! Dataset model: file references and the dataset that holds them.
//!
//! # Example
//!
//! ```
//! use lhcbdata::dataset::{DataFile, Dataset};
//!
//! let ds = Dataset::from_specs(["lfn:/some/lfn.file", "pfn:/some/pfn.file"]).unwrap();
//! assert_eq!(ds.len(), 2);
//! assert_eq!(ds.get(0), Some(&DataFile::logical("/some/lfn.file")));
//! assert_eq!(ds.full_file_names(), vec!["LFN:/some/lfn.file", "PFN:/some/pfn.file"]);
//! ```

mod file;
pub mod io_json;
mod metadata;
mod model;

pub use file::{parse_data_file, parse_lfn_only, DataFile, FileKind, FileSpec};
pub use metadata::{BkMetadata, FileMetadata, MetadataMap};
pub use model::{Dataset, Persistency};
