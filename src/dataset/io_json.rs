//! JSON persistence for datasets.
//!
//! This is the form in which a dataset is stored between CLI invocations and
//! handed to the job-submission layer.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use super::model::Dataset;
use crate::error::LhcbDataError;

/// Reads a dataset from a JSON file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn read_dataset_json(path: &Path) -> Result<Dataset, LhcbDataError> {
    let file = File::open(path).map_err(LhcbDataError::Io)?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).map_err(|source| LhcbDataError::DatasetJsonParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes a dataset to a JSON file.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_dataset_json(path: &Path, dataset: &Dataset) -> Result<(), LhcbDataError> {
    let file = File::create(path).map_err(LhcbDataError::Io)?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, dataset).map_err(|source| {
        LhcbDataError::DatasetJsonWrite {
            path: path.to_path_buf(),
            source,
        }
    })?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Reads a dataset from a JSON string.
pub fn from_json_str(json: &str) -> Result<Dataset, serde_json::Error> {
    serde_json::from_str(json)
}

/// Reads a dataset from JSON bytes.
pub fn from_json_slice(bytes: &[u8]) -> Result<Dataset, serde_json::Error> {
    serde_json::from_slice(bytes)
}

/// Writes a dataset to a JSON string.
pub fn to_json_string(dataset: &Dataset) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{DataFile, Persistency};
    use std::collections::BTreeMap;

    fn sample_dataset() -> Dataset {
        let mut fields = serde_json::Map::new();
        fields.insert("RunNumber".into(), serde_json::json!(1234));
        let mut metadata = BTreeMap::new();
        metadata.insert("/lhcb/a.dst".to_string(), fields);

        Dataset::from_files(vec![
            DataFile::logical("/lhcb/a.dst"),
            DataFile::physical("/data/b.root"),
        ])
        .with_depth(2)
        .with_persistency(Persistency::Pool)
        .with_seeded_metadata(metadata)
    }

    #[test]
    fn test_json_roundtrip() {
        let original = sample_dataset();

        let json = to_json_string(&original).expect("serialization failed");
        let restored = from_json_str(&json).expect("deserialization failed");

        assert_eq!(original, restored);
    }

    #[test]
    fn test_json_format() {
        let json = to_json_string(&sample_dataset()).expect("serialization failed");

        assert!(json.contains("\"files\""));
        assert!(json.contains("\"kind\": \"logical\""));
        assert!(json.contains("\"persistency\": \"POOL\""));
        assert!(json.contains("\"state\": \"seeded\""));
    }

    #[test]
    fn minimal_document_uses_defaults() {
        let ds = from_json_str(r#"{"files": [{"kind": "physical", "name": "/p"}]}"#)
            .expect("parse minimal");
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.depth, 0);
        assert!(ds.persistency.is_none());
        assert!(ds.metadata().is_none());
    }
}
