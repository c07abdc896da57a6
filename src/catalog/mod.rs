//! Replica listing and XML catalog generation.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;

use crate::config::Config;
use crate::dataset::Dataset;
use crate::error::LhcbDataError;
use crate::remote::{get_result, RemoteCommands, RemoteRequest};

/// Replicas of one LFN: storage element -> PFN.
pub type Replicas = BTreeMap<String, String>;

/// Returns the replicas of every LFN in the dataset.
///
/// Only the `Successful` part of the reply is returned.
pub fn get_replicas(
    dataset: &Dataset,
    remote: &dyn RemoteCommands,
) -> Result<BTreeMap<String, Replicas>, LhcbDataError> {
    let request = RemoteRequest::GetReplicas {
        lfns: dataset.lfns(),
    };
    let value = get_result(remote, &request, "LFC query error")?;

    let successful = match value {
        Value::Object(mut map) => map.remove("Successful").unwrap_or(Value::Null),
        _ => Value::Null,
    };
    if successful.is_null() {
        return Ok(BTreeMap::new());
    }

    serde_json::from_value(successful).map_err(|source| LhcbDataError::Remote {
        operation: "LFC query error".to_string(),
        message: format!("could not get replicas: {source}"),
    })
}

/// Returns the XML catalog for the dataset.
///
/// If the dataset names a catalog slice file, its contents are returned
/// verbatim and no remote call is made. Otherwise the remote layer writes a
/// catalog for the dataset's LFNs (at the dataset's ancestor depth) into a
/// temporary file, whose contents are returned. `site` defaults to
/// [`Config::local_site`].
pub fn get_catalog(
    dataset: &Dataset,
    remote: &dyn RemoteCommands,
    config: &Config,
    site: Option<&str>,
) -> Result<String, LhcbDataError> {
    if let Some(path) = dataset.catalogue_slice_path() {
        tracing::debug!(path = %path.display(), "using pre-fetched catalog slice");
        return Ok(fs::read_to_string(path)?);
    }

    let site = match site {
        Some(site) if !site.is_empty() => site.to_string(),
        _ => config.local_site.clone(),
    };

    let tmp = tempfile::Builder::new()
        .prefix("lhcbdata-catalog-")
        .suffix(".xml")
        .tempfile()?;

    let request = RemoteRequest::GetInputDataCatalog {
        lfns: dataset.lfns(),
        depth: dataset.depth,
        site,
        xml_path: tmp.path().to_path_buf(),
    };
    get_result(remote, &request, "LFN->PFN error")?;

    Ok(fs::read_to_string(tmp.path())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::RemoteResult;
    use serde_json::json;
    use std::cell::RefCell;
    use std::io::Write;

    /// Answers catalog requests by writing a fixed document, and replica
    /// requests with a fixed reply.
    struct FakeGrid {
        requests: RefCell<Vec<RemoteRequest>>,
        replicas: Value,
    }

    impl FakeGrid {
        fn new() -> Self {
            Self {
                requests: RefCell::new(Vec::new()),
                replicas: json!({
                    "Successful": {"/a": {"CERN-USER": "srm://cern/a"}},
                    "Failed": {"/b": "no replicas"}
                }),
            }
        }
    }

    impl RemoteCommands for FakeGrid {
        fn execute(&self, request: &RemoteRequest) -> Result<RemoteResult, LhcbDataError> {
            self.requests.borrow_mut().push(request.clone());
            match request {
                RemoteRequest::GetInputDataCatalog { xml_path, .. } => {
                    fs::write(xml_path, "<POOLFILECATALOG/>")?;
                    Ok(RemoteResult::ok(Value::Null))
                }
                RemoteRequest::GetReplicas { .. } => Ok(RemoteResult::ok(self.replicas.clone())),
                _ => Ok(RemoteResult::failed("unsupported")),
            }
        }
    }

    #[test]
    fn slice_file_is_returned_verbatim() {
        let mut slice = tempfile::NamedTempFile::new().expect("temp file");
        write!(slice, "<catalog>cached</catalog>").expect("write slice");

        let ds = Dataset::from_specs(["lfn:/a"])
            .expect("build")
            .with_xml_catalogue_slice(slice.path());
        let remote = FakeGrid::new();

        let xml = get_catalog(&ds, &remote, &Config::default(), None).expect("catalog");
        assert_eq!(xml, "<catalog>cached</catalog>");
        assert!(remote.requests.borrow().is_empty());
    }

    #[test]
    fn generated_catalog_uses_local_site_and_depth() {
        let ds = Dataset::from_specs(["lfn:/a", "pfn:/p"])
            .expect("build")
            .with_depth(2);
        let config = Config {
            local_site: "LCG.CERN.ch".into(),
            ..Default::default()
        };
        let remote = FakeGrid::new();

        let xml = get_catalog(&ds, &remote, &config, None).expect("catalog");
        assert_eq!(xml, "<POOLFILECATALOG/>");

        let requests = remote.requests.borrow();
        match &requests[0] {
            RemoteRequest::GetInputDataCatalog {
                lfns, depth, site, ..
            } => {
                assert_eq!(lfns, &vec!["/a".to_string()]);
                assert_eq!(*depth, 2);
                assert_eq!(site, "LCG.CERN.ch");
            }
            other => panic!("unexpected request {other:?}"),
        }
    }

    #[test]
    fn explicit_site_wins() {
        let ds = Dataset::from_specs(["lfn:/a"]).expect("build");
        let remote = FakeGrid::new();
        get_catalog(&ds, &remote, &Config::default(), Some("LCG.RAL.uk")).expect("catalog");
        assert!(matches!(
            &remote.requests.borrow()[0],
            RemoteRequest::GetInputDataCatalog { site, .. } if site == "LCG.RAL.uk"
        ));
    }

    #[test]
    fn replicas_keep_successful_only() {
        let ds = Dataset::from_specs(["lfn:/a", "lfn:/b"]).expect("build");
        let replicas = get_replicas(&ds, &FakeGrid::new()).expect("replicas");
        assert_eq!(replicas.len(), 1);
        assert_eq!(replicas["/a"]["CERN-USER"], "srm://cern/a");
    }
}
