//! Bookkeeping metadata for a dataset's LFNs.
//!
//! A dataset built from a bookkeeping path query arrives with partial
//! metadata (for example TCK information) that the per-file metadata call
//! does not return. [`bk_metadata`] fetches the per-file metadata and folds
//! that earlier metadata back in with [`merge_metadata`]; where the two
//! disagree the earlier value is kept and a warning logged.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::dataset::{BkMetadata, Dataset, FileMetadata, MetadataMap};
use crate::error::LhcbDataError;
use crate::remote::{get_result, RemoteCommands, RemoteRequest};

const RUN_NUMBER: &str = "RunNumber";
const RUN_NUMBER_DUPLICATE: &str = "Runnumber";

/// A field whose earlier and fresh values differed.
#[derive(Clone, Debug, PartialEq)]
pub struct MetadataConflict {
    pub lfn: String,
    pub field: String,
    /// Value that was kept.
    pub prior: Value,
    /// Value that was discarded.
    pub fresh: Value,
}

/// Result of [`merge_metadata`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MergeReport {
    pub merged: MetadataMap,
    pub conflicts: Vec<MetadataConflict>,
    /// Freshly fetched files with no earlier metadata; kept as fetched.
    pub incomplete: Vec<String>,
    /// Files with earlier metadata that the fresh fetch did not return.
    pub dropped: Vec<String>,
}

/// Returns the bookkeeping metadata of the dataset, fetching it if needed.
///
/// A resolved cache is returned as is. Otherwise metadata for the current
/// LFNs is fetched; seeded metadata is merged into it and the result cached
/// on the dataset.
///
/// # Errors
/// Returns [`LhcbDataError::Remote`] if the bookkeeping call fails.
pub fn bk_metadata(
    dataset: &mut Dataset,
    remote: &dyn RemoteCommands,
) -> Result<BkMetadata, LhcbDataError> {
    if let Some(cached) = dataset.metadata().filter(|m| m.is_resolved()) {
        debug!("using cached bookkeeping metadata");
        return Ok(cached.clone());
    }

    if dataset.metadata().is_none() {
        info!(
            "a dataset obtained from a bookkeeping path query carries more metadata, such as TCK info"
        );
    }

    let request = RemoteRequest::BkMetadata {
        lfns: dataset.lfns(),
    };
    let value = get_result(remote, &request, "Bookkeeping metadata error")?;

    let Some(fresh) = metadata_from_value(value) else {
        warn!("bookkeeping returned no usable per-file metadata");
        if dataset.metadata().is_none() {
            dataset.set_metadata(BkMetadata::Failed);
        }
        return Ok(dataset.metadata().cloned().unwrap_or(BkMetadata::Failed));
    };

    let merged = match dataset.metadata() {
        Some(BkMetadata::Seeded(prior)) => merge_metadata(prior, fresh).merged,
        _ => fresh,
    };

    let resolved = BkMetadata::Resolved(merged);
    dataset.set_metadata(resolved.clone());
    Ok(resolved)
}

/// Merges earlier metadata into freshly fetched metadata.
///
/// For every fetched file that also has earlier metadata, the earlier fields
/// are laid over the fetched ones, so earlier values win. Fetched files
/// without earlier metadata are kept as fetched; files only present in the
/// earlier map are dropped. A `Runnumber` field equal to `RunNumber` is
/// removed from merged files.
pub fn merge_metadata(prior: &MetadataMap, mut fresh: MetadataMap) -> MergeReport {
    let mut report = MergeReport::default();

    if prior.len() > fresh.len() {
        warn!(
            prior = prior.len(),
            fetched = fresh.len(),
            "more files in the earlier metadata than were fetched; only files in both keep full metadata"
        );
    }
    for lfn in prior.keys().filter(|lfn| !fresh.contains_key(*lfn)) {
        warn!(lfn = %lfn, "bookkeeping returned no metadata for file, dropping its earlier metadata");
        report.dropped.push(lfn.clone());
    }

    for (lfn, fields) in fresh.iter_mut() {
        let Some(old) = prior.get(lfn) else {
            warn!(lfn = %lfn, "incomplete metadata for file, it will not have e.g. TCK info");
            report.incomplete.push(lfn.clone());
            continue;
        };

        for (field, fresh_value) in fields.iter() {
            if let Some(prior_value) = old.get(field) {
                if !values_equal(prior_value, fresh_value) {
                    warn!(
                        lfn = %lfn,
                        field = %field,
                        kept = %prior_value,
                        discarded = %fresh_value,
                        "metadata differs between the earlier query and the bookkeeping fetch, keeping the earlier value"
                    );
                    report.conflicts.push(MetadataConflict {
                        lfn: lfn.clone(),
                        field: field.clone(),
                        prior: prior_value.clone(),
                        fresh: fresh_value.clone(),
                    });
                }
            }
        }

        for (field, value) in old {
            fields.insert(field.clone(), value.clone());
        }
        drop_duplicate_run_number(fields);
    }

    report.merged = fresh;
    report
}

fn metadata_from_value(value: Value) -> Option<MetadataMap> {
    match value {
        Value::Object(_) => serde_json::from_value(value).ok(),
        _ => None,
    }
}

fn drop_duplicate_run_number(fields: &mut FileMetadata) {
    let duplicate = match (fields.get(RUN_NUMBER), fields.get(RUN_NUMBER_DUPLICATE)) {
        (Some(a), Some(b)) => values_equal(a, b),
        _ => false,
    };
    if duplicate {
        fields.remove(RUN_NUMBER_DUPLICATE);
    }
}

/// Equality that treats `5` and `5.0` as the same value. Integers are
/// compared exactly; floats only when either side is one.
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (as_integer(x), as_integer(y)) {
            (Some(x), Some(y)) => x == y,
            _ => match (x.as_f64(), y.as_f64()) {
                (Some(x), Some(y)) => x == y,
                _ => x == y,
            },
        },
        _ => a == b,
    }
}

fn as_integer(n: &serde_json::Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}
