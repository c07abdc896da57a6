//! Replication of a dataset's LFNs to a storage element.
//!
//! Replication is best effort. Every LFN is attempted once; failures are
//! logged and queued, and only after the whole first pass has finished is
//! each queued LFN retried exactly once. Files that fail twice are reported
//! and logged but never turn the call into an error.

mod report;

pub use report::ReplicationReport;

use tracing::{info, warn};

use crate::dataset::{DataFile, Dataset};
use crate::error::LhcbDataError;
use crate::remote::{get_result, RemoteCommands, RemoteRequest};

/// Replicates every LFN of `dataset` to `dest_se`.
///
/// `src_se` and `cache` are passed through to the remote layer; empty
/// strings leave the choice to it.
///
/// # Errors
/// Returns [`LhcbDataError::InvalidOperation`] if `dest_se` is empty or the
/// dataset holds no LFNs. Per-file failures never produce an error.
pub fn replicate(
    dataset: &Dataset,
    remote: &dyn RemoteCommands,
    dest_se: &str,
    src_se: &str,
    cache: &str,
) -> Result<ReplicationReport, LhcbDataError> {
    if dest_se.trim().is_empty() {
        return Err(LhcbDataError::InvalidOperation(
            "no destination storage element given for replication".to_string(),
        ));
    }
    if !dataset.has_lfns() {
        return Err(LhcbDataError::InvalidOperation(
            "cannot replicate dataset with no LFNs".to_string(),
        ));
    }

    let mut report = ReplicationReport::new(dest_se);
    let mut retry: Vec<&DataFile> = Vec::new();

    for file in dataset.iter() {
        if file.is_pfn() {
            report.skipped_pfns.push(file.name().to_string());
            continue;
        }
        match replicate_file(remote, file, dest_se, src_se, cache) {
            Ok(()) => report.replicated.push(file.name().to_string()),
            Err(err) => {
                warn!(
                    lfn = %file.name(),
                    error = %err,
                    "replication error (will retry in a bit)"
                );
                retry.push(file);
            }
        }
    }

    for file in retry {
        match replicate_file(remote, file, dest_se, src_se, cache) {
            Ok(()) => report.recovered.push(file.name().to_string()),
            Err(err) => {
                warn!(
                    lfn = %file.name(),
                    error = %err,
                    "second replication attempt failed (will not retry)"
                );
                report.failed.push(file.name().to_string());
            }
        }
    }

    info!(
        dest_se,
        replicated = report.succeeded_count(),
        failed = report.failed.len(),
        "replication finished"
    );
    Ok(report)
}

fn replicate_file(
    remote: &dyn RemoteCommands,
    file: &DataFile,
    dest_se: &str,
    src_se: &str,
    cache: &str,
) -> Result<(), LhcbDataError> {
    let request = RemoteRequest::ReplicateFile {
        lfn: file.name().to_string(),
        dest_se: dest_se.to_string(),
        src_se: src_se.to_string(),
        cache: cache.to_string(),
    };
    get_result(remote, &request, "Replication error").map(|_| ())
}
