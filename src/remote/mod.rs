//! Remote command execution.
//!
//! Every grid-facing operation (replica listing, replication, catalog
//! generation, bookkeeping queries) goes through a [`RemoteCommands`]
//! implementation. Results come back in the `{"OK": bool, "Value": ...}`
//! envelope; [`get_result`] turns a failed envelope into
//! [`LhcbDataError::Remote`] tagged with the operation that issued it.

mod process;

pub use process::ProcessRemote;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

use crate::error::LhcbDataError;

/// A request sent to the remote command layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum RemoteRequest {
    /// List replicas of the given LFNs.
    GetReplicas { lfns: Vec<String> },
    /// Replicate one LFN to `dest_se`.
    ReplicateFile {
        lfn: String,
        dest_se: String,
        src_se: String,
        cache: String,
    },
    /// Write an XML catalog for `lfns` to `xml_path`.
    GetInputDataCatalog {
        lfns: Vec<String>,
        depth: u32,
        site: String,
        xml_path: PathBuf,
    },
    /// Fetch bookkeeping metadata for `lfns`.
    BkMetadata { lfns: Vec<String> },
}

impl RemoteRequest {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            RemoteRequest::GetReplicas { .. } => "get_replicas",
            RemoteRequest::ReplicateFile { .. } => "replicate_file",
            RemoteRequest::GetInputDataCatalog { .. } => "get_input_data_catalog",
            RemoteRequest::BkMetadata { .. } => "bk_metadata",
        }
    }
}

/// Result envelope returned by the remote layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RemoteResult {
    #[serde(rename = "OK")]
    pub ok: bool,
    #[serde(rename = "Value", alias = "Message", default)]
    pub value: Value,
}

impl RemoteResult {
    pub fn ok(value: Value) -> Self {
        Self { ok: true, value }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            value: Value::String(message.into()),
        }
    }

    /// Human-readable form of a failure payload.
    pub fn message(&self) -> String {
        match &self.value {
            Value::String(s) => s.clone(),
            Value::Null => "no details returned".to_string(),
            other => other.to_string(),
        }
    }
}

/// The remote command executor.
///
/// Calls are synchronous and run to completion; timeouts and
/// authentication are the implementation's business.
pub trait RemoteCommands {
    /// Executes `request`. An `Err` means the command could not be run at
    /// all; a command that ran and failed returns `Ok` with `ok == false`.
    fn execute(&self, request: &RemoteRequest) -> Result<RemoteResult, LhcbDataError>;
}

impl<T: RemoteCommands + ?Sized> RemoteCommands for &T {
    fn execute(&self, request: &RemoteRequest) -> Result<RemoteResult, LhcbDataError> {
        (**self).execute(request)
    }
}

impl<T: RemoteCommands + ?Sized> RemoteCommands for Box<T> {
    fn execute(&self, request: &RemoteRequest) -> Result<RemoteResult, LhcbDataError> {
        (**self).execute(request)
    }
}

/// Executes `request` and returns its payload, or a [`LhcbDataError::Remote`]
/// naming `operation` if the command failed or could not run.
pub fn get_result(
    remote: &dyn RemoteCommands,
    request: &RemoteRequest,
    operation: &str,
) -> Result<Value, LhcbDataError> {
    tracing::debug!(command = request.name(), "issuing remote command");

    let result = remote
        .execute(request)
        .map_err(|source| LhcbDataError::Remote {
            operation: operation.to_string(),
            message: source.to_string(),
        })?;

    if result.ok {
        Ok(result.value)
    } else {
        Err(LhcbDataError::Remote {
            operation: operation.to_string(),
            message: result.message(),
        })
    }
}
