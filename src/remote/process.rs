use std::io::Write;
use std::process::{Command, Stdio};

use crate::error::LhcbDataError;

use super::{RemoteCommands, RemoteRequest, RemoteResult};

/// Runs remote commands through an external bridge program.
///
/// The request is written to the program's stdin as JSON; the program must
/// print a single `{"OK": ..., "Value": ...}` document on stdout. A non-zero
/// exit status counts as a transport failure.
#[derive(Clone, Debug)]
pub struct ProcessRemote {
    program: String,
    args: Vec<String>,
}

impl ProcessRemote {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Builds an executor from a `[program, args...]` command line.
    pub fn from_command_line(command: &[String]) -> Result<Self, LhcbDataError> {
        let (program, args) = command.split_first().ok_or_else(|| {
            LhcbDataError::InvalidOperation(
                "no remote command configured (set 'remote_command' in the config file)"
                    .to_string(),
            )
        })?;
        Ok(Self::new(program.clone(), args.to_vec()))
    }
}

impl RemoteCommands for ProcessRemote {
    fn execute(&self, request: &RemoteRequest) -> Result<RemoteResult, LhcbDataError> {
        let payload = serde_json::to_vec(request).map_err(|source| LhcbDataError::Remote {
            operation: request.name().to_string(),
            message: format!("could not encode request: {source}"),
        })?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // stdin is written while stdout and stderr are drained
        let stdin = child.stdin.take();
        let (output, written) = std::thread::scope(|scope| {
            let writer = scope.spawn(move || -> std::io::Result<()> {
                if let Some(mut stdin) = stdin {
                    stdin.write_all(&payload)?;
                }
                Ok(())
            });
            let output = child.wait_with_output();
            let written = writer.join().unwrap_or_else(|_| {
                Err(std::io::Error::other("stdin writer thread panicked"))
            });
            (output, written)
        });
        let output = output?;
        if !output.status.success() {
            if let Err(err) = written {
                tracing::debug!(error = %err, "bridge exited before reading the full request");
            }
            return Err(LhcbDataError::Remote {
                operation: request.name().to_string(),
                message: format!(
                    "'{}' exited with {}: {}",
                    self.program,
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        serde_json::from_slice(&output.stdout).map_err(|source| LhcbDataError::Remote {
            operation: request.name().to_string(),
            message: format!("unreadable reply from '{}': {}", self.program, source),
        })
    }
}
