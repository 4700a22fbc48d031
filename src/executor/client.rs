//! Async client for communicating with the report executor process.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::{oneshot, Mutex};
use tracing::{debug, warn};

use super::error::{ExecutorError, ExecutorResult};
use super::protocol::{ErrorInfo, RequestEnvelope, ResponseEnvelope};
use crate::config::Settings;

/// Default timeout for requests (30 seconds).
const DEFAULT_TIMEOUT_SECS: u64 = 30;

type PendingMap = Arc<Mutex<HashMap<String, oneshot::Sender<ResponseEnvelope>>>>;

/// Async client for the report executor.
///
/// The client spawns the executor as a child process and communicates via
/// NDJSON (newline-delimited JSON) over stdin/stdout. Each request has a
/// unique ID for correlation with responses, enabling concurrent requests.
///
/// # Example
///
/// ```ignore
/// use quill::executor::{ExecutorClient, protocol::*};
///
/// let client = ExecutorClient::spawn("./report-executor").await?;
///
/// let response: PreviewRowsResponse = client.request(
///     methods::PREVIEW_ROWS,
///     PreviewRowsParams { ... }
/// ).await?;
/// ```
pub struct ExecutorClient {
    /// Writer for sending requests to executor stdin.
    stdin: Arc<Mutex<BufWriter<ChildStdin>>>,

    /// Map of pending request IDs to response channels.
    pending: PendingMap,

    /// Handle to the executor child process.
    _child: Child,

    /// Background reader; fails pending requests once stdout closes.
    _reader_task: tokio::task::JoinHandle<()>,

    /// Request timeout duration.
    timeout: Duration,
}

impl ExecutorClient {
    /// Spawn a new executor process with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the executor process cannot be spawned.
    pub async fn spawn<P: AsRef<Path>>(executor_path: P) -> ExecutorResult<Self> {
        Self::spawn_with_args_and_timeout(
            executor_path,
            &[],
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
        .await
    }

    /// Spawn the executor described by the settings.
    ///
    /// The configured path wins; otherwise a few conventional locations are
    /// searched.
    pub async fn spawn_with_settings(settings: &Settings) -> ExecutorResult<Self> {
        let path = Self::resolve_executor_path(settings)?;
        Self::spawn_with_args_and_timeout(
            &path,
            &settings.executor.args,
            Duration::from_secs(settings.executor.timeout_secs),
        )
        .await
    }

    /// Resolve the executor binary path from settings.
    fn resolve_executor_path(settings: &Settings) -> ExecutorResult<PathBuf> {
        if let Some(path) = settings.executor_path() {
            return Ok(path);
        }

        let candidates = ["report-executor", "./report-executor", "./bin/report-executor"];
        for candidate in candidates {
            let path = PathBuf::from(candidate);
            if path.exists() {
                return Ok(path);
            }
        }

        Err(ExecutorError::SpawnFailed(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Executor binary not found. Set executor.path in config",
        )))
    }

    /// Spawn an executor with arguments and a custom timeout.
    pub async fn spawn_with_args_and_timeout<P: AsRef<Path>>(
        executor_path: P,
        args: &[String],
        timeout: Duration,
    ) -> ExecutorResult<Self> {
        let mut child = Command::new(executor_path.as_ref())
            .args(args)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(ExecutorError::SpawnFailed)?;

        let stdin = child.stdin.take().ok_or_else(|| {
            ExecutorError::SpawnFailed(std::io::Error::other("stdin not captured"))
        })?;
        let stdout = child.stdout.take().ok_or_else(|| {
            ExecutorError::SpawnFailed(std::io::Error::other("stdout not captured"))
        })?;

        debug!(path = %executor_path.as_ref().display(), "spawned report executor");

        let stdin = Arc::new(Mutex::new(BufWriter::new(stdin)));
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));

        let reader_task = Self::spawn_reader_task(stdout, pending.clone());

        Ok(Self {
            stdin,
            pending,
            _child: child,
            _reader_task: reader_task,
            timeout,
        })
    }

    /// Spawn the background task that reads responses from the executor.
    fn spawn_reader_task(
        stdout: ChildStdout,
        pending: PendingMap,
    ) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut reader = BufReader::new(stdout);
            let mut line = String::new();

            loop {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) => break,
                    Ok(_) => match serde_json::from_str::<ResponseEnvelope>(&line) {
                        Ok(resp) => {
                            let mut pending = pending.lock().await;
                            if let Some(tx) = pending.remove(&resp.id) {
                                let _ = tx.send(resp);
                            }
                        }
                        Err(e) => {
                            warn!(error = %e, "executor: failed to parse response");
                        }
                    },
                    Err(e) => {
                        warn!(error = %e, "executor: read error");
                        break;
                    }
                }
            }

            // Executor exited: fail every request still waiting
            let mut pending = pending.lock().await;
            for (id, tx) in pending.drain() {
                let error_response = ResponseEnvelope {
                    id,
                    success: false,
                    result: None,
                    error: Some(ErrorInfo {
                        code: "EXECUTOR_EXITED".to_string(),
                        message: "Executor process exited unexpectedly".to_string(),
                    }),
                };
                let _ = tx.send(error_response);
            }
        })
    }

    /// Send a request to the executor and wait for a response.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Serialization fails
    /// - Writing to the executor fails
    /// - The request times out
    /// - The executor returns an error response
    /// - Deserialization of the response fails
    pub async fn request<P, R>(&self, method: &str, params: P) -> ExecutorResult<R>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let id = uuid::Uuid::new_v4().to_string();

        let request = RequestEnvelope {
            id: id.clone(),
            method: method.to_string(),
            params: serde_json::to_value(params).map_err(ExecutorError::SerializeFailed)?,
        };

        let (tx, rx) = oneshot::channel();
        {
            let mut pending = self.pending.lock().await;
            pending.insert(id.clone(), tx);
        }

        {
            let mut stdin = self.stdin.lock().await;
            let line =
                serde_json::to_string(&request).map_err(ExecutorError::SerializeFailed)? + "\n";
            stdin
                .write_all(line.as_bytes())
                .await
                .map_err(ExecutorError::WriteFailed)?;
            stdin.flush().await.map_err(ExecutorError::WriteFailed)?;
        }

        debug!(%method, %id, "executor request sent");

        let response = match tokio::time::timeout(self.timeout, rx).await {
            Ok(Ok(resp)) => resp,
            Ok(Err(_)) => return Err(ExecutorError::ChannelClosed),
            Err(_) => {
                // Drop the pending slot so a late response is discarded
                let mut pending = self.pending.lock().await;
                pending.remove(&id);
                return Err(ExecutorError::Timeout(self.timeout.as_secs()));
            }
        };

        if response.success {
            let result = response.result.unwrap_or(serde_json::Value::Null);
            serde_json::from_value(result).map_err(ExecutorError::DeserializeFailed)
        } else {
            let error = response.error.unwrap_or_else(|| ErrorInfo {
                code: "UNKNOWN".to_string(),
                message: "Unknown error".to_string(),
            });
            Err(Self::classify_error(&error.code, &error.message))
        }
    }

    /// Classify an executor error into a more specific error type.
    fn classify_error(code: &str, message: &str) -> ExecutorError {
        match code {
            "NOT_FOUND" => ExecutorError::NotFound(message.to_string()),
            "INVALID_REQUEST" => ExecutorError::InvalidRequest(message.to_string()),
            "METHOD_NOT_FOUND" => ExecutorError::MethodNotFound(message.to_string()),
            "EXECUTOR_EXITED" => ExecutorError::ExecutorExited,
            _ => ExecutorError::remote(code, message),
        }
    }

}
