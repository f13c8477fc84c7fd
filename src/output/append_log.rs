// src/output/append_log.rs
//! Durable, line-oriented append logs with a single serialized writer.
//!
//! Workers hold cheap [`LogHandle`] clones and send whole lines over a
//! bounded channel; one writer task owns the file, so lines never
//! interleave. [`AppendLog::close`] waits until every line sent before the
//! last handle was dropped is flushed to disk.

use crate::constants::{LOG_CHANNEL_CAPACITY, LOG_WRITE_BATCH};
use crate::error::AppError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::OpenOptions;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// An open append log and its writer task.
pub struct AppendLog {
    path: Arc<PathBuf>,
    sender: mpsc::Sender<String>,
    writer: JoinHandle<Result<u64, AppError>>,
}

/// A cloneable sender of lines into an [`AppendLog`].
#[derive(Clone)]
pub struct LogHandle {
    path: Arc<PathBuf>,
    sender: mpsc::Sender<String>,
}

impl AppendLog {
    /// Opens `path` for appending and starts its writer.
    ///
    /// With `truncate` the previous contents are discarded; otherwise new
    /// lines land after whatever a previous run left behind.
    pub async fn open(path: impl Into<PathBuf>, truncate: bool) -> Result<Self, AppError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut options = OpenOptions::new();
        options.create(true);
        if truncate {
            options.write(true).truncate(true);
        } else {
            options.append(true);
        }
        let file = options.open(&path).await?;
        log::debug!(
            "Opened append log {} ({})",
            path.display(),
            if truncate { "truncated" } else { "resumed" }
        );

        let (sender, receiver) = mpsc::channel(LOG_CHANNEL_CAPACITY);
        let path = Arc::new(path);
        let writer = tokio::spawn(run_writer(file, receiver, Arc::clone(&path)));

        Ok(Self {
            path,
            sender,
            writer,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A new sender for a worker.
    pub fn handle(&self) -> LogHandle {
        LogHandle {
            path: Arc::clone(&self.path),
            sender: self.sender.clone(),
        }
    }

    /// Stops accepting lines and waits for the writer to flush.
    ///
    /// Outstanding handles keep the writer open, so drop them (join the
    /// workers holding them) first. Returns the number of lines written by
    /// this log since it was opened.
    pub async fn close(self) -> Result<u64, AppError> {
        let Self { path, sender, writer } = self;
        drop(sender);
        let written = writer.await??;
        log::debug!("Closed append log {} ({} lines)", path.display(), written);
        Ok(written)
    }
}

impl LogHandle {
    /// Queues one line; waits only when the writer is behind.
    ///
    /// Embedded line breaks are replaced by spaces so a line stays a line.
    pub async fn append(&self, line: impl Into<String>) -> Result<(), AppError> {
        let mut line = line.into();
        if line.contains(['\n', '\r']) {
            line = line.replace(['\n', '\r'], " ");
        }
        self.sender
            .send(line)
            .await
            .map_err(|_| AppError::LogClosed {
                path: self.path.as_ref().clone(),
            })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

async fn run_writer(
    file: tokio::fs::File,
    mut receiver: mpsc::Receiver<String>,
    path: Arc<PathBuf>,
) -> Result<u64, AppError> {
    let mut out = BufWriter::new(file);
    let mut batch = Vec::with_capacity(LOG_WRITE_BATCH);
    let mut written = 0u64;

    while receiver.recv_many(&mut batch, LOG_WRITE_BATCH).await > 0 {
        for line in batch.drain(..) {
            out.write_all(line.as_bytes()).await?;
            out.write_all(b"\n").await?;
            written += 1;
        }
        out.flush().await?;
        log::trace!("{}: {} lines written", path.display(), written);
    }

    out.flush().await?;
    out.into_inner().sync_all().await?;
    Ok(written)
}

/// Reads a log back, one entry per non-empty line, in file order.
pub async fn read_log_lines(path: impl AsRef<Path>) -> Result<Vec<String>, AppError> {
    let content = tokio::fs::read_to_string(path.as_ref()).await?;
    Ok(content
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
