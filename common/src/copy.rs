//! File transfer stage: drains the results queue and copies each file into
//! the destination directory, preserving the base name.

use std::io::{Read, Write};

use anyhow::Context;
use tracing::instrument;

use crate::handoff::HandoffQueue;
use crate::milestone::{MilestoneLog, WorkerId};
use crate::pipeline::Summary;

/// Error type for the copy stage that preserves the worker's summary even on
/// failure, so partial progress still shows up in the aggregate.
#[derive(Debug, thiserror::Error)]
#[error("{source:#}")]
pub struct Error {
    #[source]
    pub source: anyhow::Error,
    pub summary: Summary,
}

impl Error {
    #[must_use]
    pub fn new(source: anyhow::Error, summary: Summary) -> Self {
        Error { source, summary }
    }
}

#[derive(Debug, Copy, Clone)]
pub struct Settings {
    /// Buffer size for the streamed read/write loop.
    pub read_buffer: usize,
}

/// Copy one file byte for byte, returning the number of bytes written.
#[instrument]
pub fn copy_file(
    src: &std::path::Path,
    dst: &std::path::Path,
    read_buffer: usize,
) -> anyhow::Result<u64> {
    let mut reader =
        std::fs::File::open(src).with_context(|| format!("failed to open {:?} for reading", &src))?;
    let mut writer =
        std::fs::File::create(dst).with_context(|| format!("failed to create {:?}", &dst))?;
    let mut buffer = vec![0u8; read_buffer];
    let mut copied = 0u64;
    loop {
        let count = reader
            .read(&mut buffer)
            .with_context(|| format!("failed reading from {:?}", &src))?;
        if count == 0 {
            break;
        }
        writer
            .write_all(&buffer[..count])
            .with_context(|| format!("failed writing to {:?}", &dst))?;
        copied += count as u64;
    }
    Ok(copied)
}

/// One copy worker: drains the file queue until it closes. A failed copy
/// ends this worker's loop only; the rest of the pool keeps draining. The
/// error carries the summary accumulated so far.
pub fn copy_worker(
    worker: WorkerId,
    dest: &std::path::Path,
    files: &HandoffQueue<std::path::PathBuf>,
    settings: &Settings,
    milestones: Option<&MilestoneLog>,
) -> Result<Summary, Error> {
    let mut summary = Summary::default();
    while let Some(src) = files.dequeue() {
        let Some(name) = src.file_name() else {
            // queue items come from directory entries, so this cannot
            // normally happen; don't let a stray path kill the worker
            tracing::warn!("skipping path without a file name: {:?}", &src);
            continue;
        };
        let dst = dest.join(name);
        match copy_file(&src, &dst, settings.read_buffer) {
            Ok(bytes) => {
                if let Some(log) = milestones {
                    log.record(worker, format!("file {name:?} copied"));
                }
                summary.files_copied += 1;
                summary.bytes_copied += bytes;
            }
            Err(error) => {
                return Err(Error::new(
                    error.context(format!("failed copying {:?} to {:?}", &src, &dst)),
                    summary,
                ));
            }
        }
    }
    Ok(summary)
}
