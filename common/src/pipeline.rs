//! Orchestration of the three-stage pipeline: one scout feeding a directory
//! queue, a pool of search workers feeding a results queue, and a pool of
//! copy workers draining it.
//!
//! Termination needs no cancellation signal: the scout dropping its producer
//! handle closes the directory queue, the search workers drain it and drop
//! their results-queue handles, and the copy workers drain what remains.

use anyhow::{anyhow, Context};

use crate::copy;
use crate::handoff::HandoffQueue;
use crate::milestone::{MilestoneLog, WorkerId};
use crate::scout;
use crate::search;

/// Queue capacity used when the caller does not override it.
pub const DEFAULT_QUEUE_DEPTH: usize = 50;

/// Read buffer size used when the caller does not override it.
pub const DEFAULT_READ_BUFFER: usize = 128 * 1024;

#[derive(Debug, Clone)]
pub struct Settings {
    /// File name suffix to match, e.g. `.txt`.
    pub extension: String,
    pub root: std::path::PathBuf,
    pub dest: std::path::PathBuf,
    pub search_workers: usize,
    pub copy_workers: usize,
    /// Capacity of both hand-off queues.
    pub queue_depth: usize,
    /// Buffer size for the streamed file copy.
    pub read_buffer: usize,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Summary {
    pub directories_scouted: usize,
    pub files_found: usize,
    pub files_copied: usize,
    pub bytes_copied: u64,
    pub copy_errors: usize,
}

impl std::ops::Add for Summary {
    type Output = Summary;
    fn add(self, other: Summary) -> Summary {
        Summary {
            directories_scouted: self.directories_scouted + other.directories_scouted,
            files_found: self.files_found + other.files_found,
            files_copied: self.files_copied + other.files_copied,
            bytes_copied: self.bytes_copied + other.bytes_copied,
            copy_errors: self.copy_errors + other.copy_errors,
        }
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "directories scouted: {:>10}\n\
             files found:         {:>10}\n\
             files copied:        {:>10}\n\
             bytes copied:        {:>10}\n\
             copy errors:         {:>10}",
            self.directories_scouted,
            self.files_found,
            self.files_copied,
            bytesize::ByteSize(self.bytes_copied),
            self.copy_errors,
        )
    }
}

fn validate(settings: &Settings) -> anyhow::Result<()> {
    if settings.search_workers == 0 || settings.copy_workers == 0 {
        return Err(anyhow!("search and copy worker counts must be positive"));
    }
    if settings.queue_depth == 0 {
        return Err(anyhow!("queue depth must be positive"));
    }
    if settings.read_buffer == 0 {
        return Err(anyhow!("read buffer size must be positive"));
    }
    // check the root before touching the destination so a bad invocation
    // leaves the filesystem as it was
    let root_metadata = std::fs::metadata(&settings.root)
        .with_context(|| format!("root directory {:?} not found", &settings.root))?;
    if !root_metadata.is_dir() {
        return Err(anyhow!("root path {:?} is not a directory", &settings.root));
    }
    std::fs::create_dir_all(&settings.dest).with_context(|| {
        format!(
            "failed to create destination directory {:?}",
            &settings.dest
        )
    })?;
    Ok(())
}

/// Validate the settings, wire up the two queues, run all workers to
/// completion and return the aggregate summary.
///
/// Per-item I/O failures are handled inside the stages; only configuration
/// errors and a panicked worker surface as `Err`.
pub fn run(settings: &Settings, milestones: Option<&MilestoneLog>) -> anyhow::Result<Summary> {
    validate(settings)?;
    // worker ids exist for milestone attribution only; 0 names the
    // orchestrator itself
    if let Some(log) = milestones {
        log.record(
            0,
            format!(
                "searching for {:?} files under {:?}",
                &settings.extension, &settings.root
            ),
        );
    }
    let directories = HandoffQueue::new(settings.queue_depth);
    let results = HandoffQueue::new(settings.queue_depth);
    let copy_settings = copy::Settings {
        read_buffer: settings.read_buffer,
    };
    std::thread::scope(|scope| {
        let mut next_id: WorkerId = 1;
        // producer handles are registered here, before the consumers of the
        // queue in question spawn, so a consumer can never observe a zero
        // producer count while work is still on its way
        let scout_handle = {
            let id = next_id;
            next_id += 1;
            let producer = directories.producer();
            let root = settings.root.as_path();
            scope.spawn(move || scout::scout(id, root, producer, milestones))
        };
        let mut search_handles = Vec::with_capacity(settings.search_workers);
        for _ in 0..settings.search_workers {
            let id = next_id;
            next_id += 1;
            let producer = results.producer();
            let directories = &directories;
            let extension = settings.extension.as_str();
            search_handles.push(
                scope.spawn(move || search::search(id, extension, directories, producer, milestones)),
            );
        }
        let mut copy_handles = Vec::with_capacity(settings.copy_workers);
        for _ in 0..settings.copy_workers {
            let id = next_id;
            next_id += 1;
            let results = &results;
            let dest = settings.dest.as_path();
            copy_handles.push(scope.spawn(move || {
                copy::copy_worker(id, dest, results, &copy_settings, milestones)
            }));
        }

        let mut summary = scout_handle
            .join()
            .map_err(|_| anyhow!("scout worker panicked"))?;
        for handle in search_handles {
            summary = summary
                + handle
                    .join()
                    .map_err(|_| anyhow!("search worker panicked"))?;
        }
        for handle in copy_handles {
            match handle.join().map_err(|_| anyhow!("copy worker panicked"))? {
                Ok(copied) => summary = summary + copied,
                Err(error) => {
                    tracing::error!("copy worker stopped: {}", &error);
                    summary = summary + error.summary;
                    summary.copy_errors += 1;
                }
            }
        }
        Ok(summary)
    })
}
