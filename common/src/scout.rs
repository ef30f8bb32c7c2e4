//! Directory discovery stage: walks the tree and hands every directory to
//! the search pool.

use crate::handoff::Producer;
use crate::milestone::{MilestoneLog, WorkerId};
use crate::pipeline::Summary;

/// Walk the tree under `root` and enqueue every directory, the root
/// included, for the search pool. The traversal uses an explicit work stack
/// rather than recursion so arbitrarily deep trees cannot exhaust the call
/// stack; visit order stays depth-first.
///
/// A directory that cannot be listed is logged and its subtree skipped; the
/// walk continues with the remaining branches. The producer registration is
/// released when `directories` is dropped, on every exit path.
pub fn scout(
    worker: WorkerId,
    root: &std::path::Path,
    directories: Producer<'_, std::path::PathBuf>,
    milestones: Option<&MilestoneLog>,
) -> Summary {
    let mut summary = Summary::default();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        if let Some(log) = milestones {
            let name = dir.file_name().unwrap_or_else(|| dir.as_os_str());
            log.record(worker, format!("directory {name:?} scouted"));
        }
        summary.directories_scouted += 1;
        match std::fs::read_dir(&dir) {
            Ok(entries) => {
                for entry in entries {
                    let entry = match entry {
                        Ok(entry) => entry,
                        Err(error) => {
                            tracing::warn!("failed reading an entry of {:?}: {}", &dir, &error);
                            continue;
                        }
                    };
                    match entry.file_type() {
                        Ok(file_type) if file_type.is_dir() => pending.push(entry.path()),
                        Ok(_) => {}
                        Err(error) => {
                            tracing::warn!(
                                "failed reading file type of {:?}: {}",
                                entry.path(),
                                &error
                            );
                        }
                    }
                }
            }
            Err(error) => {
                // skip this subtree, keep walking the rest of the tree
                tracing::warn!("cannot list directory {:?}: {}", &dir, &error);
            }
        }
        directories.enqueue(dir);
    }
    summary
}
