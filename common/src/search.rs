//! File matching stage: scans directories handed off by the scout and
//! forwards files carrying the wanted extension to the copy pool.

use crate::handoff::{HandoffQueue, Producer};
use crate::milestone::{MilestoneLog, WorkerId};
use crate::pipeline::Summary;

/// True when the file name ends with `suffix`, byte for byte. The match is
/// case-sensitive and not anchored at a dot, mirroring a plain suffix test.
fn name_matches(name: &std::ffi::OsStr, suffix: &str) -> bool {
    name.as_encoded_bytes().ends_with(suffix.as_bytes())
}

/// One search worker: drains the directory queue until it closes, listing
/// only the immediate entries of each directory (recursion is the scout's
/// job) and enqueueing every regular file whose name ends with `extension`.
///
/// A directory that cannot be listed is logged and skipped; the worker moves
/// on to its next dequeue.
pub fn search(
    worker: WorkerId,
    extension: &str,
    directories: &HandoffQueue<std::path::PathBuf>,
    results: Producer<'_, std::path::PathBuf>,
    milestones: Option<&MilestoneLog>,
) -> Summary {
    let mut summary = Summary::default();
    while let Some(dir) = directories.dequeue() {
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(error) => {
                tracing::warn!("cannot list directory {:?}: {}", &dir, &error);
                continue;
            }
        };
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    tracing::warn!("failed reading an entry of {:?}: {}", &dir, &error);
                    continue;
                }
            };
            let is_file = match entry.file_type() {
                Ok(file_type) => file_type.is_file(),
                Err(error) => {
                    tracing::warn!("failed reading file type of {:?}: {}", entry.path(), &error);
                    false
                }
            };
            if is_file && name_matches(&entry.file_name(), extension) {
                if let Some(log) = milestones {
                    log.record(worker, format!("file {:?} found", entry.file_name()));
                }
                summary.files_found += 1;
                results.enqueue(entry.path());
            }
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutils;
    use anyhow::Result;
    use std::collections::HashSet;

    #[test]
    fn suffix_match_is_exact_and_case_sensitive() {
        use std::ffi::OsStr;
        assert!(name_matches(OsStr::new("a.txt"), ".txt"));
        assert!(name_matches(OsStr::new("archive.tar.txt"), ".txt"));
        assert!(!name_matches(OsStr::new("a.TXT"), ".txt"));
        assert!(!name_matches(OsStr::new("a.txt.bak"), ".txt"));
        assert!(!name_matches(OsStr::new("txt"), ".txt"));
    }

    #[test]
    fn only_matching_files_from_listed_directories_are_forwarded() -> Result<()> {
        let tmp_dir = testutils::setup_test_dir()?;
        let root = tmp_dir.join("foo");
        let directories = HandoffQueue::new(8);
        let results = HandoffQueue::new(8);

        {
            let producer = directories.producer();
            producer.enqueue(root.clone());
            producer.enqueue(root.join("bar"));
        }
        // baz is deliberately not enqueued, search must not recurse into it
        let summary = search(2, ".txt", &directories, results.producer(), None);

        let mut seen = HashSet::new();
        while let Some(file) = results.dequeue() {
            assert!(seen.insert(file));
        }
        let expected: HashSet<_> = [
            root.join("0.txt"),
            root.join("bar").join("1.txt"),
            root.join("bar").join("2.txt"),
        ]
        .into_iter()
        .collect();
        assert_eq!(seen, expected);
        assert_eq!(summary.files_found, 3);
        Ok(())
    }

    #[test]
    fn unreadable_directory_is_skipped_not_fatal() -> Result<()> {
        let tmp_dir = testutils::setup_test_dir()?;
        let root = tmp_dir.join("foo");
        let directories = HandoffQueue::new(8);
        let results = HandoffQueue::new(8);

        {
            let producer = directories.producer();
            producer.enqueue(tmp_dir.join("not-a-dir"));
            producer.enqueue(root.join("baz"));
        }
        let summary = search(2, ".txt", &directories, results.producer(), None);

        let mut count = 0;
        while results.dequeue().is_some() {
            count += 1;
        }
        assert_eq!(count, 1); // baz/4.txt
        assert_eq!(summary.files_found, 1);
        Ok(())
    }
}
