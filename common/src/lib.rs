//! Internal library for the `rsift` tool.
//!
//! `rsift` harvests files by extension: one scout thread walks a directory
//! tree, a pool of search workers matches files against the wanted suffix,
//! and a pool of copy workers moves the matches into a destination
//! directory. The stages are connected by two bounded [`handoff`] queues
//! whose producer-registration protocol lets the whole pipeline drain and
//! terminate without any cancellation signal.

pub mod copy;
pub mod handoff;
pub mod milestone;
pub mod pipeline;
pub mod scout;
pub mod search;

#[cfg(test)]
pub(crate) mod testutils;

pub use milestone::{Milestone, MilestoneLog, WorkerId};
pub use pipeline::{Settings, Summary, DEFAULT_QUEUE_DEPTH, DEFAULT_READ_BUFFER};

/// Output and logging configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// Suppress error output
    pub quiet: bool,
    /// Verbosity level: 0=ERROR, 1=INFO, 2=DEBUG, 3+=TRACE
    pub verbose: u8,
}

fn log_directive(output: &OutputConfig) -> &'static str {
    if output.quiet {
        return "off";
    }
    match output.verbose {
        0 => "error",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Set up logging per `output` and run `func`, returning its result.
///
/// Logs go to stderr; stdout stays reserved for milestone and summary
/// output. `RUST_LOG` overrides the verbosity flags when set.
pub fn run<F>(output: &OutputConfig, func: F) -> anyhow::Result<pipeline::Summary>
where
    F: FnOnce() -> anyhow::Result<pipeline::Summary>,
{
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_directive(output)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    func()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_log_directives() {
        let quiet = OutputConfig {
            quiet: true,
            verbose: 3,
        };
        assert_eq!(log_directive(&quiet), "off");
        for (verbose, directive) in [(0, "error"), (1, "info"), (2, "debug"), (5, "trace")] {
            let output = OutputConfig {
                quiet: false,
                verbose,
            };
            assert_eq!(log_directive(&output), directive);
        }
    }
}
