use anyhow::{anyhow, Result};
use clap::Parser;
use tracing::instrument;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "rsift",
    version,
    about = "Find files by extension under a directory tree and copy them to a destination",
    long_about = "`rsift` walks ROOT with a scout thread, matches files against EXTENSION with a
pool of search workers and copies every match into DEST with a pool of copy
workers. The stages hand work to each other over bounded queues, so the tool
keeps a steady memory footprint no matter how large the tree is.

EXAMPLE:
    # Collect all .txt files under /data into /tmp/texts, 4 workers per pool,
    # printing a milestone for every directory scouted and file found/copied
    rsift true .txt /data /tmp/texts 4 4"
)]
struct Args {
    // ARGUMENTS
    /// Record milestones and print them after the run (true/false)
    #[arg(
        value_name = "MILESTONES",
        action = clap::ArgAction::Set,
        value_parser = clap::value_parser!(bool)
    )]
    milestones: bool,

    /// File name suffix to match, e.g. ".txt" (exact, case-sensitive)
    #[arg(value_name = "EXTENSION")]
    extension: String,

    /// Root directory to search
    #[arg(value_name = "ROOT")]
    root: std::path::PathBuf,

    /// Destination directory, created if absent
    #[arg(value_name = "DEST")]
    dest: std::path::PathBuf,

    /// Number of search workers
    #[arg(value_name = "SEARCH_WORKERS")]
    search_workers: usize,

    /// Number of copy workers
    #[arg(value_name = "COPY_WORKERS")]
    copy_workers: usize,

    // Progress & output
    /// Print summary at the end
    #[arg(long, help_heading = "Progress & output")]
    summary: bool,

    /// Verbose level: -v INFO / -vv DEBUG / -vvv TRACE (default: ERROR)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, help_heading = "Progress & output")]
    verbose: u8,

    /// Quiet mode, don't report errors
    #[arg(short = 'q', long = "quiet", help_heading = "Progress & output")]
    quiet: bool,

    // Advanced settings
    /// Capacity of the two hand-off queues
    #[arg(
        long,
        default_value_t = common::DEFAULT_QUEUE_DEPTH,
        value_name = "N",
        help_heading = "Advanced settings"
    )]
    queue_depth: usize,

    /// File copy read buffer size
    #[arg(
        long,
        default_value = "128KiB",
        value_name = "SIZE",
        help_heading = "Advanced settings"
    )]
    read_buffer: String,
}

#[instrument]
fn settings(args: &Args) -> Result<common::Settings> {
    let read_buffer = args
        .read_buffer
        .parse::<bytesize::ByteSize>()
        .map_err(|error| anyhow!("invalid --read-buffer {:?}: {}", &args.read_buffer, error))?
        .as_u64() as usize;
    Ok(common::Settings {
        extension: args.extension.clone(),
        root: args.root.clone(),
        dest: args.dest.clone(),
        search_workers: args.search_workers,
        copy_workers: args.copy_workers,
        queue_depth: args.queue_depth,
        read_buffer,
    })
}

fn main() -> Result<()> {
    let start_time = std::time::Instant::now();
    let args = Args::parse();
    let milestones = args.milestones.then(common::MilestoneLog::new);
    let output = common::OutputConfig {
        quiet: args.quiet,
        verbose: args.verbose,
    };
    let summary = common::run(&output, || {
        let settings = settings(&args)?;
        common::pipeline::run(&settings, milestones.as_ref())
    })?;
    if let Some(log) = &milestones {
        for milestone in log.drain() {
            println!("{milestone}");
        }
    }
    if args.summary {
        println!("{summary}");
    }
    println!("finished in {} ms", start_time.elapsed().as_millis());
    Ok(())
}
