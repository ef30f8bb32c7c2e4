use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use rand::Rng;

#[derive(Debug, Clone)]
struct Dirwidth {
    value: Vec<usize>,
}

impl std::str::FromStr for Dirwidth {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        let value = s
            .split(',')
            .map(|s| s.parse::<usize>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Dirwidth { value })
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "filegen",
    version,
    about = "Generate a sample directory tree for exercising rsift"
)]
struct Args {
    /// Root directory where files are generated
    root: std::path::PathBuf,

    /// Number of sub-directories at each level of the generated tree.
    /// E.g., "3,2" will generate:
    /// |- d1
    ///    |- d1a
    ///    |- d1b
    /// |- d2
    ///    |- d2a
    ///    |- d2b
    /// |- d3
    ///    |- d3a
    ///    |- d3b
    #[arg(verbatim_doc_comment)]
    dirwidth: Dirwidth,

    /// Number of files in each directory
    numfiles: usize,

    /// Size of each file. Accepts suffixes like "1K", "1M", "1G"
    filesize: String,

    /// Extension given to generated files
    #[arg(long, default_value = ".txt", value_name = "EXT")]
    extension: String,

    /// Size of the buffer used to write to each file. Accepts suffixes like "1K", "1M", "1G"
    #[arg(long, default_value = "4K", value_name = "SIZE")]
    bufsize: String,
}

fn write_file(path: &std::path::Path, mut filesize: usize, bufsize: usize) -> Result<()> {
    let mut bytes = vec![0u8; bufsize];
    let mut file = std::fs::File::create(path).context(format!("Error opening {:?}", &path))?;
    let mut rng = rand::thread_rng();
    while filesize > 0 {
        rng.fill(&mut bytes[..]);
        let writesize = std::cmp::min(filesize, bufsize);
        file.write_all(&bytes[..writesize])
            .context(format!("Error writing to {:?}", &path))?;
        filesize -= writesize;
    }
    Ok(())
}

fn filegen(
    root: &std::path::Path,
    dirwidth: &[usize],
    numfiles: usize,
    filesize: usize,
    writebuf: usize,
    extension: &str,
) -> Result<()> {
    let numdirs = *dirwidth.first().unwrap_or(&0);
    // generate directories and recurse into them
    for i in 0..numdirs {
        let path = root.join(format!("dir{i}"));
        std::fs::create_dir(&path).context(format!("Error creating {:?}", &path))?;
        filegen(&path, &dirwidth[1..], numfiles, filesize, writebuf, extension)?;
    }
    // generate files
    for i in 0..numfiles {
        let path = root.join(format!("file{i}{extension}"));
        write_file(&path, filesize, writebuf)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let filesize = args
        .filesize
        .parse::<bytesize::ByteSize>()
        .map_err(anyhow::Error::msg)?
        .as_u64() as usize;
    let writebuf = args
        .bufsize
        .parse::<bytesize::ByteSize>()
        .map_err(anyhow::Error::msg)?
        .as_u64() as usize;
    let root = args.root.join("filegen");
    std::fs::create_dir(&root).context(format!("Error creating {:?}", &root))?;
    filegen(
        &root,
        &args.dirwidth.value,
        args.numfiles,
        filesize,
        writebuf,
        &args.extension,
    )?;
    Ok(())
}
