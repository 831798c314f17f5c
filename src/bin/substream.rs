//! substream - extract a byte range of a file
//!
//! Opens a window on the input, either by path (reopened directly) or after
//! loading it into memory (`--memory`, which takes the snapshot-copy path), and
//! writes the window's bytes to stdout or a file.

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use substream::{
    ByteRange, FileResource, Locator, LocatorTarget, MemoryResource, OpenOptions, Opener,
};

fn build_cli() -> Command {
    Command::new("substream")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extract a byte range of a file as its own stream")
        .arg_required_else_help(true)
        .arg(
            Arg::new("input")
                .help("Input file")
                .index(1)
                .required_unless_present("locator")
                .conflicts_with("locator"),
        )
        .arg(
            Arg::new("locator")
                .long("locator")
                .help("Window locator, e.g. substream://0:100/path/to/file")
                .value_name("LOCATOR"),
        )
        .arg(
            Arg::new("offset")
                .short('o')
                .long("offset")
                .help("Start of the window in bytes")
                .value_name("BYTES")
                .value_parser(clap::value_parser!(u64))
                .default_value("0"),
        )
        .arg(
            Arg::new("length")
                .short('l')
                .long("length")
                .help("Length of the window in bytes (default: rest of the file)")
                .value_name("BYTES")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .help("Write the window to this file instead of stdout")
                .value_name("FILE"),
        )
        .arg(
            Arg::new("memory")
                .short('m')
                .long("memory")
                .help("Load the input into memory before windowing it")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("stat")
                .long("stat")
                .help("Print the window size instead of its contents")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("allow-seek-end")
                .long("allow-seek-end")
                .help("Accept seeks to exactly the end of the window")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("scheme")
                .long("scheme")
                .help("Locator scheme")
                .value_name("SCHEME"),
        )
        .arg(
            Arg::new("spill-threshold")
                .long("spill-threshold")
                .help("Snapshot copies above this many bytes go to a temp file")
                .value_name("BYTES")
                .value_parser(clap::value_parser!(u64)),
        )
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    let matches = build_cli().get_matches();
    let options = OpenOptions::from_args(&matches);

    let locator = match matches.get_one::<String>("locator") {
        Some(locator) => Locator::parse(locator, &options.scheme)
            .with_context(|| format!("Invalid locator {}", locator))?,
        None => {
            let input = matches
                .get_one::<String>("input")
                .context("Input file is required")?;
            let offset = *matches.get_one::<u64>("offset").unwrap_or(&0);
            let length = match matches.get_one::<u64>("length") {
                Some(length) => *length,
                None => fs::metadata(input)
                    .with_context(|| format!("Failed to stat {}", input))?
                    .len()
                    .saturating_sub(offset),
            };
            Locator {
                range: ByteRange::new(offset, length)?,
                target: LocatorTarget::Path(PathBuf::from(input)),
            }
        }
    };

    let mut window = if matches.get_flag("memory") {
        let path = match &locator.target {
            LocatorTarget::Path(path) => path.clone(),
            _ => anyhow::bail!("--memory needs a path"),
        };
        let data = fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        let mut resource = MemoryResource::new(data);
        let window = Opener::new(options)
            .with_context(&mut resource)
            .open_locator(&locator)?;
        window
    } else if let LocatorTarget::Path(path) = &locator.target {
        let mut resource = FileResource::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        let window = Opener::new(options)
            .with_context(&mut resource)
            .open_locator(&locator)?;
        window
    } else {
        anyhow::bail!("Locator must name a path");
    };

    if matches.get_flag("stat") {
        println!("{}", window.stat().size);
        return Ok(());
    }

    match matches.get_one::<String>("output") {
        Some(output) => {
            let mut file = fs::File::create(output)
                .with_context(|| format!("Failed to create {}", output))?;
            io::copy(&mut window, &mut file).context("Failed to copy window")?;
            file.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            io::copy(&mut window, &mut lock).context("Failed to copy window")?;
            lock.flush()?;
        }
    }

    window.close();
    Ok(())
}
