//! Command line definitions for the two tools, plus logger setup.
use std::path::PathBuf;
use std::process::exit;

use clap::Parser;
use log::{info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

/// Suffix appended to the input name when no output file is given.
pub const COMPRESSED_SUFFIX: &str = ".compr";

/// Command line for the compressor.
#[derive(Parser, Debug)]
#[clap(
    name = "sly_compress",
    version,
    about = "Compress a file into the archive LZ format",
    long_about = "
    Compresses INPUT into OUTPUT. With --batch, INPUT is a folder: every '*.dec' file in
    it is compressed in parallel back to its archive name (the name without '.dec')
    inside OUTPUT, which defaults to the 'repacked' subfolder."
)]
pub struct CompressArgs {
    /// File to compress, or the folder of decoded files with --batch
    pub input: PathBuf,

    /// Where to write the compressed stream. Defaults to the input name plus ".compr"
    pub output: Option<PathBuf>,

    /// Repack every '.dec' file in the INPUT folder
    #[clap(short = 'b', long = "batch")]
    pub batch: bool,

    /// Maximum number of files packed at once with --batch. Defaults to the number of cores
    #[clap(short = 'j', long = "jobs")]
    pub jobs: Option<usize>,

    /// Sets verbosity. Repeat for more (-vvv shows trace output)
    #[clap(short = 'v', long = "verbose", parse(from_occurrences))]
    pub verbose: u8,
}

impl CompressArgs {
    /// The output path the user gave, or the input path with the default suffix.
    pub fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => {
                let mut name = self.input.clone().into_os_string();
                name.push(COMPRESSED_SUFFIX);
                PathBuf::from(name)
            }
        }
    }
}

/// Command line for the batch decompressor.
#[derive(Parser, Debug)]
#[clap(
    name = "sly_decompress",
    version,
    about = "Decompress every archive member in a folder",
    long_about = "
    Scans the folder for files whose name ends in 'W' and decompresses each of them
    into the 'decrypted' subfolder, adding '.dec' to the name. Files are processed in
    parallel, one job per file, never more jobs at once than there are cores."
)]
pub struct DecompressArgs {
    /// Folder holding the compressed files
    pub folder: PathBuf,

    /// Maximum number of files decoded at once. Defaults to the number of cores
    #[clap(short = 'j', long = "jobs")]
    pub jobs: Option<usize>,

    /// Sets verbosity. Repeat for more (-vvv shows trace output)
    #[clap(short = 'v', long = "verbose", parse(from_occurrences))]
    pub verbose: u8,
}

/// Parse the command line, exiting with status 1 on bad arguments (0 for --help/--version).
pub fn parse_or_exit<T: Parser>() -> T {
    match T::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            exit(code)
        }
    }
}

/// Map the number of -v flags to a log level.
pub fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Start the terminal logger on stderr at the level picked by -v.
pub fn init_logging(verbose: u8) {
    // Available log levels are Error, Warn, Info, Debug, Trace
    let level = level_for(verbose);
    // Fails only when a logger is already installed, in which case the level below still applies.
    let _ = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
    log::set_max_level(level);
    info!("Verbosity set to {}", log::max_level());
}
