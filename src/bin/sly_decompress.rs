//Enable more cargo lint tests
#![warn(rust_2018_idioms)]

use std::process::exit;

use log::error;
use sly_codec::batch::driver::{decompress_folder, default_workers, MEMBER_MARKER};
use sly_codec::tools::cli::{init_logging, parse_or_exit, DecompressArgs};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() {
    let args: DecompressArgs = parse_or_exit();
    init_logging(args.verbose);

    let workers = args.jobs.unwrap_or_else(default_workers).max(1);

    // Only a bad folder argument fails the run. Individual files are reported below.
    let report = match decompress_folder(&args.folder, workers) {
        Ok(report) => report,
        Err(e) => {
            error!("{}", e);
            exit(1);
        }
    };

    if report.is_empty() {
        println!("No files ending with '{}' found in folder.", MEMBER_MARKER);
        return;
    }

    println!(
        "All files decompressed in: {}ms ({} succeeded, {} failed)",
        report.elapsed.as_millis(),
        report.succeeded(),
        report.failed()
    );
}
