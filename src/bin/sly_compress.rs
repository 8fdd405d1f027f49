//Enable more cargo lint tests
#![warn(rust_2018_idioms)]

use std::process::exit;

use log::error;
use sly_codec::batch::driver::{compress_folder, default_workers, DECODED_SUFFIX};
use sly_codec::compression::compress::compress_file;
use sly_codec::tools::cli::{init_logging, parse_or_exit, CompressArgs};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() {
    let args: CompressArgs = parse_or_exit();
    init_logging(args.verbose);

    if !args.batch {
        let output = args.output_path();
        if let Err(e) = compress_file(&args.input, &output) {
            error!("{}", e);
            exit(1);
        }
        return;
    }

    let workers = args.jobs.unwrap_or_else(default_workers).max(1);
    let report = match compress_folder(&args.input, args.output.as_deref(), workers) {
        Ok(report) => report,
        Err(e) => {
            error!("{}", e);
            exit(1);
        }
    };

    if report.is_empty() {
        println!("No files ending with '{}' found in folder.", DECODED_SUFFIX);
        return;
    }

    println!(
        "All files compressed in: {}ms ({} succeeded, {} failed)",
        report.elapsed.as_millis(),
        report.succeeded(),
        report.failed()
    );
}
