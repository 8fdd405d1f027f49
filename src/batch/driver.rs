use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use log::{debug, error, info};

use super::admission::AdmissionPool;
use crate::compression::compress::compress;
use crate::compression::decompress::decompress;
use crate::error::{Result, SlyError};
use crate::tools::fs;

/// Compressed archive members are the files whose name ends with this character.
pub const MEMBER_MARKER: char = 'W';
/// Subfolder of the scanned folder that receives the decoded files.
pub const OUTPUT_DIR: &str = "decrypted";
/// Appended to a member's file name to form its output name.
pub const DECODED_SUFFIX: &str = ".dec";
/// Subfolder of the scanned folder that receives repacked members by default.
pub const REPACK_DIR: &str = "repacked";

/// What happened to every file handed to the batch, in the order they were given.
#[derive(Debug)]
pub struct BatchReport {
    pub outcomes: Vec<(PathBuf, Result<PathBuf>)>,
    pub elapsed: Duration,
}

impl BatchReport {
    fn empty() -> Self {
        BatchReport {
            outcomes: Vec::new(),
            elapsed: Duration::ZERO,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|(_, r)| r.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Number of jobs to run at once when the user did not choose: one per core, at least one.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .max(1)
}

/// Files directly inside `folder` (symlinks followed) whose name passes `keep`, sorted.
fn scan(folder: &Path, keep: impl Fn(&str) -> bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(folder).map_err(|e| SlyError::io(folder, e))? {
        let entry = entry.map_err(|e| SlyError::io(folder, e))?;
        let path = entry.path();
        if path.is_file() && keep(&entry.file_name().to_string_lossy()) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Regular files directly inside `folder` whose name ends with the member marker, sorted.
pub fn find_compressed_files(folder: &Path) -> Result<Vec<PathBuf>> {
    scan(folder, |name| name.ends_with(MEMBER_MARKER))
}

/// Regular files directly inside `folder` whose name ends with the decoded suffix, sorted.
pub fn find_decoded_files(folder: &Path) -> Result<Vec<PathBuf>> {
    scan(folder, |name| {
        name.len() > DECODED_SUFFIX.len() && name.ends_with(DECODED_SUFFIX)
    })
}

/// Output name for `input`: same file name plus the decoded suffix, inside `dest`.
pub fn output_path(dest: &Path, input: &Path) -> PathBuf {
    let mut name = input.file_name().unwrap_or_default().to_os_string();
    name.push(DECODED_SUFFIX);
    dest.join(name)
}

/// Archive name for a decoded file: its file name without the decoded suffix, inside `dest`.
pub fn compressed_output_path(dest: &Path, input: &Path) -> PathBuf {
    let name = input.file_name().unwrap_or_default().to_string_lossy();
    dest.join(name.strip_suffix(DECODED_SUFFIX).unwrap_or(&name))
}

/// One job: read a member, decode it and write the result into `dest`.
pub fn decompress_file(input: &Path, dest: &Path) -> Result<PathBuf> {
    let data = fs::read(input, 0)?;
    if data.is_empty() {
        return Err(SlyError::EmptyInput);
    }

    let decoded = decompress(&data)?;
    let out_path = output_path(dest, input);
    fs::write(&out_path, &decoded, true)?;

    info!(
        "Decoded {} -> {} ({} -> {} bytes)",
        input.display(),
        out_path.display(),
        data.len(),
        decoded.len()
    );
    Ok(out_path)
}

/// One job: read a decoded file, compress it and write it back under its archive name.
pub fn repack_file(input: &Path, dest: &Path) -> Result<PathBuf> {
    let data = fs::read(input, 0)?;
    let packed = compress(&data)?;
    let out_path = compressed_output_path(dest, input);
    fs::write(&out_path, &packed, true)?;

    info!(
        "Packed {} -> {} ({} -> {} bytes)",
        input.display(),
        out_path.display(),
        data.len(),
        packed.len()
    );
    Ok(out_path)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown cause".to_string()
    }
}

/// Run `job(file, dest)` for every file, at most `workers` at once.
///
/// The destination is created once before any job starts. A failing or panicking job
/// is logged and recorded in the report; it never stops the other jobs.
pub(crate) fn run_batch<F>(
    files: &[PathBuf],
    dest: &Path,
    workers: usize,
    verb: &str,
    job: F,
) -> Result<BatchReport>
where
    F: Fn(&Path, &Path) -> Result<PathBuf> + Sync,
{
    let start = Instant::now();
    fs::create_dir(dest)?;

    let admission = AdmissionPool::new(workers);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(admission.capacity())
        .thread_name(|i| format!("sly-worker-{}", i))
        .build()
        .map_err(|e| SlyError::Configuration(format!("Could not start worker pool: {}", e)))?;
    debug!(
        "{} {} files with {} workers",
        verb,
        files.len(),
        admission.capacity()
    );

    let job = &job;
    let (tx, rx) = mpsc::channel();
    // The submitter stays on this thread so it never takes a worker while waiting for a slot.
    pool.in_place_scope(|scope| {
        for (idx, file) in files.iter().enumerate() {
            let permit = admission.acquire();
            let tx = tx.clone();
            scope.spawn(move |_| {
                let _permit = permit;
                let outcome = catch_unwind(AssertUnwindSafe(|| job(file, dest)))
                    .unwrap_or_else(|payload| Err(SlyError::Panicked(panic_message(payload))));
                if let Err(e) = &outcome {
                    error!("{} {} failed: {}", verb, file.display(), e);
                }
                // The receiver outlives the scope.
                let _ = tx.send((idx, outcome));
            });
        }
    });
    drop(tx);

    let mut results: Vec<(usize, Result<PathBuf>)> = rx.into_iter().collect();
    results.sort_by_key(|(idx, _)| *idx);
    let outcomes = results
        .into_iter()
        .map(|(idx, outcome)| (files[idx].clone(), outcome))
        .collect();

    Ok(BatchReport {
        outcomes,
        elapsed: start.elapsed(),
    })
}

/// Decode every file in `files` into `dest`, running at most `workers` jobs at once.
pub fn decompress_all(files: &[PathBuf], dest: &Path, workers: usize) -> Result<BatchReport> {
    run_batch(files, dest, workers, "Decoding", decompress_file)
}

/// Compress every file in `files` into `dest` under its archive name, at most `workers`
/// jobs at once.
pub fn compress_all(files: &[PathBuf], dest: &Path, workers: usize) -> Result<BatchReport> {
    run_batch(files, dest, workers, "Packing", repack_file)
}

fn check_folder(folder: &Path) -> Result<()> {
    if folder.is_dir() {
        Ok(())
    } else {
        Err(SlyError::Configuration(format!(
            "Invalid folder path: {}",
            folder.display()
        )))
    }
}

/// Decode all members found in `folder` into `folder/decrypted`.
///
/// Fails only when `folder` is not a usable directory. When no member is found nothing
/// is created and an empty report comes back.
pub fn decompress_folder(folder: &Path, workers: usize) -> Result<BatchReport> {
    check_folder(folder)?;

    let files = find_compressed_files(folder)?;
    if files.is_empty() {
        info!("No files ending with '{}' in {}", MEMBER_MARKER, folder.display());
        return Ok(BatchReport::empty());
    }

    decompress_all(&files, &folder.join(OUTPUT_DIR), workers)
}

/// Repack every `*.dec` file in `folder` into `dest`, or `folder/repacked` when no
/// destination is given. Same failure rules as [`decompress_folder`].
pub fn compress_folder(folder: &Path, dest: Option<&Path>, workers: usize) -> Result<BatchReport> {
    check_folder(folder)?;

    let files = find_decoded_files(folder)?;
    if files.is_empty() {
        info!("No files ending with '{}' in {}", DECODED_SUFFIX, folder.display());
        return Ok(BatchReport::empty());
    }

    let dest = dest.map_or_else(|| folder.join(REPACK_DIR), Path::to_path_buf);
    compress_all(&files, &dest, workers)
}
