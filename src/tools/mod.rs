//! The tools module provides the helpers around the codec.
//!
//! The tools are:
//! - cli: Command line definitions for the compressor and the batch decompressor, plus logger setup.
//! - fs: Whole-file reads and guarded writes.
//!
pub mod cli;
pub mod fs;
