//! Codec for the LZ compressed members of a legacy game's asset archives.
//!
//! Version 0.1.0
//!
//! Provides bit-exact compression and decompression of the archive member format, plus a
//! batch driver that decodes a whole folder of members in parallel and repacks them.
//!
//! Basic usage to compress a file is as follows:
//!
//! `$> sly_compress FILE01.dec FILE01W`
//!
//! and to decode every member in a folder into its `decrypted` subfolder:
//!
//! `$> sly_decompress extracted/`
//!
//! and to repack every `.dec` file of that folder into `fs/`:
//!
//! `$> sly_compress --batch extracted/decrypted fs/`
//!
//! From code:
//! ```
//! let original = b"ABBACABBACABBACD";
//! let packed = sly_codec::compress(original).unwrap();
//! assert_eq!(sly_codec::decompress(&packed).unwrap(), original);
//! ```
#![warn(rust_2018_idioms)]

pub mod batch;
pub mod compression;
pub mod error;
pub mod tools;

pub use compression::compress::{compress, Encoder};
pub use compression::decompress::{decompress, Decoder};
pub use error::{Result, SlyError};
