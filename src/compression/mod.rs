//! The compression module holds the codec used by the game's asset archives.
//!
//! The format is a byte oriented LZ scheme over an 8 KiB window:
//! - Each block starts with a flag byte describing up to eight slots, low bit first.
//! - A set bit is a literal byte, a clear bit is a two byte little endian match token.
//! - A token holds `length - 3` in its top three bits and a window offset in the low 13 bits.
//!
//! There is no header and no length prefix. The decoder simply runs until the input is used up.
//!
//! Compression looks matches up through a hash of the next two bytes, checking only the most
//! recent positions each pair was seen at. Decompression is a straight copy loop over a
//! circular window.
//!

pub mod compress;
pub mod decompress;
pub mod dictionary;
pub mod token;
