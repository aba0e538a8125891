//! Storage helpers
//!
//! File access for the CLI. The decryption pipeline itself never touches
//! the file system; callers read the envelope here and write the result
//! back through the same helpers.

pub mod file_io;

pub use file_io::{read_text, write_text_atomic};
