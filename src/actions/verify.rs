//! Byte-by-byte file comparison.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use crate::scanner::READ_CHUNK_SIZE;

/// Check whether two files have identical contents.
///
/// Lengths are compared first; contents are then compared chunk by chunk
/// and the comparison stops at the first difference.
///
/// # Errors
///
/// Returns the underlying I/O error if either file cannot be opened or read.
pub fn files_identical(a: &Path, b: &Path) -> io::Result<bool> {
    let file_a = File::open(a)?;
    let file_b = File::open(b)?;

    if file_a.metadata()?.len() != file_b.metadata()?.len() {
        return Ok(false);
    }

    let mut reader_a = BufReader::with_capacity(READ_CHUNK_SIZE, file_a);
    let mut reader_b = BufReader::with_capacity(READ_CHUNK_SIZE, file_b);
    let mut buf_a = vec![0u8; READ_CHUNK_SIZE];
    let mut buf_b = vec![0u8; READ_CHUNK_SIZE];

    loop {
        let n = read_full(&mut reader_a, &mut buf_a)?;
        let m = read_full(&mut reader_b, &mut buf_b)?;
        if n != m || buf_a[..n] != buf_b[..m] {
            return Ok(false);
        }
        if n == 0 {
            return Ok(true);
        }
    }
}

/// Fill `buf` as far as possible, returning the number of bytes read.
fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
