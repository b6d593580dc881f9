/*
    FluxFox
    https://github.com/dbalsom/fluxfox

    Copyright 2024 Daniel Balsom

    Permission is hereby granted, free of charge, to any person obtaining a
    copy of this software and associated documentation files (the “Software”),
    to deal in the Software without restriction, including without limitation
    the rights to use, copy, modify, merge, publish, distribute, sublicense,
    and/or sell copies of the Software, and to permit persons to whom the
    Software is furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in
    all copies or substantial portions of the Software.

    THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
    IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
    FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
    AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
    LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
    FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
    DEALINGS IN THE SOFTWARE.

    --------------------------------------------------------------------------

    src/util.rs

    Small helpers shared by the codecs, the descriptor decoders and the
    command line tool.
*/

use crate::io::{Seek, SeekFrom, Write};

pub(crate) fn get_length<T: Seek>(source: &mut T) -> Result<u64, crate::io::Error> {
    // Seek to the end of the source
    let length = source.seek(SeekFrom::End(0))?;
    // Seek back to the beginning of the source
    source.seek(SeekFrom::Start(0))?;
    Ok(length)
}

/// Decode a fixed-width, space or NUL padded ASCII field as found in device descriptors.
/// Returns `None` if the field is blank.
pub fn ascii_field(bytes: &[u8]) -> Option<String> {
    let string: String = bytes
        .iter()
        .take_while(|&&b| b != 0)
        .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '?' })
        .collect();

    let trimmed = string.trim();
    if trimmed.is_empty() {
        None
    }
    else {
        Some(trimmed.to_string())
    }
}

/// Write a hex dump of `data` to `out`, `bytes_per_row` bytes per row, with an ASCII column.
/// Row addresses start at `start_address`.
pub fn dump_slice<W: Write>(
    data: &[u8],
    start_address: usize,
    bytes_per_row: usize,
    out: &mut W,
) -> Result<(), crate::io::Error> {
    let bytes_per_row = bytes_per_row.max(1);

    for (row_idx, row) in data.chunks(bytes_per_row).enumerate() {
        write!(out, "{:05X} | ", start_address + row_idx * bytes_per_row)?;
        for byte in row {
            write!(out, "{:02X} ", byte)?;
        }
        // Pad a short final row so the ASCII column lines up.
        for _ in row.len()..bytes_per_row {
            write!(out, "   ")?;
        }
        write!(out, "| ")?;
        for &byte in row {
            let c = if byte.is_ascii_graphic() || byte == b' ' { byte as char } else { '.' };
            write!(out, "{}", c)?;
        }
        writeln!(out)?;
    }
    Ok(())
}
