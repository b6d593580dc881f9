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

    src/structure_parsers/dvd_dmi.rs

    Signature checks for the Xbox and Xbox 360 Disc Manufacturing Information
    structures.
*/

/// 4-byte response header plus 2048 bytes of manufacturing information.
pub const DMI_SIZE: usize = 2052;

/// January 1st, 2001 as a Windows FILETIME. Xbox DMI timestamps are never earlier.
const XBOX_MIN_TIMESTAMP: i64 = 126_227_808_000_000_000;
const XBOX_360_SIGNATURE_OFFSET: usize = 0x7EC;
/// "XBOX" read as a little-endian u32.
const XBOX_360_SIGNATURE: u32 = 0x584F_4258;

fn read_u32_le(data: &[u8], offset: usize) -> Option<u32> {
    data.get(offset..offset + 4)
        .and_then(|b| b.try_into().ok())
        .map(u32::from_le_bytes)
}

/// Return true if the DMI belongs to an original Xbox game disc.
pub fn is_xbox(dmi: &[u8]) -> bool {
    if dmi.len() != DMI_SIZE {
        return false;
    }
    let version = read_u32_le(dmi, 4);
    let timestamp = dmi
        .get(20..28)
        .and_then(|b| b.try_into().ok())
        .map(i64::from_le_bytes);

    matches!((version, timestamp), (Some(1), Some(ts)) if ts >= XBOX_MIN_TIMESTAMP)
}

/// Return true if the DMI belongs to an Xbox 360 game disc.
pub fn is_xbox_360(dmi: &[u8]) -> bool {
    if dmi.len() != DMI_SIZE {
        return false;
    }
    read_u32_le(dmi, XBOX_360_SIGNATURE_OFFSET) == Some(XBOX_360_SIGNATURE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xbox_signatures() {
        let mut dmi = vec![0u8; DMI_SIZE];
        assert!(!is_xbox(&dmi));
        assert!(!is_xbox_360(&dmi));

        dmi[4..8].copy_from_slice(&1u32.to_le_bytes());
        dmi[20..28].copy_from_slice(&(XBOX_MIN_TIMESTAMP + 1).to_le_bytes());
        assert!(is_xbox(&dmi));

        let mut dmi = vec![0u8; DMI_SIZE];
        dmi[0x7EC..0x7F0].copy_from_slice(b"XBOX");
        assert!(is_xbox_360(&dmi));
        assert!(!is_xbox_360(&dmi[..2048]));
    }
}
