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

    src/structure_parsers/ata.rs

    Decoder for the ATA IDENTIFY DEVICE response. Only the fields used for
    media classification and drive provenance are named.
*/

use crate::{types::chs::DiskChs, util::ascii_field};
use binrw::{binrw, BinRead};
use std::io::Cursor;

pub const IDENTIFY_SIZE: usize = 512;
/// General configuration word reported by CompactFlash cards.
pub const CFA_SIGNATURE: u16 = 0x848A;

#[derive(Debug)]
#[binrw]
#[brw(little)]
pub struct IdentifyDevice {
    pub general_configuration: u16,       // Word 0
    pub default_cylinders: u16,           // Word 1
    specific_configuration: u16,          // Word 2
    pub default_heads: u16,               // Word 3
    unformatted_bytes_per_track: u16,     // Word 4 (retired)
    unformatted_bytes_per_sector: u16,    // Word 5 (retired)
    pub default_sectors_per_track: u16,   // Word 6
    vendor_unique: [u16; 3],              // Words 7-9
    serial_number: [u8; 20],              // Words 10-19
    buffer_info: [u16; 3],                // Words 20-22 (retired)
    firmware_revision: [u8; 8],           // Words 23-26
    model_number: [u8; 40],               // Words 27-46
    capabilities_47_53: [u16; 7],         // Words 47-53
    pub current_cylinders: u16,           // Word 54
    pub current_heads: u16,               // Word 55
    pub current_sectors_per_track: u16,   // Word 56
    remaining: [u16; 199],                // Words 57-255
}

impl IdentifyDevice {
    /// Decode an IDENTIFY DEVICE response. Returns `None` if the buffer is too short.
    pub fn decode(data: &[u8]) -> Option<IdentifyDevice> {
        if data.len() < IDENTIFY_SIZE {
            log::debug!("IdentifyDevice::decode(): Buffer too short: {} bytes", data.len());
            return None;
        }
        IdentifyDevice::read(&mut Cursor::new(data)).ok()
    }

    pub fn is_compact_flash(&self) -> bool {
        self.general_configuration == CFA_SIGNATURE
    }

    /// Return the geometry of the device. The current geometry is preferred if all of its words
    /// are set, otherwise the default geometry is used if all of its words are set.
    pub fn geometry(&self) -> Option<DiskChs> {
        let current = [self.current_cylinders, self.current_heads, self.current_sectors_per_track];
        let default = [self.default_cylinders, self.default_heads, self.default_sectors_per_track];

        if current.iter().all(|&w| w != 0) {
            Some(DiskChs::new(current[0] as u32, current[1] as u32, current[2] as u32))
        }
        else if default.iter().all(|&w| w != 0) {
            Some(DiskChs::new(default[0] as u32, default[1] as u32, default[2] as u32))
        }
        else {
            None
        }
    }

    pub fn model(&self) -> Option<String> {
        ata_string(&self.model_number)
    }

    pub fn serial_number(&self) -> Option<String> {
        ata_string(&self.serial_number)
    }

    pub fn firmware_revision(&self) -> Option<String> {
        ata_string(&self.firmware_revision)
    }
}

/// ATA strings store two characters per little-endian word, first character in the high byte.
fn ata_string(raw: &[u8]) -> Option<String> {
    let swapped: Vec<u8> = raw.chunks_exact(2).flat_map(|pair| [pair[1], pair[0]]).collect();
    ascii_field(&swapped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn put_word(buf: &mut [u8], word: usize, value: u16) {
        buf[word * 2..word * 2 + 2].copy_from_slice(&value.to_le_bytes());
    }

    fn put_string(buf: &mut [u8], first_word: usize, text: &str, words: usize) {
        let mut padded = text.as_bytes().to_vec();
        padded.resize(words * 2, b' ');
        for (i, pair) in padded.chunks_exact(2).enumerate() {
            buf[(first_word + i) * 2] = pair[1];
            buf[(first_word + i) * 2 + 1] = pair[0];
        }
    }

    #[test]
    fn test_identify_geometry_prefers_current() {
        let mut buf = vec![0u8; IDENTIFY_SIZE];
        put_word(&mut buf, 1, 1024);
        put_word(&mut buf, 3, 16);
        put_word(&mut buf, 6, 63);
        put_word(&mut buf, 54, 980);
        put_word(&mut buf, 55, 5);
        put_word(&mut buf, 56, 17);
        put_string(&mut buf, 27, "ACME DISK", 20);
        put_string(&mut buf, 23, "1.0", 4);

        let identify = IdentifyDevice::decode(&buf).unwrap();
        assert!(!identify.is_compact_flash());
        assert_eq!(identify.geometry(), Some(DiskChs::new(980, 5, 17)));
        assert_eq!(identify.model().as_deref(), Some("ACME DISK"));
        assert_eq!(identify.firmware_revision().as_deref(), Some("1.0"));
        assert_eq!(identify.serial_number(), None);

        // Clearing one current geometry word falls back to the default geometry.
        put_word(&mut buf, 55, 0);
        let identify = IdentifyDevice::decode(&buf).unwrap();
        assert_eq!(identify.geometry(), Some(DiskChs::new(1024, 16, 63)));
    }

    #[test]
    fn test_identify_compact_flash() {
        let mut buf = vec![0u8; IDENTIFY_SIZE];
        put_word(&mut buf, 0, CFA_SIGNATURE);
        let identify = IdentifyDevice::decode(&buf).unwrap();
        assert!(identify.is_compact_flash());
        assert_eq!(identify.geometry(), None);
        assert!(IdentifyDevice::decode(&buf[..100]).is_none());
    }
}
