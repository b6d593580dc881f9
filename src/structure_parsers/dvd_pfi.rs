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

    src/structure_parsers/dvd_pfi.rs

    Decoder for the DVD / HD DVD Physical Format Information structure, as
    returned by READ DISC STRUCTURE with its 4-byte response header.
*/

use binrw::{binrw, BinRead};
use std::io::Cursor;

/// 4-byte response header plus 2048 bytes of format information.
pub const PFI_SIZE: usize = 2052;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiskCategory {
    DvdRom,
    DvdRam,
    DvdR,
    DvdRw,
    HdDvdRom,
    HdDvdRam,
    HdDvdR,
    HdDvdRw,
    Umd,
    DvdPlusRw,
    DvdPlusR,
    Reserved(u8),
    DvdPlusRwDl,
    DvdPlusRDl,
    Nintendo,
}

impl From<u8> for DiskCategory {
    fn from(value: u8) -> Self {
        match value & 0x0F {
            0 => DiskCategory::DvdRom,
            1 => DiskCategory::DvdRam,
            2 => DiskCategory::DvdR,
            3 => DiskCategory::DvdRw,
            4 => DiskCategory::HdDvdRom,
            5 => DiskCategory::HdDvdRam,
            6 => DiskCategory::HdDvdR,
            7 => DiskCategory::HdDvdRw,
            8 => DiskCategory::Umd,
            9 => DiskCategory::DvdPlusRw,
            10 => DiskCategory::DvdPlusR,
            13 => DiskCategory::DvdPlusRwDl,
            14 => DiskCategory::DvdPlusRDl,
            15 => DiskCategory::Nintendo,
            other => DiskCategory::Reserved(other),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DvdSize {
    OneTwenty,
    Eighty,
}

#[derive(Debug)]
#[binrw]
#[brw(big)]
struct PfiRaw {
    data_length: u16,
    reserved: [u8; 2],
    category_version: u8, // Disk category (high nibble), part version (low nibble)
    size_rate: u8,        // Disc size (high nibble), maximum rate (low nibble)
    layers: u8,           // Layer count - 1 in bits 6-5, track path in bit 4, layer type in bits 3-0
    densities: u8,
    #[br(map = |b: [u8; 4]| u32::from_be_bytes(b) & 0x00FF_FFFF)]
    #[bw(map = |v: &u32| v.to_be_bytes())]
    data_area_start: u32,
    #[br(map = |b: [u8; 4]| u32::from_be_bytes(b) & 0x00FF_FFFF)]
    #[bw(map = |v: &u32| v.to_be_bytes())]
    data_area_end: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhysicalFormatInformation {
    pub disk_category: DiskCategory,
    pub part_version: u8,
    pub disc_size: DvdSize,
    pub maximum_rate: u8,
    pub layers: u8,
    pub data_area_start: u32,
    pub data_area_end: u32,
}

impl PhysicalFormatInformation {
    /// Decode a PFI response. Returns `None` if the buffer is shorter than a full structure.
    pub fn decode(data: &[u8]) -> Option<PhysicalFormatInformation> {
        if data.len() < PFI_SIZE {
            log::debug!("PhysicalFormatInformation::decode(): Buffer too short: {} bytes", data.len());
            return None;
        }
        let raw = PfiRaw::read(&mut Cursor::new(data)).ok()?;

        Some(PhysicalFormatInformation {
            disk_category: DiskCategory::from(raw.category_version >> 4),
            part_version: raw.category_version & 0x0F,
            disc_size: match raw.size_rate >> 4 {
                1 => DvdSize::Eighty,
                _ => DvdSize::OneTwenty,
            },
            maximum_rate: raw.size_rate & 0x0F,
            layers: ((raw.layers >> 5) & 0x03) + 1,
            data_area_start: raw.data_area_start,
            data_area_end: raw.data_area_end,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pfi_decode() {
        let mut pfi = vec![0u8; PFI_SIZE];
        pfi[0..2].copy_from_slice(&2050u16.to_be_bytes());
        pfi[4] = 0x26; // DVD-R, part version 6
        pfi[5] = 0x10; // 80mm
        pfi[6] = 0x20; // Two layers
        pfi[8..12].copy_from_slice(&0x0003_0000u32.to_be_bytes());

        let decoded = PhysicalFormatInformation::decode(&pfi).unwrap();
        assert_eq!(decoded.disk_category, DiskCategory::DvdR);
        assert_eq!(decoded.part_version, 6);
        assert_eq!(decoded.disc_size, DvdSize::Eighty);
        assert_eq!(decoded.layers, 2);
        assert_eq!(decoded.data_area_start, 0x30000);

        assert!(PhysicalFormatInformation::decode(&pfi[..2048]).is_none());
    }
}
