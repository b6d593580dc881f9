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

    src/structure_parsers/scsi_modes.rs

    Decoders for SCSI MODE SENSE (6) and MODE SENSE (10) responses, and for
    the rigid disk (0x04) and flexible disk (0x05) geometry pages.
*/

use binrw::{binrw, BinRead};
use std::io::Cursor;

pub const PAGE_RIGID_DISK: u8 = 0x04;
pub const PAGE_FLEXIBLE_DISK: u8 = 0x05;

#[derive(Debug)]
#[binrw]
#[brw(big)]
struct ModeHeader6 {
    mode_data_length: u8,
    medium_type: u8,
    device_specific: u8,
    block_descriptor_length: u8,
}

#[derive(Debug)]
#[binrw]
#[brw(big)]
struct ModeHeader10 {
    mode_data_length: u16,
    medium_type: u8,
    device_specific: u8,
    flags: u8, // LONGLBA in bit 0
    reserved: u8,
    block_descriptor_length: u16,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockDescriptor {
    /// Density code. Long LBA descriptors carry no density code and report 0.
    pub density: u8,
    pub blocks: u64,
    pub block_length: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModePage {
    pub page: u8,
    pub subpage: u8,
    /// The complete page, including its page code and length header.
    pub data: Vec<u8>,
}

/// A decoded MODE SENSE response.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModeSense {
    pub medium_type: u8,
    pub write_protected: bool,
    pub block_descriptors: Vec<BlockDescriptor>,
    pub pages: Vec<ModePage>,
}

impl ModeSense {
    pub fn decode6(data: &[u8]) -> Option<ModeSense> {
        let header = ModeHeader6::read(&mut Cursor::new(data)).ok()?;
        let end = (header.mode_data_length as usize + 1).min(data.len());
        let descriptors_end = 4 + header.block_descriptor_length as usize;
        if descriptors_end > end {
            log::debug!("ModeSense::decode6(): Block descriptors overrun mode data");
            return None;
        }

        Some(ModeSense {
            medium_type: header.medium_type,
            write_protected: header.device_specific & 0x80 != 0,
            block_descriptors: decode_short_descriptors(&data[4..descriptors_end]),
            pages: decode_pages(&data[descriptors_end..end]),
        })
    }

    pub fn decode10(data: &[u8]) -> Option<ModeSense> {
        let header = ModeHeader10::read(&mut Cursor::new(data)).ok()?;
        let end = (header.mode_data_length as usize + 2).min(data.len());
        let descriptors_end = 8 + header.block_descriptor_length as usize;
        if descriptors_end > end {
            log::debug!("ModeSense::decode10(): Block descriptors overrun mode data");
            return None;
        }

        let descriptor_bytes = &data[8..descriptors_end];
        let block_descriptors = if header.flags & 0x01 != 0 {
            descriptor_bytes
                .chunks_exact(16)
                .map(|d| BlockDescriptor {
                    density: 0,
                    blocks: u64::from_be_bytes([d[0], d[1], d[2], d[3], d[4], d[5], d[6], d[7]]),
                    block_length: u32::from_be_bytes([d[12], d[13], d[14], d[15]]),
                })
                .collect()
        }
        else {
            decode_short_descriptors(descriptor_bytes)
        };

        Some(ModeSense {
            medium_type: header.medium_type,
            write_protected: header.device_specific & 0x80 != 0,
            block_descriptors,
            pages: decode_pages(&data[descriptors_end..end]),
        })
    }

    /// Return the density code of the first block descriptor, if any.
    pub fn density(&self) -> Option<u8> {
        self.block_descriptors.first().map(|d| d.density)
    }

    pub fn page(&self, page: u8) -> Option<&ModePage> {
        self.pages.iter().find(|p| p.page == page && p.subpage == 0)
    }

    pub fn rigid_disk_page(&self) -> Option<RigidDiskPage> {
        self.page(PAGE_RIGID_DISK).and_then(|p| RigidDiskPage::read(&mut Cursor::new(&p.data)).ok())
    }

    pub fn flexible_disk_page(&self) -> Option<FlexibleDiskPage> {
        self.page(PAGE_FLEXIBLE_DISK)
            .and_then(|p| FlexibleDiskPage::read(&mut Cursor::new(&p.data)).ok())
    }
}

fn decode_short_descriptors(bytes: &[u8]) -> Vec<BlockDescriptor> {
    bytes
        .chunks_exact(8)
        .map(|d| BlockDescriptor {
            density: d[0],
            blocks: u32::from_be_bytes([0, d[1], d[2], d[3]]) as u64,
            block_length: u32::from_be_bytes([0, d[5], d[6], d[7]]),
        })
        .collect()
}

fn decode_pages(mut bytes: &[u8]) -> Vec<ModePage> {
    let mut pages = Vec::new();

    while bytes.len() >= 2 {
        let page = bytes[0] & 0x3F;
        let (subpage, header_len, page_len) = if bytes[0] & 0x40 != 0 {
            if bytes.len() < 4 {
                break;
            }
            (bytes[1], 4, u16::from_be_bytes([bytes[2], bytes[3]]) as usize)
        }
        else {
            (0, 2, bytes[1] as usize)
        };

        let total = header_len + page_len;
        if total > bytes.len() {
            log::debug!("decode_pages(): Page {:02X} truncated, stopping", page);
            break;
        }
        pages.push(ModePage {
            page,
            subpage,
            data: bytes[..total].to_vec(),
        });
        bytes = &bytes[total..];
    }
    pages
}

/// Mode page 0x04, rigid disk drive geometry.
#[derive(Debug)]
#[binrw]
#[brw(big)]
pub struct RigidDiskPage {
    page_code: u8,
    page_length: u8,
    cylinders_raw: [u8; 3],
    pub heads: u8,
}

impl RigidDiskPage {
    pub fn cylinders(&self) -> u32 {
        u32::from_be_bytes([0, self.cylinders_raw[0], self.cylinders_raw[1], self.cylinders_raw[2]])
    }
}

/// Mode page 0x05, flexible disk geometry.
#[derive(Debug)]
#[binrw]
#[brw(big)]
pub struct FlexibleDiskPage {
    page_code: u8,
    page_length: u8,
    pub transfer_rate: u16,
    pub heads: u8,
    pub sectors_per_track: u8,
    pub bytes_per_sector: u16,
    pub cylinders: u16,
}
