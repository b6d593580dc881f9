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

    src/structure_parsers/cd_sector.rs

    Helpers for raw 2352-byte CD sectors: sync detection, mode and form
    discrimination, Mode 2 user-data reduction and EDC calculation.

    The EDC is the CRC-32 defined by ECMA-130, computed least-significant bit
    first with the reflected polynomial 0xD8018001 and stored little-endian.
*/

/// Size of a raw CD sector without subchannel.
pub const CD_RAW_SECTOR_SIZE: usize = 2352;
/// Size of a raw CD sector followed by 96 bytes of interleaved subchannel.
pub const CD_RAW_SECTOR_SIZE_SUBCHANNEL: usize = 2448;
pub const CD_SUBCHANNEL_SIZE: usize = 96;
pub const CD_MODE1_USER_SIZE: usize = 2048;
/// Size of a Mode 2 sector with the sync and header removed.
pub const CD_MODE2_SIZE: usize = 2336;

pub const CD_SYNC: [u8; 12] = [0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00];

const CD_MODE_OFFSET: usize = 15;
const CD_SUBHEADER_SUBMODE_OFFSET: usize = 18;
const CD_SUBMODE_FORM2: u8 = 0x20;

const MODE1_EDC_RANGE: (usize, usize) = (0, 2064);
const MODE2_FORM1_EDC_RANGE: (usize, usize) = (16, 2072);
const MODE2_FORM2_EDC_RANGE: (usize, usize) = (16, 2348);

const EDC_TABLE: [u32; 256] = build_edc_table();

const fn build_edc_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut edc = i as u32;
        let mut bit = 0;
        while bit < 8 {
            edc = if edc & 1 != 0 { (edc >> 1) ^ 0xD801_8001 } else { edc >> 1 };
            bit += 1;
        }
        table[i] = edc;
        i += 1;
    }
    table
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CdSectorMode {
    Mode0,
    Mode1,
    Mode2Form1,
    Mode2Form2,
}

/// Compute the CD EDC over `data`.
pub fn edc(data: &[u8]) -> u32 {
    data.iter()
        .fold(0u32, |edc, &b| (edc >> 8) ^ EDC_TABLE[((edc ^ b as u32) & 0xFF) as usize])
}

/// Return true if `data` begins with the CD sync pattern.
pub fn has_sync(data: &[u8]) -> bool {
    data.len() >= CD_SYNC.len() && data[..CD_SYNC.len()] == CD_SYNC
}

/// Return true if the mode byte of the sector header designates Mode 2.
pub fn is_mode2(sector: &[u8]) -> bool {
    sector.get(CD_MODE_OFFSET) == Some(&0x02)
}

/// Determine the mode of a raw sector from its header and, for Mode 2, its sub-header.
pub fn sector_mode(sector: &[u8]) -> Option<CdSectorMode> {
    if sector.len() < CD_RAW_SECTOR_SIZE {
        return None;
    }
    match sector[CD_MODE_OFFSET] {
        0x00 => Some(CdSectorMode::Mode0),
        0x01 => Some(CdSectorMode::Mode1),
        0x02 if sector[CD_SUBHEADER_SUBMODE_OFFSET] & CD_SUBMODE_FORM2 != 0 => Some(CdSectorMode::Mode2Form2),
        0x02 => Some(CdSectorMode::Mode2Form1),
        _ => None,
    }
}

/// Reduce a raw Mode 2 sector to its sub-header and user data, dropping the sync and header.
pub fn mode2_user_data(sector: &[u8]) -> &[u8] {
    let end = CD_RAW_SECTOR_SIZE.min(sector.len());
    let start = 16.min(end);
    &sector[start..end]
}

fn check_edc(sector: &[u8], range: (usize, usize)) -> bool {
    let (start, end) = range;
    let stored = u32::from_le_bytes([sector[end], sector[end + 1], sector[end + 2], sector[end + 3]]);
    edc(&sector[start..end]) == stored
}

/// Verify the EDC of a raw sector. Returns `None` when the sector carries no EDC to check: Mode 0
/// sectors, Mode 2 Form 2 sectors with a zero EDC field, and sectors with an invalid mode byte.
pub fn verify_edc(sector: &[u8]) -> Option<bool> {
    match sector_mode(sector)? {
        CdSectorMode::Mode0 => None,
        CdSectorMode::Mode1 => Some(check_edc(sector, MODE1_EDC_RANGE)),
        CdSectorMode::Mode2Form1 => Some(check_edc(sector, MODE2_FORM1_EDC_RANGE)),
        CdSectorMode::Mode2Form2 => {
            let (_, end) = MODE2_FORM2_EDC_RANGE;
            if sector[end..end + 4] == [0, 0, 0, 0] {
                None
            }
            else {
                Some(check_edc(sector, MODE2_FORM2_EDC_RANGE))
            }
        }
    }
}

/// Fill in the EDC field of a raw sector according to its mode.
pub fn store_edc(sector: &mut [u8]) {
    let range = match sector_mode(sector) {
        Some(CdSectorMode::Mode1) => MODE1_EDC_RANGE,
        Some(CdSectorMode::Mode2Form1) => MODE2_FORM1_EDC_RANGE,
        Some(CdSectorMode::Mode2Form2) => MODE2_FORM2_EDC_RANGE,
        _ => return,
    };
    let value = edc(&sector[range.0..range.1]);
    sector[range.1..range.1 + 4].copy_from_slice(&value.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_sector(mode: u8, submode: u8) -> Vec<u8> {
        let mut sector = vec![0u8; CD_RAW_SECTOR_SIZE];
        sector[..12].copy_from_slice(&CD_SYNC);
        sector[12..15].copy_from_slice(&[0x00, 0x02, 0x00]);
        sector[15] = mode;
        sector[18] = submode;
        sector[22] = submode;
        for (i, b) in sector[24..2072].iter_mut().enumerate() {
            *b = (i % 251) as u8;
        }
        sector
    }

    #[test]
    fn test_edc_known_value() {
        // The EDC of an all-zero buffer is zero, and a single set byte maps to its table entry.
        assert_eq!(edc(&[0u8; 16]), 0);
        assert_eq!(edc(&[0x01]), EDC_TABLE[1]);
        assert_eq!(EDC_TABLE[128], 0xD801_8001);
    }

    #[test]
    fn test_verify_mode1() {
        let mut sector = raw_sector(0x01, 0);
        assert_eq!(verify_edc(&sector), Some(false));
        store_edc(&mut sector);
        assert_eq!(verify_edc(&sector), Some(true));
        sector[100] ^= 0xFF;
        assert_eq!(verify_edc(&sector), Some(false));
    }

    #[test]
    fn test_verify_mode2_forms() {
        let mut form1 = raw_sector(0x02, 0x08);
        assert_eq!(sector_mode(&form1), Some(CdSectorMode::Mode2Form1));
        store_edc(&mut form1);
        assert_eq!(verify_edc(&form1), Some(true));

        let mut form2 = raw_sector(0x02, CD_SUBMODE_FORM2);
        assert_eq!(sector_mode(&form2), Some(CdSectorMode::Mode2Form2));
        assert_eq!(verify_edc(&form2), None);
        store_edc(&mut form2);
        assert_eq!(verify_edc(&form2), Some(true));
    }

    #[test]
    fn test_mode2_user_data() {
        let sector = raw_sector(0x02, 0x08);
        let user = mode2_user_data(&sector);
        assert_eq!(user.len(), CD_MODE2_SIZE);
        assert_eq!(user[2], 0x08);
        assert!(has_sync(&sector));
        assert!(is_mode2(&sector));
    }
}
