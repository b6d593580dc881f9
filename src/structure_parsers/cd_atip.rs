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

    src/structure_parsers/cd_atip.rs

    Decoder for the CD Absolute Time In Pre-groove (ATIP) structure.
*/

use binrw::{binrw, BinRead};
use std::io::Cursor;

/// Valid ATIP response lengths, without and with the A1-A3 fields.
pub const ATIP_SIZES: [usize; 2] = [28, 32];

#[derive(Debug)]
#[binrw]
#[brw(big)]
struct AtipRaw {
    data_length: u16,
    reserved: [u8; 2],
    writing_power: u8,   // Indicative target writing power (bits 6-4), reference speed (bits 2-0)
    flags1: u8,          // URU in bit 6
    disc_type_flags: u8, // Disc type in bit 6, disc sub-type in bits 5-3, A1/A2/A3 valid in bits 2-0
    reserved2: u8,
    lead_in_start: [u8; 3],
    reserved3: u8,
    last_lead_out: [u8; 3],
}

/// A minute/second/frame address.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Msf {
    pub minute: u8,
    pub second: u8,
    pub frame: u8,
}

impl From<[u8; 3]> for Msf {
    fn from(b: [u8; 3]) -> Self {
        Msf {
            minute: b[0],
            second: b[1],
            frame: b[2],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Atip {
    /// Set for CD-RW media, clear for CD-R media.
    pub rewritable: bool,
    pub disc_sub_type: u8,
    pub lead_in_start: Msf,
    pub last_lead_out: Msf,
}

impl Atip {
    pub fn decode(data: &[u8]) -> Option<Atip> {
        if !ATIP_SIZES.contains(&data.len()) {
            log::debug!("Atip::decode(): Unexpected ATIP length: {}", data.len());
            return None;
        }
        let raw = AtipRaw::read(&mut Cursor::new(data)).ok()?;

        Some(Atip {
            rewritable: raw.disc_type_flags & 0x40 != 0,
            disc_sub_type: (raw.disc_type_flags >> 3) & 0x07,
            lead_in_start: Msf::from(raw.lead_in_start),
            last_lead_out: Msf::from(raw.last_lead_out),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atip_disc_type() {
        let mut atip = vec![0u8; 28];
        atip[6] = 0x80 | 0x40;
        atip[8..11].copy_from_slice(&[97, 26, 66]);
        let decoded = Atip::decode(&atip).unwrap();
        assert!(decoded.rewritable);
        assert_eq!(decoded.lead_in_start, Msf { minute: 97, second: 26, frame: 66 });

        atip[6] = 0x80;
        assert!(!Atip::decode(&atip).unwrap().rewritable);
        assert!(Atip::decode(&atip[..24]).is_none());
    }
}
