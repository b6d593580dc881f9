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

    src/structure_parsers/bd_di.rs

    Decoder for the first unit of the Blu-ray Disc Information structure.
*/

use binrw::{binrw, BinRead};
use std::io::Cursor;

pub const DI_SIGNATURE: [u8; 2] = *b"DI";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BdDiscType {
    Rom,
    Recordable,
    Rewritable,
    Unknown,
}

#[derive(Debug)]
#[binrw]
#[brw(big)]
pub struct DiscInformationUnit {
    #[brw(pad_before = 4)] // Response header
    pub signature: [u8; 2],
    pub format: u8,
    pub units_per_block: u8,
    reserved: u8,
    pub sequence_number: u8,
    pub bytes_in_unit: u8,
    reserved2: u8,
    pub disc_type_identifier: [u8; 3],
}

impl DiscInformationUnit {
    pub fn decode(data: &[u8]) -> Option<DiscInformationUnit> {
        let unit = DiscInformationUnit::read(&mut Cursor::new(data)).ok()?;
        if unit.signature != DI_SIGNATURE {
            log::debug!("DiscInformationUnit::decode(): Bad signature: {:02X?}", unit.signature);
            return None;
        }
        Some(unit)
    }

    pub fn disc_type(&self) -> BdDiscType {
        match &self.disc_type_identifier {
            b"BDO" => BdDiscType::Rom,
            b"BDR" => BdDiscType::Recordable,
            b"BDW" => BdDiscType::Rewritable,
            _ => BdDiscType::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_di_disc_type() {
        let mut di = vec![0u8; 4100];
        di[4..6].copy_from_slice(b"DI");
        di[12..15].copy_from_slice(b"BDW");
        let unit = DiscInformationUnit::decode(&di).unwrap();
        assert_eq!(unit.disc_type(), BdDiscType::Rewritable);

        di[12..15].copy_from_slice(b"BDO");
        assert_eq!(DiscInformationUnit::decode(&di).unwrap().disc_type(), BdDiscType::Rom);

        di[4] = b'X';
        assert!(DiscInformationUnit::decode(&di).is_none());
    }
}
