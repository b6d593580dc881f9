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

    src/structure_parsers/scsi_inquiry.rs

    Decoder for the standard SCSI INQUIRY response.
*/

use crate::util::ascii_field;
use binrw::{binrw, BinRead};
use std::io::Cursor;

/// The minimum length of a standard INQUIRY response that carries identification strings.
pub const INQUIRY_MIN_SIZE: usize = 36;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PeripheralDeviceType {
    DirectAccess,
    SequentialAccess,
    Printer,
    Processor,
    WriteOnce,
    MultiMedia,
    Scanner,
    OpticalMemory,
    MediumChanger,
    Communications,
    ArrayController,
    EnclosureServices,
    SimplifiedDirectAccess,
    OpticalCardReader,
    Bridging,
    Object,
    Other(u8),
}

impl From<u8> for PeripheralDeviceType {
    fn from(value: u8) -> Self {
        match value & 0x1F {
            0x00 => PeripheralDeviceType::DirectAccess,
            0x01 => PeripheralDeviceType::SequentialAccess,
            0x02 => PeripheralDeviceType::Printer,
            0x03 => PeripheralDeviceType::Processor,
            0x04 => PeripheralDeviceType::WriteOnce,
            0x05 => PeripheralDeviceType::MultiMedia,
            0x06 => PeripheralDeviceType::Scanner,
            0x07 => PeripheralDeviceType::OpticalMemory,
            0x08 => PeripheralDeviceType::MediumChanger,
            0x09 => PeripheralDeviceType::Communications,
            0x0C => PeripheralDeviceType::ArrayController,
            0x0D => PeripheralDeviceType::EnclosureServices,
            0x0E => PeripheralDeviceType::SimplifiedDirectAccess,
            0x0F => PeripheralDeviceType::OpticalCardReader,
            0x10 => PeripheralDeviceType::Bridging,
            0x11 => PeripheralDeviceType::Object,
            other => PeripheralDeviceType::Other(other),
        }
    }
}

#[derive(Debug)]
#[binrw]
#[brw(big)]
pub struct Inquiry {
    peripheral: u8,                  // Qualifier (bits 7-5) and device type (bits 4-0)
    removable: u8,                   // RMB in bit 7
    pub version: u8,
    response_data_format: u8,
    additional_length: u8,
    flags: [u8; 3],
    vendor_identification: [u8; 8],
    product_identification: [u8; 16],
    product_revision_level: [u8; 4],
}

impl Inquiry {
    /// Decode a standard INQUIRY response. Returns `None` if the buffer is too short.
    pub fn decode(data: &[u8]) -> Option<Inquiry> {
        if data.len() < INQUIRY_MIN_SIZE {
            log::debug!("Inquiry::decode(): Buffer too short: {} bytes", data.len());
            return None;
        }
        Inquiry::read(&mut Cursor::new(data)).ok()
    }

    pub fn device_type(&self) -> PeripheralDeviceType {
        PeripheralDeviceType::from(self.peripheral)
    }

    pub fn is_removable(&self) -> bool {
        self.removable & 0x80 != 0
    }

    pub fn vendor(&self) -> Option<String> {
        ascii_field(&self.vendor_identification)
    }

    pub fn product(&self) -> Option<String> {
        ascii_field(&self.product_identification)
    }

    pub fn revision(&self) -> Option<String> {
        ascii_field(&self.product_revision_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inquiry_decode() {
        let mut buf = vec![0u8; 36];
        buf[0] = 0x00;
        buf[1] = 0x80;
        buf[8..16].copy_from_slice(b"IOMEGA  ");
        buf[16..32].copy_from_slice(b"ZIP 100         ");
        buf[32..36].copy_from_slice(b"D.13");

        let inquiry = Inquiry::decode(&buf).unwrap();
        assert_eq!(inquiry.device_type(), PeripheralDeviceType::DirectAccess);
        assert!(inquiry.is_removable());
        assert_eq!(inquiry.vendor().as_deref(), Some("IOMEGA"));
        assert_eq!(inquiry.product().as_deref(), Some("ZIP 100"));
        assert_eq!(inquiry.revision().as_deref(), Some("D.13"));

        buf[0] = 0x07;
        assert_eq!(Inquiry::decode(&buf).unwrap().device_type(), PeripheralDeviceType::OpticalMemory);
        assert!(Inquiry::decode(&buf[..20]).is_none());
    }
}
