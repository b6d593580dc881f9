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

    src/inference/device.rs

    Refinement of the media classification and geometry from the descriptors
    of the device an image was dumped with: SCSI INQUIRY and MODE SENSE, or
    ATA IDENTIFY DEVICE.
*/

use crate::{
    inference::geometry::geometry_for,
    sidecar::SidecarTagStore,
    structure_parsers::{
        ata::IdentifyDevice,
        scsi_inquiry::{Inquiry, PeripheralDeviceType},
        scsi_modes::ModeSense,
    },
    types::{image_info::ImageInfo, media_type::MediaType, tags::MediaTagType},
};

/// A device characteristic rule. Every condition that is set must match.
#[derive(Copy, Clone, Debug)]
struct DeviceRule {
    device_type: PeripheralDeviceType,
    medium_type: Option<u8>,
    density: Option<u8>,
    model: Option<&'static str>,
    sector_size: Option<u32>,
    sectors: Option<u64>,
    media_type: MediaType,
}

impl DeviceRule {
    const fn direct(media_type: MediaType) -> Self {
        Self {
            device_type: PeripheralDeviceType::DirectAccess,
            medium_type: None,
            density: None,
            model: None,
            sector_size: None,
            sectors: None,
            media_type,
        }
    }

    const fn optical(media_type: MediaType) -> Self {
        let mut rule = Self::direct(media_type);
        rule.device_type = PeripheralDeviceType::OpticalMemory;
        rule
    }

    const fn medium(mut self, medium_type: u8) -> Self {
        self.medium_type = Some(medium_type);
        self
    }

    const fn density(mut self, density: u8) -> Self {
        self.density = Some(density);
        self
    }

    const fn model(mut self, model: &'static str) -> Self {
        self.model = Some(model);
        self
    }

    const fn size(mut self, sector_size: u32, sectors: u64) -> Self {
        self.sector_size = Some(sector_size);
        self.sectors = Some(sectors);
        self
    }

    const fn sector_size(mut self, sector_size: u32) -> Self {
        self.sector_size = Some(sector_size);
        self
    }

    const fn sectors(mut self, sectors: u64) -> Self {
        self.sectors = Some(sectors);
        self
    }

    fn matches(&self, device: &DeviceCharacteristics) -> bool {
        self.device_type == device.device_type
            && self.medium_type.map_or(true, |m| m == device.medium_type)
            && self.density.map_or(true, |d| d == device.density)
            && self.sector_size.map_or(true, |s| s == device.sector_size)
            && self.sectors.map_or(true, |s| s == device.sectors)
            && self.model.map_or(true, |m| device.model.contains(m))
    }
}

/// Rules are checked in order; the first match wins.
#[rustfmt::skip]
const DEVICE_RULES: [DeviceRule; 51] = [
    // Flexible disks, by SBC medium type code
    DeviceRule::direct(MediaType::ECMA_54).medium(0x05),
    DeviceRule::direct(MediaType::ECMA_59).medium(0x06),
    DeviceRule::direct(MediaType::ECMA_69_8).medium(0x0A).sector_size(1024),
    DeviceRule::direct(MediaType::ECMA_69_15).medium(0x0A).sector_size(512),
    DeviceRule::direct(MediaType::ECMA_69_26).medium(0x0A).sector_size(256),
    DeviceRule::direct(MediaType::ECMA_70).medium(0x12),
    DeviceRule::direct(MediaType::ECMA_78).medium(0x16),
    DeviceRule::direct(MediaType::ECMA_99_8).medium(0x1A).sector_size(1024),
    DeviceRule::direct(MediaType::ECMA_99_15).medium(0x1A).sector_size(512),
    DeviceRule::direct(MediaType::ECMA_99_26).medium(0x1A).sector_size(256),
    DeviceRule::direct(MediaType::DOS_35_SS_DD_9).medium(0x1E).sectors(720),
    DeviceRule::direct(MediaType::DOS_35_DS_DD_9).medium(0x1E),
    DeviceRule::direct(MediaType::DMF).medium(0x94).sectors(3360),
    DeviceRule::direct(MediaType::DOS_35_HD).medium(0x94),

    // Removable cartridges, by product name
    DeviceRule::direct(MediaType::ZIP250).model("ZIP").sectors(489532),
    DeviceRule::direct(MediaType::ZIP750).model("ZIP").sectors(1535805),
    DeviceRule::direct(MediaType::ZIP100).model("ZIP"),
    DeviceRule::direct(MediaType::Jaz).model("JAZ").sectors(2091050),
    DeviceRule::direct(MediaType::Jaz2).model("JAZ"),
    DeviceRule::direct(MediaType::PocketZip).model("CLIK"),
    DeviceRule::direct(MediaType::LS240).model("LS-240"),
    DeviceRule::direct(MediaType::LS120).model("LS-120"),
    DeviceRule::direct(MediaType::LS240).model("SUPERDISK").sectors(469504),
    DeviceRule::direct(MediaType::LS120).model("SUPERDISK"),
    DeviceRule::direct(MediaType::HiFD).model("HIFD"),
    DeviceRule::direct(MediaType::SyJet).model("SYJET"),
    DeviceRule::direct(MediaType::EZ135).model("EZ135"),
    DeviceRule::direct(MediaType::EZ230).model("EZ230"),
    DeviceRule::direct(MediaType::SparQ).model("SPARQ"),
    DeviceRule::direct(MediaType::Orb).model("ORB"),
    DeviceRule::direct(MediaType::REV35).model("REV").sectors(68_717_056),

    // Flexible disks in USB and ATAPI drives, by capacity
    DeviceRule::direct(MediaType::DOS_35_HD).size(512, 2880),
    DeviceRule::direct(MediaType::DOS_35_DS_DD_9).size(512, 1440),
    DeviceRule::direct(MediaType::DMF).size(512, 3360),
    DeviceRule::direct(MediaType::DOS_35_ED).size(512, 5760),
    DeviceRule::direct(MediaType::DOS_525_HD).size(512, 2400),
    DeviceRule::direct(MediaType::NEC_525_HD).size(1024, 1232),
    DeviceRule::direct(MediaType::LS120).size(512, 246528),
    DeviceRule::direct(MediaType::ZIP100).size(512, 196608),

    // Magneto-optical discs, by density code
    DeviceRule::optical(MediaType::ECMA_154).density(0x01),
    DeviceRule::optical(MediaType::ECMA_183_512).density(0x02).sector_size(512),
    DeviceRule::optical(MediaType::ECMA_183).density(0x02),
    DeviceRule::optical(MediaType::ECMA_184_512).density(0x03).sector_size(512),
    DeviceRule::optical(MediaType::ECMA_184).density(0x03),
    DeviceRule::optical(MediaType::ECMA_201).density(0x06),
    DeviceRule::optical(MediaType::ECMA_195_512).density(0x07).sector_size(512),
    DeviceRule::optical(MediaType::ECMA_195).density(0x07),
    DeviceRule::optical(MediaType::ECMA_223_512).density(0x09).sector_size(512),
    DeviceRule::optical(MediaType::ECMA_223).density(0x09),
    DeviceRule::optical(MediaType::ISO_14517_512).density(0x0A).sector_size(512),
    DeviceRule::optical(MediaType::ISO_14517).density(0x0A),
];

/// The device properties a media type is chosen from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceCharacteristics {
    pub device_type: PeripheralDeviceType,
    pub medium_type: u8,
    pub density: u8,
    /// Product identification, upper-cased.
    pub model: String,
    pub sector_size: u32,
    pub sectors: u64,
}

/// Choose a media type from the characteristics of a SCSI device. Multimedia and other device
/// types with no matching rule keep the `current` classification.
pub fn media_type_from_device(device: &DeviceCharacteristics, current: MediaType) -> MediaType {
    if let Some(rule) = DEVICE_RULES.iter().find(|rule| rule.matches(device)) {
        return rule.media_type;
    }
    match device.device_type {
        PeripheralDeviceType::OpticalMemory => MediaType::UnknownMO,
        PeripheralDeviceType::DirectAccess => MediaType::GENERIC_HDD,
        _ => current,
    }
}

/// Refine `info` from SCSI INQUIRY and MODE SENSE sidecars. Returns true if an INQUIRY response
/// was present and decoded.
pub fn refine_from_scsi(info: &mut ImageInfo, tags: &SidecarTagStore) -> bool {
    let Some(inquiry) = tags.get(MediaTagType::ScsiInquiry).and_then(Inquiry::decode) else {
        return false;
    };

    let vendor = inquiry.vendor();
    let product = inquiry.product();
    log::debug!(
        "refine_from_scsi(): {:?} device, vendor {:?} product {:?}",
        inquiry.device_type(),
        vendor,
        product
    );
    if vendor.is_some() {
        info.drive_manufacturer = vendor;
    }
    if product.is_some() {
        info.drive_model = product.clone();
    }
    if let Some(revision) = inquiry.revision() {
        info.drive_firmware_revision = Some(revision);
    }

    // MODE SENSE (6) is preferred when both responses were captured.
    let mode = tags
        .get(MediaTagType::ScsiModeSense6)
        .and_then(ModeSense::decode6)
        .or_else(|| tags.get(MediaTagType::ScsiModeSense10).and_then(ModeSense::decode10));

    let device_type = match inquiry.device_type() {
        PeripheralDeviceType::SimplifiedDirectAccess => PeripheralDeviceType::DirectAccess,
        other => other,
    };
    let device = DeviceCharacteristics {
        device_type,
        medium_type: mode.as_ref().map_or(0, |m| m.medium_type),
        density: mode.as_ref().and_then(|m| m.density()).unwrap_or(0),
        model: product.unwrap_or_default().to_uppercase(),
        sector_size: info.sector_size,
        sectors: info.sectors,
    };

    let media_type = media_type_from_device(&device, info.media_type);
    if media_type != info.media_type {
        log::debug!("refine_from_scsi(): {} -> {}", info.media_type, media_type);
        info.media_type = media_type;
        let geometry = geometry_for(media_type, info.sectors);
        (info.cylinders, info.heads, info.sectors_per_track) = geometry.get();
    }

    if let Some(mode) = mode {
        if let Some(page) = mode.flexible_disk_page() {
            if page.cylinders > 0 && page.heads > 0 && page.sectors_per_track > 0 {
                info.cylinders = page.cylinders as u32;
                info.heads = page.heads as u32;
                info.sectors_per_track = page.sectors_per_track as u32;
            }
        }
        else if let Some(page) = mode.rigid_disk_page() {
            let (cylinders, heads) = (page.cylinders(), page.heads as u32);
            if cylinders > 0 && heads > 0 {
                info.cylinders = cylinders;
                info.heads = heads;
                info.sectors_per_track = u32::try_from(info.sectors / (cylinders as u64 * heads as u64))
                    .unwrap_or(u32::MAX);
            }
        }
    }
    true
}

/// Refine `info` from an ATA IDENTIFY DEVICE sidecar. Returns true if one was present and decoded.
pub fn refine_from_ata(info: &mut ImageInfo, tags: &SidecarTagStore) -> bool {
    let Some(identify) = tags.get(MediaTagType::AtaIdentify).and_then(IdentifyDevice::decode) else {
        return false;
    };

    info.media_type = match identify.is_compact_flash() {
        true => MediaType::CompactFlash,
        false => MediaType::GENERIC_HDD,
    };
    log::debug!("refine_from_ata(): ATA device, media type {}", info.media_type);

    if let Some(chs) = identify.geometry() {
        (info.cylinders, info.heads, info.sectors_per_track) = chs.get();
    }
    if let Some(model) = identify.model() {
        info.drive_model = Some(model);
    }
    if let Some(serial) = identify.serial_number() {
        info.drive_serial_number = Some(serial);
    }
    if let Some(firmware) = identify.firmware_revision() {
        info.drive_firmware_revision = Some(firmware);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(
        device_type: PeripheralDeviceType,
        medium_type: u8,
        density: u8,
        model: &str,
        sector_size: u32,
        sectors: u64,
    ) -> DeviceCharacteristics {
        DeviceCharacteristics {
            device_type,
            medium_type,
            density,
            model: model.to_string(),
            sector_size,
            sectors,
        }
    }

    #[test]
    fn test_device_rules() {
        use PeripheralDeviceType::*;
        let current = MediaType::CD;

        assert_eq!(
            media_type_from_device(&device(DirectAccess, 0x94, 0, "USB FLOPPY", 512, 2880), current),
            MediaType::DOS_35_HD
        );
        assert_eq!(
            media_type_from_device(&device(DirectAccess, 0x1A, 0, "", 256, 4004), current),
            MediaType::ECMA_99_26
        );
        assert_eq!(
            media_type_from_device(&device(DirectAccess, 0, 0, "ZIP 100", 512, 196608), current),
            MediaType::ZIP100
        );
        assert_eq!(
            media_type_from_device(&device(DirectAccess, 0, 0, "ZIP 250", 512, 489532), current),
            MediaType::ZIP250
        );
        assert_eq!(
            media_type_from_device(&device(OpticalMemory, 0, 0x02, "", 512, 1000), current),
            MediaType::ECMA_183_512
        );
        assert_eq!(
            media_type_from_device(&device(OpticalMemory, 0, 0x55, "", 512, 1000), current),
            MediaType::UnknownMO
        );
        assert_eq!(
            media_type_from_device(&device(DirectAccess, 0, 0, "HARD DISK", 512, 1000), current),
            MediaType::GENERIC_HDD
        );
        assert_eq!(
            media_type_from_device(&device(MultiMedia, 0, 0, "DVD-ROM", 2048, 1000), current),
            MediaType::CD
        );
    }
}
