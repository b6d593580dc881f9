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

    src/inference/promotion.rs

    The sidecar promotion chain. Companion tag files refine the base media
    classification, and some generic tags are renamed to the family-specific
    tag they turn out to be once the media family is known.

    Promotion is idempotent: promoting an already-promoted tag store from the
    same base classification yields the same media type and the same store.
*/

use crate::{
    sidecar::SidecarTagStore,
    structure_parsers::{
        bd_di::{BdDiscType, DiscInformationUnit},
        cd_atip::Atip,
        dvd_dmi,
        dvd_pfi::{DiskCategory, DvdSize, PhysicalFormatInformation},
    },
    types::{media_type::MediaType, tags::MediaTagType},
};

/// Sector counts of Xbox 360 discs mastered in the third disc format.
const XGD3_SECTOR_COUNTS: [u64; 3] = [25063, 4229664, 4246304];
/// Double density CD media hold more sectors than a regular CD can.
const DDCD_THRESHOLD: u64 = 360_000;

const SD_TAGS: [MediaTagType; 3] = [MediaTagType::SdCid, MediaTagType::SdCsd, MediaTagType::SdOcr];
const MMC_TAGS: [MediaTagType; 3] = [MediaTagType::MmcCid, MediaTagType::MmcCsd, MediaTagType::MmcOcr];
#[rustfmt::skip]
const SD_TO_MMC: [(MediaTagType, MediaTagType); 3] = [
    (MediaTagType::SdCid, MediaTagType::MmcCid),
    (MediaTagType::SdCsd, MediaTagType::MmcCsd),
    (MediaTagType::SdOcr, MediaTagType::MmcOcr),
];

/// Media families that sidecar tags can identify. An image carries tags of at most one family.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TagFamily {
    BluRay,
    Dvd,
    FlashCard,
    CompactDisc,
}

/// Return the media families present in a tag store.
pub fn tag_families(tags: &SidecarTagStore) -> Vec<TagFamily> {
    let mut families = Vec::new();
    if tags.contains(MediaTagType::BdDi) {
        families.push(TagFamily::BluRay);
    }
    if tags.contains(MediaTagType::DvdPfi) || tags.contains(MediaTagType::DvdDmi) {
        families.push(TagFamily::Dvd);
    }
    if SD_TAGS.iter().chain(MMC_TAGS.iter()).any(|t| tags.contains(*t)) {
        families.push(TagFamily::FlashCard);
    }
    if tags.contains(MediaTagType::CdFullToc) || tags.contains(MediaTagType::CdAtip) {
        families.push(TagFamily::CompactDisc);
    }
    families
}

/// Run the promotion chain over `tags`, starting from the base classification `media_type` of
/// an image of `sectors` sectors. Returns the promoted media type.
pub fn promote(media_type: MediaType, sectors: u64, tags: &mut SidecarTagStore) -> MediaType {
    let families = tag_families(tags);
    if families.len() > 1 {
        log::error!(
            "promote(): Sidecar tags of conflicting media families present: {:?}",
            families
        );
        debug_assert!(false, "conflicting sidecar media families: {:?}", families);
    }

    let mut media_type = media_type;

    // An IDENTIFY response alongside an INQUIRY response came from an ATAPI device.
    if tags.contains(MediaTagType::ScsiInquiry)
        && tags.rename(MediaTagType::AtaIdentify, MediaTagType::AtapiIdentify)
    {
        log::debug!("promote(): IDENTIFY is from an ATAPI device");
    }

    if let Some(promoted) = promote_bd(tags) {
        media_type = promoted;
    }
    if let Some(promoted) = promote_dvd(tags, sectors) {
        media_type = promoted;
    }
    if let Some(promoted) = promote_flash_card(tags) {
        media_type = promoted;
    }
    media_type = promote_cd(media_type, sectors, tags);

    log::debug!("promote(): Promoted media type: {}", media_type);
    media_type
}

fn promote_bd(tags: &mut SidecarTagStore) -> Option<MediaType> {
    let di = tags.get(MediaTagType::BdDi)?;

    let mut media_type = match DiscInformationUnit::decode(di).map(|unit| unit.disc_type()) {
        Some(BdDiscType::Recordable) => MediaType::BDR,
        Some(BdDiscType::Rewritable) => MediaType::BDRE,
        _ => MediaType::BDROM,
    };

    tags.rename(MediaTagType::DvdBca, MediaTagType::BdBca);
    tags.rename(MediaTagType::DvdRamDds, MediaTagType::BdDds);
    tags.rename(MediaTagType::DvdRamSpareArea, MediaTagType::BdSpareArea);

    // Defect management structures only exist on rewritable media.
    if tags.contains(MediaTagType::BdDds) || tags.contains(MediaTagType::BdSpareArea) {
        media_type = MediaType::BDRE;
    }
    Some(media_type)
}

/// Classify a DVD from its physical format information.
pub fn dvd_type_from_pfi(pfi: &PhysicalFormatInformation) -> MediaType {
    match pfi.disk_category {
        DiskCategory::DvdRom => MediaType::DVDROM,
        DiskCategory::DvdRam => MediaType::DVDRAM,
        DiskCategory::DvdR if pfi.part_version >= 6 => MediaType::DVDRDL,
        DiskCategory::DvdR => MediaType::DVDR,
        DiskCategory::DvdRw if pfi.part_version >= 15 => MediaType::DVDRWDL,
        DiskCategory::DvdRw => MediaType::DVDRW,
        DiskCategory::HdDvdRom => MediaType::HDDVDROM,
        DiskCategory::HdDvdRam => MediaType::HDDVDRAM,
        DiskCategory::HdDvdR => MediaType::HDDVDR,
        DiskCategory::HdDvdRw => MediaType::HDDVDRW,
        DiskCategory::Umd => MediaType::UMD,
        DiskCategory::DvdPlusRw => MediaType::DVDPRW,
        DiskCategory::DvdPlusR => MediaType::DVDPR,
        DiskCategory::DvdPlusRwDl => MediaType::DVDPRWDL,
        DiskCategory::DvdPlusRDl => MediaType::DVDPRDL,
        DiskCategory::Nintendo if pfi.disc_size == DvdSize::Eighty => MediaType::GOD,
        DiskCategory::Nintendo => MediaType::WOD,
        DiskCategory::Reserved(_) => MediaType::DVDROM,
    }
}

fn promote_dvd(tags: &mut SidecarTagStore, sectors: u64) -> Option<MediaType> {
    let mut promoted = None;

    if let Some(pfi) = tags.get(MediaTagType::DvdPfi).and_then(PhysicalFormatInformation::decode) {
        let media_type = dvd_type_from_pfi(&pfi);
        log::debug!(
            "promote_dvd(): PFI category {:?} part version {} -> {}",
            pfi.disk_category,
            pfi.part_version,
            media_type
        );
        if media_type.is_recordable_dvd() {
            tags.rename(MediaTagType::DvdMediaIdentifier, MediaTagType::DvdrMediaIdentifier);
        }
        promoted = Some(media_type);
    }

    if let Some(dmi) = tags.get(MediaTagType::DvdDmi) {
        if dvd_dmi::is_xbox(dmi) {
            promoted = Some(MediaType::XGD);
        }
        else if dvd_dmi::is_xbox_360(dmi) {
            promoted = Some(match XGD3_SECTOR_COUNTS.contains(&sectors) {
                true => MediaType::XGD3,
                false => MediaType::XGD2,
            });
        }
    }
    promoted
}

fn promote_flash_card(tags: &mut SidecarTagStore) -> Option<MediaType> {
    let has_sd = SD_TAGS.iter().any(|t| tags.contains(*t));
    let has_mmc = MMC_TAGS.iter().any(|t| tags.contains(*t));

    if !has_sd {
        // Already promoted by an earlier pass.
        return has_mmc.then_some(MediaType::MMC);
    }

    if tags.contains(MediaTagType::MmcExtendedCsd) || !tags.contains(MediaTagType::SdScr) {
        for (sd, mmc) in SD_TO_MMC {
            tags.rename(sd, mmc);
        }
        Some(MediaType::MMC)
    }
    else {
        Some(MediaType::SecureDigital)
    }
}

fn promote_cd(media_type: MediaType, sectors: u64, tags: &mut SidecarTagStore) -> MediaType {
    let double_density = sectors > DDCD_THRESHOLD;
    let mut media_type = media_type;

    if tags.contains(MediaTagType::CdFullToc) {
        media_type = match double_density {
            true => MediaType::DDCD,
            false => MediaType::CD,
        };
    }

    if !media_type.is_cd_family() {
        return media_type;
    }

    if let Some(atip) = tags.get(MediaTagType::CdAtip).and_then(Atip::decode) {
        media_type = match (atip.rewritable, double_density) {
            (true, true) => MediaType::DDCDRW,
            (true, false) => MediaType::CDRW,
            (false, true) => MediaType::DDCDR,
            (false, false) => MediaType::CDR,
        };
    }
    tags.rename(MediaTagType::FloppyLeadOut, MediaTagType::CdLeadOut);
    media_type
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure_parsers::{dvd_dmi::DMI_SIZE, dvd_pfi::PFI_SIZE};

    fn pfi(category_version: u8, size: u8) -> Vec<u8> {
        let mut pfi = vec![0u8; PFI_SIZE];
        pfi[4] = category_version;
        pfi[5] = size;
        pfi
    }

    fn atip(rewritable: bool) -> Vec<u8> {
        let mut atip = vec![0u8; 28];
        atip[6] = 0x80 | if rewritable { 0x40 } else { 0 };
        atip
    }

    fn promote_twice(media_type: MediaType, sectors: u64, tags: &mut SidecarTagStore) -> MediaType {
        let first = promote(media_type, sectors, tags);
        let snapshot = tags.clone();
        let second = promote(media_type, sectors, tags);
        assert_eq!(first, second, "promotion is not idempotent");
        assert_eq!(&snapshot, tags, "promotion changed an already-promoted store");
        first
    }

    #[test]
    fn test_atapi_identify() {
        let mut tags = SidecarTagStore::new();
        tags.insert(MediaTagType::AtaIdentify, vec![0; 512]);
        assert_eq!(promote_twice(MediaType::GENERIC_HDD, 100, &mut tags), MediaType::GENERIC_HDD);
        assert!(tags.contains(MediaTagType::AtaIdentify));

        tags.insert(MediaTagType::ScsiInquiry, vec![0; 36]);
        promote_twice(MediaType::GENERIC_HDD, 100, &mut tags);
        assert!(!tags.contains(MediaTagType::AtaIdentify));
        assert!(tags.contains(MediaTagType::AtapiIdentify));
    }

    #[test]
    fn test_bd_promotion() {
        let mut tags = SidecarTagStore::new();
        tags.insert(MediaTagType::BdDi, vec![0; 64]);
        tags.insert(MediaTagType::DvdBca, vec![1; 64]);
        assert_eq!(promote_twice(MediaType::BDR, 1000, &mut tags), MediaType::BDROM);
        assert!(tags.contains(MediaTagType::BdBca));
        assert!(!tags.contains(MediaTagType::DvdBca));

        tags.insert(MediaTagType::DvdRamDds, vec![2; 64]);
        assert_eq!(promote_twice(MediaType::BDR, 1000, &mut tags), MediaType::BDRE);
        assert!(tags.contains(MediaTagType::BdDds));

        let mut tags = SidecarTagStore::new();
        let mut di = vec![0u8; 64];
        di[4..6].copy_from_slice(b"DI");
        di[12..15].copy_from_slice(b"BDR");
        tags.insert(MediaTagType::BdDi, di);
        assert_eq!(promote_twice(MediaType::BDR, 1000, &mut tags), MediaType::BDR);
    }

    #[test]
    fn test_dvd_pfi_promotion() {
        let cases = [
            (0x01, 0x00, MediaType::DVDRAM),
            (0x25, 0x00, MediaType::DVDR),
            (0x26, 0x00, MediaType::DVDRDL),
            (0x32, 0x00, MediaType::DVDRW),
            (0x3F, 0x00, MediaType::DVDRWDL),
            (0xA0, 0x00, MediaType::DVDPR),
            (0xE0, 0x00, MediaType::DVDPRDL),
            (0x80, 0x00, MediaType::UMD),
            (0xF0, 0x10, MediaType::GOD),
            (0xF0, 0x00, MediaType::WOD),
            (0xB0, 0x00, MediaType::DVDROM),
        ];
        for (category, size, expected) in cases {
            let mut tags = SidecarTagStore::new();
            tags.insert(MediaTagType::DvdPfi, pfi(category, size));
            tags.insert(MediaTagType::DvdMediaIdentifier, vec![0; 16]);
            assert_eq!(promote_twice(MediaType::CD, 1000, &mut tags), expected);
            assert_eq!(
                tags.contains(MediaTagType::DvdrMediaIdentifier),
                expected.is_recordable_dvd(),
                "{}",
                expected
            );
        }
    }

    #[test]
    fn test_xbox_promotion() {
        let mut dmi = vec![0u8; DMI_SIZE];
        dmi[0x7EC..0x7F0].copy_from_slice(b"XBOX");

        let mut tags = SidecarTagStore::new();
        tags.insert(MediaTagType::DvdPfi, pfi(0x01, 0x00));
        tags.insert(MediaTagType::DvdDmi, dmi);
        assert_eq!(promote_twice(MediaType::DVDPR, 1000, &mut tags), MediaType::XGD2);
        assert_eq!(promote_twice(MediaType::DVDPR, 4229664, &mut tags), MediaType::XGD3);
    }

    #[test]
    fn test_flash_card_promotion() {
        let mut tags = SidecarTagStore::new();
        tags.insert(MediaTagType::SdCid, vec![1; 16]);
        tags.insert(MediaTagType::SdScr, vec![2; 8]);
        assert_eq!(promote_twice(MediaType::GENERIC_HDD, 1000, &mut tags), MediaType::SecureDigital);
        assert!(tags.contains(MediaTagType::SdCid));

        let mut tags = SidecarTagStore::new();
        tags.insert(MediaTagType::SdCid, vec![1; 16]);
        tags.insert(MediaTagType::SdCsd, vec![3; 16]);
        assert_eq!(promote_twice(MediaType::GENERIC_HDD, 1000, &mut tags), MediaType::MMC);
        assert!(tags.contains(MediaTagType::MmcCid));
        assert!(tags.contains(MediaTagType::MmcCsd));
        assert!(!tags.contains(MediaTagType::SdCid));

        let mut tags = SidecarTagStore::new();
        tags.insert(MediaTagType::SdOcr, vec![1; 4]);
        tags.insert(MediaTagType::SdScr, vec![2; 8]);
        tags.insert(MediaTagType::MmcExtendedCsd, vec![0; 512]);
        assert_eq!(promote_twice(MediaType::GENERIC_HDD, 1000, &mut tags), MediaType::MMC);
        assert!(tags.contains(MediaTagType::MmcOcr));
    }

    #[test]
    fn test_cd_promotion() {
        let mut tags = SidecarTagStore::new();
        tags.insert(MediaTagType::CdAtip, atip(true));
        assert_eq!(promote_twice(MediaType::CD, 1000, &mut tags), MediaType::CDRW);

        tags.insert(MediaTagType::CdAtip, atip(false));
        tags.insert(MediaTagType::FloppyLeadOut, vec![0; 2352]);
        assert_eq!(promote_twice(MediaType::CD, 1000, &mut tags), MediaType::CDR);
        assert!(tags.contains(MediaTagType::CdLeadOut));

        let mut tags = SidecarTagStore::new();
        tags.insert(MediaTagType::CdFullToc, vec![0; 48]);
        assert_eq!(promote_twice(MediaType::DVDPR, 400_000, &mut tags), MediaType::DDCD);
        assert_eq!(promote_twice(MediaType::GENERIC_HDD, 1000, &mut tags), MediaType::CD);

        // An ATIP without a CD classification is left alone.
        let mut tags = SidecarTagStore::new();
        tags.insert(MediaTagType::CdAtip, atip(true));
        assert_eq!(promote_twice(MediaType::GENERIC_HDD, 1000, &mut tags), MediaType::GENERIC_HDD);
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "conflicting sidecar media families"))]
    fn test_conflicting_families() {
        let mut tags = SidecarTagStore::new();
        tags.insert(MediaTagType::DvdPfi, pfi(0x00, 0x00));
        tags.insert(MediaTagType::CdFullToc, vec![0; 48]);
        // Release builds apply the chain in order, so the CD step wins.
        assert_eq!(promote(MediaType::CD, 1000, &mut tags), MediaType::CD);
    }
}
