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

    src/types/tags.rs

    Defines the closed taxonomy of disk-level and sector-level tags.
*/

//! Every tag names a fixed-format binary blob. A [MediaTagType] describes a whole-disk structure,
//! usually a response captured from the drive while dumping (a SCSI INQUIRY response, a DVD
//! Physical Format Information structure, an MMC card register). A [SectorTagType] describes a
//! component stored alongside, or inside, every physical sector.

use std::fmt::{self, Display, Formatter};

/// Whole-disk tags. At most one blob of each type may be associated with an image.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MediaTagType {
    /// CD table of contents (READ TOC format 0000b).
    CdToc,
    /// CD session information (READ TOC format 0001b).
    CdSessionInfo,
    /// CD full table of contents, including lead-in Q subchannel (READ TOC format 0010b).
    CdFullToc,
    /// CD Program Memory Area.
    CdPma,
    /// CD Absolute Time In Pre-groove, present only on recordable media.
    CdAtip,
    /// CD-TEXT from the lead-in.
    CdText,
    /// CD Media Catalogue Number.
    CdMcn,
    /// DVD Physical Format Information.
    DvdPfi,
    /// DVD Copyright Management Information.
    DvdCmi,
    DvdDiscKey,
    /// DVD Burst Cutting Area.
    DvdBca,
    /// DVD Disc Manufacturing Information.
    DvdDmi,
    /// DVD media identifier.
    DvdMediaIdentifier,
    /// DVD media key block.
    DvdMkb,
    /// DVD-RAM Disc Definition Structure.
    DvdRamDds,
    DvdRamMediumStatus,
    /// DVD-RAM Spare Area Information.
    DvdRamSpareArea,
    /// DVD-R Recording Management Data.
    DvdrRmd,
    DvdrPreRecordedInfo,
    DvdrMediaIdentifier,
    DvdrPfi,
    /// DVD+R/+RW Address In Pre-groove.
    DvdAdip,
    /// HD DVD copy protection information.
    HdDvdCpi,
    HdDvdMediumStatus,
    DvdDlLayerCapacity,
    DvdDlMiddleZoneAddress,
    DvdDlJumpIntervalSize,
    DvdDlManualLayerJumpLba,
    /// Blu-ray Disc Information.
    BdDi,
    /// Blu-ray Burst Cutting Area.
    BdBca,
    /// Blu-ray Disc Definition Structure.
    BdDds,
    BdCartridgeStatus,
    /// Blu-ray Spare Area Information.
    BdSpareArea,
    AacsVolumeIdentifier,
    AacsSerialNumber,
    AacsMediaIdentifier,
    AacsMkb,
    AacsDataKeys,
    AacsLbaExtents,
    AacsCprmMkb,
    HybridRecognizedLayers,
    MmcWriteProtection,
    MmcDiscInformation,
    MmcTrackResourcesInformation,
    MmcPowResourcesInformation,
    /// SCSI standard INQUIRY response.
    ScsiInquiry,
    /// SCSI MODE PAGE 2Ah (CD/DVD capabilities).
    ScsiModePage2A,
    /// ATA IDENTIFY DEVICE response.
    AtaIdentify,
    /// ATA IDENTIFY PACKET DEVICE response.
    AtapiIdentify,
    /// PCMCIA Card Information Structure.
    PcmciaCis,
    /// SecureDigital Card Identification register.
    SdCid,
    /// SecureDigital Card Specific Data register.
    SdCsd,
    /// SecureDigital Configuration register.
    SdScr,
    /// SecureDigital Operation Conditions register.
    SdOcr,
    /// MultiMediaCard Card Identification register.
    MmcCid,
    /// MultiMediaCard Card Specific Data register.
    MmcCsd,
    /// MultiMediaCard Operation Conditions register.
    MmcOcr,
    /// MultiMediaCard Extended Card Specific Data register.
    MmcExtendedCsd,
    XboxSecuritySector,
    /// Lead-out area of a floppy or unidentified medium.
    FloppyLeadOut,
    /// DVD Disc Control Blocks.
    Dcb,
    CdFirstTrackPregap,
    CdLeadOut,
    /// SCSI MODE SENSE (6) response.
    ScsiModeSense6,
    /// SCSI MODE SENSE (10) response.
    ScsiModeSense10,
    /// USB descriptors of the dumping device.
    UsbDescriptors,
    XboxDmi,
    XboxPfi,
    CdLeadIn,
    MiniDiscType,
    MiniDiscD5,
    MiniDiscUtoc,
    MiniDiscDtoc,
    DvdDiscKeyDecrypted,
}

impl Display for MediaTagType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Per-sector tags.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SectorTagType {
    /// Apple's GCR sector tags, 12 bytes.
    AppleSectorTag,
    /// Sync frame of a raw CD sector, 12 bytes.
    CdSectorSync,
    /// CD sector header (MSF address and mode), 4 bytes.
    CdSectorHeader,
    /// CD Mode 2 sector sub-header, 8 bytes.
    CdSectorSubHeader,
    /// CD sector Error Detection Code, 4 bytes.
    CdSectorEdc,
    /// CD sector P parity, 172 bytes.
    CdSectorEccP,
    /// CD sector Q parity, 104 bytes.
    CdSectorEccQ,
    /// CD sector P and Q parity, 276 bytes.
    CdSectorEcc,
    /// Interleaved subchannel, 96 bytes.
    CdSectorSubchannel,
    /// Track ISRC, 12 ASCII characters.
    CdTrackIsrc,
    /// Track CD-TEXT.
    CdTrackText,
    /// Track flags (the control nibble of the Q subchannel), 1 byte.
    CdTrackFlags,
    DvdSectorCmi,
    FloppyAddressMark,
    DvdSectorTitleKey,
    DvdTitleKeyDecrypted,
    DvdSectorInformation,
    DvdSectorNumber,
    DvdSectorIed,
    DvdSectorEdc,
}

impl Display for SectorTagType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl SectorTagType {
    /// Return true if this tag is one of the components of a raw CD sector.
    pub fn is_cd_sector_component(&self) -> bool {
        matches!(
            self,
            SectorTagType::CdSectorSync
                | SectorTagType::CdSectorHeader
                | SectorTagType::CdSectorSubHeader
                | SectorTagType::CdSectorEdc
                | SectorTagType::CdSectorEccP
                | SectorTagType::CdSectorEccQ
                | SectorTagType::CdSectorEcc
                | SectorTagType::CdSectorSubchannel
        )
    }
}

/// Parse a tag name as printed by its `Display` implementation, ignoring case.
/// Used by utilities that accept a tag name on the command line.
pub fn sector_tag_from_str(s: &str) -> Option<SectorTagType> {
    use strum::IntoEnumIterator;
    SectorTagType::iter().find(|t| t.to_string().eq_ignore_ascii_case(s))
}

/// Parse a media tag name as printed by its `Display` implementation, ignoring case.
pub fn media_tag_from_str(s: &str) -> Option<MediaTagType> {
    use strum::IntoEnumIterator;
    MediaTagType::iter().find(|t| t.to_string().eq_ignore_ascii_case(s))
}
