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

    src/types/media_type.rs

    Defines the closed enumeration of legacy media designations.

    Variant names follow the established industry designations for each
    medium (standard numbers such as ECMA_99, vendor product names such as
    ZIP100, or DOS-style size/density descriptions such as DOS_35_HD) so
    that they can be matched against preservation metadata verbatim.
*/

use std::fmt::{self, Display, Formatter};

/// A high-level classification of a medium, used by preservation metadata.
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MetadataMediaType {
    #[default]
    BlockMedia,
    OpticalDisc,
}

/// A legacy media designation. A `MediaType` is the output of media classification when an image
/// is opened, and an input when an image is created.
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq, Ord, PartialOrd, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MediaType {
    // Generic
    #[default]
    Unknown,
    /// An unknown magneto-optical disc.
    UnknownMO,
    GENERIC_HDD,
    Microdrive,
    Zone_HDD,
    FlashDrive,
    UnknownTape,

    // Compact Disc family
    CD,
    CDDA,
    CDG,
    CDEG,
    CDI,
    CDROM,
    CDROMXA,
    CDPLUS,
    CDMO,
    CDR,
    CDRW,
    CDMRW,
    VCD,
    SVCD,
    PCD,
    SACD,
    DDCD,
    DDCDR,
    DDCDRW,
    DTSCD,
    CDMIDI,
    CDV,
    PD650,
    PD650_WORM,
    CDIREADY,
    FMTOWNS,
    PS1CD,
    PS2CD,
    GDROM,
    GDR,
    MEGACD,
    SATURNCD,
    ThreeDO,
    SuperCDROM2,
    JaguarCD,
    MilCD,

    // DVD family
    DVDROM,
    DVDR,
    DVDRW,
    DVDPR,
    DVDPRW,
    DVDPRWDL,
    DVDRDL,
    DVDPRDL,
    DVDRAM,
    DVDRWDL,
    DVDDownload,

    // HD DVD family
    HDDVDROM,
    HDDVDRAM,
    HDDVDR,
    HDDVDRW,
    HDDVDRDL,
    HDDVDRWDL,

    // Blu-ray family
    BDROM,
    BDR,
    BDRE,
    BDRXL,
    BDREXL,

    // Console optical media
    /// Nintendo GameCube Optical Disc.
    GOD,
    /// Nintendo Wii Optical Disc.
    WOD,
    /// Nintendo Wii U Optical Disc.
    WUOD,
    /// Sony Universal Media Disc.
    UMD,
    PS2DVD,
    PS3DVD,
    PS3BD,
    PS4BD,
    /// Xbox Game Disc.
    XGD,
    /// Xbox 360 Game Disc.
    XGD2,
    /// Xbox 360 Game Disc, third generation.
    XGD3,
    XGD4,

    // Apple floppies
    Apple32SS,
    Apple32DS,
    Apple33SS,
    Apple33DS,
    AppleSonySS,
    AppleSonyDS,
    AppleFileWare,

    // IBM PC floppies
    DOS_525_SS_DD_8,
    DOS_525_SS_DD_9,
    DOS_525_DS_DD_8,
    DOS_525_DS_DD_9,
    DOS_525_HD,
    DOS_35_SS_DD_8,
    DOS_35_SS_DD_9,
    DOS_35_DS_DD_8,
    DOS_35_DS_DD_9,
    DOS_35_HD,
    DOS_35_ED,
    /// Microsoft Distribution Media Format.
    DMF,
    DMF_82,
    /// IBM eXtended Distribution Format.
    XDF_525,
    XDF_35,

    // IBM 8" floppies
    IBM23FD,
    IBM33FD_128,
    IBM33FD_256,
    IBM33FD_512,
    IBM43FD_128,
    IBM43FD_256,
    IBM53FD_256,
    IBM53FD_512,
    IBM53FD_1024,

    // DEC floppies
    RX01,
    RX02,
    RX03,
    RX50,

    // Acorn floppies
    ACORN_525_SS_SD_40,
    ACORN_525_SS_SD_80,
    ACORN_525_SS_DD_40,
    ACORN_525_SS_DD_80,
    ACORN_525_DS_DD,
    ACORN_35_DS_DD,
    ACORN_35_DS_HD,

    // Atari floppies
    ATARI_525_SD,
    ATARI_525_ED,
    ATARI_525_DD,
    ATARI_35_SS_DD,
    ATARI_35_DS_DD,
    ATARI_35_SS_DD_11,
    ATARI_35_DS_DD_11,

    // Commodore floppies
    CBM_35_DD,
    CBM_AMIGA_35_DD,
    CBM_AMIGA_35_HD,
    CBM_1540,
    CBM_1540_Ext,
    CBM_1571,

    // NEC and Sharp floppies
    NEC_8_SD,
    NEC_8_DD,
    NEC_525_SS,
    NEC_525_DS,
    NEC_525_HD,
    NEC_35_HD_8,
    NEC_35_HD_15,
    NEC_35_TD,
    SHARP_525,
    SHARP_525_9,
    SHARP_35,
    SHARP_35_9,

    // ECMA floppies
    ECMA_54,
    ECMA_59,
    ECMA_66,
    ECMA_69_8,
    ECMA_69_15,
    ECMA_69_26,
    ECMA_70,
    ECMA_78,
    ECMA_78_2,
    ECMA_99_8,
    ECMA_99_15,
    ECMA_99_26,
    ECMA_100,
    ECMA_125,
    ECMA_147,

    // Non-standard PC formats
    FDFORMAT_525_DD,
    FDFORMAT_525_HD,
    FDFORMAT_35_DD,
    FDFORMAT_35_HD,
    Apricot_35,
    /// 32MiB 3.5" floppy emulation used by some flash-based drives.
    FD32MB,

    // Magneto-optical
    ECMA_154,
    ECMA_183_512,
    ECMA_183,
    ECMA_184_512,
    ECMA_184,
    ECMA_189,
    ECMA_190,
    ECMA_195,
    ECMA_195_512,
    ECMA_201,
    ECMA_201_ROM,
    ECMA_223,
    ECMA_223_512,
    ECMA_239,
    ECMA_280,
    ECMA_317,
    ISO_14517,
    ISO_14517_512,
    ISO_15041_512,
    GigaMo,
    GigaMo2,

    // Removable cartridges
    ZIP100,
    ZIP250,
    ZIP750,
    Jaz,
    Jaz2,
    PocketZip,
    LS120,
    LS240,
    HiFD,
    UHD144,
    SQ400,
    SQ800,
    SQ2000,
    SyJet,
    EZ135,
    EZ230,
    SparQ,
    Orb,
    Orb5,
    Bernoulli,
    Bernoulli2,
    REV35,
    REV70,
    REV120,

    // Flash cards
    CompactFlash,
    CompactFlashType2,
    SecureDigital,
    MMC,
    miniSD,
    microSD,
    MemoryStick,
    MemoryStickPro,
    MemoryStickDuo,
    MemoryStickProDuo,
    SmartMedia,
    xD,
    PCCardTypeI,
    PCCardTypeII,
    PCCardTypeIII,
    PCCardTypeIV,
}

impl Display for MediaType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl MediaType {
    /// Return true if this media type belongs to the Compact Disc family.
    pub fn is_cd_family(&self) -> bool {
        use MediaType::*;
        matches!(
            self,
            CD | CDDA
                | CDG
                | CDEG
                | CDI
                | CDROM
                | CDROMXA
                | CDPLUS
                | CDMO
                | CDR
                | CDRW
                | CDMRW
                | VCD
                | SVCD
                | PCD
                | SACD
                | DDCD
                | DDCDR
                | DDCDRW
                | DTSCD
                | CDMIDI
                | CDV
                | PD650
                | PD650_WORM
                | CDIREADY
                | FMTOWNS
                | PS1CD
                | PS2CD
                | GDROM
                | GDR
                | MEGACD
                | SATURNCD
                | ThreeDO
                | SuperCDROM2
                | JaguarCD
                | MilCD
        )
    }

    /// Return true if this media type belongs to the DVD or HD DVD family, including console
    /// formats derived from DVD.
    pub fn is_dvd_family(&self) -> bool {
        use MediaType::*;
        matches!(
            self,
            DVDROM
                | DVDR
                | DVDRW
                | DVDPR
                | DVDPRW
                | DVDPRWDL
                | DVDRDL
                | DVDPRDL
                | DVDRAM
                | DVDRWDL
                | DVDDownload
                | HDDVDROM
                | HDDVDRAM
                | HDDVDR
                | HDDVDRW
                | HDDVDRDL
                | HDDVDRWDL
                | GOD
                | WOD
                | UMD
                | PS2DVD
                | PS3DVD
                | XGD
                | XGD2
                | XGD3
        )
    }

    /// Return true if this media type belongs to the Blu-ray family.
    pub fn is_bd_family(&self) -> bool {
        use MediaType::*;
        matches!(self, BDROM | BDR | BDRE | BDRXL | BDREXL | WUOD | PS3BD | PS4BD | XGD4)
    }

    /// Return true if this media type is an optical disc that is addressed in tracks and sessions.
    pub fn is_optical(&self) -> bool {
        self.is_cd_family() || self.is_dvd_family() || self.is_bd_family()
    }

    /// Return the [MetadataMediaType] for this media type.
    pub fn metadata_media_type(&self) -> MetadataMediaType {
        match self.is_optical() {
            true => MetadataMediaType::OpticalDisc,
            false => MetadataMediaType::BlockMedia,
        }
    }

    /// Return true if this media type is a magneto-optical disc.
    pub fn is_magneto_optical(&self) -> bool {
        use MediaType::*;
        matches!(
            self,
            UnknownMO
                | ECMA_154
                | ECMA_183_512
                | ECMA_183
                | ECMA_184_512
                | ECMA_184
                | ECMA_189
                | ECMA_190
                | ECMA_195
                | ECMA_195_512
                | ECMA_201
                | ECMA_201_ROM
                | ECMA_223
                | ECMA_223_512
                | ECMA_239
                | ECMA_280
                | ECMA_317
                | ISO_14517
                | ISO_14517_512
                | ISO_15041_512
                | GigaMo
                | GigaMo2
        )
    }

    /// Return true if this media type is a recordable DVD or HD DVD, which carry a media
    /// identifier in their lead-in.
    pub fn is_recordable_dvd(&self) -> bool {
        use MediaType::*;
        matches!(self, DVDR | DVDRW | DVDRDL | DVDRWDL | HDDVDR | HDDVDRW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_families_are_disjoint() {
        for media_type in MediaType::iter() {
            let families = [
                media_type.is_cd_family(),
                media_type.is_dvd_family(),
                media_type.is_bd_family(),
                media_type.is_magneto_optical(),
            ];
            assert!(
                families.iter().filter(|f| **f).count() <= 1,
                "{} belongs to more than one family",
                media_type
            );
        }
    }

    #[test]
    fn test_metadata_media_type() {
        assert_eq!(MediaType::CDRW.metadata_media_type(), MetadataMediaType::OpticalDisc);
        assert_eq!(MediaType::XGD3.metadata_media_type(), MetadataMediaType::OpticalDisc);
        assert_eq!(MediaType::DOS_35_HD.metadata_media_type(), MetadataMediaType::BlockMedia);
        assert_eq!(MediaType::UnknownMO.metadata_media_type(), MetadataMediaType::BlockMedia);
    }
}
