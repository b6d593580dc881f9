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

    src/inference/disk_type.rs

    Base media classification of a headerless image from its sector size,
    sector count, total length and extension.
*/

use crate::types::media_type::MediaType;

/// Upper sector count bounds for 2048-byte sector images, checked in order.
#[rustfmt::skip]
const OPTICAL_CAPACITIES: [(u64, MediaType); 7] = [
    (360_000,    MediaType::CD),
    (2_295_104,  MediaType::DVDPR),
    (2_298_496,  MediaType::DVDR),
    (4_171_712,  MediaType::DVDRDL),
    (4_173_824,  MediaType::DVDPRDL),
    (24_438_784, MediaType::BDR),
    (62_500_864, MediaType::BDRXL),
];

/// Classify an image by its geometry. This never fails: anything unrecognized is a generic
/// hard disk, or `Unknown` for oversized 2048-byte sector images.
pub fn calculate_disk_type(extension: Option<&str>, image_size: u64, sector_size: u32, sectors: u64) -> MediaType {
    use MediaType::*;

    if sector_size == 2048 {
        return OPTICAL_CAPACITIES
            .iter()
            .find(|(max, _)| sectors <= *max)
            .map(|(_, media_type)| *media_type)
            .unwrap_or(Unknown);
    }

    let ext = extension.unwrap_or("");
    let is_st = ext == "st";
    let is_acorn = matches!(ext, "adf" | "adl");

    match image_size {
        80384 => ECMA_66,
        81664 => IBM23FD,
        92160 => ATARI_525_SD,
        102400 => ACORN_525_SS_SD_40,
        116480 => Apple32SS,
        133120 => ATARI_525_ED,
        143360 => Apple33SS,
        163840 if sector_size == 256 => ACORN_525_SS_DD_40,
        163840 => DOS_525_SS_DD_8,
        184320 => DOS_525_SS_DD_9,
        204800 => ACORN_525_SS_SD_80,
        232960 => Apple32DS,
        242944 => IBM33FD_128,
        256256 => ECMA_54,
        286720 => Apple33DS,
        287488 => IBM33FD_256,
        306432 => IBM33FD_512,
        322560 => Apricot_35,
        327680 if sector_size == 256 => ACORN_525_SS_DD_80,
        327680 => DOS_525_DS_DD_8,
        368640 if is_st => DOS_35_SS_DD_9,
        368640 => DOS_525_DS_DD_9,
        409600 if is_st => ATARI_35_SS_DD,
        409600 => AppleSonySS,
        495872 => IBM43FD_128,
        500480 => ECMA_70,
        503808 => ECMA_69_26,
        512512 => ECMA_59,
        655360 if sector_size == 256 => ACORN_525_DS_DD,
        737280 => DOS_35_DS_DD_9,
        819200 if sector_size == 256 => CBM_35_DD,
        819200 if is_acorn && sector_size == 1024 => ACORN_35_DS_DD,
        819200 if is_st => ATARI_35_DS_DD,
        819200 => AppleSonyDS,
        828416 => ATARI_35_DS_DD_11,
        901120 if is_st => ATARI_35_DS_DD_11,
        901120 => CBM_AMIGA_35_DD,
        988416 => IBM43FD_256,
        995072 => IBM53FD_256,
        1021696 => ECMA_99_26,
        1146624 => IBM53FD_512,
        1177344 => ECMA_99_15,
        1222400 => IBM53FD_1024,
        1228800 => DOS_525_HD,
        1255168 => ECMA_69_8,
        1261568 => NEC_525_HD,
        1304320 => ECMA_99_8,
        1427456 => FDFORMAT_525_HD,
        1474560 => DOS_35_HD,
        1638400 => ACORN_35_DS_HD,
        1720320 => DMF,
        1763328 => FDFORMAT_35_HD,
        1802240 => CBM_AMIGA_35_HD,
        1880064 | 1884160 => XDF_35,
        2949120 => DOS_35_ED,
        9338880 => NEC_35_TD,
        33554432 => FD32MB,
        40387584 => PocketZip,
        100663296 => ZIP100,
        126222336 => LS120,
        127923200 => ECMA_154,
        201410560 => HiFD,
        228518400 => ECMA_201,
        240386048 => LS240,
        250640384 => ZIP250,
        481520640 => ECMA_183_512,
        533403648 => ECMA_183,
        596787200 => ECMA_184_512,
        654540800 => ECMA_184,
        1070617600 => Jaz,
        174848 => CBM_1540,
        196608 => CBM_1540_Ext,
        349696 => CBM_1571,
        _ => GENERIC_HDD,
    }
}
