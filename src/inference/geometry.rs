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

    src/inference/geometry.rs

    Canonical cylinder/head/sector geometry of known media types.
*/

use crate::types::{chs::DiskChs, media_type::MediaType};

const FALLBACK_HEADS: u32 = 16;
const FALLBACK_SECTORS_PER_TRACK: u32 = 63;

/// Return the canonical geometry of a media type, if it has one.
pub fn standard_geometry(media_type: MediaType) -> Option<DiskChs> {
    use MediaType::*;

    let (c, h, s) = match media_type {
        // IBM PC
        DOS_525_SS_DD_8 => (40, 1, 8),
        DOS_525_SS_DD_9 => (40, 1, 9),
        DOS_525_DS_DD_8 => (40, 2, 8),
        DOS_525_DS_DD_9 => (40, 2, 9),
        DOS_525_HD => (80, 2, 15),
        DOS_35_SS_DD_8 => (80, 1, 8),
        DOS_35_SS_DD_9 => (80, 1, 9),
        DOS_35_DS_DD_8 => (80, 2, 8),
        DOS_35_DS_DD_9 => (80, 2, 9),
        DOS_35_HD => (80, 2, 18),
        DOS_35_ED => (80, 2, 36),
        DMF => (80, 2, 21),
        DMF_82 => (82, 2, 21),
        XDF_525 => (80, 2, 19),
        XDF_35 => (80, 2, 23),
        FDFORMAT_525_DD => (41, 2, 10),
        FDFORMAT_525_HD => (82, 2, 17),
        FDFORMAT_35_DD => (82, 2, 10),
        FDFORMAT_35_HD => (82, 2, 21),
        Apricot_35 => (70, 1, 9),

        // Apple
        Apple32SS => (35, 1, 13),
        Apple32DS => (35, 2, 13),
        Apple33SS => (35, 1, 16),
        Apple33DS => (35, 2, 16),
        AppleSonySS => (80, 1, 10),
        AppleSonyDS => (80, 2, 10),

        // Acorn
        ACORN_525_SS_SD_40 => (40, 1, 10),
        ACORN_525_SS_SD_80 => (80, 1, 10),
        ACORN_525_SS_DD_40 => (40, 1, 16),
        ACORN_525_SS_DD_80 => (80, 1, 16),
        ACORN_525_DS_DD => (80, 2, 16),
        ACORN_35_DS_DD => (80, 2, 5),
        ACORN_35_DS_HD => (80, 2, 10),

        // Atari
        ATARI_525_SD => (40, 1, 18),
        ATARI_525_DD => (40, 1, 18),
        ATARI_525_ED => (40, 1, 26),
        ATARI_35_SS_DD => (80, 1, 10),
        ATARI_35_DS_DD => (80, 2, 10),
        ATARI_35_SS_DD_11 => (80, 1, 11),
        ATARI_35_DS_DD_11 => (80, 2, 11),

        // Commodore
        CBM_35_DD => (80, 2, 20),
        CBM_AMIGA_35_DD => (80, 2, 11),
        CBM_AMIGA_35_HD => (80, 2, 22),
        CBM_1540 => (35, 1, 21),
        CBM_1540_Ext => (40, 1, 21),
        CBM_1571 => (35, 2, 21),

        // NEC
        NEC_525_HD => (77, 2, 8),
        NEC_35_HD_8 => (77, 2, 8),
        NEC_35_HD_15 => (80, 2, 15),
        NEC_35_TD => (240, 2, 38),

        // 8" media. Cylinder zero of the irregular formats holds 26 sectors per side.
        IBM23FD => (32, 1, 8),
        IBM33FD_128 => (73, 1, 26),
        IBM33FD_256 => (75, 1, 15),
        IBM33FD_512 => (75, 1, 8),
        IBM43FD_128 => (74, 2, 26),
        IBM43FD_256 => (74, 2, 26),
        IBM53FD_256 => (75, 2, 26),
        IBM53FD_512 => (75, 2, 15),
        IBM53FD_1024 => (75, 2, 8),
        ECMA_54 => (77, 1, 26),
        ECMA_59 => (77, 1, 26),
        ECMA_66 => (35, 1, 9),
        ECMA_69_8 => (77, 2, 8),
        ECMA_69_15 => (77, 2, 15),
        ECMA_69_26 => (77, 2, 26),
        ECMA_70 => (40, 2, 16),
        ECMA_78 => (80, 2, 16),
        ECMA_78_2 => (80, 2, 9),
        ECMA_99_8 => (80, 2, 8),
        ECMA_99_15 => (77, 2, 15),
        ECMA_99_26 => (77, 2, 26),

        // DEC
        RX01 | RX02 => (77, 1, 26),
        RX50 => (80, 1, 10),

        // Removable cartridges
        ZIP100 => (96, 64, 32),
        LS120 => (963, 8, 32),
        LS240 => (262, 32, 56),

        _ => return None,
    };
    Some(DiskChs::new(c, h, s))
}

/// Return the geometry for an image of `sectors` sectors of the given media type, falling back to
/// a 16 head, 63 sectors per track translation for media without a canonical geometry.
pub fn geometry_for(media_type: MediaType, sectors: u64) -> DiskChs {
    standard_geometry(media_type).unwrap_or_else(|| {
        let cylinders = sectors / FALLBACK_HEADS as u64 / FALLBACK_SECTORS_PER_TRACK as u64;
        DiskChs::new(
            u32::try_from(cylinders).unwrap_or(u32::MAX),
            FALLBACK_HEADS,
            FALLBACK_SECTORS_PER_TRACK,
        )
    })
}
