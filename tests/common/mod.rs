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

    tests/common/mod.rs

    Common support routines for tests
*/
#![allow(dead_code)]

use fluxfox_media::structure_parsers::cd_sector::{self, CD_RAW_SECTOR_SIZE, CD_SUBCHANNEL_SIZE, CD_SYNC};

use hex::encode;
use sha1::{Digest, Sha1};
use std::path::{Path, PathBuf};

pub fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn compute_file_hash<P: AsRef<Path>>(path: P) -> String {
    let file_buf = std::fs::read(path).unwrap();
    compute_slice_hash(&file_buf)
}

pub fn compute_slice_hash(slice: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(slice);
    let result = hasher.finalize();

    encode(result)
}

/// Sector data where every byte of sector `n` holds `n` truncated to a byte, like the sector test
/// images written to real floppies.
pub fn sector_test_pattern(sector_size: usize, sectors: usize) -> Vec<u8> {
    (0..sectors * sector_size).map(|i| (i / sector_size) as u8).collect()
}

/// Write `data` to `name` inside `dir` and return its path.
pub fn write_image(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, data).unwrap();
    path
}

/// Build a raw CD sector with a valid sync, an MSF header for `lba`, and `fill` as the user data
/// byte. The EDC is filled in for Mode 1 and Mode 2 Form 1.
pub fn raw_cd_sector(lba: u32, mode: u8, fill: u8) -> Vec<u8> {
    let mut sector = vec![0u8; CD_RAW_SECTOR_SIZE];
    sector[..12].copy_from_slice(&CD_SYNC);

    let frames = lba + 150;
    sector[12] = to_bcd((frames / 75 / 60) as u8);
    sector[13] = to_bcd((frames / 75 % 60) as u8);
    sector[14] = to_bcd((frames % 75) as u8);
    sector[15] = mode;

    match mode {
        0x01 => sector[16..2064].fill(fill),
        0x02 => sector[24..2072].fill(fill),
        _ => {}
    }
    cd_sector::store_edc(&mut sector);
    sector
}

/// Build a raw CD image of `sectors` sectors, optionally interleaving a subchannel block after
/// every sector. Sector `n` is filled with `n + 1`, wrapping at 256.
pub fn raw_cd_image(sectors: u32, mode: u8, subchannel: bool) -> Vec<u8> {
    let mut image = Vec::new();
    for lba in 0..sectors {
        image.extend(raw_cd_sector(lba, mode, (lba as u8).wrapping_add(1)));
        if subchannel {
            image.extend(std::iter::repeat(0xA5).take(CD_SUBCHANNEL_SIZE));
        }
    }
    image
}

fn to_bcd(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}
