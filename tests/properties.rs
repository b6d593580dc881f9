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

    tests/properties.rs

    Property tests for sector addressing of raw sector images
*/
mod common;

use common::*;
use fluxfox_media::{
    prelude::*,
    structure_parsers::cd_sector::{CD_RAW_SECTOR_SIZE, CD_RAW_SECTOR_SIZE_SUBCHANNEL, CD_SUBCHANNEL_SIZE},
};
use proptest::prelude::*;

/// Extensions that fix the sector size of an image, with the size they fix.
fn sized_extension() -> impl Strategy<Value = (&'static str, u32)> {
    prop_oneof![
        Just(("128", 128)),
        Just(("256", 256)),
        Just(("512", 512)),
        Just(("1kn", 1024)),
        Just(("2kn", 2048)),
        Just(("4kn", 4096)),
    ]
}

/// An image of 1..64 sectors and an in-range `(address, count)` within it.
fn image_and_range() -> impl Strategy<Value = (u64, u64, u64)> {
    (1u64..64).prop_flat_map(|sectors| (Just(sectors), 0..sectors)).prop_flat_map(|(sectors, address)| {
        (Just(sectors), Just(address), 1..=(sectors - address))
    })
}

/// A raw CD sector mode byte and the user data range it selects within a physical sector.
fn raw_cd_mode() -> impl Strategy<Value = (u8, std::ops::Range<usize>)> {
    prop_oneof![Just((0x01u8, 16..2064)), Just((0x02u8, 16..2352))]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn read_length_is_count_times_sector_size(
        (ext, sector_size) in sized_extension(),
        (sectors, address, count) in image_and_range()
    ) {
        init();
        let dir = tempfile::tempdir().unwrap();
        let data = sector_test_pattern(sector_size as usize, sectors as usize);
        let path = write_image(dir.path(), &format!("disk.{}", ext), &data);

        let mut image = RawImage::new();
        image.open(&path).unwrap();
        prop_assert_eq!(image.info().sector_size, sector_size);
        prop_assert_eq!(image.info().sectors, sectors);

        let read = image.read_sectors(address, count).unwrap();
        prop_assert_eq!(read.len() as u64, count * sector_size as u64);
        let start = (address * sector_size as u64) as usize;
        prop_assert_eq!(&read[..], &data[start..start + read.len()]);

        let past_end = image.read_sectors(address, sectors - address + 1);
        let is_out_of_range = matches!(past_end, Err(MediaImageError::OutOfRange { .. }));
        prop_assert!(is_out_of_range);
    }

    #[test]
    fn written_sectors_read_back(
        (sectors, address, count) in image_and_range(),
        fill in any::<u8>()
    ) {
        init();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("disk.img");

        let mut image = RawImage::new();
        image.create(&path, MediaType::GENERIC_HDD, &CreateOptions::new(), sectors, 512).unwrap();
        let data: Vec<u8> = (0..count * 512).map(|i| fill.wrapping_add((i / 512) as u8)).collect();
        image.write_sectors(&data, address, count).unwrap();
        image.close().unwrap();

        let mut reopened = RawImage::new();
        reopened.open(&path).unwrap();
        prop_assert_eq!(reopened.info().sectors, sectors);
        prop_assert_eq!(reopened.read_sectors(address, count).unwrap(), data);
        if address > 0 {
            prop_assert!(reopened.read_sector(0).unwrap().iter().all(|&b| b == 0));
        }
    }

    #[test]
    fn raw_cd_reads_follow_physical_layout(
        (mode, user_range) in raw_cd_mode(),
        subchannel in any::<bool>(),
        (sectors, address, count) in image_and_range()
    ) {
        init();
        let dir = tempfile::tempdir().unwrap();
        let data = raw_cd_image(sectors as u32, mode, subchannel);
        let path = write_image(dir.path(), "disc.bin", &data);
        let stride = match subchannel {
            true => CD_RAW_SECTOR_SIZE_SUBCHANNEL,
            false => CD_RAW_SECTOR_SIZE,
        };

        let mut image = RawImage::new();
        image.open(&path).unwrap();
        let info = image.info().clone();
        prop_assert_eq!(info.sector_size as usize, user_range.len());
        prop_assert_eq!(info.sectors, sectors);
        prop_assert_eq!(info.sectors, info.image_size / info.sector_size as u64);

        let expected: Vec<u8> = (address..address + count)
            .flat_map(|lba| {
                let start = lba as usize * stride;
                data[start + user_range.start..start + user_range.end].to_vec()
            })
            .collect();
        prop_assert_eq!(image.read_sectors(address, count).unwrap(), expected);

        let start = address as usize * stride;
        prop_assert_eq!(image.read_sector_long(address).unwrap(), data[start..start + stride].to_vec());

        let headers = image.read_sectors_tag(address, count, SectorTagType::CdSectorHeader).unwrap();
        prop_assert_eq!(headers.len() as u64, count * 4);
        prop_assert_eq!(&headers[..4], &data[start + 12..start + 16]);

        let subchannel_tag = image.read_sectors_tag(address, count, SectorTagType::CdSectorSubchannel);
        if subchannel {
            let blocks = subchannel_tag.unwrap();
            prop_assert_eq!(blocks.len() as u64, count * CD_SUBCHANNEL_SIZE as u64);
            prop_assert!(blocks.iter().all(|&b| b == 0xA5));
        }
        else {
            prop_assert!(subchannel_tag.is_err());
        }
    }
}
