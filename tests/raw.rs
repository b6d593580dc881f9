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

    tests/raw.rs

    Tests for reading and writing raw sector images
*/
mod common;

use common::*;
use fluxfox_media::{
    detect_image_format,
    prelude::*,
    structure_parsers::cd_sector::{CD_RAW_SECTOR_SIZE, CD_RAW_SECTOR_SIZE_SUBCHANNEL},
};
use std::path::Path;

fn open(path: &Path) -> RawImage {
    let mut image = RawImage::new();
    if let Err(e) = image.open(path) {
        panic!("Failed to open {}: {}", path.display(), e);
    }
    image
}

fn rewritable_atip() -> Vec<u8> {
    let mut atip = vec![0u8; 28];
    atip[1] = 0x1A;
    atip[6] = 0x40;
    atip
}

#[test]
fn test_high_density_floppy() {
    init();
    let dir = tempfile::tempdir().unwrap();
    let data = sector_test_pattern(512, 2880);
    let path = write_image(dir.path(), "sector_test_1440k.img", &data);

    assert_eq!(detect_image_format(&path), Ok(MediaImageFileFormat::RawSectorImage));

    let mut image = open(&path);
    let info = image.info().clone();
    assert_eq!(info.media_type, MediaType::DOS_35_HD);
    assert_eq!(info.sector_size, 512);
    assert_eq!(info.sectors, 2880);
    assert_eq!(info.geometry(), DiskChs::new(80, 2, 18));
    assert_eq!(info.metadata_media_type, MetadataMediaType::BlockMedia);

    for address in [0u64, 17, 1439, 2879] {
        let sector = image.read_sector(address).unwrap();
        assert_eq!(sector.len(), 512);
        assert!(sector.iter().all(|&b| b == address as u8), "sector {}", address);
    }
    let all = image.read_sectors(0, 2880).unwrap();
    assert_eq!(compute_slice_hash(&all), compute_file_hash(&path));
}

#[test]
fn test_double_density_floppy() {
    init();
    let dir = tempfile::tempdir().unwrap();
    let path = write_image(dir.path(), "sector_test_720k.img", &sector_test_pattern(512, 1440));

    let image = open(&path);
    assert_eq!(image.info().media_type, MediaType::DOS_35_DS_DD_9);
    assert_eq!(image.info().geometry(), DiskChs::new(80, 2, 9));
}

#[test]
fn test_block_image_errors() {
    init();
    let dir = tempfile::tempdir().unwrap();
    let path = write_image(dir.path(), "disk.img", &sector_test_pattern(512, 2880));
    let mut image = open(&path);

    assert!(matches!(image.read_sectors(2879, 2), Err(MediaImageError::OutOfRange { .. })));
    assert!(matches!(image.read_sector(u64::MAX), Err(MediaImageError::OutOfRange { .. })));
    assert!(matches!(image.read_sector_long(0), Err(MediaImageError::Unsupported(_))));
    assert!(matches!(
        image.read_sector_tag(0, SectorTagType::CdSectorHeader),
        Err(MediaImageError::Unsupported(_))
    ));
    assert_eq!(image.read_media_tag(MediaTagType::CdAtip), Err(MediaImageError::NotPresent));

    assert!(image.as_optical().is_none());
    assert!(image.as_verifiable().is_some());
    assert!(image.as_writable().is_some_and(|w| w.known_extensions().contains(&"img")));
    assert!(matches!(image.tracks(), Err(MediaImageError::Unsupported(_))));
    assert!(matches!(image.read_sectors_in_track(0, 1, 1), Err(MediaImageError::Unsupported(_))));

    assert_eq!(image.open(&path), Err(MediaImageError::AlreadyOpen));
}

#[test]
fn test_open_rejects_empty_file() {
    init();
    let dir = tempfile::tempdir().unwrap();
    let path = write_image(dir.path(), "empty.img", &[]);

    let mut image = RawImage::new();
    assert!(!image.identify(&path));
    assert!(matches!(image.open(&path), Err(MediaImageError::Unreadable(_))));
}

#[test]
fn test_open_is_deterministic() {
    init();
    let dir = tempfile::tempdir().unwrap();
    let path = write_image(dir.path(), "disk.img", &sector_test_pattern(512, 1440));

    let first = open(&path);
    let second = open(&path);
    assert_eq!(first.info(), second.info());
}

#[test]
fn test_irregular_track_zero() {
    init();
    let dir = tempfile::tempdir().unwrap();
    let path = write_image(dir.path(), "ibm53fd.img", &vec![0x6Cu8; 1_222_400]);

    let mut image = open(&path);
    assert!(image.info().different_track_zero_size);
    assert_eq!(image.info().media_type, MediaType::IBM53FD_1024);

    let sectors = image.info().sectors;
    assert_eq!(image.read_sector(sectors - 1).unwrap().len(), 1024);
    assert_eq!(image.read_sectors(0, sectors).unwrap().len(), 1_222_400);
}

#[test]
fn test_raw_cd_mode1() {
    init();
    let dir = tempfile::tempdir().unwrap();
    let data = raw_cd_image(20, 0x01, false);
    let path = write_image(dir.path(), "disc.bin", &data);

    let mut image = open(&path);
    let info = image.info().clone();
    assert_eq!(info.media_type, MediaType::CD);
    assert_eq!(info.sector_size, 2048);
    assert_eq!(info.sectors, 20);
    assert_eq!(info.sectors, info.image_size / info.sector_size as u64);
    assert_eq!(info.metadata_media_type, MetadataMediaType::OpticalDisc);
    for tag in [
        SectorTagType::CdSectorSync,
        SectorTagType::CdSectorHeader,
        SectorTagType::CdSectorSubHeader,
        SectorTagType::CdSectorEcc,
        SectorTagType::CdSectorEccP,
        SectorTagType::CdSectorEccQ,
        SectorTagType::CdSectorEdc,
    ] {
        assert!(info.readable_sector_tags.contains(&tag), "missing {}", tag);
    }

    let user = image.read_sector(5).unwrap();
    assert_eq!(user.len(), 2048);
    assert!(user.iter().all(|&b| b == 6));

    let long = image.read_sector_long(5).unwrap();
    assert_eq!(long, data[5 * CD_RAW_SECTOR_SIZE..6 * CD_RAW_SECTOR_SIZE]);

    let header = image.read_sector_tag(0, SectorTagType::CdSectorHeader).unwrap();
    assert_eq!(header, data[12..16]);

    let headers = image.read_sectors_tag(1, 2, SectorTagType::CdSectorHeader).unwrap();
    assert_eq!(headers.len(), 8);
    assert_eq!(headers[..4], data[CD_RAW_SECTOR_SIZE + 12..CD_RAW_SECTOR_SIZE + 16]);

    let flags = image.read_sectors_tag(0, 20, SectorTagType::CdTrackFlags).unwrap();
    assert_eq!(flags.len(), 1);
}

#[test]
fn test_raw_cd_mode0_header_classifies_mode1() {
    init();
    let dir = tempfile::tempdir().unwrap();
    let path = write_image(dir.path(), "blank.bin", &raw_cd_image(7, 0x00, false));

    let image = open(&path);
    assert_eq!(image.info().media_type, MediaType::CD);
    assert_eq!(image.info().sector_size, 2048);
    assert!(image.info().readable_sector_tags.contains(&SectorTagType::CdSectorEccQ));
}

#[test]
fn test_raw_cd_rewritable_atip() {
    init();
    let dir = tempfile::tempdir().unwrap();
    let path = write_image(dir.path(), "disc.bin", &raw_cd_image(20, 0x01, false));
    write_image(dir.path(), "disc.atip.bin", &rewritable_atip());

    let image = open(&path);
    assert_eq!(image.info().media_type, MediaType::CDRW);
    assert!(image.info().readable_media_tags.contains(&MediaTagType::CdAtip));
    assert_eq!(image.read_media_tag(MediaTagType::CdAtip), Ok(rewritable_atip()));
}

#[test]
fn test_raw_cd_mode2() {
    init();
    let dir = tempfile::tempdir().unwrap();
    let data = raw_cd_image(10, 0x02, false);
    let path = write_image(dir.path(), "vcd.bin", &data);

    let mut image = open(&path);
    assert_eq!(image.info().sector_size, 2336);
    assert_eq!(image.info().sectors, 10);
    assert_eq!(image.info().image_size, 2336 * 10);
    assert!(!image.info().readable_sector_tags.contains(&SectorTagType::CdSectorEcc));

    let sectors = image.read_sectors(2, 2).unwrap();
    assert_eq!(sectors.len(), 2336 * 2);
    assert_eq!(sectors[..2336], data[2 * CD_RAW_SECTOR_SIZE + 16..3 * CD_RAW_SECTOR_SIZE]);
    assert!(sectors[8..2056].iter().all(|&b| b == 3));
}

#[test]
fn test_raw_cd_subchannel() {
    init();
    let dir = tempfile::tempdir().unwrap();
    let path = write_image(dir.path(), "disc.bin", &raw_cd_image(10, 0x01, true));

    let mut image = open(&path);
    assert_eq!(image.info().sectors, 10);
    assert_eq!(image.info().image_size, 2048 * 10);
    assert!(image.info().readable_sector_tags.contains(&SectorTagType::CdSectorSubchannel));

    assert!(image.read_sector(9).unwrap().iter().all(|&b| b == 10));
    assert_eq!(image.read_sector_long(9).unwrap().len(), CD_RAW_SECTOR_SIZE_SUBCHANNEL);

    let subchannel = image.read_sectors_tag(3, 2, SectorTagType::CdSectorSubchannel).unwrap();
    assert_eq!(subchannel.len(), 192);
    assert!(subchannel.iter().all(|&b| b == 0xA5));

    let tracks = image.tracks().unwrap();
    assert_eq!(tracks[0].subchannel_type, TrackSubchannelType::RawInterleaved);
}

#[test]
fn test_raw_cd_tracks() {
    init();
    let dir = tempfile::tempdir().unwrap();
    let path = write_image(dir.path(), "disc.bin", &raw_cd_image(20, 0x01, false));
    let mut image = open(&path);

    let optical = image.as_optical().unwrap();
    let tracks = optical.tracks().unwrap();
    assert_eq!(tracks.len(), 1);
    assert_eq!((tracks[0].start_sector, tracks[0].end_sector), (0, 19));
    assert_eq!(tracks[0].track_type, TrackType::CdMode1);
    assert_eq!(optical.sessions().unwrap().len(), 1);
    assert_eq!(optical.partitions().unwrap()[0].length, 20);
    assert_eq!(optical.session_tracks(1).unwrap().len(), 1);

    let in_track = image.read_sectors_in_track(4, 2, 1).unwrap();
    assert_eq!(in_track, image.read_sectors(4, 2).unwrap());
    assert_eq!(image.read_sector_long_in_track(3, 1).unwrap(), image.read_sector_long(3).unwrap());
    assert!(matches!(image.read_sectors_in_track(0, 1, 2), Err(MediaImageError::OutOfRange { .. })));
    assert!(matches!(image.read_sectors_in_track(19, 2, 1), Err(MediaImageError::OutOfRange { .. })));
}

#[test]
fn test_verify_raw_cd() {
    init();
    let dir = tempfile::tempdir().unwrap();
    let mut data = raw_cd_image(8, 0x01, false);
    // Corrupt the user data of sector 6 without fixing its EDC.
    data[6 * CD_RAW_SECTOR_SIZE + 100] ^= 0xFF;
    let path = write_image(dir.path(), "disc.bin", &data);

    let mut image = open(&path);
    let verifier = image.as_verifiable_mut().unwrap();
    assert_eq!(verifier.verify_sector(0), Ok(Some(true)));
    assert_eq!(verifier.verify_sector(6), Ok(Some(false)));

    let result = verifier.verify_sectors(0, 8).unwrap();
    assert_eq!(result.status, Some(false));
    assert_eq!(result.failing, vec![6]);
    assert!(result.unknown.is_empty());
    assert_eq!(verifier.verify_sectors(0, 6).unwrap().status, Some(true));
}

#[test]
fn test_verify_block_image_is_unknown() {
    init();
    let dir = tempfile::tempdir().unwrap();
    let path = write_image(dir.path(), "disk.img", &sector_test_pattern(512, 1440));

    let mut image = open(&path);
    let result = image.verify_sectors(0, 4).unwrap();
    assert_eq!(result.status, None);
    assert_eq!(result.unknown, vec![0, 1, 2, 3]);
    assert!(matches!(image.verify_sector(1440), Err(MediaImageError::OutOfRange { .. })));
}

#[test]
fn test_write_then_read() {
    init();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("new.img");
    let data = sector_test_pattern(512, 2880);

    let mut image = RawImage::new();
    image
        .create(&path, MediaType::DOS_35_HD, &CreateOptions::new(), 2880, 512)
        .unwrap();
    assert_eq!(image.info().geometry(), DiskChs::new(80, 2, 18));

    assert!(matches!(
        image.write_sectors(&data[..1024], 0, 3),
        Err(MediaImageError::InvalidArgument(_))
    ));
    assert!(matches!(
        image.write_sector(&data[..512], 2880),
        Err(MediaImageError::OutOfRange { .. })
    ));
    assert!(matches!(
        image.write_sector_long(&[0u8; 512], 0),
        Err(MediaImageError::Unsupported(_))
    ));
    assert!(image.error_message().is_some());

    for (i, chunk) in data.chunks(512 * 100).enumerate() {
        let count = (chunk.len() / 512) as u64;
        image.write_sectors(chunk, i as u64 * 100, count).unwrap();
    }
    image.close().unwrap();
    assert_eq!(image.close(), Err(MediaImageError::NotOpen));
    assert_eq!(image.write_sector(&data[..512], 0), Err(MediaImageError::NotOpen));

    assert_eq!(compute_file_hash(&path), compute_slice_hash(&data));

    let mut reopened = open(&path);
    assert_eq!(reopened.info().media_type, MediaType::DOS_35_HD);
    assert_eq!(reopened.read_sector(1234).unwrap(), data[1234 * 512..1235 * 512]);
}

#[test]
fn test_media_tags_persist_as_sidecars() {
    init();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("disc.iso");
    let cicm = b"<CICMMetadata/>".to_vec();

    let mut image = RawImage::new();
    image.create(&path, MediaType::CD, &CreateOptions::new(), 300, 2048).unwrap();
    image.write_media_tag(&rewritable_atip(), MediaTagType::CdAtip).unwrap();
    image.write_media_tag(&[0x01, 0x02], MediaTagType::CdText).unwrap();
    assert!(matches!(
        image.write_media_tag(&[0u8; 8], MediaTagType::DvdDiscKey),
        Err(MediaImageError::Unsupported(_))
    ));
    image.set_cicm_metadata(cicm.clone()).unwrap();
    image.write_sectors(&vec![0x20u8; 2048 * 300], 0, 300).unwrap();
    image.close().unwrap();

    assert!(dir.path().join("disc.atip.bin").is_file());
    assert!(dir.path().join("disc.cdtext.bin").is_file());
    assert!(dir.path().join("disc.cicm.xml").is_file());

    let image = open(&path);
    assert_eq!(image.info().media_type, MediaType::CDRW);
    assert!(image.info().readable_media_tags.contains(&MediaTagType::CdText));
    assert_eq!(image.read_media_tag(MediaTagType::CdText), Ok(vec![0x01, 0x02]));
    assert_eq!(image.cicm_metadata(), Some(cicm.as_slice()));
}

#[test]
fn test_shared_sidecar_tags_are_rejected() {
    init();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("card.img");

    let mut image = RawImage::new();
    image
        .create(&path, MediaType::GENERIC_HDD, &CreateOptions::new(), 64, 512)
        .unwrap();
    image.write_media_tag(&[0x11; 16], MediaTagType::SdCid).unwrap();
    assert!(matches!(
        image.write_media_tag(&[0x22; 16], MediaTagType::MmcCid),
        Err(MediaImageError::InvalidArgument(_))
    ));
    // Rewriting the same tag replaces its blob.
    image.write_media_tag(&[0x33; 16], MediaTagType::SdCid).unwrap();
    image.close().unwrap();

    assert_eq!(std::fs::read(dir.path().join("card.cid.bin")).unwrap(), vec![0x33; 16]);
}

#[test]
fn test_raw_cd_past_255_sectors() {
    init();
    let dir = tempfile::tempdir().unwrap();
    let data = raw_cd_image(300, 0x01, false);
    let path = write_image(dir.path(), "long.bin", &data);

    let mut image = open(&path);
    assert_eq!(image.info().sectors, 300);
    assert_eq!(image.info().image_size, 2048 * 300);
    assert!(image.read_sector(254).unwrap().iter().all(|&b| b == 255));
    assert!(image.read_sector(255).unwrap().iter().all(|&b| b == 0));
    assert!(image.read_sector(299).unwrap().iter().all(|&b| b == 44));
}

#[test]
fn test_identify_extensions() {
    init();
    let dir = tempfile::tempdir().unwrap();
    let probe = RawImage::new();

    let disk_4kn = write_image(dir.path(), "disk.4kn", &vec![0u8; 4096 * 4]);
    assert!(probe.identify(&disk_4kn));
    let ragged_4kn = write_image(dir.path(), "ragged.4kn", &vec![0u8; 4096 * 4 + 512]);
    assert!(!probe.identify(&ragged_4kn));

    let odd = write_image(dir.path(), "odd.img", &[0u8; 1000]);
    assert!(!probe.identify(&odd));
    assert_eq!(detect_image_format(&odd), Err(MediaImageError::Unrecognized));

    let cd = write_image(dir.path(), "track", &raw_cd_image(3, 0x01, false));
    assert!(probe.identify(&cd));

    let known = write_image(dir.path(), "acorn.ssd", &vec![0u8; 81_664]);
    assert!(probe.identify(&known));
}
