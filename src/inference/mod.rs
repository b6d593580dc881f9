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

    src/inference/mod.rs

    Geometry and media type inference for headerless sector images.

    Inference never fails. Every image resolves to at least GENERIC_HDD, or
    Unknown for oversized optical images.
*/

pub mod device;
pub mod disk_type;
pub mod geometry;
pub mod promotion;
pub mod sizing;

use crate::{
    inference::sizing::SectorSizing,
    sector_layout::{RawCdLayout, RawCdMode, TrackZeroLayout},
    sidecar::SidecarTagStore,
    structure_parsers::cd_sector::{CD_MODE1_USER_SIZE, CD_MODE2_SIZE},
    types::{image_info::ImageInfo, media_type::MediaType, tags::SectorTagType},
};

#[rustfmt::skip]
const MODE1_SECTOR_TAGS: [SectorTagType; 7] = [
    SectorTagType::CdSectorSync,
    SectorTagType::CdSectorHeader,
    SectorTagType::CdSectorSubHeader,
    SectorTagType::CdSectorEcc,
    SectorTagType::CdSectorEccP,
    SectorTagType::CdSectorEccQ,
    SectorTagType::CdSectorEdc,
];

#[rustfmt::skip]
const MODE2_SECTOR_TAGS: [SectorTagType; 3] = [
    SectorTagType::CdSectorSync,
    SectorTagType::CdSectorHeader,
    SectorTagType::CdSectorSubHeader,
];

/// What is known about an image file before inference: its extension, its length, and whether
/// its content was recognized as raw CD sectors.
#[derive(Clone, Debug, Default)]
pub struct ImageProbe {
    /// Lower-cased extension without the leading dot.
    pub extension: Option<String>,
    pub image_size: u64,
    pub raw_cd: Option<RawCdLayout>,
}

/// The result of inference.
#[derive(Clone, Debug)]
pub struct Inference {
    pub info: ImageInfo,
    pub track_zero: Option<TrackZeroLayout>,
    pub raw_cd: Option<RawCdLayout>,
}

/// Infer the descriptor of an image from its probe and its sidecar tags. Tags may be renamed by
/// the promotion chain.
pub fn infer(probe: &ImageProbe, tags: &mut SidecarTagStore) -> Inference {
    let extension = probe.extension.as_deref();
    let mut info = ImageInfo {
        image_size: probe.image_size,
        ..ImageInfo::default()
    };
    let mut track_zero = None;

    match probe.raw_cd {
        Some(cd) => {
            info.sector_size = match cd.mode {
                RawCdMode::Mode1 => CD_MODE1_USER_SIZE as u32,
                RawCdMode::Mode2 => CD_MODE2_SIZE as u32,
            };
            info.sectors = probe.image_size / cd.physical_size() as u64;
            // Image size counts user data only, so it agrees with the sector count.
            info.image_size = info.sectors * info.sector_size as u64;
            info.media_type = MediaType::CD;
        }
        None => {
            let sizing = sizing::select_sector_size(extension, probe.image_size);
            info.sector_size = sizing.sector_size();
            info.sectors = sizing.sectors(probe.image_size);
            if let SectorSizing::TrackZero(layout) = sizing {
                info.different_track_zero_size = true;
                track_zero = Some(layout);
            }
            info.media_type =
                disk_type::calculate_disk_type(extension, probe.image_size, info.sector_size, info.sectors);
        }
    }
    log::debug!(
        "infer(): {} sectors of {} bytes, base media type {}",
        info.sectors,
        info.sector_size,
        info.media_type
    );

    info.media_type = promotion::promote(info.media_type, info.sectors, tags);

    let chs = geometry::geometry_for(info.media_type, info.sectors);
    (info.cylinders, info.heads, info.sectors_per_track) = chs.get();

    if !device::refine_from_scsi(&mut info, tags) {
        device::refine_from_ata(&mut info, tags);
    }

    derive_readable_tags(&mut info, tags, probe.raw_cd);

    log::debug!(
        "infer(): Media type {}, geometry {}/{}/{}",
        info.media_type,
        info.cylinders,
        info.heads,
        info.sectors_per_track
    );

    Inference {
        info,
        track_zero,
        raw_cd: probe.raw_cd,
    }
}

fn derive_readable_tags(info: &mut ImageInfo, tags: &SidecarTagStore, raw_cd: Option<RawCdLayout>) {
    info.readable_media_tags = tags.tags().collect();
    info.metadata_media_type = info.media_type.metadata_media_type();

    if info.media_type.is_optical() {
        info.has_sessions = true;
        info.has_partitions = true;
    }
    if info.media_type.is_cd_family() {
        info.readable_sector_tags.insert(SectorTagType::CdTrackFlags);
    }

    if let Some(cd) = raw_cd {
        let sector_tags: &[SectorTagType] = match cd.mode {
            RawCdMode::Mode1 => &MODE1_SECTOR_TAGS,
            RawCdMode::Mode2 => &MODE2_SECTOR_TAGS,
        };
        info.readable_sector_tags.extend(sector_tags.iter().copied());
        if cd.subchannel {
            info.readable_sector_tags.insert(SectorTagType::CdSectorSubchannel);
        }
    }
}
