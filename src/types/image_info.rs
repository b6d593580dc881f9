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

    src/types/image_info.rs

    Defines ImageInfo, the descriptor of an open image, and the opaque
    provenance records accepted by writable images.
*/

use crate::types::{
    chs::DiskChs,
    media_type::{MediaType, MetadataMediaType},
    tags::{MediaTagType, SectorTagType},
};
use std::{collections::BTreeSet, io::Write, time::SystemTime};

/// An `ImageInfo` describes an open image. It is owned by exactly one codec instance and is fixed
/// once the image has been opened or created.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageInfo {
    /// Size in bytes of a sector as returned by `read_sector`. For images with an irregular
    /// track zero, the size of the sectors outside of track zero.
    pub sector_size: u32,
    /// Number of addressable sectors.
    pub sectors: u64,
    /// Size of the image data in bytes.
    pub image_size: u64,
    pub media_type: MediaType,
    pub metadata_media_type: MetadataMediaType,
    pub cylinders: u32,
    pub heads: u32,
    pub sectors_per_track: u32,
    pub readable_media_tags: BTreeSet<MediaTagType>,
    pub readable_sector_tags: BTreeSet<SectorTagType>,
    pub has_partitions: bool,
    pub has_sessions: bool,
    /// Set when cylinder zero holds sectors of a different size than the rest of the disk. The
    /// relation `sectors == image_size / sector_size` does not hold for such images.
    pub different_track_zero_size: bool,

    // Provenance. Opaque to the library.
    pub version: Option<String>,
    pub application: Option<String>,
    pub application_version: Option<String>,
    pub creator: Option<String>,
    pub creation_time: Option<SystemTime>,
    pub last_modification_time: Option<SystemTime>,
    pub comments: Option<String>,
    pub media_title: Option<String>,
    pub media_manufacturer: Option<String>,
    pub media_model: Option<String>,
    pub media_serial_number: Option<String>,
    pub media_barcode: Option<String>,
    pub media_part_number: Option<String>,
    pub media_sequence: u32,
    pub last_media_sequence: u32,
    pub drive_manufacturer: Option<String>,
    pub drive_model: Option<String>,
    pub drive_serial_number: Option<String>,
    pub drive_firmware_revision: Option<String>,
}

impl ImageInfo {
    /// Return the geometry of the image as a [DiskChs].
    pub fn geometry(&self) -> DiskChs {
        DiskChs::new(self.cylinders, self.heads, self.sectors_per_track)
    }

    /// Copy the user-settable provenance fields from an [ImageMetadata].
    pub fn apply_metadata(&mut self, metadata: &ImageMetadata) {
        self.creator = metadata.creator.clone();
        self.comments = metadata.comments.clone();
        self.media_title = metadata.media_title.clone();
        self.media_manufacturer = metadata.media_manufacturer.clone();
        self.media_model = metadata.media_model.clone();
        self.media_serial_number = metadata.media_serial_number.clone();
        self.media_barcode = metadata.media_barcode.clone();
        self.media_part_number = metadata.media_part_number.clone();
        self.media_sequence = metadata.media_sequence;
        self.last_media_sequence = metadata.last_media_sequence;
        self.drive_manufacturer = metadata.drive_manufacturer.clone();
        self.drive_model = metadata.drive_model.clone();
        self.drive_serial_number = metadata.drive_serial_number.clone();
        self.drive_firmware_revision = metadata.drive_firmware_revision.clone();
    }

    /// Extract the user-settable provenance fields as an [ImageMetadata].
    pub fn metadata(&self) -> ImageMetadata {
        ImageMetadata {
            creator: self.creator.clone(),
            comments: self.comments.clone(),
            media_title: self.media_title.clone(),
            media_manufacturer: self.media_manufacturer.clone(),
            media_model: self.media_model.clone(),
            media_serial_number: self.media_serial_number.clone(),
            media_barcode: self.media_barcode.clone(),
            media_part_number: self.media_part_number.clone(),
            media_sequence: self.media_sequence,
            last_media_sequence: self.last_media_sequence,
            drive_manufacturer: self.drive_manufacturer.clone(),
            drive_model: self.drive_model.clone(),
            drive_serial_number: self.drive_serial_number.clone(),
            drive_firmware_revision: self.drive_firmware_revision.clone(),
        }
    }

    /// Write a human-readable summary of the image descriptor.
    pub fn dump_info<W: Write>(&self, mut out: W) -> Result<(), std::io::Error> {
        writeln!(out, "Media type: {}", self.media_type)?;
        writeln!(out, "Metadata media type: {:?}", self.metadata_media_type)?;
        writeln!(out, "Image size: {} bytes", self.image_size)?;
        writeln!(out, "Sectors: {}", self.sectors)?;
        writeln!(out, "Sector size: {} bytes", self.sector_size)?;
        if self.different_track_zero_size {
            writeln!(out, "Track zero uses a different sector size")?;
        }
        writeln!(
            out,
            "Geometry: {} cylinders, {} heads, {} sectors per track",
            self.cylinders, self.heads, self.sectors_per_track
        )?;
        writeln!(out, "Has sessions: {}", self.has_sessions)?;
        writeln!(out, "Has partitions: {}", self.has_partitions)?;

        let optional_fields = [
            ("Creator", &self.creator),
            ("Comments", &self.comments),
            ("Media title", &self.media_title),
            ("Media manufacturer", &self.media_manufacturer),
            ("Media model", &self.media_model),
            ("Media serial number", &self.media_serial_number),
            ("Drive manufacturer", &self.drive_manufacturer),
            ("Drive model", &self.drive_model),
            ("Drive serial number", &self.drive_serial_number),
            ("Drive firmware revision", &self.drive_firmware_revision),
        ];
        for (name, value) in optional_fields {
            if let Some(value) = value {
                writeln!(out, "{}: {}", name, value)?;
            }
        }

        if !self.readable_media_tags.is_empty() {
            writeln!(out, "Readable media tags:")?;
            for tag in &self.readable_media_tags {
                writeln!(out, "  {}", tag)?;
            }
        }
        if !self.readable_sector_tags.is_empty() {
            writeln!(out, "Readable sector tags:")?;
            for tag in &self.readable_sector_tags {
                writeln!(out, "  {}", tag)?;
            }
        }
        Ok(())
    }
}

/// User-settable provenance describing the medium and the drive it was dumped with.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageMetadata {
    pub creator: Option<String>,
    pub comments: Option<String>,
    pub media_title: Option<String>,
    pub media_manufacturer: Option<String>,
    pub media_model: Option<String>,
    pub media_serial_number: Option<String>,
    pub media_barcode: Option<String>,
    pub media_part_number: Option<String>,
    pub media_sequence: u32,
    pub last_media_sequence: u32,
    pub drive_manufacturer: Option<String>,
    pub drive_model: Option<String>,
    pub drive_serial_number: Option<String>,
    pub drive_firmware_revision: Option<String>,
}

/// A record of the hardware and software that produced a dump, and which sector ranges it read.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DumpHardware {
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub revision: Option<String>,
    pub firmware: Option<String>,
    pub serial: Option<String>,
    pub software_name: Option<String>,
    pub software_version: Option<String>,
    pub software_os: Option<String>,
    /// Inclusive sector ranges read by this hardware.
    pub extents: Vec<(u64, u64)>,
}
