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

    src/lib.rs

    fluxfox_media preserves and re-serves historical media (floppies, hard
    disks, optical discs, flash cards) as byte-exact sector images. The
    library exposes a uniform sector-oriented contract over heterogeneous
    physical encodings, and a raw sector codec that infers media type and
    geometry from the image size, companion sidecar files and embedded
    device descriptors.
*/

//! # fluxfox_media
//!
//! `fluxfox_media` is a library for reading and writing byte-exact sector images of legacy media.
//!
//! The [MediaImage] trait is the base read contract every image codec implements. Codecs that
//! support more advertise it through capability traits: [OpticalMediaImage],
//! [VerifiableSectorsImage] and [WritableImage]. Callers discover these capabilities at runtime
//! through the `as_*` query methods on [MediaImage].
//!
//! The flagship codec is [RawImage], which reads headerless sector dumps. It identifies images by
//! extension and size, infers a [MediaType] and CHS geometry, loads companion sidecar tag files,
//! and understands raw 2352/2448-byte CD sectors.

pub mod convert;
mod detect;
mod file_parsers;
pub mod inference;
pub mod media_image;
pub mod sector_layout;
pub mod sidecar;
pub mod structure_parsers;
pub mod types;
pub mod util;

pub mod io;

use std::sync::Arc;
use thiserror::Error;

pub const DEFAULT_SECTOR_SIZE: usize = 512;
/// The largest logical sector size any codec will accept.
pub const MAXIMUM_SECTOR_SIZE: usize = 65536;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MediaImageError {
    #[error("The image was not recognized by any format")]
    Unrecognized,
    #[error("The image could not be opened: {0}")]
    Unreadable(String),
    #[error("The image could not be created or written: {0}")]
    Unwritable(String),
    #[error("Address {address} + {count} sectors exceeds the image size of {sectors} sectors")]
    OutOfRange { address: u64, count: u64, sectors: u64 },
    #[error("Unsupported operation: {0}")]
    Unsupported(String),
    #[error("The requested tag is not present in the image")]
    NotPresent,
    #[error("The image is not open")]
    NotOpen,
    #[error("The image is already open")]
    AlreadyOpen,
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("An IO error occurred reading or writing the image: {0}")]
    IoError(String),
    #[error("A binary structure could not be decoded: {0}")]
    BinError(String),
}

impl From<std::io::Error> for MediaImageError {
    fn from(err: std::io::Error) -> Self {
        MediaImageError::IoError(err.to_string())
    }
}

impl From<binrw::Error> for MediaImageError {
    fn from(err: binrw::Error) -> Self {
        MediaImageError::BinError(err.to_string())
    }
}

/// Status messages delivered to a [ProgressCallback] during long-running batch operations.
#[derive(Clone, Debug)]
pub enum ProgressStatus {
    /// Sent once before any `Progress` message if the operation can report progress.
    ProgressSupport,
    /// Fractional completion, from 0.0 to 1.0.
    Progress(f64),
    /// A non-fatal problem was recorded.
    Warning(String),
    Complete,
    Error,
}

pub type ProgressCallback = Arc<dyn Fn(ProgressStatus) + Send + Sync>;

pub use crate::{
    detect::{detect_image_format, format_from_ext, supported_extensions},
    file_parsers::{raw::RawImage, MediaImageFileFormat},
    media_image::{
        CreateOptions,
        MediaImage,
        OpticalMediaImage,
        SectorVerification,
        VerifiableSectorsImage,
        WritableImage,
        WritableOpticalImage,
    },
    types::{
        chs::DiskChs,
        image_info::ImageInfo,
        media_type::{MediaType, MetadataMediaType},
        tags::{MediaTagType, SectorTagType},
    },
};

pub mod prelude {
    pub use crate::{
        convert::{convert_image, ConversionOutcome, ConversionReport, ConvertOptions},
        detect_image_format,
        format_from_ext,
        media_image::*,
        types::{
            chs::DiskChs,
            image_info::{DumpHardware, ImageInfo, ImageMetadata},
            media_type::{MediaType, MetadataMediaType},
            optical::{Partition, Session, Track, TrackSubchannelType, TrackType},
            tags::{MediaTagType, SectorTagType},
        },
        MediaImageError,
        MediaImageFileFormat,
        ProgressCallback,
        ProgressStatus,
        RawImage,
    };
}
