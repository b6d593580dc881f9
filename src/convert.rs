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

    src/convert.rs

    Conversion of an open image into a newly created writable image.
*/

//! Image conversion.
//!
//! [convert_image] copies everything an output format can represent from an open input image:
//! media tags, geometry, tracks, sector data, provenance metadata and CICM metadata. Anything the
//! output cannot represent stops the conversion, unless [ConvertOptions::force] is set, in which
//! case it is recorded as a warning in the returned [ConversionReport].

use crate::{
    media_image::{CreateOptions, MediaImage, WritableImage},
    types::image_info::ImageInfo,
    MediaImageError,
    ProgressCallback,
    ProgressStatus,
};
use std::path::Path;

pub const DEFAULT_CHUNK_SIZE: u64 = 64;

#[derive(Clone, Debug)]
pub struct ConvertOptions {
    /// Continue past data the output cannot represent, recording a warning for each loss.
    pub force: bool,
    /// Number of sectors copied per read/write call.
    pub chunk_size: u64,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            force: false,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConversionOutcome {
    Completed,
    CompletedWithWarnings,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConversionReport {
    pub sectors_written: u64,
    pub warnings: Vec<String>,
}

impl ConversionReport {
    pub fn outcome(&self) -> ConversionOutcome {
        match self.warnings.is_empty() {
            true => ConversionOutcome::Completed,
            false => ConversionOutcome::CompletedWithWarnings,
        }
    }
}

struct Conversion<'a> {
    options: &'a ConvertOptions,
    progress: Option<&'a ProgressCallback>,
    report: ConversionReport,
}

impl Conversion<'_> {
    fn send(&self, status: ProgressStatus) {
        if let Some(callback) = self.progress {
            callback(status);
        }
    }

    /// Downgrade `err` to a warning in force mode, or return it.
    fn recover(&mut self, context: &str, err: MediaImageError) -> Result<(), MediaImageError> {
        if !self.options.force {
            log::error!("convert_image(): {}: {}", context, err);
            return Err(err);
        }
        let warning = format!("{}: {}", context, err);
        log::warn!("convert_image(): {}", warning);
        self.send(ProgressStatus::Warning(warning.clone()));
        self.report.warnings.push(warning);
        Ok(())
    }

    fn run(
        &mut self,
        input: &mut dyn MediaImage,
        output: &mut dyn WritableImage,
        output_path: &Path,
    ) -> Result<(), MediaImageError> {
        let info = input.info().clone();

        if self.options.chunk_size == 0 {
            return Err(MediaImageError::InvalidArgument("Chunk size must be at least 1".to_string()));
        }
        if info.different_track_zero_size {
            return Err(MediaImageError::Unsupported(
                "Images with an irregular track zero cannot be converted".to_string(),
            ));
        }
        if !output.supported_media_types().contains(&info.media_type) {
            return Err(MediaImageError::Unsupported(format!(
                "Output format does not support media type {}",
                info.media_type
            )));
        }

        let supported_sector_tags = output.supported_sector_tags();
        for tag in info.readable_sector_tags.iter().filter(|t| t.is_cd_sector_component()) {
            if !supported_sector_tags.contains(tag) {
                self.recover(
                    &format!("Sector tag {}", tag),
                    MediaImageError::Unsupported("not stored by the output format".to_string()),
                )?;
            }
        }

        output.create(output_path, info.media_type, &CreateOptions::new(), info.sectors, info.sector_size)?;

        // Once created, the output is closed on every exit path so its file handle is released and
        // whatever was copied is persisted.
        match self.fill(input, output, &info) {
            Ok(()) => output.close(),
            Err(e) => {
                if let Err(close_err) = output.close() {
                    log::warn!("convert_image(): Failed to close output after error: {}", close_err);
                }
                Err(e)
            }
        }
    }

    fn fill(
        &mut self,
        input: &mut dyn MediaImage,
        output: &mut dyn WritableImage,
        info: &ImageInfo,
    ) -> Result<(), MediaImageError> {
        let supported_media_tags = output.supported_media_tags();
        for &tag in &info.readable_media_tags {
            let context = format!("Media tag {}", tag);
            if !supported_media_tags.contains(&tag) {
                self.recover(
                    &context,
                    MediaImageError::Unsupported("not stored by the output format".to_string()),
                )?;
                continue;
            }
            if let Err(e) = input.read_media_tag(tag).and_then(|data| output.write_media_tag(&data, tag)) {
                self.recover(&context, e)?;
            }
        }

        if let Err(e) = output.set_geometry(info.cylinders, info.heads, info.sectors_per_track) {
            self.recover("Geometry", e)?;
        }

        if let Some(tracks) = input.as_optical().and_then(|optical| optical.tracks().ok()) {
            let tracks = tracks.to_vec();
            match output.as_writable_optical_mut() {
                Some(optical) => {
                    if let Err(e) = optical.set_tracks(tracks) {
                        self.recover("Tracks", e)?;
                    }
                }
                None => {
                    self.recover(
                        "Tracks",
                        MediaImageError::Unsupported("output format does not store tracks".to_string()),
                    )?;
                }
            }
        }

        self.copy_sectors(input, output, info.sectors)?;

        if let Err(e) = output.set_metadata(&info.metadata()) {
            self.recover("Metadata", e)?;
        }
        if let Some(dump_hardware) = input.dump_hardware() {
            if let Err(e) = output.set_dump_hardware(dump_hardware.to_vec()) {
                self.recover("Dump hardware", e)?;
            }
        }
        if let Some(cicm) = input.cicm_metadata() {
            if let Err(e) = output.set_cicm_metadata(cicm.to_vec()) {
                self.recover("CICM metadata", e)?;
            }
        }
        Ok(())
    }

    fn copy_sectors(
        &mut self,
        input: &mut dyn MediaImage,
        output: &mut dyn WritableImage,
        sectors: u64,
    ) -> Result<(), MediaImageError> {
        let mut address = 0;
        while address < sectors {
            let count = self.options.chunk_size.min(sectors - address);
            let result = input
                .read_sectors(address, count)
                .and_then(|data| output.write_sectors(&data, address, count));

            match result {
                Ok(()) => self.report.sectors_written += count,
                Err(e) => self.recover(&format!("Sectors {}..{}", address, address + count), e)?,
            }
            address += count;
            self.send(ProgressStatus::Progress(address as f64 / sectors as f64));
        }
        Ok(())
    }
}

/// Convert `input` into `output`, creating the output image at `output_path` with the input's
/// media type, sector count and sector size.
///
/// Returns a [ConversionReport] on success. In force mode, data the output could not represent
/// is listed in the report's warnings.
pub fn convert_image(
    input: &mut dyn MediaImage,
    output: &mut dyn WritableImage,
    output_path: &Path,
    options: &ConvertOptions,
    progress: Option<ProgressCallback>,
) -> Result<ConversionReport, MediaImageError> {
    let mut conversion = Conversion {
        options,
        progress: progress.as_ref(),
        report: ConversionReport::default(),
    };
    conversion.send(ProgressStatus::ProgressSupport);

    match conversion.run(input, output, output_path) {
        Ok(()) => {
            conversion.send(ProgressStatus::Complete);
            log::debug!(
                "convert_image(): Wrote {} sectors with {} warnings",
                conversion.report.sectors_written,
                conversion.report.warnings.len()
            );
            Ok(conversion.report)
        }
        Err(e) => {
            conversion.send(ProgressStatus::Error);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        structure_parsers::cd_sector::{CD_RAW_SECTOR_SIZE, CD_SYNC},
        RawImage,
        SectorTagType,
    };
    use std::sync::{Arc, Mutex};

    fn open(path: &Path) -> RawImage {
        let mut image = RawImage::new();
        image.open(path).unwrap();
        image
    }

    #[test]
    fn test_convert_floppy() {
        let dir = tempfile::tempdir().unwrap();
        let in_path = dir.path().join("in.img");
        let out_path = dir.path().join("out.ima");
        let data: Vec<u8> = (0..1_474_560u32).map(|i| (i / 512) as u8).collect();
        std::fs::write(&in_path, &data).unwrap();

        let statuses = Arc::new(Mutex::new(Vec::new()));
        let sink = statuses.clone();
        let callback: ProgressCallback = Arc::new(move |status: ProgressStatus| sink.lock().unwrap().push(status));

        let mut input = open(&in_path);
        let mut output = RawImage::new();
        let options = ConvertOptions {
            chunk_size: 1000,
            ..ConvertOptions::default()
        };
        let report = convert_image(&mut input, &mut output, &out_path, &options, Some(callback)).unwrap();

        assert_eq!(report.sectors_written, 2880);
        assert_eq!(report.outcome(), ConversionOutcome::Completed);
        assert_eq!(std::fs::read(&out_path).unwrap(), data);

        let statuses = statuses.lock().unwrap();
        let progress = statuses.iter().filter(|s| matches!(s, ProgressStatus::Progress(_))).count();
        assert_eq!(progress, 3);
        assert!(matches!(statuses.last(), Some(ProgressStatus::Complete)));
    }

    #[test]
    fn test_convert_raw_cd_requires_force() {
        let dir = tempfile::tempdir().unwrap();
        let in_path = dir.path().join("disc.bin");
        let mut data = vec![0u8; CD_RAW_SECTOR_SIZE * 4];
        for (i, sector) in data.chunks_exact_mut(CD_RAW_SECTOR_SIZE).enumerate() {
            sector[..12].copy_from_slice(&CD_SYNC);
            sector[15] = 0x01;
            sector[16..2064].fill(i as u8 + 1);
        }
        std::fs::write(&in_path, &data).unwrap();

        let mut input = open(&in_path);
        assert!(input.info().readable_sector_tags.contains(&SectorTagType::CdSectorEcc));

        let mut output = RawImage::new();
        let result = convert_image(
            &mut input,
            &mut output,
            &dir.path().join("strict.iso"),
            &ConvertOptions::default(),
            None,
        );
        assert!(matches!(result, Err(MediaImageError::Unsupported(_))));

        let out_path = dir.path().join("forced.iso");
        let mut output = RawImage::new();
        let options = ConvertOptions {
            force: true,
            ..ConvertOptions::default()
        };
        let report = convert_image(&mut input, &mut output, &out_path, &options, None).unwrap();
        assert_eq!(report.outcome(), ConversionOutcome::CompletedWithWarnings);
        assert_eq!(report.sectors_written, 4);

        let converted = std::fs::read(&out_path).unwrap();
        assert_eq!(converted.len(), 2048 * 4);
        assert!(converted[2048 * 3..].iter().all(|&b| b == 4));
    }
}
