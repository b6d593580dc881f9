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

    src/sidecar.rs

    The sidecar tag store: media tag blobs persisted as companion files next
    to a sector image, named by appending a fixed suffix per tag to the image
    path with its extension removed.
*/

use crate::{types::tags::MediaTagType, MediaImageError};
use std::{
    collections::BTreeMap,
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

/// Tags that are both loaded from and saved to companion files.
#[rustfmt::skip]
pub const READ_WRITE_SUFFIXES: [(MediaTagType, &str); 32] = [
    (MediaTagType::AtaIdentify,         ".identify.bin"),
    (MediaTagType::BdDi,                ".di.bin"),
    (MediaTagType::CdAtip,              ".atip.bin"),
    (MediaTagType::CdFullToc,           ".toc.bin"),
    (MediaTagType::CdLeadIn,            ".leadin.bin"),
    (MediaTagType::CdPma,               ".pma.bin"),
    (MediaTagType::CdText,              ".cdtext.bin"),
    (MediaTagType::DvdBca,              ".bca.bin"),
    (MediaTagType::DvdCmi,              ".cmi.bin"),
    (MediaTagType::DvdDmi,              ".dmi.bin"),
    (MediaTagType::DvdMediaIdentifier,  ".mid.bin"),
    (MediaTagType::DvdPfi,              ".pfi.bin"),
    (MediaTagType::DvdrPreRecordedInfo, ".pri.bin"),
    (MediaTagType::DvdrRmd,             ".rmd.bin"),
    (MediaTagType::DvdRamDds,           ".dds.bin"),
    (MediaTagType::DvdRamSpareArea,     ".sai.bin"),
    (MediaTagType::FloppyLeadOut,       ".leadout.bin"),
    (MediaTagType::HdDvdCpi,            ".cpi.bin"),
    (MediaTagType::MmcExtendedCsd,      ".ecsd.bin"),
    (MediaTagType::PcmciaCis,           ".cis.bin"),
    (MediaTagType::ScsiInquiry,         ".inquiry.bin"),
    (MediaTagType::ScsiModePage2A,      ".modepage2a.bin"),
    (MediaTagType::ScsiModeSense10,     ".modesense10.bin"),
    (MediaTagType::ScsiModeSense6,      ".modesense.bin"),
    (MediaTagType::SdCid,               ".cid.bin"),
    (MediaTagType::SdCsd,               ".csd.bin"),
    (MediaTagType::SdOcr,               ".ocr.bin"),
    (MediaTagType::SdScr,               ".scr.bin"),
    (MediaTagType::UsbDescriptors,      ".usbdescriptors.bin"),
    (MediaTagType::XboxDmi,             ".xboxdmi.bin"),
    (MediaTagType::XboxPfi,             ".xboxpfi.bin"),
    (MediaTagType::XboxSecuritySector,  ".ss.bin"),
];

/// Tags produced by promotion. They are saved under the suffix of the tag they were renamed from,
/// so that a saved image reloads with its original sidecars.
#[rustfmt::skip]
pub const WRITE_ONLY_SUFFIXES: [(MediaTagType, &str); 9] = [
    (MediaTagType::AtapiIdentify,       ".identify.bin"),
    (MediaTagType::BdBca,               ".bca.bin"),
    (MediaTagType::BdDds,               ".dds.bin"),
    (MediaTagType::BdSpareArea,         ".sai.bin"),
    (MediaTagType::CdLeadOut,           ".leadout.bin"),
    (MediaTagType::DvdrMediaIdentifier, ".mid.bin"),
    (MediaTagType::MmcCid,              ".cid.bin"),
    (MediaTagType::MmcCsd,              ".csd.bin"),
    (MediaTagType::MmcOcr,              ".ocr.bin"),
];

pub const CICM_SUFFIX: &str = ".cicm.xml";
pub const CICM_DIRECTORY_FILE: &str = "cicm.xml";

/// Return the suffix a tag is loaded from, if it is loaded at all.
pub fn read_suffix(tag: MediaTagType) -> Option<&'static str> {
    READ_WRITE_SUFFIXES.iter().find(|(t, _)| *t == tag).map(|(_, s)| *s)
}

/// Return the suffix a tag is saved to, if it can be saved.
pub fn write_suffix(tag: MediaTagType) -> Option<&'static str> {
    read_suffix(tag).or_else(|| WRITE_ONLY_SUFFIXES.iter().find(|(t, _)| *t == tag).map(|(_, s)| *s))
}

/// Return the path of an image with its extension removed.
pub fn base_path(path: &Path) -> PathBuf {
    path.with_extension("")
}

/// Append `suffix` to `base`.
pub fn sidecar_path(base: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Media tag blobs for a single open image. At most one blob is held per tag.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SidecarTagStore {
    tags: BTreeMap<MediaTagType, Vec<u8>>,
}

impl SidecarTagStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Probe for every loadable sidecar next to `base`. Missing and empty files are skipped, as
    /// are files that cannot be read.
    pub fn load(base: &Path) -> Self {
        let mut store = SidecarTagStore::new();

        for (tag, suffix) in READ_WRITE_SUFFIXES.iter() {
            let path = sidecar_path(base, suffix);
            if !path.is_file() {
                continue;
            }
            match fs::read(&path) {
                Ok(data) if data.is_empty() => {
                    log::debug!("SidecarTagStore::load(): Ignoring empty sidecar {}", path.display());
                }
                Ok(data) => {
                    log::debug!("SidecarTagStore::load(): Found {} ({} bytes)", tag, data.len());
                    store.tags.insert(*tag, data);
                }
                Err(e) => {
                    log::warn!("SidecarTagStore::load(): Couldn't read {}: {}", path.display(), e);
                }
            }
        }
        store
    }

    /// Write one companion file per held tag next to `base`. Tags with no known suffix are skipped.
    pub fn save(&self, base: &Path) -> Result<(), MediaImageError> {
        for (tag, data) in self.tags.iter() {
            let Some(suffix) = write_suffix(*tag) else {
                log::warn!("SidecarTagStore::save(): No sidecar suffix for {}, skipping", tag);
                continue;
            };
            let path = sidecar_path(base, suffix);
            log::debug!("SidecarTagStore::save(): Writing {} to {}", tag, path.display());
            fs::write(&path, data)
                .map_err(|e| MediaImageError::Unwritable(format!("{}: {}", path.display(), e)))?;
        }
        Ok(())
    }

    pub fn get(&self, tag: MediaTagType) -> Option<&[u8]> {
        self.tags.get(&tag).map(|d| d.as_slice())
    }

    pub fn contains(&self, tag: MediaTagType) -> bool {
        self.tags.contains_key(&tag)
    }

    /// Store a blob, replacing any blob already held for `tag`.
    pub fn insert(&mut self, tag: MediaTagType, data: Vec<u8>) {
        self.tags.insert(tag, data);
    }

    /// Return a held tag, other than `tag`, that is saved to the same sidecar file as `tag`.
    pub fn suffix_conflict(&self, tag: MediaTagType) -> Option<MediaTagType> {
        let suffix = write_suffix(tag)?;
        self.tags().find(|held| *held != tag && write_suffix(*held) == Some(suffix))
    }

    pub fn remove(&mut self, tag: MediaTagType) -> Option<Vec<u8>> {
        self.tags.remove(&tag)
    }

    /// Move the blob held for `from` to `to`. Returns true if a blob was moved.
    pub fn rename(&mut self, from: MediaTagType, to: MediaTagType) -> bool {
        match self.tags.remove(&from) {
            Some(data) => {
                log::trace!("SidecarTagStore::rename(): {} -> {}", from, to);
                self.tags.insert(to, data);
                true
            }
            None => false,
        }
    }

    pub fn tags(&self) -> impl Iterator<Item = MediaTagType> + '_ {
        self.tags.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Load the CICM metadata blob for an image, from `<base>.cicm.xml` or else `cicm.xml` in the
/// image's directory.
pub fn load_cicm(base: &Path) -> Option<Vec<u8>> {
    let candidates = [
        Some(sidecar_path(base, CICM_SUFFIX)),
        base.parent().map(|dir| dir.join(CICM_DIRECTORY_FILE)),
    ];

    candidates
        .into_iter()
        .flatten()
        .filter(|path| path.is_file())
        .find_map(|path| match fs::read(&path) {
            Ok(data) if !data.is_empty() => Some(data),
            Ok(_) => None,
            Err(e) => {
                log::warn!("load_cicm(): Couldn't read {}: {}", path.display(), e);
                None
            }
        })
}

pub fn save_cicm(base: &Path, data: &[u8]) -> Result<(), MediaImageError> {
    let path = sidecar_path(base, CICM_SUFFIX);
    fs::write(&path, data).map_err(|e| MediaImageError::Unwritable(format!("{}: {}", path.display(), e)))
}
