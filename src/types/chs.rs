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

    src/types/chs.rs

    Cylinder-Head-Sector geometry.
*/

//! The `chs` module defines the [DiskChs] structure used as a drive geometry: counts of
//! cylinders, heads and sectors per track.

use std::fmt::Display;

/// A structure representing three components of Cylinder-Head-Sector addressing:
///  - Cylinder (c)
///  - Head (h)
///  - Sector (s)
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiskChs {
    pub(crate) c: u32,
    pub(crate) h: u32,
    pub(crate) s: u32,
}

impl From<(u32, u32, u32)> for DiskChs {
    fn from((c, h, s): (u32, u32, u32)) -> Self {
        Self { c, h, s }
    }
}

impl From<DiskChs> for (u32, u32, u32) {
    fn from(chs: DiskChs) -> Self {
        (chs.c, chs.h, chs.s)
    }
}

impl Display for DiskChs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[c:{:2} h:{} s:{:3}]", self.c, self.h, self.s)
    }
}

impl DiskChs {
    /// Create a new `DiskChs` structure from cylinder, head and sector components.
    pub const fn new(c: u32, h: u32, s: u32) -> Self {
        Self { c, h, s }
    }
    /// Return the cylinder, head and sector components in a tuple.
    #[inline]
    pub fn get(&self) -> (u32, u32, u32) {
        (self.c, self.h, self.s)
    }

    /// Return the number of sectors represented by a DiskChs structure, interpreted as drive geometry.
    pub fn total_sectors(&self) -> u64 {
        self.c as u64 * self.h as u64 * self.s as u64
    }
}
