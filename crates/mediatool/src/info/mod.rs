/*
    mediatool
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

    crates/mediatool/src/info/mod.rs

    The info subcommand.
*/

pub(crate) mod args;

use crate::{args::GlobalOptions, open_image};
use anyhow::Error;

pub(crate) fn run(global: &GlobalOptions, params: &args::InfoParams) -> Result<(), Error> {
    let mut image = open_image(&params.in_file, global.silent)?;
    let mut out = std::io::stdout();

    println!("Image info:");
    println!("{}", "-".repeat(79));
    image.info().dump_info(&mut out)?;
    println!();

    if let Some(optical) = image.as_optical() {
        if let Ok(tracks) = optical.tracks() {
            println!("Tracks:");
            println!("{}", "-".repeat(79));
            for track in tracks {
                println!(
                    "  Track {:2} session {} {:<14} sectors {}..={} ({} bytes per sector, {} raw)",
                    track.sequence,
                    track.session,
                    track.track_type.to_string(),
                    track.start_sector,
                    track.end_sector,
                    track.bytes_per_sector,
                    track.raw_bytes_per_sector
                );
            }
            println!();
        }
    }

    if let Some(cicm) = image.cicm_metadata() {
        println!("Image has {} bytes of CICM metadata", cicm.len());
    }

    if let Some(writable) = image.as_writable() {
        println!("Format can write: {}", writable.known_extensions().join(", "));
    }

    let sectors = image.info().sectors;
    if let (false, Some(verifiable)) = (global.silent, image.as_verifiable_mut()) {
        let verification = verifiable.verify_sectors(0, sectors)?;
        match verification.status {
            Some(true) => println!("All sectors verified correctly."),
            Some(false) => println!("{} sectors failed verification.", verification.failing.len()),
            None => println!("Sector integrity cannot be verified for this image."),
        }
    }

    if params.media_tags {
        let tags: Vec<_> = image.info().readable_media_tags.iter().copied().collect();
        for tag in tags {
            let data = image.read_media_tag(tag)?;
            println!("{} ({} bytes):", tag, data.len());
            fluxfox_media::util::dump_slice(&data, 0, 16, &mut out)?;
        }
    }

    Ok(())
}
