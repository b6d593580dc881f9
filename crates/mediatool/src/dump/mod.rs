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

    crates/mediatool/src/dump/mod.rs

    The dump subcommand. Writes a hex dump of sectors, long sectors or sector
    tags to stdout.
*/

pub(crate) mod args;

use anyhow::{bail, Error};
use std::io::{BufWriter, Write};

use crate::{args::GlobalOptions, open_image};

pub(crate) fn run(global: &GlobalOptions, params: &args::DumpParams) -> Result<(), Error> {
    let row_size = params.row_size.unwrap_or(16) as usize;
    let mut image = open_image(&params.in_file, global.silent)?;

    if params.long && params.tag.is_some() {
        bail!("--long and --tag cannot be combined");
    }

    let (what, result) = match (params.long, params.tag) {
        (true, _) => ("long sectors", image.read_sectors_long(params.sector, params.count)),
        (false, Some(tag)) => ("sector tag", image.read_sectors_tag(params.sector, params.count, tag)),
        (false, None) => ("sectors", image.read_sectors(params.sector, params.count)),
    };

    let data = match result {
        Ok(data) => data,
        Err(e) => {
            bail!("Error reading {}: {}", what, e);
        }
    };

    if !global.silent {
        match params.tag {
            Some(tag) => println!(
                "Dumping {} {} of {} sector(s) from sector {}:",
                what, tag, params.count, params.sector
            ),
            None => println!("Dumping {} {} sector(s) from sector {}:", params.count, what, params.sector),
        }
    }

    let mut buf = BufWriter::new(std::io::stdout());
    fluxfox_media::util::dump_slice(&data, 0, row_size, &mut buf)?;
    buf.flush()?;
    Ok(())
}
