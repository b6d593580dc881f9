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

    crates/mediatool/src/dump/args.rs

    Arguments of the dump subcommand.
*/

use crate::args::*;
use bpaf::{construct, long, Parser};
use fluxfox_media::types::{tags::sector_tag_from_str, SectorTagType};
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub(crate) struct DumpParams {
    pub(crate) in_file: PathBuf,
    pub(crate) sector: u64,
    pub(crate) count: u64,
    pub(crate) long: bool,
    pub(crate) tag: Option<SectorTagType>,
    pub(crate) row_size: Option<u8>,
}

fn sector_parser() -> impl Parser<u64> {
    long("sector")
        .short('s')
        .argument::<u64>("SECTOR")
        .help("Specify the first sector (LBA) to dump")
        .fallback(0)
}

fn count_parser() -> impl Parser<u64> {
    long("count")
        .short('c')
        .argument::<u64>("COUNT")
        .help("Specify the number of sectors to dump")
        .guard(|&count| count > 0, "Count must be at least 1")
        .fallback(1)
}

fn long_parser() -> impl Parser<bool> {
    long("long")
        .help("Dump full physical sectors, including any sync, header, ECC and subchannel")
        .switch()
}

fn tag_parser() -> impl Parser<SectorTagType> {
    long("tag")
        .short('t')
        .argument::<String>("TAG")
        .help("Dump a sector tag instead of user data, such as CdSectorHeader")
        .parse(|tag| sector_tag_from_str(&tag).ok_or(format!("Unknown sector tag: {}", tag)))
}

fn row_size_parser() -> impl Parser<u8> {
    long("row-size")
        .argument::<u8>("SIZE")
        .help("Specify the number of elements per row to be dumped")
        .guard(|&size| (8..=128).contains(&size), "Size must be between 8 and 128")
}

pub(crate) fn dump_parser() -> impl Parser<DumpParams> {
    let in_file = in_file_parser();
    let sector = sector_parser();
    let count = count_parser();
    let long = long_parser();
    let tag = tag_parser().optional();
    let row_size = row_size_parser().optional();

    construct!(DumpParams {
        in_file,
        sector,
        count,
        long,
        tag,
        row_size
    })
}
