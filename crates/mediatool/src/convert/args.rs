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

    crates/mediatool/src/convert/args.rs

    Arguments of the convert subcommand.
*/

use crate::args::*;
use bpaf::{construct, long, Parser};
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub(crate) struct ConvertParams {
    pub(crate) in_file: PathBuf,
    pub(crate) out_file: PathBuf,
    pub(crate) force: bool,
    pub(crate) chunk_size: Option<u64>,
}

fn force_parser() -> impl Parser<bool> {
    long("force")
        .short('f')
        .switch()
        .help("Continue converting when the output format cannot represent some of the input")
}

fn chunk_parser() -> impl Parser<u64> {
    long("chunk")
        .argument::<u64>("SECTORS")
        .help("Specify the number of sectors copied at a time")
        .guard(|&size| size > 0, "Chunk size must be at least 1")
}

pub(crate) fn convert_parser() -> impl Parser<ConvertParams> {
    let in_file = in_file_parser();
    let out_file = out_file_parser();
    let force = force_parser();
    let chunk_size = chunk_parser().optional();

    construct!(ConvertParams {
        in_file,
        out_file,
        force,
        chunk_size,
    })
}
