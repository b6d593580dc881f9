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

    crates/mediatool/src/main.rs

    mediatool inspects, dumps and converts sector images.
*/

pub mod args;
pub mod convert;
pub mod dump;
pub mod info;

use anyhow::{Context, Error};
use bpaf::Parser;
use fluxfox_media::prelude::*;
use std::path::Path;

use crate::args::Command;
use args::command_parser;

fn main() -> Result<(), Error> {
    env_logger::init();

    let app_params = command_parser().run();

    let command_result = match &app_params.command {
        Command::Version => {
            println!("mediatool v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Command::Convert(params) => convert::run(&app_params.global, params),
        Command::Dump(params) => dump::run(&app_params.global, params),
        Command::Info(params) => info::run(&app_params.global, params),
    };

    match command_result {
        Ok(_) => Ok(()),
        Err(e) => {
            eprintln!("Command '{}' failed: {}", app_params.command, e);
            for cause in e.chain().skip(1) {
                eprintln!("Caused by: {}", cause);
            }
            std::process::exit(1);
        }
    }
}

/// Detect the format of the image at `path` and open it.
pub(crate) fn open_image(path: &Path, silent: bool) -> Result<Box<dyn MediaImage>, Error> {
    let format =
        detect_image_format(path).with_context(|| format!("Error detecting image type of {}", path.display()))?;

    if !silent {
        println!("Detected image type: {}", format);
    }

    let mut image = format.new_image();
    image
        .open(path)
        .with_context(|| format!("Error opening image {}", path.display()))?;
    Ok(image)
}
