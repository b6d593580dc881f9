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

    crates/mediatool/src/convert/mod.rs

    The convert subcommand.
*/

pub mod args;

use crate::{args::GlobalOptions, open_image};
use anyhow::{bail, Error};
use fluxfox_media::{convert::DEFAULT_CHUNK_SIZE, prelude::*};
use std::sync::Arc;

pub(crate) fn run(global: &GlobalOptions, params: &args::ConvertParams) -> Result<(), Error> {
    let mut input = open_image(&params.in_file, global.silent)?;

    // Get extension from output filename
    let ext_str = match params.out_file.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => ext,
        None => {
            bail!("Error: A file extension is required for the output file!");
        }
    };
    let output_format = match format_from_ext(ext_str) {
        Some(format) => format,
        None => {
            bail!("Error: Unknown output file extension: {}", ext_str);
        }
    };
    let mut output = match output_format.new_writable() {
        Some(output) => output,
        None => {
            bail!("Error: Output format {} is not writable", output_format);
        }
    };

    if !global.silent {
        println!("Output image type: {}", output_format);
    }

    let options = ConvertOptions {
        force: params.force,
        chunk_size: params.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE),
    };

    let silent = global.silent;
    let callback: ProgressCallback = Arc::new(move |status: ProgressStatus| match status {
        ProgressStatus::Warning(warning) if !silent => eprintln!("Warning: {}", warning),
        _ => {}
    });

    match convert_image(input.as_mut(), output.as_mut(), &params.out_file, &options, Some(callback)) {
        Ok(report) => {
            match report.outcome() {
                ConversionOutcome::Completed => println!(
                    "Conversion completed: {} sectors written to {}",
                    report.sectors_written,
                    params.out_file.display()
                ),
                ConversionOutcome::CompletedWithWarnings => println!(
                    "Conversion completed with {} warnings: {} sectors written to {}",
                    report.warnings.len(),
                    report.sectors_written,
                    params.out_file.display()
                ),
            }
            Ok(())
        }
        Err(e) => {
            if let Some(message) = output.error_message() {
                log::debug!("Output image error: {}", message);
            }
            bail!("Conversion failed: {}", e);
        }
    }
}
