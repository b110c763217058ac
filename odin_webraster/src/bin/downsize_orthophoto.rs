/*
 * Copyright © 2026, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

use std::{path::PathBuf, process::ExitCode};
use clap::Parser;
use odin_webraster::{
    init_tracing, select_backend, BackendChoice, Transcoder, WebRasterConfig,
    tools,
    errors::Result,
};

#[derive(Parser,Debug)]
#[command(about = "downsize_orthophoto - create a smaller version of the ODM orthophoto for faster web loading")]
struct CliOpts {
    /// RON file to override default paths, default scale and compression
    #[arg(long)]
    config: Option<PathBuf>,

    /// GDAL backend to use (default from config, which defaults to auto)
    #[arg(long, value_enum)]
    backend: Option<BackendChoice>,

    /// linear scale in (0,1]: 0.25 is about 6%, 0.5 about 25% and 0.75 about 56% of the original file size
    #[arg(allow_hyphen_values = true)]
    scale: Option<String>,
}

fn main() -> ExitCode {
    init_tracing();
    let args = CliOpts::parse();

    match run( &args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {e}");
            if let Some(hint) = tools::remediation(&e) { eprintln!("{hint}"); }
            eprintln!("\nFailed to downsize the orthophoto.");
            ExitCode::FAILURE
        }
    }
}

fn run (args: &CliOpts) -> Result<()> {
    let config = WebRasterConfig::load( args.config.as_deref())?;
    let ortho = &config.orthophoto;

    // scale and input are checked before we touch GDAL
    let scale_arg = tools::check_orthophoto_args( ortho, args.scale.as_deref())?;
    if let Some(notice) = scale_arg.fallback_notice() { eprintln!("{notice}"); }
    let scale = scale_arg.scale;

    println!("{}", "=".repeat(60));
    println!("Orthophoto Downsizing Tool");
    println!("{}", "=".repeat(60));
    println!("Downsizing {}...", ortho.input.display());
    println!("Scale: {scale} ({:.0}%)", scale * 100.0);
    println!("Output: {}", ortho.output.display());

    let backend = select_backend( args.backend.unwrap_or(config.backend), &config.commands)?;
    let transcoder = Transcoder::new(backend);
    let report = tools::downsize_orthophoto( &transcoder, ortho, scale)?;

    println!("\n✓ Downsizing completed successfully!\n");
    println!("{report}");

    println!("\n{}", "=".repeat(60));
    println!("Next steps:");
    println!("1. Update app.js to use the new file:");
    println!("   Change: '{}'", ortho.input.display());
    println!("   To: '{}'", ortho.output.display());
    println!("{}", "=".repeat(60));

    Ok(())
}
