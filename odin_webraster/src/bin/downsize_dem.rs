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
    tools::{self, DemOutcome, ensure_input},
    transcoder::size_in_mib,
    errors::Result,
};

#[derive(Parser,Debug)]
#[command(about = "downsize_dem - create a web optimized version of the ODM digital surface model")]
struct CliOpts {
    /// RON file to override default paths, size budget and compression
    #[arg(long)]
    config: Option<PathBuf>,

    /// GDAL backend to use (default from config, which defaults to auto)
    #[arg(long, value_enum)]
    backend: Option<BackendChoice>,
}

fn main() -> ExitCode {
    init_tracing();
    let args = CliOpts::parse();

    match run( &args) {
        Ok(()) => {
            println!("\n{}", "=".repeat(60));
            println!("✅ SUCCESS!");
            println!("{}", "=".repeat(60));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("ERROR: {e}");
            if let Some(hint) = tools::remediation(&e) { eprintln!("{hint}"); }
            eprintln!("\n❌ Failed to create web DEM");
            ExitCode::FAILURE
        }
    }
}

fn run (args: &CliOpts) -> Result<()> {
    let config = WebRasterConfig::load( args.config.as_deref())?;
    let dem = &config.dem;
    ensure_input( &dem.input)?;

    println!("{}", "=".repeat(60));
    println!("DEM Web Optimizer for Drone Mapping");
    println!("{}", "=".repeat(60));
    println!("Loading DEM from: {}", dem.input.display());

    let backend = select_backend( args.backend.unwrap_or(config.backend), &config.commands)?;
    let transcoder = Transcoder::new(backend);

    match tools::downsize_dem( &transcoder, dem)? {
        DemOutcome::WithinBudget(source) => {
            println!("DEM is {:.1} MB, already under {:.1} MB - no need to downsize",
                     size_in_mib(source.file_size), size_in_mib(dem.target_size));
        }
        DemOutcome::Downsized { scale, report } => {
            println!("Downsampled with scale {scale:.2}");
            println!("{report}");
            println!("✅ Created web-optimized DEM: {}", dem.output.display());
            println!("\nYour measurement tools will now work with 3D terrain data!");
        }
    }

    Ok(())
}
