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

//! the narrow interface to GDAL we need for web rasters: inspect a raster and translate it into a
//! resampled, recompressed copy. There are two implementations with identical semantics - one that
//! uses the linked GDAL library and one that runs the GDAL command line tools as child processes.

use std::path::{Path, PathBuf};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use odin_gdal::{GeoTransform, translate::ResampleAlg};

use crate::config::GdalCommands;
use crate::errors::{Result, OdinWebRasterError};

pub mod gdal_lib;
pub mod gdal_cmd;

pub use gdal_lib::GdalLibBackend;
pub use gdal_cmd::GdalCmdBackend;

pub const INSTALL_INSTRUCTIONS: &str = "\
To install GDAL, run one of these commands:
  sudo apt-get install gdal-bin libgdal-dev
  or (macOS)
  brew install gdal
The command line tools alone are sufficient if you run with '--backend command':
  sudo apt-get install gdal-bin";

/// what we know about a raster file. Never mutated - transcoding always produces a new asset
#[derive(Debug,Clone,PartialEq)]
pub struct RasterAsset {
    pub path: PathBuf,
    pub width: usize,
    pub height: usize,
    pub n_bands: usize,
    /// GDAL data type name of the first band (e.g. "Float32", "Byte"), the same for all backends
    pub data_type: String,
    /// file size in bytes
    pub file_size: u64,
    pub geo_transform: Option<GeoTransform>,
}

/// fully resolved parameters for one translate operation
#[derive(Debug,Clone,PartialEq)]
pub struct TranslateRequest {
    pub width: usize,
    pub height: usize,
    pub resample: ResampleAlg,
    /// GDAL driver short name
    pub format: String,
    pub creation_options: Vec<String>,
}

pub trait RasterBackend {
    fn name (&self) -> &'static str;

    /// dimensions, band info, file size and geotransform of the raster at `path`
    fn inspect (&self, path: &Path) -> Result<RasterAsset>;

    /// write a resampled and recompressed copy of `src` to `dst`. Must not modify `src`
    fn translate (&self, src: &Path, dst: &Path, request: &TranslateRequest) -> Result<()>;
}

impl <T: RasterBackend + ?Sized> RasterBackend for Box<T> {
    fn name (&self) -> &'static str { (**self).name() }
    fn inspect (&self, path: &Path) -> Result<RasterAsset> { (**self).inspect(path) }
    fn translate (&self, src: &Path, dst: &Path, request: &TranslateRequest) -> Result<()> { (**self).translate(src, dst, request) }
}

impl <T: RasterBackend + ?Sized> RasterBackend for &T {
    fn name (&self) -> &'static str { (**self).name() }
    fn inspect (&self, path: &Path) -> Result<RasterAsset> { (**self).inspect(path) }
    fn translate (&self, src: &Path, dst: &Path, request: &TranslateRequest) -> Result<()> { (**self).translate(src, dst, request) }
}

#[derive(Debug,Clone,Copy,PartialEq,Eq,Default,Serialize,Deserialize,ValueEnum)]
pub enum BackendChoice {
    /// use the GDAL library if it is usable, the GDAL command line tools otherwise
    #[default]
    Auto,
    Library,
    Command,
}

/// probe for the requested backend. This is the only place where we decide between library and command
pub fn select_backend (choice: BackendChoice, commands: &GdalCommands) -> Result<Box<dyn RasterBackend>> {
    match choice {
        BackendChoice::Library => {
            let backend = GdalLibBackend::probe().ok_or_else( || unavailable("GDAL library without GTiff driver"))?;
            Ok( Box::new(backend))
        }
        BackendChoice::Command => {
            let backend = GdalCmdBackend::probe(commands).ok_or_else( || unavailable( format!("{} command not found", commands.gdal_translate)))?;
            Ok( Box::new(backend))
        }
        BackendChoice::Auto => {
            if let Some(backend) = GdalLibBackend::probe() {
                info!("using GDAL library backend");
                Ok( Box::new(backend))
            } else if let Some(backend) = GdalCmdBackend::probe(commands) {
                warn!("GDAL library not usable, falling back to {}", commands.gdal_translate);
                Ok( Box::new(backend))
            } else {
                Err( unavailable("neither GDAL library nor GDAL command line tools usable"))
            }
        }
    }
}

fn unavailable<S: ToString> (msg: S) -> OdinWebRasterError {
    OdinWebRasterError::CollaboratorUnavailable(msg.to_string())
}
