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

//! RON configuration of the web raster tools. All fields have defaults, i.e. a config file only
//! has to contain what differs from the standard ODM project layout

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use odin_gdal::translate::ResampleAlg;

use crate::{load_config_path, same_path, backend::BackendChoice, profile::CompressionProfile, planner::{MIB, is_valid_scale}};
use crate::errors::{Result, config_error};

#[derive(Debug,Clone,Serialize,Deserialize)]
#[serde(default)]
pub struct WebRasterConfig {
    pub backend: BackendChoice,
    pub commands: GdalCommands,
    pub dem: DemConfig,
    pub orthophoto: OrthophotoConfig,
}

impl Default for WebRasterConfig {
    fn default() -> Self {
        WebRasterConfig {
            backend: BackendChoice::Auto,
            commands: GdalCommands::default(),
            dem: DemConfig::default(),
            orthophoto: OrthophotoConfig::default(),
        }
    }
}

impl WebRasterConfig {
    /// load from optional RON file, falling back to defaults if there is none
    pub fn load (path: Option<&Path>) -> Result<Self> {
        let config: WebRasterConfig = match path {
            Some(path) => load_config_path(path)?,
            None => WebRasterConfig::default()
        };
        config.check()?;
        Ok(config)
    }

    pub fn check (&self) -> Result<()> {
        if self.dem.target_size == 0 {
            return Err( config_error("DEM target_size has to be > 0"))
        }
        if !is_valid_scale( self.orthophoto.default_scale) {
            return Err( config_error( format!("orthophoto default_scale {} not within (0,1]", self.orthophoto.default_scale)))
        }
        if same_path( &self.dem.input, &self.dem.output) {
            return Err( config_error("DEM input and output are the same file"))
        }
        if same_path( &self.orthophoto.input, &self.orthophoto.output) {
            return Err( config_error("orthophoto input and output are the same file"))
        }
        Ok(())
    }
}

/// executables used by the command backend (either absolute paths or names looked up in PATH)
#[derive(Debug,Clone,Serialize,Deserialize)]
#[serde(default)]
pub struct GdalCommands {
    pub gdal_translate: String,
    pub gdalinfo: String,
}

impl Default for GdalCommands {
    fn default() -> Self {
        GdalCommands { gdal_translate: "gdal_translate".into(), gdalinfo: "gdalinfo".into() }
    }
}

#[derive(Debug,Clone,Serialize,Deserialize)]
#[serde(default)]
pub struct DemConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// file size budget in bytes
    pub target_size: u64,
    pub resample: ResampleAlg,
    pub profile: CompressionProfile,
}

impl Default for DemConfig {
    fn default() -> Self {
        DemConfig {
            input: PathBuf::from("all/odm_dem/dsm.tif"),
            output: PathBuf::from("all/odm_dem/dsm_web.tif"),
            target_size: 10 * MIB,
            resample: ResampleAlg::Bilinear, // avoids aliasing in terrain measurements
            profile: CompressionProfile::elevation(),
        }
    }
}

#[derive(Debug,Clone,Serialize,Deserialize)]
#[serde(default)]
pub struct OrthophotoConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// linear scale if none is given on the command line. 0.5 results in about 25% of the original file size
    pub default_scale: f64,
    pub resample: ResampleAlg,
    pub profile: CompressionProfile,
}

impl Default for OrthophotoConfig {
    fn default() -> Self {
        OrthophotoConfig {
            input: PathBuf::from("all/odm_orthophoto/odm_orthophoto.tif"),
            output: PathBuf::from("all/odm_orthophoto/odm_orthophoto_web.tif"),
            default_scale: 0.5,
            resample: ResampleAlg::Average,
            profile: CompressionProfile::imagery(),
        }
    }
}
