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

//! the two web raster tools: size budget based DEM downsizing and scale based orthophoto downsizing

use std::path::Path;
use tracing::{info, warn};

use crate::backend::{RasterBackend, RasterAsset};
use crate::config::{DemConfig, OrthophotoConfig};
use crate::planner::{plan_size, validate_scale, OutputSize, SizePlan, TranscodePlan};
use crate::transcoder::{Transcoder, TranscodeReport};
use crate::errors::{Result, OdinWebRasterError, input_missing};

#[derive(Debug)]
pub enum DemOutcome {
    /// source already fits into the size budget, no output was written
    WithinBudget(RasterAsset),
    Downsized { scale: f64, report: TranscodeReport },
}

pub fn ensure_input (path: &Path) -> Result<()> {
    if path.is_file() { Ok(()) } else { Err( input_missing( path.display())) }
}

/// scale as resolved from the (optional) command line argument
#[derive(Debug,Clone,PartialEq)]
pub struct ScaleArg {
    pub scale: f64,
    /// argument that could not be parsed and was replaced by the default scale
    pub rejected: Option<String>,
}

impl ScaleArg {
    /// operator notice if we fell back to the default scale
    pub fn fallback_notice (&self) -> Option<String> {
        self.rejected.as_ref().map( |arg| format!("Warning: Invalid scale value '{arg}', using default: {}", self.scale))
    }
}

/// scale from an optional command line argument. Unparsable values fall back to `default_scale`,
/// parsable values outside of (0,1] are rejected
pub fn resolve_scale (arg: Option<&str>, default_scale: f64) -> Result<ScaleArg> {
    match arg {
        Some(s) => match s.trim().parse::<f64>() {
            Ok(scale) => Ok( ScaleArg { scale: validate_scale(scale)?, rejected: None }),
            Err(_) => {
                warn!("invalid scale value '{s}', using default: {default_scale}");
                Ok( ScaleArg { scale: default_scale, rejected: Some(s.to_string()) })
            }
        }
        None => Ok( ScaleArg { scale: default_scale, rejected: None })
    }
}

pub fn downsize_dem<B: RasterBackend> (transcoder: &Transcoder<B>, config: &DemConfig) -> Result<DemOutcome> {
    ensure_input( &config.input)?;
    let source = transcoder.inspect( &config.input)?;

    match plan_size( source.width, source.height, source.file_size, config.target_size) {
        SizePlan::WithinBudget => {
            info!("{:?} ({} bytes) is already within budget of {} bytes", source.path, source.file_size, config.target_size);
            Ok( DemOutcome::WithinBudget(source))
        }
        SizePlan::Downsize { scale, width, height } => {
            info!("downsampling {:?} to {width}x{height} (scale: {scale:.2})", source.path);
            let plan = TranscodePlan::new( OutputSize::Pixels{width,height}, config.resample, config.profile.clone());
            let report = transcoder.transcode_asset( &source, &config.output, &plan)?;
            Ok( DemOutcome::Downsized { scale, report })
        }
    }
}

pub fn downsize_orthophoto<B: RasterBackend> (transcoder: &Transcoder<B>, config: &OrthophotoConfig, scale: f64) -> Result<TranscodeReport> {
    let scale = validate_scale(scale)?;
    ensure_input( &config.input)?;

    let plan = TranscodePlan::new( OutputSize::Scale(scale), config.resample, config.profile.clone());
    transcoder.transcode( &config.input, &config.output, &plan)
}

/// validate everything that does not need the backend, in the order the orthophoto tool reports it
pub fn check_orthophoto_args (config: &OrthophotoConfig, scale_arg: Option<&str>) -> Result<ScaleArg> {
    let scale = resolve_scale( scale_arg, config.default_scale)?;
    ensure_input( &config.input)?;
    Ok(scale)
}

/// user facing hint for errors the operator can fix
pub fn remediation (e: &OdinWebRasterError) -> Option<&'static str> {
    match e {
        OdinWebRasterError::CollaboratorUnavailable(_) => Some( crate::backend::INSTALL_INSTRUCTIONS),
        OdinWebRasterError::InputMissing(_) => Some("Make sure you have run WebODM/ODM processing first"),
        OdinWebRasterError::InvalidScale(_) => Some("Scale must be between 0 and 1"),
        _ => None
    }
}
