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

//! computation of output raster dimensions, either from a file size budget or from a linear scale factor.
//!
//! The size budget computation assumes file size grows with pixel count (width * height) at a fixed
//! compression ratio, hence a linear scale of `sqrt(target/current)`. This is a single pass estimate -
//! the entropy of the resampled data can make the actual output deviate from the budget in both directions.

use odin_gdal::translate::ResampleAlg;
use crate::errors::{Result, OdinWebRasterError, invalid_plan};
use crate::profile::CompressionProfile;

pub const MIB: u64 = 1024 * 1024;

#[derive(Debug,Clone,Copy,PartialEq)]
pub enum SizePlan {
    /// source file already fits into the budget - nothing to transcode
    WithinBudget,
    Downsize { scale: f64, width: usize, height: usize },
}

/// linear scale factor that reduces `current_size` to approximately `target_size`, or None if no reduction is needed
pub fn size_scale_factor (current_size: u64, target_size: u64) -> Option<f64> {
    if current_size <= target_size {
        None
    } else {
        Some( (target_size as f64 / current_size as f64).sqrt())
    }
}

pub fn plan_size (width: usize, height: usize, current_size: u64, target_size: u64) -> SizePlan {
    match size_scale_factor( current_size, target_size) {
        Some(scale) => {
            let (width, height) = scaled_dimensions( width, height, scale);
            SizePlan::Downsize { scale, width, height }
        }
        None => SizePlan::WithinBudget
    }
}

/// (floor(width*scale), floor(height*scale))
pub fn scaled_dimensions (width: usize, height: usize, scale: f64) -> (usize,usize) {
    ( (width as f64 * scale).floor() as usize, (height as f64 * scale).floor() as usize )
}

pub fn is_valid_scale (scale: f64) -> bool {
    scale.is_finite() && scale > 0.0 && scale <= 1.0
}

pub fn validate_scale (scale: f64) -> Result<f64> {
    if is_valid_scale(scale) { Ok(scale) } else { Err( OdinWebRasterError::InvalidScale(scale)) }
}

/* #region transcode plan ******************************************************************************************/

#[derive(Debug,Clone,Copy,PartialEq)]
pub enum OutputSize {
    Pixels { width: usize, height: usize },
    Scale(f64),
}

/// what the transcoder should produce. Built once per invocation and not persisted
#[derive(Debug,Clone)]
pub struct TranscodePlan {
    pub output_size: OutputSize,
    pub resample: ResampleAlg,
    pub profile: CompressionProfile,
}

impl TranscodePlan {
    pub fn new (output_size: OutputSize, resample: ResampleAlg, profile: CompressionProfile) -> Self {
        TranscodePlan { output_size, resample, profile }
    }

    /// output dimensions for a source of the given size. We only downsize, and never into an empty raster
    pub fn resolve (&self, src_width: usize, src_height: usize) -> Result<(usize,usize)> {
        let (width,height) = match self.output_size {
            OutputSize::Pixels { width, height } => (width, height),
            OutputSize::Scale(scale) => {
                validate_scale(scale)?;
                scaled_dimensions( src_width, src_height, scale)
            }
        };

        if width > src_width || height > src_height {
            return Err( invalid_plan( format!("{width}x{height} exceeds source size {src_width}x{src_height}")))
        }
        if width == 0 || height == 0 {
            return Err( invalid_plan( format!("empty output size {width}x{height} for source {src_width}x{src_height}")))
        }

        Ok((width,height))
    }
}

/* #endregion transcode plan */
