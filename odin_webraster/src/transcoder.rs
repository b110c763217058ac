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

use std::{fmt, fs, path::Path, time::SystemTime};
use tracing::{debug, info, warn};
use odin_gdal::{rescale_geotransform, geotransform_matches, get_driver_name_from_filename};

use crate::{file_length, same_path};
use crate::backend::{RasterBackend, RasterAsset, TranslateRequest};
use crate::planner::{TranscodePlan, MIB};
use crate::errors::{Result, input_missing, invalid_plan, verification_failed};

/// relative tolerance for comparing the output geotransform with the rescaled source geotransform
const GEOTRANSFORM_EPS: f64 = 1e-6;

/// produces new rasters according to a TranscodePlan, using the provided backend for all pixel and format work
pub struct Transcoder<B: RasterBackend> {
    backend: B,
}

impl <B: RasterBackend> Transcoder<B> {
    pub fn new (backend: B) -> Self {
        Transcoder { backend }
    }

    pub fn backend (&self) -> &B { &self.backend }

    /// inspect an existing raster file
    pub fn inspect (&self, path: &Path) -> Result<RasterAsset> {
        if !path.is_file() {
            return Err( input_missing( path.display()))
        }
        self.backend.inspect(path)
    }

    pub fn transcode (&self, src: &Path, dst: &Path, plan: &TranscodePlan) -> Result<TranscodeReport> {
        let source = self.inspect(src)?;
        self.transcode_asset( &source, dst, plan)
    }

    /// transcode an already inspected source. Output that fails verification is removed
    pub fn transcode_asset (&self, source: &RasterAsset, dst: &Path, plan: &TranscodePlan) -> Result<TranscodeReport> {
        if same_path( &source.path, dst) {
            return Err( invalid_plan( format!("output would overwrite input {:?}", dst)))
        }

        let (width, height) = plan.resolve( source.width, source.height)?;
        let format = dst.to_str()
            .and_then( get_driver_name_from_filename)
            .unwrap_or("GTiff"); // our last fallback

        let request = TranslateRequest {
            width,
            height,
            resample: plan.resample,
            format: format.to_string(),
            creation_options: plan.profile.creation_options(),
        };

        info!("{} {:?} ({}x{}) -> {:?} ({}x{}, {})", self.backend.name(), source.path, source.width, source.height,
              dst, width, height, request.resample);
        debug!("creation options: {:?}", request.creation_options);

        let prev_stamp = file_stamp(dst);
        let result = self.backend.translate( &source.path, dst, &request)
            .and_then( |_| self.verify( source, dst, (width,height)));

        match result {
            Ok(output) => Ok( TranscodeReport { source: source.clone(), output }),
            Err(e) => {
                remove_invalid_output( &source.path, dst, prev_stamp);
                Err(e)
            }
        }
    }

    /// we don't trust a successful backend return - the output has to exist, match the planned size and still be
    /// georeferenced consistently with the source
    fn verify (&self, source: &RasterAsset, dst: &Path, size: (usize,usize)) -> Result<RasterAsset> {
        if !dst.is_file() {
            return Err( verification_failed( format!("output {:?} does not exist", dst)))
        }
        if file_length(dst)? == 0 {
            return Err( verification_failed( format!("output {:?} is empty", dst)))
        }

        let output = self.backend.inspect(dst)?;
        if (output.width, output.height) != size {
            return Err( verification_failed( format!("output size {}x{} differs from planned {}x{}",
                                                     output.width, output.height, size.0, size.1)))
        }

        match (&source.geo_transform, &output.geo_transform) {
            (Some(src_gt), Some(out_gt)) => {
                let expected = rescale_geotransform( src_gt, (source.width, source.height), size);
                if !geotransform_matches( &expected, out_gt, GEOTRANSFORM_EPS) {
                    return Err( verification_failed( format!("output geotransform {out_gt:?} does not match {expected:?}")))
                }
            }
            (Some(_), None) => {
                return Err( verification_failed("output lost its geotransform"))
            }
            _ => {} // source was not georeferenced
        }

        Ok(output)
    }
}

/// length and modification time of an existing file
fn file_stamp (path: &Path) -> Option<(u64,SystemTime)> {
    let meta = fs::metadata(path).ok()?;
    Some( (meta.len(), meta.modified().ok()?) )
}

/// remove what the failed run wrote to `dst`. A file that was already there and was not touched by this run
/// is kept, and we never remove the source
fn remove_invalid_output (src: &Path, dst: &Path, prev_stamp: Option<(u64,SystemTime)>) {
    if !dst.is_file() || same_path( src, dst) {
        return
    }
    if prev_stamp.is_some() && file_stamp(dst) == prev_stamp {
        debug!("keeping untouched previous output {:?}", dst);
        return
    }

    warn!("removing invalid output {:?}", dst);
    if let Err(e) = fs::remove_file(dst) {
        warn!("failed to remove {:?}: {e}", dst);
    }
}

/* #region report *************************************************************************************************/

/// advisory summary of a transcode operation
#[derive(Debug,Clone)]
pub struct TranscodeReport {
    pub source: RasterAsset,
    pub output: RasterAsset,
}

impl TranscodeReport {
    /// source size / output size
    pub fn compression_ratio (&self) -> f64 {
        if self.output.file_size == 0 { f64::INFINITY } else { self.source.file_size as f64 / self.output.file_size as f64 }
    }

    /// size reduction in percent of the source size (negative if the output got bigger)
    pub fn reduction_percent (&self) -> f64 {
        if self.source.file_size == 0 { return 0.0 }
        let src = self.source.file_size as f64;
        (src - self.output.file_size as f64) / src * 100.0
    }
}

pub fn size_in_mib (bytes: u64) -> f64 {
    bytes as f64 / MIB as f64
}

impl fmt::Display for TranscodeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "original size:     {:.1} MB ({}x{})", size_in_mib(self.source.file_size), self.source.width, self.source.height)?;
        writeln!(f, "new size:          {:.1} MB ({}x{})", size_in_mib(self.output.file_size), self.output.width, self.output.height)?;
        writeln!(f, "compression ratio: {:.1}x", self.compression_ratio())?;
        write!(f, "reduction:         {:.1}%", self.reduction_percent())
    }
}

/* #endregion report */
