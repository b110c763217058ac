/*
 * Copyright © 2024, United States Government, as represented by the Administrator of
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

//! in-process equivalent of the `gdal_translate` tool, used to resample and recompress rasters
//! without spawning a child process

use std::{ffi::CString, fmt, path::Path, ptr::null_mut};
use libc::c_int;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use gdal::{Dataset, Metadata, cpl::CslStringList};
use tracing::debug;

use crate::errors::{Result, OdinGdalError, last_gdal_error, invalid_argument};

/// the resampling algorithms we support for translate operations.
/// The names are the ones used by the `-r` option of GDAL utilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum ResampleAlg {
    Nearest,
    Bilinear,
    Cubic,
    CubicSpline,
    Lanczos,
    Average,
    Mode,
}

impl ResampleAlg {
    pub fn gdal_name (&self) -> &'static str {
        match *self {
            ResampleAlg::Nearest => "nearest",
            ResampleAlg::Bilinear => "bilinear",
            ResampleAlg::Cubic => "cubic",
            ResampleAlg::CubicSpline => "cubicspline",
            ResampleAlg::Lanczos => "lanczos",
            ResampleAlg::Average => "average",
            ResampleAlg::Mode => "mode",
        }
    }
}

impl fmt::Display for ResampleAlg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.gdal_name())
    }
}

/// builder for a single GDALTranslate call. Only the options we need to create resampled,
/// recompressed copies are supported - spatial reference and geotransform are carried over by GDAL
/// and rescaled according to the new pixel grid.
pub struct SimpleTranslateBuilder<'a> {
    src_ds: &'a Dataset,
    tgt_path: &'a Path,
    tgt_format: Option<String>,
    tgt_size: Option<(usize,usize)>,
    resample_alg: Option<ResampleAlg>,
    create_options: Vec<String>,
}

impl <'a> SimpleTranslateBuilder<'a> {

    pub fn new (src_ds: &'a Dataset, tgt_path: &'a Path) -> Result<SimpleTranslateBuilder<'a>> {
        if tgt_path.to_str().is_none() {
            return Err( OdinGdalError::InvalidFileName(format!("{tgt_path:?}")))
        }

        Ok( SimpleTranslateBuilder {
            src_ds,
            tgt_path,
            tgt_format: None,
            tgt_size: None,
            resample_alg: None,
            create_options: Vec::new(),
        })
    }

    pub fn set_tgt_format (&mut self, format: &str) -> Result<&mut Self> {
        if format.is_empty() { return Err( invalid_argument("empty target format")) }
        self.tgt_format = Some(format.to_string());
        Ok(self)
    }

    /// explicit output size in pixels
    pub fn set_tgt_size (&mut self, width: usize, height: usize) -> &mut Self {
        self.tgt_size = Some((width,height));
        self
    }

    pub fn set_resample_alg (&mut self, alg: ResampleAlg) -> &mut Self {
        self.resample_alg = Some(alg);
        self
    }

    /// creation options have to be in "KEY=VALUE" format
    pub fn set_create_options<S: AsRef<str>> (&mut self, opts: &[S]) -> &mut Self {
        self.create_options = opts.iter().map( |s| s.as_ref().to_string()).collect();
        self
    }

    /// the gdal_translate style argument vector this builder represents
    pub fn translate_args (&self) -> Vec<String> {
        let mut args: Vec<String> = Vec::new();

        if let Some(fmt) = &self.tgt_format {
            args.push("-of".into());
            args.push(fmt.clone());
        }
        if let Some((w,h)) = self.tgt_size {
            args.push("-outsize".into());
            args.push(w.to_string());
            args.push(h.to_string());
        }
        if let Some(alg) = self.resample_alg {
            args.push("-r".into());
            args.push(alg.gdal_name().into());
        }
        for co in &self.create_options {
            args.push("-co".into());
            args.push(co.clone());
        }

        args
    }

    /// run the translation and return the (open) target dataset.
    /// The target dataset is closed (and flushed) once the returned value is dropped
    pub fn exec (&self) -> Result<Dataset> {
        let args = self.translate_args();
        debug!("GDALTranslate {:?} -> {:?} with {:?}", self.src_ds.description(), self.tgt_path, args);

        let mut argv = CslStringList::new();
        for a in &args {
            argv.add_string(a.as_str())?;
        }

        let tgt_name = self.tgt_path.to_str().ok_or_else( || OdinGdalError::InvalidFileName(format!("{:?}", self.tgt_path)))?;
        let c_tgt_name = CString::new(tgt_name)?;

        unsafe {
            gdal_sys::CPLErrorReset();

            let opts = gdal_sys::GDALTranslateOptionsNew( argv.as_ptr(), null_mut());
            if opts.is_null() {
                return Err(last_gdal_error())
            }

            let mut usage_error: c_int = 0;
            let h_ds = gdal_sys::GDALTranslate( c_tgt_name.as_ptr(), self.src_ds.c_dataset(), opts, &mut usage_error);
            gdal_sys::GDALTranslateOptionsFree(opts);

            if h_ds.is_null() {
                return Err(last_gdal_error())
            }
            if usage_error != 0 {
                let _ = Dataset::from_c_dataset(h_ds); // make sure it gets closed
                return Err( invalid_argument(format!("GDALTranslate usage error for {:?}", args)))
            }

            Ok( Dataset::from_c_dataset(h_ds) )
        }
    }
}
