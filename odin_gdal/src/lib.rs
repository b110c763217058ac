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

pub mod errors;
pub mod translate;

use gdal::errors::CplErrType;
use lazy_static::lazy_static;
use static_init::constructor;
use std::{collections::HashMap, ffi::CStr, path::Path};
use libc::c_char;

// we re-export these so that other crates don't have to use a direct gdal depedency to import.
// this is to ensure we run bindgen for new GDAL versions that don't yet have pre-computed bindings in gdal-sys
pub use gdal::{self, Driver, DriverManager, Metadata, Dataset, errors::GdalError, GeoTransform, cpl::CslStringList};
pub use gdal::raster::{GdalType,GdalDataType,RasterBand,Buffer};
pub use gdal::spatial_ref::SpatialRef;

use crate::errors::{Result, OdinGdalError, misc_error};

lazy_static! {
    // note that we can't automatically populate this by iterating over DriverManager since some
    // drivers use the same file extension
    static ref EXT_MAP: HashMap<&'static str, &'static str> = HashMap::from( [ // file extension -> driver short name
        ("tif", "GTiff"),
        ("tiff", "GTiff"),
        ("png", "PNG"),
        ("jpg", "JPEG"),
        ("jpeg", "JPEG"),
        ("webp", "WEBP"),
        ("vrt", "VRT"),
    ]);
}

#[constructor(0)]
extern "C" fn _initialize_gdal() {
    // errors are still recorded and retrieved through errors::last_gdal_error()
    gdal::config::set_error_handler(no_error_output);
}

fn no_error_output (_cpl_et: CplErrType, _ec: i32, _msg: &str) {}

/// Note that filename extension has to be lower case
pub fn get_driver_name_from_filename (filename: &str) -> Option<&'static str> {
    Path::new(filename).extension()
        .and_then( |ext| ext.to_str())
        .and_then( |ext| get_driver_name_for_extension(ext))
}

/// Note that filename extension has to be lowercase
pub fn get_driver_name_for_extension (ext: &str) -> Option<&'static str> {
    EXT_MAP.get( ext).map(|v| &**v)
}

/// check if the linked GDAL library has a driver registered under the given short name
pub fn is_driver_available (driver_name: &str) -> bool {
    DriverManager::get_driver_by_name(driver_name).is_ok()
}

/// release name of the linked GDAL library (e.g. "3.8.4")
pub fn gdal_release_name () -> String {
    gdal::version::version_info("RELEASE_NAME")
}

pub fn pc_char_to_string (pc_char: *const c_char) -> String {
    let cstr = unsafe { CStr::from_ptr(pc_char) };
    String::from_utf8_lossy(cstr.to_bytes()).to_string()
}

/// open a dataset read-only, with a clear error if the path does not point to a file
pub fn open_dataset<P: AsRef<Path>> (path: P) -> Result<Dataset> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err( OdinGdalError::InvalidFileName(format!("not a file: {path:?}")))
    }
    Ok( Dataset::open(path)? )
}

/* #region raster info *************************************************************************************************/

#[derive(Debug,Clone)]
pub struct RasterInfo {
    pub cols: usize,
    pub rows: usize,
    pub n_bands: usize,
    pub data_type: String,
    pub geo_transform: Option<GeoTransform>,
}

impl RasterInfo {
    /// left,top,right,bottom in SRS units (only if the dataset has a geotransform)
    pub fn bounds (&self) -> Option<(f64,f64,f64,f64)> {
        self.geo_transform.map( |a| {
            let left = a[0];
            let top = a[3];
            let right = left + (a[1] * self.cols as f64);
            let bottom = top + (a[5] * self.rows as f64);
            (left,top,right,bottom)
        })
    }
}

pub fn get_raster_info (ds: &Dataset) -> Result<RasterInfo> {
    let (cols,rows) = ds.raster_size();
    let n_bands = ds.raster_count();
    if n_bands < 1 { return Err( misc_error("dataset has no rasterbands")) }

    let band_type = ds.rasterband(1)?.band_type();
    let data_type = band_type.name(); // GDAL's own name ("Byte", "Float32"..) as reported by gdalinfo
    let geo_transform = ds.geo_transform().ok();

    Ok( RasterInfo { cols, rows, n_bands, data_type, geo_transform } )
}

/// the geotransform that covers the same extent as `gt` on a grid of `tgt_size` instead of `src_size` pixels.
/// This is what GDAL produces when translating to a different output size
pub fn rescale_geotransform (gt: &GeoTransform, src_size: (usize,usize), tgt_size: (usize,usize)) -> GeoTransform {
    let sx = src_size.0 as f64 / tgt_size.0 as f64;
    let sy = src_size.1 as f64 / tgt_size.1 as f64;
    [ gt[0], gt[1] * sx, gt[2] * sy, gt[3], gt[4] * sx, gt[5] * sy ]
}

/// check if two geotransforms are equal within a relative tolerance (based on pixel size for the origin)
pub fn geotransform_matches (a: &GeoTransform, b: &GeoTransform, rel_eps: f64) -> bool {
    let close = |x: f64, y: f64, scale: f64| (x - y).abs() <= rel_eps * scale.abs().max(1e-12);
    let px = a[1].abs().max(a[5].abs());

    close(a[0], b[0], px) && close(a[3], b[3], px) &&
    close(a[1], b[1], a[1]) && close(a[5], b[5], a[5]) &&
    close(a[2], b[2], px) && close(a[4], b[4], px)
}

/* #endregion raster info */
