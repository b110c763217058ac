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

use std::path::Path;
use tracing::debug;
use odin_gdal::{open_dataset, get_raster_info, is_driver_available, gdal_release_name, translate::SimpleTranslateBuilder};

use crate::file_length;
use crate::backend::{RasterBackend, RasterAsset, TranslateRequest};
use crate::errors::{Result, OdinWebRasterError, transform_failed};

/// backend that uses the GDAL library we are linked against
#[derive(Debug,Clone,Copy)]
pub struct GdalLibBackend;

impl GdalLibBackend {
    /// we need at least the GTiff driver
    pub fn probe () -> Option<GdalLibBackend> {
        if is_driver_available("GTiff") {
            debug!("GDAL library {} available", gdal_release_name());
            Some(GdalLibBackend)
        } else {
            None
        }
    }
}

impl RasterBackend for GdalLibBackend {
    fn name (&self) -> &'static str { "gdal-library" }

    fn inspect (&self, path: &Path) -> Result<RasterAsset> {
        let ds = open_dataset(path).map_err( |e| OdinWebRasterError::UnreadableRaster( format!("{path:?}: {e}")))?;
        let info = get_raster_info(&ds).map_err( |e| OdinWebRasterError::UnreadableRaster( format!("{path:?}: {e}")))?;

        Ok( RasterAsset {
            path: path.to_path_buf(),
            width: info.cols,
            height: info.rows,
            n_bands: info.n_bands,
            data_type: info.data_type,
            file_size: file_length(path)?,
            geo_transform: info.geo_transform,
        })
    }

    fn translate (&self, src: &Path, dst: &Path, request: &TranslateRequest) -> Result<()> {
        let src_ds = open_dataset(src).map_err( |e| OdinWebRasterError::UnreadableRaster( format!("{src:?}: {e}")))?;

        let mut translate = SimpleTranslateBuilder::new( &src_ds, dst)?;
        translate.set_tgt_format( &request.format)?;
        translate.set_tgt_size( request.width, request.height);
        translate.set_resample_alg( request.resample);
        translate.set_create_options( &request.creation_options);

        let tgt_ds = translate.exec().map_err( |e| transform_failed( format!("{src:?} -> {dst:?}: {e}")))?;
        drop(tgt_ds); // flush and close before anybody looks at the file

        Ok(())
    }
}
