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

use serde::{Deserialize, Serialize};

/// GTiff compression codecs we create web rasters with
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub enum Codec {
    /// lossless, with predictor (2: horizontal differencing, 3: floating point)
    Deflate { predictor: u8, zlevel: u8 },
    /// lossy, only for 8bit imagery
    Jpeg { quality: u8 },
    Lzw { predictor: u8 },
    None,
}

/// BIGTIFF creation option values
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub enum BigTiff {
    Yes,
    No,
    IfNeeded,
    IfSafer,
}

impl BigTiff {
    pub fn gdal_value (&self) -> &'static str {
        match *self {
            BigTiff::Yes => "YES",
            BigTiff::No => "NO",
            BigTiff::IfNeeded => "IF_NEEDED",
            BigTiff::IfSafer => "IF_SAFER",
        }
    }
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct CompressionProfile {
    pub codec: Codec,
    pub tiled: bool,
    pub big_tiff: BigTiff,
}

impl CompressionProfile {
    /// lossless profile for numeric elevation grids
    pub fn elevation () -> Self {
        CompressionProfile {
            codec: Codec::Deflate { predictor: 2, zlevel: 9 },
            tiled: true,
            big_tiff: BigTiff::IfSafer,
        }
    }

    /// lossy, quality bounded profile for RGB(A) imagery
    pub fn imagery () -> Self {
        CompressionProfile {
            codec: Codec::Jpeg { quality: 85 },
            tiled: true,
            big_tiff: BigTiff::IfSafer,
        }
    }

    /// the GTiff creation options ("KEY=VALUE") for this profile
    pub fn creation_options (&self) -> Vec<String> {
        let mut opts: Vec<String> = Vec::new();

        match &self.codec {
            Codec::Deflate { predictor, zlevel } => {
                opts.push("COMPRESS=DEFLATE".into());
                opts.push(format!("PREDICTOR={predictor}"));
                opts.push(format!("ZLEVEL={zlevel}"));
            }
            Codec::Jpeg { quality } => {
                opts.push("COMPRESS=JPEG".into());
                opts.push(format!("JPEG_QUALITY={quality}"));
            }
            Codec::Lzw { predictor } => {
                opts.push("COMPRESS=LZW".into());
                opts.push(format!("PREDICTOR={predictor}"));
            }
            Codec::None => {}
        }

        if self.tiled { opts.push("TILED=YES".into()); }
        opts.push(format!("BIGTIFF={}", self.big_tiff.gdal_value()));

        opts
    }
}
