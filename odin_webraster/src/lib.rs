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

//! odin_webraster - create smaller versions of ODM (drone mapping) DEM and orthophoto rasters that can be
//! efficiently served to web viewers. All pixel and format work is done by GDAL, either through the linked
//! library or through the GDAL command line tools (see [`backend`])

use std::{env, fs, path::{Component, Path, PathBuf}};
use tracing_subscriber::EnvFilter;

pub mod errors;
pub mod planner;
pub mod profile;
pub mod config;
pub mod backend;
pub mod transcoder;
pub mod tools;

pub use errors::{OdinWebRasterError, Result};
pub use config::{WebRasterConfig, DemConfig, OrthophotoConfig, GdalCommands};
pub use backend::{RasterBackend, RasterAsset, TranslateRequest, BackendChoice, select_backend};
pub use planner::{SizePlan, OutputSize, TranscodePlan, plan_size, scaled_dimensions};
pub use profile::{CompressionProfile, Codec, BigTiff};
pub use transcoder::{Transcoder, TranscodeReport};
pub use odin_gdal::translate::ResampleAlg;

/// deserialize a RON config file
pub fn load_config_path<C,P> (path: P) -> Result<C> where C: for <'a> serde::Deserialize<'a>, P: AsRef<Path> {
    let data = fs::read_to_string( path.as_ref())?;
    Ok( ron::de::from_str( data.as_str())? )
}

pub fn file_length<P: AsRef<Path>> (path: P) -> Result<u64> {
    Ok( fs::metadata(path)?.len() )
}

/// do `a` and `b` name the same file, regardless of how they are spelled ("./x", "d/../x", symlinks)
pub fn same_path<P: AsRef<Path>, Q: AsRef<Path>> (a: P, b: Q) -> bool {
    normalized_path( a.as_ref()) == normalized_path( b.as_ref())
}

/// canonical form of `path`. Files that do not exist yet are resolved through their (canonical) parent
/// dir, and if that does not exist either we fall back to a lexical normalization of the absolute path
pub fn normalized_path (path: &Path) -> PathBuf {
    if let Ok(p) = fs::canonicalize(path) {
        return p
    }

    if let (Some(parent), Some(name)) = (path.parent(), path.file_name()) {
        let parent = if parent.as_os_str().is_empty() { Path::new(".") } else { parent };
        if let Ok(p) = fs::canonicalize(parent) {
            return p.join(name)
        }
    }

    let abs = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir().map( |d| d.join(path)).unwrap_or_else( |_| path.to_path_buf())
    };

    let mut normalized = PathBuf::new();
    for c in abs.components() {
        match c {
            Component::CurDir => {}
            Component::ParentDir => { normalized.pop(); }
            c => normalized.push(c)
        }
    }
    normalized
}

/// log to stderr, use RUST_LOG to set the max level (warnings are shown if it is not set).
/// Note this only succeeds if there is no global subscriber set yet
pub fn init_tracing () {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else( |_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter( filter)
        .with_writer( std::io::stderr)
        .try_init();
}
