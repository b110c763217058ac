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

use std::{ffi::OsString, path::Path, process::{Command, Output}};
use serde::Deserialize;
use tracing::debug;
use odin_gdal::GeoTransform;

use crate::file_length;
use crate::config::GdalCommands;
use crate::backend::{RasterBackend, RasterAsset, TranslateRequest};
use crate::errors::{Result, OdinWebRasterError};

/// backend that runs `gdalinfo` and `gdal_translate` as child processes
#[derive(Debug,Clone)]
pub struct GdalCmdBackend {
    translate_cmd: String,
    info_cmd: String,
}

impl GdalCmdBackend {
    pub fn new (commands: &GdalCommands) -> Self {
        GdalCmdBackend { translate_cmd: commands.gdal_translate.clone(), info_cmd: commands.gdalinfo.clone() }
    }

    /// check if the configured gdal_translate can be executed
    pub fn probe (commands: &GdalCommands) -> Option<GdalCmdBackend> {
        match Command::new( &commands.gdal_translate).arg("--version").output() {
            Ok(output) if output.status.success() => {
                debug!("found {}", String::from_utf8_lossy(&output.stdout).trim());
                Some( GdalCmdBackend::new(commands))
            }
            _ => None
        }
    }

    /// gdal_translate arguments for the given request
    pub fn translate_args (src: &Path, dst: &Path, request: &TranslateRequest) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();

        args.push("-of".into());
        args.push( request.format.as_str().into());
        args.push("-outsize".into());
        args.push( request.width.to_string().into());
        args.push( request.height.to_string().into());
        args.push("-r".into());
        args.push( request.resample.gdal_name().into());
        for co in &request.creation_options {
            args.push("-co".into());
            args.push( co.as_str().into());
        }
        args.push( src.as_os_str().to_os_string());
        args.push( dst.as_os_str().to_os_string());

        args
    }
}

impl RasterBackend for GdalCmdBackend {
    fn name (&self) -> &'static str { "gdal-command" }

    fn inspect (&self, path: &Path) -> Result<RasterAsset> {
        let mut cmd = Command::new( &self.info_cmd);
        cmd.arg("-json").arg( path.as_os_str());

        let output = execute_cmd( &mut cmd).map_err( |e| OdinWebRasterError::UnreadableRaster( format!("{path:?}: {e}")))?;
        let info = parse_gdalinfo_json( &String::from_utf8_lossy( &output.stdout))?;
        let band = info.bands.first().ok_or_else( || OdinWebRasterError::UnreadableRaster( format!("{path:?} has no rasterbands")))?;

        Ok( RasterAsset {
            path: path.to_path_buf(),
            width: info.size[0],
            height: info.size[1],
            n_bands: info.bands.len(),
            data_type: band.data_type.clone(),
            file_size: file_length(path)?,
            geo_transform: info.geo_transform,
        })
    }

    fn translate (&self, src: &Path, dst: &Path, request: &TranslateRequest) -> Result<()> {
        let mut cmd = Command::new( &self.translate_cmd);
        cmd.args( Self::translate_args( src, dst, request));

        execute_cmd( &mut cmd)?;
        Ok(())
    }
}

/// run to completion, capturing stdout/stderr. Non-zero exit status is an error that includes stderr
fn execute_cmd (cmd: &mut Command) -> Result<Output> {
    debug!("executing {cmd:?}");
    let program = cmd.get_program().to_string_lossy().to_string();

    let output = cmd.output().map_err( |e| OdinWebRasterError::CollaboratorUnavailable( format!("cannot execute {program}: {e}")))?;
    if output.status.success() {
        Ok(output)
    } else {
        Err( OdinWebRasterError::CommandFailed {
            cmd: program,
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy( &output.stderr).trim().to_string()
        })
    }
}

/// the parts of `gdalinfo -json` output we use
#[derive(Debug,Deserialize)]
pub struct GdalInfo {
    /// [width, height]
    pub size: [usize;2],

    #[serde(rename = "geoTransform")]
    pub geo_transform: Option<GeoTransform>,

    #[serde(default)]
    pub bands: Vec<GdalInfoBand>,
}

#[derive(Debug,Deserialize)]
pub struct GdalInfoBand {
    #[serde(rename = "type")]
    pub data_type: String,
}

pub fn parse_gdalinfo_json (json: &str) -> Result<GdalInfo> {
    Ok( serde_json::from_str(json)? )
}
