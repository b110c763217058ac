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
use thiserror::Error;
use odin_gdal::errors::OdinGdalError;

#[derive(Error,Debug)]
pub enum OdinWebRasterError {

    #[error("input raster not found: {0}")]
    InputMissing(String),

    #[error("raster library/tool not available: {0}")]
    CollaboratorUnavailable(String),

    #[error("invalid scale {0} (must be within (0,1])")]
    InvalidScale(f64),

    #[error("invalid transcode plan: {0}")]
    InvalidPlan(String),

    #[error("cannot read raster {0}")]
    UnreadableRaster(String),

    #[error("transform failed: {0}")]
    TransformFailed(String),

    // non-zero exit of an external GDAL tool, with its captured stderr
    #[error("{cmd} failed ({status}): {stderr}")]
    CommandFailed { cmd: String, status: String, stderr: String },

    #[error("output verification failed: {0}")]
    VerificationFailed(String),

    #[error("invalid config: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IOError( #[from] std::io::Error),

    #[error("ODIN gdal error: {0}")]
    OdinGdalError( #[from] OdinGdalError),

    #[error("JSON error: {0}")]
    JsonError( #[from] serde_json::Error),

    #[error("RON error: {0}")]
    RonError( #[from] ron::error::SpannedError),
}

pub type Result<T> = std::result::Result<T, OdinWebRasterError>;

pub fn input_missing<S: ToString> (path: S) -> OdinWebRasterError {
    OdinWebRasterError::InputMissing(path.to_string())
}

pub fn invalid_plan<S: ToString> (msg: S) -> OdinWebRasterError {
    OdinWebRasterError::InvalidPlan(msg.to_string())
}

pub fn transform_failed<S: ToString> (msg: S) -> OdinWebRasterError {
    OdinWebRasterError::TransformFailed(msg.to_string())
}

pub fn verification_failed<S: ToString> (msg: S) -> OdinWebRasterError {
    OdinWebRasterError::VerificationFailed(msg.to_string())
}

pub fn config_error<S: ToString> (msg: S) -> OdinWebRasterError {
    OdinWebRasterError::ConfigError(msg.to_string())
}
