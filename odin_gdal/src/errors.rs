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

use thiserror::Error;
use gdal::errors::GdalError;
use crate::pc_char_to_string;

pub type Result<T> = std::result::Result<T, OdinGdalError>;

#[derive(Error,Debug)]
pub enum OdinGdalError {

    // pass through for errors reported by the gdal crate
    #[error("GDAL error: {0}")]
    Error( #[from] GdalError),

    // what GDAL reported through CPLGetLastErrorMsg after a failed raw gdal_sys call
    #[error("last GDAL error ({0}): {1}")]
    LastGdalError(i32, String),

    #[error("invalid GDAL argument: {0}")]
    InvalidArgument(String),

    #[error("invalid file name: {0}")]
    InvalidFileName(String),

    #[error("C string error: {0}")]
    NulError( #[from] std::ffi::NulError),

    // generic self-created error
    #[error("GDAL operation failed: {0}")]
    MiscError(String),
}

pub fn misc_error<S: ToString> (msg: S) -> OdinGdalError {
    OdinGdalError::MiscError(msg.to_string())
}

pub fn invalid_argument<S: ToString> (msg: S) -> OdinGdalError {
    OdinGdalError::InvalidArgument(msg.to_string())
}

/// turn whatever GDAL has recorded as the last error into an OdinGdalError
/// note this has to be called before any other GDAL function that could reset the error state
pub fn last_gdal_error () -> OdinGdalError {
    let (errno,msg) = unsafe {
        let errno = gdal_sys::CPLGetLastErrorNo();
        let msg_ptr = gdal_sys::CPLGetLastErrorMsg();
        let msg = if msg_ptr.is_null() { String::new() } else { pc_char_to_string(msg_ptr) };
        (errno, msg)
    };

    if msg.is_empty() {
        OdinGdalError::LastGdalError(errno, "no error message".to_string())
    } else {
        OdinGdalError::LastGdalError(errno, msg)
    }
}
