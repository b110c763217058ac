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

use std::{cell::{Cell, RefCell}, collections::HashMap, fs, path::{Path, PathBuf}};
use odin_gdal::{GeoTransform, rescale_geotransform};
use odin_webraster::{
    planner::MIB,
    tools::{self, DemOutcome, ScaleArg},
    DemConfig, OrthophotoConfig, OdinWebRasterError, RasterAsset, RasterBackend, Result, TranslateRequest,
    Transcoder, TranscodePlan, OutputSize, CompressionProfile, ResampleAlg,
};

// run with "cargo test --test test_transcoder -- --nocapture"

const GT: GeoTransform = [ 500000.0, 0.05, 0.0, 4200000.0, 0.0, -0.05 ];

#[derive(Debug,Clone,Copy,PartialEq)]
enum FakeMode {
    Normal,
    ReportSuccessWithoutOutput,
    WrongSize,
    LoseGeoTransform,
    Fail,
}

/// honors the RasterBackend contract without GDAL. Rasters are registered with their metadata,
/// output files are real (small) files so that existence checks work
struct FakeBackend {
    mode: FakeMode,
    rasters: RefCell<HashMap<PathBuf,RasterAsset>>,
    requests: RefCell<Vec<TranslateRequest>>,
    n_inspect: Cell<usize>,
}

impl FakeBackend {
    fn new (mode: FakeMode) -> Self {
        FakeBackend { mode, rasters: RefCell::new(HashMap::new()), requests: RefCell::new(Vec::new()), n_inspect: Cell::new(0) }
    }

    fn add_source (&self, path: &Path, width: usize, height: usize, file_size: u64) {
        fs::write( path, b"fake raster").unwrap();
        self.rasters.borrow_mut().insert( path.to_path_buf(), RasterAsset {
            path: path.to_path_buf(), width, height, n_bands: 1, data_type: "Float32".into(), file_size, geo_transform: Some(GT)
        });
    }

    fn n_translate (&self) -> usize { self.requests.borrow().len() }
}

impl RasterBackend for FakeBackend {
    fn name (&self) -> &'static str { "fake" }

    fn inspect (&self, path: &Path) -> Result<RasterAsset> {
        self.n_inspect.set( self.n_inspect.get() + 1);
        self.rasters.borrow().get(path).cloned()
            .ok_or_else( || OdinWebRasterError::UnreadableRaster( format!("{path:?}")))
    }

    fn translate (&self, src: &Path, dst: &Path, request: &TranslateRequest) -> Result<()> {
        self.requests.borrow_mut().push( request.clone());
        let source = self.inspect(src)?;

        if self.mode == FakeMode::Fail {
            fs::write( dst, b"partial").unwrap();
            return Err( OdinWebRasterError::CommandFailed { cmd: "gdal_translate".into(), status: "exit status: 1".into(), stderr: "ERROR 1: disk full".into() })
        }
        if self.mode == FakeMode::ReportSuccessWithoutOutput {
            return Ok(())
        }

        let (width, height) = if self.mode == FakeMode::WrongSize { (request.width + 1, request.height) } else { (request.width, request.height) };
        let geo_transform = if self.mode == FakeMode::LoseGeoTransform {
            None
        } else {
            source.geo_transform.map( |gt| rescale_geotransform( &gt, (source.width, source.height), (width, height)))
        };
        let file_size = source.file_size * (width * height) as u64 / (source.width * source.height) as u64;

        fs::write( dst, b"fake output").unwrap();
        self.rasters.borrow_mut().insert( dst.to_path_buf(), RasterAsset {
            path: dst.to_path_buf(), width, height, n_bands: source.n_bands, data_type: source.data_type.clone(), file_size, geo_transform
        });
        Ok(())
    }
}

fn dem_config (dir: &Path) -> DemConfig {
    DemConfig { input: dir.join("dsm.tif"), output: dir.join("dsm_web.tif"), ..DemConfig::default() }
}

fn ortho_config (dir: &Path) -> OrthophotoConfig {
    OrthophotoConfig { input: dir.join("odm_orthophoto.tif"), output: dir.join("odm_orthophoto_web.tif"), ..OrthophotoConfig::default() }
}

#[test]
fn test_dem_downsized() {
    let dir = tempfile::tempdir().unwrap();
    let config = dem_config( dir.path());
    let backend = FakeBackend::new( FakeMode::Normal);
    backend.add_source( &config.input, 8000, 6000, 40 * MIB);

    let transcoder = Transcoder::new( &backend);
    match tools::downsize_dem( &transcoder, &config).unwrap() {
        DemOutcome::Downsized { scale, report } => {
            println!("{report}");
            assert_eq!( scale, 0.5);
            assert_eq!( (report.output.width, report.output.height), (4000, 3000));
            assert_eq!( report.output.file_size, 10 * MIB);
            assert_eq!( report.compression_ratio(), 4.0);
            assert_eq!( report.reduction_percent(), 75.0);
        }
        other => panic!("unexpected outcome {other:?}")
    }

    let requests = backend.requests.borrow();
    assert_eq!( requests.len(), 1);
    assert_eq!( requests[0].resample, ResampleAlg::Bilinear);
    assert_eq!( requests[0].format, "GTiff");
    assert!( requests[0].creation_options.contains( &"PREDICTOR=2".to_string()));
    assert!( requests[0].creation_options.contains( &"BIGTIFF=IF_SAFER".to_string()));
    assert!( config.output.is_file());
}

#[test]
fn test_dem_within_budget() {
    let dir = tempfile::tempdir().unwrap();
    let config = dem_config( dir.path());
    let backend = FakeBackend::new( FakeMode::Normal);
    backend.add_source( &config.input, 8000, 6000, 10 * MIB);

    let transcoder = Transcoder::new( &backend);
    let outcome = tools::downsize_dem( &transcoder, &config).unwrap();

    assert!( matches!( outcome, DemOutcome::WithinBudget(ref a) if a.width == 8000));
    assert_eq!( backend.n_translate(), 0);
    assert!( !config.output.exists());
}

#[test]
fn test_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let backend = FakeBackend::new( FakeMode::Normal);
    let transcoder = Transcoder::new( &backend);

    let config = dem_config( dir.path());
    assert!( matches!( tools::downsize_dem( &transcoder, &config), Err(OdinWebRasterError::InputMissing(_))));
    assert!( !config.output.exists());

    let config = ortho_config( dir.path());
    assert!( matches!( tools::check_orthophoto_args( &config, None), Err(OdinWebRasterError::InputMissing(_))));
    assert!( matches!( tools::downsize_orthophoto( &transcoder, &config, 0.5), Err(OdinWebRasterError::InputMissing(_))));
    assert!( !config.output.exists());

    assert_eq!( backend.n_inspect.get(), 0);
    assert_eq!( backend.n_translate(), 0);
}

#[test]
fn test_orthophoto_scale_args() {
    let dir = tempfile::tempdir().unwrap();
    let config = ortho_config( dir.path());
    let backend = FakeBackend::new( FakeMode::Normal);
    backend.add_source( &config.input, 4000, 3000, 200 * MIB);

    // unparsable -> default, and the operator gets told about it
    let scale_arg = tools::check_orthophoto_args( &config, Some("abc")).unwrap();
    println!("{:?}", scale_arg.fallback_notice());
    assert_eq!( scale_arg, ScaleArg { scale: 0.5, rejected: Some("abc".into()) });
    let notice = scale_arg.fallback_notice().unwrap();
    assert!( notice.contains("'abc'") && notice.contains("0.5"));

    let scale_arg = tools::check_orthophoto_args( &config, None).unwrap();
    assert_eq!( scale_arg.scale, 0.5);
    assert!( scale_arg.fallback_notice().is_none());

    let scale_arg = tools::check_orthophoto_args( &config, Some("0.25")).unwrap();
    assert_eq!( scale_arg.scale, 0.25);
    assert!( scale_arg.fallback_notice().is_none());

    // parsable but out of range -> error before anything is transcoded
    assert!( matches!( tools::check_orthophoto_args( &config, Some("1.5")), Err(OdinWebRasterError::InvalidScale(_))));
    assert!( matches!( tools::check_orthophoto_args( &config, Some("0")), Err(OdinWebRasterError::InvalidScale(_))));

    let transcoder = Transcoder::new( &backend);
    assert!( matches!( tools::downsize_orthophoto( &transcoder, &config, 1.5), Err(OdinWebRasterError::InvalidScale(_))));
    assert_eq!( backend.n_translate(), 0);
    assert!( !config.output.exists());
}

#[test]
fn test_orthophoto_downsized() {
    let dir = tempfile::tempdir().unwrap();
    let config = ortho_config( dir.path());
    let backend = FakeBackend::new( FakeMode::Normal);
    backend.add_source( &config.input, 4000, 3000, 200 * MIB);

    let transcoder = Transcoder::new( &backend);
    let report = tools::downsize_orthophoto( &transcoder, &config, 0.5).unwrap();
    println!("{report}");

    assert_eq!( (report.output.width, report.output.height), (2000, 1500));
    let requests = backend.requests.borrow();
    assert_eq!( requests[0].creation_options, vec!["COMPRESS=JPEG", "JPEG_QUALITY=85", "TILED=YES", "BIGTIFF=IF_SAFER"]);
    assert_eq!( requests[0].resample, ResampleAlg::Average);
}

#[test]
fn test_missing_output_is_failure() {
    let dir = tempfile::tempdir().unwrap();
    let config = ortho_config( dir.path());
    let backend = FakeBackend::new( FakeMode::ReportSuccessWithoutOutput);
    backend.add_source( &config.input, 4000, 3000, 200 * MIB);

    let transcoder = Transcoder::new( &backend);
    let res = tools::downsize_orthophoto( &transcoder, &config, 0.5);
    assert!( matches!( res, Err(OdinWebRasterError::VerificationFailed(_))));
}

#[test]
fn test_backend_failure_keeps_diagnostics() {
    let dir = tempfile::tempdir().unwrap();
    let config = ortho_config( dir.path());
    let backend = FakeBackend::new( FakeMode::Fail);
    backend.add_source( &config.input, 4000, 3000, 200 * MIB);

    let transcoder = Transcoder::new( &backend);
    let err = tools::downsize_orthophoto( &transcoder, &config, 0.5).unwrap_err();
    println!("{err}");

    assert!( err.to_string().contains("disk full"));
    assert!( !config.output.exists(), "partial output not removed");
    assert!( config.input.is_file(), "input must never be removed");
}

#[test]
fn test_invalid_output_is_removed() {
    for mode in [FakeMode::WrongSize, FakeMode::LoseGeoTransform] {
        let dir = tempfile::tempdir().unwrap();
        let config = dem_config( dir.path());
        let backend = FakeBackend::new( mode);
        backend.add_source( &config.input, 8000, 6000, 40 * MIB);

        let transcoder = Transcoder::new( &backend);
        let res = tools::downsize_dem( &transcoder, &config);
        assert!( matches!( res, Err(OdinWebRasterError::VerificationFailed(_))), "{mode:?} not detected");
        assert!( !config.output.exists());
    }
}

#[test]
fn test_no_in_place_transcode() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("dsm.tif");
    let backend = FakeBackend::new( FakeMode::Normal);
    backend.add_source( &src, 100, 100, MIB);

    let transcoder = Transcoder::new( &backend);
    let plan = TranscodePlan::new( OutputSize::Scale(0.5), ResampleAlg::Bilinear, CompressionProfile::elevation());
    assert!( matches!( transcoder.transcode( &src, &src, &plan), Err(OdinWebRasterError::InvalidPlan(_))));
    assert_eq!( backend.n_translate(), 0);
    assert!( src.is_file());
}

#[test]
fn test_no_in_place_transcode_through_aliased_path() {
    let dir = tempfile::tempdir().unwrap();
    let dem_dir = dir.path().join("odm_dem");
    fs::create_dir( &dem_dir).unwrap();
    let src = dem_dir.join("dsm.tif");
    let backend = FakeBackend::new( FakeMode::Fail);
    backend.add_source( &src, 100, 100, MIB);

    let transcoder = Transcoder::new( &backend);
    let plan = TranscodePlan::new( OutputSize::Scale(0.5), ResampleAlg::Bilinear, CompressionProfile::elevation());

    for dst in [ dem_dir.join("..").join("odm_dem").join("dsm.tif"), dir.path().join("./odm_dem/./dsm.tif") ] {
        assert!( matches!( transcoder.transcode( &src, &dst, &plan), Err(OdinWebRasterError::InvalidPlan(_))), "{dst:?} not detected");
    }
    assert_eq!( backend.n_translate(), 0);
    assert!( src.is_file(), "input must never be removed");
    assert_eq!( fs::read( &src).unwrap(), b"fake raster");
}

#[test]
fn test_previous_output_kept_if_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let config = dem_config( dir.path());
    fs::write( &config.output, b"previous web dem").unwrap();

    // source passes our own checks but the backend cannot read it, so nothing gets written
    fs::write( &config.input, b"not a raster").unwrap();
    let source = RasterAsset {
        path: config.input.clone(), width: 8000, height: 6000, n_bands: 1, data_type: "Float32".into(), file_size: 40 * MIB, geo_transform: Some(GT)
    };
    let backend = FakeBackend::new( FakeMode::Normal);
    let transcoder = Transcoder::new( &backend);
    let plan = TranscodePlan::new( OutputSize::Scale(0.5), ResampleAlg::Bilinear, CompressionProfile::elevation());

    let res = transcoder.transcode_asset( &source, &config.output, &plan);
    assert!( matches!( res, Err(OdinWebRasterError::UnreadableRaster(_))));
    assert_eq!( fs::read( &config.output).unwrap(), b"previous web dem");

    // but output written by a failed run is removed even if there was a previous one
    let backend = FakeBackend::new( FakeMode::Fail);
    backend.add_source( &config.input, 8000, 6000, 40 * MIB);
    let transcoder = Transcoder::new( &backend);
    assert!( tools::downsize_dem( &transcoder, &config).is_err());
    assert!( !config.output.exists());
}
