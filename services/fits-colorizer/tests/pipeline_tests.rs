//! Tests for running sources through the render matrix into sinks.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use colorizer::{ColorizeMode, ImagePlane, ImageSink, ImageSource, PackedPixel};
use fits_colorizer::{run, PipelineError, RunConfig, RunSummary, WindowConfig};
use fits_parser::FitsReader;
use renderer::{RasterFormat, RasterSink};
use test_utils::{linear_ramp, star_field, temp_test_dir, FitsBuilder};

// ============================================================================
// Test collaborators
// ============================================================================

/// Planes from memory, optionally failing after they run out.
struct MemorySource {
    planes: VecDeque<ImagePlane>,
    fail_at_end: bool,
}

impl MemorySource {
    fn new(planes: Vec<ImagePlane>) -> Self {
        Self {
            planes: planes.into(),
            fail_at_end: false,
        }
    }
}

impl ImageSource for MemorySource {
    type Error = std::io::Error;

    fn next_plane(&mut self) -> Result<Option<ImagePlane>, Self::Error> {
        match self.planes.pop_front() {
            Some(plane) => Ok(Some(plane)),
            None if self.fail_at_end => Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "container cut short",
            )),
            None => Ok(None),
        }
    }
}

#[derive(Debug)]
struct Written {
    path: PathBuf,
    width: usize,
    height: usize,
    pitch: usize,
    pixels: Vec<PackedPixel>,
}

/// Records writes and batch calls; can be told to reject one file name.
#[derive(Default)]
struct RecordingSink {
    begins: AtomicUsize,
    ends: AtomicUsize,
    writes: Mutex<Vec<Written>>,
    reject: Option<String>,
}

impl RecordingSink {
    fn rejecting(name: &str) -> Self {
        Self {
            reject: Some(name.to_string()),
            ..Default::default()
        }
    }

    fn written(&self) -> Vec<Written> {
        std::mem::take(&mut *self.writes.lock().unwrap())
    }
}

impl ImageSink for RecordingSink {
    type Error = std::io::Error;

    fn begin_batch(&self) -> Result<(), Self::Error> {
        self.begins.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn write(
        &self,
        pixels: &[PackedPixel],
        width: usize,
        height: usize,
        pitch: usize,
        path: &Path,
    ) -> Result<(), Self::Error> {
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        if self.reject.as_deref() == Some(name.as_str()) {
            return Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, name));
        }
        self.writes.lock().unwrap().push(Written {
            path: path.to_path_buf(),
            width,
            height,
            pitch,
            pixels: pixels.to_vec(),
        });
        Ok(())
    }

    fn end_batch(&self) -> Result<(), Self::Error> {
        self.ends.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn small_config() -> RunConfig {
    RunConfig {
        stripes: vec![1.0, 4.0],
        modes: vec![ColorizeMode::Greyscale, ColorizeMode::Binary],
        output_dir: PathBuf::from("out"),
        ..Default::default()
    }
}

// ============================================================================
// Render matrix
// ============================================================================

#[test]
fn test_every_combination_is_written() {
    let mut source = MemorySource::new(vec![ImagePlane::new(0, 4, 2, linear_ramp(4, 2, 0.0, 7.0))]);
    let sink = RecordingSink::default();

    let summary = run(&mut source, &sink, &small_config(), "m31.fits").unwrap();
    assert_eq!(
        summary,
        RunSummary {
            planes: 1,
            skipped: 0,
            files: 4
        }
    );

    let mut names: Vec<String> = sink
        .written()
        .iter()
        .map(|w| w.path.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "m31.fits_0_binary_1.bmp",
            "m31.fits_0_binary_4.bmp",
            "m31.fits_0_greyscale_1.bmp",
            "m31.fits_0_greyscale_4.bmp",
        ]
    );
}

#[test]
fn test_writes_carry_plane_geometry() {
    let mut source = MemorySource::new(vec![ImagePlane::new(2, 3, 5, star_field(3, 5))]);
    let sink = RecordingSink::default();

    run(&mut source, &sink, &small_config(), "x.fits").unwrap();

    for w in sink.written() {
        assert_eq!((w.width, w.height, w.pitch), (3, 5, 12));
        assert_eq!(w.pixels.len(), 15);
        assert!(w.pixels.iter().all(|p| p.a() == 255));
        assert!(w.path.starts_with("out"));
    }
}

#[test]
fn test_pixels_match_direct_colorize() {
    let samples = vec![0.0, 0.25, 0.5, 0.75, 1.0];
    let mut source = MemorySource::new(vec![ImagePlane::new(0, 5, 1, samples)]);
    let sink = RecordingSink::default();
    let config = RunConfig {
        stripes: vec![1.0],
        modes: vec![ColorizeMode::Greyscale],
        ..Default::default()
    };

    run(&mut source, &sink, &config, "ramp.fits").unwrap();

    let written = sink.written();
    assert_eq!(written.len(), 1);
    let grays: Vec<u8> = written[0].pixels.iter().map(|p| p.r()).collect();
    assert_eq!(grays, vec![0, 63, 127, 191, 255]);
}

#[test]
fn test_window_from_config() {
    let mut source = MemorySource::new(vec![ImagePlane::new(0, 11, 1, linear_ramp(11, 1, 0.0, 10.0))]);
    let sink = RecordingSink::default();
    let config = RunConfig {
        stripes: vec![1.0],
        modes: vec![ColorizeMode::Binary],
        window: WindowConfig { start: 0.0, end: 0.2 },
        ..Default::default()
    };

    run(&mut source, &sink, &config, "w.fits").unwrap();

    let pixels = &sink.written()[0].pixels;
    // Everything from 2.0 up is at or above the window top
    assert!(pixels[2..].iter().all(|p| p.r() == 255));
    assert_eq!(pixels[0].r(), 0);
}

// ============================================================================
// Planes
// ============================================================================

#[test]
fn test_empty_planes_skipped() {
    let mut source = MemorySource::new(vec![
        ImagePlane::new(0, 0, 0, Vec::new()),
        ImagePlane::new(1, 2, 2, vec![1.0, 2.0, 3.0, 4.0]),
        ImagePlane::new(2, 0, 7, Vec::new()),
    ]);
    let sink = RecordingSink::default();

    let summary = run(&mut source, &sink, &small_config(), "mef.fits").unwrap();
    assert_eq!(summary.planes, 1);
    assert_eq!(summary.skipped, 2);
    assert_eq!(summary.files, 4);
    assert!(sink
        .written()
        .iter()
        .all(|w| w.path.to_string_lossy().contains("mef.fits_1_")));
}

#[test]
fn test_plane_without_finite_samples_skipped() {
    let mut source = MemorySource::new(vec![
        ImagePlane::new(0, 2, 1, vec![0.0, 1.0]),
        ImagePlane::new(1, 2, 1, vec![f32::NAN, f32::INFINITY]),
        ImagePlane::new(2, 2, 1, vec![1.0, 0.0]),
    ]);
    let sink = RecordingSink::default();

    let summary = run(&mut source, &sink, &small_config(), "gap.fits").unwrap();
    assert_eq!(
        summary,
        RunSummary {
            planes: 2,
            skipped: 1,
            files: 8,
        }
    );
    assert!(!sink
        .written()
        .iter()
        .any(|w| w.path.to_string_lossy().contains("gap.fits_1_")));
    assert_eq!(sink.ends.load(Ordering::SeqCst), 1);
}

#[test]
fn test_repeated_stripes_and_modes_render_once() {
    let mut source = MemorySource::new(vec![ImagePlane::new(0, 2, 1, vec![0.0, 1.0])]);
    let sink = RecordingSink::default();
    let config = RunConfig {
        stripes: vec![1.0, 1.0],
        modes: vec![ColorizeMode::Binary, ColorizeMode::Binary],
        ..small_config()
    };

    let summary = run(&mut source, &sink, &config, "dup.fits").unwrap();
    assert_eq!(summary.files, 1);
    let written = sink.written();
    assert_eq!(written.len(), 1);
    assert_eq!(written[0].path, Path::new("out").join("dup.fits_0_binary_1.bmp"));
}

#[test]
fn test_batch_bracketed_once_per_run() {
    let planes = (0..3)
        .map(|i| ImagePlane::new(i, 2, 2, vec![0.0, 1.0, 2.0, i as f32]))
        .collect();
    let mut source = MemorySource::new(planes);
    let sink = RecordingSink::default();

    let summary = run(&mut source, &sink, &small_config(), "cube.fits").unwrap();
    assert_eq!(summary.files, 12);
    assert_eq!(sink.begins.load(Ordering::SeqCst), 1);
    assert_eq!(sink.ends.load(Ordering::SeqCst), 1);
}

#[test]
fn test_source_with_no_planes() {
    let mut source = MemorySource::new(Vec::new());
    let sink = RecordingSink::default();

    let summary = run(&mut source, &sink, &small_config(), "empty.fits").unwrap();
    assert_eq!(summary, RunSummary::default());
    assert_eq!(sink.ends.load(Ordering::SeqCst), 1);
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_source_error_propagates_and_closes_batch() {
    let mut source = MemorySource::new(vec![ImagePlane::new(0, 1, 2, vec![1.0, 2.0])]);
    source.fail_at_end = true;
    let sink = RecordingSink::default();

    let err = run(&mut source, &sink, &small_config(), "bad.fits").unwrap_err();
    match err {
        PipelineError::Source(inner) => {
            let io = inner.downcast_ref::<std::io::Error>().unwrap();
            assert_eq!(io.kind(), std::io::ErrorKind::UnexpectedEof);
        }
        other => panic!("expected source error, got {:?}", other),
    }
    assert_eq!(sink.ends.load(Ordering::SeqCst), 1);
}

#[test]
fn test_sink_error_propagates_and_closes_batch() {
    let mut source = MemorySource::new(vec![ImagePlane::new(0, 2, 1, vec![1.0, 2.0])]);
    let sink = RecordingSink::rejecting("t.fits_0_binary_4.bmp");

    let err = run(&mut source, &sink, &small_config(), "t.fits").unwrap_err();
    assert!(matches!(err, PipelineError::Sink(_)));
    assert_eq!(sink.begins.load(Ordering::SeqCst), 1);
    assert_eq!(sink.ends.load(Ordering::SeqCst), 1);
}

#[test]
fn test_invalid_config_touches_nothing() {
    let mut source = MemorySource::new(vec![ImagePlane::new(0, 1, 1, vec![1.0])]);
    let sink = RecordingSink::default();
    let config = RunConfig {
        stripes: vec![0.0],
        ..Default::default()
    };

    let err = run(&mut source, &sink, &config, "a.fits").unwrap_err();
    assert!(matches!(err, PipelineError::InvalidConfig(_)));
    assert_eq!(sink.begins.load(Ordering::SeqCst), 0);
    assert_eq!(source.planes.len(), 1);
}

// ============================================================================
// FITS to files
// ============================================================================

#[test]
fn test_fits_file_to_bmp_files() {
    let dir = temp_test_dir();
    let input = dir.path().join("field.fits");
    std::fs::write(
        &input,
        FitsBuilder::new()
            .empty_primary()
            .image_f32(16, 12, &star_field(16, 12))
            .image_i16(4, 4, &[0; 16], 1.0, 0.0)
            .build(),
    )
    .unwrap();

    let out = dir.path().join("renders");
    std::fs::create_dir_all(&out).unwrap();
    let config = RunConfig {
        output_dir: out.clone(),
        ..Default::default()
    };

    let mut reader = FitsReader::open(&input).unwrap();
    let sink = RasterSink::new(RasterFormat::Bmp);
    let summary = run(&mut reader, &sink, &config, input.to_str().unwrap()).unwrap();

    assert_eq!(summary.planes, 2);
    assert_eq!(summary.files, 60);
    assert_eq!(std::fs::read_dir(&out).unwrap().count(), 60);
    assert_eq!(sink.files_written(), 60);

    let bmp = std::fs::read(out.join("field.fits_1_roygbiv_10.bmp")).unwrap();
    assert_eq!(&bmp[..2], b"BM");
    assert_eq!(bmp.len(), 54 + 16 * 12 * 4);

    // The flat plane renders every pixel at the ramp floor
    let flat = std::fs::read(out.join("field.fits_2_roygbiv_1.bmp")).unwrap();
    assert!(flat[54..].chunks_exact(4).all(|px| px == [255, 0, 255, 255]));
}

#[test]
fn test_fits_file_to_png_files() {
    let dir = temp_test_dir();
    let input = dir.path().join("ramp.fits");
    std::fs::write(
        &input,
        FitsBuilder::new()
            .image_f32(8, 8, &linear_ramp(8, 8, -1.0, 1.0))
            .build(),
    )
    .unwrap();

    let config = RunConfig {
        stripes: vec![2.0],
        modes: vec![ColorizeMode::Greyscale],
        format: RasterFormat::Png,
        output_dir: dir.path().to_path_buf(),
        ..Default::default()
    };

    let mut reader = FitsReader::open(&input).unwrap();
    let sink = RasterSink::new(config.format);
    let summary = run(&mut reader, &sink, &config, "ramp.fits").unwrap();
    assert_eq!(summary.files, 1);

    let png = std::fs::read(dir.path().join("ramp.fits_0_greyscale_2.png")).unwrap();
    assert_eq!(&png[1..4], b"PNG");
}

#[test]
fn test_repeated_stripes_count_files_on_disk() {
    let dir = temp_test_dir();
    let config = RunConfig {
        stripes: vec![1.0, 1.0],
        modes: vec![ColorizeMode::Roygbiv],
        output_dir: dir.path().to_path_buf(),
        ..Default::default()
    };

    let mut source = MemorySource::new(vec![ImagePlane::new(0, 4, 4, linear_ramp(4, 4, 0.0, 1.0))]);
    let sink = RasterSink::new(RasterFormat::Bmp);
    let summary = run(&mut source, &sink, &config, "dup.fits").unwrap();

    assert_eq!(summary.files, 1);
    assert_eq!(sink.files_written(), 1);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}
