//! Plane-by-plane rendering of a source into a sink.
//!
//! Each plane's view window is computed once and shared by every
//! (stripe, mode) task. Tasks run on the rayon pool; each owns its pixel
//! buffer and output file, and only reads the plane's samples.

use std::time::Instant;

use colorizer::{
    colorize_with_window, compute_window, ColorizeMode, ImagePlane, ImageSink, ImageSource,
    PackedPixel, ViewWindow,
};
use colorizer::window::sample_range;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::RunConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::naming::output_file_name;

/// Totals for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Planes rendered.
    pub planes: usize,
    /// Planes with no samples, or no finite ones.
    pub skipped: usize,
    pub files: usize,
}

/// Render every plane of `source` for every (stripe, mode) pair in `config`.
///
/// The sink batch is opened once before the first plane and closed once at
/// the end, including when rendering fails. A rendering error takes
/// precedence over an error closing the batch.
pub fn run<S, K>(
    source: &mut S,
    sink: &K,
    config: &RunConfig,
    input_name: &str,
) -> PipelineResult<RunSummary>
where
    S: ImageSource,
    K: ImageSink,
{
    config.validate()?;

    sink.begin_batch().map_err(PipelineError::from_sink)?;
    let rendered = render_planes(source, sink, config, input_name);
    let closed = sink.end_batch().map_err(PipelineError::from_sink);

    let summary = rendered?;
    closed?;
    Ok(summary)
}

fn render_planes<S, K>(
    source: &mut S,
    sink: &K,
    config: &RunConfig,
    input_name: &str,
) -> PipelineResult<RunSummary>
where
    S: ImageSource,
    K: ImageSink,
{
    let tasks = task_matrix(config);
    let mut summary = RunSummary::default();

    while let Some(plane) = source.next_plane().map_err(PipelineError::from_source)? {
        if plane.is_empty() {
            warn!(index = plane.index, "Skipping plane with no samples");
            summary.skipped += 1;
            continue;
        }
        if sample_range(&plane.samples).is_none() {
            warn!(index = plane.index, "Skipping plane with no finite samples");
            summary.skipped += 1;
            continue;
        }

        let start = Instant::now();
        let window = compute_window(&plane.samples, config.window.start, config.window.end)?;

        info!(
            index = plane.index,
            width = plane.width,
            height = plane.height,
            view_min = window.view_min,
            view_max = window.view_max,
            renders = tasks.len(),
            "Rendering plane"
        );

        tasks
            .par_iter()
            .map(|&(stripe_num, mode)| {
                render_one(&plane, &window, sink, config, input_name, stripe_num, mode)
            })
            .collect::<PipelineResult<Vec<()>>>()?;

        summary.planes += 1;
        summary.files += tasks.len();
        debug!(
            index = plane.index,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Plane finished"
        );
    }

    info!(
        planes = summary.planes,
        skipped = summary.skipped,
        files = summary.files,
        "Run finished"
    );
    Ok(summary)
}

/// Every distinct (stripe, mode) pair, stripe-major in first-seen order.
///
/// Repeated pairs would render to the same file name, so each is kept once.
fn task_matrix(config: &RunConfig) -> Vec<(f64, ColorizeMode)> {
    let mut tasks: Vec<(f64, ColorizeMode)> = Vec::new();
    for &stripe_num in &config.stripes {
        for &mode in &config.modes {
            if tasks.contains(&(stripe_num, mode)) {
                debug!(stripe_num, mode = mode.name(), "Dropping repeated render");
                continue;
            }
            tasks.push((stripe_num, mode));
        }
    }
    tasks
}

fn render_one<K: ImageSink>(
    plane: &ImagePlane,
    window: &ViewWindow,
    sink: &K,
    config: &RunConfig,
    input_name: &str,
    stripe_num: f64,
    mode: ColorizeMode,
) -> PipelineResult<()> {
    let mut pixels = vec![PackedPixel::default(); plane.samples.len()];
    colorize_with_window(&plane.samples, &mut pixels, window, mode, stripe_num)?;

    let path = config.output_dir.join(output_file_name(
        input_name,
        plane.index,
        mode,
        stripe_num,
        config.format,
    ));

    sink.write(&pixels, plane.width, plane.height, plane.pitch(), &path)
        .map_err(PipelineError::from_sink)?;

    debug!(path = %path.display(), "Wrote render");
    Ok(())
}
