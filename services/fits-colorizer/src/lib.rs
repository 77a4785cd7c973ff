//! FITS colorizer orchestration.
//!
//! Reads every image plane of a FITS container and renders it once per
//! (stripe count, color mode) combination, one raster file each.

pub mod config;
pub mod error;
pub mod naming;
pub mod pipeline;

pub use config::{ConfigOverrides, RunConfig, WindowConfig};
pub use error::{PipelineError, PipelineResult};
pub use naming::output_file_name;
pub use pipeline::{run, RunSummary};
