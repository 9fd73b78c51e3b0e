mod cli;
mod definition;
mod error;
mod init;
mod manifest;
mod progress;
mod render;
mod renderer_binary;
mod report;
mod run;
mod scan;
mod types;

pub use cli::RenderBenchCli;
pub use definition::{default_test_cases, Backend, TestCase};
pub use error::RenderError;
pub use init::init;
pub use manifest::TestManifest;
pub use progress::RenderProgress;
pub use render::{build_command, run_test};
pub use renderer_binary::{renderer_path, resolve_renderer, RENDER_BENCH_BLENDER_PATH_ENV};
pub use report::{CsvReport, ResultRow, RESULT_COLUMNS};
pub use run::{run, run_benchmarks, BenchConfig};
pub use scan::{RenderStats, ScanState, StatusScanner};
pub use types::RenderBenchResult;
