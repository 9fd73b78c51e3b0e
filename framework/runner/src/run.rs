use std::path::PathBuf;

use anyhow::Context;
use scene_fetcher::{Downloader, SceneFetcher};

use crate::cli::RenderBenchCli;
use crate::definition::{default_test_cases, Backend, TestCase};
use crate::manifest::TestManifest;
use crate::progress::RenderProgress;
use crate::render::run_test;
use crate::renderer_binary::renderer_path;
use crate::report::CsvReport;
use crate::types::RenderBenchResult;

/// Everything a benchmark run needs apart from the tests and the fetcher.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Resolved renderer executable
    pub executable: PathBuf,
    pub backend: Backend,
    /// Device list as given on the command line, not interpreted
    pub devices: String,
    pub output: PathBuf,
    pub show_progress: bool,
}

impl BenchConfig {
    pub fn from_cli(cli: &RenderBenchCli) -> RenderBenchResult<Self> {
        Ok(Self {
            executable: renderer_path(&cli.blender_exe)?,
            backend: cli.backend,
            devices: cli.gpu_devices.clone(),
            output: cli.output.clone(),
            show_progress: !cli.no_progress,
        })
    }
}

/// Run the benchmarks selected on the command line.
pub fn run(cli: RenderBenchCli) -> RenderBenchResult<()> {
    let config = BenchConfig::from_cli(&cli)?;

    let tests = match &cli.tests {
        Some(path) => TestManifest::load(path)?.tests(),
        None => default_test_cases(),
    };

    let fetcher = SceneFetcher::new(&cli.scenes_root);
    let written = run_benchmarks(&config, &tests, &fetcher)?;

    log::info!("Wrote {written} result(s) to {}", config.output.display());

    Ok(())
}

/// Fetch and render each test in order, writing one CSV row per test as soon as it completes.
///
/// The first failure stops the run. Rows for the tests that completed before it stay in the
/// output file. Returns the number of rows written.
pub fn run_benchmarks<D: Downloader>(
    config: &BenchConfig,
    tests: &[TestCase],
    fetcher: &SceneFetcher<D>,
) -> RenderBenchResult<usize> {
    log::info!(
        "Running {} test(s) with {} backend using '{}'",
        tests.len(),
        config.backend,
        config.executable.display()
    );
    log::debug!("Requested devices: {}", config.devices);

    let mut report = CsvReport::create(&config.output)?;

    for (written, test) in tests.iter().enumerate() {
        fetcher
            .ensure_archive(&test.archive())
            .with_context(|| format!("Failed to fetch scene for test '{}'", test.name))?;

        let progress = RenderProgress::start(&test.name, config.show_progress);
        let row = run_test(
            &config.executable,
            config.backend,
            test,
            &fetcher.scene_dir(&test.name),
            &progress,
        );
        progress.finish();
        let row = row.with_context(|| format!("Failed to run test '{}'", test.name))?;

        report.write_row(&row).with_context(|| {
            format!(
                "Failed to write result for test '{}' to '{}' after {written} row(s)",
                test.name,
                config.output.display()
            )
        })?;
    }

    Ok(tests.len())
}
