//! Runs the renderer for one test as a [`Child`] process and scans its output.

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStderr, Command, Stdio};

use crate::definition::{Backend, TestCase};
use crate::error::RenderError;
use crate::progress::RenderProgress;
use crate::report::ResultRow;
use crate::scan::StatusScanner;

/// Build the renderer command line for `test`, reading the scene from `scene_dir`.
///
/// The layout is `<exe> -b <scene file> -E <engine> -f <frame> [options...]` followed, for
/// Cycles backends, by `-- --cycles-device <BACKEND>`. Everything after `--` is handed to
/// Cycles rather than parsed by Blender, so the per-test options have to come first.
pub fn build_command(
    executable: &Path,
    backend: Backend,
    test: &TestCase,
    scene_dir: &Path,
) -> Command {
    let mut cmd = Command::new(executable);
    cmd.arg("-b")
        .arg(scene_dir.join(&test.blend_file))
        .arg("-E")
        .arg(backend.engine())
        .arg("-f")
        .arg(test.frame.to_string())
        .args(&test.command_options);

    if let Some(device) = backend.device_override() {
        cmd.arg("--").arg("--cycles-device").arg(device);
    }

    cmd
}

/// Render `test` and collect the statistics found on the renderer's stdout.
///
/// Blocks until the renderer closes its stdout. There is no timeout.
pub fn run_test(
    executable: &Path,
    backend: Backend,
    test: &TestCase,
    scene_dir: &Path,
    progress: &RenderProgress,
) -> Result<ResultRow, RenderError> {
    let mut cmd = build_command(executable, backend, test, scene_dir);
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    log::info!("Running {}", test.name);
    log::debug!("Running {cmd:?}");

    let mut child = cmd.spawn().map_err(|source| RenderError::Spawn {
        program: PathBuf::from(executable),
        source,
    })?;

    let stderr_drain = match child.stderr.take() {
        Some(stderr) => Some(
            std::thread::Builder::new()
                .name("renderer-stderr".to_string())
                .spawn(move || drain_stderr(stderr))
                .map_err(|e| {
                    abort(
                        &mut child,
                        RenderError::subprocess("starting stderr reader", e),
                    )
                })?,
        ),
        None => None,
    };

    let scanner = match scan_stdout(&mut child, progress) {
        Ok(scanner) => scanner,
        Err(e) => return Err(abort(&mut child, e)),
    };

    let status = child
        .wait()
        .map_err(|e| RenderError::subprocess("waiting for renderer to exit", e))?;
    if !status.success() {
        log::warn!("Renderer exited with {status} while running {}", test.name);
    }

    if let Some(handle) = stderr_drain {
        if handle.join().is_err() {
            log::warn!("Renderer stderr reader panicked");
        }
    }

    log::info!("Done rendering {}", test.blend_file.display());
    let stats = scanner.into_stats();

    Ok(ResultRow {
        test_name: test.name.clone(),
        render_time: stats.render_time,
        peak_memory: stats.peak_memory,
    })
}

fn scan_stdout(
    child: &mut Child,
    progress: &RenderProgress,
) -> Result<StatusScanner, RenderError> {
    let stdout = child.stdout.take().ok_or_else(|| {
        RenderError::subprocess(
            "capturing stdout",
            std::io::Error::other("renderer stdout was not piped"),
        )
    })?;

    let mut scanner = StatusScanner::new();
    for line in BufReader::new(stdout).split(b'\n') {
        let line = line.map_err(|e| RenderError::subprocess("reading stdout", e))?;
        let line = String::from_utf8_lossy(&line);
        let line = line.strip_suffix('\r').unwrap_or(&line);

        log::trace!("renderer: {line}");
        progress.update(line);
        scanner.feed(line)?;
    }

    Ok(scanner)
}

/// Log everything the renderer writes to stderr until the pipe closes.
///
/// Undecodable bytes are replaced, only end of stream or a read error stops the loop.
fn drain_stderr(stderr: ChildStderr) {
    for line in BufReader::new(stderr).split(b'\n') {
        match line {
            Ok(line) => {
                let line = String::from_utf8_lossy(&line);
                log::debug!("renderer stderr: {}", line.trim_end_matches('\r'));
            }
            Err(e) => {
                log::warn!("Stopped reading renderer stderr: {e}");
                break;
            }
        }
    }
}

/// Stop a renderer that we are no longer reading from.
fn abort(child: &mut Child, err: RenderError) -> RenderError {
    child.kill().ok();
    child.wait().ok();
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(cmd: &Command) -> Vec<String> {
        cmd.get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn cycles_backend_gets_device_override_last() {
        let test = TestCase::new(
            "BMW",
            "https://example.com/bmw.zip",
            "bmw27/bmw27_gpu.blend",
            3,
        )
        .with_command_options(["--threads", "4"]);
        let scene_dir = Path::new("scenes").join("BMW");

        let cmd = build_command(
            Path::new("/opt/blender/blender"),
            Backend::Cuda,
            &test,
            &scene_dir,
        );

        assert_eq!(
            cmd.get_program(),
            std::ffi::OsStr::new("/opt/blender/blender")
        );
        let blend = scene_dir
            .join("bmw27/bmw27_gpu.blend")
            .to_string_lossy()
            .into_owned();
        assert_eq!(
            args(&cmd),
            vec![
                "-b",
                blend.as_str(),
                "-E",
                "CYCLES",
                "-f",
                "3",
                "--threads",
                "4",
                "--",
                "--cycles-device",
                "CUDA",
            ]
        );
    }

    #[test]
    fn rpr_backend_selects_engine_without_override() {
        let test = TestCase::new(
            "BMW",
            "https://example.com/bmw.zip",
            "bmw27/bmw27_gpu.blend",
            1,
        );

        let cmd = build_command(
            Path::new("blender"),
            Backend::Rpr,
            &test,
            Path::new("scenes/BMW"),
        );

        let args = args(&cmd);
        assert_eq!(&args[2..], ["-E", "RPR", "-f", "1"]);
        assert!(!args.iter().any(|a| a == "--cycles-device"));
    }

    #[test]
    fn missing_executable_is_a_spawn_error() {
        let test = TestCase::new(
            "BMW",
            "https://example.com/bmw.zip",
            "bmw27/bmw27_gpu.blend",
            1,
        );

        let result = run_test(
            Path::new("/non/existent/blender"),
            Backend::Cpu,
            &test,
            Path::new("scenes/BMW"),
            &RenderProgress::hidden(),
        );

        assert!(matches!(result, Err(RenderError::Spawn { .. })));
    }
}
