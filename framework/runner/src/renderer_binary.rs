use std::env;
use std::path::{Path, PathBuf};

use anyhow::bail;
use anyhow::Context;

use crate::types::RenderBenchResult;

/// Environment variable to override the path to the renderer executable given on the command line.
pub const RENDER_BENCH_BLENDER_PATH_ENV: &str = "RENDER_BENCH_BLENDER_PATH";

/// Get the path to the renderer executable.
///
/// If the [`RENDER_BENCH_BLENDER_PATH_ENV`] environment variable is set, its value is used instead
/// of `requested`. See [`resolve_renderer`] for how the path is checked.
pub fn renderer_path(requested: &Path) -> RenderBenchResult<PathBuf> {
    let env_override = env::var(RENDER_BENCH_BLENDER_PATH_ENV).ok();
    resolve_renderer(requested, env_override.as_deref())
}

/// Resolve the renderer executable.
///
/// An override, when present, must point at an existing file. Otherwise `requested` is used as is
/// if it exists, and looked up in the user's `PATH` if it doesn't, so `blender` works as well as
/// `/opt/blender/blender`.
pub fn resolve_renderer(
    requested: &Path,
    env_override: Option<&str>,
) -> RenderBenchResult<PathBuf> {
    match env_override {
        Some("") => {
            bail!("'{RENDER_BENCH_BLENDER_PATH_ENV}' set to empty string");
        }
        Some(path) => {
            let renderer_path = PathBuf::from(path);
            if !renderer_path.exists() {
                bail!(
                    "Path to renderer overwritten with '{RENDER_BENCH_BLENDER_PATH_ENV}={path}' but that path doesn't exist",
                    path = renderer_path.display()
                );
            }
            Ok(renderer_path)
        }
        None if requested.exists() => Ok(requested.to_path_buf()),
        None => {
            log::warn!(
                "'{}' does not exist so looking in user's 'PATH'",
                requested.display()
            );
            which::which(requested).with_context(|| {
                format!(
                    "Renderer '{}' not found. Pass the path to the Blender executable or set '{RENDER_BENCH_BLENDER_PATH_ENV}'.",
                    requested.display()
                )
            })
        }
    }
}
