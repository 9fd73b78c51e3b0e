use std::path::PathBuf;

use clap::Parser;

use crate::definition::Backend;

#[derive(Parser, Debug)]
#[command(about, long_about = None)]
pub struct RenderBenchCli {
    /// Path to the Blender executable
    pub blender_exe: PathBuf,

    /// Output CSV file
    pub output: PathBuf,

    /// Rendering backend to use
    #[clap(long, short, value_enum, ignore_case = true, default_value_t = Backend::OpenCl)]
    pub backend: Backend,

    /// Comma separated list of devices to use. CPU is 0.
    ///
    /// Accepted for compatibility with existing job scripts, device selection is left to the
    /// renderer.
    #[clap(long, short = 'g', alias = "gpu_statees", default_value = "1")]
    pub gpu_devices: String,

    /// Load the tests to run from this TOML file instead of using the built-in list
    #[clap(long)]
    pub tests: Option<PathBuf>,

    /// Directory that holds the `scenes` directory and the temporary download
    #[clap(long, default_value = ".")]
    pub scenes_root: PathBuf,

    /// Do not show a spinner while rendering.
    ///
    /// This is recommended for CI/CD environments where the spinner isn't being looked at by anyone and is just adding noise to the logs.
    #[clap(long, default_value = "false")]
    pub no_progress: bool,
}
