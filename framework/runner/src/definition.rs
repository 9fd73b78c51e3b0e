use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use scene_fetcher::{SceneArchive, Sha256Hash};
use serde::Deserialize;

/// Compute device family that the renderer should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Backend {
    #[default]
    #[value(name = "OPENCL")]
    OpenCl,
    #[value(name = "CPU")]
    Cpu,
    #[value(name = "RPR")]
    Rpr,
    #[value(name = "OPTIX")]
    Optix,
    #[value(name = "CUDA")]
    Cuda,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::OpenCl => "OPENCL",
            Backend::Cpu => "CPU",
            Backend::Rpr => "RPR",
            Backend::Optix => "OPTIX",
            Backend::Cuda => "CUDA",
        }
    }

    /// Render engine passed to the renderer's engine selection flag.
    pub fn engine(&self) -> &'static str {
        match self {
            Backend::Rpr => "RPR",
            _ => "CYCLES",
        }
    }

    /// Cycles device type to force, if this backend runs on Cycles.
    ///
    /// RPR selects its own devices so no override is passed for it.
    pub fn device_override(&self) -> Option<&'static str> {
        match self {
            Backend::Rpr => None,
            other => Some(other.as_str()),
        }
    }
}

impl Display for Backend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single benchmark: which scene to fetch, which file and frame to render.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TestCase {
    /// Unique name, also the directory the scene is unpacked into
    pub name: String,
    pub archive_url: String,
    /// Path of the scene file relative to the unpacked archive
    pub blend_file: PathBuf,
    #[serde(default = "default_frame")]
    pub frame: i32,
    /// Reserved for per-test renderer settings, currently not applied.
    #[serde(default)]
    pub settings: toml::Table,
    /// Extra arguments appended to the renderer command line
    #[serde(default)]
    pub command_options: Vec<String>,
    #[serde(default)]
    pub sha256: Option<Sha256Hash>,
}

fn default_frame() -> i32 {
    1
}

impl TestCase {
    pub fn new(
        name: impl Into<String>,
        archive_url: impl Into<String>,
        blend_file: impl Into<PathBuf>,
        frame: i32,
    ) -> Self {
        Self {
            name: name.into(),
            archive_url: archive_url.into(),
            blend_file: blend_file.into(),
            frame,
            settings: toml::Table::new(),
            command_options: Vec::new(),
            sha256: None,
        }
    }

    pub fn with_command_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command_options = options.into_iter().map(Into::into).collect();
        self
    }

    /// The archive to fetch before this test can run.
    pub fn archive(&self) -> SceneArchive {
        SceneArchive {
            name: self.name.clone(),
            url: self.archive_url.clone(),
            sha256: self.sha256,
        }
    }
}

/// The benchmarks run when no test list is given on the command line.
pub fn default_test_cases() -> Vec<TestCase> {
    vec![TestCase::new(
        "BMW",
        "https://download.blender.org/demo/test/BMW27_2.blend.zip",
        "bmw27/bmw27_gpu.blend",
        1,
    )]
}
