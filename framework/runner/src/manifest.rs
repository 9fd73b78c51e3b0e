use std::collections::HashSet;
use std::path::{Component, Path};

use anyhow::Context;
use serde::Deserialize;

use crate::definition::TestCase;
use crate::types::RenderBenchResult;

/// A toml helper to allow the test list to be either a single table or an array of tables
///
/// This means it will both allow:
///
/// ```toml
/// [test]
/// name = "BMW"
/// archive_url = "https://download.blender.org/demo/test/BMW27_2.blend.zip"
/// blend_file = "bmw27/bmw27_gpu.blend"
/// ```
///
/// and
///
/// ```toml
/// [[test]]
/// name = "BMW"
/// # ...
///
/// [[test]]
/// name = "classroom"
/// # ...
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

/// A benchmark test list loaded from TOML.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct TestManifest {
    #[serde(rename = "test", default)]
    tests: OneOrMany<TestCase>,
}

impl TestManifest {
    /// Read and validate a test list file.
    pub fn load(path: &Path) -> RenderBenchResult<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read test list '{}'", path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid test list '{}'", path.display()))
    }

    pub fn from_toml_str(s: &str) -> RenderBenchResult<Self> {
        let manifest: TestManifest = toml::from_str(s).context("Failed to parse test list")?;
        manifest.validate()?;

        Ok(manifest)
    }

    pub fn tests(&self) -> Vec<TestCase> {
        match &self.tests {
            OneOrMany::One(item) => vec![item.clone()],
            OneOrMany::Many(items) => items.clone(),
        }
    }

    /// Test names double as directory names below `scenes/` so they must be plain, unique path
    /// components.
    fn validate(&self) -> RenderBenchResult<()> {
        let tests = self.tests();
        if tests.is_empty() {
            anyhow::bail!("Test list does not contain any [[test]] entries");
        }

        let mut seen = HashSet::new();
        for test in &tests {
            let mut components = Path::new(&test.name).components();
            let is_plain = matches!(
                (components.next(), components.next()),
                (Some(Component::Normal(_)), None)
            );
            if !is_plain {
                anyhow::bail!(
                    "Test name '{}' must be a single directory name",
                    test.name
                );
            }

            if !seen.insert(test.name.as_str()) {
                anyhow::bail!("Test name '{}' is used more than once", test.name);
            }
        }

        Ok(())
    }
}
