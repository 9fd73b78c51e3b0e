use std::path::PathBuf;

/// Failure while running the renderer for a single test.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("failed to launch renderer '{}'", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("renderer subprocess error: {context}")]
    Subprocess {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse renderer status line {line:?}: {reason}")]
    Parse { line: String, reason: &'static str },
}

impl RenderError {
    pub(crate) fn subprocess(context: &'static str, source: std::io::Error) -> Self {
        Self::Subprocess { context, source }
    }
}
