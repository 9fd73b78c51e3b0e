//! Extracts render time and peak memory from the renderer's status lines.
//!
//! Cycles prints one status line per progress update, with fields separated by `|`:
//!
//! ```text
//! Fra:1 Mem:177.29M (Peak 178.21M) | Time:00:03.21 | Remaining:00:10.83 | Mem:84.22M, Peak:86.68M | Scene
//! Fra:1 Mem:177.29M (Peak 178.21M) | Time:00:14.02 | Mem:84.22M, Peak:86.68M | Scene | Finished
//! ```
//!
//! Rendering has started once the third field reports `Remaining`, and is over at the first
//! line after that whose third field doesn't. That line carries the peak memory.

use crate::error::RenderError;

const PROGRESS_MARKER: &str = "Remaining";
const TIME_MARKER: &str = "Time:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanState {
    /// No progress line seen yet
    #[default]
    Waiting,
    InProgress,
    /// The summary line has been seen, later lines can still update the render time
    Finished,
}

/// The values picked out of a renderer run. Either may be empty if the output never matched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub render_time: String,
    pub peak_memory: String,
}

#[derive(Debug, Default)]
pub struct StatusScanner {
    state: ScanState,
    stats: RenderStats,
}

impl StatusScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    #[cfg(test)]
    pub(crate) fn stats(&self) -> &RenderStats {
        &self.stats
    }

    pub fn into_stats(self) -> RenderStats {
        self.stats
    }

    /// Feed one line of renderer output, without its line terminator.
    pub fn feed(&mut self, line: &str) -> Result<(), RenderError> {
        let mut tokens = line.split('|');
        let (Some(_), Some(elapsed)) = (tokens.next(), tokens.next()) else {
            return Ok(());
        };
        let status = tokens.next();

        if self.state != ScanState::Waiting {
            if let Some(time) = elapsed.split(TIME_MARKER).nth(1) {
                self.stats.render_time = time.trim().to_string();
            }
        }

        let Some(status) = status else {
            return Ok(());
        };

        match self.state {
            ScanState::Waiting if status.contains(PROGRESS_MARKER) => {
                self.state = ScanState::InProgress;
            }
            ScanState::InProgress if !status.contains(PROGRESS_MARKER) => {
                let peak = status.split(':').nth(2).ok_or_else(|| RenderError::Parse {
                    line: line.to_string(),
                    reason: "summary field has no peak memory segment",
                })?;
                self.stats.peak_memory = peak.trim().to_string();
                self.state = ScanState::Finished;
            }
            _ => {}
        }

        Ok(())
    }
}
