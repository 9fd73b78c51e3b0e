/// Result type used across the runner and by the `render-bench` binary. Stage specific failures
/// such as [crate::RenderError] and [scene_fetcher::FetchError] convert into it with `?`.
pub type RenderBenchResult<T> = anyhow::Result<T>;
