/// For example: `cargo run --bin render-bench -- /opt/blender/blender results.csv --backend CUDA`
fn main() -> anyhow::Result<()> {
    let cli = render_bench_runner::init();

    render_bench_runner::run(cli)
}
