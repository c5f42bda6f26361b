//! Duelbench binary entry point.

fn main() -> anyhow::Result<()> {
    duelbench_cli::run()
}
