use std::io::Read;

use anyhow::Context;

fn main() -> anyhow::Result<()> {
    stowage_observability::init();

    let constraints = stowage_cli::load_constraints(|name| std::env::var(name).ok())?;

    let input = match std::env::args().nth(1) {
        Some(path) if path != "-" => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read product records from {path}"))?,
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read product records from stdin")?;
            buf
        }
    };

    let (output, summary) = stowage_cli::run(&input, &constraints)?;

    tracing::info!(
        received = summary.received,
        admitted = summary.admitted,
        rejected = summary.rejected,
        total_weight = summary.total_weight,
        weight_utilization = summary.weight_utilization,
        volume_utilization = summary.volume_utilization,
        "storage rules applied"
    );
    if summary.rejected > 0 {
        tracing::warn!("{} product(s) did not fit under the storage weight cap", summary.rejected);
    }

    println!("{output}");
    Ok(())
}
