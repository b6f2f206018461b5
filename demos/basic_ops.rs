//! Basic Distance Operations
//!
//! The minimal tour: pick a metric, compute pairwise distances, then fan one
//! origin row out to a set of targets.
//!
//! # Metric Selection Guide
//!
//! | Metric          | Range    | Metric? | Use Case                          |
//! |-----------------|----------|---------|-----------------------------------|
//! | euclidean       | [0, inf) | yes     | raw coordinates, cluster radius   |
//! | manhattan       | [0, inf) | yes     | count data, robust to one outlier |
//! | pearson2        | [0, 1]   | no      | expression profiles (centered)    |
//! | cosine          | [0, 2]   | no      | directions, text embeddings       |
//!
//! ```bash
//! cargo run --example basic_ops --release -- cosine
//! ```

use dissim::{batch_distance, distance, DistanceError, MetricKind, RowMatrix};

fn main() -> Result<(), DistanceError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("dissim=debug")),
        )
        .init();

    let metric: MetricKind = std::env::args()
        .nth(1)
        .as_deref()
        .unwrap_or("euclidean")
        .parse()?;

    // Pairwise
    let x = [1.0, -1.0, 0.0];
    let y = [2.0, -2.0, 0.5];
    println!("{}(x, y) = {:.4}", metric, distance(metric, &x, &y)?);

    // One origin, many targets. Rows are zero-mean so every metric applies.
    let m = RowMatrix::from_rows(&[
        vec![1.0, -1.0, 0.0],
        vec![2.0, -2.0, 0.0],
        vec![0.0, 1.0, -1.0],
        vec![-1.0, 0.5, 0.5],
    ])?;
    let targets = [3, 1, 2, 1];
    let ds = batch_distance(metric, &m, 0, &targets)?;
    for (t, d) in targets.iter().zip(ds.iter()) {
        println!("  row 0 -> row {}: {:.4}", t, d);
    }

    if !metric.is_metric() {
        println!("  note: {} does not satisfy the triangle inequality", metric);
    }

    // Out-of-range target: the whole batch is rejected.
    match batch_distance(metric, &m, 0, &[1, 4]) {
        Ok(_) => unreachable!("row 4 does not exist"),
        Err(e) => println!("  rejected: {}", e),
    }

    Ok(())
}
