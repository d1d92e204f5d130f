use ndarray::{Array1, Array2};
use weir::{Cascade, CascadeConfig, EventWeighting, UNMATCHED};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Minimal end-to-end: occurrence matrix + KPI -> weighting -> cascade.
    //
    // The KPI spikes whenever event 2 fires, so the weighting pushes that
    // column's scale up and the intervals split on it: noisy-but-benign
    // intervals on one side, KPI-impacting ones on the other.

    let rows: Vec<[f64; 4]> = vec![
        [1.0, 1.0, 0.0, 0.0], // pattern A: event 2 quiet
        [1.0, 0.0, 0.0, 0.0],
        [1.0, 1.0, 0.0, 1.0],
        [0.0, 0.0, 1.0, 0.0], // pattern B: event 2 firing
        [0.0, 0.0, 1.0, 1.0],
        [0.0, 1.0, 1.0, 0.0],
        [1.0, 0.0, 1.0, 1.0],
    ];
    let kpi = Array1::from(vec![1.0, 2.0, 1.0, 9.0, 10.0, 9.0, 5.0]);

    let n = rows.len();
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    let events = Array2::from_shape_vec((n, 4), flat)?;

    let weighted = EventWeighting::default().weigh(events.view(), kpi.view())?;
    println!("per-event weights: {:.4}", weighted.weights);

    let config = CascadeConfig::default().with_threshold(1.0);
    let outcome = Cascade::new(config).run(weighted.matrix.view())?;

    println!(
        "rounds={} patterns={} unmatched={}",
        outcome.rounds,
        outcome.representatives.nrows(),
        outcome.unmatched.len()
    );
    for (row, label) in outcome.labels.iter().enumerate() {
        if *label == UNMATCHED {
            println!("  interval {row}: unmatched");
        } else {
            println!("  interval {row}: pattern {label}");
        }
    }

    Ok(())
}
