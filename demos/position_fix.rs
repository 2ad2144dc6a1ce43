//! Demonstration of a full position fix: linear seed, nonlinear refinement,
//! JSON report of the estimate and its diagnostics

use multilateration::{LinearLeastSquares, NonLinearLeastSquares, RangeModel};
use serde_json::json;

fn main() {
    println!("=== Multilateration Position Fix Demo ===\n");

    // three 2D anchors, slightly noisy distances to the unknown point (2, 1)
    let positions = vec![vec![1.0, 1.0], vec![3.0, 1.0], vec![2.0, 2.0]];
    let distances = [0.95, 1.02, 1.01];

    let model = match RangeModel::new(&positions, &distances) {
        Ok(model) => model,
        Err(e) => {
            eprintln!("Invalid problem: {}", e);
            return;
        }
    };

    // closed-form seed
    let seed = LinearLeastSquares::new(&model).solve();
    println!("Linear seed:       ({:.4}, {:.4})", seed[0], seed[1]);

    // refinement seeded by the linear estimate
    let solver = NonLinearLeastSquares::new(&model);
    let optimum = match solver.solve_with(&[0.0; 3], &[1.0; 3], seed.as_slice()) {
        Ok(optimum) => optimum,
        Err(e) => {
            eprintln!("Solve failed: {}", e);
            return;
        }
    };
    println!(
        "Refined position:  ({:.4}, {:.4})",
        optimum.point[0], optimum.point[1]
    );
    println!("Iterations:        {}", optimum.iterations);
    println!("Evaluations:       {}", optimum.evaluations);
    println!("Residual RMS:      {:.6}", optimum.rms);

    let report = json!({
        "point": optimum.point.as_slice(),
        "iterations": optimum.iterations,
        "evaluations": optimum.evaluations,
        "rms": optimum.rms,
        "sigma": optimum.sigma.as_ref().map(|s| s.as_slice()),
    });
    println!(
        "\nJSON report:\n{}",
        serde_json::to_string_pretty(&report).unwrap()
    );
}
