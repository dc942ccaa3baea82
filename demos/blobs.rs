use cmeans::{v_measure, Algorithm, CMeans};
use ndarray::{array, Array2};
use rand::prelude::*;
use rand_distr::Normal;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Three Gaussian blobs in 5D plus one stray point, clustered both ways.
    let centers = array![
        [0.0, 5.0, 0.0, 0.0, 0.0],
        [1.0, 1.0, 4.0, 0.0, 0.0],
        [1.0, 0.0, 0.0, 5.0, 1.0],
    ];
    let noise = Normal::new(0.0, 0.6)?;
    let mut rng = StdRng::seed_from_u64(42);

    let n = 90;
    let mut x = Array2::zeros((n + 1, 5));
    let mut truth = Vec::with_capacity(n + 1);
    for i in 0..n {
        let label = i % 3;
        truth.push(label);
        for j in 0..5 {
            x[[i, j]] = centers[[label, j]] + noise.sample(&mut rng);
        }
    }
    x.row_mut(n).assign(&array![0.7, 2.0, 1.3, 1.7, 12.0]);
    truth.push(3);

    for algorithm in [Algorithm::Probabilistic, Algorithm::Possibilistic] {
        let fit = CMeans::new(3)
            .with_algorithm(algorithm)
            .with_seed(4)
            .fit(x.view())?;

        println!("{algorithm}:");
        println!(
            "  inertia={:.4} iterations={} ({:?})",
            fit.inertia(),
            fit.n_iter(),
            fit.termination()
        );
        println!(
            "  v-measure on the blobs={:.4}",
            v_measure(&fit.labels()[..n], &truth[..n])
        );
        println!(
            "  stray point memberships={:.3}",
            fit.memberships().row(n)
        );
        if let Some(eta) = fit.scales() {
            println!("  typicality scales={eta:.3}");
        }
    }

    Ok(())
}
