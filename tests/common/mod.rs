#![allow(dead_code)]

use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use statrs::distribution::Normal;

/// The four-point layout used throughout: three points close together and one far away.
pub const SQUARE: [[f64; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [10.0, 10.0]];
pub const SQUARE_TYPES: [&str; 4] = ["A", "A", "B", "B"];

/// `n` points in the plane, each coordinate drawn from a normal distribution.
pub fn normal_points(seed: u64, n: usize, mean: f64, std_dev: f64) -> Vec<[f64; 2]> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(mean, std_dev).unwrap();
    (0..n)
        .map(|_| [normal.sample(&mut rng), normal.sample(&mut rng)])
        .collect()
}

/// `n` labels chosen uniformly from `0..types`.
pub fn random_types(seed: u64, n: usize, types: u32) -> Vec<u32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(0..types)).collect()
}

/// Shannon entropy of the given counts, computed the obvious way.
pub fn reference_entropy(counts: &[u64], base: f64) -> f64 {
    let total: u64 = counts.iter().sum();
    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / total as f64;
            -p * p.ln()
        })
        .sum::<f64>()
        / base.ln()
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() <= 1e-9 * expected.abs().max(1.0),
        "{} != {}",
        actual,
        expected
    );
}
