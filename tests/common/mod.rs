#![allow(dead_code)]

use imgcursor::{Dimensions, Position};
use rand::{distributions::Uniform, Rng, SeedableRng};
use rand_xoshiro::Xoroshiro64Star;

/// Installs the test logger, repeated calls are harmless.
pub fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn dims(sizes: &[usize]) -> Dimensions {
    Dimensions::new(sizes.to_vec()).unwrap()
}

/// Distinct value per position, readable in failure messages: `(3, 1, 2)` is `20103`.
pub fn value(p: &Position) -> i64 {
    p.iter().rev().fold(0, |acc, &c| 100 * acc + c)
}

pub fn rng(seed: u64) -> Xoroshiro64Star {
    Xoroshiro64Star::seed_from_u64(seed)
}

/// Random image and cell dimensions with up to `max_rank` axes of up to `max_size`.
pub fn random_shape(rng: &mut impl Rng, max_rank: usize, max_size: usize) -> (Dimensions, Dimensions) {
    let rank = rng.gen_range(1..=max_rank);
    let sizes = Uniform::new_inclusive(1, max_size);
    let image: Vec<usize> = (0..rank).map(|_| rng.sample(sizes)).collect();
    let cells: Vec<usize> = image.iter().map(|&s| rng.gen_range(1..=s)).collect();
    (dims(&image), dims(&cells))
}
