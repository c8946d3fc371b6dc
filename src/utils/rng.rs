use rand_chacha::ChaCha20Rng;
use rand::SeedableRng;

/// Mix a master seed with a task id (SplitMix64 finaliser).
pub fn task_seed(master: u64, task_id: usize) -> u64 {
    let mut x = master ^ ((task_id as u64).wrapping_mul(0x9E3779B97F4A7C15));
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}

/// Per-task deterministic RNG
pub fn task_rng(master: u64, task_id: usize) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(task_seed(master, task_id))
}

/// Run RNG: seeded when `seed != 0`, otherwise drawn from OS entropy.
pub fn run_rng(seed: u64) -> ChaCha20Rng {
    if seed == 0 {
        ChaCha20Rng::from_entropy()
    } else {
        ChaCha20Rng::seed_from_u64(seed)
    }
}
