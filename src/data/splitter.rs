// ============================================================
// Layer 4 — Train/Validation Splitter
// ============================================================
// Randomly shuffles samples and splits them into two sets:
//   - Training set:   used to update model weights
//   - Validation set: used to measure performance on unseen data
//
// Why shuffle before splitting?
//   The loader walks the dataset class by class, so without a
//   shuffle the validation set would only contain the classes
//   that happened to be read last.
//
// Sizing: the validation set gets ceil(n × val_fraction)
// samples and the training set gets the rest, so a 20%
// split of 21 images is 16 / 5.
//
// Seeding:
//   seed = None     → fresh entropy every call (a new split per run)
//   seed = Some(s)  → the same permutation every time
//
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom.
//
// Reference: rand crate documentation

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Randomly shuffle `samples` and split into (train, validation).
///
/// # Arguments
/// * `samples`      - All available samples (consumed by this function)
/// * `val_fraction` - Proportion held out for validation, e.g. 0.2
/// * `seed`         - Optional seed for a reproducible split
pub fn split_train_val<T>(
    mut samples:  Vec<T>,
    val_fraction: f64,
    seed:         Option<u64>,
) -> (Vec<T>, Vec<T>) {
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None    => StdRng::from_entropy(),
    };
    samples.shuffle(&mut rng);

    let total    = samples.len();
    // The small epsilon keeps 0.2 × 10 = 2.0000000000000004 from rounding up to 3
    let val_len  = ((total as f64) * val_fraction.clamp(0.0, 1.0) - 1e-9).ceil().max(0.0) as usize;
    let split_at = total.saturating_sub(val_len.min(total));

    // split_off(n) removes elements [n..] from the Vec and returns them
    let val = samples.split_off(split_at);

    tracing::debug!(
        "Dataset split: {} training, {} validation ({}% / {}%)",
        samples.len(),
        val.len(),
        (samples.len() * 100) / total.max(1),
        (val.len()     * 100) / total.max(1),
    );

    (samples, val)
}
