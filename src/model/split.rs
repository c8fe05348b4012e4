//! Seeded train/test partitioning.

use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

use crate::error::ModelError;

/// Row indices of the two partitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffles `0..n_rows` with `seed` and carves off the test partition.
///
/// The test partition holds `ceil(n_rows * test_ratio)` rows; both partitions
/// are kept non-empty. Same `(n_rows, test_ratio, seed)` always yields the
/// same split.
///
/// # Errors
///
/// Returns [`ModelError::InsufficientData`] when fewer than 2 rows are given.
pub fn train_test_split(n_rows: usize, test_ratio: f64, seed: u64) -> Result<Split, ModelError> {
    if n_rows < 2 {
        return Err(ModelError::InsufficientData { rows: n_rows });
    }

    let n_test = ((n_rows as f64 * test_ratio).ceil() as usize).clamp(1, n_rows - 1);

    let mut order: Vec<usize> = (0..n_rows).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    order.shuffle(&mut rng);

    let train = order.split_off(n_test);
    Ok(Split { train, test: order })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_follow_ratio() {
        let split = train_test_split(100, 0.2, 42).unwrap();
        assert_eq!(split.test.len(), 20);
        assert_eq!(split.train.len(), 80);
    }

    #[test]
    fn partitions_are_disjoint_and_complete() {
        let split = train_test_split(37, 0.2, 9).unwrap();
        let mut all: Vec<usize> = split.train.iter().chain(&split.test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..37).collect::<Vec<_>>());
    }

    #[test]
    fn same_seed_same_split() {
        assert_eq!(
            train_test_split(50, 0.2, 42).unwrap(),
            train_test_split(50, 0.2, 42).unwrap()
        );
    }

    #[test]
    fn two_rows_split_one_and_one() {
        let split = train_test_split(2, 0.2, 42).unwrap();
        assert_eq!((split.train.len(), split.test.len()), (1, 1));
    }

    #[test]
    fn fewer_than_two_rows_is_insufficient() {
        for n in [0, 1] {
            let err = train_test_split(n, 0.2, 42).unwrap_err();
            assert!(matches!(err, ModelError::InsufficientData { rows } if rows == n));
        }
    }
}
