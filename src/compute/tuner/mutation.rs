//! Random sampling and mutation of parameter vectors.

use crate::compute::LevelRng;
use crate::schema::{ParameterVector, SearchSpace};

/// Uniformly random vector: every index drawn over its row.
pub fn random_point(space: &SearchSpace, rng: &mut LevelRng) -> ParameterVector {
    let mut vector = ParameterVector::default();
    for (position, index) in vector.indices_mut().iter_mut().enumerate() {
        *index = rng.below(space.len_of(position));
    }
    vector
}

/// Copy of `vector` where each index is re-drawn with probability `rate`.
///
/// A re-drawn index may land on its old value.
pub fn mutate(
    vector: &ParameterVector,
    space: &SearchSpace,
    rate: f32,
    rng: &mut LevelRng,
) -> ParameterVector {
    let mut mutated = *vector;
    for (position, index) in mutated.indices_mut().iter_mut().enumerate() {
        if rng.chance(rate) {
            *index = rng.below(space.len_of(position));
        }
    }
    mutated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{PARAMETER_COUNT, VALUES_PER_PARAMETER};

    #[test]
    fn test_random_point_in_range() {
        let space = SearchSpace::default();
        let mut rng = LevelRng::new(11);
        for _ in 0..200 {
            let point = random_point(&space, &mut rng);
            assert!(space.check(&point).is_ok());
        }
    }

    #[test]
    fn test_random_point_covers_values() {
        let space = SearchSpace::default();
        let mut rng = LevelRng::new(2);
        let mut seen = [[false; VALUES_PER_PARAMETER]; PARAMETER_COUNT];
        for _ in 0..500 {
            let point = random_point(&space, &mut rng);
            for (row, &index) in seen.iter_mut().zip(point.indices()) {
                row[index] = true;
            }
        }
        assert!(seen.iter().flatten().all(|&s| s));
    }

    #[test]
    fn test_zero_rate_is_identity() {
        let space = SearchSpace::default();
        let mut rng = LevelRng::new(5);
        let vector = ParameterVector::new([4, 3, 2, 1, 0, 1, 2]);
        for _ in 0..100 {
            assert_eq!(mutate(&vector, &space, 0.0, &mut rng), vector);
        }
    }

    #[test]
    fn test_full_rate_stays_in_range() {
        let space = SearchSpace::default();
        let mut rng = LevelRng::new(9);
        let vector = ParameterVector::new([4; PARAMETER_COUNT]);
        let mut changed = false;
        for _ in 0..50 {
            let mutated = mutate(&vector, &space, 1.0, &mut rng);
            assert!(space.check(&mutated).is_ok());
            changed |= mutated != vector;
        }
        assert!(changed);
    }
}
