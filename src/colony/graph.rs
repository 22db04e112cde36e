//! Precomputed distance and attractiveness caches.
//!
//! Built once per problem instance from the cost oracle; never mutated
//! afterwards. Division in the selection loop is expensive, so the
//! inverse-distance weighting is materialized up front.

use ordered_float::OrderedFloat;

/// Dense pairwise distance and attractiveness matrices
#[derive(Debug, Clone)]
pub struct GraphCache {
    dimension: usize,
    distances: Vec<Vec<f64>>,
    attractiveness: Vec<Vec<f64>>,
}

impl GraphCache {
    /// Build the caches, calling the cost oracle once per ordered pair
    /// (self-pairs included). A negative or non-finite distance is a
    /// contract violation of the oracle and rejected eagerly.
    pub fn build<F>(dimension: usize, cost_fn: F, distance_power: f64) -> Result<Self, String>
    where
        F: Fn(usize, usize) -> f64,
    {
        let mut distances = vec![vec![0.0; dimension]; dimension];
        let mut attractiveness = vec![vec![0.0; dimension]; dimension];

        for source in 0..dimension {
            for dest in 0..dimension {
                let d = cost_fn(source, dest);
                if !d.is_finite() || d < 0.0 {
                    return Err(format!(
                        "cost oracle returned invalid distance {} for pair ({}, {})",
                        d, source, dest
                    ));
                }
                distances[source][dest] = d;
                attractiveness[source][dest] = 1.0 / (1.0 + d).powf(distance_power);
            }
        }

        Ok(GraphCache {
            dimension,
            distances,
            attractiveness,
        })
    }

    /// Number of nodes covered by the cache
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Distance between two nodes
    #[inline]
    pub fn distance(&self, source: usize, dest: usize) -> f64 {
        self.distances[source][dest]
    }

    /// Inverse-distance weight in (0, 1]
    #[inline]
    pub fn attractiveness(&self, source: usize, dest: usize) -> f64 {
        self.attractiveness[source][dest]
    }

    /// Median over all pairwise distances, self-pairs included (used to
    /// derive a default ant speed)
    pub fn median_distance(&self) -> f64 {
        let mut all: Vec<f64> = self.distances.iter().flatten().copied().collect();
        if all.is_empty() {
            return 0.0;
        }

        all.sort_by_key(|d| OrderedFloat(*d));
        let mid = all.len() / 2;
        if all.len() % 2 == 0 {
            (all[mid - 1] + all[mid]) / 2.0
        } else {
            all[mid]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_cost(i: usize, j: usize) -> f64 {
        (i as f64 - j as f64).abs()
    }

    #[test]
    fn test_build() {
        let cache = GraphCache::build(3, line_cost, 1.0).unwrap();

        assert_eq!(cache.dimension(), 3);
        assert_eq!(cache.distance(0, 2), 2.0);
        assert_eq!(cache.distance(2, 0), 2.0);
        assert_eq!(cache.distance(1, 1), 0.0);

        // w = 1 / (1 + d)^power
        assert!((cache.attractiveness(0, 1) - 0.5).abs() < 1e-10);
        assert!((cache.attractiveness(0, 2) - 1.0 / 3.0).abs() < 1e-10);
        assert!((cache.attractiveness(0, 0) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_distance_power() {
        let cache = GraphCache::build(2, |_, _| 1.0, 2.0).unwrap();
        assert!((cache.attractiveness(0, 1) - 0.25).abs() < 1e-10);
    }

    #[test]
    fn test_build_rejects_invalid_costs() {
        assert!(GraphCache::build(2, |_, _| -1.0, 1.0).is_err());
        assert!(GraphCache::build(2, |_, _| f64::NAN, 1.0).is_err());
        assert!(GraphCache::build(2, |_, _| f64::INFINITY, 1.0).is_err());
    }

    #[test]
    fn test_build_is_idempotent() {
        let a = GraphCache::build(4, line_cost, 1.5).unwrap();
        let b = GraphCache::build(4, line_cost, 1.5).unwrap();

        for i in 0..4 {
            for j in 0..4 {
                assert_eq!(a.distance(i, j), b.distance(i, j));
                assert_eq!(a.attractiveness(i, j), b.attractiveness(i, j));
            }
        }
    }

    #[test]
    fn test_median_distance() {
        // entries: [0, 5, 5, 0] -> sorted [0, 0, 5, 5] -> (0 + 5) / 2
        let cache = GraphCache::build(2, |i, j| if i == j { 0.0 } else { 5.0 }, 1.0).unwrap();
        assert!((cache.median_distance() - 2.5).abs() < 1e-10);

        // odd count: 3x3 line has entries [0,1,2, 1,0,1, 2,1,0] -> median 1
        let cache = GraphCache::build(3, line_cost, 1.0).unwrap();
        assert!((cache.median_distance() - 1.0).abs() < 1e-10);
    }
}
