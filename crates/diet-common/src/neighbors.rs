/// Brute-force k-nearest-neighbor index over recipe feature vectors.
///
/// The index borrows the fitted rows and answers queries by computing the distance from
/// the query to every row. Datasets are a few thousand rows after category filtering,
/// so an exhaustive scan per request is cheap and needs no tree structure.
///
/// Results are ordered by ascending distance; equal distances keep row order.
use crate::dataset::FeatureVector;
use crate::error::CommonError;

/// Distance metric used by an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// `1 - cos(a, b)`. A zero-length vector has similarity 0 with everything.
    Cosine,
    /// Straight-line (L2) distance.
    Euclidean,
}

impl Metric {
    pub fn distance(self, a: &FeatureVector, b: &FeatureVector) -> f64 {
        match self {
            Metric::Cosine => cosine_distance(a, b),
            Metric::Euclidean => euclidean_distance(a, b),
        }
    }
}

/// A single query match: the position of the row in the fitted data and its distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub distance: f64,
}

pub struct NearestNeighbors<'a> {
    rows: Vec<&'a FeatureVector>,
    k: usize,
    metric: Metric,
}

impl<'a> NearestNeighbors<'a> {
    /// Fit an index returning `k` neighbors per query.
    ///
    /// Fails with `InsufficientData` when fewer than `k` rows are supplied.
    pub fn fit(rows: Vec<&'a FeatureVector>, k: usize, metric: Metric) -> Result<Self, CommonError> {
        if rows.len() < k {
            return Err(CommonError::InsufficientData {
                required: k,
                available: rows.len(),
            });
        }
        Ok(Self { rows, k, metric })
    }

    /// Return the `k` rows closest to `query`, nearest first.
    pub fn kneighbors(&self, query: &FeatureVector) -> Vec<Neighbor> {
        let mut scored: Vec<Neighbor> = self
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| Neighbor {
                index,
                distance: self.metric.distance(query, row),
            })
            .collect();

        // Stable: ties stay in row order.
        scored.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        scored.truncate(self.k);
        scored
    }
}

fn cosine_distance(a: &FeatureVector, b: &FeatureVector) -> f64 {
    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }

    // Rounding can push the ratio slightly outside [-1, 1].
    let similarity = (dot / (norm_a * norm_b)).clamp(-1.0, 1.0);
    1.0 - similarity
}

fn euclidean_distance(a: &FeatureVector, b: &FeatureVector) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(head: &[f64]) -> FeatureVector {
        let mut v = [0.0; 11];
        v[..head.len()].copy_from_slice(head);
        v
    }

    #[test]
    fn test_euclidean_orders_by_distance() {
        let rows = [
            vector(&[10.0, 0.0]),
            vector(&[1.0, 1.0]),
            vector(&[5.0, 5.0]),
            vector(&[0.0, 0.0]),
        ];
        let index = NearestNeighbors::fit(rows.iter().collect(), 3, Metric::Euclidean).unwrap();
        let found = index.kneighbors(&vector(&[0.0, 0.0]));

        let order: Vec<usize> = found.iter().map(|n| n.index).collect();
        assert_eq!(order, vec![3, 1, 2]);
        assert_eq!(found[0].distance, 0.0);
        assert!((found[1].distance - 2.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_ignores_magnitude() {
        let rows = [
            vector(&[100.0, 0.0]),
            vector(&[0.0, 3.0]),
            vector(&[1.0, 1.0]),
        ];
        let index = NearestNeighbors::fit(rows.iter().collect(), 3, Metric::Cosine).unwrap();
        let found = index.kneighbors(&vector(&[2.0, 0.0]));

        assert_eq!(found[0].index, 0);
        assert!(found[0].distance.abs() < 1e-12);
        assert_eq!(found[1].index, 2);
        assert_eq!(found[2].index, 1);
        assert!((found[2].distance - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_zero_vector() {
        assert_eq!(cosine_distance(&vector(&[]), &vector(&[1.0, 2.0])), 1.0);
    }

    #[test]
    fn test_ties_keep_row_order() {
        let rows = [vector(&[1.0]), vector(&[-1.0]), vector(&[1.0])];
        let index = NearestNeighbors::fit(rows.iter().collect(), 3, Metric::Euclidean).unwrap();
        let order: Vec<usize> = index
            .kneighbors(&vector(&[0.0]))
            .iter()
            .map(|n| n.index)
            .collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn test_fit_requires_k_rows() {
        let rows = [vector(&[1.0]), vector(&[2.0])];
        let err = NearestNeighbors::fit(rows.iter().collect(), 5, Metric::Cosine)
            .err()
            .unwrap();
        assert!(matches!(
            err,
            CommonError::InsufficientData {
                required: 5,
                available: 2
            }
        ));
    }
}
