/// Dual-index recipe ranking.
///
/// Two nearest-neighbor indexes are fitted over the candidate recipes: one with cosine
/// distance (nutrient proportions) and one with Euclidean distance (absolute amounts).
/// The final list takes the top Euclidean matches first, then the top cosine matches.
///
/// Cosine neighbor positions are resolved against the candidates ordered by descending
/// calories, while Euclidean positions are resolved against candidate order.
///
/// Taking the first two cosine positions unconditionally could repeat a Euclidean pick.
/// This ranking deliberately departs from that: a cosine position that lands on an
/// already chosen recipe is skipped for the next cosine neighbor, so the five results are
/// always distinct.
use diet_common::dataset::{FeatureVector, RecipeRecord};
use diet_common::error::CommonError;
use diet_common::neighbors::{Metric, NearestNeighbors, Neighbor};
use tracing::debug;

/// Neighbors fitted per index; also the minimum candidate count.
pub const NEIGHBOR_COUNT: usize = 5;

const EUCLIDEAN_PICKS: usize = 3;
const COSINE_PICKS: usize = 2;

/// Rank `candidates` against `target` and return `EUCLIDEAN_PICKS + COSINE_PICKS`
/// distinct recipes.
pub fn rank<'a>(
    candidates: &[&'a RecipeRecord],
    target: &FeatureVector,
) -> Result<Vec<&'a RecipeRecord>, CommonError> {
    let features: Vec<&FeatureVector> = candidates.iter().map(|r| &r.features).collect();
    let cosine = NearestNeighbors::fit(features.clone(), NEIGHBOR_COUNT, Metric::Cosine)?;
    let euclidean = NearestNeighbors::fit(features, NEIGHBOR_COUNT, Metric::Euclidean)?;

    let cosine_hits = cosine.kneighbors(target);
    let euclidean_hits = euclidean.kneighbors(target);
    debug!(
        candidates = candidates.len(),
        cosine = ?summarize(&cosine_hits),
        euclidean = ?summarize(&euclidean_hits),
        "nearest neighbors"
    );

    let mut chosen: Vec<usize> = euclidean_hits
        .iter()
        .take(EUCLIDEAN_PICKS)
        .map(|n| n.index)
        .collect();

    let by_calories = calorie_order(candidates);
    let mut cosine_picked = 0;
    for hit in &cosine_hits {
        if cosine_picked == COSINE_PICKS {
            break;
        }
        let position = by_calories[hit.index];
        if chosen.contains(&position) {
            continue;
        }
        chosen.push(position);
        cosine_picked += 1;
    }

    Ok(chosen.into_iter().map(|i| candidates[i]).collect())
}

/// Candidate positions sorted by descending calories; equal calories keep candidate order.
fn calorie_order(candidates: &[&RecipeRecord]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by(|&a, &b| candidates[b].calories().total_cmp(&candidates[a].calories()));
    order
}

fn summarize(hits: &[Neighbor]) -> Vec<(usize, f64)> {
    hits.iter().map(|n| (n.index, n.distance)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(name: &str, calories: f64, protein: f64) -> RecipeRecord {
        RecipeRecord {
            name: name.to_string(),
            category: "lunch".to_string(),
            instructions: String::new(),
            features: [calories, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, protein, 0.0, 1.0],
        }
    }

    fn target(calories: f64, protein: f64) -> FeatureVector {
        [calories, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, protein, 0.0, 1.0]
    }

    fn names(ranked: &[&RecipeRecord]) -> Vec<String> {
        ranked.iter().map(|r| r.name.clone()).collect()
    }

    #[test]
    fn test_rank_requires_five_candidates() {
        let rows: Vec<RecipeRecord> = (0..4).map(|i| recipe(&format!("r{i}"), 100.0, 1.0)).collect();
        let refs: Vec<&RecipeRecord> = rows.iter().collect();
        let err = rank(&refs, &target(100.0, 1.0)).unwrap_err();
        assert!(matches!(
            err,
            CommonError::InsufficientData {
                required: 5,
                available: 4
            }
        ));
    }

    fn sample_rows() -> Vec<RecipeRecord> {
        // Candidate position: calories/protein
        //   0 a: 500/25  1 b: 100/50  2 c: 900/5  3 d: 300/15  4 e: 700/35  5 f: 200/0
        // Descending-calorie view: [c, e, a, d, f, b]
        vec![
            recipe("a", 500.0, 25.0),
            recipe("b", 100.0, 50.0),
            recipe("c", 900.0, 5.0),
            recipe("d", 300.0, 15.0),
            recipe("e", 700.0, 35.0),
            recipe("f", 200.0, 0.0),
        ]
    }

    #[test]
    fn test_euclidean_first_then_calorie_remapped_cosine() {
        let rows = sample_rows();
        let refs: Vec<&RecipeRecord> = rows.iter().collect();
        let ranked = rank(&refs, &target(480.0, 24.0)).unwrap();

        // Euclidean ranks a, d, e, f, b. Cosine ranks positions 0, 4, 3, 2, 5, which
        // the calorie view turns into c, f, d, a, b.
        assert_eq!(names(&ranked), vec!["a", "d", "e", "c", "f"]);
    }

    #[test]
    fn test_cosine_skips_rows_already_chosen() {
        let rows = sample_rows();
        let refs: Vec<&RecipeRecord> = rows.iter().collect();
        let ranked = rank(&refs, &target(310.0, 14.0)).unwrap();

        // Euclidean picks d, f, a. Cosine remaps to d, c, f, a, b: d, f and a are
        // already taken, leaving c and b.
        assert_eq!(names(&ranked), vec!["d", "f", "a", "c", "b"]);
    }

    #[test]
    fn test_rank_returns_five_distinct_rows() {
        let rows: Vec<RecipeRecord> = (0..12)
            .map(|i| recipe(&format!("r{i}"), 100.0 + 37.0 * i as f64, (i % 5) as f64 * 4.0))
            .collect();
        let refs: Vec<&RecipeRecord> = rows.iter().collect();
        for (calories, protein) in [(50.0, 1.0), (300.0, 20.0), (900.0, 3.0), (0.0, 0.0)] {
            let ranked = rank(&refs, &target(calories, protein)).unwrap();
            assert_eq!(ranked.len(), NEIGHBOR_COUNT);
            for (i, a) in ranked.iter().enumerate() {
                for b in &ranked[i + 1..] {
                    assert!(!std::ptr::eq(*a, *b), "duplicate {}", a.name);
                }
            }
        }
    }

    #[test]
    fn test_calorie_order_is_stable() {
        let rows = vec![
            recipe("x", 200.0, 0.0),
            recipe("y", 400.0, 0.0),
            recipe("z", 200.0, 0.0),
        ];
        let refs: Vec<&RecipeRecord> = rows.iter().collect();
        assert_eq!(calorie_order(&refs), vec![1, 0, 2]);
    }
}
