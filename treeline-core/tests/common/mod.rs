//! Shared fixtures and a reference implementation for integration tests.

#![allow(dead_code)]

use rand::Rng;
use rand::rngs::SmallRng;

use treeline_core::PointSet;

/// Euclidean distance with the same accumulation the library uses.
pub fn euclidean(left: &[f32], right: &[f32]) -> f32 {
    let mut sum = 0.0_f64;
    for (&l, &r) in left.iter().zip(right.iter()) {
        let diff = f64::from(l) - f64::from(r);
        sum += diff * diff;
    }
    sum.sqrt() as f32
}

/// Brute-force core distances: the `k`-th nearest neighbour of every point,
/// the point itself counting as the first.
pub fn core_distances(points: &PointSet, neighbourhood_size: usize) -> Vec<f32> {
    (0..points.len())
        .map(|query| {
            let mut distances: Vec<f32> = (0..points.len())
                .map(|other| euclidean(points.point(query), points.point(other)))
                .collect();
            distances.sort_by(f32::total_cmp);
            distances[neighbourhood_size - 1]
        })
        .collect()
}

/// Pairwise distance under the configured metric.
pub fn metric_distance(
    points: &PointSet,
    core: Option<&[f32]>,
    left: usize,
    right: usize,
) -> f32 {
    let euclidean = euclidean(points.point(left), points.point(right));
    match core {
        None => euclidean,
        Some(core) => euclidean.max(core[left]).max(core[right]),
    }
}

/// Reference Prim total weight over the full metric graph.
pub fn prim_total_weight(points: &PointSet, core: Option<&[f32]>) -> f64 {
    let len = points.len();
    let mut in_tree = vec![false; len];
    let mut best = vec![f32::INFINITY; len];
    let mut total = 0.0_f64;

    in_tree[0] = true;
    for other in 1..len {
        best[other] = metric_distance(points, core, 0, other);
    }
    for _ in 1..len {
        let mut next = usize::MAX;
        for candidate in 0..len {
            if !in_tree[candidate] && (next == usize::MAX || best[candidate] < best[next]) {
                next = candidate;
            }
        }
        in_tree[next] = true;
        total += f64::from(best[next]);
        for other in 0..len {
            if !in_tree[other] {
                let distance = metric_distance(points, core, next, other);
                if distance < best[other] {
                    best[other] = distance;
                }
            }
        }
    }
    total
}

/// Builds a one-dimensional point set from raw coordinates.
pub fn line(coordinates: &[f32]) -> PointSet {
    let rows: Vec<[f32; 1]> = coordinates.iter().map(|&x| [x]).collect();
    PointSet::from_rows(&rows).expect("line fixture must be valid")
}

/// Samples `len` points uniformly from the unit cube of dimension `dim`.
pub fn uniform_cloud(rng: &mut SmallRng, len: usize, dim: usize) -> PointSet {
    let coords = (0..len * dim).map(|_| rng.gen_range(0.0..1.0)).collect();
    PointSet::from_flat(dim, coords).expect("cloud fixture must be valid")
}
