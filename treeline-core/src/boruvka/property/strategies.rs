//! Point-cloud generation strategies for spanning-tree property tests.
//!
//! Each generator produces a [`CloudFixture`] with a seeded [`SmallRng`] so
//! failures reproduce exactly. Shapes with tied distances (duplicates,
//! grids, collinear runs) are weighted up because they are the important
//! stress cases for parallel tie-breaking.

use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::points::PointSet;

use super::types::{CloudFixture, CloudShape};

/// Minimum point count for generated clouds.
const MIN_POINTS: usize = 8;
/// Maximum point count for generated clouds.
const MAX_POINTS: usize = 64;

/// Generates fixtures covering all five cloud shapes.
pub(super) fn cloud_fixture_strategy() -> impl Strategy<Value = CloudFixture> {
    (shape_strategy(), any::<u64>()).prop_map(|(shape, seed)| {
        let mut rng = SmallRng::seed_from_u64(seed);
        generate_fixture(shape, &mut rng)
    })
}

fn shape_strategy() -> impl Strategy<Value = CloudShape> {
    prop_oneof![
        1 => Just(CloudShape::Uniform),
        1 => Just(CloudShape::Clustered),
        2 => Just(CloudShape::Collinear),
        2 => Just(CloudShape::Duplicated),
        1 => Just(CloudShape::Grid),
    ]
}

/// Generates a fixture for a specific shape.
///
/// Useful for targeted rstest cases where the shape is chosen explicitly
/// rather than sampled by proptest.
pub(super) fn generate_fixture(shape: CloudShape, rng: &mut SmallRng) -> CloudFixture {
    let points = match shape {
        CloudShape::Uniform => generate_uniform(rng),
        CloudShape::Clustered => generate_clustered(rng),
        CloudShape::Collinear => generate_collinear(rng),
        CloudShape::Duplicated => generate_duplicated(rng),
        CloudShape::Grid => generate_grid(rng),
    };
    let neighbourhood_size = rng.gen_range(1..=4).min(points.len() - 1);
    CloudFixture {
        points,
        neighbourhood_size,
        shape,
    }
}

fn point_count(rng: &mut SmallRng) -> usize {
    rng.gen_range(MIN_POINTS..=MAX_POINTS)
}

fn generate_uniform(rng: &mut SmallRng) -> PointSet {
    let len = point_count(rng);
    let dim = rng.gen_range(1..=3);
    let coords = (0..len * dim).map(|_| rng.gen_range(0.0..1.0)).collect();
    PointSet::from_flat(dim, coords).expect("uniform cloud must be valid")
}

fn generate_clustered(rng: &mut SmallRng) -> PointSet {
    let len = point_count(rng);
    let clusters = rng.gen_range(2..=4);
    let centres: Vec<[f32; 2]> = (0..clusters)
        .map(|_| [rng.gen_range(-50.0..50.0), rng.gen_range(-50.0..50.0)])
        .collect();
    let mut coords = Vec::with_capacity(len * 2);
    for _ in 0..len {
        let centre = centres[rng.gen_range(0..clusters)];
        coords.push(centre[0] + rng.gen_range(-0.5..0.5));
        coords.push(centre[1] + rng.gen_range(-0.5..0.5));
    }
    PointSet::from_flat(2, coords).expect("clustered cloud must be valid")
}

fn generate_collinear(rng: &mut SmallRng) -> PointSet {
    let len = point_count(rng);
    let mut coords = Vec::with_capacity(len);
    let mut position = 0.0_f32;
    for _ in 0..len {
        coords.push(position);
        // Occasionally stall so coincident points appear.
        if rng.gen_range(0..4) > 0 {
            position += rng.gen_range(1..=3) as f32 * 0.5;
        }
    }
    PointSet::from_flat(1, coords).expect("collinear cloud must be valid")
}

fn generate_duplicated(rng: &mut SmallRng) -> PointSet {
    let len = point_count(rng);
    let distinct = rng.gen_range(3..=len.div_ceil(2));
    let originals: Vec<[f32; 2]> = (0..distinct)
        .map(|_| [rng.gen_range(0.0..10.0), rng.gen_range(0.0..10.0)])
        .collect();
    let rows: Vec<[f32; 2]> = (0..len)
        .map(|_| originals[rng.gen_range(0..distinct)])
        .collect();
    PointSet::from_rows(&rows).expect("duplicated cloud must be valid")
}

fn generate_grid(rng: &mut SmallRng) -> PointSet {
    let side = rng.gen_range(3..=8);
    let mut rows = Vec::with_capacity(side * side);
    for x in 0..side {
        for y in 0..side {
            rows.push([x as f32, y as f32]);
        }
    }
    PointSet::from_rows(&rows).expect("grid cloud must be valid")
}
