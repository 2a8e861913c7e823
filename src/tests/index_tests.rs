// src/tests/index_tests.rs

use crate::{brute_force_nearest, MrptError, ProjectionSchedule, RpTreeConfig, RpTreeError, RpTreeIndex};
use ndarray::{array, arr1, Array1, Array2, Array3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::thread;

fn scenario_points() -> Array2<f64> {
    array![
        [0.5, 0.5],
        [0.5, 0.6],
        [0.5, 0.4],
        [0.5, 0.45],
        [0.5, 0.48],
        [0.5, 0.6],
        [-1.0, 0.5],
    ]
}

fn random_data(seed: u64, size: usize, dim: usize) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::from_shape_fn((size, dim), |_| rng.gen::<f64>())
}

fn seeded_index(seed: u64, max_depth: usize, min_split: usize) -> RpTreeIndex {
    let config = RpTreeConfig::builder()
        .alpha(0.5)
        .max_depth(max_depth)
        .min_split(min_split)
        .seed(seed)
        .build()
        .unwrap();
    RpTreeIndex::new(config).unwrap()
}

#[test]
fn scenario_query_returns_far_point() {
    let mut index = seeded_index(0, 3, 2);
    let schedule = ProjectionSchedule::from_directions(vec![
        vec![1.0, 1.0],
        vec![1.0, 0.0],
        vec![1.0, 0.0],
        vec![1.0, 0.0],
    ])
    .unwrap();
    let points = scenario_points();
    index.initialize_with_schedule(points.view(), schedule).unwrap();

    let query = array![-0.9, 0.4];
    assert_eq!(index.find_nearest(query.view()).unwrap(), 6);
    let (exact, _) = brute_force_nearest(points.view(), query.view()).unwrap();
    assert_eq!(exact, 6);
}

#[test]
fn scenario_query_is_valid_for_random_schedules() {
    let points = scenario_points();
    let query = array![-0.9, 0.4];
    for seed in 0..20 {
        let config = RpTreeConfig::builder().alpha(0.9).min_split(2).seed(seed).build().unwrap();
        let mut index = RpTreeIndex::new(config).unwrap();
        index.initialize(points.view()).unwrap();
        let idx = index.find_nearest(query.view()).unwrap();
        assert!(idx < 7);
    }
}

#[test]
fn non_positive_alpha_is_a_configuration_error() {
    for alpha in [0.0, -0.1] {
        let config = RpTreeConfig { alpha, ..RpTreeConfig::default() };
        assert!(matches!(RpTreeIndex::new(config), Err(MrptError::Configuration(_))));
        assert!(matches!(
            RpTreeConfig::builder().alpha(alpha).build(),
            Err(MrptError::Configuration(_))
        ));
    }
}

#[test]
fn one_dimensional_input_is_a_shape_error() {
    let mut index = seeded_index(1, 3, 10);
    let flat = arr1(&[0.5, 0.6, 0.7]);
    assert!(matches!(
        index.initialize(flat.view()),
        Err(MrptError::Index(RpTreeError::InvalidShape(_)))
    ));
    assert!(!index.is_initialized());

    let cube = Array3::<f64>::zeros((2, 2, 2));
    assert!(matches!(
        index.initialize(cube.view()),
        Err(MrptError::Index(RpTreeError::InvalidShape(_)))
    ));

    let no_columns = Array2::<f64>::zeros((4, 0));
    assert!(matches!(
        index.initialize(no_columns.view()),
        Err(MrptError::Index(RpTreeError::InvalidShape(_)))
    ));
}

#[test]
fn empty_input_is_rejected() {
    let mut index = seeded_index(1, 3, 10);
    let empty = Array2::<f64>::zeros((0, 3));
    assert!(matches!(
        index.initialize(empty.view()),
        Err(MrptError::Index(RpTreeError::EmptyInput(_)))
    ));
    assert!(!index.is_initialized());
}

#[test]
fn query_before_initialize_is_a_state_error() {
    let index = RpTreeIndex::new(RpTreeConfig::default()).unwrap();
    let query = array![1.0, 2.0];
    assert!(matches!(
        index.find_nearest(query.view()),
        Err(MrptError::Index(RpTreeError::NotInitialized))
    ));
    assert!(matches!(index.stats(), Err(MrptError::Index(RpTreeError::NotInitialized))));
    assert_eq!(index.size(), None);
    assert_eq!(index.dim(), None);
}

#[test]
fn second_initialize_is_rejected() {
    let mut index = seeded_index(2, 3, 10);
    let data = random_data(2, 30, 3);
    index.initialize(data.view()).unwrap();
    assert!(matches!(
        index.initialize(data.view()),
        Err(MrptError::Index(RpTreeError::AlreadyInitialized))
    ));
}

#[test]
fn query_with_wrong_length_is_rejected() {
    let mut index = seeded_index(3, 3, 10);
    index.initialize(random_data(3, 30, 4).view()).unwrap();
    assert!(matches!(
        index.find_nearest(array![1.0, 2.0].view()),
        Err(MrptError::Index(RpTreeError::DimensionMismatch { expected: 4, actual: 2 }))
    ));
}

#[test]
fn identical_vectors_stay_in_one_leaf() {
    let data = Array2::from_elem((25, 3), 0.75);
    for (max_depth, min_split) in [(0, 1), (3, 1), (10, 2), (3, 10)] {
        let mut index = seeded_index(4, max_depth, min_split);
        index.initialize(data.view()).unwrap();

        let stats = index.stats().unwrap();
        assert_eq!(stats.leaf_count, 1);
        assert_eq!(stats.node_count, 1);

        let (idx, distance) = index.find_nearest_with_distance(array![0.75, 0.75, 0.75].view()).unwrap();
        assert_eq!(idx, 0);
        assert_eq!(distance, 0.0);
    }
}

#[test]
fn partition_is_complete_and_bounded() {
    let data = random_data(5, 1000, 10);
    for seed in 0..5 {
        let mut index = seeded_index(seed, 5, 10);
        index.initialize(data.view()).unwrap();
        assert_eq!(index.size(), Some(1000));
        assert_eq!(index.dim(), Some(10));

        let leaves = index.leaf_indices().unwrap();
        assert!(leaves.iter().all(|leaf| !leaf.is_empty()));
        let mut all: Vec<usize> = leaves.into_iter().flatten().collect();
        all.sort_unstable();
        assert_eq!(all, (0..1000).collect::<Vec<usize>>());

        assert!(index.stats().unwrap().max_depth_reached <= 5);
    }
}

#[test]
fn fixed_seed_builds_identical_trees() {
    let data = random_data(6, 500, 8);
    let mut a = seeded_index(42, 6, 5);
    let mut b = seeded_index(42, 6, 5);
    a.initialize(data.view()).unwrap();
    b.initialize(data.view()).unwrap();

    assert_eq!(a.tree(), b.tree());

    let queries = random_data(60, 100, 8);
    for query in queries.outer_iter() {
        assert_eq!(a.find_nearest(query).unwrap(), b.find_nearest(query).unwrap());
    }
}

#[test]
fn query_results_are_in_range() {
    let data = random_data(7, 300, 5);
    let mut index = seeded_index(7, 8, 3);
    index.initialize(data.view()).unwrap();

    let mut rng = StdRng::seed_from_u64(700);
    for _ in 0..200 {
        let query: Array1<f64> = (0..5).map(|_| rng.gen::<f64>() * 4.0 - 2.0).collect();
        let idx = index.find_nearest(query.view()).unwrap();
        assert!(idx < 300);
    }
}

#[test]
fn single_leaf_index_is_exact() {
    let data = random_data(8, 80, 6);
    let mut index = seeded_index(8, 3, 1000);
    index.initialize(data.view()).unwrap();
    assert_eq!(index.stats().unwrap().leaf_count, 1);

    let queries = random_data(80, 40, 6);
    for query in queries.outer_iter() {
        let (exact, _) = brute_force_nearest(data.view(), query).unwrap();
        assert_eq!(index.find_nearest(query).unwrap(), exact);
    }
}

#[test]
fn built_index_serves_queries_from_many_threads() {
    let data = random_data(9, 400, 6);
    let mut index = seeded_index(9, 6, 8);
    index.initialize(data.view()).unwrap();
    let index = Arc::new(index);

    let queries = random_data(90, 32, 6);
    let expected: Vec<usize> =
        queries.outer_iter().map(|q| index.find_nearest(q).unwrap()).collect();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let index = Arc::clone(&index);
            let queries = queries.clone();
            thread::spawn(move || {
                queries.outer_iter().map(|q| index.find_nearest(q).unwrap()).collect::<Vec<usize>>()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn unbounded_max_depth_builds_and_queries() {
    let points = array![[1.0, 2.0], [3.0, 4.0]];
    let mut index = seeded_index(1, usize::MAX, 1);
    index.initialize(points.view()).unwrap();

    // two vectors can never sit deeper than depth 1
    assert_eq!(index.tree().unwrap().schedule.levels(), 2);
    assert!(index.stats().unwrap().max_depth_reached <= 1);
    assert_eq!(index.find_nearest(array![3.0, 4.0].view()).unwrap(), 1);
    assert_eq!(index.find_nearest(array![1.0, 2.0].view()).unwrap(), 0);
}

#[test]
fn huge_max_depth_only_draws_reachable_levels() {
    let data = random_data(10, 200, 4);
    let mut index = seeded_index(10, 1_000_000_000, 2);
    index.initialize(data.view()).unwrap();

    assert_eq!(index.tree().unwrap().schedule.levels(), 200);
    let leaves = index.leaf_indices().unwrap();
    assert_eq!(leaves.iter().map(Vec::len).sum::<usize>(), 200);
    assert!(index.find_nearest(data.row(17)).unwrap() < 200);
}

#[test]
fn supplied_schedule_only_needs_reachable_levels() {
    let mut index = seeded_index(11, 50, 1);
    let schedule = ProjectionSchedule::from_directions(vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
    index.initialize_with_schedule(array![[1.0, 2.0], [3.0, 4.0]].view(), schedule).unwrap();
    assert_eq!(index.find_nearest(array![3.0, 4.0].view()).unwrap(), 1);

    let mut index = seeded_index(11, 50, 1);
    let short = ProjectionSchedule::from_directions(vec![vec![1.0, 0.0]]).unwrap();
    assert!(matches!(
        index.initialize_with_schedule(array![[1.0, 2.0], [3.0, 4.0]].view(), short),
        Err(MrptError::Configuration(_))
    ));
}
