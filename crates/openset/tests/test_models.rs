//! Golden-value and contract tests for the distance models.

use float_cmp::assert_approx_eq;
use test_case::test_case;

use openset::models::{
    AngleBasedOutlierFactor, AngleBasedOutlierFactor2, Correlation, Cosine, Euclidean,
    FastAngleBasedOutlierFactor, FastAngleBasedOutlierFactor2, IntegratedRankWeightedDepth,
    KNearestNeighbors, LocalOutlierFactor, Mahalanobis, MahalanobisSC, Manhattan, Minkowski,
    MinMaxOutFactor, MinMaxOutScore, MinMaxWindow, SEuclidean,
};
use openset::{DistanceModel, Model};

/// The 4-point rectangle whose mean is `[1, 2]`.
fn square() -> Vec<Vec<f64>> {
    vec![vec![0.0, 0.0], vec![0.0, 4.0], vec![2.0, 0.0], vec![2.0, 4.0]]
}

/// The queries shared by most of the golden tests.
fn queries() -> Vec<Vec<f64>> {
    vec![
        vec![0.0, 0.0],
        vec![2.0, 2.0],
        vec![1.0, 3.0],
        vec![3.0, 1.0],
        vec![3.0, 3.0],
    ]
}

/// A 3x5 grid of points with a hole-free interior.
fn grid() -> Vec<Vec<f64>> {
    let mut points = Vec::new();
    for x in 0..3 {
        for y in 0..5 {
            points.push(vec![f64::from(x), f64::from(y)]);
        }
    }
    points
}

fn assert_scores(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len());
    for (&a, &e) in actual.iter().zip(expected.iter()) {
        assert_approx_eq!(f64, a, e, epsilon = 1e-7);
    }
}

#[test]
fn euclidean_golden() -> Result<(), String> {
    let mut model = Euclidean::<i32>::default();
    model.fit(&square(), None)?;

    let sqrt5 = 5.0_f64.sqrt();
    let scores = model.score(&queries(), None)?;
    assert_scores(&scores, &[sqrt5, 1.0, 1.0, sqrt5, sqrt5]);
    Ok(())
}

#[test]
fn manhattan_golden() -> Result<(), String> {
    let mut model = Manhattan::<i32>::default();
    model.fit(&square(), None)?;

    let scores = model.score(&queries(), None)?;
    assert_scores(&scores, &[3.0, 1.0, 1.0, 3.0, 3.0]);
    Ok(())
}

#[test]
fn minkowski_default_matches_euclidean() -> Result<(), String> {
    let mut minkowski = Minkowski::<i32>::default();
    let mut euclidean = Euclidean::<i32>::default();
    minkowski.fit(&square(), None)?;
    euclidean.fit(&square(), None)?;

    assert_scores(&minkowski.score(&queries(), None)?, &euclidean.score(&queries(), None)?);
    Ok(())
}

#[test]
fn minkowski_order_one_matches_manhattan() -> Result<(), String> {
    let mut minkowski = Minkowski::<i32>::new(1.0);
    minkowski.fit(&square(), None)?;

    let scores = minkowski.score(&queries(), None)?;
    assert_scores(&scores, &[3.0, 1.0, 1.0, 3.0, 3.0]);
    Ok(())
}

#[test]
fn seuclidean_golden() -> Result<(), String> {
    // The rectangle's per-column population variances are [1, 4].
    let mut model = SEuclidean::<i32>::default();
    model.fit(&square(), None)?;

    let scores = model.score(&queries(), None)?;
    assert_scores(
        &scores,
        &[2.0_f64.sqrt(), 1.0, 0.5, 4.25_f64.sqrt(), 4.25_f64.sqrt()],
    );
    Ok(())
}

#[test]
fn cosine_golden() -> Result<(), String> {
    let mut model = Cosine::<i32>::default();
    model.fit(&square(), None)?;

    let scores = model.score(
        &[
            vec![1.0, 1.0],
            vec![2.0, 2.0],
            vec![1.0, 3.0],
            vec![3.0, 1.0],
            vec![3.0, 3.0],
        ],
        None,
    )?;
    assert_scores(
        &scores,
        &[
            1.0 - 3.0 / (2.0_f64 * 5.0).sqrt(),
            1.0 - 6.0 / (8.0_f64 * 5.0).sqrt(),
            1.0 - 7.0 / (10.0_f64 * 5.0).sqrt(),
            1.0 - 5.0 / (10.0_f64 * 5.0).sqrt(),
            1.0 - 9.0 / (18.0_f64 * 5.0).sqrt(),
        ],
    );
    Ok(())
}

#[test]
fn cosine_zero_norm_query_scores_one() -> Result<(), String> {
    let mut model = Cosine::<i32>::default();
    model.fit(&square(), None)?;

    let scores = model.score(&[vec![0.0, 0.0]], None)?;
    assert_approx_eq!(f64, scores[0], 1.0, ulps = 2);
    Ok(())
}

#[test]
fn correlation_golden() -> Result<(), String> {
    // Queries parallel to the mean direction score 0, anti-parallel 2.
    let mut model = Correlation::<i32>::default();
    model.fit(&square(), None)?;

    let scores = model.score(
        &[
            vec![2.0, 4.0],
            vec![4.0, 2.0],
            vec![1.0, 3.0],
            vec![3.0, 1.0],
            vec![3.0, 6.0],
        ],
        None,
    )?;
    assert_scores(&scores, &[0.0, 2.0, 0.0, 2.0, 0.0]);
    Ok(())
}

#[test]
fn correlation_constant_query_is_nan() -> Result<(), String> {
    let mut model = Correlation::<i32>::default();
    model.fit(&square(), None)?;

    let scores = model.score(&[vec![3.0, 3.0]], None)?;
    assert!(scores[0].is_nan());
    Ok(())
}

#[test]
fn mahalanobis_golden() -> Result<(), String> {
    let mut model = Mahalanobis::<i32>::default();
    model.fit(&square(), None)?;

    let scores = model.score(&queries(), None)?;
    assert_scores(
        &scores,
        &[1.224_744_9, 0.866_025_4, 0.433_012_7, 1.785_357_1, 1.785_357_1],
    );
    Ok(())
}

#[test]
fn mahalanobis_one_dimensional_data() -> Result<(), String> {
    // The 1x1 covariance path: sample variance 4/3, its inverse 3/4.
    let mut model = Mahalanobis::<i32>::default();
    model.fit(&[vec![0.0], vec![0.0], vec![2.0], vec![2.0]], None)?;

    let scores = model.score(&[vec![1.0], vec![3.0]], None)?;
    assert_scores(&scores, &[0.0, 3.0_f64.sqrt()]);
    Ok(())
}

#[test]
fn mahalanobis_singular_covariance_is_an_error() {
    let mut model = Mahalanobis::<i32>::default();
    let degenerate = vec![vec![0.0, 0.0], vec![1.0, 2.0], vec![2.0, 4.0]];
    assert!(model.fit(&degenerate, None).is_err());
}

#[test]
fn mahalanobis_sc_matches_mahalanobis_without_labels() -> Result<(), String> {
    // With a single label, the pooled covariance is the label's own.
    let mut pooled = MahalanobisSC::<i32>::default();
    let mut plain = Mahalanobis::<i32>::default();
    pooled.fit(&square(), None)?;
    plain.fit(&square(), None)?;

    assert_scores(&pooled.score(&queries(), None)?, &plain.score(&queries(), None)?);
    Ok(())
}

#[test]
fn knn_golden_with_five_neighbors() -> Result<(), String> {
    let mut model = KNearestNeighbors::<i32>::new(5);
    model.fit(&grid(), None)?;

    let scores = model.score(&queries(), None)?;
    assert_scores(
        &scores,
        &[1.082_842_7, 0.882_842_7, 0.8, 1.612_899, 1.612_899],
    );
    Ok(())
}

#[test]
fn knn_caps_neighbors_at_cardinality() -> Result<(), String> {
    // Two training points, so k = 10 degrades to k = 2.
    let mut model = KNearestNeighbors::<i32>::default();
    model.fit(&[vec![0.0], vec![2.0]], None)?;

    let scores = model.score(&[vec![1.0]], None)?;
    assert_approx_eq!(f64, scores[0], 1.0, ulps = 2);
    Ok(())
}

#[test]
fn lof_golden_on_tie_free_line() -> Result<(), String> {
    let line = vec![
        vec![0.0, 0.0],
        vec![0.0, 1.0],
        vec![0.0, 2.0],
        vec![0.0, 3.0],
        vec![0.0, 4.0],
    ];
    let mut model = LocalOutlierFactor::<i32>::default();
    model.fit(&line, None)?;

    let scores = model.score(&[vec![0.0, 0.0], vec![2.0, 2.0]], None)?;
    assert_approx_eq!(f64, scores[0], 0.925_824_2, epsilon = 1e-7);
    assert_approx_eq!(f64, scores[1], 0.925_824_2, epsilon = 1e-7);
    Ok(())
}

#[test]
fn lof_rejects_labels_with_fewer_than_two_points() {
    let mut model = LocalOutlierFactor::<i32>::default();
    assert!(model.fit(&[], None).is_err());

    let mut model = LocalOutlierFactor::<i32>::default();
    assert!(model.fit(&[vec![0.0, 0.0]], None).is_err());

    // One well-populated label does not excuse a lone-point label.
    let mut model = LocalOutlierFactor::default();
    let x = vec![vec![0.0], vec![1.0], vec![2.0], vec![9.0]];
    let labels = vec![1, 1, 1, 2];
    assert!(model.fit(&x, Some(&labels)).is_err());
}

#[test]
fn lof_two_point_label_scores_finite() -> Result<(), String> {
    let mut model = LocalOutlierFactor::<i32>::default();
    model.fit(&[vec![0.0], vec![1.0]], None)?;

    let scores = model.score(&[vec![0.5], vec![5.0]], None)?;
    assert!(scores.iter().all(|score| score.is_finite()));
    assert!(scores[0] < scores[1]);
    Ok(())
}

#[test]
fn lof_ranks_interior_below_exterior() -> Result<(), String> {
    let mut model = LocalOutlierFactor::<i32>::default();
    model.fit(&grid(), None)?;

    let scores = model.score(
        &[vec![1.0, 2.0], vec![3.0, 3.0], vec![5.0, 5.0]],
        None,
    )?;
    assert!(scores[0] < scores[1]);
    assert!(scores[1] < scores[2]);
    Ok(())
}

#[test]
fn abof_golden() -> Result<(), String> {
    // The natural angle variances are negated, so the centroid-adjacent
    // query [2, 2] lands lowest.
    let mut model = AngleBasedOutlierFactor::<i32>::default();
    model.fit(&square(), None)?;

    let scores = model.score(&queries(), None)?;
    assert_scores(
        &scores,
        &[-0.000_555_6, -0.019_097_2, -0.010_222_2, -0.008_148_1, -0.008_148_1],
    );
    Ok(())
}

#[test]
fn abof_center_scores_lower_than_corners() -> Result<(), String> {
    let mut model = AngleBasedOutlierFactor::<i32>::default();
    model.fit(&square(), None)?;

    let scores = model.score(&[vec![1.0, 2.0], vec![3.0, 1.0], vec![6.0, 6.0]], None)?;
    assert!(scores[0] < scores[1]);
    assert!(scores[1] < scores[2]);
    Ok(())
}

#[test]
fn abof2_orders_like_abof() -> Result<(), String> {
    let mut model = AngleBasedOutlierFactor2::<i32>::default();
    model.fit(&square(), None)?;

    let scores = model.score(&[vec![1.0, 2.0], vec![6.0, 6.0]], None)?;
    assert!(scores[0] < scores[1]);
    assert!(scores[1] < 0.0);
    Ok(())
}

#[test]
fn fast_abof_matches_exact_when_neighbors_cover_data() -> Result<(), String> {
    // Four training points and k = 10, so the approximation is exact.
    let mut fast = FastAngleBasedOutlierFactor::<i32>::default();
    let mut exact = AngleBasedOutlierFactor::<i32>::default();
    fast.fit(&square(), None)?;
    exact.fit(&square(), None)?;

    assert_scores(&fast.score(&queries(), None)?, &exact.score(&queries(), None)?);
    Ok(())
}

#[test]
fn fast_abof2_matches_exact_when_neighbors_cover_data() -> Result<(), String> {
    let mut fast = FastAngleBasedOutlierFactor2::<i32>::default();
    let mut exact = AngleBasedOutlierFactor2::<i32>::default();
    fast.fit(&square(), None)?;
    exact.fit(&square(), None)?;

    assert_scores(&fast.score(&queries(), None)?, &exact.score(&queries(), None)?);
    Ok(())
}

#[test]
fn minmax_window_golden() -> Result<(), String> {
    let mut model = MinMaxWindow::<i32>::default();
    model.fit(&square(), None)?;

    let scores = model.score(
        &[
            vec![0.0, 0.0],
            vec![2.0, 2.0],
            vec![1.0, 3.0],
            vec![3.0, 1.0],
            vec![3.0, 3.0],
            vec![1.0, 5.0],
            vec![3.0, 5.0],
        ],
        None,
    )?;
    assert_scores(&scores, &[0.0, 0.0, 0.0, 0.5, 0.5, 0.5, 1.0]);
    Ok(())
}

#[test]
fn minmax_out_factor_golden() -> Result<(), String> {
    let mut model = MinMaxOutFactor::<i32>::default();
    model.fit(&square(), None)?;

    let scores = model.score(
        &[
            vec![0.0, 0.0],
            vec![2.0, 2.0],
            vec![1.0, 3.0],
            vec![3.0, 1.0],
            vec![3.0, 3.0],
            vec![1.0, 5.0],
            vec![3.0, 5.0],
        ],
        None,
    )?;
    assert_scores(&scores, &[0.0, 0.0, 0.0, 0.5, 0.5, 0.5, 1.0]);
    Ok(())
}

#[test]
fn minmax_out_score_golden() -> Result<(), String> {
    let mut model = MinMaxOutScore::<i32>::default();
    model.fit(&square(), None)?;

    let scores = model.score(
        &[
            vec![0.0, 0.0],
            vec![2.0, 2.0],
            vec![1.0, 3.0],
            vec![3.0, 1.0],
            vec![3.0, 3.0],
            vec![1.0, 5.0],
            vec![3.0, 5.0],
        ],
        None,
    )?;
    assert_scores(&scores, &[0.0, 0.0, 0.0, 1.0, 1.0, 0.5, 1.118_034]);
    Ok(())
}

#[test]
fn irwd_depth_range_and_ordering() -> Result<(), String> {
    let mut model = IntegratedRankWeightedDepth::<i32>::new(64);
    model.fit(&square(), None)?;

    let scores = model.score(&[vec![1.0, 2.0], vec![9.0, 9.0]], None)?;
    for &score in &scores {
        assert!((-0.5..=0.0).contains(&score));
    }
    // The centroid is deeper, so its negated depth is lower.
    assert!(scores[0] < scores[1]);
    Ok(())
}

#[test]
fn irwd_refit_is_deterministic() -> Result<(), String> {
    let mut first = IntegratedRankWeightedDepth::<i32>::new(64);
    let mut second = IntegratedRankWeightedDepth::<i32>::new(64);
    first.fit(&square(), None)?;
    second.fit(&square(), None)?;

    assert_eq!(first.score(&queries(), None)?, second.score(&queries(), None)?);
    Ok(())
}

#[test]
fn fit_rejects_mismatched_labels() {
    let mut model = Euclidean::default();
    let labels = vec![1, 2, 3];
    assert!(model.fit(&square(), Some(&labels)).is_err());
}

#[test]
fn score_rejects_unknown_label() -> Result<(), String> {
    let mut model = Euclidean::default();
    let labels = vec![1, 1, 1, 1];
    model.fit(&square(), Some(&labels))?;

    assert!(model.score(&queries(), Some(&2)).is_err());
    assert!(model.score(&queries(), None).is_err());
    Ok(())
}

#[test]
fn labeled_fit_keeps_labels_apart() -> Result<(), String> {
    let x = vec![vec![0.0], vec![2.0], vec![10.0], vec![12.0]];
    let labels = vec![1, 1, 2, 2];
    let mut model = Euclidean::default();
    model.fit(&x, Some(&labels))?;

    let near_first = model.score(&[vec![1.0]], Some(&1))?;
    let near_second = model.score(&[vec![1.0]], Some(&2))?;
    assert_approx_eq!(f64, near_first[0], 0.0, ulps = 2);
    assert_approx_eq!(f64, near_second[0], 10.0, ulps = 2);
    Ok(())
}

#[test]
fn refit_replaces_state() -> Result<(), String> {
    let mut model = Euclidean::<i32>::default();
    model.fit(&square(), None)?;
    model.fit(&[vec![10.0, 10.0], vec![12.0, 10.0]], None)?;

    let scores = model.score(&[vec![11.0, 10.0]], None)?;
    assert_approx_eq!(f64, scores[0], 0.0, ulps = 2);
    Ok(())
}

#[test]
fn train_and_test_are_aliases() -> Result<(), String> {
    let mut model = Euclidean::<i32>::default();
    model.train(&square(), None)?;

    let scores = model.test(&[vec![1.0, 2.0]], None)?;
    assert_approx_eq!(f64, scores[0], 0.0, ulps = 2);
    Ok(())
}

#[test_case("Euclidean"; "class name")]
#[test_case("euclidean"; "lowercase alias")]
fn factory_builds_euclidean(name: &str) -> Result<(), String> {
    let model = Model::<i32>::new(name)?;
    assert_eq!(model.name(), "Euclidean");
    Ok(())
}

#[test]
fn factory_rejects_unknown_name() {
    assert!(Model::<i32>::new("Chebyshev").is_err());
}

#[test]
fn default_models_are_uniquely_named() {
    let models = Model::<i32>::default_models();
    let mut names = models.iter().map(DistanceModel::name).collect::<Vec<_>>();
    assert_eq!(names.len(), 18);
    names.sort();
    names.dedup();
    assert_eq!(names.len(), 18);
}

#[test_case(2.0, "Minkowski"; "default order")]
#[test_case(3.0, "Minkowski(3)"; "cubic order")]
fn minkowski_name_includes_non_default_order(p: f64, expected: &str) {
    assert_eq!(Minkowski::<i32>::new(p).name(), expected);
}

#[test]
fn parametrized_names() {
    assert_eq!(KNearestNeighbors::<i32>::new(5).name(), "KNearestNeighbors(5)");
    assert_eq!(KNearestNeighbors::<i32>::default().name(), "KNearestNeighbors");
    assert_eq!(LocalOutlierFactor::<i32>::new(15).name(), "LocalOutlierFactor(15)");
    assert_eq!(
        IntegratedRankWeightedDepth::<i32>::new(1234).name(),
        "IntegratedRankWeightedDepth(1234)"
    );
}

#[test]
fn every_model_separates_shifted_clusters() -> Result<(), String> {
    // A blob with unequal per-axis spread, scored at its mean and far away.
    // Every model must rank the far query strictly higher. The spreads
    // differ so the centered mean is nonzero and the correlation is defined.
    let mut blob = Vec::new();
    for x in 0..4 {
        for y in 0..4 {
            blob.push(vec![f64::from(x) * 0.5 + 1.0, f64::from(y) + 1.0]);
        }
    }

    for mut model in Model::<i32>::default_models() {
        model.fit(&blob, None)?;
        let scores = model.score(&[vec![1.75, 2.5], vec![20.0, 17.0]], None)?;
        assert!(
            scores[0] < scores[1],
            "{} did not separate the clusters: {scores:?}",
            model.name(),
        );
    }
    Ok(())
}
