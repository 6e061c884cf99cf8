//! Tests for `distance` module

use super::distance::*;
use crate::record::RecordId;

#[test]
fn test_cosine_similarity() {
    let a = vec![1.0, 0.0, 0.0];
    let b = vec![1.0, 0.0, 0.0];
    let similarity = DistanceMetric::Cosine.calculate(&a, &b);
    assert!((similarity - 1.0).abs() < 1e-6);

    let c = vec![0.0, 1.0, 0.0];
    let similarity = DistanceMetric::Cosine.calculate(&a, &c);
    assert!(similarity.abs() < 1e-6);
}

#[test]
fn test_cosine_zero_vector_scores_zero() {
    let a = vec![0.0, 0.0];
    let b = vec![1.0, 1.0];
    assert_eq!(DistanceMetric::Cosine.calculate(&a, &b), 0.0);
}

#[test]
fn test_euclidean_distance() {
    let a = vec![0.0, 0.0, 0.0];
    let b = vec![3.0, 4.0, 0.0];
    let distance = DistanceMetric::Euclidean.calculate(&a, &b);
    assert!((distance - 5.0).abs() < 1e-6);
}

#[test]
fn test_dot_product() {
    let a = vec![1.0, 2.0, 3.0];
    let b = vec![4.0, 5.0, 6.0];
    let product = DistanceMetric::DotProduct.calculate(&a, &b);
    assert!((product - 32.0).abs() < 1e-6);
}

#[test]
fn test_default_metric_is_euclidean() {
    assert_eq!(DistanceMetric::default(), DistanceMetric::Euclidean);
}

#[test]
fn test_higher_is_better() {
    assert!(DistanceMetric::Cosine.higher_is_better());
    assert!(DistanceMetric::DotProduct.higher_is_better());
    assert!(!DistanceMetric::Euclidean.higher_is_better());
}

#[test]
fn test_passes_relevancy() {
    // Distance: keep scores at or below the threshold
    assert!(DistanceMetric::Euclidean.passes_relevancy(0.5, 1.0));
    assert!(DistanceMetric::Euclidean.passes_relevancy(1.0, 1.0));
    assert!(!DistanceMetric::Euclidean.passes_relevancy(1.5, 1.0));

    // Similarity: keep scores at or above the threshold
    assert!(DistanceMetric::Cosine.passes_relevancy(0.9, 0.8));
    assert!(!DistanceMetric::Cosine.passes_relevancy(0.7, 0.8));
}

#[test]
fn test_sort_results_distance_ascending() {
    let mut results = vec![(RecordId(1), 0.9), (RecordId(2), 0.1), (RecordId(3), 0.5)];
    DistanceMetric::Euclidean.sort_results(&mut results);

    let ids: Vec<u32> = results.iter().map(|(id, _)| id.0).collect();
    assert_eq!(ids, vec![2, 3, 1]);
}

#[test]
fn test_sort_results_similarity_descending() {
    let mut results = vec![(RecordId(1), 0.9), (RecordId(2), 0.7), (RecordId(3), 0.8)];
    DistanceMetric::Cosine.sort_results(&mut results);

    let ids: Vec<u32> = results.iter().map(|(id, _)| id.0).collect();
    assert_eq!(ids, vec![1, 3, 2]);
}

#[test]
fn test_sort_results_ties_by_id() {
    let mut results = vec![(RecordId(9), 1.0), (RecordId(4), 1.0), (RecordId(6), 1.0)];
    DistanceMetric::DotProduct.sort_results(&mut results);

    let ids: Vec<u32> = results.iter().map(|(id, _)| id.0).collect();
    assert_eq!(ids, vec![4, 6, 9]);
}

#[test]
fn test_sort_results_nan_orders_last() {
    for metric in [
        DistanceMetric::Euclidean,
        DistanceMetric::Cosine,
        DistanceMetric::DotProduct,
    ] {
        let mut results = vec![
            (RecordId(1), f32::NAN),
            (RecordId(2), 0.5),
            (RecordId(3), f32::NAN),
            (RecordId(4), 0.2),
        ];
        metric.sort_results(&mut results);

        let ids: Vec<u32> = results.iter().map(|(id, _)| id.0).collect();
        assert_eq!(&ids[2..], &[1, 3], "{metric:?}");
    }
}

#[test]
fn test_dot_product_overflow_is_nan() {
    let a = [f32::MAX, f32::MAX];
    let b = [f32::MAX, -f32::MAX];

    assert!(DistanceMetric::DotProduct.calculate(&a, &b).is_nan());
}

#[test]
fn test_metric_serialization() {
    let json = serde_json::to_string(&DistanceMetric::DotProduct).unwrap();
    assert_eq!(json, "\"dot_product\"");

    let deserialized: DistanceMetric = serde_json::from_str("\"cosine\"").unwrap();
    assert_eq!(deserialized, DistanceMetric::Cosine);
}
