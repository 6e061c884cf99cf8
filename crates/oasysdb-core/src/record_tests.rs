//! Tests for `record` module

use super::record::*;
use crate::error::Error;
use crate::metadata::Metadata;
use proptest::prelude::*;

#[test]
fn test_record_creation() {
    let record = Record::new(vec![0.1, 0.2, 0.3], Some(Metadata::from("doc")));

    assert_eq!(record.dimension(), 3);
    assert_eq!(record.data, Some(Metadata::Text("doc".into())));
}

#[test]
fn test_record_without_data() {
    let record = Record::without_data(vec![1.0]);
    assert!(record.data.is_none());
}

#[test]
fn test_validate_rejects_empty_vector() {
    let err = Record::without_data(vec![]).validate().unwrap_err();
    assert!(matches!(err, Error::InvalidVector(_)));
}

#[test]
fn test_validate_rejects_non_finite() {
    let err = Record::without_data(vec![1.0, f32::NAN]).validate().unwrap_err();
    assert!(err.to_string().contains("component 1"));

    assert!(Record::without_data(vec![f32::INFINITY])
        .validate()
        .is_err());
}

#[test]
fn test_random_record_has_float_metadata() {
    let record = Record::random(16);

    assert_eq!(record.dimension(), 16);
    assert!(matches!(record.data, Some(Metadata::Float(_))));
}

#[test]
fn test_many_random_exact_shape() {
    let records = Record::many_random(128, 100);

    assert_eq!(records.len(), 100);
    assert!(records.iter().all(|r| r.dimension() == 128));
}

#[test]
fn test_many_random_zero_len() {
    assert!(Record::many_random(8, 0).is_empty());
}

#[test]
fn test_many_random_zero_dimension_fails_validation() {
    let records = Record::many_random(0, 3);

    assert_eq!(records.len(), 3);
    assert!(records
        .iter()
        .all(|r| matches!(r.validate(), Err(Error::InvalidVector(_)))));
}

#[test]
fn test_many_random_seeded_is_reproducible() {
    let a = Record::many_random_seeded(4, 10, 42);
    let b = Record::many_random_seeded(4, 10, 42);
    let c = Record::many_random_seeded(4, 10, 43);

    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_record_id_display_and_order() {
    assert_eq!(RecordId(7).to_string(), "7");
    assert!(RecordId(1) < RecordId(2));
    assert_eq!(RecordId::from(3), RecordId(3));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn prop_many_random_shape_and_range(dimension in 1usize..64, len in 0usize..50) {
        let records = Record::many_random(dimension, len);

        prop_assert_eq!(records.len(), len);
        for record in &records {
            prop_assert_eq!(record.dimension(), dimension);
            prop_assert!(record.vector.iter().all(|v| (0.0..1.0).contains(v)));
            prop_assert!(record.validate().is_ok());
        }
    }
}
