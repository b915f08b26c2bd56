//! Tests for matching anonymous fast entries against the mixed population

mod utils;

use swap_engine::{
    AnonymousEntry, CountyId, ExclusionReason, MatchingConfig, ParticipantKey, ParticipantKind,
    matches_for_entry,
};
use utils::*;

#[test]
fn test_fast_entry_pairs_with_both_variants() {
    let world = World::new();
    let matcher = world.matcher(MatchingConfig::default());
    let run = matcher
        .prepare(&[
            entry(1, PRIMARY, NAIROBI, Some(MOMBASA), &[KISUMU], &[]),
            entry(2, PRIMARY, MOMBASA, None, &[NAIROBI], &[]),
            simple_teacher(1, PRIMARY, KISUMU, NAIROBI, &[]),
            simple_teacher(2, PRIMARY, MOMBASA, NAKURU, &[]),
        ])
        .unwrap();

    let matches = matches_for_entry(&run, 1).unwrap();
    assert_eq!(matches.entry, ParticipantKey::anonymous(1));
    assert!(matches.excluded.is_none());
    assert_eq!(matches.anonymous.len(), 1);
    assert_eq!(matches.anonymous[0].second.key, ParticipantKey::anonymous(2));
    assert_eq!(matches.registered.len(), 1);
    assert_eq!(matches.registered[0].second.key, ParticipantKey::registered(1));
    assert_eq!(matches.registered[0].first.target_county, KISUMU);
}

#[test]
fn test_numeric_ids_do_not_collide_across_variants() {
    let world = World::new();
    let result = world
        .matcher(MatchingConfig::default())
        .run(&[
            entry(7, PRIMARY, NAIROBI, Some(MOMBASA), &[], &[]),
            simple_teacher(7, PRIMARY, MOMBASA, NAIROBI, &[]),
        ])
        .unwrap();
    assert_eq!(result.pairs.len(), 1);
    let (first, second) = result.pairs[0].keys();
    assert_eq!(first.kind, ParticipantKind::Registered);
    assert_eq!(second.kind, ParticipantKind::Anonymous);
    assert_eq!(first.id, second.id);
}

#[test]
fn test_fast_entry_exact_subjects() {
    let world = World::new();
    let run = world
        .matcher(MatchingConfig::default())
        .prepare(&[
            entry(1, SECONDARY, NAIROBI, Some(MOMBASA), &[], &[MATH, CHEM]),
            simple_teacher(1, SECONDARY, MOMBASA, NAIROBI, &[MATH, CHEM]),
            simple_teacher(2, SECONDARY, MOMBASA, NAIROBI, &[MATH]),
            entry(2, SECONDARY, MOMBASA, Some(NAIROBI), &[], &[CHEM, MATH, ENGLISH]),
        ])
        .unwrap();

    let matches = matches_for_entry(&run, 1).unwrap();
    assert!(matches.anonymous.is_empty());
    assert_eq!(matches.registered.len(), 1);
    assert_eq!(matches.registered[0].second.key, ParticipantKey::registered(1));
}

#[test]
fn test_mixed_triangle_through_fast_entry() {
    let world = World::new();
    let run = world
        .matcher(MatchingConfig::default())
        .prepare(&[
            simple_teacher(1, PRIMARY, NAKURU, MOMBASA, &[]),
            entry(1, PRIMARY, KISUMU, Some(NAKURU), &[], &[]),
            entry(2, PRIMARY, MOMBASA, None, &[KISUMU], &[]),
        ])
        .unwrap();

    let matches = matches_for_entry(&run, 1).unwrap();
    assert!(matches.anonymous.is_empty() && matches.registered.is_empty());
    assert_eq!(matches.triangles.len(), 1);
    assert!(matches.triangles[0].involves(ParticipantKey::registered(1)));
    assert!(!matches.triangles[0].involves(ParticipantKey::anonymous(3)));
    assert_eq!(
        matches.triangles[0].keys(),
        [
            ParticipantKey::anonymous(1),
            ParticipantKey::registered(1),
            ParticipantKey::anonymous(2)
        ]
    );
}

#[test]
fn test_unmatchable_fast_entry_reports_reason() {
    let world = World::new();
    let stranded = AnonymousEntry {
        id: 9,
        current_county: None,
        current_constituency: None,
        current_ward: None,
        most_preferred: Some(NAIROBI),
        acceptable: Default::default(),
        level: PRIMARY,
        subjects: Default::default(),
    };
    let run = world
        .matcher(MatchingConfig::default())
        .prepare(&[stranded.into(), simple_teacher(1, PRIMARY, MOMBASA, NAIROBI, &[])])
        .unwrap();

    let matches = matches_for_entry(&run, 9).unwrap();
    assert!(matches.is_empty());
    assert_eq!(matches.excluded, Some(ExclusionReason::UnresolvedCounty));
    assert!(matches_for_entry(&run, 10).is_err());
}

#[test]
fn test_fast_entry_in_unknown_county_is_not_indexed() {
    let world = World::new();
    let result = world
        .matcher(MatchingConfig::default())
        .run(&[
            entry(1, PRIMARY, CountyId(999), Some(MOMBASA), &[], &[]),
            simple_teacher(1, PRIMARY, MOMBASA, CountyId(999), &[]),
        ])
        .unwrap();

    assert!(result.pairs.is_empty());
    assert_eq!(result.statistics.indexed, 1);
    assert_eq!(
        result.exclusion_of(ParticipantKey::anonymous(1)),
        Some(ExclusionReason::UnresolvedCounty)
    );
}

#[test]
fn test_secondary_fast_entry_without_subjects_is_excluded() {
    let world = World::new();
    let run = world
        .matcher(MatchingConfig::default())
        .prepare(&[
            entry(1, SECONDARY, NAIROBI, Some(MOMBASA), &[], &[]),
            simple_teacher(1, SECONDARY, MOMBASA, NAIROBI, &[MATH]),
        ])
        .unwrap();

    let matches = matches_for_entry(&run, 1).unwrap();
    assert!(matches.is_empty());
    assert_eq!(matches.excluded, Some(ExclusionReason::MissingSubjects));
}
