//! Worked examples for scoring, ranking and perturbation on small fields.

use ranklab_core::{
    perturb, rank, score, swap_places, Athlete, Dataset, Direction, EventResult, PointScale,
    ScoringMethod,
};

fn names(ds: &Dataset) -> Vec<(String, f64)> {
    rank(ds)
        .entries()
        .iter()
        .map(|e| (e.name.clone(), e.total))
        .collect()
}

fn three_way() -> Dataset {
    let athletes = vec![
        Athlete::new("A").with_result("E1", EventResult::new(1)),
        Athlete::new("B").with_result("E1", EventResult::new(2)),
        Athlete::new("C").with_result("E1", EventResult::new(3)),
    ];
    Dataset::new(
        vec!["E1".into()],
        athletes,
        PointScale::from_points(&[100.0, 90.0, 80.0]),
    )
    .unwrap()
}

#[test]
fn official_three_way_swap_moves_the_mover() {
    let method = ScoringMethod::Official;
    let scored = score(&three_way(), &method);
    assert_eq!(
        names(&scored),
        vec![("A".into(), 100.0), ("B".into(), 90.0), ("C".into(), 80.0)]
    );

    let p = perturb(&scored, "B", "E1", Direction::Improve, &method).unwrap();
    assert_eq!(
        names(&p),
        vec![("B".into(), 100.0), ("A".into(), 90.0), ("C".into(), 80.0)]
    );
    assert_eq!(rank(&p).rank_of("B"), Some(1));
}

#[test]
fn boundary_perturbations_are_absent() {
    let ds = three_way();
    assert!(swap_places(&ds, "A", "E1", Direction::Improve).is_none());
    assert!(swap_places(&ds, "C", "E1", Direction::Worsen).is_none());
    assert!(swap_places(&ds, "A", "E1", Direction::Worsen).is_some());
}

#[test]
fn continuous_points_follow_performance_not_place() {
    let athletes = vec![
        Athlete::new("A").with_result("E1", EventResult::with_raw(1, "2:00")),
        Athlete::new("B").with_result("E1", EventResult::with_raw(2, "3:00")),
        Athlete::new("C").with_result("E1", EventResult::with_raw(3, "4:00")),
    ];
    let ds = Dataset::new(vec!["E1".into()], athletes, PointScale::default()).unwrap();
    let method = ScoringMethod::Continuous;
    let scored = score(&ds, &method);
    let p = perturb(&scored, "B", "E1", Direction::Improve, &method).unwrap();

    assert_eq!(p.athlete("B").unwrap().place_in("E1"), Some(1));
    assert_eq!(p.athlete("B").unwrap().points_in("E1"), 50.0);
    assert_eq!(names(&p), names(&scored));
}
