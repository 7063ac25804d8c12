//! Single adjacent-place swaps.
//!
//! A perturbation moves one athlete one place up or down in one event by
//! exchanging places with the neighbouring competitor. Boundary moves (first
//! place improving, last place worsening) and athletes without a placement
//! in the event produce no trial (`None`), which is not an error.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::Dataset;
use crate::scoring::{score_event, ScoringMethod};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// One place better (+1).
    Improve,
    /// One place worse (-1).
    Worsen,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Improve, Direction::Worsen];
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Improve => f.write_str("improve"),
            Self::Worsen => f.write_str("worsen"),
        }
    }
}

/// Index of the athlete `athlete` would swap with, if any.
pub fn swap_partner(
    dataset: &Dataset,
    athlete: &str,
    event: &str,
    direction: Direction,
) -> Option<usize> {
    if !dataset.has_event(event) {
        return None;
    }
    let idx = dataset.athlete_index(athlete)?;
    let field = dataset.competitors(event);
    let pos = field.iter().position(|&(i, _)| i == idx)?;
    let neighbour = match direction {
        Direction::Improve => pos.checked_sub(1)?,
        Direction::Worsen => pos + 1,
    };
    field.get(neighbour).map(|&(i, _)| i)
}

/// Copy of `dataset` with `athlete` and its neighbour's places in `event`
/// exchanged. Points are left as they were.
pub fn swap_places(
    dataset: &Dataset,
    athlete: &str,
    event: &str,
    direction: Direction,
) -> Option<Dataset> {
    let a = dataset.athlete_index(athlete)?;
    let b = swap_partner(dataset, athlete, event, direction)?;

    let mut copy = dataset.clone();
    let athletes = copy.athletes_mut();
    let place_a = athletes[a].results.get(event)?.place;
    let place_b = athletes[b].results.get(event)?.place;
    if let Some(r) = athletes[a].results.get_mut(event) {
        r.place = place_b;
    }
    if let Some(r) = athletes[b].results.get_mut(event) {
        r.place = place_a;
    }
    Some(copy)
}

/// Swap and re-score the touched event.
///
/// `dataset` is expected to be scored with `method` already. Only the
/// perturbed event's points are recomputed.
pub fn perturb(
    dataset: &Dataset,
    athlete: &str,
    event: &str,
    direction: Direction,
    method: &ScoringMethod,
) -> Option<Dataset> {
    let mut copy = swap_places(dataset, athlete, event, direction)?;
    score_event(&mut copy, event, method);
    Some(copy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Athlete, EventResult, PointScale};
    use crate::scoring::score;

    fn field() -> Dataset {
        let athletes = vec![
            Athlete::new("A")
                .with_result("E1", EventResult::new(1))
                .with_result("E2", EventResult::new(3)),
            Athlete::new("B")
                .with_result("E1", EventResult::new(2))
                .with_result("E2", EventResult::new(1)),
            Athlete::new("C")
                .with_result("E1", EventResult::new(3))
                .with_result("E2", EventResult::new(2)),
            Athlete::new("D").with_result("E2", EventResult::new(4)),
        ];
        Dataset::new(
            vec!["E1".into(), "E2".into()],
            athletes,
            PointScale::from_points(&[100.0, 90.0, 80.0, 70.0]),
        )
        .unwrap()
    }

    fn place(ds: &Dataset, athlete: &str, event: &str) -> Option<u32> {
        ds.athlete(athlete).and_then(|a| a.place_in(event))
    }

    #[test]
    fn boundaries_are_no_trial() {
        let ds = field();
        assert!(swap_places(&ds, "A", "E1", Direction::Improve).is_none());
        assert!(swap_places(&ds, "C", "E1", Direction::Worsen).is_none());
        assert!(swap_places(&ds, "D", "E2", Direction::Worsen).is_none());
    }

    #[test]
    fn not_competed_is_no_trial() {
        let ds = field();
        assert!(swap_places(&ds, "D", "E1", Direction::Improve).is_none());
        assert!(swap_places(&ds, "D", "E1", Direction::Worsen).is_none());
        assert!(swap_places(&ds, "Nobody", "E1", Direction::Worsen).is_none());
        assert!(swap_places(&ds, "A", "E9", Direction::Worsen).is_none());
    }

    #[test]
    fn swaps_exactly_two_places() {
        let ds = field();
        let swapped = swap_places(&ds, "C", "E2", Direction::Improve).unwrap();
        assert_eq!(place(&swapped, "C", "E2"), Some(1));
        assert_eq!(place(&swapped, "B", "E2"), Some(2));
        assert_eq!(place(&swapped, "A", "E2"), Some(3));
        assert_eq!(place(&swapped, "C", "E1"), Some(3));
        // Input untouched.
        assert_eq!(place(&ds, "C", "E2"), Some(2));
    }

    #[test]
    fn swap_exchanges_places_across_gaps() {
        let athletes = vec![
            Athlete::new("A").with_result("E1", EventResult::new(1)),
            Athlete::new("B").with_result("E1", EventResult::new(4)),
        ];
        let ds = Dataset::new(vec!["E1".into()], athletes, PointScale::default()).unwrap();
        let swapped = swap_places(&ds, "B", "E1", Direction::Improve).unwrap();
        assert_eq!(place(&swapped, "B", "E1"), Some(1));
        assert_eq!(place(&swapped, "A", "E1"), Some(4));
    }

    #[test]
    fn perturb_rescores_touched_event() {
        let method = ScoringMethod::Official;
        let scored = score(&field(), &method);
        let p = perturb(&scored, "B", "E1", Direction::Improve, &method).unwrap();
        assert_eq!(p.athlete("B").unwrap().points_in("E1"), 100.0);
        assert_eq!(p.athlete("A").unwrap().points_in("E1"), 90.0);
        assert_eq!(p.athlete("A").unwrap().points_in("E2"), 80.0);
        assert_eq!(scored.athlete("B").unwrap().points_in("E1"), 90.0);
    }

    #[test]
    fn partner_lookup() {
        let ds = field();
        assert_eq!(swap_partner(&ds, "B", "E1", Direction::Improve), Some(0));
        assert_eq!(swap_partner(&ds, "B", "E1", Direction::Worsen), Some(2));
        assert_eq!(swap_partner(&ds, "A", "E1", Direction::Improve), None);
    }

    #[test]
    fn direction_display() {
        assert_eq!(Direction::Improve.to_string(), "improve");
        assert_eq!(Direction::Worsen.to_string(), "worsen");
    }

    #[test]
    fn unknown_event_or_athlete_has_no_partner() {
        let ds = field();
        assert_eq!(swap_partner(&ds, "B", "E9", Direction::Improve), None);
        assert_eq!(swap_partner(&ds, "Z", "E1", Direction::Worsen), None);
        assert!(swap_places(&ds, "B", "E9", Direction::Worsen).is_none());
    }
}
