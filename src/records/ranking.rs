//! Ranked grade listing
//!
//! Orders per-student aggregates and assigns positional ranks. The average
//! being ranked is the mean of each score sheet's stored (already floored)
//! average, not a mean recomputed from raw subject scores.

use crate::records::models::{GradeAggregate, RankedStudent};
use std::cmp::Ordering;

/// Sort aggregates and assign ranks
///
/// Order is average descending, then student number ascending. Students
/// without any score sheet come after every student that has one. Ranks are
/// positions: equal averages never share a rank.
pub fn rank_students(mut aggregates: Vec<GradeAggregate>) -> Vec<RankedStudent> {
    aggregates.sort_by(compare_for_ranking);

    let total_count = aggregates.len();
    aggregates
        .into_iter()
        .enumerate()
        .map(|(index, aggregate)| RankedStudent {
            student_number: aggregate.student_number,
            name: aggregate.name,
            contact: aggregate.contact,
            email: aggregate.email,
            address: aggregate.address,
            total_score: aggregate.total_score.unwrap_or(0),
            average_score: aggregate.average_score.unwrap_or(0.0),
            rank: index + 1,
            total_count,
        })
        .collect()
}

fn compare_for_ranking(a: &GradeAggregate, b: &GradeAggregate) -> Ordering {
    let by_average = match (a.average_score, b.average_score) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_average.then_with(|| a.student_number.cmp(&b.student_number))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aggregate(student_number: &str, average: Option<f64>, total: Option<i64>) -> GradeAggregate {
        GradeAggregate {
            student_number: student_number.to_string(),
            name: format!("Student {}", student_number),
            contact: None,
            email: None,
            address: None,
            average_score: average,
            total_score: total,
        }
    }

    #[test]
    fn test_ties_broken_by_student_number() {
        let ranked = rank_students(vec![
            aggregate("B", Some(90.0), Some(270)),
            aggregate("A", Some(90.0), Some(270)),
            aggregate("C", Some(70.0), Some(210)),
        ]);

        let order: Vec<(&str, usize, f64)> = ranked
            .iter()
            .map(|r| (r.student_number.as_str(), r.rank, r.average_score))
            .collect();
        assert_eq!(order, vec![("A", 1, 90.0), ("B", 2, 90.0), ("C", 3, 70.0)]);
        assert!(ranked.iter().all(|r| r.total_count == 3));
    }

    #[test]
    fn test_student_without_scores_defaults_to_zero_and_sorts_last() {
        let ranked = rank_students(vec![
            aggregate("001", None, None),
            aggregate("002", Some(0.0), Some(0)),
            aggregate("003", Some(55.5), Some(333)),
        ]);

        assert_eq!(ranked[0].student_number, "003");
        assert_eq!(ranked[1].student_number, "002");
        assert_eq!(ranked[2].student_number, "001");
        assert_eq!(ranked[2].total_score, 0);
        assert_eq!(ranked[2].average_score, 0.0);
        assert_eq!(ranked[2].rank, 3);
    }

    #[test]
    fn test_student_numbers_compare_lexicographically() {
        let ranked = rank_students(vec![
            aggregate("10", Some(80.0), Some(240)),
            aggregate("9", Some(80.0), Some(240)),
        ]);
        assert_eq!(ranked[0].student_number, "10");
        assert_eq!(ranked[1].student_number, "9");
    }

    #[test]
    fn test_empty_listing() {
        assert!(rank_students(Vec::new()).is_empty());
    }
}
