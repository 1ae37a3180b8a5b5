use super::types::{RankedEntry, ReviewerActivity};

/// Orders reviewers by review count and assigns dense ranks.
///
/// Reviewers with equal counts share a rank, and the rank only advances by one
/// when the count changes. Ties keep their input order.
pub fn rank(mut activities: Vec<ReviewerActivity>) -> Vec<RankedEntry> {
    activities.sort_by(|a, b| b.review_count.cmp(&a.review_count));

    let mut ranked = Vec::with_capacity(activities.len());
    let mut current_rank = 0;
    let mut last_count = None;

    for activity in activities {
        if last_count != Some(activity.review_count) {
            current_rank += 1;
            last_count = Some(activity.review_count);
        }

        ranked.push(RankedEntry {
            identity: activity.identity,
            review_count: activity.review_count,
            rank: current_rank,
        });
    }

    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranks_of(entries: &[RankedEntry]) -> Vec<(&str, u32)> {
        entries
            .iter()
            .map(|e| (e.identity.as_str(), e.rank))
            .collect()
    }

    #[test]
    fn test_tie_at_top_shares_first_place() {
        let ranked = rank(vec![
            ReviewerActivity::new("A", 5),
            ReviewerActivity::new("B", 5),
            ReviewerActivity::new("C", 3),
        ]);

        assert_eq!(ranks_of(&ranked), vec![("A", 1), ("B", 1), ("C", 2)]);
    }

    #[test]
    fn test_rank_advances_once_per_distinct_count() {
        let ranked = rank(vec![
            ReviewerActivity::new("A", 5),
            ReviewerActivity::new("B", 3),
            ReviewerActivity::new("C", 3),
            ReviewerActivity::new("D", 1),
        ]);

        assert_eq!(
            ranks_of(&ranked),
            vec![("A", 1), ("B", 2), ("C", 2), ("D", 3)]
        );
    }

    #[test]
    fn test_unsorted_input_is_ordered_by_count() {
        let ranked = rank(vec![
            ReviewerActivity::new("low", 1),
            ReviewerActivity::new("high", 9),
            ReviewerActivity::new("mid", 4),
            ReviewerActivity::new("mid-too", 4),
        ]);

        assert_eq!(
            ranks_of(&ranked),
            vec![("high", 1), ("mid", 2), ("mid-too", 2), ("low", 3)]
        );
        assert!(ranked.windows(2).all(|w| w[0].review_count >= w[1].review_count));
    }

    #[test]
    fn test_empty_input() {
        assert!(rank(Vec::new()).is_empty());
    }

    #[test]
    fn test_rank_is_repeatable() {
        let input = vec![
            ReviewerActivity::new("A", 2),
            ReviewerActivity::new("B", 7),
            ReviewerActivity::new("C", 2),
        ];

        assert_eq!(rank(input.clone()), rank(input));
    }
}
