//! Leaderboard ordering and filtering.

use super::entry::ScoreEntry;

/// Ranked view of `entries`: positive scores only, highest first, ties by
/// user name. Full ties keep their input order.
pub fn rank(entries: &[ScoreEntry]) -> Vec<ScoreEntry> {
    let mut ranked: Vec<ScoreEntry> = entries.iter().filter(|e| e.value > 0).cloned().collect();
    // sort_by is stable
    ranked.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.user_name.cmp(&b.user_name)));
    ranked
}

/// Best 1-based placement of `user_name` in an already ranked view.
pub fn position_of(ranked: &[ScoreEntry], user_name: &str) -> Option<usize> {
    ranked.iter().position(|e| e.user_name == user_name).map(|i| i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, name: &str, value: i64) -> ScoreEntry {
        ScoreEntry::new(id, name, value)
    }

    fn names(ranked: &[ScoreEntry]) -> Vec<(&str, i64)> {
        ranked.iter().map(|e| (e.user_name.as_str(), e.value)).collect()
    }

    #[test]
    fn drops_zero_and_orders_name_ties() {
        let entries = vec![entry("1", "bob", 5), entry("2", "amy", 5), entry("3", "zoe", 0)];
        assert_eq!(names(&rank(&entries)), [("amy", 5), ("bob", 5)]);
    }

    #[test]
    fn excludes_every_non_positive_value() {
        let entries = vec![entry("1", "a", -3), entry("2", "b", 0), entry("3", "c", 1)];
        let ranked = rank(&entries);
        assert!(ranked.iter().all(|e| e.value > 0));
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn descending_by_value() {
        let entries = vec![entry("1", "a", 2), entry("2", "b", 40), entry("3", "c", 7)];
        assert_eq!(names(&rank(&entries)), [("b", 40), ("c", 7), ("a", 2)]);
    }

    #[test]
    fn name_comparison_is_case_sensitive() {
        let entries = vec![entry("1", "amy", 3), entry("2", "Zed", 3)];
        // uppercase sorts before lowercase
        assert_eq!(names(&rank(&entries)), [("Zed", 3), ("amy", 3)]);
    }

    #[test]
    fn full_ties_keep_input_order() {
        let entries = vec![entry("x", "sam", 4), entry("y", "sam", 4), entry("z", "sam", 4)];
        let ids: Vec<_> = rank(&entries).into_iter().map(|e| e.id).collect();
        assert_eq!(ids, ["x", "y", "z"]);
    }

    #[test]
    fn leaves_input_untouched() {
        let entries = vec![entry("1", "bob", 1), entry("2", "amy", 9)];
        let before = entries.clone();
        let _ = rank(&entries);
        assert_eq!(entries, before);
    }

    #[test]
    fn same_user_may_appear_more_than_once() {
        let entries = vec![entry("1", "bob", 3), entry("2", "bob", 8)];
        assert_eq!(names(&rank(&entries)), [("bob", 8), ("bob", 3)]);
    }

    #[test]
    fn position_reports_best_placement() {
        let ranked = rank(&[entry("1", "bob", 3), entry("2", "amy", 9), entry("3", "bob", 5)]);
        assert_eq!(position_of(&ranked, "amy"), Some(1));
        assert_eq!(position_of(&ranked, "bob"), Some(2));
        assert_eq!(position_of(&ranked, "zoe"), None);
    }
}
