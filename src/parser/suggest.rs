use crate::constant::{SUGGESTION_DISTANCE, SUGGESTION_LIMIT};

/// Rank `candidates` by edit distance to `probe`, keeping only near misses.
///
/// The probe is stripped of leading dashes so `--vrebose` measures against
/// bare flag names. Candidates beyond the distance cutoff are dropped; the
/// survivors are sorted ascending (distance, then name) and truncated.
pub(crate) fn suggestions<'a>(
    probe: &str,
    candidates: impl Iterator<Item = &'a str>,
) -> Vec<String> {
    let probe = probe.trim_start_matches('-');
    let mut scored: Vec<(usize, String)> = candidates
        .filter_map(|candidate| {
            let distance = edit_distance(probe, candidate);
            (distance <= SUGGESTION_DISTANCE).then(|| (distance, candidate.to_string()))
        })
        .collect();

    scored.sort();
    scored.dedup();
    scored.truncate(SUGGESTION_LIMIT);
    scored.into_iter().map(|(_, candidate)| candidate).collect()
}

// Classic dynamic-programming edit distance with unit costs.
pub(crate) fn edit_distance(left: &str, right: &str) -> usize {
    let left: Vec<char> = left.chars().collect();
    let right: Vec<char> = right.chars().collect();

    if left.is_empty() {
        return right.len();
    }

    if right.is_empty() {
        return left.len();
    }

    let mut previous: Vec<usize> = (0..=right.len()).collect();
    let mut current = vec![0; right.len() + 1];

    for (i, left_char) in left.iter().enumerate() {
        current[0] = i + 1;

        for (j, right_char) in right.iter().enumerate() {
            let substitution = previous[j] + usize::from(left_char != right_char);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }

        std::mem::swap(&mut previous, &mut current);
    }

    previous[right.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "", 0)]
    #[case("", "abc", 3)]
    #[case("abc", "", 3)]
    #[case("abc", "abc", 0)]
    #[case("abc", "abd", 1)]
    #[case("abc", "acb", 2)]
    #[case("kitten", "sitting", 3)]
    #[case("flaw", "lawn", 2)]
    fn distance(#[case] left: &str, #[case] right: &str, #[case] expected: usize) {
        assert_eq!(edit_distance(left, right), expected);
        assert_eq!(edit_distance(right, left), expected);
    }

    #[test]
    fn near_misses_only() {
        // Setup
        let candidates = ["verbose", "version", "quiet", "output"];

        // Execute
        let result = suggestions("vrebose", candidates.into_iter());

        // Verify - 'quiet' and 'output' are too far away
        assert_eq!(result, vec!["verbose", "version"]);
    }

    #[test]
    fn probe_dashes_stripped() {
        let result = suggestions("--verbos", ["verbose"].into_iter());
        assert_eq!(result, vec!["verbose"]);
    }

    #[test]
    fn truncated_to_three() {
        // Setup - all four candidates sit within the cutoff
        let candidates = ["aaa", "aab", "aba", "baa"];

        // Execute
        let result = suggestions("aaa", candidates.into_iter());

        // Verify - exact match sorts first, then ties break by name
        assert_eq!(result.len(), 3);
        assert_eq!(result[0], "aaa");
    }

    #[test]
    fn empty_when_nothing_close() {
        let result = suggestions("xyz", ["completely-different"].into_iter());
        assert!(result.is_empty());
    }
}
