// Fuzzy matching utilities for "did you mean" suggestions

/// Calculate Levenshtein distance between two strings
/// Returns the minimum number of single-character edits (insertions, deletions, substitutions)
/// needed to transform one string into another
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();
    let s1_len = s1_chars.len();
    let s2_len = s2_chars.len();

    if s1_len == 0 {
        return s2_len;
    }
    if s2_len == 0 {
        return s1_len;
    }

    // Two rolling rows instead of the full matrix
    let mut prev: Vec<usize> = (0..=s2_len).collect();
    let mut curr = vec![0; s2_len + 1];

    for i in 1..=s1_len {
        curr[0] = i;
        for j in 1..=s2_len {
            let cost = if s1_chars[i - 1] == s2_chars[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1)                 // deletion
                .min(curr[j - 1] + 1)               // insertion
                .min(prev[j - 1] + cost);           // substitution
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[s2_len]
}

/// Find near matches among `candidates`, closest first (up to 5)
///
/// A candidate that starts with the search text also counts as near,
/// so "neg" suggests "negotiation".
pub fn find_near_matches(search: &str, candidates: &[&str], max_distance: usize) -> Vec<(String, usize)> {
    let search_lower = search.to_lowercase();
    let mut matches: Vec<(String, usize)> = Vec::new();

    for candidate in candidates {
        let candidate_lower = candidate.to_lowercase();
        let distance = levenshtein_distance(&search_lower, &candidate_lower);

        if distance <= max_distance {
            matches.push((candidate.to_string(), distance));
        } else if !search_lower.is_empty() && candidate_lower.starts_with(&search_lower) {
            matches.push((candidate.to_string(), max_distance));
        }
    }

    matches.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    matches.into_iter().take(5).collect()
}

/// Best single suggestion for `search`, if any is close enough
pub fn closest_match(search: &str, candidates: &[&str], max_distance: usize) -> Option<String> {
    find_near_matches(search, candidates, max_distance)
        .into_iter()
        .next()
        .map(|(name, _)| name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("abc", ""), 3);
        assert_eq!(levenshtein_distance("", ""), 0);
        assert_eq!(levenshtein_distance("same", "same"), 0);
        assert_eq!(levenshtein_distance("abc", "def"), 3);
    }

    #[test]
    fn test_find_near_matches() {
        let stages = ["new", "contacted", "qualified", "proposal", "negotiation", "won", "lost"];

        let matches = find_near_matches("Qualifed", &stages, 3);
        assert_eq!(matches[0].0, "qualified");
        assert_eq!(matches[0].1, 1);

        // Prefix match beyond the edit distance
        let matches = find_near_matches("nego", &stages, 2);
        assert!(matches.iter().any(|(name, _)| name == "negotiation"));

        let matches = find_near_matches("pipeline", &stages, 2);
        assert!(matches.is_empty());
    }

    #[test]
    fn test_closest_match() {
        let stages = ["new", "contacted", "qualified", "proposal", "negotiation", "won", "lost"];
        assert_eq!(closest_match("propsal", &stages, 3), Some("proposal".to_string()));
        assert_eq!(closest_match("archived", &stages, 2), None);
    }
}
