// ABOUTME: Subsequence fuzzy matching for narrowing the host registry by a search term
// ABOUTME: Ranks hostnames by match quality with deterministic tie ordering

pub struct SearchEngine {
    names: Vec<String>,
}

impl SearchEngine {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Ranks names against `term`, best match first. An empty term applies
    /// no filtering and returns every name in its original order. The sort
    /// is stable, so ties keep their original relative order and output is
    /// deterministic for fixed input.
    pub fn search(&self, term: &str, case_sensitive: bool) -> Vec<&str> {
        if term.is_empty() {
            return self.names.iter().map(String::as_str).collect();
        }

        let term = normalize(term, case_sensitive);

        let mut scored: Vec<(&str, usize)> = self
            .names
            .iter()
            .filter_map(|name| {
                let score = match_score(&normalize(name, case_sensitive), &term);
                (score > 0).then_some((name.as_str(), score))
            })
            .collect();

        scored.sort_by(|a, b| b.1.cmp(&a.1));

        scored.into_iter().map(|(name, _)| name).collect()
    }
}

fn normalize(text: &str, case_sensitive: bool) -> String {
    if case_sensitive {
        text.to_string()
    } else {
        text.to_lowercase()
    }
}

/// Match quality of `term` against `name`, both already normalized.
/// Tiers: exact match, prefix, substring, then in-order subsequence with a
/// bonus for consecutive runs. Zero means no match.
fn match_score(name: &str, term: &str) -> usize {
    if name == term {
        return 1000;
    }

    if name.starts_with(term) {
        let mut score = 900 + 50usize.saturating_sub(name.len());
        // A word boundary right after the term reads as a closer match
        // than the middle of a longer label.
        if let Some(next) = name.chars().nth(term.chars().count()) {
            if !next.is_alphanumeric() {
                score += 50;
            }
        }
        return score;
    }

    if let Some(position) = name.find(term) {
        return 700 - position.min(100);
    }

    subsequence_score(name, term)
}

fn subsequence_score(name: &str, term: &str) -> usize {
    let mut score = 0;
    let mut term_chars = term.chars();
    let mut wanted = term_chars.next();
    let mut run = 0;
    let mut first_match = None;

    for (index, ch) in name.chars().enumerate() {
        match wanted {
            Some(w) if ch == w => {
                first_match.get_or_insert(index);
                score += 100 + run * 10;
                run += 1;
                wanted = term_chars.next();
            }
            Some(_) => run = 0,
            None => break,
        }
    }

    // Every term character must be consumed, in order.
    if wanted.is_some() {
        return 0;
    }
    if first_match == Some(0) {
        score += 50;
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(names: &[&str]) -> SearchEngine {
        SearchEngine::new(names.iter().map(|n| n.to_string()).collect())
    }

    #[test]
    fn test_empty_term_returns_all_in_order() {
        let engine = engine(&["server1", "server2", "server3"]);

        let results = engine.search("", false);

        assert_eq!(results, ["server1", "server2", "server3"]);
    }

    #[test]
    fn test_exact_match_ranks_first() {
        let engine = engine(&["prod-backup", "production", "prod"]);

        let results = engine.search("prod", false);

        assert_eq!(results[0], "prod");
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_shorter_prefix_match_ranks_higher() {
        let engine = engine(&["gitlab.company.com", "git.internal", "bitbucket.org"]);

        let results = engine.search("git", false);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0], "git.internal");
        assert_eq!(results[1], "gitlab.company.com");
    }

    #[test]
    fn test_subsequence_match_survives_gaps() {
        let engine = engine(&["development-server", "test-server", "devops"]);

        let results = engine.search("dvp", false);

        assert_eq!(results, ["development-server", "devops"]);
    }

    #[test]
    fn test_non_matching_names_are_dropped() {
        let engine = engine(&["alpha", "beta"]);

        let results = engine.search("zzz", false);

        assert!(results.is_empty());
    }

    #[test]
    fn test_case_sensitivity_is_opt_in() {
        let engine = engine(&["Server1", "server2"]);

        assert_eq!(engine.search("server", false).len(), 2);
        assert_eq!(engine.search("server", true), ["server2"]);
    }

    #[test]
    fn test_ties_keep_registry_order() {
        // Identical scores: same length, same prefix relationship.
        let engine = engine(&["node-aa", "node-ab", "node-ac"]);

        let results = engine.search("node", false);

        assert_eq!(results, ["node-aa", "node-ab", "node-ac"]);
    }

    #[test]
    fn test_search_is_deterministic() {
        let engine = engine(&["a.example.com", "b.example.com", "ab.example.com"]);

        let first = engine.search("ab", false);
        let second = engine.search("ab", false);

        assert_eq!(first, second);
    }
}
