use std::collections::HashSet;

use crate::tokenize::canonical_terms;

/// Weighted Jaccard similarity over canonical terms (unigrams + bigram/
/// trigram bonus terms): shared n-gram terms count toward both the
/// intersection and union just like unigrams, so a shared bigram
/// contributes roughly twice the weight of a shared unigram (spec.md
/// §4.3).
pub fn overlap(query: &str, candidate: &str) -> f64 {
    let query_terms: HashSet<String> = canonical_terms(query).into_iter().collect();
    let candidate_terms: HashSet<String> = canonical_terms(candidate).into_iter().collect();

    if query_terms.is_empty() || candidate_terms.is_empty() {
        return 0.0;
    }

    let intersection = query_terms.intersection(&candidate_terms).count() as f64;
    let union = query_terms.union(&candidate_terms).count() as f64;
    if union == 0.0 {
        0.0
    } else {
        intersection / union
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_text_has_full_overlap() {
        assert!((overlap("the quick brown fox", "the quick brown fox") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn disjoint_text_has_zero_overlap() {
        assert_eq!(overlap("alpha beta", "gamma delta"), 0.0);
    }

    #[test]
    fn whitespace_only_query_has_zero_overlap() {
        assert_eq!(overlap("   ", "some candidate text"), 0.0);
    }

    #[test]
    fn shared_bigram_raises_overlap_over_unigram_only_match() {
        let unigram_only = overlap("red car", "red bicycle");
        let shared_bigram = overlap("red car", "red car race");
        assert!(shared_bigram > unigram_only);
    }
}
