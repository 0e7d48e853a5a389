use unicode_segmentation::UnicodeSegmentation;

/// Lowercased unicode-word unigrams, in order.
pub fn unigrams(text: &str) -> Vec<String> {
    text.unicode_words().map(|w| w.to_lowercase()).collect()
}

/// Contiguous n-grams of the given size, joined with a space.
fn ngrams(tokens: &[String], n: usize) -> Vec<String> {
    if tokens.len() < n {
        return Vec::new();
    }
    tokens.windows(n).map(|w| w.join(" ")).collect()
}

/// Unigrams plus bigrams and trigrams, used to give keyword overlap an
/// n-gram bonus: a shared bigram counts as two shared unigrams would.
pub fn canonical_terms(text: &str) -> Vec<String> {
    let unigrams = unigrams(text);
    let mut terms = unigrams.clone();
    terms.extend(ngrams(&unigrams, 2));
    terms.extend(ngrams(&unigrams, 3));
    terms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unigrams_are_lowercased() {
        assert_eq!(unigrams("The Quick Fox"), vec!["the", "quick", "fox"]);
    }

    #[test]
    fn canonical_terms_include_bigrams_and_trigrams() {
        let terms = canonical_terms("a b c");
        assert!(terms.contains(&"a".to_string()));
        assert!(terms.contains(&"a b".to_string()));
        assert!(terms.contains(&"a b c".to_string()));
    }

    #[test]
    fn short_text_has_no_trigrams() {
        let terms = canonical_terms("a b");
        assert!(!terms.iter().any(|t| t.split(' ').count() == 3));
    }
}
