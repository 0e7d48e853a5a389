use std::collections::HashMap;

use crate::tokenize::unigrams;

/// Corpus-wide statistics needed for BM25 scoring, gathered by the caller
/// over whatever candidate pool is being scored — not the whole tenant's
/// corpus, since that would require a full table scan per query.
#[derive(Debug, Clone)]
pub struct CorpusStats {
    pub doc_count: usize,
    pub avg_doc_len: f64,
    /// Number of documents containing each term.
    pub doc_freq: HashMap<String, usize>,
}

impl CorpusStats {
    pub fn from_documents(docs: &[String]) -> Self {
        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        let mut total_len = 0usize;

        for doc in docs {
            let terms = unigrams(doc);
            total_len += terms.len();
            let unique: std::collections::HashSet<_> = terms.into_iter().collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let doc_count = docs.len().max(1);
        CorpusStats { doc_count, avg_doc_len: total_len as f64 / doc_count as f64, doc_freq }
    }
}

/// Standard Okapi BM25, `idf = ln((N + 1) / (df + 0.5))`.
pub fn score(query: &str, document: &str, stats: &CorpusStats, k1: f64, b: f64) -> f64 {
    let query_terms = unigrams(query);
    if query_terms.is_empty() {
        return 0.0;
    }

    let doc_terms = unigrams(document);
    let doc_len = doc_terms.len() as f64;
    let mut term_freq: HashMap<String, usize> = HashMap::new();
    for term in &doc_terms {
        *term_freq.entry(term.clone()).or_insert(0) += 1;
    }

    query_terms
        .iter()
        .map(|term| {
            let tf = *term_freq.get(term).unwrap_or(&0) as f64;
            if tf == 0.0 {
                return 0.0;
            }
            let df = *stats.doc_freq.get(term).unwrap_or(&0) as f64;
            let idf = ((stats.doc_count as f64 + 1.0) / (df + 0.5)).ln();
            let norm = 1.0 - b + b * (doc_len / stats.avg_doc_len.max(1.0));
            idf * (tf * (k1 + 1.0)) / (tf + k1 * norm)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_scores_zero() {
        let stats = CorpusStats::from_documents(&["fox jumps".to_string()]);
        assert_eq!(score("", "fox jumps", &stats, 1.2, 0.75), 0.0);
    }

    #[test]
    fn document_with_query_term_outscores_one_without() {
        let docs = vec!["the quick brown fox".to_string(), "a lazy dog sleeps".to_string()];
        let stats = CorpusStats::from_documents(&docs);
        let with = score("fox", &docs[0], &stats, 1.2, 0.75);
        let without = score("fox", &docs[1], &stats, 1.2, 0.75);
        assert!(with > without);
        assert_eq!(without, 0.0);
    }

    #[test]
    fn rarer_terms_score_higher() {
        let docs = vec![
            "common common common rare".to_string(),
            "common common common common".to_string(),
            "common common common common".to_string(),
        ];
        let stats = CorpusStats::from_documents(&docs);
        let rare_score = score("rare", &docs[0], &stats, 1.2, 0.75);
        let common_score = score("common", &docs[0], &stats, 1.2, 0.75);
        assert!(rare_score > 0.0);
        assert!(common_score > 0.0);
    }
}
