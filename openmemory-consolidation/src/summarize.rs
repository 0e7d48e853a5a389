use crate::algorithms::textrank;

/// Concatenates each essence's TextRank summary, truncated to `max_chars`
/// (spec.md §4.4: "content is the concatenation of essences truncated to
/// `ingestSectionSize`").
pub fn summarize_cluster(essences: &[String], max_chars: usize) -> String {
    let condensed: Vec<String> = essences.iter().map(|e| textrank::summarize(e, 2)).filter(|s| !s.is_empty()).collect();

    let joined = condensed.join(" ");
    if joined.chars().count() <= max_chars {
        return joined;
    }

    joined.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_to_max_chars() {
        let essences = vec!["a".repeat(50), "b".repeat(50)];
        let summary = summarize_cluster(&essences, 10);
        assert_eq!(summary.chars().count(), 10);
    }

    #[test]
    fn joins_multiple_essences() {
        let essences = vec!["The cat sat.".to_string(), "The dog ran.".to_string()];
        let summary = summarize_cluster(&essences, 1000);
        assert!(summary.contains("cat"));
        assert!(summary.contains("dog"));
    }

    #[test]
    fn empty_essences_produce_empty_summary() {
        assert_eq!(summarize_cluster(&[], 100), "");
    }
}
