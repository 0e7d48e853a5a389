use hdbscan::{Hdbscan, HdbscanHyperParams};

/// Indices into the input slice, grouped into clusters; everything not in
/// a cluster is noise (including runs too small to cluster at all).
#[derive(Debug, Clone)]
pub struct ClusterResult {
    pub clusters: Vec<Vec<usize>>,
    pub noise: Vec<usize>,
}

/// Clusters mean embedding vectors with HDBSCAN. Callers are expected to
/// have already partitioned candidates by sector — consolidation only
/// ever groups memories sharing a `primary_sector` (spec.md §4.4).
pub fn cluster_by_embedding(vectors: &[Vec<f32>], min_cluster_size: usize) -> ClusterResult {
    if vectors.len() < min_cluster_size.max(2) {
        return ClusterResult { clusters: vec![], noise: (0..vectors.len()).collect() };
    }

    let params = HdbscanHyperParams::builder().min_cluster_size(min_cluster_size).min_samples(1).build();
    let clusterer = Hdbscan::new(vectors, params);

    let labels = match clusterer.cluster() {
        Ok(labels) => labels,
        Err(_) => return ClusterResult { clusters: vec![], noise: (0..vectors.len()).collect() },
    };

    let mut by_label: std::collections::HashMap<i32, Vec<usize>> = std::collections::HashMap::new();
    let mut noise = Vec::new();
    for (idx, label) in labels.into_iter().enumerate() {
        if label < 0 {
            noise.push(idx);
        } else {
            by_label.entry(label).or_default().push(idx);
        }
    }

    let mut clusters: Vec<Vec<usize>> = by_label.into_values().collect();
    clusters.sort_by_key(|c| std::cmp::Reverse(c.len()));

    ClusterResult { clusters, noise }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_few_vectors_are_all_noise() {
        let result = cluster_by_embedding(&[vec![1.0, 0.0]], 2);
        assert!(result.clusters.is_empty());
        assert_eq!(result.noise, vec![0]);
    }

    #[test]
    fn tight_cluster_plus_outlier_separates() {
        let vectors = vec![
            vec![1.0, 1.0, 1.0],
            vec![1.0, 1.0, 1.05],
            vec![1.0, 1.05, 1.0],
            vec![-8.0, -8.0, -8.0],
        ];
        let result = cluster_by_embedding(&vectors, 2);
        let clustered: usize = result.clusters.iter().map(|c| c.len()).sum();
        assert_eq!(clustered + result.noise.len(), 4);
    }
}
