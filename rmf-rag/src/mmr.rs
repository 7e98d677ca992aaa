//! Maximal marginal relevance selection.
//!
//! Picks the most query-similar candidate first, then repeatedly the one
//! maximizing `lambda * sim(query, c) - (1 - lambda) * max(sim(c, selected))`.
//! Near-duplicate chunks (for example two overlapping chunks of one page)
//! therefore rarely both make the cut.

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Select up to `k` candidate indices in MMR order.
///
/// Deterministic: ties go to the lower candidate index.
pub fn maximal_marginal_relevance<V: AsRef<[f32]>>(
    query: &[f32],
    candidates: &[V],
    k: usize,
    lambda: f32,
) -> Vec<usize> {
    let target = k.min(candidates.len());
    if target == 0 {
        return Vec::new();
    }

    let query_similarity: Vec<f32> =
        candidates.iter().map(|c| cosine_similarity(query, c.as_ref())).collect();

    let mut selected: Vec<usize> = Vec::with_capacity(target);
    let mut first = 0;
    for (i, sim) in query_similarity.iter().enumerate() {
        if *sim > query_similarity[first] {
            first = i;
        }
    }
    selected.push(first);

    while selected.len() < target {
        let mut best: Option<(usize, f32)> = None;
        for (i, sim) in query_similarity.iter().enumerate() {
            if selected.contains(&i) {
                continue;
            }
            let redundancy = selected
                .iter()
                .map(|&s| cosine_similarity(candidates[i].as_ref(), candidates[s].as_ref()))
                .fold(f32::NEG_INFINITY, f32::max);
            let score = lambda * sim - (1.0 - lambda) * redundancy;
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((i, score)),
            }
        }
        match best {
            Some((i, _)) => selected.push(i),
            None => break,
        }
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_handles_zero_vectors() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert!((cosine_similarity(&[1.0, 0.0], &[2.0, 0.0]) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn pure_relevance_keeps_similarity_order() {
        let query = [1.0, 0.0];
        let candidates = vec![vec![0.6, 0.8], vec![1.0, 0.0], vec![0.8, 0.6]];
        assert_eq!(maximal_marginal_relevance(&query, &candidates, 3, 1.0), vec![1, 2, 0]);
    }

    #[test]
    fn diversity_skips_near_duplicates() {
        let query = [1.0, 0.0];
        // 0 and 1 are identical; 2 points elsewhere but is still somewhat relevant.
        let candidates = vec![vec![1.0, 0.05], vec![1.0, 0.05], vec![0.5, 0.9]];
        let picked = maximal_marginal_relevance(&query, &candidates, 2, 0.25);
        assert_eq!(picked, vec![0, 2]);
    }

    #[test]
    fn never_returns_more_than_available() {
        let candidates = vec![vec![1.0, 0.0]];
        assert_eq!(maximal_marginal_relevance(&[1.0, 0.0], &candidates, 5, 0.5), vec![0]);
        let empty: Vec<Vec<f32>> = Vec::new();
        assert!(maximal_marginal_relevance(&[1.0, 0.0], &empty, 5, 0.5).is_empty());
    }
}
