//! Distances between embedding vectors

/// Cosine similarity between two vectors
///
/// Both vectors must have the same dimensions. Returns 0.0 when either
/// vector has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "vector dimensions differ");

    let dot_product: f64 = a.iter().zip(b.iter()).map(|(x, y)| *x as f64 * *y as f64).sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// `1 - cosine_similarity`, clamped to [0, 2]
///
/// Identical vectors are exactly 0.0 apart, zero vectors included.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f64 {
    if a == b {
        return 0.0;
    }
    (1.0 - cosine_similarity(a, b)).clamp(0.0, 2.0)
}

/// L2 distance
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "vector dimensions differ");
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (*x as f64 - *y as f64).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// L1 distance
pub fn manhattan_distance(a: &[f32], b: &[f32]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "vector dimensions differ");
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (*x as f64 - *y as f64).abs())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < EPS);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < EPS);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < EPS);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_cosine_distance_range() {
        assert_eq!(cosine_distance(&[0.3, 0.4, 0.5], &[0.3, 0.4, 0.5]), 0.0);
        assert!((cosine_distance(&[1.0, 0.0], &[0.0, 1.0]) - 1.0).abs() < EPS);
        assert!((cosine_distance(&[1.0, 0.0], &[-1.0, 0.0]) - 2.0).abs() < EPS);
        assert_eq!(cosine_distance(&[0.0, 0.0], &[0.0, 0.0]), 0.0);
        // Zero vector has no direction
        assert_eq!(cosine_distance(&[0.0, 0.0], &[1.0, 1.0]), 1.0);
    }

    #[test]
    fn test_euclidean_and_manhattan() {
        let a = [0.0, 0.0];
        let b = [3.0, 4.0];
        assert!((euclidean_distance(&a, &b) - 5.0).abs() < EPS);
        assert!((manhattan_distance(&a, &b) - 7.0).abs() < EPS);
        assert_eq!(euclidean_distance(&b, &b), 0.0);
        assert_eq!(manhattan_distance(&b, &b), 0.0);
    }
}
