/// Cosine similarity between two embedding vectors
///
/// Formula: cos(a, b) = Σ(a[i] × b[i]) / (||a|| × ||b||)
///
/// Returns 0.0 instead of NaN when either vector has zero magnitude, when
/// either is empty, when the dimensions disagree, or when a component is
/// not finite. An empty preference profile therefore scores 0 against
/// every candidate.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let (dot, norm_a, norm_b) = a.iter().zip(b.iter()).fold(
        (0.0_f64, 0.0_f64, 0.0_f64),
        |(dot, na, nb), (&x, &y)| {
            let (x, y) = (x as f64, y as f64);
            (dot + x * y, na + x * x, nb + y * y)
        },
    );

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let similarity = dot / (norm_a.sqrt() * norm_b.sqrt());
    if !similarity.is_finite() {
        return 0.0;
    }

    similarity.clamp(-1.0, 1.0)
}
