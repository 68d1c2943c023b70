use synonymizer_core::EmbeddingError;
use tracing::warn;

/// Cosine of the angle between `a` and `b`, in `[-1, 1]`.
///
/// A zero-norm input has no direction and scores `0.0`.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, EmbeddingError> {
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let (dot, norm_a, norm_b) = a.iter().zip(b).fold(
        (0.0f64, 0.0f64, 0.0f64),
        |(dot, na, nb), (&x, &y)| {
            let (x, y) = (f64::from(x), f64::from(y));
            (dot + x * y, na + x * x, nb + y * y)
        },
    );

    if norm_a == 0.0 || norm_b == 0.0 {
        warn!(
            "Zero-norm embedding (dimension {}), treating similarity as 0",
            a.len()
        );
        return Ok(0.0);
    }

    let similarity = dot / (norm_a.sqrt() * norm_b.sqrt());
    if !similarity.is_finite() {
        warn!("Non-finite cosine similarity {}, treating as 0", similarity);
        return Ok(0.0);
    }

    Ok(similarity.clamp(-1.0, 1.0) as f32)
}
