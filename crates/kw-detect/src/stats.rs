//! Robust statistics used by Stage B's windowed anomaly detector, plus the
//! cosine similarity used by Stage A. Grounded on the chonkit semantic
//! chunker's `cosine_similarity` (here single-threaded since gap counts
//! are small relative to document size, not the parallel-reduction scale
//! that crate targets).

/// Cosine similarity between two equal-length vectors. Returns `0.0` if
/// either vector has zero magnitude.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have same dimensionality");
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Median of a slice of samples. Returns `0.0` for an empty slice.
#[must_use]
pub fn median(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Median absolute deviation from the median.
#[must_use]
pub fn mad(samples: &[f32]) -> f32 {
    let center = median(samples);
    let deviations: Vec<f32> = samples.iter().map(|x| (x - center).abs()).collect();
    median(&deviations)
}

/// Robust z-score of `value` against `samples`, using the 1.4826 constant
/// that makes MAD a consistent estimator of the standard deviation under
/// normality. Returns `None` when `samples` has zero spread (MAD == 0),
/// signaling the caller should not trust this score.
#[must_use]
pub fn robust_z_score(value: f32, samples: &[f32]) -> Option<f32> {
    const MAD_TO_SIGMA: f32 = 1.4826;
    let spread = mad(samples) * MAD_TO_SIGMA;
    if spread <= f32::EPSILON {
        return None;
    }
    Some((value - median(samples)).abs() / spread)
}
