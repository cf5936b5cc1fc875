//! Probability normalization of raw scores

/// Softmax of `scores`
///
/// The maximum is subtracted before exponentiating. Returns an empty vector
/// for empty input or when the scores cannot be normalized (NaN or
/// infinite values).
pub fn compute_softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    if !max.is_finite() {
        return Vec::new();
    }
    let exps: Vec<f32> = scores.iter().map(|&score| (score - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if !sum.is_finite() || sum <= 0.0 {
        return Vec::new();
    }
    exps.into_iter().map(|value| value / sum).collect()
}

/// Index of the largest value; the first one wins ties
pub fn arg_max(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, &value) in values.iter().enumerate() {
        match best {
            Some((_, current)) if value <= current => {}
            _ if value.is_nan() => {}
            _ => best = Some((index, value)),
        }
    }
    best.map(|(index, _)| index)
}
