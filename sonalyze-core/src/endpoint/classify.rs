//! Windowed energy classification of samples into speech and noise.

/// Label `samples` in non-overlapping windows of `window_len` samples.
///
/// A window (the final one may be short) is labelled speech when its
/// average absolute amplitude is strictly greater than `threshold`; the
/// label applies to every sample in the window. Returns one label per
/// sample, `true` = speech, so the mask length always equals the input
/// length. A `window_len` of 0 is treated as 1.
pub fn classify(samples: &[f32], threshold: f32, window_len: usize) -> Vec<bool> {
    if samples.is_empty() {
        return Vec::new();
    }
    let window_len = window_len.max(1);

    let mut mask = Vec::with_capacity(samples.len());
    for window in samples.chunks(window_len) {
        let avg = window.iter().map(|s| s.abs()).sum::<f32>() / window.len() as f32;
        let speech = avg > threshold;
        mask.extend(std::iter::repeat(speech).take(window.len()));
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_length_matches_input_length() {
        for len in [0usize, 1, 79, 80, 81, 1000] {
            let samples = vec![0.0f32; len];
            assert_eq!(classify(&samples, 0.0, 80).len(), len);
        }
    }

    #[test]
    fn zero_average_is_not_above_zero_threshold() {
        // Strict inequality: all-zero input against threshold 0 stays noise.
        let mask = classify(&vec![0.0f32; 400], 0.0, 80);
        assert!(mask.iter().all(|&m| !m));
    }

    #[test]
    fn loud_window_is_labelled_speech() {
        let mut samples = vec![0.0f32; 160];
        samples.extend(vec![0.5f32; 80]);
        samples.extend(vec![0.0f32; 160]);
        let mask = classify(&samples, 0.1, 80);
        assert!(mask[..160].iter().all(|&m| !m));
        assert!(mask[160..240].iter().all(|&m| m));
        assert!(mask[240..].iter().all(|&m| !m));
    }

    #[test]
    fn window_label_covers_every_sample_of_the_window() {
        // One loud sample lifts the average of its whole window.
        let mut samples = vec![0.0f32; 80];
        samples[10] = 8.0;
        let mask = classify(&samples, 0.05, 80);
        assert!(mask.iter().all(|&m| m));
    }

    #[test]
    fn short_final_window_is_classified_on_its_own_average() {
        // 100 quiet samples then 20 loud ones in a trailing partial window.
        let mut samples = vec![0.0f32; 80];
        samples.extend(vec![0.9f32; 20]);
        let mask = classify(&samples, 0.1, 80);
        assert!(mask[..80].iter().all(|&m| !m));
        assert!(mask[80..].iter().all(|&m| m));
    }

    #[test]
    fn degenerate_window_len_defaults_to_one() {
        let samples = vec![0.0f32, 0.6, 0.0];
        let mask = classify(&samples, 0.1, 0);
        assert_eq!(mask, vec![false, true, false]);
    }
}
