//! Statistical helpers over sample frames

/// Relative standard deviation below which a frame counts as constant.
const DEGENERATE_STD_RATIO: f64 = 1e-6;

/// Outcome of normalizing one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalization {
    pub mean: f32,
    pub std_dev: f32,
    /// True when the frame had (near) zero variance and was left untouched
    pub degenerate: bool,
}

/// Mean and population standard deviation, accumulated in f64
pub fn mean_and_std_dev(samples: &[f32]) -> (f64, f64) {
    if samples.is_empty() {
        return (0.0, 0.0);
    }

    let n = samples.len() as f64;
    let mean = samples.iter().map(|&s| s as f64).sum::<f64>() / n;
    let variance = samples
        .iter()
        .map(|&s| {
            let d = s as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;

    (mean, variance.sqrt())
}

/// Rescale to zero mean and unit variance in place.
///
/// Zero-variance frames (silence, DC) cannot be scaled; they are left as
/// they are so the result stays finite.
pub fn normalize_in_place(samples: &mut [f32]) -> Normalization {
    let (mean, std_dev) = mean_and_std_dev(samples);

    let degenerate = !(std_dev > DEGENERATE_STD_RATIO * mean.abs()) || std_dev < f64::MIN_POSITIVE;
    if !degenerate {
        for s in samples.iter_mut() {
            *s = ((*s as f64 - mean) / std_dev) as f32;
        }
    }

    Normalization {
        mean: mean as f32,
        std_dev: std_dev as f32,
        degenerate,
    }
}

/// Compute RMS (Root Mean Square)
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
    (sum_sq / samples.len() as f32).sqrt()
}

/// Index of the largest finite value, first one wins on ties
pub fn argmax(values: &[f32]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .fold(None, |best: Option<(usize, f32)>, (i, &v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rms() {
        let samples = vec![1.0, -1.0, 1.0, -1.0];
        assert!((rms(&samples) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_normalize_zero_mean_unit_variance() {
        let mut samples: Vec<f32> = (0..256).map(|i| (i % 7) as f32 * 3.0 + 10.0).collect();
        let result = normalize_in_place(&mut samples);
        assert!(!result.degenerate);

        let (mean, std_dev) = mean_and_std_dev(&samples);
        assert!(mean.abs() < 1e-5);
        assert!((std_dev - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_normalize_silence_stays_zero() {
        let mut samples = vec![0.0f32; 1024];
        let result = normalize_in_place(&mut samples);
        assert!(result.degenerate);
        assert!(samples.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_normalize_constant_frame_untouched() {
        let mut samples = vec![0.1f32; 1024];
        let result = normalize_in_place(&mut samples);
        assert!(result.degenerate);
        assert!(samples.iter().all(|&s| s == 0.1));
    }

    #[test]
    fn test_argmax_skips_nan() {
        assert_eq!(argmax(&[1.0, f32::NAN, 3.0, 3.0, 2.0]), Some(2));
        assert_eq!(argmax(&[f32::NAN]), None);
        assert_eq!(argmax(&[]), None);
    }
}
