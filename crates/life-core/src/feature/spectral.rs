//! Spectral estimation: radix-2 FFT, Hann windowing, Welch PSD.
//!
//! The extractor feeds each channel through a Welch periodogram (Hann
//! window, 50% segment overlap) and bins the resulting power spectral
//! density into the five canonical EEG bands. Everything here operates on
//! plain `f32` slices; no external DSP dependency.

use std::f32::consts::TAU;

use crate::types::BandPowers;

/// Canonical EEG band boundaries in Hz: (low, high), half-open [low, high).
///
/// These are fixed contract points; the filter design around them is an
/// implementation choice.
pub const BAND_BOUNDS: [(f32, f32); 5] = [
    (0.5, 4.0),  // delta
    (4.0, 8.0),  // theta
    (8.0, 13.0), // alpha
    (13.0, 30.0), // beta
    (30.0, 45.0), // gamma
];

/// In-place iterative radix-2 Cooley-Tukey FFT.
///
/// `re`/`im` must have equal power-of-two length.
pub fn fft_in_place(re: &mut [f32], im: &mut [f32]) {
    let n = re.len();
    debug_assert_eq!(n, im.len());
    debug_assert!(n.is_power_of_two());
    if n < 2 {
        return;
    }

    // Bit-reversal permutation
    let mut j = 0usize;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j |= bit;
        if i < j {
            re.swap(i, j);
            im.swap(i, j);
        }
    }

    // Danielson-Lanczos butterflies
    let mut len = 2;
    while len <= n {
        let angle = -TAU / len as f32;
        let (w_im, w_re) = angle.sin_cos();
        for start in (0..n).step_by(len) {
            let mut cur_re = 1.0f32;
            let mut cur_im = 0.0f32;
            for k in 0..len / 2 {
                let a = start + k;
                let b = start + k + len / 2;
                let t_re = re[b] * cur_re - im[b] * cur_im;
                let t_im = re[b] * cur_im + im[b] * cur_re;
                re[b] = re[a] - t_re;
                im[b] = im[a] - t_im;
                re[a] += t_re;
                im[a] += t_im;
                let next_re = cur_re * w_re - cur_im * w_im;
                cur_im = cur_re * w_im + cur_im * w_re;
                cur_re = next_re;
            }
        }
        len <<= 1;
    }
}

/// Hann window coefficients of the given length.
///
/// Built once per segment length by the extractor and cached; never mutated
/// after initialization.
pub fn hann_window(len: usize) -> Vec<f32> {
    if len == 1 {
        return vec![1.0];
    }
    (0..len)
        .map(|i| 0.5 * (1.0 - (TAU * i as f32 / (len - 1) as f32).cos()))
        .collect()
}

/// One-sided Welch power spectral density estimate for a single channel.
///
/// Segments of `window.len()` samples advance by half a segment (50%
/// overlap); each is Hann-windowed, transformed, and the periodograms are
/// averaged. Returns PSD values for bins `0..=len/2`; bin `k` is centered at
/// `k * sample_rate / len` Hz.
pub fn welch_psd(signal: &[f32], window: &[f32], sample_rate_hz: f32) -> Vec<f32> {
    let seg_len = window.len();
    debug_assert!(seg_len.is_power_of_two());
    debug_assert!(signal.len() >= seg_len);

    let window_power: f32 = window.iter().map(|w| w * w).sum();
    let scale = 1.0 / (sample_rate_hz * window_power);
    let half = seg_len / 2;
    let mut psd = vec![0.0f32; half + 1];
    let mut segments = 0u32;

    let mut start = 0;
    while start + seg_len <= signal.len() {
        let mut re: Vec<f32> = signal[start..start + seg_len]
            .iter()
            .zip(window)
            .map(|(s, w)| s * w)
            .collect();
        let mut im = vec![0.0f32; seg_len];
        fft_in_place(&mut re, &mut im);

        for k in 0..=half {
            let mut p = (re[k] * re[k] + im[k] * im[k]) * scale;
            // One-sided spectrum: double everything except DC and Nyquist
            if k != 0 && k != half {
                p *= 2.0;
            }
            psd[k] += p;
        }
        segments += 1;
        start += half;
    }

    if segments > 1 {
        for p in &mut psd {
            *p /= segments as f32;
        }
    }
    psd
}

/// Integrate a one-sided PSD into the five canonical bands.
pub fn bin_band_powers(psd: &[f32], seg_len: usize, sample_rate_hz: f32) -> BandPowers {
    let bin_width = sample_rate_hz / seg_len as f32;
    let mut powers = [0.0f32; 5];
    for (k, p) in psd.iter().enumerate() {
        let freq = k as f32 * bin_width;
        for (band, &(lo, hi)) in BAND_BOUNDS.iter().enumerate() {
            if freq >= lo && freq < hi {
                powers[band] += p * bin_width;
                break;
            }
        }
    }
    BandPowers {
        delta: powers[0],
        theta: powers[1],
        alpha: powers[2],
        beta: powers[3],
        gamma: powers[4],
    }
}

/// Pearson correlation of two equal-length series, 0.0 when either side is
/// constant (zero variance carries no coherence information).
pub fn pearson(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    let n = a.len() as f32;
    if n < 2.0 {
        return 0.0;
    }
    let mean_a = a.iter().sum::<f32>() / n;
    let mean_b = b.iter().sum::<f32>() / n;
    let mut cov = 0.0f32;
    let mut var_a = 0.0f32;
    let mut var_b = 0.0f32;
    for (&x, &y) in a.iter().zip(b) {
        let da = x - mean_a;
        let db = y - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }
    if var_a <= f32::EPSILON || var_b <= f32::EPSILON {
        return 0.0;
    }
    cov / (var_a.sqrt() * var_b.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fft_of_impulse_is_flat() {
        let mut re = vec![0.0f32; 8];
        let mut im = vec![0.0f32; 8];
        re[0] = 1.0;
        fft_in_place(&mut re, &mut im);
        for k in 0..8 {
            assert!((re[k] - 1.0).abs() < 1e-5, "bin {k} re = {}", re[k]);
            assert!(im[k].abs() < 1e-5);
        }
    }

    #[test]
    fn fft_locates_pure_tone() {
        // Tone exactly on bin 4 of a 64-point transform
        let n = 64;
        let mut re: Vec<f32> = (0..n)
            .map(|i| (TAU * 4.0 * i as f32 / n as f32).cos())
            .collect();
        let mut im = vec![0.0f32; n];
        fft_in_place(&mut re, &mut im);
        let mags: Vec<f32> = re
            .iter()
            .zip(&im)
            .map(|(r, i)| (r * r + i * i).sqrt())
            .collect();
        let peak = mags
            .iter()
            .take(n / 2)
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(k, _)| k)
            .unwrap();
        assert_eq!(peak, 4);
    }

    #[test]
    fn hann_window_is_symmetric_and_zero_ended() {
        let w = hann_window(64);
        assert!(w[0].abs() < 1e-6);
        assert!(w[63].abs() < 1e-6);
        for i in 0..32 {
            assert!((w[i] - w[63 - i]).abs() < 1e-5);
        }
        // Peak at the center
        assert!((w[31] - 1.0).abs() < 0.01 || (w[32] - 1.0).abs() < 0.01);
    }

    #[test]
    fn welch_peak_lands_in_alpha_for_10hz_tone() {
        let fs = 250.0;
        let signal: Vec<f32> = (0..1024)
            .map(|i| (TAU * 10.0 * i as f32 / fs).sin())
            .collect();
        let window = hann_window(256);
        let psd = welch_psd(&signal, &window, fs);
        let bands = bin_band_powers(&psd, 256, fs);
        assert!(bands.alpha > bands.delta);
        assert!(bands.alpha > bands.theta);
        assert!(bands.alpha > bands.beta);
        assert!(bands.alpha > bands.gamma);
    }

    #[test]
    fn band_binning_respects_boundaries() {
        // Synthetic PSD with all energy in one bin at 6 Hz (theta)
        let fs = 256.0;
        let seg_len = 256; // 1 Hz bins
        let mut psd = vec![0.0f32; seg_len / 2 + 1];
        psd[6] = 1.0;
        let bands = bin_band_powers(&psd, seg_len, fs);
        assert!(bands.theta > 0.0);
        assert_eq!(bands.delta, 0.0);
        assert_eq!(bands.alpha, 0.0);
    }

    #[test]
    fn pearson_is_one_for_identical_series() {
        let a = [1.0f32, 2.0, 3.0, 4.0, 2.5];
        assert!((pearson(&a, &a) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn pearson_is_minus_one_for_inverted_series() {
        let a = [1.0f32, 2.0, 3.0, 4.0];
        let b = [-1.0f32, -2.0, -3.0, -4.0];
        assert!((pearson(&a, &b) + 1.0).abs() < 1e-5);
    }

    #[test]
    fn pearson_of_constant_series_is_zero() {
        let a = [1.0f32; 8];
        let b = [1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        assert_eq!(pearson(&a, &b), 0.0);
    }
}
