/*
MIT License

Copyright (c) 2024 Philipp Schuster

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

//! Autocorrelation of the combined envelope and the peak search on the
//! resulting correlogram.

use alloc::vec::Vec;

/// Unnormalized (biased) autocorrelation:
/// `r[k] = sum_{i=0}^{n-1-k} s[i] * s[i + k]` for every lag `k` in `0..n`.
///
/// There is no division by `n - k` and no mean removal; the envelopes are
/// already mean-free. The runtime is quadratic in the input length.
#[must_use]
pub fn correlate(sequence: &[f64]) -> Vec<f64> {
    (0..sequence.len())
        .map(|lag| {
            sequence
                .iter()
                .zip(&sequence[lag..])
                .map(|(a, b)| a * b)
                .sum::<f64>()
        })
        .collect()
}

/// Finds the index of the element with the largest absolute value.
///
/// Tie-break rule: a positive extremum takes priority over a negative one of
/// the same magnitude, and within each sign the earliest index wins. On a
/// correlogram, this favors shorter periods (faster tempi) among equally
/// strong peaks.
///
/// Returns `None` if the sequence is empty or all zero, as there is no
/// meaningful peak then.
#[must_use]
pub fn detect_peak(sequence: &[f64]) -> Option<usize> {
    let peak_magnitude = sequence
        .iter()
        .copied()
        .map(libm::fabs)
        .fold(0.0, f64::max);

    if peak_magnitude <= 0.0 {
        return None;
    }

    sequence
        .iter()
        .position(|&value| value == peak_magnitude)
        .or_else(|| {
            sequence
                .iter()
                .position(|&value| value == -peak_magnitude)
        })
}
