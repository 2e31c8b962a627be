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

//! Extraction of sub-band envelopes from wavelet coefficients.
//!
//! An envelope is the rectified, mean-removed and (for detail coefficients)
//! decimated representation of the activity in one frequency band. It is a
//! proxy for the rhythmic energy of that band.
//!
//! All transforms are pure. [`rectify`] and [`normalize`] consume their
//! input buffer and return a new owned one, so buffers are never aliased
//! across decomposition levels.

mod combine;

pub use combine::{add, combine};

use alloc::vec::Vec;

/// Stride decimation: keeps the elements at indices `0, pace, 2 * pace, …`.
///
/// The result has exactly `floor(len / pace)` elements. No anti-aliasing
/// filter is applied; the aliasing is accepted for magnitude envelopes.
///
/// # Panics
/// If `pace` is zero.
#[must_use]
pub fn decimate(sequence: &[f64], pace: usize) -> Vec<f64> {
    assert!(pace > 0, "decimation pace must be at least 1");
    sequence
        .iter()
        .step_by(pace)
        .take(sequence.len() / pace)
        .copied()
        .collect()
}

/// Full-wave rectification (absolute value of each element).
#[must_use]
pub fn rectify(sequence: Vec<f64>) -> Vec<f64> {
    sequence.into_iter().map(libm::fabs).collect()
}

/// Removes the arithmetic mean, so that the result has a mean of zero
/// (modulo floating-point rounding). An empty sequence stays empty.
#[must_use]
pub fn normalize(sequence: Vec<f64>) -> Vec<f64> {
    if sequence.is_empty() {
        return sequence;
    }
    let mean = mean(&sequence);
    sequence.into_iter().map(|value| value - mean).collect()
}

/// Envelope of one level's detail coefficients: decimate, rectify,
/// normalize.
#[must_use]
pub fn detail_envelope(detail: &[f64], pace: usize) -> Vec<f64> {
    normalize(rectify(decimate(detail, pace)))
}

/// Envelope of the coarsest approximation coefficients. They are already
/// maximally decimated by the cascade, so only rectify and normalize.
#[must_use]
pub fn approximation_envelope(approximation: &[f64]) -> Vec<f64> {
    normalize(rectify(approximation.to_vec()))
}

fn mean(sequence: &[f64]) -> f64 {
    sequence.iter().sum::<f64>() / sequence.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;

    #[test]
    fn decimate_has_floor_length() {
        let sequence = (0..37).map(|x| x as f64).collect::<Vec<_>>();
        for pace in 1..=40 {
            check!(decimate(&sequence, pace).len() == sequence.len() / pace);
        }
        check!(decimate(&[], 4).is_empty());
    }

    #[test]
    fn decimate_keeps_every_nth_element() {
        let sequence = (0..10).map(|x| x as f64).collect::<Vec<_>>();
        check!(decimate(&sequence, 1) == sequence);
        check!(decimate(&sequence, 3) == [0.0, 3.0, 6.0]);
        check!(decimate(&sequence, 4) == [0.0, 4.0]);
        // Not a truncation to the leading elements.
        check!(decimate(&sequence, 2) == [0.0, 2.0, 4.0, 6.0, 8.0]);
    }

    #[test]
    #[should_panic]
    fn decimate_rejects_zero_pace() {
        let _ = decimate(&[1.0, 2.0], 0);
    }

    #[test]
    fn rectify_takes_absolute_values() {
        check!(rectify(std::vec![-1.5, 0.0, 2.0, -0.0]) == [1.5, 0.0, 2.0, 0.0]);
    }

    #[test]
    fn normalize_removes_mean() {
        let sequence = std::vec![0.3, 1.7, -4.2, 9.9, 0.0, 2.5, 7.25];
        let normalized = normalize(sequence);
        check!(approx_eq!(f64, mean(&normalized), 0.0, epsilon = 1e-12));
        check!(approx_eq!(f64, normalized[0], 0.3 - 17.45 / 7.0, epsilon = 1e-12));

        check!(normalize(Vec::new()).is_empty());
    }

    #[test]
    fn detail_envelope_pipeline() {
        // decimate by 2: [-2, 4, -6] -> rectify: [2, 4, 6] -> mean 4
        let detail = [-2.0, 100.0, 4.0, 100.0, -6.0, 100.0];
        check!(detail_envelope(&detail, 2) == [-2.0, 0.0, 2.0]);
    }

    #[test]
    fn approximation_envelope_is_not_decimated() {
        let approximation = [-1.0, 3.0, -5.0, 1.0];
        check!(approximation_envelope(&approximation) == [-1.5, 0.5, 2.5, -1.5]);
    }
}
