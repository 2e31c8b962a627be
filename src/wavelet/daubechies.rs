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

//! Daubechies-8 discrete wavelet transform with periodic boundary handling.

use super::{DecompositionError, DecompositionLevel, WaveletTransform};
use alloc::vec::Vec;

/// Number of taps of the Daubechies-8 filters.
const FILTER_LEN: usize = 16;

/// Daubechies-8 scaling (low-pass) filter. Sums to `sqrt(2)`, its energy
/// is `1`.
const SCALING_FILTER: [f64; FILTER_LEN] = [
    0.054_415_842_243_104_9,
    0.312_871_590_914_303_1,
    0.675_630_736_297_290_4,
    0.585_354_683_654_190_7,
    -0.015_829_105_256_381_6,
    -0.284_015_542_961_570_2,
    0.000_472_484_573_912_4,
    0.128_747_426_620_483_7,
    -0.017_369_301_001_808_3,
    -0.044_088_253_930_795_2,
    0.013_981_027_917_399_5,
    0.008_746_094_047_406_1,
    -0.004_870_352_993_451_8,
    -0.000_391_740_373_377_0,
    0.000_675_449_406_450_6,
    -0.000_117_476_784_124_8,
];

/// Daubechies-8 orthogonal wavelet transform.
///
/// Boundaries are handled by periodic (circular) extension of the input, so
/// an input of length `n` produces `ceil(n / 2)` approximation and
/// `ceil(n / 2)` detail coefficients. For even `n` the transform is
/// orthonormal, i.e., it preserves the energy of the signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Daubechies8 {
    low_pass: [f64; FILTER_LEN],
    high_pass: [f64; FILTER_LEN],
}

impl Daubechies8 {
    /// Creates the transform. The wavelet (high-pass) filter is the
    /// quadrature mirror of the scaling filter:
    /// `g[k] = (-1)^k * h[N - 1 - k]`.
    #[must_use]
    pub fn new() -> Self {
        let mut high_pass = [0.0; FILTER_LEN];
        for (k, tap) in high_pass.iter_mut().enumerate() {
            let mirrored = SCALING_FILTER[FILTER_LEN - 1 - k];
            *tap = if k % 2 == 0 { mirrored } else { -mirrored };
        }
        Self {
            low_pass: SCALING_FILTER,
            high_pass,
        }
    }

    /// Single analysis step: filters `signal` with both filters and keeps
    /// every second output.
    #[must_use]
    pub fn decompose_level(&self, signal: &[f64]) -> DecompositionLevel {
        let n = signal.len();
        let out_len = n.div_ceil(2);
        let mut approximation = Vec::with_capacity(out_len);
        let mut detail = Vec::with_capacity(out_len);

        for k in 0..out_len {
            let start = 2 * k;
            let (a, d) = self
                .low_pass
                .iter()
                .zip(self.high_pass.iter())
                .enumerate()
                .fold((0.0, 0.0), |(a, d), (j, (lo, hi))| {
                    let sample = signal[(start + j) % n];
                    (a + lo * sample, d + hi * sample)
                });
            approximation.push(a);
            detail.push(d);
        }

        DecompositionLevel {
            approximation,
            detail,
        }
    }

    /// Returns the low-pass decomposition filter.
    #[must_use]
    pub const fn low_pass(&self) -> &[f64; FILTER_LEN] {
        &self.low_pass
    }

    /// Returns the high-pass decomposition filter.
    #[must_use]
    pub const fn high_pass(&self) -> &[f64; FILTER_LEN] {
        &self.high_pass
    }
}

impl Default for Daubechies8 {
    fn default() -> Self {
        Self::new()
    }
}

impl WaveletTransform for Daubechies8 {
    fn decompose(
        &self,
        samples: &[f64],
        levels: usize,
    ) -> Result<Vec<DecompositionLevel>, DecompositionError> {
        if levels == 0 {
            return Err(DecompositionError::ZeroLevels);
        }

        let mut decomposition: Vec<DecompositionLevel> = Vec::with_capacity(levels);
        for level in 0..levels {
            let input = decomposition
                .last()
                .map_or(samples, |previous| previous.approximation.as_slice());
            if input.len() < FILTER_LEN {
                return Err(DecompositionError::InputTooShort {
                    level,
                    len: input.len(),
                    required: FILTER_LEN,
                });
            }
            let next = self.decompose_level(input);
            decomposition.push(next);
        }

        Ok(decomposition)
    }

    fn min_input_len(&self, levels: usize) -> usize {
        // Each level halves the length, rounding up; the input of the
        // coarsest level must still cover the whole filter. Saturates for
        // depths no input can satisfy.
        u32::try_from(levels.saturating_sub(1))
            .ok()
            .and_then(|shift| 1_usize.checked_shl(shift))
            .and_then(|scale| (FILTER_LEN - 1).checked_mul(scale))
            .and_then(|len| len.checked_add(1))
            .unwrap_or(usize::MAX)
    }
}
