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

//! Multi-level wavelet decomposition, the first stage of the tempo analysis.
//!
//! The estimator only depends on the [`WaveletTransform`] trait, so other
//! filter families can be plugged in. [`Daubechies8`] is the default
//! implementation.

mod daubechies;

pub use daubechies::Daubechies8;

use alloc::vec::Vec;
use thiserror::Error;

/// Possible errors of a [`WaveletTransform`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecompositionError {
    /// At least one level must be requested.
    #[error("at least one decomposition level is required")]
    ZeroLevels,
    /// The input of a cascade level is shorter than the transform supports.
    #[error("input of level {level} has {len} samples but at least {required} are required")]
    InputTooShort {
        level: usize,
        len: usize,
        required: usize,
    },
    /// The transform returned a different number of levels than requested.
    #[error("expected {expected} decomposition levels but got {actual}")]
    UnexpectedLevelCount { expected: usize, actual: usize },
}

/// Coefficients of one cascade level.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecompositionLevel {
    /// Low-frequency (approximation) coefficients.
    pub approximation: Vec<f64>,
    /// High-frequency (detail) coefficients.
    pub detail: Vec<f64>,
}

/// An orthogonal multi-level cascade decomposition.
///
/// Level `0` operates on the raw samples; every following level operates on
/// the approximation coefficients of the previous level. The returned vector
/// is ordered from the finest (index `0`) to the coarsest level.
pub trait WaveletTransform {
    /// Decomposes `samples` into exactly `levels` [`DecompositionLevel`]s.
    fn decompose(
        &self,
        samples: &[f64],
        levels: usize,
    ) -> Result<Vec<DecompositionLevel>, DecompositionError>;

    /// Minimum number of input samples so that `levels` levels can be
    /// computed. Callers validate their input against this before calling
    /// [`WaveletTransform::decompose`].
    fn min_input_len(&self, levels: usize) -> usize;
}

impl<T: WaveletTransform + ?Sized> WaveletTransform for &T {
    fn decompose(
        &self,
        samples: &[f64],
        levels: usize,
    ) -> Result<Vec<DecompositionLevel>, DecompositionError> {
        (**self).decompose(samples, levels)
    }

    fn min_input_len(&self, levels: usize) -> usize {
        (**self).min_input_len(levels)
    }
}
