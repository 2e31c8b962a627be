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

//! Module for [`WindowBpmEstimator`].

use crate::config::{ConfigurationError, EstimatorConfig, TempoSearch};
use crate::correlation::{correlate, detect_peak};
use crate::envelope::{approximation_envelope, combine, detail_envelope};
use crate::wavelet::{Daubechies8, DecompositionError, WaveletTransform};
use alloc::vec::Vec;
use thiserror::Error;

/// Possible errors when estimating the tempo of a single window.
///
/// All of them only invalidate the estimate of that window.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimationError {
    /// Invalid sample rate or tempo bounds.
    #[error("invalid configuration")]
    Configuration(#[from] ConfigurationError),
    /// The window is too short for the requested decomposition depth.
    #[error("window has {actual} samples but at least {required} are required")]
    WindowTooShort { required: usize, actual: usize },
    /// The window contains a NaN or infinite sample.
    #[error("sample #{index} is not a finite number")]
    NonFiniteSample { index: usize },
    /// The combined envelope does not reach into the lag search range.
    #[error("combined envelope has {len} samples which does not reach the minimum lag {min_index}")]
    EnvelopeTooShort { len: usize, min_index: usize },
    /// The wavelet transform failed.
    #[error("wavelet decomposition failed")]
    Decomposition(#[from] DecompositionError),
    /// The correlogram has no extremum in the search range, i.e., it is all
    /// zero there. This happens for silence, for example.
    #[error("no peak found in the correlogram")]
    NoPeakFound,
}

/// Estimates the tempo of one fixed-size window of mono samples.
///
/// The estimator follows the wavelet-based approach of Tzanetakis, Essl and
/// Cook ("Audio Analysis using the Discrete Wavelet Transform"):
/// 1. decompose the window into `levels` frequency sub-bands,
/// 2. extract an envelope per sub-band (decimate, rectify, remove mean),
/// 3. sum the envelopes together with the envelope of the coarsest
///    approximation,
/// 4. autocorrelate the sum and search the strongest peak within the lag
///    range of the configured tempo bounds,
/// 5. convert the lag of that peak into beats per minute.
///
/// The estimator is an immutable value. Create it once per track or session
/// and call [`WindowBpmEstimator::estimate`] for every window. Windows are
/// independent of each other, so they can be processed in parallel.
///
/// ## Example
/// ```rust
/// use wavelet_bpm_detector::WindowBpmEstimator;
///
/// let estimator = WindowBpmEstimator::new(44100.0).unwrap();
/// let silence = vec![0.0; 131072];
/// assert!(estimator.estimate(&silence).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct WindowBpmEstimator<T = Daubechies8> {
    search: TempoSearch,
    transform: T,
}

impl WindowBpmEstimator<Daubechies8> {
    /// Creates an estimator with the default [`EstimatorConfig`] and the
    /// [`Daubechies8`] transform.
    pub fn new(sample_rate_hz: f64) -> Result<Self, ConfigurationError> {
        Self::with_config(sample_rate_hz, EstimatorConfig::default())
    }

    /// Creates an estimator with a custom [`EstimatorConfig`] and the
    /// [`Daubechies8`] transform.
    pub fn with_config(
        sample_rate_hz: f64,
        config: EstimatorConfig,
    ) -> Result<Self, ConfigurationError> {
        Self::with_transform(sample_rate_hz, config, Daubechies8::new())
    }
}

impl<T: WaveletTransform> WindowBpmEstimator<T> {
    /// Creates an estimator that uses the given wavelet transform.
    pub fn with_transform(
        sample_rate_hz: f64,
        config: EstimatorConfig,
        transform: T,
    ) -> Result<Self, ConfigurationError> {
        let search = TempoSearch::new(sample_rate_hz, config)?;
        log::trace!(
            "tempo search: sample rate {sample_rate_hz} Hz, lags {}..{}, max decimation {}",
            search.min_index(),
            search.max_index(),
            search.max_decimation()
        );
        Ok(Self { search, transform })
    }

    /// Returns the validated search parameters.
    #[must_use]
    pub const fn search(&self) -> &TempoSearch {
        &self.search
    }

    /// Minimum window length that the wavelet transform accepts. Note that
    /// a window must be considerably longer in practice, so that the
    /// combined envelope reaches [`TempoSearch::min_index`].
    #[must_use]
    pub fn min_window_len(&self) -> usize {
        self.transform.min_input_len(self.search.levels())
    }

    /// Estimates the tempo of the given window of mono samples in beats per
    /// minute.
    pub fn estimate(&self, samples: &[f64]) -> Result<f64, EstimationError> {
        let levels = self.search.levels();

        let required = self.min_window_len();
        if samples.len() < required {
            return Err(EstimationError::WindowTooShort {
                required,
                actual: samples.len(),
            });
        }

        // A single NaN would spread over the whole correlogram.
        if let Some(index) = samples.iter().position(|sample| !sample.is_finite()) {
            return Err(EstimationError::NonFiniteSample { index });
        }

        let decomposition = self.transform.decompose(samples, levels)?;
        let coarsest = match decomposition.last() {
            Some(coarsest) if decomposition.len() == levels => coarsest,
            _ => {
                return Err(DecompositionError::UnexpectedLevelCount {
                    expected: levels,
                    actual: decomposition.len(),
                }
                .into())
            }
        };

        // The finest level is decimated the most so that all envelopes end
        // up with (roughly) the same length.
        let mut envelopes = Vec::with_capacity(levels + 1);
        let mut pace = self.search.max_decimation();
        for level in &decomposition {
            envelopes.push(detail_envelope(&level.detail, pace));
            pace >>= 1;
        }
        envelopes.push(approximation_envelope(&coarsest.approximation));

        let combined = combine(envelopes);
        let min_index = self.search.min_index();
        if combined.len() <= min_index {
            return Err(EstimationError::EnvelopeTooShort {
                len: combined.len(),
                min_index,
            });
        }

        let correlogram = correlate(&combined);
        let max_index = self.search.max_index().min(correlogram.len());
        let location = detect_peak(&correlogram[min_index..max_index])
            .ok_or(EstimationError::NoPeakFound)?;

        let lag = min_index + location;
        let bpm = self.search.lag_to_bpm(lag);
        log::trace!(
            "window of {} samples: envelope length {}, searched lags {min_index}..{max_index}, peak at lag {lag} => {bpm:.2} BPM",
            samples.len(),
            combined.len()
        );
        Ok(bpm)
    }
}
