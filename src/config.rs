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

//! Configuration of the estimator and the index math that ties the physical
//! tempo bounds to positions in the correlogram.
//!
//! All values are validated once, when a [`TempoSearch`] is created. A
//! [`TempoSearch`] is never mutated afterwards.

use thiserror::Error;

/// Default number of wavelet decomposition levels.
pub const DEFAULT_LEVELS: usize = 4;

/// Default slowest tempo that can be detected.
pub const DEFAULT_MIN_TEMPO_BPM: f64 = 40.0;

/// Default fastest tempo that can be detected.
pub const DEFAULT_MAX_TEMPO_BPM: f64 = 220.0;

/// Upper limit for the decomposition depth. The decimation factor is
/// `2^(levels - 1)`, so this keeps it far away from overflowing.
const MAX_LEVELS: usize = 16;

const SECONDS_PER_MINUTE: f64 = 60.0;

/// Possible errors when validating an [`EstimatorConfig`] together with a
/// sample rate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// The sample rate is not a positive, finite number.
    #[error("invalid sample rate: {0} Hz")]
    InvalidSampleRate(f64),
    /// The decomposition depth is zero or unreasonably deep.
    #[error("invalid number of decomposition levels: {0} (must be in 1..=16)")]
    InvalidLevels(usize),
    /// The tempo bounds are not finite, not positive, or not ascending.
    #[error("invalid tempo range: {min} BPM..{max} BPM")]
    InvalidTempoRange { min: f64, max: f64 },
    /// The fastest tempo maps to a lag of zero samples, i.e., the sample rate
    /// is too low for the configured decimation.
    #[error("the fastest tempo maps to a lag of zero decimated samples")]
    ZeroMinimumLag,
    /// The tempo bounds collapse to an empty lag range.
    #[error("tempo search range collapsed: min index {min_index} >= max index {max_index}")]
    CollapsedSearchRange { min_index: usize, max_index: usize },
}

/// User-facing configuration of the BPM estimation.
///
/// `min_tempo_bpm` is the *slowest* and `max_tempo_bpm` the *fastest* tempo
/// that can be reported. Note the inversion in lag space: the fastest tempo
/// yields the smallest lag index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatorConfig {
    /// Number of wavelet decomposition levels.
    pub levels: usize,
    /// Slowest detectable tempo.
    pub min_tempo_bpm: f64,
    /// Fastest detectable tempo.
    pub max_tempo_bpm: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            levels: DEFAULT_LEVELS,
            min_tempo_bpm: DEFAULT_MIN_TEMPO_BPM,
            max_tempo_bpm: DEFAULT_MAX_TEMPO_BPM,
        }
    }
}

/// Validated combination of sample rate and [`EstimatorConfig`], expressed
/// in the lag space of the combined envelope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempoSearch {
    sample_rate_hz: f64,
    levels: usize,
    max_decimation: usize,
    min_index: usize,
    max_index: usize,
}

impl TempoSearch {
    /// Validates the sample rate and the configuration and calculates the
    /// lag bounds of the peak search:
    ///
    /// - `min_index = floor(60 / max_tempo * sample_rate / max_decimation)`
    /// - `max_index = floor(60 / min_tempo * sample_rate / max_decimation)`
    pub fn new(sample_rate_hz: f64, config: EstimatorConfig) -> Result<Self, ConfigurationError> {
        if !sample_rate_hz.is_finite() || sample_rate_hz <= 0.0 {
            return Err(ConfigurationError::InvalidSampleRate(sample_rate_hz));
        }

        if config.levels == 0 || config.levels > MAX_LEVELS {
            return Err(ConfigurationError::InvalidLevels(config.levels));
        }

        let EstimatorConfig {
            min_tempo_bpm: min,
            max_tempo_bpm: max,
            ..
        } = config;
        if !min.is_finite() || !max.is_finite() || min <= 0.0 || min >= max {
            return Err(ConfigurationError::InvalidTempoRange { min, max });
        }

        let max_decimation = 1_usize << (config.levels - 1);
        let decimated_rate = sample_rate_hz / max_decimation as f64;
        let min_index = libm::floor(SECONDS_PER_MINUTE / max * decimated_rate) as usize;
        let max_index = libm::floor(SECONDS_PER_MINUTE / min * decimated_rate) as usize;

        if min_index == 0 {
            return Err(ConfigurationError::ZeroMinimumLag);
        }
        if min_index >= max_index {
            return Err(ConfigurationError::CollapsedSearchRange {
                min_index,
                max_index,
            });
        }

        Ok(Self {
            sample_rate_hz,
            levels: config.levels,
            max_decimation,
            min_index,
            max_index,
        })
    }

    /// Returns the sample rate (Hz).
    #[must_use]
    pub const fn sample_rate_hz(&self) -> f64 {
        self.sample_rate_hz
    }

    /// Returns the number of decomposition levels.
    #[must_use]
    pub const fn levels(&self) -> usize {
        self.levels
    }

    /// Returns `2^(levels - 1)`, the decimation applied to the finest level.
    #[must_use]
    pub const fn max_decimation(&self) -> usize {
        self.max_decimation
    }

    /// First lag (inclusive) of the peak search. Corresponds to the fastest
    /// tempo.
    #[must_use]
    pub const fn min_index(&self) -> usize {
        self.min_index
    }

    /// Last lag (exclusive) of the peak search. Corresponds to the slowest
    /// tempo.
    #[must_use]
    pub const fn max_index(&self) -> usize {
        self.max_index
    }

    /// Converts a lag of the correlogram into beats per minute.
    ///
    /// `lag` must not be zero; [`TempoSearch::new`] guarantees that every lag
    /// of the search range is positive.
    #[must_use]
    pub fn lag_to_bpm(&self, lag: usize) -> f64 {
        debug_assert!(lag > 0);
        SECONDS_PER_MINUTE / lag as f64 * (self.sample_rate_hz / self.max_decimation as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = EstimatorConfig::default();
        check!(config.levels == 4);
        check!(config.min_tempo_bpm == 40.0);
        check!(config.max_tempo_bpm == 220.0);
    }

    #[test]
    fn index_math_at_44100_hz() {
        let search = TempoSearch::new(44100.0, EstimatorConfig::default()).unwrap();
        check!(search.max_decimation() == 8);
        // floor(60 / 220 * 44100 / 8) and floor(60 / 40 * 44100 / 8)
        check!(search.min_index() == 1503);
        check!(search.max_index() == 8268);
    }

    #[test]
    fn index_math_at_48000_hz() {
        let search = TempoSearch::new(48000.0, EstimatorConfig::default()).unwrap();
        check!(search.min_index() == 1636);
        check!(search.max_index() == 9000);
    }

    #[test]
    fn max_decimation_follows_levels() {
        for (levels, expected) in [(1, 1), (2, 2), (3, 4), (4, 8), (5, 16)] {
            let config = EstimatorConfig {
                levels,
                ..Default::default()
            };
            let search = TempoSearch::new(44100.0, config).unwrap();
            check!(search.max_decimation() == expected);
        }
    }

    #[test]
    fn lag_to_bpm_inverts_index_math() {
        let search = TempoSearch::new(44100.0, EstimatorConfig::default()).unwrap();
        // Half a second (one beat at 120 BPM) in decimated samples.
        let lag = 2756;
        check!(approx_eq!(
            f64,
            search.lag_to_bpm(lag),
            120.0,
            epsilon = 0.05
        ));

        let fastest = search.lag_to_bpm(search.min_index());
        let slowest = search.lag_to_bpm(search.max_index());
        check!(fastest <= 220.1);
        check!(fastest > 219.0);
        check!(slowest >= 40.0);
        check!(slowest < 40.1);
    }

    #[test]
    fn rejects_invalid_sample_rates() {
        let config = EstimatorConfig::default();
        check!(TempoSearch::new(0.0, config) == Err(ConfigurationError::InvalidSampleRate(0.0)));
        check!(
            TempoSearch::new(-44100.0, config)
                == Err(ConfigurationError::InvalidSampleRate(-44100.0))
        );
        check!(matches!(
            TempoSearch::new(f64::NAN, config),
            Err(ConfigurationError::InvalidSampleRate(_))
        ));
        check!(matches!(
            TempoSearch::new(f64::INFINITY, config),
            Err(ConfigurationError::InvalidSampleRate(_))
        ));
    }

    #[test]
    fn rejects_invalid_levels() {
        for levels in [0, 17] {
            let config = EstimatorConfig {
                levels,
                ..Default::default()
            };
            check!(
                TempoSearch::new(44100.0, config) == Err(ConfigurationError::InvalidLevels(levels))
            );
        }
    }

    #[test]
    fn rejects_invalid_tempo_ranges() {
        for (min, max) in [(220.0, 40.0), (120.0, 120.0), (0.0, 120.0), (f64::NAN, 120.0)] {
            let config = EstimatorConfig {
                min_tempo_bpm: min,
                max_tempo_bpm: max,
                ..Default::default()
            };
            check!(matches!(
                TempoSearch::new(44100.0, config),
                Err(ConfigurationError::InvalidTempoRange { .. })
            ));
        }
    }

    #[test]
    fn rejects_zero_minimum_lag() {
        // 20 Hz / 8 = 2.5 Hz effective rate: floor(60 / 220 * 2.5) == 0
        check!(
            TempoSearch::new(20.0, EstimatorConfig::default())
                == Err(ConfigurationError::ZeroMinimumLag)
        );
    }

    #[test]
    fn rejects_collapsed_search_range() {
        let config = EstimatorConfig {
            min_tempo_bpm: 119.0,
            max_tempo_bpm: 120.0,
            ..Default::default()
        };
        // 80 Hz / 8 = 10 Hz effective rate: floor(5.0) == floor(5.04)
        check!(
            TempoSearch::new(80.0, config)
                == Err(ConfigurationError::CollapsedSearchRange {
                    min_index: 5,
                    max_index: 5
                })
        );
    }
}
