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

//! Multithreaded variant of [`analyze_track`].
//!
//! [`analyze_track`]: crate::analyze_track

use crate::{EstimationError, TrackBpmAggregator, WaveletTransform, WindowBpmEstimator};
use rayon::prelude::*;
use std::vec::Vec;

/// Like [`crate::analyze_track`], but the windows are distributed over the
/// rayon thread pool. The windows are independent, so the result is
/// identical to the sequential analysis, including the window order.
///
/// # Panics
/// If `window_len` is zero.
pub fn analyze_track_parallel<T: WaveletTransform + Sync>(
    estimator: &WindowBpmEstimator<T>,
    samples: &[f64],
    window_len: usize,
) -> TrackBpmAggregator {
    assert!(window_len > 0, "window length must not be zero");
    log::debug!(
        "analyzing {} windows on {} threads",
        samples.len() / window_len,
        rayon::current_num_threads()
    );

    // Indexed collect: results stay in window order.
    samples
        .par_chunks_exact(window_len)
        .map(|window| estimator.estimate(window))
        .collect::<Vec<Result<f64, EstimationError>>>()
        .into_iter()
        .collect()
}
