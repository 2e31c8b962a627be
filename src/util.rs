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

//! Conversion between 16-bit PCM, as delivered by WAV files and many audio
//! devices, and the `f64` samples in range `-1.0..=1.0` that the estimator
//! works on.

use thiserror::Error;

const PCM16_FULL_SCALE: f64 = i16::MAX as f64;

/// The sample is out of range `-1.0..=1.0` or not a number.
#[derive(Copy, Clone, Debug, PartialEq, Error)]
#[error("sample {0} is outside of -1.0..=1.0")]
pub struct OutOfRangeError(pub f64);

/// Converts a 16-bit PCM sample to `-1.0..=1.0`. `i16::MIN` is clamped to
/// `-1.0`, so the range is symmetric.
#[inline]
#[must_use]
pub fn pcm16_to_f64(sample: i16) -> f64 {
    (f64::from(sample) / PCM16_FULL_SCALE).max(-1.0)
}

/// Converts a sample in range `-1.0..=1.0` to 16-bit PCM, rounding to the
/// nearest step.
#[inline]
pub fn f64_to_pcm16(sample: f64) -> Result<i16, OutOfRangeError> {
    if (-1.0..=1.0).contains(&sample) {
        Ok(libm::round(sample * PCM16_FULL_SCALE) as i16)
    } else {
        Err(OutOfRangeError(sample))
    }
}

/// Mixes interleaved PCM frames of `channels` samples down to mono by
/// averaging all channels of a frame. A trailing incomplete frame is
/// dropped.
///
/// # Panics
/// If `channels` is zero.
pub fn pcm16_interleaved_to_mono(
    interleaved: &[i16],
    channels: usize,
) -> impl Iterator<Item = f64> + '_ {
    assert!(channels > 0, "a frame needs at least one channel");
    interleaved.chunks_exact(channels).map(move |frame| {
        frame.iter().copied().map(pcm16_to_f64).sum::<f64>() / channels as f64
    })
}
