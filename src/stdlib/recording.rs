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

//! Module for live tempo estimation from an audio input device.

use crate::{EstimationError, WindowBpmEstimator};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, StreamConfig};
use std::string::ToString;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};
use std::vec::Vec;
use thiserror::Error;

/// Name of the thread that runs the estimator.
const WORKER_THREAD_NAME: &str = "tempo-estimator";

/// Possible errors when starting live tempo estimation.
#[derive(Debug, Error)]
pub enum StartTempoThreadError {
    /// There was no audio device provided and no default device can be found.
    #[error("no audio device provided and no default input device found")]
    NoDefaultAudioDevice,
    /// There was a problem detecting the input stream config.
    #[error("failed to query the input stream config")]
    InputConfigError(#[source] cpal::DefaultStreamConfigError),
    /// The sample rate of the device can't be used for tempo estimation.
    #[error("unsupported sample rate of the input device")]
    InvalidSampleRate(#[source] crate::ConfigurationError),
    /// The requested window is shorter than the estimator supports.
    #[error("window has {actual} samples but at least {required} are required")]
    WindowTooShort { required: usize, actual: usize },
    /// Failed to build an input stream.
    #[error("failed to build the input stream")]
    FailedBuildingInputStream(#[source] cpal::BuildStreamError),
    /// Failed to spawn the estimator thread.
    #[error("failed to spawn the estimator thread")]
    SpawnWorker(#[source] std::io::Error),
    /// There was a problem starting the stream.
    #[error("failed to start the input stream")]
    InputError(#[source] cpal::PlayStreamError),
}

/// Collects incoming audio samples into windows of a fixed length.
#[derive(Debug)]
struct WindowAssembler {
    window_len: usize,
    pending: Vec<f64>,
}

impl WindowAssembler {
    fn new(window_len: usize) -> Self {
        Self {
            window_len,
            pending: Vec::with_capacity(window_len),
        }
    }

    /// Appends the samples and hands every completed window to `on_window`.
    /// Samples that don't complete a window stay pending for the next call.
    fn push_samples(
        &mut self,
        samples: impl IntoIterator<Item = f32>,
        mut on_window: impl FnMut(Vec<f64>),
    ) {
        for sample in samples {
            self.pending.push(f64::from(sample));
            if self.pending.len() == self.window_len {
                let window = core::mem::replace(
                    &mut self.pending,
                    Vec::with_capacity(self.window_len),
                );
                on_window(window);
            }
        }
    }
}

/// Starts live tempo estimation on an audio input device.
///
/// The audio input is cut into consecutive windows of `window_len` samples.
/// Each complete window is sent to a dedicated worker thread that estimates
/// its tempo and invokes `on_window_bpm` with the result. The audio callback
/// itself never blocks on the estimation: if the estimation is slower than
/// real time, windows queue up.
///
/// The audio stream lives as long as the returned [`cpal::Stream`]. Once it
/// is dropped, the worker thread finishes the queued windows and exits.
pub fn start_tempo_thread(
    on_window_bpm: impl Fn(Result<f64, EstimationError>) + Send + 'static,
    preferred_input_dev: Option<cpal::Device>,
    window_len: usize,
) -> Result<cpal::Stream, StartTempoThreadError> {
    let input_dev = preferred_input_dev.map(Ok).unwrap_or_else(|| {
        let host = cpal::default_host();
        log::debug!("Using '{:?}' as input framework", host.id());
        host.default_input_device()
            .ok_or(StartTempoThreadError::NoDefaultAudioDevice)
    })?;

    log::debug!(
        "Using '{}' as input device",
        input_dev.name().unwrap_or_else(|_| "<unknown>".to_string())
    );

    let supported_input_config = input_dev
        .default_input_config()
        .map_err(StartTempoThreadError::InputConfigError)?;

    log::trace!(
        "Supported input configurations: {:#?}",
        supported_input_config
    );

    let input_config = StreamConfig {
        channels: 1,
        sample_rate: supported_input_config.sample_rate(),
        buffer_size: BufferSize::Default,
    };

    log::debug!("Input configuration: {:#?}", input_config);

    let sample_rate = f64::from(input_config.sample_rate.0);
    let estimator =
        WindowBpmEstimator::new(sample_rate).map_err(StartTempoThreadError::InvalidSampleRate)?;
    if window_len < estimator.min_window_len() {
        return Err(StartTempoThreadError::WindowTooShort {
            required: estimator.min_window_len(),
            actual: window_len,
        });
    }
    log::debug!(
        "Estimating the tempo every {window_len} samples ({} ms)",
        Duration::from_secs_f64(window_len as f64 / sample_rate).as_millis()
    );

    let (sender, receiver) = mpsc::channel::<Vec<f64>>();

    // The worker ends once the sender, owned by the audio callback, is gone.
    thread::Builder::new()
        .name(WORKER_THREAD_NAME.to_string())
        .spawn(move || {
            for window in receiver {
                let now = Instant::now();
                let estimate = estimator.estimate(&window);
                log::trace!("Tempo estimation took {:?}", now.elapsed());
                on_window_bpm(estimate);
            }
            log::debug!("Audio input closed, stopping tempo estimation");
        })
        .map_err(StartTempoThreadError::SpawnWorker)?;

    let mut assembler = WindowAssembler::new(window_len);

    // Under the hood, this spawns a thread.
    let stream = input_dev
        .build_input_stream(
            &input_config,
            move |data: &[f32], _info| {
                log::trace!(
                    "audio input callback: {} samples ({} ms, sample rate = {sample_rate})",
                    data.len(),
                    Duration::from_secs_f64(data.len() as f64 / sample_rate).as_millis()
                );

                assembler.push_samples(data.iter().copied(), |window| {
                    if sender.send(window).is_err() {
                        log::warn!("Tempo estimator is gone, dropping window");
                    }
                });
            },
            |e| {
                log::error!("Input error: {e:#?}");
            },
            // Timeout: worst case max blocking time
            // Don't see too short, as otherwise, the error callback will be
            // invoked frequently.
            // https://github.com/RustAudio/cpal/pull/696
            Some(Duration::from_secs(1)),
        )
        .map_err(StartTempoThreadError::FailedBuildingInputStream)?;

    stream.play().map_err(StartTempoThreadError::InputError)?;

    Ok(stream)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assembler_emits_complete_windows_only() {
        let mut assembler = WindowAssembler::new(4);
        let mut windows = Vec::new();

        assembler.push_samples([0.0, 1.0, 2.0], |w| windows.push(w));
        check!(windows.is_empty());

        assembler.push_samples([3.0, 4.0, 5.0, 6.0, 7.0, 8.0], |w| windows.push(w));
        check!(windows == [[0.0, 1.0, 2.0, 3.0], [4.0, 5.0, 6.0, 7.0]]);
        check!(assembler.pending == [8.0]);
    }

    #[test]
    fn assembler_converts_samples_losslessly() {
        let mut assembler = WindowAssembler::new(2);
        let mut windows = Vec::new();
        assembler.push_samples([0.25_f32, -0.1_f32], |w| windows.push(w));
        check!(windows == [[0.25, f64::from(-0.1_f32)]]);
    }

    #[test]
    fn error_messages() {
        let error = StartTempoThreadError::WindowTooShort {
            required: 121,
            actual: 64,
        };
        check!(error.to_string() == "window has 64 samples but at least 121 are required");
    }
}
