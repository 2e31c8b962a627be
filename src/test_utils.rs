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

use crate::util::{f64_to_pcm16, pcm16_interleaved_to_mono};
use std::path::{Path, PathBuf};
use std::vec::Vec;

/// Reads a 16-bit WAV file to mono audio. Returns the samples as mono audio
/// in range `-1.0..=1.0`. Additionally, it returns the header of the file.
pub fn read_wav_to_mono<T: AsRef<Path>>(file: T) -> (Vec<f64>, hound::WavSpec) {
    let mut reader = hound::WavReader::open(file).unwrap();
    let header = reader.spec();

    let interleaved = reader
        .samples::<i16>()
        .map(|s| s.unwrap())
        .collect::<Vec<_>>();
    let data = pcm16_interleaved_to_mono(&interleaved, usize::from(header.channels)).collect();
    (data, header)
}

/// Writes mono samples in range `-1.0..=1.0` as 16-bit WAV file.
pub fn write_wav_mono<T: AsRef<Path>>(file: T, samples: &[f64], sample_rate: u32) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(file, spec).unwrap();
    for &sample in samples {
        writer
            .write_sample(f64_to_pcm16(sample).unwrap())
            .unwrap();
    }
    writer.finalize().unwrap();
}

/// Returns the cargo target dir.
pub fn target_dir() -> PathBuf {
    // 1. Check if CARGO_TARGET_DIR is set
    if let Ok(dir) = std::env::var("CARGO_TARGET_DIR") {
        PathBuf::from(dir)
    } else {
        // 2. Fall back to default: go up from CARGO_MANIFEST_DIR
        let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        manifest_dir.join("target")
    }
}

/// Returns a directory within the cargo target dir to store test artifacts.
/// The directory exists once this returns.
pub fn target_dir_test_artifacts() -> PathBuf {
    let mut path = target_dir();
    path.push("test_generated");
    std::fs::create_dir_all(&path).unwrap();
    path
}

/// Synthetic audio fixtures. There are no recordings in this repository, so
/// all tests work on generated signals with a known tempo.
pub mod samples {
    use super::*;
    use core::f64::consts::PI;

    /// Duration of a single click.
    const CLICK_DURATION_S: f64 = 0.1;
    /// Pitch of the click. Low, like a kick drum.
    const CLICK_FREQUENCY_HZ: f64 = 100.0;
    /// Time constant of the exponential decay of the click.
    const CLICK_DECAY_S: f64 = 0.02;
    const CLICK_AMPLITUDE: f64 = 0.8;

    /// Returns `len` samples of a click track with exactly `bpm` beats per
    /// minute. The first click starts at sample `0`.
    pub fn click_track(sample_rate_hz: f64, bpm: f64, len: usize) -> Vec<f64> {
        let period = 60.0 / bpm * sample_rate_hz;
        let click_len = (CLICK_DURATION_S * sample_rate_hz) as usize;

        let mut samples = std::vec![0.0; len];
        let beat_starts = (0..)
            .map(|beat| libm::round(beat as f64 * period) as usize)
            .take_while(|&start| start < len);
        for start in beat_starts {
            let end = (start + click_len).min(len);
            for (i, sample) in samples[start..end].iter_mut().enumerate() {
                let t = i as f64 / sample_rate_hz;
                *sample = CLICK_AMPLITUDE
                    * libm::sin(2.0 * PI * CLICK_FREQUENCY_HZ * t)
                    * libm::exp(-t / CLICK_DECAY_S);
            }
        }
        samples
    }

    /// Returns `len` samples of digital silence.
    pub fn silence(len: usize) -> Vec<f64> {
        std::vec![0.0; len]
    }

    #[test]
    fn click_track_is_periodic() {
        let samples = click_track(44100.0, 120.0, 44100 * 2);
        check!(samples.len() == 88200);
        check!(samples.iter().all(|s| libm::fabs(*s) <= CLICK_AMPLITUDE));

        // Four clicks in two seconds, one every 22050 samples.
        for start in [0, 22050, 44100, 66150] {
            check!(samples[start + 10] != 0.0);
            check!(samples[start + 10] == samples[10]);
            check!(samples[start + 5000] == 0.0);
        }
    }

    #[test]
    fn wav_round_trip() {
        let samples = click_track(44100.0, 120.0, 4410);
        let mut path = target_dir_test_artifacts();
        path.push("wav_round_trip.wav");

        write_wav_mono(&path, &samples, 44100);
        let (read, header) = read_wav_to_mono(&path);

        check!(header.sample_rate == 44100);
        check!(header.channels == 1);
        check!(read.len() == samples.len());
        for (a, b) in read.iter().zip(&samples) {
            check!(approx_eq!(f64, *a, *b, epsilon = 1e-4));
        }
    }
}
