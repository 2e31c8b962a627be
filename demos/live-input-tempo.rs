//! Estimates the tempo of the audio input in windows of roughly three
//! seconds and prints a running track tempo (median of all windows so far).

use log::LevelFilter;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wavelet_bpm_detector::stdlib::recording;
use wavelet_bpm_detector::{TrackBpmAggregator, DEFAULT_WINDOW_LEN};

#[path = "_modules/example_utils.rs"]
mod example_utils;

fn main() {
    example_utils::init_logger(LevelFilter::Debug);
    let input_device = example_utils::select_audio_device();

    let stop_recording = Arc::new(AtomicBool::new(false));
    {
        let stop_recording = stop_recording.clone();
        ctrlc::set_handler(move || {
            stop_recording.store(true, Ordering::SeqCst);
        })
        .unwrap();
    }

    let aggregator = Arc::new(Mutex::new(TrackBpmAggregator::new()));
    let _stream = {
        let aggregator = aggregator.clone();
        recording::start_tempo_thread(
            move |estimate| {
                let mut aggregator = aggregator.lock().unwrap();
                match &estimate {
                    Ok(bpm) => println!("window: {bpm:.1} BPM"),
                    Err(e) => println!("window: no tempo ({e})"),
                }
                aggregator.push(estimate);
                if let Ok(bpm) = aggregator.track_bpm() {
                    println!(
                        "track:  {bpm:.1} BPM ({} of {} windows valid)",
                        aggregator.valid_count(),
                        aggregator.len()
                    );
                }
            },
            Some(input_device),
            DEFAULT_WINDOW_LEN,
        )
        .unwrap()
    };

    log::info!("Start recording");
    while !stop_recording.load(Ordering::SeqCst) {
        std::thread::sleep(Duration::from_millis(100));
    }
    log::info!("Stopped recording");
}
