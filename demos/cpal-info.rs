use cpal::traits::DeviceTrait;

#[path = "_modules/example_utils.rs"]
mod example_utils;

/// Prints the supported input configs of the selected device. The tempo
/// estimation uses the sample rate of the device's default config, so this
/// helps to understand what window length in seconds a given sample count is.
fn main() {
    let input_device = example_utils::select_audio_device();
    let default_config = input_device.default_input_config().unwrap();
    println!(
        "Default input config: channels: {}, sample rate: {:?}",
        default_config.channels(),
        default_config.sample_rate()
    );

    let supported_configs = input_device
        .supported_input_configs()
        .unwrap()
        .collect::<Vec<_>>();
    println!("Supported input configs:");
    for cfg in supported_configs {
        println!(
            "channels: {:>2}, format: {format:>3}, min_rate: {:06?}, max_rate: {:06?}, buffer: {:?}",
            cfg.channels(),
            cfg.min_sample_rate(),
            cfg.max_sample_rate(),
            cfg.buffer_size(),
            format = format!("{:?}", cfg.sample_format(),)
        );
    }
}
