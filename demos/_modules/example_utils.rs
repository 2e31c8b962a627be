use cpal::traits::{DeviceTrait, HostTrait};
use log::LevelFilter;
use std::process::exit;

#[allow(unused)]
pub fn init_logger(level: LevelFilter) {
    simple_logger::SimpleLogger::new()
        .with_level(level)
        .with_colors(true)
        .with_utc_timestamps()
        .init()
        .unwrap();
}

/// Returns all valid and available input devices, together with the host
/// they belong to.
fn get_input_devices() -> Vec<(cpal::HostId, cpal::Device)> {
    cpal::available_hosts()
        .into_iter()
        .map(|host_id| {
            let host = cpal::host_from_id(host_id).expect("should know the just queried host");
            (host_id, host)
        })
        .filter_map(|(host_id, host)| host.devices().ok().map(|devices| (host_id, devices)))
        .flat_map(|(host_id, devices)| {
            devices
                // check: is input device?
                .filter(|dev| dev.default_input_config().is_ok())
                // check: can we get its name?
                .filter(|dev| dev.name().is_ok())
                .map(move |dev| (host_id, dev))
        })
        .collect::<Vec<_>>()
}

/// Prompts the user in the terminal to choose an audio input device.
#[allow(unused)]
pub fn select_audio_device() -> cpal::Device {
    let mut devices = get_input_devices();

    if devices.is_empty() {
        println!("No audio input device available");
        exit(0);
    }

    if devices.len() == 1 {
        return devices.swap_remove(0).1;
    }

    println!("Available input devices:");
    for (device_i, (host_id, device)) in devices.iter().enumerate() {
        println!(
            "[{}]: {:?} - {}",
            device_i,
            host_id,
            device
                .name()
                .expect("should be existent at that point due to the filtering")
        );
    }

    print!("Type a number and press enter: ");
    let choice = loop {
        let mut line = String::new();
        std::io::stdin().read_line(&mut line).unwrap();
        match line.trim().parse::<usize>() {
            Ok(choice) if choice < devices.len() => break choice,
            _ => print!("Invalid choice, try again: "),
        }
    };

    // Remove element and take ownership.
    devices.swap_remove(choice).1
}
