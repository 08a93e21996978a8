use rand::Rng;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tacho::{GaugeCommand, Speedometer, SpeedometerConfig, StylePreset};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = SpeedometerConfig::builder()
        .title("Random drive".to_string())
        .max_speed(240.0)
        .style(StylePreset::Modern)
        .build();

    let mut speedometer = Speedometer::new(config)?;
    speedometer.set_speed(60.0);
    speedometer.apply(GaugeCommand::ToggleTimer);
    speedometer.apply(GaugeCommand::ToggleRecording);

    let (sender, receiver) = mpsc::channel();

    // Wander toward a new target speed every few seconds and lap now and then.
    thread::spawn(move || {
        let mut rng = rand::rng();
        let mut speed: f64 = 60.0;
        let mut target: f64 = 120.0;
        let mut commands = Vec::new();
        loop {
            if rng.random_range(0.0..1.0) < 0.02 {
                target = rng.random_range(0.0..240.0);
            }
            speed += (target - speed) * 0.05 + rng.random_range(-1.5..1.5);
            commands.push(GaugeCommand::SetSpeed(speed.clamp(0.0, 240.0)));
            if rng.random_range(0.0..1.0) < 0.005 {
                commands.push(GaugeCommand::Lap);
            }

            if commands.drain(..).any(|cmd| sender.send(cmd).is_err()) {
                break;
            }

            thread::sleep(Duration::from_millis(100));
        }
    });

    println!(
        "{}: starting at {} {}",
        speedometer.config().title,
        speedometer.speed(),
        speedometer.config().unit_label
    );
    println!("- Timer and recording start right away");
    println!("- Laps are recorded at random");
    println!("- Keyboard shortcuts still work; Esc quits");

    speedometer.show_with_commands(receiver)?;
    Ok(())
}
