use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use clap::Parser;
use tacho::config::load_config;
use tacho::{ColorScheme, GaugeCommand, Speedometer, StylePreset};

#[derive(Parser, Debug)]
#[command(name = "tacho", version, about, long_about = None)]
struct Cli {
    /// TOML config file (defaults to ./tacho.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Top of the scale
    #[arg(long)]
    max_speed: Option<f64>,

    /// Speed shown when the window opens
    #[arg(long)]
    speed: Option<f64>,

    /// standard, overlay, modern, minimal or glass
    #[arg(long)]
    style: Option<StylePreset>,

    /// Start with the dark color scheme
    #[arg(long)]
    dark: bool,

    /// TrueType/OpenType font for labels and readouts
    #[arg(long)]
    font: Option<PathBuf>,

    /// Read speeds from stdin, one number per line
    #[arg(long)]
    stdin: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref()).context("loading configuration")?;
    if let Some(max_speed) = cli.max_speed {
        config.max_speed = max_speed;
    }
    if let Some(speed) = cli.speed {
        config.initial_speed = speed;
    }
    if let Some(style) = cli.style {
        config.style = style;
    }
    if cli.dark {
        config.color_scheme = ColorScheme::Dark;
    }
    if cli.font.is_some() {
        config.font_path = cli.font;
    }

    let mut speedometer = Speedometer::new(config)?;
    if cli.stdin {
        speedometer.show_with_commands(spawn_stdin_reader())?;
    } else {
        speedometer.show()?;
    }
    Ok(())
}

/// Forwards every parsable line on stdin as a speed update.
fn spawn_stdin_reader() -> mpsc::Receiver<GaugeCommand> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            match line.trim().parse::<f64>() {
                Ok(speed) => {
                    if sender.send(GaugeCommand::SetSpeed(speed)).is_err() {
                        break;
                    }
                }
                Err(_) => log::warn!("ignoring stdin line {line:?}"),
            }
        }
        log::debug!("stdin closed");
    });
    receiver
}
