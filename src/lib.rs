// ============================================================================
// CRATE CONFIGURATION & IMPORTS
// ============================================================================

pub mod config;
pub mod error;
pub mod geometry;
pub mod render;
pub mod session;
pub mod style;

pub use config::{ConfigError, SpeedometerConfig};
pub use error::{Error, Result};
pub use geometry::{
    generate_ticks, map_angle, ArcRange, GaugeError, GaugeFace, GaugeReading, TickSpec,
};
pub use session::{format_clock, Countdown, LapSummary, Recording, TimerSession};
pub use style::{Color, ColorScheme, GaugeStyle, Ring, StylePreset};

// External crate imports
use pixels::{Pixels, SurfaceTexture};
use rusttype::Font;

// Standard library imports
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

// Window management imports
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowBuilder;

use render::{Canvas, DrawCommand, GaugeFrame, PanelFrame, Scene, ScreenLayout};

// ============================================================================
// PUBLIC API - MAIN INTERFACE
// ============================================================================

/// Command enum for type-safe speedometer updates
#[derive(Debug, Clone, PartialEq)]
pub enum GaugeCommand {
    SetSpeed(f64),
    SetStyle(StylePreset),
    SetColorScheme(ColorScheme),
    ToggleTimer,
    ResetTimer,
    Lap,
    DeleteLap(usize),
    ToggleCountdown,
    ResetCountdown,
    AddCountdownMinutes(i64),
    SynchronizeCountdown,
    ToggleRecording,
}

/// Main speedometer struct - the primary public interface
#[derive(Debug, Clone)]
pub struct Speedometer {
    config: SpeedometerConfig,
    state: AppState,
}

impl Speedometer {
    /// Validates `config` and sets the gauge to its initial speed.
    pub fn new(config: SpeedometerConfig) -> Result<Self> {
        config.validate()?;
        let state = AppState::new(&config)?;
        Ok(Self { config, state })
    }

    pub fn config(&self) -> &SpeedometerConfig {
        &self.config
    }

    pub fn speed(&self) -> f64 {
        self.state.speed
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.state.set_speed(speed);
    }

    pub fn apply(&mut self, command: GaugeCommand) {
        self.state.apply(command);
    }

    pub fn show(&mut self) -> Result<()> {
        self.run_window(None)
    }

    pub fn show_with_commands(&mut self, receiver: Receiver<GaugeCommand>) -> Result<()> {
        self.run_window(Some(receiver))
    }

    fn run_window(&mut self, receiver: Option<Receiver<GaugeCommand>>) -> Result<()> {
        let font = render::load_font(self.config.font_path.as_deref())?;

        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(
                self.config.window_width as f64,
                self.config.window_height as f64,
            ))
            .with_resizable(false)
            .build(&event_loop)?;

        let window = std::sync::Arc::new(window);
        let window_clone = window.clone();
        let size = window.inner_size();
        let mut fb_width = size.width as usize;
        let mut fb_height = size.height as usize;
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let mut pixels = Pixels::new(size.width, size.height, surface_texture)?;

        let frame_duration = Duration::from_secs_f64(1.0 / self.config.max_framerate);
        let tick_interval = Duration::from_millis(self.config.tick_interval_ms);
        let mut last_frame = Instant::now();
        let mut last_tick = Instant::now();
        let mut cursor = (0.0, 0.0);
        let mut dragging = false;

        log::info!(
            "speedometer window {}x{} ({} style)",
            fb_width,
            fb_height,
            self.state.preset
        );

        let unit_label = self.config.unit_label.clone();
        let state = &mut self.state;
        let mut render_error = None;

        event_loop.run(|event, window_target| {
            window_target.set_control_flow(ControlFlow::Poll);
            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        fb_width = new_size.width as usize;
                        fb_height = new_size.height as usize;
                        if let Err(e) = pixels.resize_buffer(new_size.width, new_size.height) {
                            log::warn!("resize buffer failed: {e}");
                        }
                        if let Err(e) = pixels.resize_surface(new_size.width, new_size.height) {
                            log::warn!("resize surface failed: {e}");
                        }
                    }
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                logical_key,
                                state: ElementState::Pressed,
                                ..
                            },
                        ..
                    } => {
                        if logical_key == Key::Named(NamedKey::Escape) {
                            window_target.exit();
                        } else if let Some(command) = command_for_key(logical_key.as_ref(), state) {
                            state.apply(command);
                        }
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        cursor = (position.x, position.y);
                        if dragging {
                            let layout = ScreenLayout::new(fb_width, fb_height);
                            state.set_speed_fraction(layout.slider.fraction_at(cursor.0));
                        }
                    }
                    WindowEvent::MouseInput {
                        state: button_state,
                        button: MouseButton::Left,
                        ..
                    } => {
                        let layout = ScreenLayout::new(fb_width, fb_height);
                        dragging = button_state == ElementState::Pressed
                            && layout.slider.contains(cursor.0, cursor.1);
                        if dragging {
                            state.set_speed_fraction(layout.slider.fraction_at(cursor.0));
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        if let Some(ref receiver) = receiver {
                            state.update_with_commands(receiver);
                        } else {
                            state.update();
                        }

                        let layout = ScreenLayout::new(fb_width, fb_height);
                        let frame = pixels.frame_mut();
                        let mut canvas = Canvas::new(frame, fb_width, fb_height);
                        render_screen(&mut canvas, &layout, state, font.as_ref(), &unit_label);
                        if let Err(e) = pixels.render() {
                            log::error!("render failed: {e}");
                            render_error = Some(e);
                            window_target.exit();
                        }
                    }
                    _ => {}
                },
                Event::AboutToWait => {
                    while last_tick.elapsed() >= tick_interval {
                        state.tick();
                        last_tick += tick_interval;
                    }
                    if last_frame.elapsed() >= frame_duration {
                        window_clone.request_redraw();
                        last_frame = Instant::now();
                    }
                }
                _ => {}
            }
        })?;

        match render_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}

// ============================================================================
// APPLICATION STATE (INTERNAL)
// ============================================================================

#[derive(Debug, Clone)]
struct AppState {
    face: GaugeFace,
    preset: StylePreset,
    scheme: ColorScheme,
    style: GaugeStyle,
    speed: f64,
    speed_step: f64,
    needle_value: f64,
    lerp_factor: f64,
    timer: TimerSession,
    countdown: Countdown,
    recording: Recording,
}

impl AppState {
    fn new(config: &SpeedometerConfig) -> Result<Self> {
        let face = config.gauge_face()?;
        let speed = face.clamp(config.initial_speed);
        Ok(Self {
            preset: config.style,
            scheme: config.color_scheme,
            style: config.gauge_style(),
            speed,
            speed_step: config.speed_step,
            needle_value: speed,
            lerp_factor: config.needle_lerp_factor,
            timer: TimerSession::new().update_speed(speed),
            countdown: Countdown::new(config.countdown_reset_seconds),
            recording: Recording::default(),
            face,
        })
    }

    /// Clamps onto the scale and snaps to the slider step.
    fn set_speed(&mut self, speed: f64) {
        let snapped = (speed / self.speed_step).round() * self.speed_step;
        self.speed = self.face.clamp(snapped);
        let speed = self.speed;
        self.update_timer(|t| t.update_speed(speed));
    }

    fn set_speed_fraction(&mut self, fraction: f64) {
        self.set_speed(fraction * self.face.max_value());
    }

    fn set_look(&mut self, preset: StylePreset, scheme: ColorScheme) {
        self.preset = preset;
        self.scheme = scheme;
        self.style = preset.resolve(scheme);
        log::debug!("style {preset} ({scheme})");
    }

    fn update_timer(&mut self, transition: impl FnOnce(TimerSession) -> TimerSession) {
        self.timer = transition(std::mem::take(&mut self.timer));
    }

    fn apply(&mut self, command: GaugeCommand) {
        match command {
            GaugeCommand::SetSpeed(speed) => self.set_speed(speed),
            GaugeCommand::SetStyle(preset) => self.set_look(preset, self.scheme),
            GaugeCommand::SetColorScheme(scheme) => self.set_look(self.preset, scheme),
            GaugeCommand::ToggleTimer => self.update_timer(TimerSession::toggle),
            GaugeCommand::ResetTimer => self.update_timer(TimerSession::reset),
            GaugeCommand::Lap => self.update_timer(TimerSession::lap),
            GaugeCommand::DeleteLap(index) => self.update_timer(|t| t.delete_lap(index)),
            GaugeCommand::ToggleCountdown => self.countdown = self.countdown.toggle(),
            GaugeCommand::ResetCountdown => self.countdown = self.countdown.reset(),
            GaugeCommand::AddCountdownMinutes(minutes) => {
                self.countdown = self.countdown.add_minutes(minutes)
            }
            GaugeCommand::SynchronizeCountdown => self.countdown = self.countdown.synchronize(),
            GaugeCommand::ToggleRecording => self.recording = self.recording.toggle(),
        }
    }

    /// Eases the needle toward the current speed.
    fn update(&mut self) {
        self.needle_value = lerp(self.needle_value, self.speed, self.lerp_factor);
        if (self.needle_value - self.speed).abs() < 0.01 {
            self.needle_value = self.speed;
        }
    }

    fn update_with_commands(&mut self, receiver: &Receiver<GaugeCommand>) {
        // Drain without blocking; the latest command wins.
        while let Ok(command) = receiver.try_recv() {
            self.apply(command);
        }
        self.update();
    }

    /// One wall-clock tick for the timer, countdown and recording.
    fn tick(&mut self) {
        self.update_timer(TimerSession::tick);
        self.countdown = self.countdown.tick();
        self.recording = self.recording.tick();
    }
}

fn command_for_key(key: Key<&str>, state: &AppState) -> Option<GaugeCommand> {
    let command = match key {
        Key::Named(NamedKey::ArrowUp) | Key::Character("+") => {
            GaugeCommand::SetSpeed(state.speed + state.speed_step)
        }
        Key::Named(NamedKey::ArrowDown) | Key::Character("-") => {
            GaugeCommand::SetSpeed(state.speed - state.speed_step)
        }
        Key::Named(NamedKey::Space) => GaugeCommand::ToggleTimer,
        Key::Named(NamedKey::Enter) => GaugeCommand::ToggleRecording,
        Key::Character("r") => GaugeCommand::ResetTimer,
        Key::Character("l") => GaugeCommand::Lap,
        Key::Character("d") => {
            let count = state.timer.lap_count();
            if count == 0 {
                return None;
            }
            GaugeCommand::DeleteLap(count - 1)
        }
        Key::Character("s") => GaugeCommand::SetStyle(state.preset.next()),
        Key::Character("t") => GaugeCommand::SetColorScheme(state.scheme.toggled()),
        Key::Character("c") => GaugeCommand::ToggleCountdown,
        Key::Character("x") => GaugeCommand::ResetCountdown,
        Key::Character("[") => GaugeCommand::AddCountdownMinutes(-1),
        Key::Character("]") => GaugeCommand::AddCountdownMinutes(1),
        Key::Character("y") => GaugeCommand::SynchronizeCountdown,
        _ => return None,
    };
    Some(command)
}

fn lerp(current: f64, target: f64, factor: f64) -> f64 {
    current + (target - current) * factor
}

// ============================================================================
// RENDERING
// ============================================================================

fn render_screen(
    canvas: &mut Canvas,
    layout: &ScreenLayout,
    state: &AppState,
    font: Option<&Font<'static>>,
    unit_label: &str,
) {
    let mut scene = Scene::new();
    scene.add_command(DrawCommand::Clear(state.style.panel_background));

    render::add_gauge(
        &mut scene,
        &layout.gauge,
        &GaugeFrame {
            face: &state.face,
            style: &state.style,
            needle_value: state.needle_value,
            readout_value: state.speed,
            unit_label,
        },
    );
    render::add_panel(
        &mut scene,
        layout,
        &state.style,
        &PanelFrame {
            timer: &state.timer,
            countdown: &state.countdown,
            recording: &state.recording,
            speed: state.speed,
            max_speed: state.face.max_value(),
            unit_label,
            preset: state.preset,
        },
    );

    scene.render(canvas, font);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState::new(&SpeedometerConfig::default()).unwrap()
    }

    #[test]
    fn starts_at_initial_speed() {
        let state = state();
        assert_eq!(state.speed, 50.0);
        assert_eq!(state.needle_value, 50.0);
        assert_eq!(state.timer.speed_kmh(), 50.0);
    }

    #[test]
    fn speed_snaps_to_step_and_clamps() {
        let mut state = state();
        state.set_speed(72.4);
        assert_eq!(state.speed, 72.0);
        state.set_speed(999.0);
        assert_eq!(state.speed, 200.0);
        state.set_speed(-3.0);
        assert_eq!(state.speed, 0.0);
        assert_eq!(state.timer.speed_kmh(), 0.0);
    }

    #[test]
    fn slider_fraction_maps_to_speed() {
        let mut state = state();
        state.set_speed_fraction(0.25);
        assert_eq!(state.speed, 50.0);
        state.set_speed_fraction(1.0);
        assert_eq!(state.speed, 200.0);
    }

    #[test]
    fn needle_eases_toward_speed_and_settles() {
        let mut state = state();
        state.apply(GaugeCommand::SetSpeed(150.0));
        state.update();
        assert!(state.needle_value > 50.0 && state.needle_value < 150.0);
        for _ in 0..200 {
            state.update();
        }
        assert_eq!(state.needle_value, 150.0);
    }

    #[test]
    fn ticks_drive_all_counters() {
        let mut state = state();
        state.apply(GaugeCommand::ToggleTimer);
        state.apply(GaugeCommand::AddCountdownMinutes(1));
        state.apply(GaugeCommand::ToggleCountdown);
        state.apply(GaugeCommand::ToggleRecording);
        for _ in 0..10 {
            state.tick();
        }
        assert_eq!(state.timer.elapsed_seconds(), 10);
        assert_eq!(state.countdown.remaining(), 50);
        assert_eq!(state.recording.seconds(), 10);
    }

    #[test]
    fn commands_arrive_through_the_channel() {
        let mut state = state();
        let (sender, receiver) = std::sync::mpsc::channel();
        sender.send(GaugeCommand::SetSpeed(120.0)).unwrap();
        sender.send(GaugeCommand::SetSpeed(80.0)).unwrap();
        sender.send(GaugeCommand::SetStyle(StylePreset::Glass)).unwrap();
        state.update_with_commands(&receiver);
        assert_eq!(state.speed, 80.0);
        assert_eq!(state.preset, StylePreset::Glass);
        assert_eq!(state.style, StylePreset::Glass.resolve(ColorScheme::Light));
    }

    #[test]
    fn keys_map_to_commands() {
        let state = state();
        assert_eq!(
            command_for_key(Key::Named(NamedKey::ArrowUp), &state),
            Some(GaugeCommand::SetSpeed(51.0))
        );
        assert_eq!(
            command_for_key(Key::Character("s"), &state),
            Some(GaugeCommand::SetStyle(StylePreset::Overlay))
        );
        assert_eq!(
            command_for_key(Key::Character("t"), &state),
            Some(GaugeCommand::SetColorScheme(ColorScheme::Dark))
        );
        assert_eq!(command_for_key(Key::Character("d"), &state), None);
        assert_eq!(command_for_key(Key::Character("q"), &state), None);
    }

    #[test]
    fn delete_key_removes_the_last_lap() {
        let mut state = state();
        state.apply(GaugeCommand::Lap);
        state.apply(GaugeCommand::Lap);
        let command = command_for_key(Key::Character("d"), &state);
        assert_eq!(command, Some(GaugeCommand::DeleteLap(1)));
        state.apply(GaugeCommand::DeleteLap(1));
        assert_eq!(state.timer.lap_count(), 1);
    }

    #[test]
    fn speedometer_applies_commands_before_showing() {
        let config = SpeedometerConfig::builder().max_speed(120.0).build();
        let mut speedometer = Speedometer::new(config).unwrap();
        assert_eq!(speedometer.config().max_speed, 120.0);
        speedometer.set_speed(500.0);
        assert_eq!(speedometer.speed(), 120.0);
        speedometer.apply(GaugeCommand::SetSpeed(42.0));
        assert_eq!(speedometer.speed(), 42.0);
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let config = SpeedometerConfig::builder().minor_step(7.0).build();
        assert!(matches!(Speedometer::new(config), Err(Error::Config(_))));
    }

    #[test]
    fn screen_renders_into_a_buffer() {
        let state = state();
        let (w, h) = (120, 220);
        let mut frame = vec![0u8; w * h * 4];
        let layout = ScreenLayout::new(w, h);
        render_screen(&mut Canvas::new(&mut frame, w, h), &layout, &state, None, "km/h");
        let idx = (layout.gauge.cy as usize * w + 2) * 4;
        assert_eq!(frame[idx + 3], 0xff);
        assert!(frame.chunks_exact(4).any(|px| px[..3] != frame[..3]));
    }
}
