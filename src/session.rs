// ============================================================================
// SESSION STATE
// ============================================================================
//
// Every transition consumes the state and returns the next one. The host owns
// the values and advances them once per wall-clock tick.

/// Elapsed-time and distance accumulator with lap marks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimerSession {
    running: bool,
    elapsed_seconds: u64,
    total_distance_km: f64,
    speed_kmh: f64,
    laps: Vec<LapMark>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct LapMark {
    at_seconds: u64,
    distance_km: f64,
}

/// One recorded lap, relative to the lap before it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LapSummary {
    pub number: usize,
    pub at_seconds: u64,
    pub split_seconds: u64,
    pub split_distance_km: f64,
}

impl TimerSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn total_distance_km(&self) -> f64 {
        self.total_distance_km
    }

    pub fn speed_kmh(&self) -> f64 {
        self.speed_kmh
    }

    pub fn start(self) -> Self {
        if self.running {
            return self;
        }
        log::info!("timer started at {}", format_clock(self.elapsed_seconds as i64));
        Self {
            running: true,
            ..self
        }
    }

    pub fn pause(self) -> Self {
        if !self.running {
            return self;
        }
        log::info!("timer paused at {}", format_clock(self.elapsed_seconds as i64));
        Self {
            running: false,
            ..self
        }
    }

    pub fn toggle(self) -> Self {
        if self.running {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Stops the timer and clears elapsed time, distance and laps.
    pub fn reset(self) -> Self {
        log::info!("timer reset");
        Self {
            speed_kmh: self.speed_kmh,
            ..Self::default()
        }
    }

    /// Speed used for the distance estimate from the next tick on.
    pub fn update_speed(self, speed_kmh: f64) -> Self {
        Self {
            speed_kmh: speed_kmh.max(0.0),
            ..self
        }
    }

    /// Advances one second while running.
    pub fn tick(self) -> Self {
        if !self.running {
            return self;
        }
        Self {
            elapsed_seconds: self.elapsed_seconds + 1,
            total_distance_km: self.total_distance_km + self.speed_kmh / 3600.0,
            ..self
        }
    }

    pub fn lap(mut self) -> Self {
        self.laps.push(LapMark {
            at_seconds: self.elapsed_seconds,
            distance_km: self.total_distance_km,
        });
        log::debug!(
            "lap {} at {}",
            self.laps.len(),
            format_clock(self.elapsed_seconds as i64)
        );
        self
    }

    /// Removes the lap at `index` (zero based); out of range is a no-op.
    pub fn delete_lap(mut self, index: usize) -> Self {
        if index < self.laps.len() {
            self.laps.remove(index);
        }
        self
    }

    pub fn lap_count(&self) -> usize {
        self.laps.len()
    }

    pub fn laps(&self) -> Vec<LapSummary> {
        let mut previous = LapMark {
            at_seconds: 0,
            distance_km: 0.0,
        };
        self.laps
            .iter()
            .enumerate()
            .map(|(i, mark)| {
                let summary = LapSummary {
                    number: i + 1,
                    at_seconds: mark.at_seconds,
                    split_seconds: mark.at_seconds.saturating_sub(previous.at_seconds),
                    split_distance_km: (mark.distance_km - previous.distance_km).max(0.0),
                };
                previous = *mark;
                summary
            })
            .collect()
    }
}

/// Race-start countdown that may run negative after a reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining: i64,
    running: bool,
    reset_to: i64,
}

impl Countdown {
    pub fn new(reset_to: i64) -> Self {
        Self {
            remaining: 0,
            running: false,
            reset_to,
        }
    }

    pub fn remaining(&self) -> i64 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Start or pause while time is left, otherwise reset.
    pub fn toggle(self) -> Self {
        if self.remaining <= 0 {
            return self.reset();
        }
        log::info!(
            "countdown {} at {}",
            if self.running { "paused" } else { "started" },
            format_clock(self.remaining)
        );
        Self {
            running: !self.running,
            ..self
        }
    }

    pub fn tick(self) -> Self {
        if !self.running {
            return self;
        }
        let remaining = self.remaining - 1;
        if remaining <= 0 {
            log::info!("countdown finished");
        }
        Self {
            remaining: remaining.max(0),
            running: remaining > 0,
            ..self
        }
    }

    pub fn reset(self) -> Self {
        log::info!("countdown reset to {}", format_clock(self.reset_to));
        Self {
            remaining: self.reset_to,
            running: false,
            ..self
        }
    }

    /// Adds (or with a negative count, removes) whole minutes, never going
    /// below zero.
    pub fn add_minutes(self, minutes: i64) -> Self {
        Self {
            remaining: self
                .remaining
                .saturating_add(minutes.saturating_mul(60))
                .max(0),
            ..self
        }
    }

    /// Drops to the previous full minute.
    pub fn synchronize(self) -> Self {
        Self {
            remaining: self.remaining - self.remaining % 60,
            ..self
        }
    }
}

/// Start/stop state of a recording with its running time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Recording {
    active: bool,
    seconds: u64,
}

impl Recording {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn seconds(&self) -> u64 {
        self.seconds
    }

    pub fn start(self) -> Self {
        if self.active {
            return self;
        }
        log::info!("recording started");
        Self {
            active: true,
            seconds: 0,
        }
    }

    pub fn stop(self) -> Self {
        if !self.active {
            return self;
        }
        log::info!("recording stopped after {}", format_clock(self.seconds as i64));
        Self::default()
    }

    pub fn toggle(self) -> Self {
        if self.active {
            self.stop()
        } else {
            self.start()
        }
    }

    pub fn tick(self) -> Self {
        if !self.active {
            return self;
        }
        Self {
            seconds: self.seconds + 1,
            ..self
        }
    }
}

/// `MM:SS` of the absolute value, with a leading `-` when negative.
pub fn format_clock(seconds: i64) -> String {
    let sign = if seconds < 0 { "-" } else { "" };
    let s = seconds.unsigned_abs();
    format!("{sign}{:02}:{:02}", s / 60, s % 60)
}
