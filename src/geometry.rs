// ============================================================================
// GAUGE GEOMETRY
// ============================================================================
//
// Angles are in degrees unless a name says otherwise. 0° points right and
// positive angles turn clockwise, matching a y-down pixel canvas.

use thiserror::Error;

/// Relative tolerance when checking that one step divides another.
const RATIO_EPSILON: f64 = 1e-9;

/// Most minor steps a scale may be divided into.
pub const MAX_TICKS: usize = 10_000;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GaugeError {
    #[error("invalid gauge configuration: {0}")]
    InvalidConfiguration(String),
}

/// Directed sweep of the value scale, from `start_degrees` to `end_degrees`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcRange {
    pub start_degrees: f64,
    pub end_degrees: f64,
}

impl Default for ArcRange {
    /// 240° sweep through the bottom of the circle.
    fn default() -> Self {
        Self::new(-210.0, 30.0)
    }
}

impl ArcRange {
    pub const fn new(start_degrees: f64, end_degrees: f64) -> Self {
        Self {
            start_degrees,
            end_degrees,
        }
    }

    pub fn span_degrees(&self) -> f64 {
        self.end_degrees - self.start_degrees
    }

    /// Angle at a normalized position along the sweep.
    ///
    /// Needle and ticks both go through here, so they always agree. A
    /// position of 1.0 returns `end_degrees` exactly.
    pub fn angle_at(&self, relative: f64) -> f64 {
        if relative >= 1.0 {
            return self.end_degrees;
        }
        self.start_degrees + relative * self.span_degrees()
    }

    fn validate(&self) -> Result<(), GaugeError> {
        if !self.start_degrees.is_finite() || !self.end_degrees.is_finite() {
            return Err(GaugeError::InvalidConfiguration(format!(
                "arc bounds must be finite, got {} to {}",
                self.start_degrees, self.end_degrees
            )));
        }
        Ok(())
    }
}

/// A value on a `[0, max_value]` scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeReading {
    value: f64,
    max_value: f64,
}

impl GaugeReading {
    pub fn new(value: f64, max_value: f64) -> Result<Self, GaugeError> {
        validate_max_value(max_value)?;
        Ok(Self { value, max_value })
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn max_value(&self) -> f64 {
        self.max_value
    }

    /// The value clamped into `[0, max_value]`. NaN reads as zero.
    pub fn clamped(&self) -> f64 {
        if self.value.is_nan() {
            0.0
        } else {
            self.value.clamp(0.0, self.max_value)
        }
    }

    /// Position along the scale in `[0, 1]`.
    pub fn relative(&self) -> f64 {
        self.clamped() / self.max_value
    }
}

/// One tick mark on the gauge face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSpec {
    pub index: usize,
    pub value: f64,
    pub angle_radians: f64,
    pub is_major: bool,
    pub label: Option<i64>,
}

/// Maps `value` onto `arc`, clamping it into `[0, max_value]` first.
pub fn map_angle(value: f64, max_value: f64, arc: ArcRange) -> Result<f64, GaugeError> {
    arc.validate()?;
    let reading = GaugeReading::new(value, max_value)?;
    Ok(arc.angle_at(reading.relative()))
}

/// Lays out minor and major ticks from 0 to `max_value` inclusive.
///
/// `major_step` has to be a whole multiple of `minor_step`, and both have to
/// divide `max_value` evenly. Anything else is rejected rather than rounded.
pub fn generate_ticks(
    max_value: f64,
    minor_step: f64,
    major_step: f64,
    arc: ArcRange,
) -> Result<Vec<TickSpec>, GaugeError> {
    arc.validate()?;
    validate_max_value(max_value)?;
    validate_step("minor_step", minor_step)?;
    validate_step("major_step", major_step)?;

    let minor_count = whole_ratio(max_value, minor_step, "max_value", "minor_step")?;
    let major_count = whole_ratio(max_value, major_step, "max_value", "major_step")?;
    let minors_per_major = whole_ratio(major_step, minor_step, "major_step", "minor_step")?;
    if major_count.checked_mul(minors_per_major) != Some(minor_count) {
        return Err(GaugeError::InvalidConfiguration(format!(
            "{major_count} major ticks of {minors_per_major} minor steps do not cover {minor_count} minor steps"
        )));
    }

    let ticks = (0..=minor_count)
        .map(|i| {
            let relative = i as f64 / minor_count as f64;
            let is_major = i % minors_per_major == 0;
            let value = i as f64 * minor_step;
            TickSpec {
                index: i,
                value,
                angle_radians: arc.angle_at(relative).to_radians(),
                is_major,
                label: is_major.then(|| value.round() as i64),
            }
        })
        .collect();
    Ok(ticks)
}

fn validate_max_value(max_value: f64) -> Result<(), GaugeError> {
    if !max_value.is_finite() || max_value <= 0.0 {
        return Err(GaugeError::InvalidConfiguration(format!(
            "max_value must be a positive number, got {max_value}"
        )));
    }
    Ok(())
}

fn validate_step(name: &str, step: f64) -> Result<(), GaugeError> {
    if !step.is_finite() || step <= 0.0 {
        return Err(GaugeError::InvalidConfiguration(format!(
            "{name} must be a positive number, got {step}"
        )));
    }
    Ok(())
}

/// `numerator / denominator` when it is a whole number of at least one.
fn whole_ratio(
    numerator: f64,
    denominator: f64,
    numerator_name: &str,
    denominator_name: &str,
) -> Result<usize, GaugeError> {
    let ratio = numerator / denominator;
    let whole = ratio.round();
    if whole < 1.0 || (ratio - whole).abs() > RATIO_EPSILON * whole {
        return Err(GaugeError::InvalidConfiguration(format!(
            "{denominator_name} ({denominator}) does not evenly divide {numerator_name} ({numerator})"
        )));
    }
    if whole > MAX_TICKS as f64 {
        return Err(GaugeError::InvalidConfiguration(format!(
            "{numerator_name} ({numerator}) spans more than {MAX_TICKS} steps of {denominator_name} ({denominator})"
        )));
    }
    Ok(whole as usize)
}

/// A validated gauge scale with its tick layout computed once.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeFace {
    arc: ArcRange,
    max_value: f64,
    minor_step: f64,
    major_step: f64,
    ticks: Vec<TickSpec>,
}

impl GaugeFace {
    pub fn new(
        max_value: f64,
        minor_step: f64,
        major_step: f64,
        arc: ArcRange,
    ) -> Result<Self, GaugeError> {
        let ticks = generate_ticks(max_value, minor_step, major_step, arc)?;
        log::trace!(
            "gauge face 0..{max_value} step {minor_step}/{major_step}: {} ticks",
            ticks.len()
        );
        Ok(Self {
            arc,
            max_value,
            minor_step,
            major_step,
            ticks,
        })
    }

    pub fn arc(&self) -> ArcRange {
        self.arc
    }

    pub fn max_value(&self) -> f64 {
        self.max_value
    }

    pub fn minor_step(&self) -> f64 {
        self.minor_step
    }

    pub fn major_step(&self) -> f64 {
        self.major_step
    }

    pub fn ticks(&self) -> &[TickSpec] {
        &self.ticks
    }

    /// Needle angle in degrees for `value`, clamped onto the scale.
    pub fn needle_angle(&self, value: f64) -> f64 {
        let reading = GaugeReading {
            value,
            max_value: self.max_value,
        };
        self.arc.angle_at(reading.relative())
    }

    pub fn clamp(&self, value: f64) -> f64 {
        GaugeReading {
            value,
            max_value: self.max_value,
        }
        .clamped()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_arc_sweeps_240_degrees() {
        let arc = ArcRange::default();
        assert_eq!(arc.start_degrees, -210.0);
        assert_eq!(arc.end_degrees, 30.0);
        assert_eq!(arc.span_degrees(), 240.0);
    }

    #[test]
    fn midpoint_points_straight_up() {
        let angle = map_angle(100.0, 200.0, ArcRange::default()).unwrap();
        assert_eq!(angle, -90.0);
    }

    #[test]
    fn rejects_non_positive_max_value() {
        for max in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let err = map_angle(10.0, max, ArcRange::default()).unwrap_err();
            assert!(matches!(err, GaugeError::InvalidConfiguration(_)), "{max}");
        }
    }

    #[test]
    fn nan_value_reads_as_zero() {
        let arc = ArcRange::default();
        assert_eq!(map_angle(f64::NAN, 200.0, arc).unwrap(), arc.start_degrees);
    }

    #[test]
    fn descending_arc_maps_backwards() {
        let arc = ArcRange::new(90.0, -90.0);
        assert_eq!(map_angle(0.0, 10.0, arc).unwrap(), 90.0);
        assert_eq!(map_angle(5.0, 10.0, arc).unwrap(), 0.0);
        assert_eq!(map_angle(10.0, 10.0, arc).unwrap(), -90.0);
    }

    #[test]
    fn major_step_must_be_multiple_of_minor_step() {
        let err = generate_ticks(300.0, 20.0, 30.0, ArcRange::default()).unwrap_err();
        assert!(matches!(err, GaugeError::InvalidConfiguration(_)));
    }

    #[test]
    fn major_step_must_divide_max_value() {
        let err = generate_ticks(100.0, 10.0, 30.0, ArcRange::default()).unwrap_err();
        assert!(matches!(err, GaugeError::InvalidConfiguration(_)));
    }

    #[test]
    fn steps_must_be_positive() {
        assert!(generate_ticks(100.0, 0.0, 20.0, ArcRange::default()).is_err());
        assert!(generate_ticks(100.0, 10.0, -20.0, ArcRange::default()).is_err());
    }

    #[test]
    fn huge_scales_are_rejected() {
        let err = generate_ticks(1e20, 1.0, 1e19, ArcRange::default()).unwrap_err();
        assert!(matches!(err, GaugeError::InvalidConfiguration(_)));
        assert!(generate_ticks(1e8, 1.0, 2.0, ArcRange::default()).is_err());
    }

    #[test]
    fn scale_at_the_tick_limit_is_accepted() {
        let max = MAX_TICKS as f64;
        let ticks = generate_ticks(max, 1.0, 100.0, ArcRange::default()).unwrap();
        assert_eq!(ticks.len(), MAX_TICKS + 1);
        assert!(generate_ticks(max + 1.0, 1.0, 1.0, ArcRange::default()).is_err());
    }

    #[test]
    fn step_larger_than_max_is_rejected() {
        assert!(generate_ticks(10.0, 20.0, 20.0, ArcRange::default()).is_err());
    }

    #[test]
    fn equal_steps_make_every_tick_major() {
        let ticks = generate_ticks(60.0, 15.0, 15.0, ArcRange::default()).unwrap();
        assert_eq!(ticks.len(), 5);
        assert!(ticks.iter().all(|t| t.is_major));
        let labels: Vec<_> = ticks.iter().filter_map(|t| t.label).collect();
        assert_eq!(labels, vec![0, 15, 30, 45, 60]);
    }

    #[test]
    fn fractional_steps_are_accepted_when_they_divide() {
        let ticks = generate_ticks(1.0, 0.1, 0.5, ArcRange::default()).unwrap();
        assert_eq!(ticks.len(), 11);
        let majors: Vec<_> = ticks.iter().filter(|t| t.is_major).map(|t| t.index).collect();
        assert_eq!(majors, vec![0, 5, 10]);
    }

    #[test]
    fn minor_ticks_have_no_label() {
        let ticks = generate_ticks(200.0, 10.0, 20.0, ArcRange::default()).unwrap();
        for tick in ticks.iter().filter(|t| !t.is_major) {
            assert_eq!(tick.label, None);
            assert_eq!(tick.index % 2, 1);
        }
    }

    #[test]
    fn face_clamps_needle_angle() {
        let face = GaugeFace::new(200.0, 10.0, 20.0, ArcRange::default()).unwrap();
        assert_eq!(face.needle_angle(-1.0), -210.0);
        assert_eq!(face.needle_angle(500.0), 30.0);
        assert_eq!(face.clamp(250.0), 200.0);
        assert_eq!(face.ticks().len(), 21);
    }

    #[test]
    fn face_needle_matches_map_angle() {
        let arc = ArcRange::new(-225.0, 45.0);
        let face = GaugeFace::new(240.0, 10.0, 20.0, arc).unwrap();
        for value in [0.0, 13.0, 120.0, 239.5, 240.0] {
            assert_eq!(face.needle_angle(value), map_angle(value, 240.0, arc).unwrap());
        }
    }

    #[test]
    fn rejects_non_finite_arc() {
        let arc = ArcRange::new(f64::NAN, 30.0);
        assert!(map_angle(1.0, 2.0, arc).is_err());
        assert!(generate_ticks(200.0, 10.0, 20.0, arc).is_err());
    }
}
