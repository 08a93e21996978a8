use tacho::{generate_ticks, map_angle, ArcRange, GaugeError};

const ARC: ArcRange = ArcRange {
    start_degrees: -210.0,
    end_degrees: 30.0,
};

#[test]
fn angle_grows_with_value() {
    let mut previous = map_angle(0.0, 200.0, ARC).unwrap();
    for step in 1..=400 {
        let angle = map_angle(step as f64 * 0.5, 200.0, ARC).unwrap();
        assert!(angle >= previous, "angle shrank at {}", step as f64 * 0.5);
        previous = angle;
    }
}

#[test]
fn endpoints_are_exact() {
    assert_eq!(map_angle(0.0, 200.0, ARC).unwrap(), -210.0);
    assert_eq!(map_angle(200.0, 200.0, ARC).unwrap(), 30.0);
    assert_eq!(map_angle(100.0, 200.0, ARC).unwrap(), -90.0);
}

#[test]
fn out_of_range_values_are_clamped() {
    assert_eq!(
        map_angle(-10.0, 100.0, ARC).unwrap(),
        map_angle(0.0, 100.0, ARC).unwrap()
    );
    assert_eq!(
        map_angle(150.0, 100.0, ARC).unwrap(),
        map_angle(100.0, 100.0, ARC).unwrap()
    );
}

#[test]
fn stock_scale_has_labelled_majors_every_other_tick() {
    let ticks = generate_ticks(200.0, 10.0, 20.0, ARC).unwrap();
    assert_eq!(ticks.len(), 21);

    for (i, tick) in ticks.iter().enumerate() {
        assert_eq!(tick.index, i);
        assert_eq!(tick.value, i as f64 * 10.0);
        assert_eq!(tick.is_major, i % 2 == 0);
        assert_eq!(tick.label.is_some(), tick.is_major);
    }

    let labels: Vec<i64> = ticks.iter().filter_map(|t| t.label).collect();
    let expected: Vec<i64> = (0..=200).step_by(20).collect();
    assert_eq!(labels, expected);
}

#[test]
fn first_and_last_tick_sit_on_the_arc_ends() {
    let ticks = generate_ticks(200.0, 10.0, 20.0, ARC).unwrap();
    let first = ticks.first().unwrap();
    let last = ticks.last().unwrap();
    assert_eq!(
        first.angle_radians,
        map_angle(0.0, 200.0, ARC).unwrap().to_radians()
    );
    assert_eq!(
        last.angle_radians,
        map_angle(200.0, 200.0, ARC).unwrap().to_radians()
    );
}

#[test]
fn ticks_follow_the_needle_formula() {
    for tick in generate_ticks(200.0, 10.0, 20.0, ARC).unwrap() {
        let needle = map_angle(tick.value, 200.0, ARC).unwrap().to_radians();
        assert!((tick.angle_radians - needle).abs() < 1e-12);
    }
}

#[test]
fn uneven_minor_step_is_rejected() {
    let err = generate_ticks(200.0, 7.0, 20.0, ARC).unwrap_err();
    assert!(matches!(err, GaugeError::InvalidConfiguration(_)));
}

#[test]
fn non_positive_max_value_is_rejected() {
    assert!(matches!(
        map_angle(10.0, 0.0, ARC),
        Err(GaugeError::InvalidConfiguration(_))
    ));
    assert!(matches!(
        generate_ticks(-5.0, 1.0, 5.0, ARC),
        Err(GaugeError::InvalidConfiguration(_))
    ));
}

#[test]
fn repeated_calls_are_bit_identical() {
    let a = map_angle(73.3, 200.0, ARC).unwrap();
    let b = map_angle(73.3, 200.0, ARC).unwrap();
    assert_eq!(a.to_bits(), b.to_bits());

    let first = generate_ticks(200.0, 10.0, 20.0, ARC).unwrap();
    let second = generate_ticks(200.0, 10.0, 20.0, ARC).unwrap();
    assert_eq!(first.len(), second.len());
    for (x, y) in first.iter().zip(&second) {
        assert_eq!(x.angle_radians.to_bits(), y.angle_radians.to_bits());
        assert_eq!(x.label, y.label);
    }
}
