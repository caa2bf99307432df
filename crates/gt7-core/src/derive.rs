//! Values computed from one or more decoded fields.

use crate::fields::RawInputs;
use crate::sample::{SlipRatio, TelemetrySample, Wheels};
use crate::DecodeError;

const MS_TO_KMH: f64 = 3.6;

pub fn car_speed_kmh(speed_ms: f32) -> f64 {
    MS_TO_KMH * f64::from(speed_ms)
}

/// Surface speed of a tyre in km/h.
pub fn tyre_speed_kmh(diameter: f32, angular_speed: f32) -> f64 {
    (MS_TO_KMH * f64::from(diameter) * f64::from(angular_speed)).abs()
}

/// `None` while the car is not moving forward; the ratio is undefined there.
///
/// Any finite ratio is kept, however implausible. Only NaN or an infinity fails.
pub fn slip_ratio(tyre_speed: f64, car_speed: f64) -> Result<Option<SlipRatio>, DecodeError> {
    if car_speed <= 0.0 {
        return Ok(None);
    }
    SlipRatio::from_ratio(tyre_speed / car_speed)
        .map(Some)
        .ok_or(DecodeError::MalformedNumeric { field: "slip_ratio" })
}

pub fn ride_height_mm(raw_m: f32) -> f64 {
    1000.0 * f64::from(raw_m)
}

pub fn radians_to_degrees(rad: f32) -> f64 {
    f64::from(rad) * 180.0 / std::f64::consts::PI
}

/// Absolute gauge pressure to bar relative to atmosphere.
pub fn relative_boost(absolute: f32) -> f64 {
    f64::from(absolute) - 1.0
}

/// How much of the commanded brake the ABS took away, in percent.
///
/// Fails when the result is not finite, e.g. a filtered brake of exactly 100.
pub fn abs_brake_delta(brake: f64, filtered_brake: f64) -> Result<f64, DecodeError> {
    if brake == filtered_brake {
        return Ok(0.0);
    }
    let delta = (brake - filtered_brake) / (100.0 - filtered_brake) * 100.0;
    if delta.is_finite() {
        Ok(delta)
    } else {
        Err(DecodeError::MalformedNumeric { field: "brake_abs" })
    }
}

/// Fill every derived field of a freshly decoded sample.
pub(crate) fn apply(s: &mut TelemetrySample, raw: &RawInputs) -> Result<(), DecodeError> {
    s.car_speed = car_speed_kmh(raw.speed_ms);
    s.ride_height_mm = ride_height_mm(raw.ride_height_m);
    s.boost = relative_boost(raw.boost_absolute);

    s.tyre_speed = s
        .tyre_diameter
        .zip(s.wheel_angular_speed)
        .map(|(d, w)| tyre_speed_kmh(d, w));

    let car_speed = s.car_speed;
    let ratios = s.tyre_speed.map(|t| slip_ratio(t, car_speed));
    s.slip_ratio = Wheels {
        fl: ratios.fl?.unwrap_or_default(),
        fr: ratios.fr?.unwrap_or_default(),
        rl: ratios.rl?.unwrap_or_default(),
        rr: ratios.rr?.unwrap_or_default(),
    };

    if s.tier.has_motion() {
        s.wheel_rotation_deg = radians_to_degrees(raw.wheel_rotation_rad);
    }
    if s.tier.has_filtered_inputs() {
        s.brake_abs = abs_brake_delta(s.brake, s.filtered_brake)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tier::Tier;
    use time::OffsetDateTime;

    #[test]
    fn unit_conversions() {
        assert_eq!(car_speed_kmh(10.0), 36.0);
        assert_eq!(ride_height_mm(0.5), 500.0);
        assert_eq!(relative_boost(1.0), 0.0);
        assert_eq!(relative_boost(0.0), -1.0);
        assert!((radians_to_degrees(std::f32::consts::PI) - 180.0).abs() < 1e-4);
        assert_eq!(radians_to_degrees(0.0), 0.0);
    }

    #[test]
    fn tyre_speed_is_never_negative() {
        assert_eq!(tyre_speed_kmh(0.5, -20.0), 36.0);
        assert_eq!(tyre_speed_kmh(0.5, 20.0), 36.0);
        assert_eq!(tyre_speed_kmh(0.0, 20.0), 0.0);
    }

    #[test]
    fn slip_ratio_skipped_when_stationary() {
        assert_eq!(slip_ratio(50.0, 0.0), Ok(None));
        assert_eq!(slip_ratio(50.0, -3.0), Ok(None));
        assert_eq!(slip_ratio(110.0, 100.0), Ok(SlipRatio::from_ratio(1.1)));
        assert_eq!(
            slip_ratio(f64::INFINITY, 100.0),
            Err(DecodeError::MalformedNumeric { field: "slip_ratio" })
        );
    }

    #[test]
    fn slip_ratio_of_a_creeping_car_is_kept() {
        let tyre = tyre_speed_kmh(0.33, 100.0);
        let car = car_speed_kmh(1e-18);
        let ratio = slip_ratio(tyre, car).unwrap().unwrap();
        assert!(ratio.as_str().ends_with(".00"));
        let value: f64 = ratio.as_str().parse().unwrap();
        assert!((value / (tyre / car) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn abs_delta_boundaries() {
        assert_eq!(abs_brake_delta(50.0, 50.0), Ok(0.0));
        assert_eq!(abs_brake_delta(80.0, 20.0), Ok(75.0));
        assert_eq!(abs_brake_delta(100.0, 100.0), Ok(0.0));
        assert_eq!(
            abs_brake_delta(0.0, 100.0),
            Err(DecodeError::MalformedNumeric { field: "brake_abs" })
        );
    }

    #[test]
    fn apply_fills_per_wheel_values() {
        let mut s = TelemetrySample::empty(OffsetDateTime::UNIX_EPOCH);
        s.tyre_diameter = Wheels::from_array([0.5; 4]);
        s.wheel_angular_speed = Wheels::from_array([20.0, 22.0, -20.0, 0.0]);
        let raw = RawInputs { speed_ms: 10.0, ..RawInputs::default() };

        apply(&mut s, &raw).unwrap();
        assert_eq!(s.car_speed, 36.0);
        assert_eq!(s.tyre_speed.fl, 36.0);
        assert_eq!(s.tyre_speed.rl, 36.0);
        assert_eq!(s.slip_ratio.fl.to_string(), "1.00");
        assert_eq!(s.slip_ratio.fr.to_string(), "1.10");
        assert_eq!(s.slip_ratio.rr, SlipRatio::default());
        assert_eq!(s.wheel_rotation_deg, 0.0);
        assert_eq!(s.brake_abs, 0.0);
    }

    #[test]
    fn apply_gates_tier_specific_metrics() {
        let raw = RawInputs { wheel_rotation_rad: std::f32::consts::FRAC_PI_2, ..RawInputs::default() };

        let mut base = TelemetrySample::empty(OffsetDateTime::UNIX_EPOCH);
        base.brake = 80.0;
        base.filtered_brake = 20.0;
        apply(&mut base, &raw).unwrap();
        assert_eq!(base.wheel_rotation_deg, 0.0);
        assert_eq!(base.brake_abs, 0.0);

        let mut full = base.clone();
        full.tier = Tier::Full;
        apply(&mut full, &raw).unwrap();
        assert!((full.wheel_rotation_deg - 90.0).abs() < 1e-4);
        assert_eq!(full.brake_abs, 75.0);
    }
}
