//! Fixed-offset extraction of every raw scalar for a resolved tier.

use std::time::Duration;
use time::OffsetDateTime;

use crate::layout::*;
use crate::reader::PacketReader;
use crate::sample::{ReservedBlock, Rotation, TelemetrySample, Vec3, Wheels};
use crate::tier::Tier;
use crate::DecodeError;

/// Raw values the derived stage needs but that are not stored verbatim on the sample.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct RawInputs {
    pub speed_ms: f32,
    pub ride_height_m: f32,
    pub boost_absolute: f32,
    pub wheel_rotation_rad: f32,
}

pub fn current_gear(byte: u8) -> u8 {
    byte & 0x0F
}

pub fn suggested_gear(byte: u8) -> u8 {
    byte >> 4
}

/// `(in_race, is_paused)` from the flag byte. Other bits are ignored.
pub fn race_flags(byte: u8) -> (bool, bool) {
    (byte & FLAG_IN_RACE != 0, byte & FLAG_PAUSED != 0)
}

/// Throttle and brake bytes run 0..=255; the sample carries them as percent.
pub fn input_percent(byte: u8) -> f64 {
    f64::from(byte) / 2.55
}

/// Millisecond time of day rounded to the nearest whole second, ties to even.
pub fn time_on_track(ms: i32) -> Duration {
    let secs = (f64::from(ms) / 1000.0).round_ties_even();
    if secs > 0.0 {
        Duration::from_secs(secs as u64)
    } else {
        Duration::ZERO
    }
}

/// Populate every raw field of the sample for `tier`. Derived fields stay at their defaults.
pub(crate) fn decode_fields(
    buf: &[u8],
    tier: Tier,
    captured_at: OffsetDateTime,
) -> Result<(TelemetrySample, RawInputs), DecodeError> {
    let mut r = PacketReader::new(buf);
    let mut s = TelemetrySample::empty(captured_at);
    let mut raw = RawInputs::default();
    s.tier = tier;

    s.position = Vec3::from_array(r.f32s_at(POSITION)?);
    s.velocity = Vec3::from_array(r.f32s_at(VELOCITY)?);
    s.rotation = Rotation {
        pitch: r.f32_at(ROTATION_PITCH)?,
        yaw: r.f32_at(ROTATION_YAW)?,
        roll: r.f32_at(ROTATION_ROLL)?,
    };
    s.rotation_z = r.f32_at(ROTATION_Z)?;
    s.angular_velocity = Vec3::from_array(r.f32s_at(ANGULAR_VELOCITY)?);

    raw.ride_height_m = r.f32_at(RIDE_HEIGHT)?;
    s.rpm = r.f32_at(RPM)?;
    s.current_fuel = r.f32_at(CURRENT_FUEL)?;
    s.fuel_capacity = r.f32_at(FUEL_CAPACITY)?;
    raw.speed_ms = r.f32_at(SPEED)?;
    raw.boost_absolute = r.f32_at(BOOST)?;
    s.oil_pressure = r.f32_at(OIL_PRESSURE)?;
    s.water_temp = r.f32_at(WATER_TEMP)?;
    s.oil_temp = r.f32_at(OIL_TEMP)?;
    s.tyre_temp = Wheels::from_array(r.f32s_at(TYRE_TEMP)?);

    s.package_id = r.i32_at(PACKAGE_ID)?;
    s.current_lap = r.i16_at(CURRENT_LAP)?;
    s.total_laps = r.i16_at(TOTAL_LAPS)?;
    s.best_lap_ms = r.i32_at(BEST_LAP)?;
    s.last_lap_ms = r.i32_at(LAST_LAP)?;
    s.time_on_track = time_on_track(r.i32_at(TIME_ON_TRACK)?);
    s.current_position = r.i16_at(CURRENT_POSITION)?;
    s.total_positions = r.i16_at(TOTAL_POSITIONS)?;
    s.rpm_rev_warning = r.u16_at(RPM_REV_WARNING)?;
    s.rpm_rev_limiter = r.u16_at(RPM_REV_LIMITER)?;
    s.estimated_top_speed = r.i16_at(ESTIMATED_TOP_SPEED)?;

    (s.in_race, s.is_paused) = race_flags(r.u8_at(FLAGS)?);
    let gears = r.u8_at(GEARS)?;
    s.current_gear = current_gear(gears);
    s.suggested_gear = suggested_gear(gears);
    s.throttle = input_percent(r.u8_at(THROTTLE)?);
    s.brake = input_percent(r.u8_at(BRAKE)?);

    s.wheel_angular_speed = Wheels::from_array(r.f32s_at(WHEEL_ANGULAR_SPEED)?);
    s.tyre_diameter = Wheels::from_array(r.f32s_at(TYRE_DIAMETER)?);
    s.suspension = Wheels::from_array(r.f32s_at(SUSPENSION)?);
    s.clutch = r.f32_at(CLUTCH)?;
    s.clutch_engaged = r.f32_at(CLUTCH_ENGAGED)?;
    s.rpm_after_clutch = r.f32_at(RPM_AFTER_CLUTCH)?;
    s.gear_ratios = r.f32s_at(GEAR_RATIOS)?;
    s.car_id = r.i32_at(CAR_ID)?;

    let mut reserved = ReservedBlock {
        at_0x94: r.f32s_at(RESERVED_0X94)?,
        at_0xd4: r.f32s_at(RESERVED_0XD4)?,
        ..ReservedBlock::default()
    };

    if tier.has_motion() {
        raw.wheel_rotation_rad = r.f32_at(WHEEL_ROTATION)?;
        reserved.at_0x12c = r.f32_at(RESERVED_0X12C)?;
        s.sway = r.f32_at(SWAY)?;
        s.heave = r.f32_at(HEAVE)?;
        s.surge = r.f32_at(SURGE)?;
    }

    if tier.has_filtered_inputs() {
        s.filtered_throttle = input_percent(r.u8_at(FILTERED_THROTTLE)?);
        s.filtered_brake = input_percent(r.u8_at(FILTERED_BRAKE)?);
        reserved.at_0x13e = [r.u8_at(RESERVED_0X13E)?, r.u8_at(RESERVED_0X13E + 1)?];
        reserved.at_0x140 = r.f32s_at(RESERVED_0X140)?;
        s.energy_recovery = r.f32_at(ENERGY_RECOVERY)?;
        reserved.at_0x154 = r.f32_at(RESERVED_0X154)?;
    }

    s.reserved = reserved;
    Ok((s, raw))
}
