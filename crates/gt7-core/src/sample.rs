use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use time::OffsetDateTime;

use crate::tier::Tier;

/// One value per wheel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Wheels<T> {
    pub fl: T,
    pub fr: T,
    pub rl: T,
    pub rr: T,
}

impl<T> Wheels<T> {
    pub fn from_array([fl, fr, rl, rr]: [T; 4]) -> Self {
        Self { fl, fr, rl, rr }
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Wheels<U> {
        Wheels { fl: f(self.fl), fr: f(self.fr), rl: f(self.rl), rr: f(self.rr) }
    }

    pub fn zip<U>(self, other: Wheels<U>) -> Wheels<(T, U)> {
        Wheels {
            fl: (self.fl, other.fl),
            fr: (self.fr, other.fr),
            rl: (self.rl, other.rl),
            rr: (self.rr, other.rr),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub fn from_array([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

/// Fields whose meaning is unknown, keyed by the offset they start at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReservedBlock {
    pub at_0x94: [f32; 4],
    pub at_0xd4: [f32; 8],
    /// Extended tier.
    pub at_0x12c: f32,
    /// Full tier.
    pub at_0x13e: [u8; 2],
    /// Full tier.
    pub at_0x140: [f32; 4],
    /// Full tier.
    pub at_0x154: f32,
}

/// Tyre-to-car speed ratio held as its two-decimal rendering (`"1.05"`).
///
/// The rendering is the value, so any finite ratio fits, however large, and it serializes
/// back to the same text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct SlipRatio(String);

impl Default for SlipRatio {
    fn default() -> Self {
        Self("0.00".to_owned())
    }
}

impl SlipRatio {
    /// Round `ratio` the way `format!("{:.2}")` does. `None` for NaN and infinities.
    pub fn from_ratio(ratio: f64) -> Option<Self> {
        ratio.is_finite().then(|| Self(format!("{ratio:.2}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlipRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{0}` is not a two-decimal slip ratio")]
pub struct ParseSlipRatioError(String);

impl FromStr for SlipRatio {
    type Err = ParseSlipRatioError;

    /// Accepts the canonical rendering only: optional `-`, whole digits without leading
    /// zeros, a dot, exactly two fraction digits. Surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('-').unwrap_or(trimmed);
        let well_formed = digits.split_once('.').is_some_and(|(whole, frac)| {
            !whole.is_empty()
                && whole.bytes().all(|b| b.is_ascii_digit())
                && (whole.len() == 1 || !whole.starts_with('0'))
                && frac.len() == 2
                && frac.bytes().all(|b| b.is_ascii_digit())
        });
        if well_formed {
            Ok(Self(trimmed.to_owned()))
        } else {
            Err(ParseSlipRatioError(s.to_owned()))
        }
    }
}

impl From<SlipRatio> for String {
    fn from(value: SlipRatio) -> Self {
        value.0
    }
}

impl TryFrom<String> for SlipRatio {
    type Error = ParseSlipRatioError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// The car's state at one simulation tick.
///
/// Fields beyond the resolved [`Tier`] hold their defaults (zero / false).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    #[serde(with = "time::serde::rfc3339")]
    pub captured_at: OffsetDateTime,
    pub tier: Tier,

    // identifiers
    pub package_id: i32,
    pub car_id: i32,
    pub best_lap_ms: i32,
    pub last_lap_ms: i32,
    pub current_lap: i16,
    pub total_laps: i16,

    // race state
    pub current_position: i16,
    pub total_positions: i16,
    /// Time of day on track, whole seconds.
    pub time_on_track: Duration,
    pub is_paused: bool,
    pub in_race: bool,

    // powertrain
    pub rpm: f32,
    pub rpm_rev_warning: u16,
    pub rpm_rev_limiter: u16,
    pub estimated_top_speed: i16,
    /// Bar relative to atmosphere.
    pub boost: f64,
    pub clutch: f32,
    pub clutch_engaged: f32,
    pub rpm_after_clutch: f32,
    pub gear_ratios: [f32; 8],
    pub current_gear: u8,
    pub suggested_gear: u8,

    // inputs, percent
    pub throttle: f64,
    pub brake: f64,
    pub filtered_throttle: f64,
    pub filtered_brake: f64,
    pub brake_abs: f64,

    // thermal / fluid
    pub oil_temp: f32,
    pub water_temp: f32,
    pub oil_pressure: f32,
    pub fuel_capacity: f32,
    pub current_fuel: f32,

    // chassis
    pub ride_height_mm: f64,
    pub suspension: Wheels<f32>,
    pub tyre_temp: Wheels<f32>,
    pub tyre_diameter: Wheels<f32>,
    pub wheel_angular_speed: Wheels<f32>,
    /// km/h
    pub tyre_speed: Wheels<f64>,
    pub slip_ratio: Wheels<SlipRatio>,
    /// km/h
    pub car_speed: f64,

    // kinematics
    pub position: Vec3,
    pub velocity: Vec3,
    pub rotation: Rotation,
    pub rotation_z: f32,
    pub angular_velocity: Vec3,
    pub wheel_rotation_deg: f64,
    pub sway: f32,
    pub heave: f32,
    pub surge: f32,

    pub energy_recovery: f32,
    pub reserved: ReservedBlock,
}

impl TelemetrySample {
    /// A sample with every field at its default, stamped with `captured_at`.
    pub fn empty(captured_at: OffsetDateTime) -> Self {
        Self {
            captured_at,
            tier: Tier::default(),
            package_id: 0,
            car_id: 0,
            best_lap_ms: 0,
            last_lap_ms: 0,
            current_lap: 0,
            total_laps: 0,
            current_position: 0,
            total_positions: 0,
            time_on_track: Duration::ZERO,
            is_paused: false,
            in_race: false,
            rpm: 0.0,
            rpm_rev_warning: 0,
            rpm_rev_limiter: 0,
            estimated_top_speed: 0,
            boost: 0.0,
            clutch: 0.0,
            clutch_engaged: 0.0,
            rpm_after_clutch: 0.0,
            gear_ratios: [0.0; 8],
            current_gear: 0,
            suggested_gear: 0,
            throttle: 0.0,
            brake: 0.0,
            filtered_throttle: 0.0,
            filtered_brake: 0.0,
            brake_abs: 0.0,
            oil_temp: 0.0,
            water_temp: 0.0,
            oil_pressure: 0.0,
            fuel_capacity: 0.0,
            current_fuel: 0.0,
            ride_height_mm: 0.0,
            suspension: Wheels::default(),
            tyre_temp: Wheels::default(),
            tyre_diameter: Wheels::default(),
            wheel_angular_speed: Wheels::default(),
            tyre_speed: Wheels::default(),
            slip_ratio: Wheels::default(),
            car_speed: 0.0,
            position: Vec3::default(),
            velocity: Vec3::default(),
            rotation: Rotation::default(),
            rotation_z: 0.0,
            angular_velocity: Vec3::default(),
            wheel_rotation_deg: 0.0,
            sway: 0.0,
            heave: 0.0,
            surge: 0.0,
            energy_recovery: 0.0,
            reserved: ReservedBlock::default(),
        }
    }

    /// Pretty-printed JSON with every field.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Single-line JSON, suitable for NDJSON streams.
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
