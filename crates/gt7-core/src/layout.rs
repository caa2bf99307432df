//! Absolute byte offsets of every field in a decrypted datagram.
//!
//! All values are little-endian. Offsets are shared by every tier; later tiers only append.

// Kinematics
pub const POSITION: usize = 0x04; // 3 x f32
pub const VELOCITY: usize = 0x10; // 3 x f32
pub const ROTATION_PITCH: usize = 0x1C;
pub const ROTATION_YAW: usize = 0x20;
pub const ROTATION_ROLL: usize = 0x24;
pub const ROTATION_Z: usize = 0x28;
pub const ANGULAR_VELOCITY: usize = 0x2C; // 3 x f32

// Chassis and powertrain
pub const RIDE_HEIGHT: usize = 0x38; // f32, metres
pub const RPM: usize = 0x3C;
pub const CURRENT_FUEL: usize = 0x44;
pub const FUEL_CAPACITY: usize = 0x48;
pub const SPEED: usize = 0x4C; // f32, m/s
pub const BOOST: usize = 0x50; // f32, absolute
pub const OIL_PRESSURE: usize = 0x54;
pub const WATER_TEMP: usize = 0x58;
pub const OIL_TEMP: usize = 0x5C;
pub const TYRE_TEMP: usize = 0x60; // 4 x f32 FL FR RL RR

// Identifiers and race state
pub const PACKAGE_ID: usize = 0x70; // i32
pub const CURRENT_LAP: usize = 0x74; // i16
pub const TOTAL_LAPS: usize = 0x76; // i16
pub const BEST_LAP: usize = 0x78; // i32 ms
pub const LAST_LAP: usize = 0x7C; // i32 ms
pub const TIME_ON_TRACK: usize = 0x80; // i32 ms
pub const CURRENT_POSITION: usize = 0x84; // i16
pub const TOTAL_POSITIONS: usize = 0x86; // i16
pub const RPM_REV_WARNING: usize = 0x88; // u16
pub const RPM_REV_LIMITER: usize = 0x8A; // u16
pub const ESTIMATED_TOP_SPEED: usize = 0x8C; // i16
pub const FLAGS: usize = 0x8E; // u8
pub const GEARS: usize = 0x90; // u8, low nibble current, high nibble suggested
pub const THROTTLE: usize = 0x91; // u8
pub const BRAKE: usize = 0x92; // u8
pub const RESERVED_0X94: usize = 0x94; // 4 x f32

pub const WHEEL_ANGULAR_SPEED: usize = 0xA4; // 4 x f32
pub const TYRE_DIAMETER: usize = 0xB4; // 4 x f32
pub const SUSPENSION: usize = 0xC4; // 4 x f32
pub const RESERVED_0XD4: usize = 0xD4; // 8 x f32
pub const CLUTCH: usize = 0xF4;
pub const CLUTCH_ENGAGED: usize = 0xF8;
pub const RPM_AFTER_CLUTCH: usize = 0xFC;
pub const GEAR_RATIOS: usize = 0x104; // 8 x f32
pub const CAR_ID: usize = 0x124; // i32

// Extended tier
pub const WHEEL_ROTATION: usize = 0x128; // f32, radians
pub const RESERVED_0X12C: usize = 0x12C;
pub const SWAY: usize = 0x130;
pub const HEAVE: usize = 0x134;
pub const SURGE: usize = 0x138;

// Full tier
pub const FILTERED_THROTTLE: usize = 0x13C; // u8
pub const FILTERED_BRAKE: usize = 0x13D; // u8
pub const RESERVED_0X13E: usize = 0x13E; // 2 x u8
pub const RESERVED_0X140: usize = 0x140; // 4 x f32
pub const ENERGY_RECOVERY: usize = 0x150;
pub const RESERVED_0X154: usize = 0x154;

// Flag bits at FLAGS
pub const FLAG_IN_RACE: u8 = 1;
pub const FLAG_PAUSED: u8 = 1 << 1;
