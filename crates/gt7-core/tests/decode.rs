use gt7_core::layout::{CAR_ID, FLAGS, GEARS, PACKAGE_ID, SPEED, SWAY, TYRE_DIAMETER, WHEEL_ANGULAR_SPEED};
use gt7_core::{decode, decode_at, DecodeError, TelemetrySample, Tier};
use std::thread;
use time::OffsetDateTime;

fn sample_packet(len: usize) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    buf[PACKAGE_ID..PACKAGE_ID + 4].copy_from_slice(&77i32.to_le_bytes());
    buf[CAR_ID..CAR_ID + 4].copy_from_slice(&3_445i32.to_le_bytes());
    buf[SPEED..SPEED + 4].copy_from_slice(&20.0f32.to_le_bytes());
    buf[TYRE_DIAMETER..TYRE_DIAMETER + 4].copy_from_slice(&0.4f32.to_le_bytes());
    buf[WHEEL_ANGULAR_SPEED..WHEEL_ANGULAR_SPEED + 4].copy_from_slice(&55.0f32.to_le_bytes());
    buf[FLAGS] = 0b11;
    buf[GEARS] = 0x32;
    if len >= Tier::EXTENDED_LEN {
        buf[SWAY..SWAY + 4].copy_from_slice(&0.3f32.to_le_bytes());
    }
    buf
}

#[test]
fn decodes_each_tier_from_length() {
    for (len, tier) in [
        (Tier::BASE_LEN, Tier::Base),
        (Tier::EXTENDED_LEN, Tier::Extended),
        (Tier::FULL_LEN, Tier::Full),
    ] {
        let s = decode(&sample_packet(len)).unwrap();
        assert_eq!(s.tier, tier);
        assert_eq!(s.package_id, 77);
        assert_eq!(s.car_id, 3_445);
        assert!(s.in_race && s.is_paused);
        assert_eq!((s.current_gear, s.suggested_gear), (2, 3));
    }
}

#[test]
fn too_short_buffer_yields_no_sample() {
    let err = decode(&sample_packet(Tier::BASE_LEN)[..Tier::BASE_LEN - 1]).unwrap_err();
    assert!(matches!(err, DecodeError::InsufficientBuffer { len: 0x127, min: 0x128 }));
    assert_eq!(err.to_string(), "buffer of 295 bytes is shorter than the 296-byte minimum");
}

#[test]
fn json_record_carries_two_decimal_slip() {
    let s = decode_at(&sample_packet(Tier::FULL_LEN), OffsetDateTime::UNIX_EPOCH).unwrap();
    // 3.6 * 0.4 * 55 km/h over 72 km/h
    assert_eq!(s.slip_ratio.fl.to_string(), "1.10");

    let line = s.to_json_line().unwrap();
    let value: serde_json::Value = serde_json::from_str(&line).unwrap();
    assert_eq!(value["slip_ratio"]["fl"], "1.10");
    assert_eq!(value["tier"], "Full");
    assert_eq!(value["captured_at"], "1970-01-01T00:00:00Z");

    let back: TelemetrySample = serde_json::from_str(&line).unwrap();
    assert_eq!(back, s);
}

#[test]
fn concurrent_decodes_agree() {
    let packet = sample_packet(Tier::EXTENDED_LEN);
    let expected = decode_at(&packet, OffsetDateTime::UNIX_EPOCH).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let packet = packet.clone();
            thread::spawn(move || decode_at(&packet, OffsetDateTime::UNIX_EPOCH).unwrap())
        })
        .collect();

    for h in handles {
        assert_eq!(h.join().unwrap(), expected);
    }
}
