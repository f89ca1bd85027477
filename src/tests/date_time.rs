use std::io::Cursor;
use std::str::FromStr;

use chrono::Duration;

use crate::tests::*;

#[test]
fn null_date_time() {
    let dt = DateTime::null();
    assert!(dt.is_null());
    assert_eq!(dt.ticks(), 0);
    assert_eq!(dt, DateTime::epoch());
}

#[test]
fn date_time_ticks_from_duration() {
    // 1 second after the epoch is 10 million ticks
    let dt = DateTime::ymd_hms(1601, 1, 1, 0, 0, 1);
    assert_eq!(dt.ticks(), 10_000_000);
}

#[test]
fn date_time_saturation() {
    // Before the epoch the ticks are negative but the encoded value clamps to 0
    let dt = DateTime::ymd_hms(1600, 12, 31, 23, 59, 59);
    assert!(dt.ticks() < 0);
    assert_eq!(dt.checked_ticks(), 0);

    // After the end of 9999 the encoded value clamps to i64::MAX
    let dt = DateTime::ymd_hms(10000, 1, 1, 0, 0, 0);
    assert_eq!(dt.checked_ticks(), i64::MAX);

    // The maximum tick count round trips back to the endtimes value
    assert_eq!(DateTime::from(i64::MAX), DateTime::endtimes());
}

#[test]
fn date_time_from_ticks() {
    let dt = DateTime::ymd_hms_nano(2020, 7, 4, 12, 0, 0, 500);
    let ticks = dt.checked_ticks();
    assert_eq!(DateTime::from(ticks), dt);
}

#[test]
fn date_time_from_str() {
    let dt = DateTime::from_str("2020-07-04T12:00:00Z").unwrap();
    assert_eq!(dt, DateTime::ymd_hms(2020, 7, 4, 12, 0, 0));
    assert!(DateTime::from_str("not a date").is_err());
}

#[test]
fn date_time_client_offset() {
    // A context with a client offset shifts decoded times by that offset
    let ctx = EncodingContext {
        client_offset: Duration::seconds(5),
        ..EncodingContext::test()
    };
    let dt = DateTime::ymd_hms(2020, 7, 4, 12, 0, 0);
    let mut stream = Cursor::new(dt.encode_to_vec());
    let decoded = DateTime::decode(&mut stream, &ctx).unwrap();
    assert_eq!(decoded, DateTime::ymd_hms(2020, 7, 4, 11, 59, 55));
}

#[test]
fn data_value_source_timestamp_ignores_client_offset() {
    // Source timestamps reflect the device clock and are never skew adjusted, unlike the
    // server timestamp in the same data value
    let ctx = EncodingContext {
        client_offset: Duration::seconds(5),
        ..EncodingContext::test()
    };
    let timestamp = DateTime::ymd_hms(2020, 7, 4, 12, 0, 0);
    let dv = DataValue {
        value: None,
        status: None,
        source_timestamp: Some(timestamp),
        source_picoseconds: None,
        server_timestamp: Some(timestamp),
        server_picoseconds: None,
    };
    let mut stream = Cursor::new(dv.encode_to_vec());
    let decoded = DataValue::decode(&mut stream, &ctx).unwrap();
    assert_eq!(decoded.source_timestamp, Some(timestamp));
    assert_eq!(
        decoded.server_timestamp,
        Some(DateTime::ymd_hms(2020, 7, 4, 11, 59, 55))
    );
}
