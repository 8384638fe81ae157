//! Timestamp and UUID helpers shared by the temporal and identifier kinds.

mod timestamps;
mod uuid_utils;

pub use timestamps::{
    format_iso8601, now_microtime, now_unix_seconds, parse_iso8601, Timestamp, TimestampError,
    MAX_UNIX_SECONDS,
};
pub use uuid_utils::{generate_time_uuid, generate_uuid, is_time_uuid};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_uuid_is_valid() {
        let id = generate_uuid();
        assert_eq!(id.get_version_num(), 4);
    }

    #[test]
    fn test_iso_round_trip() {
        let ts = parse_iso8601("2014-12-25T12:12:00.123456+00:00").unwrap();
        assert_eq!(format_iso8601(&ts), "2014-12-25T12:12:00.123456+00:00");
    }
}
