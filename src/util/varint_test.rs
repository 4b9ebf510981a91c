use super::*;

#[test]
fn round_trips_small_and_large_values() {
    for val in [0u64, 1, 127, 128, 300, u32::MAX as u64, u64::MAX] {
        let mut buf = vec![];
        encode_u64(val, &mut buf);
        let (got, n) = decode_u64(&buf).unwrap();
        assert_eq!(got, val);
        assert_eq!(n, buf.len());
    }
}

#[test]
fn truncated_input_errors() {
    let buf = [0x80u8];
    assert!(decode_u64(&buf).is_err());
}
